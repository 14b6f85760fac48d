//! Read-only exchange lookups.
//!
//! ```text
//! GET /api/v1/exchanges/{code}
//! ```

use actix_web::{get, web};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::ExchangeSummary;
use crate::domain::{Error, ExchangeCode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Public view of an exchange.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeSummaryBody {
    #[schema(example = 9)]
    pub code: i64,
    #[schema(example = "open")]
    pub status: String,
    pub participant_names: Vec<String>,
}

impl From<ExchangeSummary> for ExchangeSummaryBody {
    fn from(value: ExchangeSummary) -> Self {
        Self {
            code: value.code.get(),
            status: value.status.as_str().to_owned(),
            participant_names: value.participant_names,
        }
    }
}

/// Fetch an exchange's status and participant names.
#[utoipa::path(
    get,
    path = "/api/v1/exchanges/{code}",
    params(("code" = i64, Path, description = "Exchange code")),
    responses(
        (status = 200, description = "Exchange summary", body = ExchangeSummaryBody),
        (status = 400, description = "Invalid code", body = ErrorSchema),
        (status = 404, description = "Unknown exchange", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["exchanges"],
    operation_id = "getExchange"
)]
#[get("/exchanges/{code}")]
pub async fn get_exchange(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ExchangeSummaryBody>> {
    let raw = path.into_inner();
    let code = ExchangeCode::new(raw).map_err(|_| {
        Error::invalid_request("code must be a positive integer").with_details(json!({
            "field": "code",
            "value": raw,
            "code": "invalid_exchange_code",
        }))
    })?;
    let summary = state.exchanges_query.exchange_summary(code).await?;
    Ok(web::Json(summary.into()))
}
