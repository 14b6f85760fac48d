//! Messaging webhook handler.
//!
//! ```text
//! POST /bot  (application/x-www-form-urlencoded: Body, From)
//! ```

use actix_web::{HttpResponse, post, web};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{ContactAddress, Error};
use crate::inbound::bot::twiml::{TWIML_CONTENT_TYPE, message_response};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Form fields Twilio posts for an inbound message.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct BotWebhookForm {
    /// Message text as typed by the sender.
    #[serde(default)]
    pub body: String,
    /// Sender address, e.g. `whatsapp:+15551234567`.
    pub from: String,
}

/// Handle one inbound message and reply with TwiML.
#[utoipa::path(
    post,
    path = "/bot",
    request_body(content = BotWebhookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "TwiML reply", content_type = "text/xml", body = String),
        (status = 400, description = "Missing or blank sender", body = ErrorSchema)
    ),
    tags = ["bot"],
    operation_id = "botWebhook"
)]
#[post("/bot")]
pub async fn bot_webhook(
    state: web::Data<HttpState>,
    form: web::Form<BotWebhookForm>,
) -> ApiResult<HttpResponse> {
    let BotWebhookForm { body, from } = form.into_inner();
    let sender = ContactAddress::new(from).map_err(|_| {
        Error::invalid_request("From must not be blank").with_details(json!({
            "field": "From",
            "code": "blank_sender",
        }))
    })?;
    info!(sender = %sender, "inbound bot message");

    let lines = state.bot.handle(&sender, &body).await;
    Ok(HttpResponse::Ok()
        .content_type(TWIML_CONTENT_TYPE)
        .body(message_response(&lines)))
}

#[cfg(test)]
#[path = "bot_tests.rs"]
mod tests;
