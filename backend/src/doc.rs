//! OpenAPI documentation configuration.
//!
//! Registers every HTTP endpoint and the schema wrappers from
//! [`crate::inbound::http::schemas`]. Exported via
//! `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::inbound::http::bot::BotWebhookForm;
use crate::inbound::http::exchanges::ExchangeSummaryBody;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// OpenAPI document for the HTTP interface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Secret Santa backend API",
        description = "Messaging webhook, exchange lookups, and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::bot::bot_webhook,
        crate::inbound::http::exchanges::get_exchange,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        BotWebhookForm,
        ExchangeSummaryBody,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "bot", description = "Inbound messaging webhook"),
        (name = "exchanges", description = "Read-only exchange lookups"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("/bot")]
    #[case("/api/v1/exchanges/{code}")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn registers_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn error_schema_is_named_after_domain_type() {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.expect("components").schemas;
        assert!(schemas.keys().any(|name| name.ends_with("Error")));
        assert!(schemas.contains_key("ExchangeSummaryBody"));
    }
}
