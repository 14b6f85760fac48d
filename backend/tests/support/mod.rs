//! Shared helpers for integration tests.

#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::sync::{Arc, Mutex};

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use async_trait::async_trait;

use backend::Trace;
use backend::domain::ports::{FixedRandomSource, Notifier, NotifierError};
use backend::domain::{AssignmentEngine, ContactAddress, ExchangeRegistry};
use backend::inbound::http::bot::bot_webhook;
use backend::inbound::http::exchanges::get_exchange;
use backend::inbound::http::state::HttpState;
use backend::outbound::memory::InMemoryExchangeRepository;

/// One delivered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub to: String,
    pub body: String,
}

/// Notifier that records every message it is asked to send.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentMessage>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().expect("recorder lock").clone()
    }

    pub fn sent_to(&self, to: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|message| message.to == to)
            .map(|message| message.body)
            .collect()
    }

    pub fn clear(&self) {
        self.sent.lock().expect("recorder lock").clear();
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, contact: &ContactAddress, lines: &[String]) -> Result<(), NotifierError> {
        self.sent.lock().expect("recorder lock").push(SentMessage {
            to: contact.as_str().to_owned(),
            body: lines.join("\n"),
        });
        Ok(())
    }
}

pub type MemoryRegistry = ExchangeRegistry<InMemoryExchangeRepository, RecordingNotifier>;

/// Registry over the in-memory store with a fixed seed.
pub fn memory_registry(seed: u64) -> (Arc<MemoryRegistry>, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let registry = Arc::new(ExchangeRegistry::new(
        Arc::new(InMemoryExchangeRepository::default()),
        Arc::clone(&notifier),
        AssignmentEngine::new(Arc::new(FixedRandomSource::from_u64(seed))),
    ));
    (registry, notifier)
}

/// Application with the webhook and JSON API over `registry`.
pub fn app(
    registry: Arc<MemoryRegistry>,
    notifier: Arc<RecordingNotifier>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = web::Data::new(HttpState::new(registry.clone(), registry, notifier));
    App::new()
        .app_data(state)
        .wrap(Trace)
        .service(bot_webhook)
        .service(web::scope("/api/v1").service(get_exchange))
}

/// Extract the `<Message>` text from a TwiML reply, unescaping entities.
pub fn twiml_message(xml: &str) -> String {
    let start = xml
        .find("<Message>")
        .map_or(0, |index| index + "<Message>".len());
    let end = xml.find("</Message>").unwrap_or(xml.len());
    xml.get(start..end)
        .unwrap_or_default()
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
