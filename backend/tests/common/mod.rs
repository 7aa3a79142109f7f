//! Shared helpers for the integration suites.

use std::sync::{Arc, Mutex};

use actix_web::body::{BoxBody, EitherBody};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use async_trait::async_trait;
use odonto_backend::domain::ports::{TextGenerationError, TextGenerator};
use odonto_backend::inbound::http::health::HealthState;
use odonto_backend::server::{AppDependencies, ServerConfig, build_app};
use odonto_backend::test_support::MemoryHarness;

/// Generator returning a fixed draft and remembering every prompt.
#[derive(Debug, Default)]
pub struct RecordingGenerator {
    prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    pub const DRAFT: &'static str = "Laudo técnico: arcada compatível com a ficha.";

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompts lock").clone()
    }
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> Result<Option<String>, TextGenerationError> {
        self.prompts
            .lock()
            .expect("prompts lock")
            .push(prompt.to_owned());
        Ok(Some(Self::DRAFT.to_owned()))
    }
}

/// Harness wired to a [`RecordingGenerator`].
pub fn recording_harness() -> (MemoryHarness, Arc<RecordingGenerator>) {
    let generator = Arc::new(RecordingGenerator::default());
    let harness = MemoryHarness::with_generator(generator.clone());
    (harness, generator)
}

/// The production app factory over the harness state, marked ready.
pub fn full_app(
    harness: &MemoryHarness,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<EitherBody<BoxBody>>,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let health_state = web::Data::new(HealthState::new());
    health_state.mark_ready();
    let bind_addr = "127.0.0.1:0".parse().expect("socket address");
    build_app(AppDependencies {
        health_state,
        http_state: web::Data::new(harness.state.clone()),
        config: ServerConfig::new(bind_addr, harness.upload_root()),
    })
}
