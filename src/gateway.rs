//! Outbound client for the internship backend.
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::domain::NewInternship;
use crate::forms::main::DATE_FORMAT;

/// Path of the creation endpoint relative to the backend base URL.
pub const CREATE_PATH: &str = "/api/internship/create";

/// Errors raised while creating an internship on the backend.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("backend rejected the internship")]
    Rejected,
    #[error("unexpected response body")]
    Malformed(#[source] serde_json::Error),
    #[error("backend answered with status {0}")]
    Status(reqwest::StatusCode),
    #[error("request failed")]
    Transport(#[source] reqwest::Error),
}

impl GatewayError {
    /// Whether the backend received the request and turned it down.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected | Self::Malformed(_))
    }
}

/// Body returned by the creation endpoint.
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateInternshipResponse {
    pub success: bool,
}

#[async_trait]
pub trait InternshipGateway: Send + Sync {
    async fn create(&self, internship: &NewInternship) -> Result<(), GatewayError>;
}

/// [`InternshipGateway`] posting multipart forms over HTTP.
#[derive(Clone, Debug)]
pub struct HttpInternshipGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpInternshipGateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), CREATE_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_form(internship: &NewInternship) -> Result<Form, GatewayError> {
        let logo = &internship.logo;
        let image = Part::bytes(logo.bytes().to_vec())
            .file_name(logo.file_name().to_string())
            .mime_str(logo.media_type().as_mime())
            .map_err(GatewayError::Transport)?;

        Ok(Form::new()
            .text("title", internship.title.clone())
            .text("desc", internship.desc.clone())
            .text("url", internship.url.clone())
            .text(
                "startDate",
                internship.start_date.format(DATE_FORMAT).to_string(),
            )
            .part("image", image))
    }
}

#[async_trait]
impl InternshipGateway for HttpInternshipGateway {
    async fn create(&self, internship: &NewInternship) -> Result<(), GatewayError> {
        let form = Self::build_form(internship)?;

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(GatewayError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status));
        }

        let body = response.bytes().await.map_err(GatewayError::Transport)?;
        let body: CreateInternshipResponse =
            serde_json::from_slice(&body).map_err(GatewayError::Malformed)?;

        if body.success {
            Ok(())
        } else {
            Err(GatewayError::Rejected)
        }
    }
}

/// In-memory gateway for tests.
#[cfg(test)]
pub mod fake {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::{GatewayError, InternshipGateway};
    use crate::domain::NewInternship;

    #[derive(Clone, Copy, Debug)]
    pub enum Reply {
        Created,
        Rejected,
        Unreachable,
    }

    pub struct FakeGateway {
        reply: Reply,
        delay: Option<Duration>,
        calls: AtomicUsize,
        received: Mutex<Vec<NewInternship>>,
    }

    impl FakeGateway {
        pub fn new(reply: Reply) -> Arc<Self> {
            Self::with_delay(reply, None)
        }

        pub fn slow(reply: Reply) -> Arc<Self> {
            Self::with_delay(reply, Some(Duration::from_millis(50)))
        }

        fn with_delay(reply: Reply, delay: Option<Duration>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                delay,
                calls: AtomicUsize::new(0),
                received: Mutex::new(vec![]),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn received(&self) -> Vec<NewInternship> {
            self.received.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl InternshipGateway for FakeGateway {
        async fn create(&self, internship: &NewInternship) -> Result<(), GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.received.lock().unwrap().push(internship.clone());
            if let Some(delay) = self.delay {
                actix_web::rt::time::sleep(delay).await;
            }
            match self.reply {
                Reply::Created => Ok(()),
                Reply::Rejected => Err(GatewayError::Rejected),
                Reply::Unreachable => Err(GatewayError::Status(
                    reqwest::StatusCode::SERVICE_UNAVAILABLE,
                )),
            }
        }
    }
}
