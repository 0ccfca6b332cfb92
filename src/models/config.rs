//! Configuration model loaded from external sources.

use serde::Deserialize;

use crate::domain::{ErpId, PosterPolicy};

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub auth_service_url: String,
    pub secret: String,
    /// Base URL of the internship backend, e.g. `https://erp.example.com`.
    pub internship_api_url: String,
    #[serde(default)]
    pub poster_erp_ids: Vec<String>,
    #[serde(default)]
    pub poster_role: Option<String>,
}

impl ServerConfig {
    pub fn poster_policy(&self) -> PosterPolicy {
        PosterPolicy::new(
            self.poster_erp_ids.iter().map(ErpId::new).collect(),
            self.poster_role.clone(),
        )
    }
}
