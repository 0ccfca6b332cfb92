//! Internship board: the "Add Internship" dialog and its submission to the
//! internship backend.
use std::sync::Arc;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware::Logger, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};

use crate::gateway::HttpInternshipGateway;
use crate::middleware::RedirectUnauthorized;
use crate::models::config::ServerConfig;
use crate::services::internships::InternshipService;

pub mod domain;
pub mod dto;
pub mod forms;
pub mod gateway;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

/// Errors preventing the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("secret must be at least 64 bytes long")]
    InvalidSecret,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub async fn run(server_config: ServerConfig) -> Result<(), ServerError> {
    let secret_key =
        Key::try_from(server_config.secret.as_bytes()).map_err(|_| ServerError::InvalidSecret)?;

    let gateway = Arc::new(HttpInternshipGateway::new(&server_config.internship_api_url));
    log::info!("Posting internships to {}", gateway.endpoint());
    let service = web::Data::new(InternshipService::new(
        gateway,
        server_config.poster_policy(),
    ));

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let bind_address = (server_config.address.clone(), server_config.port);
    let domain = server_config.domain.clone();
    let server_config = web::Data::new(server_config);

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false)
                    .cookie_domain(Some(format!(".{}", domain)))
                    .build(),
            )
            .wrap(RedirectUnauthorized)
            .wrap(Logger::default())
            .app_data(server_config.clone())
            .app_data(service.clone())
            .service(Files::new("/assets", "./assets"))
            .configure(routes::main::configure)
    })
    .bind(bind_address)?
    .run()
    .await?;

    Ok(())
}
