use actix_multipart::form::MultipartForm;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::{Local, NaiveDate};
use tera::Context;

use crate::dto::InternshipDialogDto;
use crate::forms::main::{AddInternshipForm, FieldErrors};
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::routes::{alerts, redirect, render_template};
use crate::services::ServiceError;
use crate::services::internships::InternshipService;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(create_internship)
        .service(draft_logo)
        .service(discard_draft);
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn render_index(
    user: Option<&AuthenticatedUser>,
    alerts: &[(String, &'static str)],
    dialog: Option<InternshipDialogDto>,
    errors: &FieldErrors,
    server_config: &ServerConfig,
) -> HttpResponse {
    let mut context = Context::new();
    context.insert("alerts", alerts);
    context.insert("current_user", &user);
    context.insert("current_page", "index");
    context.insert("home_url", &server_config.auth_service_url);
    context.insert("can_add_internship", &dialog.is_some());
    context.insert("dialog", &dialog);
    context.insert("errors", errors);
    context.insert("today", &today().to_string());

    render_template("main/index.html", &context)
}

#[get("/")]
pub async fn index(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    service: web::Data<InternshipService>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let dialog = user
        .as_ref()
        .and_then(|user| service.dialog(user, today()).ok())
        .map(InternshipDialogDto::from);

    render_index(
        user.as_ref(),
        &alerts(&flash_messages),
        dialog,
        &FieldErrors::default(),
        &server_config,
    )
}

#[post("/internships/create")]
pub async fn create_internship(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    service: web::Data<InternshipService>,
    server_config: web::Data<ServerConfig>,
    MultipartForm(form): MultipartForm<AddInternshipForm>,
) -> impl Responder {
    let input = match form.into_input().await {
        Ok(input) => input,
        Err(e) => {
            log::error!("Failed to read uploaded logo: {e:?}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let today = today();
    match service.submit(&user, input, today).await {
        Ok(()) => {
            FlashMessage::success("Internship added successfully!").send();
            redirect("/")
        }
        Err(ServiceError::Unauthorized) => HttpResponse::Forbidden().finish(),
        Err(ServiceError::Validation(errors)) => {
            let dialog = service.dialog(&user, today).ok().map(|state| InternshipDialogDto {
                open: true,
                ..InternshipDialogDto::from(state)
            });
            render_index(
                Some(&user),
                &alerts(&flash_messages),
                dialog,
                &errors,
                &server_config,
            )
        }
        Err(ServiceError::AlreadyPending) => redirect("/"),
        Err(ServiceError::Rejected(_)) => {
            FlashMessage::error("Failed to add. Please try again.").send();
            redirect("/")
        }
        Err(ServiceError::Gateway(_)) => {
            FlashMessage::error("An error occurred. Please try again.").send();
            redirect("/")
        }
    }
}

#[get("/internships/draft/logo")]
pub async fn draft_logo(
    user: AuthenticatedUser,
    service: web::Data<InternshipService>,
) -> impl Responder {
    match service.draft_logo(&user) {
        Ok(Some(logo)) => HttpResponse::Ok()
            .content_type(logo.media_type().as_mime())
            .body(logo.bytes().to_vec()),
        Ok(None) => HttpResponse::NotFound().finish(),
        Err(_) => HttpResponse::Forbidden().finish(),
    }
}

#[post("/internships/draft/discard")]
pub async fn discard_draft(
    user: AuthenticatedUser,
    service: web::Data<InternshipService>,
) -> impl Responder {
    match service.discard_draft(&user) {
        Ok(()) => redirect("/"),
        Err(_) => HttpResponse::Forbidden().finish(),
    }
}
