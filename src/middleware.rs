//! Sends visitors without a valid identity to the auth service.
use std::future::{Ready, ready};

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{self, Service, ServiceRequest, ServiceResponse, Transform},
    http::{StatusCode, header},
    web,
};
use futures_util::future::LocalBoxFuture;

use crate::models::config::ServerConfig;

/// Rewrites `401 Unauthorized` responses into a `303` to the auth service.
pub struct RedirectUnauthorized;

impl<S, B> Transform<S, ServiceRequest> for RedirectUnauthorized
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RedirectUnauthorizedMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RedirectUnauthorizedMiddleware { service }))
    }
}

pub struct RedirectUnauthorizedMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RedirectUnauthorizedMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(auth_service_url) = req
            .app_data::<web::Data<ServerConfig>>()
            .map(|config| config.auth_service_url.clone())
        else {
            return Box::pin(async {
                Err(actix_web::error::ErrorInternalServerError(
                    "Server config not found",
                ))
            });
        };

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;

            if res.status() != StatusCode::UNAUTHORIZED {
                return Ok(res.map_into_left_body());
            }

            log::debug!("Redirecting {} to the auth service", res.request().path());
            let (req_parts, _) = res.into_parts();
            let redirect_response = HttpResponse::SeeOther()
                .insert_header((header::LOCATION, auth_service_url))
                .finish()
                .map_into_right_body();

            Ok(ServiceResponse::new(req_parts, redirect_response))
        })
    }
}
