use std::future::{Ready, ready};

use actix_identity::Identity;
use actix_web::error::{ErrorInternalServerError, ErrorUnauthorized};
use actix_web::{Error, FromRequest, HttpRequest, dev::Payload, web::Data};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use crate::models::config::ServerConfig;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub sub: String, // ERP id
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub exp: usize, // expiration as timestamp
}

impl AuthenticatedUser {
    pub fn set_expiration(&mut self, days: i64) {
        self.exp = Utc::now()
            .checked_add_signed(Duration::days(days))
            .map(|at| at.timestamp() as usize)
            .unwrap_or(usize::MAX);
    }

    pub fn to_jwt(&mut self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        self.set_expiration(7);
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_ref()),
        )
    }

    fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let validation = jsonwebtoken::Validation::default();
        let token_data = jsonwebtoken::decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_ref()),
            &validation,
        )?;
        Ok(token_data.claims)
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let identity = Identity::from_request(req, &mut Payload::None)
            .into_inner()
            .map(|i| i.id().ok());

        let server_config = match req.app_data::<Data<ServerConfig>>() {
            Some(config) => config,
            None => return ready(Err(ErrorInternalServerError("Server config not found"))),
        };

        if let Ok(Some(uid)) = identity {
            return match AuthenticatedUser::from_jwt(&uid, &server_config.secret) {
                Ok(claims) => ready(Ok(claims)),
                Err(err) => {
                    log::debug!("Rejected identity token: {err}");
                    ready(Err(ErrorUnauthorized("Invalid user")))
                }
            };
        }
        ready(Err(ErrorUnauthorized("Unauthorized")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jwt_round_trip_keeps_claims() {
        let mut user = AuthenticatedUser {
            sub: "111111".into(),
            email: "hr@example.com".into(),
            name: "Placement Cell".into(),
            roles: vec!["internships".into()],
            exp: 0,
        };

        let token = user.to_jwt("secret").unwrap();
        let decoded = AuthenticatedUser::from_jwt(&token, "secret").unwrap();

        assert_eq!(decoded.sub, "111111");
        assert_eq!(decoded.roles, vec!["internships".to_string()]);
        assert!(decoded.exp > 0);
    }

    #[test]
    fn jwt_with_wrong_secret_is_rejected() {
        let mut user = AuthenticatedUser {
            sub: "111111".into(),
            email: "hr@example.com".into(),
            name: "Placement Cell".into(),
            roles: vec![],
            exp: 0,
        };

        let token = user.to_jwt("secret").unwrap();
        assert!(AuthenticatedUser::from_jwt(&token, "other").is_err());
    }
}
