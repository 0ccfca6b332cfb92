//! Strongly-typed domain structures for internship postings.
use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::auth::AuthenticatedUser;

/// Identifier of a user in the university ERP (the JWT `sub` claim).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ErpId(String);

impl ErpId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&AuthenticatedUser> for ErpId {
    fn from(user: &AuthenticatedUser) -> Self {
        Self::new(user.sub.as_str())
    }
}

impl fmt::Display for ErpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Media types accepted for an internship logo.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ImageMediaType {
    Jpeg,
    Jpg,
    Png,
    Webp,
}

impl ImageMediaType {
    /// Parse a declared media type such as `image/png; charset=binary`.
    pub fn from_mime(value: &str) -> Result<Self, TypeConstraintError> {
        let essence = value.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/jpeg" => Ok(Self::Jpeg),
            "image/jpg" => Ok(Self::Jpg),
            "image/png" => Ok(Self::Png),
            "image/webp" => Ok(Self::Webp),
            _ => Err(TypeConstraintError::UnsupportedImageType(value.to_string())),
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Jpg => "image/jpg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }
}

impl fmt::Display for ImageMediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}

/// Logo image attached to a posting.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogoImage {
    file_name: String,
    media_type: ImageMediaType,
    bytes: Vec<u8>,
}

impl LogoImage {
    pub fn new(file_name: String, media_type: ImageMediaType, bytes: Vec<u8>) -> Self {
        Self {
            file_name,
            media_type,
            bytes,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> ImageMediaType {
        self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Validated internship posting ready to be sent to the backend.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewInternship {
    pub title: String,
    pub desc: String,
    pub url: String,
    pub start_date: NaiveDate,
    pub logo: LogoImage,
}

/// Lifecycle of a user's submission.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl RequestState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Who may post internships.
///
/// The check only hides the feature in the UI and guards this server's
/// create route; the internship backend enforces its own authorization.
#[derive(Clone, Debug, Default)]
pub struct PosterPolicy {
    erp_ids: Vec<ErpId>,
    role: Option<String>,
}

impl PosterPolicy {
    pub fn new(erp_ids: Vec<ErpId>, role: Option<String>) -> Self {
        Self { erp_ids, role }
    }

    pub fn allows(&self, user: Option<&AuthenticatedUser>) -> bool {
        let Some(user) = user else {
            return false;
        };

        let id = ErpId::from(user);
        if self.erp_ids.contains(&id) {
            return true;
        }

        match &self.role {
            Some(role) => user.roles.iter().any(|r| r == role),
            None => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum TypeConstraintError {
    #[error("unsupported image type: {0}")]
    UnsupportedImageType(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(sub: &str, roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: sub.into(),
            email: "student@example.com".into(),
            name: "Student".into(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            exp: 0,
        }
    }

    #[test]
    fn media_type_accepts_known_images() {
        assert_eq!(
            ImageMediaType::from_mime("image/jpeg").unwrap(),
            ImageMediaType::Jpeg
        );
        assert_eq!(
            ImageMediaType::from_mime("image/jpg").unwrap(),
            ImageMediaType::Jpg
        );
        assert_eq!(
            ImageMediaType::from_mime("IMAGE/PNG").unwrap(),
            ImageMediaType::Png
        );
        assert_eq!(
            ImageMediaType::from_mime("image/webp; q=1").unwrap(),
            ImageMediaType::Webp
        );
    }

    #[test]
    fn media_type_rejects_other_types() {
        for mime in ["image/gif", "image/svg+xml", "application/pdf", "text/plain", ""] {
            assert!(ImageMediaType::from_mime(mime).is_err(), "{mime} accepted");
        }
    }

    #[test]
    fn policy_requires_a_user() {
        let policy = PosterPolicy::new(vec![ErpId::new("111111")], Some("internships".into()));
        assert!(!policy.allows(None));
    }

    #[test]
    fn policy_matches_listed_erp_id() {
        let policy = PosterPolicy::new(vec![ErpId::new("111111")], None);

        assert!(policy.allows(Some(&user("111111", &[]))));
        assert!(!policy.allows(Some(&user("220600077", &[]))));
    }

    #[test]
    fn policy_matches_role() {
        let policy = PosterPolicy::new(vec![], Some("internships".into()));

        assert!(policy.allows(Some(&user("42", &["internships"]))));
        assert!(!policy.allows(Some(&user("42", &["files"]))));
    }

    #[test]
    fn request_state_defaults_to_idle() {
        assert_eq!(RequestState::default(), RequestState::Idle);
        assert!(RequestState::Pending.is_pending());
        assert!(!RequestState::Failed.is_pending());
    }
}
