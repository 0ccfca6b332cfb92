use std::borrow::Cow;
use std::collections::BTreeMap;

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use actix_web::web;
use chrono::NaiveDate;
use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::{ImageMediaType, LogoImage, NewInternship};

pub const TITLE_TOO_SHORT: &str = "Title must be at least 2 characters.";
pub const DESC_TOO_SHORT: &str = "Event description must be at least 20 characters.";
pub const URL_TOO_SHORT: &str = "Form URL must be at least 10 characters.";
pub const START_DATE_REQUIRED: &str = "Start date is required.";
pub const START_DATE_IN_PAST: &str = "Start date must be greater than or equal to today's date.";
pub const UNSUPPORTED_IMAGE: &str = "Only .jpg, .jpeg, .png, and .webp formats are supported.";

/// Format of the `startDate` field as sent by `<input type="date">`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(MultipartForm)]
pub struct AddInternshipForm {
    pub title: Text<String>,
    pub desc: Text<String>,
    pub url: Text<String>,
    #[multipart(rename = "startDate")]
    pub start_date: Text<String>,
    #[multipart(limit = "10MB")]
    pub image: Option<TempFile>,
}

impl AddInternshipForm {
    /// Read the uploaded parts. An empty file part means no image was chosen.
    pub async fn into_input(self) -> std::io::Result<InternshipInput> {
        let image = match self.image {
            Some(file) if file.size > 0 => Some(
                web::block(move || ImageUpload::read(file))
                    .await
                    .map_err(|e| std::io::Error::other(e.to_string()))??,
            ),
            _ => None,
        };

        Ok(InternshipInput {
            title: self.title.into_inner(),
            desc: self.desc.into_inner(),
            url: self.url.into_inner(),
            start_date: self.start_date.into_inner(),
            image,
        })
    }
}

/// Uploaded file as declared by the browser.
#[derive(Clone, Debug, Default)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    fn read(file: TempFile) -> std::io::Result<Self> {
        let bytes = std::fs::read(file.file.path())?;
        Ok(Self {
            file_name: file.file_name.filter(|name| !name.is_empty()),
            content_type: file.content_type.map(|mime| mime.essence_str().to_string()),
            bytes,
        })
    }

    /// The logo, if the declared type is one of the accepted images.
    pub fn to_logo(&self) -> Option<LogoImage> {
        let media_type = ImageMediaType::from_mime(self.content_type.as_deref()?).ok()?;
        let file_name = self
            .file_name
            .clone()
            .unwrap_or_else(|| format!("logo-{}", uuid::Uuid::new_v4()));
        Some(LogoImage::new(file_name, media_type, self.bytes.clone()))
    }
}

impl From<LogoImage> for ImageUpload {
    fn from(logo: LogoImage) -> Self {
        Self {
            file_name: Some(logo.file_name().to_string()),
            content_type: Some(logo.media_type().as_mime().to_string()),
            bytes: logo.bytes().to_vec(),
        }
    }
}

/// Raw field values of the "Add Internship" dialog.
#[derive(Clone, Debug, Default, Validate)]
pub struct InternshipInput {
    #[validate(custom(function = "validate_title"))]
    pub title: String,
    #[validate(custom(function = "validate_desc"))]
    pub desc: String,
    #[validate(custom(function = "validate_url"))]
    pub url: String,
    pub start_date: String,
    pub image: Option<ImageUpload>,
}

/// Lengths are counted in UTF-16 code units, as browsers count them.
fn min_utf16_length(value: &str, min: usize, message: &'static str) -> Result<(), ValidationError> {
    if value.encode_utf16().count() >= min {
        return Ok(());
    }
    let mut error = ValidationError::new("length");
    error.message = Some(Cow::Borrowed(message));
    Err(error)
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    min_utf16_length(title, 2, TITLE_TOO_SHORT)
}

fn validate_desc(desc: &str) -> Result<(), ValidationError> {
    min_utf16_length(desc, 20, DESC_TOO_SHORT)
}

fn validate_url(url: &str) -> Result<(), ValidationError> {
    min_utf16_length(url, 10, URL_TOO_SHORT)
}

impl InternshipInput {
    /// Apply every field rule, comparing the start date with `today` by
    /// calendar day.
    pub fn validate_for(&self, today: NaiveDate) -> Result<NewInternship, FieldErrors> {
        let mut errors = FieldErrors::default();

        if let Err(err) = self.validate() {
            errors.merge(&err);
        }

        let start_date = match NaiveDate::parse_from_str(self.start_date.trim(), DATE_FORMAT) {
            Ok(date) if date >= today => Some(date),
            Ok(_) => {
                errors.insert("startDate", START_DATE_IN_PAST);
                None
            }
            Err(_) => {
                errors.insert("startDate", START_DATE_REQUIRED);
                None
            }
        };

        let logo = match self.image.as_ref().and_then(|image| image.to_logo()) {
            Some(logo) => Some(logo),
            None => {
                errors.insert("image", UNSUPPORTED_IMAGE);
                None
            }
        };

        match (start_date, logo) {
            (Some(start_date), Some(logo)) if errors.is_empty() => Ok(NewInternship {
                title: self.title.clone(),
                desc: self.desc.clone(),
                url: self.url.clone(),
                start_date,
                logo,
            }),
            _ => Err(errors),
        }
    }
}

/// First validation message per form field, keyed by the field's form name.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    fn merge(&mut self, errors: &ValidationErrors) {
        for (field, field_errors) in errors.field_errors() {
            let message = field_errors
                .iter()
                .find_map(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid {field}."));
            self.insert(&field, &message);
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
