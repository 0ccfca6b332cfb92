use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;

use crate::domain::{ErpId, LogoImage, NewInternship};
use crate::forms::main::{DATE_FORMAT, InternshipInput};

/// Values of the dialog kept between requests.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InternshipDraft {
    pub title: String,
    pub desc: String,
    pub url: String,
    pub start_date: String,
    pub logo: Option<LogoImage>,
}

impl InternshipDraft {
    /// Empty text fields, deadline set to today, no logo.
    pub fn initial(today: NaiveDate) -> Self {
        Self {
            start_date: today.format(DATE_FORMAT).to_string(),
            ..Self::default()
        }
    }
}

impl From<&InternshipInput> for InternshipDraft {
    fn from(input: &InternshipInput) -> Self {
        Self {
            title: input.title.clone(),
            desc: input.desc.clone(),
            url: input.url.clone(),
            start_date: input.start_date.clone(),
            logo: input.image.as_ref().and_then(|image| image.to_logo()),
        }
    }
}

impl From<&NewInternship> for InternshipDraft {
    fn from(internship: &NewInternship) -> Self {
        Self {
            title: internship.title.clone(),
            desc: internship.desc.clone(),
            url: internship.url.clone(),
            start_date: internship.start_date.format(DATE_FORMAT).to_string(),
            logo: Some(internship.logo.clone()),
        }
    }
}

/// In-memory drafts keyed by user.
#[derive(Debug, Default)]
pub struct DraftStore {
    drafts: Mutex<HashMap<ErpId, InternshipDraft>>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The user's draft, or initial values when there is none.
    pub fn load(&self, id: &ErpId, today: NaiveDate) -> InternshipDraft {
        self.lock()
            .get(id)
            .cloned()
            .unwrap_or_else(|| InternshipDraft::initial(today))
    }

    pub fn contains(&self, id: &ErpId) -> bool {
        self.lock().contains_key(id)
    }

    pub fn save(&self, id: &ErpId, draft: InternshipDraft) {
        self.lock().insert(id.clone(), draft);
    }

    pub fn logo(&self, id: &ErpId) -> Option<LogoImage> {
        self.lock().get(id).and_then(|draft| draft.logo.clone())
    }

    pub fn discard(&self, id: &ErpId) {
        self.lock().remove(id);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ErpId, InternshipDraft>> {
        self.drafts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ImageMediaType;
    use crate::forms::main::ImageUpload;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn load_without_draft_gives_initial_values() {
        let store = DraftStore::new();
        let draft = store.load(&ErpId::new("1"), today());

        assert_eq!(draft, InternshipDraft::initial(today()));
        assert_eq!(draft.start_date, "2026-10-19");
        assert!(draft.title.is_empty());
        assert!(draft.logo.is_none());
    }

    #[test]
    fn saved_draft_is_returned_until_discarded() {
        let store = DraftStore::new();
        let id = ErpId::new("1");
        let logo = LogoImage::new("logo.jpg".into(), ImageMediaType::Jpeg, vec![1, 2, 3]);
        let draft = InternshipDraft {
            title: "Intern".into(),
            logo: Some(logo.clone()),
            ..InternshipDraft::initial(today())
        };

        store.save(&id, draft.clone());
        assert!(store.contains(&id));
        assert_eq!(store.load(&id, today()), draft);
        assert_eq!(store.logo(&id), Some(logo));

        store.discard(&id);
        assert!(!store.contains(&id));
        assert!(store.logo(&id).is_none());
    }

    #[test]
    fn draft_from_input_drops_unsupported_images() {
        let input = InternshipInput {
            title: "Intern".into(),
            image: Some(ImageUpload {
                file_name: Some("logo.gif".into()),
                content_type: Some("image/gif".into()),
                bytes: vec![1],
            }),
            ..InternshipInput::default()
        };

        let draft = InternshipDraft::from(&input);
        assert_eq!(draft.title, "Intern");
        assert!(draft.logo.is_none());
    }
}
