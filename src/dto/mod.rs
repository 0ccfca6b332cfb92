use serde::Serialize;

use crate::services::drafts::InternshipDraft;
use crate::services::internships::DialogState;

/// Serializable dialog state for template rendering.
#[derive(Clone, Debug, Serialize)]
pub struct InternshipDialogDto {
    pub title: String,
    pub desc: String,
    pub url: String,
    pub start_date: String,
    pub has_logo: bool,
    pub submitting: bool,
    pub open: bool,
}

impl From<DialogState> for InternshipDialogDto {
    fn from(state: DialogState) -> Self {
        let InternshipDraft {
            title,
            desc,
            url,
            start_date,
            logo,
        } = state.draft;

        Self {
            title,
            desc,
            url,
            start_date,
            has_logo: logo.is_some(),
            submitting: state.request.is_pending(),
            open: state.has_draft,
        }
    }
}
