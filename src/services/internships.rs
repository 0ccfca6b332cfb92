use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::{ErpId, LogoImage, PosterPolicy, RequestState};
use crate::forms::main::{ImageUpload, InternshipInput};
use crate::gateway::InternshipGateway;
use crate::models::auth::AuthenticatedUser;
use crate::services::drafts::{DraftStore, InternshipDraft};
use crate::services::tracker::SubmissionTracker;
use crate::services::{ServiceError, ServiceResult};

/// What the "Add Internship" dialog shows for a user.
#[derive(Clone, Debug)]
pub struct DialogState {
    pub draft: InternshipDraft,
    pub has_draft: bool,
    pub request: RequestState,
}

/// Service behind the "Add Internship" dialog.
pub struct InternshipService {
    gateway: Arc<dyn InternshipGateway>,
    policy: PosterPolicy,
    tracker: SubmissionTracker,
    drafts: DraftStore,
}

impl InternshipService {
    pub fn new(gateway: Arc<dyn InternshipGateway>, policy: PosterPolicy) -> Self {
        Self {
            gateway,
            policy,
            tracker: SubmissionTracker::new(),
            drafts: DraftStore::new(),
        }
    }

    /// Whether the feature is shown at all for this user.
    pub fn can_post(&self, user: Option<&AuthenticatedUser>) -> bool {
        self.policy.allows(user)
    }

    fn authorize(&self, user: &AuthenticatedUser) -> ServiceResult<ErpId> {
        if self.can_post(Some(user)) {
            Ok(ErpId::from(user))
        } else {
            Err(ServiceError::Unauthorized)
        }
    }

    pub fn dialog(&self, user: &AuthenticatedUser, today: NaiveDate) -> ServiceResult<DialogState> {
        let id = self.authorize(user)?;
        Ok(DialogState {
            draft: self.drafts.load(&id, today),
            has_draft: self.drafts.contains(&id),
            request: self.tracker.state(&id),
        })
    }

    pub fn draft_logo(&self, user: &AuthenticatedUser) -> ServiceResult<Option<LogoImage>> {
        let id = self.authorize(user)?;
        Ok(self.drafts.logo(&id))
    }

    /// Drop the user's draft, resetting the dialog to its initial values.
    pub fn discard_draft(&self, user: &AuthenticatedUser) -> ServiceResult<()> {
        let id = self.authorize(user)?;
        self.drafts.discard(&id);
        Ok(())
    }

    /// Validate the dialog input and create the internship on the backend.
    ///
    /// Without a freshly uploaded image the logo kept in the user's draft is
    /// used. On any failure the entered values stay in the draft; on success
    /// the draft is discarded.
    pub async fn submit(
        &self,
        user: &AuthenticatedUser,
        mut input: InternshipInput,
        today: NaiveDate,
    ) -> ServiceResult<()> {
        let id = self.authorize(user)?;

        if input.image.is_none() {
            input.image = self.drafts.logo(&id).map(ImageUpload::from);
        }

        let internship = match input.validate_for(today) {
            Ok(internship) => internship,
            Err(errors) => {
                self.drafts.save(&id, InternshipDraft::from(&input));
                return Err(ServiceError::Validation(errors));
            }
        };

        let Some(pending) = self.tracker.begin(&id) else {
            log::debug!("Ignoring duplicate internship submission from {id}");
            return Err(ServiceError::AlreadyPending);
        };

        match self.gateway.create(&internship).await {
            Ok(()) => {
                pending.succeed();
                self.drafts.discard(&id);
                log::info!("Internship '{}' created by {id}", internship.title);
                Ok(())
            }
            Err(err) => {
                pending.fail();
                self.drafts.save(&id, InternshipDraft::from(&internship));
                if err.is_rejection() {
                    log::warn!("Internship backend rejected submission from {id}: {err:?}");
                    Err(ServiceError::Rejected(err))
                } else {
                    log::error!("Failed to create internship for {id}: {err:?}");
                    Err(ServiceError::Gateway(err))
                }
            }
        }
    }
}
