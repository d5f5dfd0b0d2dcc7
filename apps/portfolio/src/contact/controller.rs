//! Contact Form Controller: validate → persist → notify → confirm.
//!
//! The controller holds no per-visitor state. Each submission produces a
//! fresh `ContactFormView` that the caller passes to the renderer.

use std::sync::Arc;

use tracing::{error, info};

use crate::contact::dispatch::NotificationDispatcher;
use crate::contact::models::{ContactForm, StoredSubmission};
use crate::contact::store::{StoreError, SubmissionStore};
use crate::contact::validation::{validate_submission, FormFieldErrors};

pub const SUCCESS_BANNER: &str = "Thank you for your message! I'll get back to you soon.";
pub const FAILURE_BANNER: &str =
    "Something went wrong while sending your message. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    /// Empty form, no banner.
    Idle,
    /// Validation failed; entered values and inline errors are shown.
    Invalid,
    /// Stored; empty form with the success banner, shown for one render.
    Confirmed,
    /// Store append failed; entered values kept with a retry banner.
    Failed,
}

/// Render state for the contact form section.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactFormView {
    pub name: String,
    pub email: String,
    pub message: String,
    pub errors: FormFieldErrors,
    pub phase: FormPhase,
}

impl ContactFormView {
    pub fn idle() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            message: String::new(),
            errors: FormFieldErrors::default(),
            phase: FormPhase::Idle,
        }
    }

    fn keeping(form: ContactForm, errors: FormFieldErrors, phase: FormPhase) -> Self {
        Self {
            name: form.name,
            email: form.email,
            message: form.message,
            errors,
            phase,
        }
    }

    pub fn banner(&self) -> Option<&'static str> {
        match self.phase {
            FormPhase::Confirmed => Some(SUCCESS_BANNER),
            FormPhase::Failed => Some(FAILURE_BANNER),
            FormPhase::Idle | FormPhase::Invalid => None,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.phase == FormPhase::Confirmed
    }

    pub fn is_failed(&self) -> bool {
        self.phase == FormPhase::Failed
    }
}

/// Result of one submission, for callers that need more than the view.
#[derive(Debug)]
pub enum SubmitOutcome {
    Confirmed(StoredSubmission),
    Invalid(FormFieldErrors),
    Failed(StoreError),
}

#[derive(Clone)]
pub struct ContactController {
    store: Arc<dyn SubmissionStore>,
    notifications: NotificationDispatcher,
}

impl ContactController {
    pub fn new(store: Arc<dyn SubmissionStore>, notifications: NotificationDispatcher) -> Self {
        Self {
            store,
            notifications,
        }
    }

    /// Runs the pipeline. Notification is queued after the append commits and
    /// never affects the outcome.
    pub async fn submit(&self, form: &ContactForm) -> SubmitOutcome {
        let submission = match validate_submission(form) {
            Ok(submission) => submission,
            Err(errors) => {
                info!("Contact form rejected: {} field error(s)", errors.len());
                return SubmitOutcome::Invalid(errors);
            }
        };

        match self.store.append(&submission).await {
            Ok(stored) => {
                self.notifications.dispatch(stored.clone());
                SubmitOutcome::Confirmed(stored)
            }
            Err(e) => {
                error!("Failed to store contact message: {e}");
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// Runs the pipeline and maps the outcome to the next form render.
    pub async fn submit_for_view(&self, form: ContactForm) -> ContactFormView {
        match self.submit(&form).await {
            SubmitOutcome::Confirmed(_) => ContactFormView {
                phase: FormPhase::Confirmed,
                ..ContactFormView::idle()
            },
            SubmitOutcome::Invalid(errors) => {
                ContactFormView::keeping(form, errors, FormPhase::Invalid)
            }
            SubmitOutcome::Failed(_) => {
                ContactFormView::keeping(form, FormFieldErrors::default(), FormPhase::Failed)
            }
        }
    }
}
