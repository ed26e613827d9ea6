use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::database::models::application::{Application, ApplicationDraft};
use crate::wizard::gateway::{DraftGateway, GatewayError};

/// Wizard pages. Confirmation is terminal and client-only; nothing in
/// storage distinguishes a submitted application from a draft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    #[default]
    Personal,
    Education,
    Projects,
    Confirmation,
}

impl Step {
    pub fn title(&self) -> &'static str {
        match self {
            Step::Personal => "Your Personal Details",
            Step::Education => "Educational Background",
            Step::Projects => "Projects & Experience",
            Step::Confirmation => "Application Submitted",
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Step::Personal => 1,
            Step::Education => 2,
            Step::Projects => 3,
            Step::Confirmation => 4,
        }
    }
}

/// Result of a forward or backward transition
#[derive(Debug)]
pub enum StepOutcome {
    /// Draft saved and navigation happened
    Advanced(Step),
    /// The draft save failed but navigation happened anyway; progress
    /// may not have persisted
    AdvancedWithWarning { step: Step, warning: String },
    /// Local validation failed; no save attempted, step unchanged
    Invalid(HashMap<String, String>),
}

/// Result of the terminal submit action
#[derive(Debug)]
pub enum SubmitOutcome {
    Submitted(Application),
    /// Validation failed; nothing was sent
    Invalid(HashMap<String, String>),
    /// The save failed; unlike draft saves this blocks progression and
    /// the applicant must retry
    Failed(String),
}

/// The page-spanning form model. One instance carries the applicant's
/// state through all wizard steps; it serializes so a client can persist
/// it between steps and resume later.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormSession {
    pub draft: ApplicationDraft,
    pub step: Step,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-enter the wizard at the first page with an existing record's
    /// fields, so subsequent saves update that record
    pub fn load_existing(application: &Application) -> Self {
        Self {
            draft: ApplicationDraft {
                id: Some(application.id),
                name: application.name.clone(),
                email: application.email.clone(),
                address_line1: application.address_line1.clone(),
                address_line2: application.address_line2.clone(),
                city: application.city.clone(),
                state: application.state.clone(),
                zipcode: application.zipcode.clone(),
                is_studying: application.is_studying,
                studying_at: application.studying_at.clone(),
                projects: application.projects.0.clone(),
            },
            step: Step::Personal,
        }
    }

    /// Clear all client state and return to the first page
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Local validation for the current page. The personal page is
    /// stricter about zipcodes than the server, which only requires the
    /// field to be present.
    pub fn page_errors(&self) -> HashMap<String, String> {
        match self.step {
            Step::Personal => {
                let mut errors = self.draft.validate_personal();
                if !zipcode_is_valid(&self.draft.zipcode) {
                    errors.insert(
                        "zipcode".to_string(),
                        "Valid zipcode is required (5 or 6 digits)".to_string(),
                    );
                }
                errors
            }
            Step::Education => self.draft.validate_education(),
            Step::Projects => self.submit_errors(),
            Step::Confirmation => HashMap::new(),
        }
    }

    /// Forward navigation: validate the current page, flush the full
    /// snapshot, advance. A failed save warns but still advances -
    /// navigation continuity is chosen over durability here.
    pub async fn next(&mut self, gateway: &dyn DraftGateway) -> StepOutcome {
        let target = match self.step {
            Step::Personal => Step::Education,
            Step::Education => Step::Projects,
            Step::Projects | Step::Confirmation => {
                return StepOutcome::Invalid(step_error(
                    "There is no forward step from here; submit from the projects page",
                ))
            }
        };

        let errors = self.page_errors();
        if !errors.is_empty() {
            return StepOutcome::Invalid(errors);
        }

        self.advance(gateway, target).await
    }

    /// Backward navigation saves first so going back never loses
    /// in-progress edits. From the first page this is "back to start":
    /// the draft is still flushed.
    pub async fn back(&mut self, gateway: &dyn DraftGateway) -> StepOutcome {
        let target = match self.step {
            Step::Personal => Step::Personal,
            Step::Education => Step::Personal,
            Step::Projects => Step::Education,
            Step::Confirmation => {
                return StepOutcome::Invalid(step_error(
                    "The application was already submitted; reset to start over",
                ))
            }
        };

        self.advance(gateway, target).await
    }

    /// Terminal submission from the projects page: at least one filled
    /// project, every filled entry complete, blank placeholders dropped
    /// from the payload. This is the one save that must succeed before
    /// the wizard moves on.
    pub async fn submit(&mut self, gateway: &dyn DraftGateway) -> SubmitOutcome {
        if self.step != Step::Projects {
            return SubmitOutcome::Invalid(step_error("Submission happens from the projects page"));
        }

        let errors = self.submit_errors();
        if !errors.is_empty() {
            return SubmitOutcome::Invalid(errors);
        }

        self.draft = self.draft.clone().without_blank_projects();
        match gateway.save_draft(&self.draft).await {
            Ok(saved) => {
                self.draft.id = Some(saved.id);
                self.step = Step::Confirmation;
                SubmitOutcome::Submitted(saved)
            }
            Err(e) => SubmitOutcome::Failed(format!("Failed to submit application: {}", e)),
        }
    }

    fn submit_errors(&self) -> HashMap<String, String> {
        let mut errors = self.draft.validate_projects();
        let filled = self.draft.projects.iter().filter(|p| !p.is_blank()).count();
        if filled == 0 {
            errors.insert(
                "projects".to_string(),
                "Please fill in details for at least one project".to_string(),
            );
        }
        errors
    }

    async fn advance(&mut self, gateway: &dyn DraftGateway, target: Step) -> StepOutcome {
        match self.save_snapshot(gateway).await {
            Ok(()) => {
                self.step = target;
                StepOutcome::Advanced(target)
            }
            Err(e) => {
                self.step = target;
                StepOutcome::AdvancedWithWarning {
                    step: target,
                    warning: format!(
                        "Could not save draft: {}. Proceeding with navigation.",
                        e
                    ),
                }
            }
        }
    }

    async fn save_snapshot(&mut self, gateway: &dyn DraftGateway) -> Result<(), GatewayError> {
        let saved = gateway.save_draft(&self.draft).await?;
        // Adopt the server-assigned identifier so later saves update
        // instead of creating duplicates
        self.draft.id = Some(saved.id);
        Ok(())
    }
}

fn zipcode_is_valid(zipcode: &str) -> bool {
    let z = zipcode.trim();
    (5..=6).contains(&z.len()) && z.chars().all(|c| c.is_ascii_digit())
}

fn step_error(message: &str) -> HashMap<String, String> {
    let mut errors = HashMap::new();
    errors.insert("step".to_string(), message.to_string());
    errors
}
