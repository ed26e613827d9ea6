use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

use crate::validation::is_valid_email;

/// One project entry. Insertion order is meaningful for display only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Project {
    /// Entries with neither a title nor a description are placeholders
    /// and are dropped before a final submission.
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.description.trim().is_empty()
    }
}

/// Persisted application row. Serialized in camelCase to match the wire
/// contract the form client expects.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub email: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub is_studying: bool,
    pub studying_at: Option<String>,
    pub projects: Json<Vec<Project>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full form snapshot as submitted by the client at every wizard
/// transition. `id` is absent on the first save and carries the
/// server-assigned identifier afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub is_studying: bool,
    pub studying_at: Option<String>,
    pub projects: Vec<Project>,
}

impl ApplicationDraft {
    /// Personal-details field rules (wizard page 1, and part of the
    /// server boundary check)
    pub fn validate_personal(&self) -> HashMap<String, String> {
        let mut errors = HashMap::new();
        if self.name.trim().is_empty() {
            errors.insert("name".to_string(), "Name is required".to_string());
        }
        if !is_valid_email(&self.email) {
            errors.insert("email".to_string(), "Valid email is required".to_string());
        }
        if self.address_line1.trim().is_empty() {
            errors.insert(
                "addressLine1".to_string(),
                "Address Line 1 is required".to_string(),
            );
        }
        if self.city.trim().is_empty() {
            errors.insert("city".to_string(), "City is required".to_string());
        }
        if self.state.trim().is_empty() {
            errors.insert("state".to_string(), "State is required".to_string());
        }
        if self.zipcode.trim().is_empty() {
            errors.insert("zipcode".to_string(), "Zipcode is required".to_string());
        }
        errors
    }

    /// Education field rules: the institution is required exactly when
    /// the applicant is currently studying
    pub fn validate_education(&self) -> HashMap<String, String> {
        let mut errors = HashMap::new();
        if self.is_studying
            && self
                .studying_at
                .as_deref()
                .map(|s| s.trim().is_empty())
                .unwrap_or(true)
        {
            errors.insert(
                "studyingAt".to_string(),
                "studyingAt is required if isStudying is true".to_string(),
            );
        }
        errors
    }

    /// Per-entry project rules: any entry that carries content must have
    /// both a title and a description. Blank placeholder entries pass
    /// here; submission filters them out separately.
    pub fn validate_projects(&self) -> HashMap<String, String> {
        let mut errors = HashMap::new();
        for (idx, project) in self.projects.iter().enumerate() {
            if project.is_blank() {
                continue;
            }
            if project.name.trim().is_empty() {
                errors.insert(
                    format!("projects[{}].name", idx),
                    "Project name is required".to_string(),
                );
            }
            if project.description.trim().is_empty() {
                errors.insert(
                    format!("projects[{}].description", idx),
                    "Project description is required".to_string(),
                );
            }
        }
        errors
    }

    /// Boundary validation for the save endpoint: the union of all
    /// staged rules
    pub fn validate(&self) -> HashMap<String, String> {
        let mut errors = self.validate_personal();
        errors.extend(self.validate_education());
        errors.extend(self.validate_projects());
        errors
    }

    /// The institution field is persisted only while studying; anything
    /// submitted alongside `isStudying: false` is discarded.
    pub fn coerced(mut self) -> Self {
        if !self.is_studying {
            self.studying_at = None;
        }
        self
    }

    /// Drop blank placeholder entries ahead of a final submission
    pub fn without_blank_projects(mut self) -> Self {
        self.projects.retain(|p| !p.is_blank());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_draft() -> ApplicationDraft {
        ApplicationDraft {
            id: None,
            name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            address_line1: "123 Main Street".to_string(),
            address_line2: None,
            city: "New York".to_string(),
            state: "NY".to_string(),
            zipcode: "10001".to_string(),
            is_studying: false,
            studying_at: None,
            projects: vec![Project {
                name: "E-commerce Redesign".to_string(),
                description: "Rebuilt the checkout flow".to_string(),
            }],
        }
    }

    #[test]
    fn complete_draft_passes_validation() {
        assert!(complete_draft().validate().is_empty());
    }

    #[test]
    fn personal_rules_flag_missing_fields() {
        let draft = ApplicationDraft {
            email: "not-an-email".to_string(),
            ..Default::default()
        };
        let errors = draft.validate_personal();
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("addressLine1"));
        assert!(errors.contains_key("city"));
        assert!(errors.contains_key("state"));
        assert!(errors.contains_key("zipcode"));
    }

    #[test]
    fn studying_at_required_only_while_studying() {
        let mut draft = complete_draft();
        draft.is_studying = true;
        draft.studying_at = None;
        assert!(draft.validate_education().contains_key("studyingAt"));

        draft.studying_at = Some("   ".to_string());
        assert!(draft.validate_education().contains_key("studyingAt"));

        draft.studying_at = Some("MIT".to_string());
        assert!(draft.validate_education().is_empty());

        draft.is_studying = false;
        draft.studying_at = None;
        assert!(draft.validate_education().is_empty());
    }

    #[test]
    fn coercion_discards_institution_when_not_studying() {
        let mut draft = complete_draft();
        draft.is_studying = false;
        draft.studying_at = Some("MIT".to_string());
        assert_eq!(draft.coerced().studying_at, None);

        let mut draft = complete_draft();
        draft.is_studying = true;
        draft.studying_at = Some("MIT".to_string());
        assert_eq!(draft.coerced().studying_at.as_deref(), Some("MIT"));
    }

    #[test]
    fn half_filled_project_fails_both_ways() {
        let mut draft = complete_draft();
        draft.projects = vec![Project {
            name: "Only a title".to_string(),
            description: String::new(),
        }];
        let errors = draft.validate_projects();
        assert!(errors.contains_key("projects[0].description"));
        assert!(!errors.contains_key("projects[0].name"));
    }

    #[test]
    fn blank_projects_pass_entry_rules_but_are_filtered() {
        let mut draft = complete_draft();
        draft.projects = vec![
            Project::default(),
            Project {
                name: "Real".to_string(),
                description: "Work".to_string(),
            },
        ];
        assert!(draft.validate_projects().is_empty());

        let filtered = draft.without_blank_projects();
        assert_eq!(filtered.projects.len(), 1);
        assert_eq!(filtered.projects[0].name, "Real");
    }

    #[test]
    fn draft_uses_camel_case_wire_names() {
        let draft = complete_draft();
        let value = serde_json::to_value(&draft).unwrap();
        assert!(value.get("addressLine1").is_some());
        assert!(value.get("isStudying").is_some());
        // id is omitted until the server assigns one
        assert!(value.get("id").is_none());

        let parsed: ApplicationDraft = serde_json::from_value(serde_json::json!({
            "name": "Jane",
            "email": "jane@x.com",
            "isStudying": true,
            "studyingAt": "MIT"
        }))
        .unwrap();
        assert!(parsed.is_studying);
        assert_eq!(parsed.studying_at.as_deref(), Some("MIT"));
        // omitted projects default to an empty sequence
        assert!(parsed.projects.is_empty());
    }
}
