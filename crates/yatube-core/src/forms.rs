//! The post form: raw user input for creating or editing a post.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{NewPost, Post, PostChanges};
use crate::error::DomainError;
use crate::ports::GroupRepository;

pub const TEXT_FIELD: &str = "text";
pub const GROUP_FIELD: &str = "group";

/// A single problem with one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub code: &'static str,
    pub message: String,
}

/// Field errors keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<&'static str, Vec<FieldError>>);

impl FormErrors {
    pub fn add(&mut self, field: &'static str, code: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(FieldError {
            code,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, name: &str) -> &[FieldError] {
        self.0.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has(&self, field: &str, code: &str) -> bool {
        self.field(field).iter().any(|e| e.code == code)
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, errors) in &self.0 {
            for error in errors {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {}", error.message)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Raw post input as submitted. `group` is the group id as text; blank means none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostForm {
    pub text: Option<String>,
    pub group: Option<String>,
}

/// Validated post input, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanPost {
    pub text: String,
    pub group_id: Option<i64>,
}

impl CleanPost {
    pub fn into_new_post(self, author_id: Uuid) -> NewPost {
        NewPost {
            text: self.text,
            author_id,
            group_id: self.group_id,
        }
    }

    pub fn into_changes(self) -> PostChanges {
        PostChanges {
            text: self.text,
            group_id: self.group_id,
        }
    }
}

impl PostForm {
    pub fn new(text: impl Into<String>, group: Option<i64>) -> Self {
        Self {
            text: Some(text.into()),
            group: group.map(|id| id.to_string()),
        }
    }

    /// A form pre-populated with the current state of `post`.
    pub fn from_post(post: &Post) -> Self {
        Self::new(post.text.clone(), post.group_id)
    }

    /// Validate the form, collecting every field error.
    ///
    /// Storage failures during the group lookup are returned as
    /// [`DomainError::Repository`], field problems as [`DomainError::InvalidForm`].
    pub async fn clean(&self, groups: &dyn GroupRepository) -> Result<CleanPost, DomainError> {
        let mut errors = FormErrors::default();

        let text = self.text.as_deref().map(str::trim).unwrap_or_default();
        if text.is_empty() {
            errors.add(TEXT_FIELD, "required", "A post must contain text.");
        }

        let group_id = match self.group.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let found = match raw.parse::<i64>() {
                    Ok(id) => groups.find_by_id(id).await?.map(|g| g.id),
                    Err(_) => None,
                };
                if found.is_none() {
                    errors.add(
                        GROUP_FIELD,
                        "invalid_choice",
                        "Select a valid group. That choice is not one of the available choices.",
                    );
                }
                found
            }
        };

        if !errors.is_empty() {
            return Err(DomainError::InvalidForm(errors));
        }

        Ok(CleanPost {
            text: text.to_string(),
            group_id,
        })
    }
}
