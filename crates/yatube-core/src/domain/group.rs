use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

const TITLE_MAX_LEN: usize = 200;
const SLUG_MAX_LEN: usize = 20;

/// Group entity - a named category posts can optionally belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// A group that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl NewGroup {
    /// Validate the title and slug of a group about to be created.
    pub fn new(
        title: impl Into<String>,
        slug: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        let slug = slug.into();

        if title.trim().is_empty() {
            return Err(DomainError::Validation("Group title is required".to_string()));
        }
        if title.chars().count() > TITLE_MAX_LEN {
            return Err(DomainError::Validation(format!(
                "Group title must be at most {TITLE_MAX_LEN} characters"
            )));
        }
        if !is_valid_slug(&slug) {
            return Err(DomainError::Validation(format!(
                "Invalid slug '{slug}': use 1-{SLUG_MAX_LEN} letters, digits, hyphens or underscores"
            )));
        }

        Ok(Self {
            title,
            slug,
            description: description.into(),
        })
    }
}

/// Slugs are ASCII letters, digits, `-` and `_`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= SLUG_MAX_LEN
        && slug
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
