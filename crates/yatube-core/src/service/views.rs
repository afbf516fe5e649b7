//! View models handed to the external renderer, and handler outcomes.

use serde::Serialize;

use crate::domain::{Group, Post, User};
use crate::forms::{FormErrors, PostForm};
use crate::pagination::Page;

/// A context that knows which template renders it.
pub trait Template: Serialize {
    const TEMPLATE: &'static str;
}

/// A post with its author and group resolved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub author: User,
    pub group: Option<Group>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexContext {
    pub page: Page<PostView>,
}

impl Template for IndexContext {
    const TEMPLATE: &'static str = "index.html";
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupContext {
    pub group: Group,
    pub page: Page<PostView>,
}

impl Template for GroupContext {
    const TEMPLATE: &'static str = "group.html";
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileContext {
    pub author: User,
    pub post_count: u64,
    pub page: Page<PostView>,
    pub edit: bool,
}

impl Template for ProfileContext {
    const TEMPLATE: &'static str = "profile.html";
}

#[derive(Debug, Clone, Serialize)]
pub struct PostContext {
    pub author: User,
    pub post: PostView,
    pub post_count: u64,
    pub edit: bool,
}

impl Template for PostContext {
    const TEMPLATE: &'static str = "post.html";
}

/// The create/edit form, bound to the submitted (or current) values.
#[derive(Debug, Clone, Serialize)]
pub struct FormContext {
    pub form: PostForm,
    pub errors: FormErrors,
    /// Groups offered as choices.
    pub groups: Vec<Group>,
    pub edit: bool,
    /// The post being edited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Post>,
}

impl Template for FormContext {
    const TEMPLATE: &'static str = "new.html";
}

/// Where a handler sends the client after a write or a denied edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    Index,
    Post { username: String, post_id: i64 },
}

impl Redirect {
    /// The `Location` value; the username is percent-encoded as a path segment.
    pub fn location(&self) -> String {
        match self {
            Redirect::Index => "/".to_string(),
            Redirect::Post { username, post_id } => {
                format!("/{}/{post_id}/", urlencoding::encode(username))
            }
        }
    }
}

/// Result of a form handler: show the form again or move on.
#[derive(Debug, Clone)]
pub enum FormOutcome {
    Render(FormContext),
    Redirect(Redirect),
}

impl FormOutcome {
    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            FormOutcome::Redirect(redirect) => Some(redirect),
            FormOutcome::Render(_) => None,
        }
    }

    pub fn form(&self) -> Option<&FormContext> {
        match self {
            FormOutcome::Render(context) => Some(context),
            FormOutcome::Redirect(_) => None,
        }
    }
}
