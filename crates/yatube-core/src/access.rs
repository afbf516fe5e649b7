//! Access guards called at handler entry.

use thiserror::Error;

use crate::domain::{CurrentUser, Post, User};

/// Raised when an anonymous visitor reaches a page for signed-in users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Authentication required")]
pub struct LoginRequired;

/// Pass only when someone is signed in.
pub fn login_required(viewer: Option<&CurrentUser>) -> Result<&CurrentUser, LoginRequired> {
    viewer.ok_or(LoginRequired)
}

/// Whether `viewer` may edit `post`.
pub fn is_owner(viewer: &CurrentUser, post: &Post) -> bool {
    post.is_authored_by(viewer.id)
}

/// Whether `viewer` is looking at their own profile. Only drives UI affordances.
pub fn is_self(viewer: Option<&CurrentUser>, user: &User) -> bool {
    viewer.is_some_and(|v| v.is(user))
}
