//! # Yatube Shared
//!
//! Wire types shared between the server and its clients: request bodies,
//! the rendered-view envelope and problem details for errors.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, View};
