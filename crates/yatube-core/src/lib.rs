//! # Yatube Core
//!
//! The domain layer of the Yatube blog backend.
//! This crate contains the data model, the post form, pagination and the
//! request-handling service, with zero infrastructure dependencies.

pub mod access;
pub mod domain;
pub mod error;
pub mod forms;
pub mod pagination;
pub mod ports;
pub mod service;

pub use error::DomainError;
pub use service::BlogService;
