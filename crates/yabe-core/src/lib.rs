//! # Yabe Core
//!
//! The domain layer of the Yabe blog engine: users, posts, comments and tags.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, RepoError};
pub use services::BlogService;
