//! # Blog Core
//!
//! The domain layer of the blog: posts, groups and their authors, the
//! validation rules applied before every write, pagination, and the
//! listing/authoring flows. No infrastructure dependencies live here.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod services;
pub mod validation;

pub use error::DomainError;
pub use services::{BlogService, RequestContext};
