//! # Blog Shared
//!
//! Wire types shared between the server and its clients: page views, form
//! submissions and the response envelopes.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
