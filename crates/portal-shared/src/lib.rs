//! # Portal Shared
//!
//! Types that cross a process boundary: the ERP backend's wire payloads and
//! the portal API's request bodies and response envelopes.

pub mod dto;
pub mod response;
pub mod wire;

pub use response::{ApiResponse, ErrorResponse};
