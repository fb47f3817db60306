//! # Portal Core
//!
//! The domain layer of the customer portal.
//! This crate contains validation, formatting, session and view logic with
//! zero infrastructure dependencies: storage, the external backend and mail
//! delivery are reached only through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod format;
pub mod ports;
pub mod session;
pub mod validation;
pub mod views;

pub use error::DomainError;
pub use session::SessionContext;
