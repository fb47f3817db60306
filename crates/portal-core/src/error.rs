//! Domain-level error types.

use thiserror::Error;

/// Domain errors - failures surfaced to the person using the portal.
///
/// The `Display` text of every variant is the message shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed input, reported before anything is sent to the backend.
    #[error("{0}")]
    Validation(String),

    /// The backend rejected the e-mail, password and CNPJ combination.
    #[error("CNPJ, email ou senha incorretos")]
    InvalidCredentials,

    /// No client profile in the session.
    #[error("Código do cliente não encontrado. Faça login novamente.")]
    Unauthorized,

    /// Transport or protocol failure talking to the backend.
    #[error("{0}")]
    Backend(String),

    #[error("Erro interno: {0}")]
    Internal(String),
}
