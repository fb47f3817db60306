//! Data Transfer Objects - request bodies of the portal's own HTTP API.

use serde::{Deserialize, Serialize};

/// Credential login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// CNPJ, formatted or digits only.
    pub cnpj: String,
}

/// Body of the order, invoice and title list routes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListRequest<F> {
    pub client_code: String,
    pub filter: F,
}

/// Plain `{"message": ...}` / `{"error": ...}` bodies used by the support
/// mail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SupportReply {
    Message { message: String },
    Error { error: String },
}

impl SupportReply {
    pub fn message(message: impl Into<String>) -> Self {
        SupportReply::Message {
            message: message.into(),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        SupportReply::Error {
            error: error.into(),
        }
    }
}
