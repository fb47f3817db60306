use serde::{Deserialize, Serialize};

/// Profile of the logged-in client, as returned by the login endpoint.
///
/// Stored as JSON under the backend's own field names so data written by
/// older portal builds still loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Client code used as `CodigoCliente` in every query.
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    /// CNPJ or CPF, digits only.
    #[serde(rename = "cgc")]
    pub tax_id: String,
}

/// Partial profile update. Only fields that are `Some` overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfilePatch {
    #[serde(rename = "codigo", skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "cgc", skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
}

impl UserProfile {
    /// Shallow merge: top-level fields present in `patch` replace ours.
    pub fn merged(mut self, patch: UserProfilePatch) -> Self {
        if let Some(code) = patch.code {
            self.code = code;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(tax_id) = patch.tax_id {
            self.tax_id = tax_id;
        }
        self
    }
}
