use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::validation::{digits_only, is_valid_cnpj, is_valid_email, is_valid_phone};

/// First-access request from a company that has no portal login yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    pub company_name: String,
    pub tax_id: String,
    pub contact_name: String,
    pub phone: String,
    pub email: String,
    pub notes: String,
}

impl AccessRequest {
    /// Required fields, e-mail, CNPJ and phone checks, in that order.
    pub fn validate(&self) -> Result<(), DomainError> {
        let required = [
            &self.company_name,
            &self.tax_id,
            &self.contact_name,
            &self.phone,
            &self.email,
        ];
        if required.iter().any(|f| f.trim().is_empty()) {
            return Err(DomainError::Validation(
                "Todos os campos obrigatórios devem ser preenchidos".into(),
            ));
        }
        if !is_valid_email(&self.email) {
            return Err(DomainError::Validation("Email inválido".into()));
        }
        if !is_valid_cnpj(&self.tax_id) {
            return Err(DomainError::Validation("CNPJ inválido".into()));
        }
        if !is_valid_phone(&self.phone) {
            return Err(DomainError::Validation("Telefone inválido".into()));
        }
        Ok(())
    }

    /// Copy with CNPJ and phone reduced to digits, as the backend stores them.
    pub fn normalized(&self) -> Self {
        Self {
            tax_id: digits_only(&self.tax_id),
            phone: digits_only(&self.phone),
            ..self.clone()
        }
    }
}
