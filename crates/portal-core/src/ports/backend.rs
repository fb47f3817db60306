//! Port for the external ERP backend that owns orders, invoices and titles.

use async_trait::async_trait;

use crate::domain::{
    AccessRequest, FinancialTitle, Invoice, InvoiceFilter, InvoicePdf, Listing, Order,
    OrderDetail, OrderFilter, ProductionDetail, TitleFilter, UserProfile,
};

/// Queries and submissions the portal issues against the backend.
///
/// Every call is a single request: implementations must not retry.
#[async_trait]
pub trait PortalBackend: Send + Sync {
    /// Check credentials. `Ok(None)` when the backend rejects them.
    async fn login(
        &self,
        email: &str,
        password: &str,
        tax_id: &str,
    ) -> Result<Option<UserProfile>, BackendError>;

    async fn list_orders(
        &self,
        client_code: &str,
        filter: &OrderFilter,
    ) -> Result<Listing<Order>, BackendError>;

    async fn order_detail(&self, order_number: &str) -> Result<OrderDetail, BackendError>;

    /// `Ok(None)` when the backend reports no production data.
    async fn production_detail(
        &self,
        order_number: &str,
    ) -> Result<Option<ProductionDetail>, BackendError>;

    async fn list_invoices(
        &self,
        client_code: &str,
        filter: &InvoiceFilter,
    ) -> Result<Listing<Invoice>, BackendError>;

    async fn invoice_pdf(&self, access_key: &str) -> Result<InvoicePdf, BackendError>;

    async fn list_titles(
        &self,
        client_code: &str,
        filter: &TitleFilter,
    ) -> Result<Listing<FinancialTitle>, BackendError>;

    async fn request_access(&self, request: &AccessRequest) -> Result<(), BackendError>;

    /// Cheap reachability probe.
    async fn check_connectivity(&self) -> bool;
}

/// Backend call failures, classified for logging.
///
/// The `Display` text is safe to show to the user.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Erro na comunicação: 401 (credenciais da API inválidas)")]
    Unauthorized,

    #[error("Erro na comunicação: 404 (endpoint não encontrado)")]
    EndpointNotFound,

    #[error("Erro na comunicação: {status} (erro interno do servidor)")]
    Server { status: u16 },

    #[error("Erro na comunicação: {status}")]
    Status { status: u16 },

    #[error("Conexão recusada - servidor indisponível")]
    Unavailable(String),

    #[error("Tempo limite excedido ao contactar o servidor")]
    Timeout,

    #[error("Resposta inválida do servidor: {0}")]
    Decode(String),

    #[error("PDF não encontrado na resposta da API")]
    MissingPdf,

    #[error("Erro na comunicação com o servidor: {0}")]
    Request(String),
}

impl BackendError {
    /// Map a non-success HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => BackendError::Unauthorized,
            404 => BackendError::EndpointNotFound,
            s if s >= 500 => BackendError::Server { status: s },
            s => BackendError::Status { status: s },
        }
    }

    /// HTTP status involved, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Unauthorized => Some(401),
            BackendError::EndpointNotFound => Some(404),
            BackendError::Server { status } | BackendError::Status { status } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(BackendError::from_status(401), BackendError::Unauthorized));
        assert!(matches!(BackendError::from_status(404), BackendError::EndpointNotFound));
        assert!(matches!(
            BackendError::from_status(503),
            BackendError::Server { status: 503 }
        ));
        assert_eq!(BackendError::from_status(422).status(), Some(422));
        assert_eq!(BackendError::Timeout.status(), None);
    }
}
