use std::sync::{Arc, Mutex};

use super::{QueryGuard, SearchOutcome, backend_failure, require_client_code};
use crate::domain::{Invoice, InvoiceFilter, InvoicePdf, InvoiceSummary, Listing};
use crate::error::DomainError;
use crate::ports::PortalBackend;
use crate::session::SessionContext;

/// Invoices (notas fiscais) page.
pub struct InvoicesView {
    backend: Arc<dyn PortalBackend>,
    session: Arc<SessionContext>,
    guard: QueryGuard,
    results: Mutex<Listing<Invoice>>,
}

impl InvoicesView {
    pub const NOTHING_FOUND: &'static str =
        "Nenhuma nota fiscal encontrada com os filtros selecionados.";

    pub fn new(backend: Arc<dyn PortalBackend>, session: Arc<SessionContext>) -> Self {
        Self {
            backend,
            session,
            guard: QueryGuard::new(),
            results: Mutex::new(Listing::NothingFound),
        }
    }

    pub async fn search(
        &self,
        filter: &InvoiceFilter,
    ) -> Result<SearchOutcome<Listing<Invoice>>, DomainError> {
        let client_code = require_client_code(&self.session).await?;
        let filter = filter.effective();

        let listing = match self
            .guard
            .run(self.backend.list_invoices(&client_code, &filter))
            .await
        {
            SearchOutcome::Superseded => return Ok(SearchOutcome::Superseded),
            SearchOutcome::Completed(result) => {
                result.map_err(|e| backend_failure("buscar notas fiscais", e))?
            }
        };

        tracing::info!(client = %client_code, found = listing.len(), "Invoices loaded");
        *self.results.lock().unwrap_or_else(|e| e.into_inner()) = listing.clone();
        Ok(SearchOutcome::Completed(listing))
    }

    pub fn results(&self) -> Listing<Invoice> {
        self.results.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Count and total value of the last completed search.
    pub fn summary(&self) -> InvoiceSummary {
        InvoiceSummary::from_listing(&self.results.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub async fn download_pdf(&self, invoice: &Invoice) -> Result<InvoicePdf, DomainError> {
        if invoice.access_key.trim().is_empty() {
            return Err(DomainError::Validation(
                "Chave de acesso da nota fiscal não disponível".into(),
            ));
        }
        self.backend
            .invoice_pdf(invoice.access_key.trim())
            .await
            .map_err(|e| backend_failure("baixar nota fiscal", e))
    }
}
