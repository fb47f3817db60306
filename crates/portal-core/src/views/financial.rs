use std::sync::{Arc, Mutex};

use super::{QueryGuard, SearchOutcome, backend_failure, require_client_code};
use crate::domain::{FinancialTitle, Listing, TitleFilter, TitleSummary};
use crate::error::DomainError;
use crate::ports::PortalBackend;
use crate::session::SessionContext;

/// Financial page: receivable titles and second-copy requests.
pub struct FinancialView {
    backend: Arc<dyn PortalBackend>,
    session: Arc<SessionContext>,
    guard: QueryGuard,
    results: Mutex<Listing<FinancialTitle>>,
}

impl FinancialView {
    pub const NOTHING_FOUND: &'static str = "Nenhum título encontrado com os filtros selecionados.";

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
        filter: &TitleFilter,
    ) -> Result<SearchOutcome<Listing<FinancialTitle>>, DomainError> {
        let client_code = require_client_code(&self.session).await?;
        let filter = filter.effective();

        let listing = match self
            .guard
            .run(self.backend.list_titles(&client_code, &filter))
            .await
        {
            SearchOutcome::Superseded => return Ok(SearchOutcome::Superseded),
            SearchOutcome::Completed(result) => {
                result.map_err(|e| backend_failure("buscar títulos", e))?
            }
        };

        tracing::info!(client = %client_code, found = listing.len(), "Titles loaded");
        *self.results.lock().unwrap_or_else(|e| e.into_inner()) = listing.clone();
        Ok(SearchOutcome::Completed(listing))
    }

    pub fn results(&self) -> Listing<FinancialTitle> {
        self.results.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn summary(&self) -> TitleSummary {
        TitleSummary::from_listing(&self.results.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Text of the WhatsApp message asking for a bank-slip second copy.
    pub async fn second_copy_request(&self, title: &FinancialTitle) -> Result<String, DomainError> {
        let profile = self.session.user_data().await.ok_or(DomainError::Unauthorized)?;
        Ok(title.second_copy_message(&profile))
    }
}
