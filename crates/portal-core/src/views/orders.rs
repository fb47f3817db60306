use std::sync::{Arc, Mutex};

use super::{QueryGuard, SearchOutcome, backend_failure, require_client_code};
use crate::domain::{
    InvoicePdf, Listing, Order, OrderDetail, OrderFilter, ProductionDetail, ProductionSummary,
    TimelineStep,
};
use crate::error::DomainError;
use crate::ports::PortalBackend;
use crate::session::SessionContext;

/// Orders page: list, detail modal, production modal and invoice download.
pub struct OrdersView {
    backend: Arc<dyn PortalBackend>,
    session: Arc<SessionContext>,
    search_guard: QueryGuard,
    detail_guard: QueryGuard,
    results: Mutex<Listing<Order>>,
}

impl OrdersView {
    pub const NOTHING_FOUND: &'static str =
        "Nenhum pedido encontrado com os filtros selecionados.";
    pub const PRODUCTION_UNAVAILABLE: &'static str =
        "Não foi possível carregar os detalhes da produção.";

    pub fn new(backend: Arc<dyn PortalBackend>, session: Arc<SessionContext>) -> Self {
        Self {
            backend,
            session,
            search_guard: QueryGuard::new(),
            detail_guard: QueryGuard::new(),
            results: Mutex::new(Listing::NothingFound),
        }
    }

    /// Run an order search. A newer search on this view supersedes this one.
    pub async fn search(
        &self,
        filter: &OrderFilter,
    ) -> Result<SearchOutcome<Listing<Order>>, DomainError> {
        let client_code = require_client_code(&self.session).await?;
        let filter = filter.effective();

        let outcome = self
            .search_guard
            .run(self.backend.list_orders(&client_code, &filter))
            .await;
        let listing = match outcome {
            SearchOutcome::Superseded => return Ok(SearchOutcome::Superseded),
            SearchOutcome::Completed(result) => {
                result.map_err(|e| backend_failure("buscar pedidos", e))?
            }
        };

        tracing::info!(client = %client_code, found = listing.len(), "Orders loaded");
        *self.results.lock().unwrap_or_else(|e| e.into_inner()) = listing.clone();
        Ok(SearchOutcome::Completed(listing))
    }

    /// Last completed search result.
    pub fn results(&self) -> Listing<Order> {
        self.results.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Detail of one order. Opening another order supersedes this request.
    pub async fn details(
        &self,
        order_number: &str,
    ) -> Result<SearchOutcome<OrderDetail>, DomainError> {
        match self.detail_guard.run(self.backend.order_detail(order_number)).await {
            SearchOutcome::Superseded => Ok(SearchOutcome::Superseded),
            SearchOutcome::Completed(result) => result
                .map(SearchOutcome::Completed)
                .map_err(|e| backend_failure("buscar detalhes", e)),
        }
    }

    pub async fn production(&self, order_number: &str) -> Result<ProductionDetail, DomainError> {
        match self.backend.production_detail(order_number).await {
            Ok(Some(detail)) => Ok(detail),
            Ok(None) => Err(DomainError::Backend(Self::PRODUCTION_UNAVAILABLE.into())),
            Err(e) => Err(backend_failure("buscar detalhes da produção", e)),
        }
    }

    /// Fetch the invoice PDF attached to an order.
    pub async fn download_invoice(&self, access_key: &str) -> Result<InvoicePdf, DomainError> {
        let access_key = access_key.trim();
        if access_key.is_empty() {
            return Err(DomainError::Validation(
                "Chave de acesso da nota fiscal não disponível".into(),
            ));
        }
        let pdf = self
            .backend
            .invoice_pdf(access_key)
            .await
            .map_err(|e| backend_failure("baixar nota fiscal", e))?;
        tracing::info!(file = %pdf.file_name(), bytes = pdf.content.len(), "Invoice downloaded");
        Ok(pdf)
    }

    pub fn timeline(&self, detail: &OrderDetail) -> Vec<TimelineStep> {
        detail.timeline()
    }

    pub fn production_summary(&self, detail: &ProductionDetail) -> ProductionSummary {
        detail.summary()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::{OrderStatusFlags, ProductionItem};
    use crate::session::testing::{profile, session};
    use crate::views::testing::ScriptedBackend;

    fn order(number: &str) -> Order {
        Order {
            number: number.into(),
            proposal: "P1".into(),
            date: "20240501".into(),
            operation: "VENDA".into(),
            value: Some(10.0),
        }
    }

    async fn logged_in_view(backend: ScriptedBackend) -> (OrdersView, Arc<ScriptedBackend>) {
        let backend = Arc::new(backend);
        let (session, _, _) = session();
        session.login(&profile()).await;
        (OrdersView::new(backend.clone(), Arc::new(session)), backend)
    }

    #[tokio::test]
    async fn test_search_requires_client_code() {
        let backend = Arc::new(ScriptedBackend::default());
        let (session, _, _) = session();
        let view = OrdersView::new(backend.clone(), Arc::new(session));
        let err = view.search(&OrderFilter::default()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Código do cliente não encontrado. Faça login novamente."
        );
        assert!(backend.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_stores_results() {
        let backend = ScriptedBackend::default();
        backend
            .orders
            .lock()
            .unwrap()
            .push_back(Listing::Found(vec![order("1"), order("2")]));
        let (view, backend) = logged_in_view(backend).await;

        let outcome = view.search(&OrderFilter::default()).await.unwrap();
        assert_eq!(outcome.completed().map(|l| l.len()), Some(2));
        assert_eq!(view.results().len(), 2);
        assert_eq!(backend.calls.lock().unwrap()[0], "orders 000123 all=true");
    }

    #[tokio::test]
    async fn test_late_response_is_discarded() {
        let backend = ScriptedBackend {
            first_order_delay: Some(Duration::from_millis(200)),
            ..Default::default()
        };
        {
            let mut orders = backend.orders.lock().unwrap();
            orders.push_back(Listing::Found(vec![order("stale")]));
            orders.push_back(Listing::Found(vec![order("fresh")]));
        }
        let (view, _) = logged_in_view(backend).await;

        let filter = OrderFilter::default();
        let first = view.search(&filter);
        let second = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            view.search(&filter).await
        };
        let (first, second) = tokio::join!(first, second);

        assert!(first.unwrap().is_superseded());
        let fresh = second.unwrap().completed().unwrap();
        assert_eq!(fresh.items()[0].number, "fresh");
        assert_eq!(view.results().items()[0].number, "fresh");
    }

    #[tokio::test]
    async fn test_details_and_timeline() {
        let backend = ScriptedBackend::default();
        *backend.detail.lock().unwrap() = Some(OrderDetail {
            status: Some(OrderStatusFlags {
                checked: true,
                ..Default::default()
            }),
            ..Default::default()
        });
        let (view, _) = logged_in_view(backend).await;
        let detail = view.details("42").await.unwrap().completed().unwrap();
        let steps = view.timeline(&detail);
        assert_eq!(steps.len(), 5);
        assert!(steps[0].completed);
    }

    #[tokio::test]
    async fn test_details_error_message() {
        let (view, _) = logged_in_view(ScriptedBackend::default()).await;
        let err = view.details("42").await.unwrap_err();
        assert!(err.to_string().starts_with("Erro ao buscar detalhes: "));
    }

    #[tokio::test]
    async fn test_production_missing_and_present() {
        let (view, _) = logged_in_view(ScriptedBackend::default()).await;
        let err = view.production("42").await.unwrap_err();
        assert_eq!(err.to_string(), OrdersView::PRODUCTION_UNAVAILABLE);

        let backend = ScriptedBackend::default();
        *backend.production.lock().unwrap() = Some(ProductionDetail {
            items: vec![ProductionItem {
                produced: 4.0,
                progress: 40.0,
                ..Default::default()
            }],
        });
        let (view, _) = logged_in_view(backend).await;
        let detail = view.production("42").await.unwrap();
        assert_eq!(view.production_summary(&detail).average_progress, 40);
    }

    #[tokio::test]
    async fn test_download_invoice() {
        let (view, _) = logged_in_view(ScriptedBackend::default()).await;
        assert!(matches!(
            view.download_invoice(" ").await,
            Err(DomainError::Validation(_))
        ));
        let pdf = view.download_invoice("35240512345678").await.unwrap();
        assert_eq!(pdf.file_name(), "Nota_Fiscal_35240512.pdf");
        let err = view.download_invoice("missing").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Erro ao baixar nota fiscal: PDF não encontrado na resposta da API"
        );
    }
}
