//! Stub ports for the handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use portal_core::domain::{
    AccessRequest, FinancialTitle, Invoice, InvoiceFilter, InvoicePdf, Listing, Order,
    OrderDetail, OrderFilter, ProductionDetail, SupportTicket, TitleFilter, UserProfile,
};
use portal_core::ports::{BackendError, MailError, Mailer, PortalBackend};

use crate::state::AppState;

/// Canned backend. `down` makes every call fail as unreachable.
#[derive(Default)]
pub struct StubBackend {
    pub profile: Option<UserProfile>,
    pub orders: Listing<Order>,
    pub detail: OrderDetail,
    pub production: Option<ProductionDetail>,
    pub invoices: Listing<Invoice>,
    pub pdf: Option<Vec<u8>>,
    pub titles: Listing<FinancialTitle>,
    pub down: bool,
    pub access_requests: Mutex<Vec<AccessRequest>>,
    pub client_codes: Mutex<Vec<String>>,
}

impl StubBackend {
    fn check(&self) -> Result<(), BackendError> {
        if self.down {
            Err(BackendError::Unavailable("connection refused".into()))
        } else {
            Ok(())
        }
    }

    fn record(&self, client_code: &str) {
        self.client_codes
            .lock()
            .unwrap()
            .push(client_code.to_string());
    }
}

#[async_trait]
impl PortalBackend for StubBackend {
    async fn login(
        &self,
        _email: &str,
        _password: &str,
        _tax_id: &str,
    ) -> Result<Option<UserProfile>, BackendError> {
        self.check()?;
        Ok(self.profile.clone())
    }

    async fn list_orders(
        &self,
        client_code: &str,
        _filter: &OrderFilter,
    ) -> Result<Listing<Order>, BackendError> {
        self.check()?;
        self.record(client_code);
        Ok(self.orders.clone())
    }

    async fn order_detail(&self, _order_number: &str) -> Result<OrderDetail, BackendError> {
        self.check()?;
        Ok(self.detail.clone())
    }

    async fn production_detail(
        &self,
        _order_number: &str,
    ) -> Result<Option<ProductionDetail>, BackendError> {
        self.check()?;
        Ok(self.production.clone())
    }

    async fn list_invoices(
        &self,
        client_code: &str,
        _filter: &InvoiceFilter,
    ) -> Result<Listing<Invoice>, BackendError> {
        self.check()?;
        self.record(client_code);
        Ok(self.invoices.clone())
    }

    async fn invoice_pdf(&self, access_key: &str) -> Result<InvoicePdf, BackendError> {
        self.check()?;
        let content = self.pdf.clone().ok_or(BackendError::MissingPdf)?;
        Ok(InvoicePdf {
            access_key: access_key.to_string(),
            content,
        })
    }

    async fn list_titles(
        &self,
        client_code: &str,
        _filter: &TitleFilter,
    ) -> Result<Listing<FinancialTitle>, BackendError> {
        self.check()?;
        self.record(client_code);
        Ok(self.titles.clone())
    }

    async fn request_access(&self, request: &AccessRequest) -> Result<(), BackendError> {
        self.check()?;
        self.access_requests.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn check_connectivity(&self) -> bool {
        !self.down
    }
}

pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send_ticket(&self, _ticket: &SupportTicket) -> Result<(), MailError> {
        Err(MailError::Transport("connection reset".into()))
    }
}

/// State without throttling and with a 1 MiB upload limit.
pub fn state(backend: Arc<StubBackend>, mailer: Arc<dyn Mailer>) -> AppState {
    AppState {
        backend,
        mailer,
        throttle: None,
        trust_proxy: false,
        max_upload_bytes: 1024 * 1024,
    }
}
