//! Page view-models.
//!
//! Each view wraps the backend port and the session context, runs the
//! page's validations and turns backend results into the messages the page
//! shows. List views keep their last completed result so summaries can be
//! computed without refetching.

mod financial;
mod guard;
mod invoices;
mod login;
mod orders;

pub use financial::FinancialView;
pub use guard::{QueryGuard, SearchOutcome};
pub use invoices::InvoicesView;
pub use login::{
    ACCESS_REQUESTED_MESSAGE, LoginSuccess, LoginView, authenticate, submit_access_request,
    welcome_message,
};
pub use orders::OrdersView;

use crate::error::DomainError;
use crate::ports::BackendError;
use crate::session::SessionContext;

/// Trimmed client code; blank means nobody is logged in.
pub fn client_code(code: &str) -> Result<&str, DomainError> {
    match code.trim() {
        "" => Err(DomainError::Unauthorized),
        code => Ok(code),
    }
}

/// Client code of the logged-in profile, required by every list query.
async fn require_client_code(session: &SessionContext) -> Result<String, DomainError> {
    let profile = session.user_data().await.ok_or(DomainError::Unauthorized)?;
    client_code(&profile.code).map(str::to_string)
}

/// `Erro ao <action>: <detail>`, logged once here.
pub fn backend_failure(action: &str, error: BackendError) -> DomainError {
    tracing::error!(error = %error, status = ?error.status(), "Erro ao {action}");
    DomainError::Backend(format!("Erro ao {action}: {error}"))
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted backend for the view tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::domain::{
        AccessRequest, FinancialTitle, Invoice, InvoiceFilter, InvoicePdf, Listing, Order,
        OrderDetail, OrderFilter, ProductionDetail, TitleFilter, UserProfile,
    };
    use crate::ports::{BackendError, PortalBackend};

    /// Each list call pops the next scripted reply; an optional delay applies
    /// to the first order search only, to simulate a slow request.
    #[derive(Default)]
    pub struct ScriptedBackend {
        pub login: Mutex<Option<Result<Option<UserProfile>, BackendError>>>,
        pub orders: Mutex<VecDeque<Listing<Order>>>,
        pub first_order_delay: Option<Duration>,
        pub detail: Mutex<Option<OrderDetail>>,
        pub production: Mutex<Option<ProductionDetail>>,
        pub invoices: Mutex<Option<Result<Listing<Invoice>, BackendError>>>,
        pub titles: Mutex<Option<Listing<FinancialTitle>>>,
        pub access_requests: Mutex<Vec<AccessRequest>>,
        pub calls: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl PortalBackend for ScriptedBackend {
        async fn login(
            &self,
            email: &str,
            _password: &str,
            tax_id: &str,
        ) -> Result<Option<UserProfile>, BackendError> {
            self.record(format!("login {email} {tax_id}"));
            self.login.lock().unwrap().take().unwrap_or(Ok(None))
        }

        async fn list_orders(
            &self,
            client_code: &str,
            filter: &OrderFilter,
        ) -> Result<Listing<Order>, BackendError> {
            let first = {
                let mut calls = self.calls.lock().unwrap();
                let first = !calls.iter().any(|c| c.starts_with("orders"));
                calls.push(format!("orders {client_code} all={}", filter.all));
                first
            };
            let reply = self.orders.lock().unwrap().pop_front().unwrap_or_default();
            if let (true, Some(delay)) = (first, self.first_order_delay) {
                tokio::time::sleep(delay).await;
            }
            Ok(reply)
        }

        async fn order_detail(&self, order_number: &str) -> Result<OrderDetail, BackendError> {
            self.record(format!("detail {order_number}"));
            self.detail
                .lock()
                .unwrap()
                .clone()
                .ok_or(BackendError::Server { status: 500 })
        }

        async fn production_detail(
            &self,
            order_number: &str,
        ) -> Result<Option<ProductionDetail>, BackendError> {
            self.record(format!("production {order_number}"));
            Ok(self.production.lock().unwrap().clone())
        }

        async fn list_invoices(
            &self,
            client_code: &str,
            _filter: &InvoiceFilter,
        ) -> Result<Listing<Invoice>, BackendError> {
            self.record(format!("invoices {client_code}"));
            self.invoices
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Ok(Listing::NothingFound))
        }

        async fn invoice_pdf(&self, access_key: &str) -> Result<InvoicePdf, BackendError> {
            self.record(format!("pdf {access_key}"));
            if access_key == "missing" {
                return Err(BackendError::MissingPdf);
            }
            Ok(InvoicePdf {
                access_key: access_key.to_string(),
                content: b"%PDF-1.4".to_vec(),
            })
        }

        async fn list_titles(
            &self,
            client_code: &str,
            filter: &TitleFilter,
        ) -> Result<Listing<FinancialTitle>, BackendError> {
            self.record(format!("titles {client_code} {}", filter.wire_status()));
            Ok(self.titles.lock().unwrap().take().unwrap_or_default())
        }

        async fn request_access(&self, request: &AccessRequest) -> Result<(), BackendError> {
            self.access_requests.lock().unwrap().push(request.clone());
            Ok(())
        }

        async fn check_connectivity(&self) -> bool {
            true
        }
    }
}
