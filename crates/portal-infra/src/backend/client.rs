//! HTTP client for the ERP REST backend.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDate;
use reqwest::Url;
use serde::Serialize;
use serde::de::DeserializeOwned;

use portal_core::domain::{
    AccessRequest, FinancialTitle, Invoice, InvoiceFilter, InvoicePdf, Listing, Order,
    OrderDetail, OrderFilter, ProductionDetail, TitleFilter, UserProfile, all_flag,
};
use portal_core::format::to_wire_date;
use portal_core::ports::{BackendError, PortalBackend};
use portal_shared::wire::{
    ACCESS_REQUEST_ENDPOINT, AccessRequestPayload, HEALTH_ENDPOINT, INVOICE_PDF_ENDPOINT,
    INVOICES_ENDPOINT, InvoicePdfQuery, InvoicePdfReply, InvoicesQuery, InvoicesReply,
    LOGIN_ENDPOINT, LoginPayload, LoginReply, ORDER_DETAIL_ENDPOINT, ORDERS_ENDPOINT,
    OrderDetailQuery, OrderDetailReply, OrdersQuery, OrdersReply, PRODUCTION_ENDPOINT,
    ProductionQuery, ProductionReply, TITLES_ENDPOINT, TitlesQuery, TitlesReply,
};

use super::config::{BackendConfig, HEALTH_TIMEOUT};
use super::mapping;

/// WhatsApp number of the finance desk that issues bank-slip second copies.
pub const FINANCE_WHATSAPP: &str = "5514997782644";

/// `wa.me` link that opens a chat with the finance desk prefilled with
/// `message`.
pub fn whatsapp_link(message: &str) -> Result<Url, BackendError> {
    Url::parse_with_params(
        &format!("https://wa.me/{FINANCE_WHATSAPP}"),
        &[("text", message)],
    )
    .map_err(|e| BackendError::Request(e.to_string()))
}

fn wire_date(date: Option<NaiveDate>) -> String {
    date.map(to_wire_date).unwrap_or_default()
}

/// Classify a transport failure. Logged here, once per request.
fn classify(url: &str, error: reqwest::Error) -> BackendError {
    if error.is_timeout() {
        tracing::error!(url, "Backend request timed out");
        BackendError::Timeout
    } else if error.is_connect() {
        tracing::error!(url, error = %error, "Connection refused - backend unavailable");
        BackendError::Unavailable(error.to_string())
    } else if error.is_decode() {
        tracing::error!(url, error = %error, "Backend sent an undecodable body");
        BackendError::Decode(error.to_string())
    } else {
        tracing::error!(url, error = %error, "Backend request failed");
        BackendError::Request(error.to_string())
    }
}

fn log_status(url: &str, status: reqwest::StatusCode) {
    match status.as_u16() {
        401 => tracing::error!(url, "Authentication error - check API credentials"),
        404 => tracing::error!(url, "Endpoint not found"),
        s if s >= 500 => tracing::error!(url, status = s, "Backend internal error"),
        s => tracing::warn!(url, status = s, "Backend returned an error status"),
    }
}

/// [`PortalBackend`] over the ERP's JSON-over-POST API.
///
/// Every request carries Basic auth from [`BackendConfig`]. Requests are
/// never retried.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    config: BackendConfig,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| BackendError::Request(e.to_string()))?;

        tracing::info!(base_url = %config.base_url, timeout_ms = config.timeout.as_millis() as u64, "Backend client created");
        Ok(Self { http, config })
    }

    /// Create from environment configuration.
    pub fn from_env() -> Result<Self, BackendError> {
        Self::new(BackendConfig::from_env())
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    async fn send<B>(&self, endpoint: &str, body: &B) -> Result<(String, reqwest::Response), BackendError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.config.endpoint_url(endpoint);
        tracing::info!(url = %url, "Sending backend request");

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .json(body)
            .send()
            .await
            .map_err(|e| classify(&url, e))?;

        let status = response.status();
        tracing::info!(url = %url, status = status.as_u16(), "Backend response received");
        if !status.is_success() {
            log_status(&url, status);
            return Err(BackendError::from_status(status.as_u16()));
        }
        Ok((url, response))
    }

    /// POST `body` as JSON to `endpoint` and decode the JSON reply.
    async fn post<B, R>(&self, endpoint: &str, body: &B) -> Result<R, BackendError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let (url, response) = self.send(endpoint, body).await?;
        let bytes = response.bytes().await.map_err(|e| classify(&url, e))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(url = %url, error = %e, "Backend reply does not match the expected shape");
            BackendError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl PortalBackend for BackendClient {
    async fn login(
        &self,
        email: &str,
        password: &str,
        tax_id: &str,
    ) -> Result<Option<UserProfile>, BackendError> {
        let payload = LoginPayload {
            email,
            password,
            tax_id,
        };
        let reply: LoginReply = self.post(LOGIN_ENDPOINT, &payload).await?;
        Ok(reply.success.then(|| mapping::profile(reply)))
    }

    async fn list_orders(
        &self,
        client_code: &str,
        filter: &OrderFilter,
    ) -> Result<Listing<Order>, BackendError> {
        let filter = filter.effective();
        let query = OrdersQuery {
            client_code,
            all: all_flag(filter.all),
            start_date: wire_date(filter.start_date),
            end_date: wire_date(filter.end_date),
            proposal: filter.proposal_number.trim(),
            order: filter.order_number.trim(),
        };
        let reply: OrdersReply = self.post(ORDERS_ENDPOINT, &query).await?;
        Ok(Listing::classify(reply.success, reply.orders, |r| r.number.as_str()).map(mapping::order))
    }

    async fn order_detail(&self, order_number: &str) -> Result<OrderDetail, BackendError> {
        let reply: OrderDetailReply = self
            .post(ORDER_DETAIL_ENDPOINT, &OrderDetailQuery { order: order_number })
            .await?;
        Ok(mapping::order_detail(reply))
    }

    async fn production_detail(
        &self,
        order_number: &str,
    ) -> Result<Option<ProductionDetail>, BackendError> {
        let reply: ProductionReply = self
            .post(PRODUCTION_ENDPOINT, &ProductionQuery { order: order_number })
            .await?;
        if !reply.success {
            return Ok(None);
        }
        Ok(Some(ProductionDetail {
            items: reply.products.into_iter().map(mapping::production_item).collect(),
        }))
    }

    async fn list_invoices(
        &self,
        client_code: &str,
        filter: &InvoiceFilter,
    ) -> Result<Listing<Invoice>, BackendError> {
        let filter = filter.effective();
        let query = InvoicesQuery {
            all: all_flag(filter.all),
            client_code,
            invoice: filter.invoice_number.trim(),
            from: wire_date(filter.issued_from),
            to: wire_date(filter.issued_to),
        };
        let reply: InvoicesReply = self.post(INVOICES_ENDPOINT, &query).await?;
        Ok(Listing::classify(reply.success, reply.invoices, |r| r.number.as_str())
            .map(mapping::invoice))
    }

    async fn invoice_pdf(&self, access_key: &str) -> Result<InvoicePdf, BackendError> {
        let reply: InvoicePdfReply = self
            .post(INVOICE_PDF_ENDPOINT, &InvoicePdfQuery { chaveacesso: access_key })
            .await?;

        let encoded: String = reply
            .pdf64
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        if encoded.is_empty() {
            tracing::warn!(access_key, "Backend reply has no PDF64 payload");
            return Err(BackendError::MissingPdf);
        }

        let content = STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| BackendError::Decode(format!("PDF64: {e}")))?;
        Ok(InvoicePdf {
            access_key: access_key.to_string(),
            content,
        })
    }

    async fn list_titles(
        &self,
        client_code: &str,
        filter: &TitleFilter,
    ) -> Result<Listing<FinancialTitle>, BackendError> {
        let filter = filter.effective();
        let query = TitlesQuery {
            all: all_flag(filter.all),
            client_code,
            status: filter.wire_status(),
            from: wire_date(filter.due_from),
            to: wire_date(filter.due_to),
        };
        let reply: TitlesReply = self.post(TITLES_ENDPOINT, &query).await?;
        Ok(Listing::classify(reply.success, reply.titles, |r| r.number.as_str())
            .map(mapping::title))
    }

    async fn request_access(&self, request: &AccessRequest) -> Result<(), BackendError> {
        let payload = AccessRequestPayload {
            company_name: &request.company_name,
            cnpj: &request.tax_id,
            contact_name: &request.contact_name,
            telefone: &request.phone,
            email: &request.email,
            observacoes: &request.notes,
        };
        self.send(ACCESS_REQUEST_ENDPOINT, &payload).await?;
        Ok(())
    }

    async fn check_connectivity(&self) -> bool {
        let url = self.config.endpoint_url(HEALTH_ENDPOINT);
        let result = self
            .http
            .get(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                log_status(&url, response.status());
                false
            }
            Err(e) => {
                classify(&url, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
    use serde_json::{Value, json};

    use super::*;
    use portal_core::domain::TitleStatus;

    type Seen = Arc<Mutex<Vec<(String, Value, Option<String>)>>>;

    /// Mock ERP: answers each endpoint with a canned body and records what
    /// it received.
    async fn mock_backend(seen: Seen) -> String {
        async fn handle(
            req: HttpRequest,
            body: web::Json<Value>,
            seen: web::Data<Seen>,
        ) -> HttpResponse {
            let endpoint = req.match_info().get("endpoint").unwrap_or_default().to_string();
            let auth = req
                .headers()
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            seen.lock()
                .unwrap()
                .push((endpoint.clone(), body.into_inner(), auth));

            let reply = match endpoint.as_str() {
                "VKPCLILOGIN" => json!({
                    "sucess": true, "Codigo": "000123", "Nome": "ACME Ltda",
                    "cgc": "11222333000181", "email": "compras@acme.com.br"
                }),
                "VKPCLILPED" => json!({
                    "success": true,
                    "pedido": [{"Numero": "pedido nao encontrado"}]
                }),
                "VKPCLILNF" => json!({
                    "success": true,
                    "Notas": [
                        {"Numero": 1001, "Emissao": "20240501", "ValorNF": "250.75",
                         "Operacao": "VENDA", "chavenf": "35240512345678000190"}
                    ]
                }),
                "VKPCLIPNF" => json!({"PDF64": "JVBERi0x\nLjQ="}),
                "VKPCLIDFIN" => json!({"success": false, "Titulos": []}),
                "VKPCDETPRD" => return HttpResponse::InternalServerError().finish(),
                _ => return HttpResponse::NotFound().finish(),
            };
            HttpResponse::Ok().json(reply)
        }

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let data = web::Data::new(seen);
        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .route(
                    "/rest/health",
                    web::get().to(|| async { HttpResponse::Ok().finish() }),
                )
                .route("/rest/{endpoint}", web::post().to(handle))
        })
        .workers(1)
        .listen(listener)
        .unwrap()
        .run();
        tokio::spawn(server);
        format!("http://127.0.0.1:{port}/rest")
    }

    async fn client() -> (BackendClient, Seen) {
        let seen = Seen::default();
        let base_url = mock_backend(seen.clone()).await;
        let client = BackendClient::new(BackendConfig {
            base_url,
            username: "admin".into(),
            password: "secret".into(),
            timeout: Duration::from_secs(5),
            accept_invalid_certs: false,
        })
        .unwrap();
        (client, seen)
    }

    #[tokio::test]
    async fn test_login_sends_basic_auth_and_maps_profile() {
        let (client, seen) = client().await;
        let profile = client
            .login("compras@acme.com.br", "senha", "11222333000181")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.code, "000123");
        assert_eq!(profile.tax_id, "11222333000181");

        let seen = seen.lock().unwrap();
        let (endpoint, body, auth) = &seen[0];
        assert_eq!(endpoint, "VKPCLILOGIN");
        assert_eq!(body["Pass"], "senha");
        assert_eq!(body["Cgc"], "11222333000181");
        // admin:secret
        assert_eq!(auth.as_deref(), Some("Basic YWRtaW46c2VjcmV0"));
    }

    #[tokio::test]
    async fn test_sentinel_order_row_is_nothing_found() {
        let (client, seen) = client().await;
        let filter = OrderFilter {
            all: false,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 31),
            ..Default::default()
        };
        let listing = client.list_orders("000123", &filter).await.unwrap();
        assert_eq!(listing, Listing::NothingFound);

        let body = &seen.lock().unwrap()[0].1;
        assert_eq!(body["Todos"], "Nao");
        assert_eq!(body["Datainicio"], "20240131");
        assert_eq!(body["Datafim"], "");
    }

    #[tokio::test]
    async fn test_invoices_and_pdf() {
        let (client, _) = client().await;
        let listing = client
            .list_invoices("000123", &InvoiceFilter::default())
            .await
            .unwrap();
        let invoice = &listing.items()[0];
        assert_eq!(invoice.number, "1001");
        assert_eq!(invoice.value, Some(250.75));

        let pdf = client.invoice_pdf(&invoice.access_key).await.unwrap();
        assert_eq!(pdf.content, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_unsuccessful_titles_and_status_errors() {
        let (client, seen) = client().await;
        let filter = TitleFilter {
            all: false,
            status: TitleStatus::Abertos,
            ..Default::default()
        };
        let listing = client.list_titles("000123", &filter).await.unwrap();
        assert!(listing.is_empty());
        assert_eq!(seen.lock().unwrap()[0].1["Status"], "Abertos");

        let err = client.production_detail("42").await.unwrap_err();
        assert!(matches!(err, BackendError::Server { status: 500 }));
        let err = client.request_access(&AccessRequest::default()).await.unwrap_err();
        assert!(matches!(err, BackendError::EndpointNotFound));
    }

    #[tokio::test]
    async fn test_connectivity() {
        let (client, _) = client().await;
        assert!(client.check_connectivity().await);

        let unreachable = BackendClient::new(BackendConfig {
            base_url: "http://127.0.0.1:1/rest".into(),
            ..Default::default()
        })
        .unwrap();
        assert!(!unreachable.check_connectivity().await);
        assert!(matches!(
            unreachable.order_detail("1").await,
            Err(BackendError::Unavailable(_))
        ));
    }

    #[test]
    fn test_whatsapp_link_encodes_message() {
        let link = whatsapp_link("Ola, Título 1").unwrap();
        assert!(link.as_str().starts_with("https://wa.me/5514997782644?text="));
        assert_eq!(
            link.query_pairs().next().map(|(_, v)| v.into_owned()),
            Some("Ola, Título 1".to_string())
        );
    }
}
