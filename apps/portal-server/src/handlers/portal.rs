//! Portal routes - thin JSON proxies over the ERP backend.
//!
//! The browser sends its stored client code with every list query; each
//! route applies the same validations and messages as the portal pages.

use actix_web::{HttpResponse, http::header, web};
use portal_core::domain::{
    AccessRequest, FinancialTitle, Invoice, InvoiceFilter, InvoicePdf, InvoiceSummary, Listing,
    Order, OrderDetail, OrderFilter, ProductionItem, ProductionSummary, TimelineStep,
    TitleFilter, TitleSummary,
};
use portal_core::views::{
    ACCESS_REQUESTED_MESSAGE, FinancialView, InvoicesView, OrdersView, authenticate,
    backend_failure, client_code, submit_access_request, welcome_message,
};
use portal_shared::ApiResponse;
use portal_shared::dto::{ListRequest, LoginRequest};
use serde::Serialize;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct OrderDetailResponse {
    pub detail: OrderDetail,
    pub timeline: Vec<TimelineStep>,
}

#[derive(Debug, Serialize)]
pub struct ProductionResponse {
    pub items: Vec<ProductionItem>,
    pub summary: ProductionSummary,
}

#[derive(Debug, Serialize)]
pub struct SummarizedListing<T, S> {
    pub listing: Listing<T>,
    pub summary: S,
}

/// Envelope for a list: a nothing-found result carries the page's message.
fn listing_response<T: Serialize>(data: T, nothing_found: bool, message: &str) -> HttpResponse {
    if nothing_found {
        HttpResponse::Ok().json(ApiResponse::ok_with_message(data, message))
    } else {
        HttpResponse::Ok().json(ApiResponse::ok(data))
    }
}

/// POST /api/portal/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let LoginRequest {
        email,
        password,
        cnpj,
    } = body.into_inner();
    let profile = authenticate(state.backend.as_ref(), &email, &password, &cnpj).await?;

    tracing::info!(client = %profile.code, "Client logged in");
    let message = welcome_message(&profile);
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(profile, message)))
}

/// POST /api/portal/orders
pub async fn list_orders(
    state: web::Data<AppState>,
    body: web::Json<ListRequest<OrderFilter>>,
) -> AppResult<HttpResponse> {
    let code = client_code(&body.client_code)?;
    let listing: Listing<Order> = state
        .backend
        .list_orders(code, &body.filter)
        .await
        .map_err(|e| backend_failure("buscar pedidos", e))?;

    let nothing_found = listing.is_empty();
    Ok(listing_response(listing, nothing_found, OrdersView::NOTHING_FOUND))
}

/// GET /api/portal/orders/{number}
pub async fn order_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let detail = state
        .backend
        .order_detail(path.trim())
        .await
        .map_err(|e| backend_failure("buscar detalhes", e))?;

    let timeline = detail.timeline();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(OrderDetailResponse { detail, timeline })))
}

/// GET /api/portal/orders/{number}/production
pub async fn production_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let production = state
        .backend
        .production_detail(path.trim())
        .await
        .map_err(|e| backend_failure("buscar detalhes da produção", e))?
        .ok_or_else(|| AppError::NotFound(OrdersView::PRODUCTION_UNAVAILABLE.to_string()))?;

    let summary = production.summary();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(ProductionResponse {
        items: production.items,
        summary,
    })))
}

/// POST /api/portal/invoices
pub async fn list_invoices(
    state: web::Data<AppState>,
    body: web::Json<ListRequest<InvoiceFilter>>,
) -> AppResult<HttpResponse> {
    let code = client_code(&body.client_code)?;
    let listing: Listing<Invoice> = state
        .backend
        .list_invoices(code, &body.filter)
        .await
        .map_err(|e| backend_failure("buscar notas fiscais", e))?;

    let nothing_found = listing.is_empty();
    let summary = InvoiceSummary::from_listing(&listing);
    Ok(listing_response(
        SummarizedListing { listing, summary },
        nothing_found,
        InvoicesView::NOTHING_FOUND,
    ))
}

/// GET /api/portal/invoices/{access_key}/pdf
///
/// Streams the decoded PDF as a download.
pub async fn invoice_pdf(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let access_key = path.trim();
    if access_key.is_empty() {
        return Err(AppError::BadRequest(
            "Chave de acesso da nota fiscal não disponível".to_string(),
        ));
    }

    let pdf = state
        .backend
        .invoice_pdf(access_key)
        .await
        .map_err(|e| backend_failure("baixar nota fiscal", e))?;

    tracing::info!(file = %pdf.file_name(), bytes = pdf.content.len(), "Invoice PDF served");
    Ok(HttpResponse::Ok()
        .content_type(InvoicePdf::CONTENT_TYPE)
        .insert_header(header::ContentDisposition {
            disposition: header::DispositionType::Attachment,
            parameters: vec![header::DispositionParam::Filename(pdf.file_name())],
        })
        .body(pdf.content))
}

/// POST /api/portal/titles
pub async fn list_titles(
    state: web::Data<AppState>,
    body: web::Json<ListRequest<TitleFilter>>,
) -> AppResult<HttpResponse> {
    let code = client_code(&body.client_code)?;
    let listing: Listing<FinancialTitle> = state
        .backend
        .list_titles(code, &body.filter)
        .await
        .map_err(|e| backend_failure("buscar títulos", e))?;

    let nothing_found = listing.is_empty();
    let summary = TitleSummary::from_listing(&listing);
    Ok(listing_response(
        SummarizedListing { listing, summary },
        nothing_found,
        FinancialView::NOTHING_FOUND,
    ))
}

/// POST /api/portal/access-request
pub async fn request_access(
    state: web::Data<AppState>,
    body: web::Json<AccessRequest>,
) -> AppResult<HttpResponse> {
    submit_access_request(state.backend.as_ref(), &body).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message((), ACCESS_REQUESTED_MESSAGE)))
}
