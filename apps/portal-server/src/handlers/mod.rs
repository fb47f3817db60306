//! HTTP handlers and route configuration.

mod health;
mod portal;
mod support;

#[cfg(test)]
pub(crate) mod testing;

use actix_web::web;

use crate::middleware::rate_limit::RateLimitMiddleware;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            // Support mail relay
            .service(
                web::resource("/enviar-solicitacao-sac")
                    .wrap(RateLimitMiddleware)
                    .route(web::post().to(support::send_support_request))
                    .default_service(web::to(support::method_not_allowed)),
            )
            // Backend proxy
            .service(
                web::scope("/portal")
                    .route("/login", web::post().to(portal::login))
                    .route("/orders", web::post().to(portal::list_orders))
                    .route("/orders/{number}", web::get().to(portal::order_detail))
                    .route(
                        "/orders/{number}/production",
                        web::get().to(portal::production_detail),
                    )
                    .route("/invoices", web::post().to(portal::list_invoices))
                    .route("/invoices/{access_key}/pdf", web::get().to(portal::invoice_pdf))
                    .route("/titles", web::post().to(portal::list_titles))
                    .route("/access-request", web::post().to(portal::request_access)),
            ),
    );
}
