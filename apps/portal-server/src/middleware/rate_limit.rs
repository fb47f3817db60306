//! Rate limiting middleware for the support mail endpoint.

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    web,
};
use portal_shared::dto::SupportReply;
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;

use crate::state::AppState;

const THROTTLED_MESSAGE: &str =
    "Muitas solicitações enviadas. Aguarde alguns instantes e tente novamente.";

/// Rate limiting middleware factory.
///
/// Uses the throttle of the registered [`AppState`]; without one every
/// request passes. Clients are keyed by peer address, or by the forwarded
/// address when the state trusts the proxy.
pub struct RateLimitMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

/// Address the throttle counts against.
fn client_key(req: &ServiceRequest, trust_proxy: bool) -> String {
    if trust_proxy {
        if let Some(addr) = req.connection_info().realip_remote_addr() {
            return addr.to_string();
        }
    }
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let settings = req
            .app_data::<web::Data<AppState>>()
            .and_then(|state| Some((state.throttle.clone()?, state.trust_proxy)));
        let Some((throttle, trust_proxy)) = settings else {
            return Box::pin(async move { Ok(service.call(req).await?.map_into_left_body()) });
        };

        let key = client_key(&req, trust_proxy);

        Box::pin(async move {
            match throttle.admit(&key).await {
                Ok(admission) if !admission.is_allowed() => {
                    let retry_after = admission.retry_after_secs();
                    tracing::warn!(client = %key, retry_after, "Support submissions throttled");

                    let response = HttpResponse::TooManyRequests()
                        .insert_header(("Retry-After", retry_after.to_string()))
                        .json(SupportReply::error(THROTTLED_MESSAGE));
                    let (http_req, _payload) = req.into_parts();
                    Ok(ServiceResponse::new(http_req, response).map_into_right_body())
                }
                result => {
                    if let Err(e) = result {
                        tracing::error!(error = %e, "Rate limiter error, failing open");
                    }
                    Ok(service.call(req).await?.map_into_left_body())
                }
            }
        })
    }
}
