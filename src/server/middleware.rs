// =====================================================
// FILE: src/server/middleware.rs - REQUEST LOGGING
// =====================================================

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::time::Instant;

/// Logs method, path, status and latency of every request. Headers are not
/// logged, so bearer tokens and session cookies stay out of the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestLoggerService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerService { service }))
    }
}

pub struct RequestLoggerService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let method = req.method().to_string();
        let path = req.path().to_string();
        let started = Instant::now();
        let fut = self.service.call(req);

        Box::pin(async move {
            match fut.await {
                Ok(res) => {
                    let status = res.status();
                    let elapsed = started.elapsed().as_millis();
                    if status.is_server_error() {
                        log::warn!("{} {} {} {}ms", method, path, status.as_u16(), elapsed);
                    } else {
                        log::info!("{} {} {} {}ms", method, path, status.as_u16(), elapsed);
                    }
                    Ok(res)
                }
                Err(e) => {
                    log::error!("{} {} failed: {}", method, path, e);
                    Err(e)
                }
            }
        })
    }
}
