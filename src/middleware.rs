use axum::{
    extract::{ConnectInfo, Request},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::Response,
};
use governor::{Quota, RateLimiter, clock::DefaultClock, state::keyed::DefaultKeyedStateStore};
use std::{net::SocketAddr, num::NonZeroU32, sync::Arc, time::Duration};
use tower_http::cors::CorsLayer;

use crate::errors::AppError;

pub type IpRateLimiter = Arc<RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>>;

pub fn create_rate_limiter(requests_per_minute: u32) -> Result<IpRateLimiter, AppError> {
    let per_minute = NonZeroU32::new(requests_per_minute)
        .ok_or_else(|| AppError::EnvError("Rate limit must be greater than zero".into()))?;

    Ok(Arc::new(RateLimiter::keyed(Quota::per_minute(per_minute))))
}

/// Rejects a caller once its address has used up this minute's quota.
///
/// Requests without connection info (in-process tests) share one bucket.
pub async fn rate_limit_middleware(
    rate_limiter: IpRateLimiter,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let client = client_key(&request);

    if rate_limiter.check_key(&client).is_err() {
        tracing::warn!(
            "Rate limit exceeded for {} on {} {}",
            client,
            request.method(),
            request.uri().path()
        );
        return Err((
            StatusCode::TOO_MANY_REQUESTS,
            "Too many rating requests, try again in a minute".into(),
        ));
    }

    Ok(next.run(request).await)
}

fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "local".to_string())
}

pub fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer, AppError> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| AppError::EnvError(format!("Invalid CORS origin '{origin}': {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!("CORS allowed origins: {:?}", origins);

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600)))
}
