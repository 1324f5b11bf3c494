//! HTTP handlers and route configuration.

mod health;
mod property;
mod search;

use actix_web::{HttpResponse, web};
use keystone_core::Fetched;
use serde_json::Value;

use crate::middleware::error::{RATE_LIMIT_REMAINING_HEADER, RATE_LIMIT_RESET_HEADER, ceil_secs};

/// Header reporting whether a payload came from cache, upstream or fallback.
pub const CACHE_STATUS_HEADER: &str = "X-Cache-Status";

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/search", web::get().to(search::search_location))
            .service(
                web::scope("/property")
                    .route("/{zpid}", web::get().to(property::property_details))
                    .route("/{zpid}/zestimate", web::get().to(property::zestimate)),
            ),
    );
}

/// 200 response carrying the gate's payload, its cache status and the
/// caller's remaining allowance.
fn fetched_response(fetched: Fetched<Value>) -> HttpResponse {
    let limit = &fetched.rate_limit;
    HttpResponse::Ok()
        .insert_header((CACHE_STATUS_HEADER, fetched.source.cache_status()))
        .insert_header((RATE_LIMIT_REMAINING_HEADER, limit.remaining.to_string()))
        .insert_header((RATE_LIMIT_RESET_HEADER, ceil_secs(&limit.reset_after).to_string()))
        .json(fetched.value)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use keystone_core::ports::ListingProvider;
    use keystone_core::{ManualClock, UpstreamError};
    use serde_json::{Value, json};

    use crate::config::{GateConfig, RoutePolicies};
    use crate::state::AppState;

    /// Provider returning canned data, or a fixed error, and counting calls.
    #[derive(Default)]
    pub struct StubProvider {
        pub calls: AtomicUsize,
        pub fail_with: Option<UpstreamError>,
    }

    impl StubProvider {
        pub fn failing(err: UpstreamError) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_with: Some(err),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn respond(&self, body: Value) -> Result<Value, UpstreamError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(body),
            }
        }
    }

    #[async_trait]
    impl ListingProvider for StubProvider {
        async fn property_details(&self, zpid: &str) -> Result<Value, UpstreamError> {
            self.respond(json!({ "zpid": zpid, "price": 500000 }))
        }

        async fn search_location(&self, location: &str) -> Result<Value, UpstreamError> {
            self.respond(json!({ "location": location, "results": [{ "zpid": "1" }] }))
        }

        async fn zestimate(&self, zpid: &str) -> Result<Value, UpstreamError> {
            self.respond(json!({ "zpid": zpid, "zestimate": 512000.0 }))
        }
    }

    pub fn policies(max_requests: u32) -> RoutePolicies {
        GateConfig {
            max_requests,
            window: Duration::from_secs(60),
            ..GateConfig::default()
        }
        .policies()
        .unwrap()
    }

    pub fn state(provider: Arc<StubProvider>, max_requests: u32) -> (AppState, ManualClock) {
        let clock = ManualClock::new();
        let state = AppState::with_provider(provider, policies(max_requests), Arc::new(clock.clone()));
        (state, clock)
    }
}
