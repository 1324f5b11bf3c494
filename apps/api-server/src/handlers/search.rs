//! Location search proxy.

use actix_web::{HttpResponse, web};

use keystone_shared::dto::{SearchFallback, SearchQuery};

use crate::handlers::fetched_response;
use crate::middleware::error::{AppError, AppResult};
use crate::observability::RequestContext;
use crate::state::AppState;

/// GET /api/search?location=...
///
/// Locations differing only in case or surrounding whitespace share a cache
/// entry. An empty result set is served when the provider is unavailable.
pub async fn search_location(
    state: web::Data<AppState>,
    ctx: RequestContext,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let location = query.normalized_location();
    if location.is_empty() {
        return Err(AppError::BadRequest("location must not be empty".to_string()));
    }

    let cache_key = format!("search:{location}");
    let fallback = serde_json::to_value(SearchFallback::default())
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let listings = state.listings.clone();
    let raw_location = query.into_inner().location.trim().to_string();

    let fetched = state
        .gate
        .fetch(
            ctx.client_id(),
            &cache_key,
            &state.policies.search,
            || async move { listings.search_location(&raw_location).await },
            Some(fallback),
        )
        .await?;

    Ok(fetched_response(fetched))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use actix_web::{App, http::StatusCode, test, web};
    use keystone_core::UpstreamError;
    use serde_json::{Value, json};

    use crate::handlers::configure_routes;
    use crate::handlers::test_support::{StubProvider, state};

    #[actix_web::test]
    async fn test_locations_are_normalized_for_caching() {
        let provider = Arc::new(StubProvider::default());
        let (state, _) = state(provider.clone(), 10);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let first = test::TestRequest::get()
            .uri("/api/search?location=Austin%2C%20TX")
            .to_request();
        let resp = test::call_service(&app, first).await;
        assert_eq!(resp.headers().get("X-Cache-Status").unwrap(), "MISS");

        let second = test::TestRequest::get()
            .uri("/api/search?location=%20austin%2C%20tx%20")
            .to_request();
        let resp = test::call_service(&app, second).await;
        assert_eq!(resp.headers().get("X-Cache-Status").unwrap(), "HIT");

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["location"], "Austin, TX");
        assert_eq!(provider.calls(), 1);
    }

    #[actix_web::test]
    async fn test_search_cache_expires() {
        let provider = Arc::new(StubProvider::default());
        let (state, clock) = state(provider.clone(), 10);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let request = || {
            test::TestRequest::get()
                .uri("/api/search?location=78701")
                .to_request()
        };

        test::call_service(&app, request()).await;
        clock.advance(Duration::from_secs(600));
        let resp = test::call_service(&app, request()).await;

        assert_eq!(resp.headers().get("X-Cache-Status").unwrap(), "MISS");
        assert_eq!(provider.calls(), 2);
    }

    #[actix_web::test]
    async fn test_failed_search_serves_empty_results() {
        let provider = Arc::new(StubProvider::failing(UpstreamError::Transport(
            "connection refused".to_string(),
        )));
        let (state, _) = state(provider, 10);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/search?location=78701")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "results": [], "isFallback": true }));
    }

    #[actix_web::test]
    async fn test_blank_location_is_rejected() {
        let provider = Arc::new(StubProvider::default());
        let (state, _) = state(provider, 10);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/search?location=%20%20")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
