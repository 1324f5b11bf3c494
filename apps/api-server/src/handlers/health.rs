//! Health check endpoint.

use actix_web::{HttpResponse, web};
use keystone_shared::dto::HealthResponse;

use crate::state::AppState;

/// Health check endpoint - returns server status and gate occupancy.
///
/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        cached_entries: state.gate.cache().len(),
        tracked_clients: state.gate.limiter().len(),
    };

    HttpResponse::Ok().json(response)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test, web};
    use serde_json::Value;

    use crate::handlers::configure_routes;
    use crate::handlers::test_support::{StubProvider, state};

    #[actix_web::test]
    async fn test_health_does_not_consume_rate_limit() {
        let (state, _) = state(Arc::new(StubProvider::default()), 1);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        for _ in 0..3 {
            let req = test::TestRequest::get().uri("/api/health").to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);

            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["status"], "ok");
            assert_eq!(body["tracked_clients"], 0);
        }
    }
}
