//! Property detail and valuation proxies.

use actix_web::{HttpResponse, web};

use keystone_shared::dto::ZestimateFallback;

use crate::handlers::fetched_response;
use crate::middleware::error::{AppError, AppResult};
use crate::observability::RequestContext;
use crate::state::AppState;

/// Zillow property ids are plain decimal numbers.
fn parse_zpid(raw: String) -> AppResult<String> {
    let zpid = raw.trim();
    if zpid.is_empty() || !zpid.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::BadRequest(format!("Invalid zpid: {raw}")));
    }
    Ok(zpid.to_string())
}

/// GET /api/property/{zpid}
///
/// No fallback: a failed lookup surfaces as 429 or 502.
pub async fn property_details(
    state: web::Data<AppState>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let zpid = parse_zpid(path.into_inner())?;
    let cache_key = format!("zpid:{zpid}");
    let listings = state.listings.clone();

    let fetched = state
        .gate
        .fetch(
            ctx.client_id(),
            &cache_key,
            &state.policies.property,
            || async move { listings.property_details(&zpid).await },
            None,
        )
        .await?;

    Ok(fetched_response(fetched))
}

/// GET /api/property/{zpid}/zestimate
///
/// Falls back to a null valuation when the provider is unavailable.
pub async fn zestimate(
    state: web::Data<AppState>,
    ctx: RequestContext,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let zpid = parse_zpid(path.into_inner())?;
    let cache_key = format!("zestimate:{zpid}");
    let fallback = serde_json::to_value(ZestimateFallback::new(zpid.clone()))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let listings = state.listings.clone();

    let fetched = state
        .gate
        .fetch(
            ctx.client_id(),
            &cache_key,
            &state.policies.property,
            || async move { listings.zestimate(&zpid).await },
            Some(fallback),
        )
        .await?;

    Ok(fetched_response(fetched))
}
