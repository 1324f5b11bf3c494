//! Observability module - request IDs and client identity.

mod request_id;

pub use request_id::{RequestContext, RequestIdMiddleware};
