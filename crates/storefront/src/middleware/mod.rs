//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (recorded on the span, echoed in the response)
//! 4. CORS
//! 5. Body limit (1 MiB)
//! 6. Rate limiting on `/api` (governor)

pub mod cors;
pub mod rate_limit;
pub mod request_id;

pub use cors::cors_layer;
pub use rate_limit::api_rate_limiter;
pub use request_id::request_id_middleware;
