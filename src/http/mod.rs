//! HTTP boundary surfaced only in `http` feature builds.
//!
//! This module exposes the detection pipeline over a small Axum router:
//! service info, health, and base64 voice detection. Handlers own no
//! algorithmic behavior; each detection runs on tokio's blocking pool.

mod routes;

pub use routes::{
    build_router, run_http_server, AppState, DetectRequest, HealthResponse, HttpServerError,
    ServiceInfo,
};
