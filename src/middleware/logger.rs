//! Request logging middleware.
//!
//! [`logger`] wraps the rest of the chain and emits one `tracing` event per
//! request once the downstream handlers return, carrying the final status.

use std::time::Instant;

use crate::context::{handler, HandlerFunc};

/// Logs status, method, target and latency once the rest of the chain returns.
pub fn logger() -> HandlerFunc {
    handler(|c| {
        let start = Instant::now();
        c.next();
        tracing::info!(
            status = c.status_code().as_u16(),
            method = %c.method,
            target = %c.request().target(),
            elapsed = ?start.elapsed(),
            "Request handled"
        );
    })
}
