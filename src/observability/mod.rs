//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! gateway, dispatcher, session, poller
//!     → logging.rs (structured log events, stderr)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → terminal / log collector
//!     → Prometheus scrape (watch mode only)
//! ```

pub mod logging;
pub mod metrics;
