//! # Observability & Tracing
//!
//! Stores and collection hosts log through `tracing` with structured fields:
//!
//! - **Collection lifecycle**: `Collection started`, `Shutdown` with the final row count.
//! - **Table operations**: `Select`, `Insert`, `Update`, `Delete` at `debug` with full payloads,
//!   `Inserted`/`Updated`/`Deleted` at `info` with `size`.
//! - **Store reconciliation**: `Fetched`, `Created`, `Updated`, `Deleted` inside a span
//!   carrying `collection`.
//! - **Failures**: `warn` with `error = %e`.
//!
//! ```bash
//! RUST_LOG=info cargo run      # compact
//! RUST_LOG=debug cargo run     # payloads
//! RUST_LOG=resource_framework=debug,shopdesk=info cargo run
//! ```
//!
//! A typical create at `info`:
//!
//! ```text
//! INFO Inserted collection="customers" id=customer_3 size=3
//! INFO create:Created collection="customers" id=customer_3 size=3
//! ```

/// Installs a compact fmt subscriber filtered by `RUST_LOG`.
///
/// Module paths are hidden; every event already carries a `collection` field.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
