//! # Backend Lifecycle
//!
//! Starts one in-memory collection host per business collection, wires a
//! typed store to each, and tears everything down again.
//!
//! ## Startup
//!
//! ```rust,ignore
//! let backend = Backend::new(&AppConfig::from_env(), LogNotifier);
//! let acme = backend.customers.create(CustomerCreate::named("Acme")).await?;
//! ```
//!
//! Hosts have no dependencies on each other, so they start in any order.
//!
//! ## Graceful Shutdown
//!
//! 1. **Close every store** so late responses no longer touch the caches
//! 2. **Drop the stores** which drops the last request senders
//! 3. **Await the hosts** as each one sees its channel close and exits
//!
//! Store clones handed out by the backend hold senders too. They must be
//! dropped before [`Backend::shutdown`] can finish.

pub mod backend;

pub use backend::*;
