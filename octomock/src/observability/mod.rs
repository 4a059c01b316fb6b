//! Logging setup for test runs.
//!
//! Stand-ins and assertions emit `tracing` events; install a subscriber with
//! [`TracingConfig`] to see them (for example with `RUST_LOG=octomock=debug`).

mod tracing;

pub use self::tracing::TracingConfig;
