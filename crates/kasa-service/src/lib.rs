//! # kasa-service: Service Facade for the Kasa POS Backend
//!
//! The operations an external HTTP layer calls, as pure request → result
//! functions. This crate owns:
//!
//! - [`services`] - checkout, reports, and CRUD services over kasa-db
//! - [`auth`] - JWT issuance/validation and argon2 password hashing
//! - [`config`] - environment-driven configuration
//! - [`error`] - the error taxonomy callers map to HTTP statuses
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kasa_db::{Database, DbConfig};
//! use kasa_service::{init_tracing, Config, Services};
//!
//! init_tracing();
//! let config = Config::load()?;
//! let db = Database::new(DbConfig::new(&config.database_path)).await?;
//! let services = Services::new(db, &config);
//!
//! let receipt = services.checkout.checkout(request).await?;
//! let summary = services.reports.today_summary().await?;
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod services;

pub use config::Config;
pub use error::{ErrorCode, ServiceError};
pub use services::Services;

/// Initializes tracing with an env-filter (`RUST_LOG`), defaulting to `info`.
///
/// Safe to call more than once; subsequent calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
