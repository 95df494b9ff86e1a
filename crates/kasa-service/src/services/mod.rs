//! # Services
//!
//! One service per concern, each a thin façade over the repositories:
//! validation at the edge, business rules in kasa-core, persistence in
//! kasa-db. All services are cheap to clone (they share the pool).

pub mod auth_service;
pub mod category_service;
pub mod checkout_service;
pub mod product_service;
pub mod report_service;
pub mod user_service;

pub use auth_service::{AuthService, LoginRequest, RegisterRequest, TokenResponse};
pub use category_service::CategoryService;
pub use checkout_service::{CheckoutItem, CheckoutRequest, CheckoutService, Receipt, ReceiptLine};
pub use product_service::ProductService;
pub use report_service::{ReportService, SummaryResponse};
pub use user_service::UserService;

use kasa_db::Database;

use crate::auth::JwtManager;
use crate::config::Config;

/// The full service registry, built once at startup.
#[derive(Debug, Clone)]
pub struct Services {
    pub checkout: CheckoutService,
    pub reports: ReportService,
    pub products: ProductService,
    pub categories: CategoryService,
    pub users: UserService,
    pub auth: AuthService,
}

impl Services {
    /// Wires every service to the shared database handle.
    pub fn new(db: Database, config: &Config) -> Self {
        let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_lifetime_secs);

        Services {
            checkout: CheckoutService::new(db.clone()),
            reports: ReportService::new(db.clone()),
            products: ProductService::new(db.clone()),
            categories: CategoryService::new(db.clone()),
            users: UserService::new(db.clone()),
            auth: AuthService::new(db, jwt),
        }
    }
}

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod test_support {
    use kasa_core::NewProduct;
    use kasa_db::{Database, DbConfig};

    /// Opens a fresh in-memory database with migrations applied.
    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory())
            .await
            .expect("in-memory database")
    }

    /// Inserts a product and returns its id.
    pub async fn seed_product(db: &Database, name: &str, price_cents: i64, stock: i64) -> i64 {
        db.products()
            .create(&NewProduct {
                name: name.to_string(),
                price_cents,
                stock,
                category_id: None,
            })
            .await
            .expect("seed product")
            .id
    }
}
