use std::sync::Arc;

use crate::application::cart_service::CartService;
use crate::application::locks::ShopperLocks;
use crate::application::order_service::OrderService;
use crate::db::DbPool;
use crate::domain::ports::{CartRepository, Catalog, IdentityVerifier, OrderRepository};
use crate::infrastructure::cart_repo::DieselCartRepository;
use crate::infrastructure::catalog_repo::DieselCatalog;
use crate::infrastructure::order_repo::DieselOrderRepository;

/// Everything a request handler needs, shared across workers.
pub struct AppState {
    pub catalog: Arc<dyn Catalog>,
    pub carts: CartService,
    pub orders: OrderService,
    pub identity: Arc<dyn IdentityVerifier>,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        carts: Arc<dyn CartRepository>,
        orders: Arc<dyn OrderRepository>,
        identity: Arc<dyn IdentityVerifier>,
    ) -> Self {
        let locks = Arc::new(ShopperLocks::new());
        Self {
            carts: CartService::new(catalog.clone(), carts.clone(), locks.clone()),
            orders: OrderService::new(catalog.clone(), carts, orders, locks),
            catalog,
            identity,
        }
    }

    pub fn with_postgres(pool: DbPool, identity: Arc<dyn IdentityVerifier>) -> Self {
        Self::new(
            Arc::new(DieselCatalog::new(pool.clone())),
            Arc::new(DieselCartRepository::new(pool.clone())),
            Arc::new(DieselOrderRepository::new(pool)),
            identity,
        )
    }
}
