use uuid::Uuid;

use super::cart::Cart;
use super::errors::DomainError;
use super::events::OrderEvent;
use super::identity::Principal;
use super::menu::{MenuFilter, MenuItem};
use super::order::{ListResult, Order, OrderDraft, OrderStatus};

/// Read-only access to the menu.
pub trait Catalog: Send + Sync + 'static {
    fn get_item(&self, id: Uuid) -> Result<Option<MenuItem>, DomainError>;
    fn list_items(&self, filter: &MenuFilter) -> Result<Vec<MenuItem>, DomainError>;
}

/// An edit applied to a freshly loaded cart. An error discards the edit.
pub type CartChange<'a> = Box<dyn FnOnce(&mut Cart) -> Result<(), DomainError> + 'a>;

pub trait CartRepository: Send + Sync + 'static {
    /// A shopper without stored entries has an empty cart.
    fn load(&self, shopper_id: Uuid) -> Result<Cart, DomainError>;
    /// Loads the shopper's cart, applies `change` and stores the result in full,
    /// as one step that excludes every other writer of that cart. Nothing is
    /// stored when `change` fails.
    fn update(&self, shopper_id: Uuid, change: CartChange<'_>) -> Result<Cart, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Stores the draft as a new order and clears the shopper's cart in one
    /// atomic step. Fails with `Conflict`, writing nothing, if the stored cart
    /// no longer matches `priced_cart`.
    fn place(&self, draft: OrderDraft, priced_cart: &Cart) -> Result<Order, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;
    /// Newest first.
    fn list_for_shopper(
        &self,
        shopper_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError>;
    /// Orders still in progress that are either unassigned or assigned to
    /// `courier_id`. Newest first.
    fn list_for_courier(
        &self,
        courier_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError>;
    /// Persists a transition of `order` away from `expected`, together with its
    /// outbox event. Fails with `Conflict` if the stored status is no longer
    /// `expected`.
    fn save_transition(
        &self,
        order: &Order,
        expected: OrderStatus,
        event: OrderEvent,
    ) -> Result<(), DomainError>;
}

pub trait IdentityVerifier: Send + Sync + 'static {
    fn verify(&self, credential: &str) -> Result<Principal, DomainError>;
}
