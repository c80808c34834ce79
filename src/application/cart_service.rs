use std::sync::Arc;

use uuid::Uuid;

use crate::domain::cart::{Cart, CartLine, CartView};
use crate::domain::errors::DomainError;
use crate::domain::ports::{CartRepository, Catalog};

use super::locks::ShopperLocks;

#[derive(Clone)]
pub struct CartService {
    catalog: Arc<dyn Catalog>,
    carts: Arc<dyn CartRepository>,
    locks: Arc<ShopperLocks>,
}

impl CartService {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        carts: Arc<dyn CartRepository>,
        locks: Arc<ShopperLocks>,
    ) -> Self {
        Self {
            catalog,
            carts,
            locks,
        }
    }

    pub fn get_cart(&self, shopper_id: Uuid) -> Result<CartView, DomainError> {
        let cart = self.carts.load(shopper_id)?;
        self.view(&cart)
    }

    pub fn add_item(
        &self,
        shopper_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<CartView, DomainError> {
        if self.catalog.get_item(item_id)?.is_none() {
            return Err(DomainError::NotFound("Menu item"));
        }
        let cart = self.mutate(shopper_id, |cart| cart.add(item_id, quantity))?;
        log::debug!("shopper {shopper_id} added {quantity} x {item_id}");
        self.view(&cart)
    }

    pub fn set_quantity(
        &self,
        shopper_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<CartView, DomainError> {
        let cart = self.mutate(shopper_id, |cart| cart.set_quantity(item_id, quantity))?;
        self.view(&cart)
    }

    pub fn remove_item(&self, shopper_id: Uuid, item_id: Uuid) -> Result<CartView, DomainError> {
        let cart = self.mutate(shopper_id, |cart| {
            cart.remove(item_id);
            Ok(())
        })?;
        self.view(&cart)
    }

    pub fn clear(&self, shopper_id: Uuid) -> Result<CartView, DomainError> {
        let cart = self.mutate(shopper_id, |cart| {
            cart.clear();
            Ok(())
        })?;
        self.view(&cart)
    }

    /// Applies `change` under the shopper's lock. The repository loads and
    /// stores in one atomic step, so other processes cannot interleave either.
    fn mutate<'a>(
        &self,
        shopper_id: Uuid,
        change: impl FnOnce(&mut Cart) -> Result<(), DomainError> + 'a,
    ) -> Result<Cart, DomainError> {
        self.locks
            .with_lock(shopper_id, || self.carts.update(shopper_id, Box::new(change)))
    }

    fn view(&self, cart: &Cart) -> Result<CartView, DomainError> {
        let lines = cart
            .entries()
            .iter()
            .map(|e| {
                Ok(CartLine {
                    item_id: e.item_id,
                    quantity: e.quantity,
                    item: self.catalog.get_item(e.item_id)?,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;
        Ok(CartView::new(cart.shopper_id(), lines))
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;

    use super::*;
    use crate::domain::menu::sample_item;
    use crate::infrastructure::memory::InMemoryStore;

    fn service(store: &Arc<InMemoryStore>) -> CartService {
        CartService::new(store.clone(), store.clone(), Arc::new(ShopperLocks::new()))
    }

    #[test]
    fn add_unknown_item_is_not_found_and_stores_nothing() {
        let store = Arc::new(InMemoryStore::new());
        let carts = service(&store);
        let shopper = Uuid::new_v4();

        let err = carts.add_item(shopper, Uuid::new_v4(), 1).unwrap_err();

        assert!(matches!(err, DomainError::NotFound("Menu item")));
        assert!(store.load(shopper).unwrap().is_empty());
    }

    #[test]
    fn add_twice_then_view_joins_live_catalog() {
        let store = Arc::new(InMemoryStore::new());
        let item = store.upsert_item(sample_item("Idli", "40"));
        let carts = service(&store);
        let shopper = Uuid::new_v4();

        carts.add_item(shopper, item.id, 1).unwrap();
        let view = carts.add_item(shopper, item.id, 2).unwrap();

        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].quantity, 3);
        assert_eq!(view.subtotal, BigDecimal::from(120));

        store.set_price(item.id, BigDecimal::from(50));
        let view = carts.get_cart(shopper).unwrap();
        assert_eq!(view.subtotal, BigDecimal::from(150));
    }

    #[test]
    fn set_quantity_zero_keeps_stored_entry() {
        let store = Arc::new(InMemoryStore::new());
        let item = store.upsert_item(sample_item("Vada", "30"));
        let carts = service(&store);
        let shopper = Uuid::new_v4();
        carts.add_item(shopper, item.id, 2).unwrap();

        let err = carts.set_quantity(shopper, item.id, 0).unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(store.load(shopper).unwrap().quantity_of(item.id), Some(2));
    }

    #[test]
    fn remove_and_clear() {
        let store = Arc::new(InMemoryStore::new());
        let a = store.upsert_item(sample_item("A", "10"));
        let b = store.upsert_item(sample_item("B", "20"));
        let carts = service(&store);
        let shopper = Uuid::new_v4();
        carts.add_item(shopper, a.id, 1).unwrap();
        carts.add_item(shopper, b.id, 1).unwrap();

        let view = carts.remove_item(shopper, a.id).unwrap();
        assert_eq!(view.lines.len(), 1);
        let view = carts.remove_item(shopper, a.id).unwrap();
        assert_eq!(view.lines.len(), 1);

        let view = carts.clear(shopper).unwrap();
        assert!(view.lines.is_empty());
        assert!(store.load(shopper).unwrap().is_empty());
    }

    #[test]
    fn view_marks_items_removed_from_catalog() {
        let store = Arc::new(InMemoryStore::new());
        let item = store.upsert_item(sample_item("Seasonal", "99"));
        let carts = service(&store);
        let shopper = Uuid::new_v4();
        carts.add_item(shopper, item.id, 1).unwrap();

        store.remove_item(item.id);
        let view = carts.get_cart(shopper).unwrap();

        assert_eq!(view.lines.len(), 1);
        assert!(view.lines[0].item.is_none());
        assert_eq!(view.subtotal, BigDecimal::from(0));
    }

    #[test]
    fn quantity_above_cap_is_rejected_and_stores_nothing() {
        let store = Arc::new(InMemoryStore::new());
        let item = store.upsert_item(sample_item("Biryani", "100.00"));
        let carts = service(&store);
        let shopper = Uuid::new_v4();

        let err = carts.add_item(shopper, item.id, 1_000_000_000).unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert!(store.load(shopper).unwrap().is_empty());
    }
}
