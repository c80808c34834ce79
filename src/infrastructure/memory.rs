use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use bigdecimal::BigDecimal;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::cart::{Cart, CartEntry};
use crate::domain::errors::DomainError;
use crate::domain::events::OrderEvent;
use crate::domain::menu::{MenuFilter, MenuItem};
use crate::domain::order::{page_offset, ListResult, Order, OrderDraft, OrderStatus};
use crate::domain::ports::{CartChange, CartRepository, Catalog, OrderRepository};

#[derive(Debug, Clone)]
pub struct OutboxRecord {
    pub aggregate_id: Uuid,
    pub event_type: String,
    pub payload: Value,
}

#[derive(Default)]
struct State {
    items: HashMap<Uuid, MenuItem>,
    carts: HashMap<Uuid, Vec<CartEntry>>,
    /// Insertion order doubles as creation order.
    orders: Vec<Order>,
    outbox: Vec<OutboxRecord>,
}

/// Process-local implementation of every storage port. One lock guards all
/// state, so each port call is atomic.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn upsert_item(&self, item: MenuItem) -> MenuItem {
        self.state().items.insert(item.id, item.clone());
        item
    }

    pub fn set_price(&self, id: Uuid, price: BigDecimal) -> bool {
        match self.state().items.get_mut(&id) {
            Some(item) => {
                item.price = price;
                true
            }
            None => false,
        }
    }

    pub fn remove_item(&self, id: Uuid) -> bool {
        self.state().items.remove(&id).is_some()
    }

    pub fn outbox(&self) -> Vec<OutboxRecord> {
        self.state().outbox.clone()
    }

    pub fn events_for(&self, order_id: Uuid) -> Vec<String> {
        self.state()
            .outbox
            .iter()
            .filter(|r| r.aggregate_id == order_id)
            .map(|r| r.event_type.clone())
            .collect()
    }
}

fn record(order: &Order, event: OrderEvent) -> OutboxRecord {
    OutboxRecord {
        aggregate_id: order.id,
        event_type: event.event_type().to_string(),
        payload: event.payload(order),
    }
}

/// `orders` must be in insertion order.
fn newest_first_page<'a>(
    orders: impl DoubleEndedIterator<Item = &'a Order>,
    page: i64,
    limit: i64,
) -> ListResult {
    let matching: Vec<&Order> = orders.rev().collect();
    let total = matching.len() as i64;
    let Some(offset) = page_offset(page, limit).and_then(|o| usize::try_from(o).ok()) else {
        return ListResult {
            items: Vec::new(),
            total,
        };
    };
    let limit = usize::try_from(limit).unwrap_or(0);
    ListResult {
        total,
        items: matching.into_iter().skip(offset).take(limit).cloned().collect(),
    }
}

impl Catalog for InMemoryStore {
    fn get_item(&self, id: Uuid) -> Result<Option<MenuItem>, DomainError> {
        Ok(self.state().items.get(&id).cloned())
    }

    fn list_items(&self, filter: &MenuFilter) -> Result<Vec<MenuItem>, DomainError> {
        let mut items: Vec<MenuItem> = self
            .state()
            .items
            .values()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(items)
    }
}

fn stored_cart(state: &State, shopper_id: Uuid) -> Cart {
    Cart::from_entries(
        shopper_id,
        state.carts.get(&shopper_id).cloned().unwrap_or_default(),
    )
}

impl CartRepository for InMemoryStore {
    fn load(&self, shopper_id: Uuid) -> Result<Cart, DomainError> {
        Ok(stored_cart(&self.state(), shopper_id))
    }

    fn update(&self, shopper_id: Uuid, change: CartChange<'_>) -> Result<Cart, DomainError> {
        let mut state = self.state();
        let mut cart = stored_cart(&state, shopper_id);
        change(&mut cart)?;
        if cart.is_empty() {
            state.carts.remove(&shopper_id);
        } else {
            state.carts.insert(shopper_id, cart.entries().to_vec());
        }
        Ok(cart)
    }
}

impl OrderRepository for InMemoryStore {
    fn place(&self, draft: OrderDraft, priced_cart: &Cart) -> Result<Order, DomainError> {
        let mut state = self.state();
        let shopper_id = draft.shopper_id;
        let stored = stored_cart(&state, shopper_id);
        if !stored.same_contents(priced_cart) {
            return Err(DomainError::Conflict(
                "Cart changed during checkout".into(),
            ));
        }

        let order = draft.into_order(Uuid::new_v4(), Utc::now());
        state.orders.push(order.clone());
        state.carts.remove(&shopper_id);
        state.outbox.push(record(&order, OrderEvent::Placed));
        Ok(order)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(self.state().orders.iter().find(|o| o.id == id).cloned())
    }

    fn list_for_shopper(
        &self,
        shopper_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        let state = self.state();
        Ok(newest_first_page(
            state.orders.iter().filter(|o| o.shopper_id == shopper_id),
            page,
            limit,
        ))
    }

    fn list_for_courier(
        &self,
        courier_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        let state = self.state();
        Ok(newest_first_page(
            state.orders.iter().filter(|o| {
                !o.status.is_terminal()
                    && o.delivery_person.map_or(true, |c| c == courier_id)
            }),
            page,
            limit,
        ))
    }

    fn save_transition(
        &self,
        order: &Order,
        expected: OrderStatus,
        event: OrderEvent,
    ) -> Result<(), DomainError> {
        let mut state = self.state();
        let stored = state
            .orders
            .iter_mut()
            .find(|o| o.id == order.id)
            .ok_or(DomainError::NotFound("Order"))?;
        if stored.status != expected {
            return Err(DomainError::Conflict(
                "Order status changed concurrently".into(),
            ));
        }
        *stored = order.clone();
        state.outbox.push(record(order, event));
        Ok(())
    }
}
