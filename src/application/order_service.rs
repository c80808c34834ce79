use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::events::OrderEvent;
use crate::domain::order::{ListResult, Order, OrderStatus};
use crate::domain::ports::{CartRepository, Catalog, OrderRepository};
use crate::domain::pricing::{build_order_draft, CheckoutRequest};

use super::locks::ShopperLocks;

#[derive(Clone)]
pub struct OrderService {
    catalog: Arc<dyn Catalog>,
    carts: Arc<dyn CartRepository>,
    orders: Arc<dyn OrderRepository>,
    locks: Arc<ShopperLocks>,
}

impl OrderService {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        carts: Arc<dyn CartRepository>,
        orders: Arc<dyn OrderRepository>,
        locks: Arc<ShopperLocks>,
    ) -> Self {
        Self {
            catalog,
            carts,
            orders,
            locks,
        }
    }

    /// Prices the shopper's cart, stores the order and empties the cart.
    ///
    /// The whole sequence runs under the shopper's lock; the store re-checks
    /// the cart inside its transaction so a concurrent writer elsewhere turns
    /// into `Conflict` rather than a second order.
    pub fn checkout(
        &self,
        shopper_id: Uuid,
        request: CheckoutRequest,
    ) -> Result<Order, DomainError> {
        self.locks.with_lock(shopper_id, || {
            let cart = self.carts.load(shopper_id)?;
            let draft = build_order_draft(&cart, &request, |id| self.catalog.get_item(id))
                .inspect_err(|e| log::warn!("checkout rejected for shopper {shopper_id}: {e}"))?;
            let order = self.orders.place(draft, &cart)?;
            log::info!(
                "order {} placed by shopper {} total={} lines={}",
                order.id,
                shopper_id,
                order.total_amount,
                order.lines.len()
            );
            Ok(order)
        })
    }

    pub fn list_orders(
        &self,
        shopper_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        self.orders.list_for_shopper(shopper_id, page, limit)
    }

    pub fn get_order(&self, order_id: Uuid, shopper_id: Uuid) -> Result<Order, DomainError> {
        let order = self
            .orders
            .find_by_id(order_id)?
            .ok_or(DomainError::NotFound("Order"))?;
        if !order.is_owned_by(shopper_id) {
            return Err(DomainError::Forbidden);
        }
        Ok(order)
    }

    pub fn cancel_order(&self, order_id: Uuid, shopper_id: Uuid) -> Result<Order, DomainError> {
        let mut order = self.get_order(order_id, shopper_id)?;
        let from = order.status;
        order
            .cancel(Utc::now())
            .inspect_err(|e| log::warn!("cancel of order {order_id} rejected: {e}"))?;
        self.orders
            .save_transition(&order, from, OrderEvent::Cancelled { from })?;
        log::info!("order {order_id} cancelled by shopper {shopper_id} (was {})", from.as_str());
        Ok(order)
    }

    /// Work queue for one courier: open orders nobody has taken yet plus the
    /// ones already assigned to them.
    pub fn list_courier_orders(
        &self,
        courier_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        self.orders.list_for_courier(courier_id, page, limit)
    }

    /// Forward lifecycle step driven by delivery staff.
    pub fn advance_status(
        &self,
        order_id: Uuid,
        courier_id: Uuid,
        target: OrderStatus,
    ) -> Result<Order, DomainError> {
        let mut order = self
            .orders
            .find_by_id(order_id)?
            .ok_or(DomainError::NotFound("Order"))?;
        if let Some(assignee) = order.delivery_person {
            if assignee != courier_id {
                return Err(DomainError::Forbidden);
            }
        }
        let from = order.status;
        order.advance_to(target, courier_id, Utc::now())?;
        self.orders
            .save_transition(&order, from, OrderEvent::StatusChanged { from })?;
        log::info!(
            "order {order_id} moved {} -> {} by courier {courier_id}",
            from.as_str(),
            target.as_str()
        );
        Ok(order)
    }
}
