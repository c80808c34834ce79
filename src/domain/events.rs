use serde_json::{json, Value};

use super::order::{Order, OrderStatus};

/// Lifecycle facts recorded in the outbox alongside the state change that
/// produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderEvent {
    Placed,
    Cancelled { from: OrderStatus },
    StatusChanged { from: OrderStatus },
}

impl OrderEvent {
    pub const AGGREGATE_TYPE: &'static str = "Order";

    pub fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::Placed => "OrderPlaced",
            OrderEvent::Cancelled { .. } => "OrderCancelled",
            OrderEvent::StatusChanged { .. } => "OrderStatusChanged",
        }
    }

    pub fn payload(&self, order: &Order) -> Value {
        match self {
            OrderEvent::Placed => {
                let lines: Vec<Value> = order
                    .lines
                    .iter()
                    .map(|l| {
                        json!({
                            "item_id": l.item_id,
                            "name": l.item_name,
                            "quantity": l.quantity,
                            "unit_price": l.unit_price.to_string()
                        })
                    })
                    .collect();
                json!({
                    "order_id": order.id,
                    "shopper_id": order.shopper_id,
                    "status": order.status.as_str(),
                    "payment_method": order.payment_method.as_str(),
                    "payment_status": order.payment_status.as_str(),
                    "total_amount": order.total_amount.to_string(),
                    "lines": lines
                })
            }
            OrderEvent::Cancelled { from } | OrderEvent::StatusChanged { from } => json!({
                "order_id": order.id,
                "shopper_id": order.shopper_id,
                "from": from.as_str(),
                "status": order.status.as_str(),
                "delivery_person": order.delivery_person
            }),
        }
    }
}
