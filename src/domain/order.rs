use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "preparing" => Some(OrderStatus::Preparing),
            "out_for_delivery" => Some(OrderStatus::OutForDelivery),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// The single legal forward step, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::OutForDelivery),
            OrderStatus::OutForDelivery => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cash" => Some(PaymentMethod::Cash),
            "card" => Some(PaymentMethod::Card),
            "upi" => Some(PaymentMethod::Upi),
            _ => None,
        }
    }

    /// Cash is collected on delivery; card and UPI are treated as settled once
    /// checkout is reached.
    pub fn initial_status(self) -> PaymentStatus {
        match self {
            PaymentMethod::Cash => PaymentStatus::Pending,
            PaymentMethod::Card | PaymentMethod::Upi => PaymentStatus::Completed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "completed" => Some(PaymentStatus::Completed),
            "failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }
}

/// A priced line frozen at checkout. Name and price never change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLineItem {
    pub item_id: Uuid,
    pub item_name: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
}

impl OrderLineItem {
    pub fn line_total(&self) -> BigDecimal {
        &self.unit_price * BigDecimal::from(self.quantity)
    }
}

/// An order that has been priced but not yet stored.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub shopper_id: Uuid,
    pub lines: Vec<OrderLineItem>,
    pub total_amount: BigDecimal,
    pub delivery_address: String,
    pub phone: String,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
}

impl OrderDraft {
    pub fn into_order(self, id: Uuid, created_at: DateTime<Utc>) -> Order {
        Order {
            id,
            shopper_id: self.shopper_id,
            lines: self.lines,
            total_amount: self.total_amount,
            delivery_address: self.delivery_address,
            phone: self.phone,
            payment_method: self.payment_method,
            payment_status: self.payment_status,
            status: OrderStatus::Pending,
            delivery_person: None,
            delivered_at: None,
            notes: self.notes,
            created_at,
            updated_at: created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub shopper_id: Uuid,
    pub lines: Vec<OrderLineItem>,
    pub total_amount: BigDecimal,
    pub delivery_address: String,
    pub phone: String,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub delivery_person: Option<Uuid>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn is_owned_by(&self, shopper_id: Uuid) -> bool {
        self.shopper_id == shopper_id
    }

    /// Moves the order to `cancelled` unless it already reached a terminal state.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::InvalidState(format!(
                "Cannot cancel order that is already {}",
                self.status.as_str()
            )));
        }
        self.status = OrderStatus::Cancelled;
        self.updated_at = now;
        Ok(())
    }

    /// Applies one forward lifecycle step performed by `actor`.
    pub fn advance_to(
        &mut self,
        target: OrderStatus,
        actor: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if self.status.next() != Some(target) {
            return Err(DomainError::InvalidState(format!(
                "Cannot move order from {} to {}",
                self.status.as_str(),
                target.as_str()
            )));
        }
        match target {
            OrderStatus::OutForDelivery => self.delivery_person = Some(actor),
            OrderStatus::Delivered => {
                self.delivered_at = Some(now);
                if self.payment_method == PaymentMethod::Cash {
                    self.payment_status = PaymentStatus::Completed;
                }
            }
            _ => {}
        }
        self.status = target;
        self.updated_at = now;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<Order>,
    pub total: i64,
}

/// Rows to skip for a 1-based `page`. `None` when the offset does not fit in
/// an `i64`; no stored page can start that far in.
pub fn page_offset(page: i64, limit: i64) -> Option<i64> {
    page.checked_sub(1)?.checked_mul(limit).filter(|o| *o >= 0)
}

#[cfg(test)]
pub(crate) fn sample_order(status: OrderStatus) -> Order {
    let draft = OrderDraft {
        shopper_id: Uuid::new_v4(),
        lines: vec![OrderLineItem {
            item_id: Uuid::new_v4(),
            item_name: "Masala Dosa".into(),
            unit_price: BigDecimal::from(90),
            quantity: 2,
        }],
        total_amount: BigDecimal::from(180),
        delivery_address: "12 MG Road".into(),
        phone: "9999999999".into(),
        payment_method: PaymentMethod::Cash,
        payment_status: PaymentStatus::Pending,
        notes: None,
    };
    let mut order = draft.into_order(Uuid::new_v4(), Utc::now());
    order.status = status;
    order
}
