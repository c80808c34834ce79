use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::menu::{DietType, MenuItem};
use crate::domain::order::{Order, OrderLineItem, OrderStatus, PaymentMethod, PaymentStatus};
use crate::schema::{cart_entries, menu_items, order_lines, order_outbox, orders};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = menu_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MenuItemRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub category: String,
    pub diet_type: String,
    pub rating: f32,
    pub image: Option<String>,
    pub prep_time: Option<String>,
    pub popular: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<MenuItemRow> for MenuItem {
    type Error = DomainError;

    fn try_from(row: MenuItemRow) -> Result<Self, Self::Error> {
        let diet_type = DietType::parse(&row.diet_type).ok_or_else(|| {
            DomainError::Internal(format!("unknown diet type '{}'", row.diet_type))
        })?;
        Ok(MenuItem {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            category: row.category,
            diet_type,
            rating: row.rating,
            image: row.image,
            prep_time: row.prep_time,
            popular: row.popular,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = menu_items)]
pub struct NewMenuItemRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: &'a BigDecimal,
    pub category: &'a str,
    pub diet_type: &'a str,
    pub rating: f32,
    pub image: Option<&'a str>,
    pub prep_time: Option<&'a str>,
    pub popular: bool,
}

impl<'a> From<&'a MenuItem> for NewMenuItemRow<'a> {
    fn from(item: &'a MenuItem) -> Self {
        Self {
            id: item.id,
            name: &item.name,
            description: item.description.as_deref(),
            price: &item.price,
            category: &item.category,
            diet_type: item.diet_type.as_str(),
            rating: item.rating,
            image: item.image.as_deref(),
            prep_time: item.prep_time.as_deref(),
            popular: item.popular,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = cart_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartEntryRow {
    pub shopper_id: Uuid,
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub position: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub shopper_id: Uuid,
    pub total_amount: BigDecimal,
    pub delivery_address: String,
    pub phone: String,
    pub payment_method: String,
    pub payment_status: String,
    pub status: String,
    pub delivery_person: Option<Uuid>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRow {
    pub fn into_order(self, lines: Vec<OrderLineRow>) -> Result<Order, DomainError> {
        let corrupt = |what: &str, value: &str| {
            DomainError::Internal(format!("order {} has unknown {what} '{value}'", self.id))
        };
        let payment_method = PaymentMethod::parse(&self.payment_method)
            .ok_or_else(|| corrupt("payment method", &self.payment_method))?;
        let payment_status = PaymentStatus::parse(&self.payment_status)
            .ok_or_else(|| corrupt("payment status", &self.payment_status))?;
        let status =
            OrderStatus::parse(&self.status).ok_or_else(|| corrupt("status", &self.status))?;

        Ok(Order {
            id: self.id,
            shopper_id: self.shopper_id,
            lines: lines
                .into_iter()
                .map(|l| OrderLineItem {
                    item_id: l.menu_item_id,
                    item_name: l.item_name,
                    unit_price: l.unit_price,
                    quantity: l.quantity,
                })
                .collect(),
            total_amount: self.total_amount,
            delivery_address: self.delivery_address,
            phone: self.phone,
            payment_method,
            payment_status,
            status,
            delivery_person: self.delivery_person,
            delivered_at: self.delivered_at,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow<'a> {
    pub id: Uuid,
    pub shopper_id: Uuid,
    pub total_amount: &'a BigDecimal,
    pub delivery_address: &'a str,
    pub phone: &'a str,
    pub payment_method: &'a str,
    pub payment_status: &'a str,
    pub status: &'a str,
    pub notes: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Order> for NewOrderRow<'a> {
    fn from(order: &'a Order) -> Self {
        Self {
            id: order.id,
            shopper_id: order.shopper_id,
            total_amount: &order.total_amount,
            delivery_address: &order.delivery_address,
            phone: &order.phone,
            payment_method: order.payment_method.as_str(),
            payment_status: order.payment_status.as_str(),
            status: order.status.as_str(),
            notes: order.notes.as_deref(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

/// Columns a lifecycle transition may change.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = orders)]
#[diesel(treat_none_as_null = true)]
pub struct OrderTransitionRow<'a> {
    pub status: &'a str,
    pub payment_status: &'a str,
    pub delivery_person: Option<Uuid>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Order> for OrderTransitionRow<'a> {
    fn from(order: &'a Order) -> Self {
        Self {
            status: order.status.as_str(),
            payment_status: order.payment_status.as_str(),
            delivery_person: order.delivery_person,
            delivered_at: order.delivered_at,
            updated_at: order.updated_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_lines)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderLineRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub position: i32,
    pub menu_item_id: Uuid,
    pub item_name: String,
    pub unit_price: BigDecimal,
    pub quantity: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_lines)]
pub struct NewOrderLineRow<'a> {
    pub id: Uuid,
    pub order_id: Uuid,
    pub position: i32,
    pub menu_item_id: Uuid,
    pub item_name: &'a str,
    pub unit_price: &'a BigDecimal,
    pub quantity: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = order_outbox)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OutboxEventRow {
    pub id: Uuid,
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub event_type: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_outbox)]
pub struct NewOutboxEventRow {
    pub id: Uuid,
    pub aggregate_type: String,
    pub aggregate_id: String,
    pub event_type: String,
    pub payload: Value,
}
