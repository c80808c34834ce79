use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::cart::Cart;
use super::errors::DomainError;
use super::menu::MenuItem;
use super::order::{OrderDraft, OrderLineItem, PaymentMethod};

/// Checkout details as supplied by the shopper, before validation.
#[derive(Debug, Clone, Default)]
pub struct CheckoutRequest {
    pub delivery_address: Option<String>,
    pub phone: Option<String>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

struct CheckoutDetails {
    delivery_address: String,
    phone: String,
    payment_method: PaymentMethod,
    notes: Option<String>,
}

fn required(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn validate(request: &CheckoutRequest) -> Result<CheckoutDetails, DomainError> {
    let (Some(delivery_address), Some(phone), Some(method)) = (
        required(&request.delivery_address),
        required(&request.phone),
        required(&request.payment_method),
    ) else {
        return Err(DomainError::Validation("Missing required fields".into()));
    };
    let payment_method = PaymentMethod::parse(&method).ok_or_else(|| {
        DomainError::Validation(format!("Unsupported payment method '{method}'"))
    })?;
    Ok(CheckoutDetails {
        delivery_address,
        phone,
        payment_method,
        notes: required(&request.notes),
    })
}

/// Prices `cart` against the catalog and freezes each item's name and price
/// into the returned draft.
///
/// Fails with `Validation` for bad checkout details, `EmptyCart` when there is
/// nothing to order, and `NotFound` when any entry references an item that has
/// left the catalog.
pub fn build_order_draft<F>(
    cart: &Cart,
    request: &CheckoutRequest,
    mut lookup: F,
) -> Result<OrderDraft, DomainError>
where
    F: FnMut(Uuid) -> Result<Option<MenuItem>, DomainError>,
{
    let details = validate(request)?;
    if cart.is_empty() {
        return Err(DomainError::EmptyCart);
    }

    let mut lines = Vec::with_capacity(cart.entries().len());
    for entry in cart.entries() {
        let item = lookup(entry.item_id)?.ok_or(DomainError::NotFound("Menu item"))?;
        lines.push(OrderLineItem {
            item_id: item.id,
            item_name: item.name,
            unit_price: item.price,
            quantity: entry.quantity,
        });
    }
    let total_amount = lines
        .iter()
        .map(OrderLineItem::line_total)
        .fold(BigDecimal::from(0), |acc, t| acc + t);

    Ok(OrderDraft {
        shopper_id: cart.shopper_id(),
        lines,
        total_amount,
        delivery_address: details.delivery_address,
        phone: details.phone,
        payment_method: details.payment_method,
        payment_status: details.payment_method.initial_status(),
        notes: details.notes,
    })
}
