use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::errors::DomainError;
use super::menu::MenuItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartEntry {
    pub item_id: Uuid,
    pub quantity: i32,
}

/// A shopper's working cart: at most one entry per item, every quantity >= 1.
///
/// Entries keep the order in which items were first added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    shopper_id: Uuid,
    entries: Vec<CartEntry>,
}

impl Cart {
    pub fn empty(shopper_id: Uuid) -> Self {
        Self {
            shopper_id,
            entries: Vec::new(),
        }
    }

    /// Rebuilds a cart from stored rows, merging duplicate items and dropping
    /// non-positive quantities so a loaded cart always satisfies the invariants.
    pub fn from_entries(shopper_id: Uuid, rows: impl IntoIterator<Item = CartEntry>) -> Self {
        let mut cart = Self::empty(shopper_id);
        for row in rows {
            if row.quantity < 1 {
                continue;
            }
            match cart.entry_mut(row.item_id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(row.quantity)
                }
                None => cart.entries.push(row),
            }
        }
        cart
    }

    pub fn shopper_id(&self) -> Uuid {
        self.shopper_id
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn quantity_of(&self, item_id: Uuid) -> Option<i32> {
        self.entries
            .iter()
            .find(|e| e.item_id == item_id)
            .map(|e| e.quantity)
    }

    pub fn add(&mut self, item_id: Uuid, quantity: i32) -> Result<(), DomainError> {
        validate_quantity(quantity)?;
        match self.entry_mut(item_id) {
            Some(entry) => {
                let total = entry.quantity.saturating_add(quantity);
                validate_quantity(total)?;
                entry.quantity = total;
            }
            None => self.entries.push(CartEntry { item_id, quantity }),
        }
        Ok(())
    }

    pub fn set_quantity(&mut self, item_id: Uuid, quantity: i32) -> Result<(), DomainError> {
        validate_quantity(quantity)?;
        let entry = self
            .entry_mut(item_id)
            .ok_or(DomainError::NotFound("Cart item"))?;
        entry.quantity = quantity;
        Ok(())
    }

    /// Removing an item that is not in the cart is a no-op.
    pub fn remove(&mut self, item_id: Uuid) {
        self.entries.retain(|e| e.item_id != item_id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// True when both carts hold the same items in the same quantities,
    /// regardless of entry order.
    pub fn same_contents(&self, other: &Cart) -> bool {
        self.shopper_id == other.shopper_id
            && self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|e| other.quantity_of(e.item_id) == Some(e.quantity))
    }

    fn entry_mut(&mut self, item_id: Uuid) -> Option<&mut CartEntry> {
        self.entries.iter_mut().find(|e| e.item_id == item_id)
    }
}

/// Largest quantity a single cart line may hold.
pub const MAX_LINE_QUANTITY: i32 = 1000;

fn validate_quantity(quantity: i32) -> Result<(), DomainError> {
    if quantity < 1 {
        return Err(DomainError::Validation(
            "Quantity must be at least 1".into(),
        ));
    }
    if quantity > MAX_LINE_QUANTITY {
        return Err(DomainError::Validation(format!(
            "Quantity must be at most {MAX_LINE_QUANTITY}"
        )));
    }
    Ok(())
}

/// One cart entry joined with the live catalog. `item` is `None` when the
/// referenced menu item no longer exists.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub item_id: Uuid,
    pub quantity: i32,
    pub item: Option<MenuItem>,
}

/// Display projection of a cart. Prices are live, not snapshotted.
#[derive(Debug, Clone)]
pub struct CartView {
    pub shopper_id: Uuid,
    pub lines: Vec<CartLine>,
    pub subtotal: BigDecimal,
}

impl CartView {
    pub fn new(shopper_id: Uuid, lines: Vec<CartLine>) -> Self {
        let subtotal = lines
            .iter()
            .filter_map(|l| l.item.as_ref().map(|i| &i.price * BigDecimal::from(l.quantity)))
            .fold(BigDecimal::from(0), |acc, t| acc + t);
        Self {
            shopper_id,
            lines,
            subtotal,
        }
    }
}
