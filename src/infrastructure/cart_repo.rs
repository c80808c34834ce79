use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::cart::{Cart, CartEntry};
use crate::domain::errors::DomainError;
use crate::domain::ports::{CartChange, CartRepository};
use crate::schema::cart_entries;

use super::lock_shopper;
use super::models::CartEntryRow;

pub struct DieselCartRepository {
    pool: DbPool,
}

impl DieselCartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Reads a shopper's cart on an existing connection, so checkout can read it
/// inside its own transaction.
pub(crate) fn load_cart(conn: &mut PgConnection, shopper_id: Uuid) -> Result<Cart, DomainError> {
    let rows = cart_entries::table
        .filter(cart_entries::shopper_id.eq(shopper_id))
        .order(cart_entries::position.asc())
        .select(CartEntryRow::as_select())
        .load(conn)?;
    Ok(Cart::from_entries(
        shopper_id,
        rows.into_iter().map(|r| CartEntry {
            item_id: r.menu_item_id,
            quantity: r.quantity,
        }),
    ))
}

pub(crate) fn delete_cart(conn: &mut PgConnection, shopper_id: Uuid) -> Result<usize, DomainError> {
    Ok(
        diesel::delete(cart_entries::table.filter(cart_entries::shopper_id.eq(shopper_id)))
            .execute(conn)?,
    )
}

fn write_cart(conn: &mut PgConnection, cart: &Cart) -> Result<(), DomainError> {
    let shopper_id = cart.shopper_id();
    delete_cart(conn, shopper_id)?;

    let rows: Vec<CartEntryRow> = cart
        .entries()
        .iter()
        .zip(0..)
        .map(|(e, position)| CartEntryRow {
            shopper_id,
            menu_item_id: e.item_id,
            quantity: e.quantity,
            position,
        })
        .collect();
    if !rows.is_empty() {
        diesel::insert_into(cart_entries::table)
            .values(&rows)
            .execute(conn)?;
    }
    Ok(())
}

impl CartRepository for DieselCartRepository {
    fn load(&self, shopper_id: Uuid) -> Result<Cart, DomainError> {
        let mut conn = self.pool.get()?;
        load_cart(&mut conn, shopper_id)
    }

    fn update(&self, shopper_id: Uuid, change: CartChange<'_>) -> Result<Cart, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // Held until commit, so the read below cannot go stale.
            lock_shopper(conn, shopper_id)?;
            let mut cart = load_cart(conn, shopper_id)?;
            change(&mut cart)?;
            write_cart(conn, &cart)?;
            Ok(cart)
        })
    }
}
