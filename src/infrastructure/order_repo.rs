use chrono::{SubsecRound, Utc};
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::cart::Cart;
use crate::domain::errors::DomainError;
use crate::domain::events::OrderEvent;
use crate::domain::order::{page_offset, ListResult, Order, OrderDraft, OrderStatus};
use crate::domain::ports::OrderRepository;
use crate::schema::{order_lines, order_outbox, orders};

use super::cart_repo::{delete_cart, load_cart};
use super::lock_shopper;
use super::models::{
    NewOrderLineRow, NewOrderRow, NewOutboxEventRow, OrderLineRow, OrderRow, OrderTransitionRow,
};

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn insert_event(
    conn: &mut PgConnection,
    order: &Order,
    event: OrderEvent,
) -> Result<(), DomainError> {
    // The relay derives the topic from `aggregate_type`.
    diesel::insert_into(order_outbox::table)
        .values(&NewOutboxEventRow {
            id: Uuid::new_v4(),
            aggregate_type: OrderEvent::AGGREGATE_TYPE.to_string(),
            aggregate_id: order.id.to_string(),
            event_type: event.event_type().to_string(),
            payload: event.payload(order),
        })
        .execute(conn)?;
    Ok(())
}

fn load_lines(conn: &mut PgConnection, order_id: Uuid) -> Result<Vec<OrderLineRow>, DomainError> {
    Ok(order_lines::table
        .filter(order_lines::order_id.eq(order_id))
        .order(order_lines::position.asc())
        .select(OrderLineRow::as_select())
        .load(conn)?)
}

/// One newest-first page of the orders selected by `query`, with their lines.
fn list_page(
    conn: &mut PgConnection,
    query: impl Fn() -> orders::BoxedQuery<'static, Pg>,
    page: i64,
    limit: i64,
) -> Result<ListResult, DomainError> {
    let total: i64 = query().count().get_result(conn)?;
    let Some(offset) = page_offset(page, limit) else {
        return Ok(ListResult {
            items: Vec::new(),
            total,
        });
    };

    let rows = query()
        .select(OrderRow::as_select())
        .order((orders::created_at.desc(), orders::id.desc()))
        .limit(limit)
        .offset(offset)
        .load(conn)?;

    let lines = OrderLineRow::belonging_to(&rows)
        .select(OrderLineRow::as_select())
        .order(order_lines::position.asc())
        .load(conn)?
        .grouped_by(&rows);

    let items = rows
        .into_iter()
        .zip(lines)
        .map(|(order, lines)| order.into_order(lines))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ListResult { items, total })
}

impl OrderRepository for DieselOrderRepository {
    fn place(&self, draft: OrderDraft, priced_cart: &Cart) -> Result<Order, DomainError> {
        let mut conn = self.pool.get()?;
        let shopper_id = draft.shopper_id;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Re-read the cart under the shopper lock; it must be the one
            //    that was priced.
            lock_shopper(conn, shopper_id)?;
            let stored = load_cart(conn, shopper_id)?;
            if !stored.same_contents(priced_cart) {
                return Err(DomainError::Conflict(
                    "Cart changed during checkout".into(),
                ));
            }

            // 2. Insert the order and its snapshotted lines
            let order = draft.into_order(Uuid::new_v4(), Utc::now().trunc_subsecs(6));
            diesel::insert_into(orders::table)
                .values(&NewOrderRow::from(&order))
                .execute(conn)?;

            {
                let new_lines: Vec<NewOrderLineRow> = order
                    .lines
                    .iter()
                    .zip(0..)
                    .map(|(l, position)| NewOrderLineRow {
                        id: Uuid::new_v4(),
                        order_id: order.id,
                        position,
                        menu_item_id: l.item_id,
                        item_name: &l.item_name,
                        unit_price: &l.unit_price,
                        quantity: l.quantity,
                    })
                    .collect();
                diesel::insert_into(order_lines::table)
                    .values(&new_lines)
                    .execute(conn)?;
            }

            // 3. Outbox event and cart removal commit with the order or not at all
            insert_event(conn, &order, OrderEvent::Placed)?;
            delete_cart(conn, shopper_id)?;

            Ok(order)
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let lines = load_lines(&mut conn, order.id)?;
        order.into_order(lines).map(Some)
    }

    fn list_for_shopper(
        &self,
        shopper_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        let mut conn = self.pool.get()?;
        conn.transaction(|conn| {
            list_page(
                conn,
                || orders::table.filter(orders::shopper_id.eq(shopper_id)).into_boxed(),
                page,
                limit,
            )
        })
    }

    fn list_for_courier(
        &self,
        courier_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<ListResult, DomainError> {
        let mut conn = self.pool.get()?;
        let closed = vec![
            OrderStatus::Delivered.as_str(),
            OrderStatus::Cancelled.as_str(),
        ];
        conn.transaction(|conn| {
            list_page(
                conn,
                || {
                    orders::table
                        .filter(orders::status.ne_all(closed.clone()))
                        .filter(
                            orders::delivery_person
                                .is_null()
                                .or(orders::delivery_person.eq(courier_id)),
                        )
                        .into_boxed()
                },
                page,
                limit,
            )
        })
    }

    fn save_transition(
        &self,
        order: &Order,
        expected: OrderStatus,
        event: OrderEvent,
    ) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let updated = diesel::update(
                orders::table
                    .filter(orders::id.eq(order.id))
                    .filter(orders::status.eq(expected.as_str())),
            )
            .set(&OrderTransitionRow::from(order))
            .execute(conn)?;

            if updated == 0 {
                let exists: i64 = orders::table
                    .filter(orders::id.eq(order.id))
                    .count()
                    .get_result(conn)?;
                return Err(if exists == 0 {
                    DomainError::NotFound("Order")
                } else {
                    DomainError::Conflict("Order status changed concurrently".into())
                });
            }

            insert_event(conn, order, event)
        })
    }
}
