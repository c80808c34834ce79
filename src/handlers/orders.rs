use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::order::{Order, OrderStatus, PaymentMethod, PaymentStatus};
use crate::domain::pricing::CheckoutRequest;
use crate::errors::AppError;
use crate::state::AppState;

use super::auth::AuthenticatedShopper;
use super::blocking;

// ── Request / response DTOs ──────────────────────────────────────────────────

/// Fields are optional on the wire so that a missing one is reported as a
/// validation error rather than a parse failure.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub delivery_address: Option<String>,
    pub phone: Option<String>,
    /// One of `cash`, `card`, `upi`
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

impl From<CreateOrderRequest> for CheckoutRequest {
    fn from(body: CreateOrderRequest) -> Self {
        CheckoutRequest {
            delivery_address: body.delivery_address,
            phone: body.phone,
            payment_method: body.payment_method,
            notes: body.notes,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineResponse {
    pub menu_item_id: Uuid,
    /// Item name at the time the order was placed
    pub name: String,
    /// Unit price at the time the order was placed, e.g. "9.99"
    pub unit_price: String,
    pub quantity: i32,
    pub line_total: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub shopper_id: Uuid,
    pub items: Vec<OrderLineResponse>,
    pub total_amount: String,
    pub delivery_address: String,
    pub phone: String,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub delivery_person: Option<Uuid>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            shopper_id: order.shopper_id,
            items: order
                .lines
                .into_iter()
                .map(|l| OrderLineResponse {
                    line_total: l.line_total().to_string(),
                    menu_item_id: l.item_id,
                    name: l.item_name,
                    unit_price: l.unit_price.to_string(),
                    quantity: l.quantity,
                })
                .collect(),
            total_amount: order.total_amount.to_string(),
            delivery_address: order.delivery_address,
            phone: order.phone,
            payment_method: order.payment_method,
            payment_status: order.payment_status,
            status: order.status,
            delivery_person: order.delivery_person,
            delivered_at: order.delivered_at,
            notes: order.notes,
            created_at: order.created_at,
        }
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl ListOrdersParams {
    /// `(page, limit)` with page at least 1 and limit within 1..=100.
    pub fn clamped(&self) -> (i64, i64) {
        (self.page.max(1), self.limit.clamp(1, 100))
    }
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/user/orders
///
/// Checks out the caller's cart. Prices are copied from the menu into the
/// order, and the order, its lines, an outbox event and the cart removal are
/// committed together.
#[utoipa::path(
    post,
    path = "/api/user/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Missing fields, bad payment method or empty cart"),
        (status = 404, description = "A cart item is no longer on the menu"),
        (status = 409, description = "Cart changed during checkout"),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    shopper: AuthenticatedShopper,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let request = CheckoutRequest::from(body.into_inner());
    let order = blocking(move || state.orders.checkout(shopper.0, request)).await?;
    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /api/user/orders
///
/// The caller's orders, newest first.
#[utoipa::path(
    get,
    path = "/api/user/orders",
    params(ListOrdersParams),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    shopper: AuthenticatedShopper,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let (page, limit) = query.clamped();

    let result = blocking(move || state.orders.list_orders(shopper.0, page, limit)).await?;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.into_iter().map(Into::into).collect(),
        total: result.total,
        page,
        limit,
    }))
}

/// GET /api/user/orders/{order_id}
#[utoipa::path(
    get,
    path = "/api/user/orders/{order_id}",
    params(("order_id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 403, description = "Order belongs to another shopper"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    shopper: AuthenticatedShopper,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let order = blocking(move || state.orders.get_order(order_id, shopper.0)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PUT /api/user/orders/{order_id}/cancel
#[utoipa::path(
    put,
    path = "/api/user/orders/{order_id}/cancel",
    params(("order_id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order cancelled", body = OrderResponse),
        (status = 400, description = "Order already delivered or cancelled"),
        (status = 403, description = "Order belongs to another shopper"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "orders"
)]
pub async fn cancel_order(
    state: web::Data<AppState>,
    shopper: AuthenticatedShopper,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let order = blocking(move || state.orders.cancel_order(order_id, shopper.0)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}
