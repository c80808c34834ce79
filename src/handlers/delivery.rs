use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::order::OrderStatus;
use crate::errors::AppError;
use crate::state::AppState;

use super::auth::AuthenticatedCourier;
use super::blocking;
use super::orders::{ListOrdersParams, ListOrdersResponse, OrderResponse};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// GET /api/delivery/orders
///
/// Open orders the caller can pick up or has already taken, newest first.
#[utoipa::path(
    get,
    path = "/api/delivery/orders",
    params(ListOrdersParams),
    responses(
        (status = 200, description = "Paginated courier work queue", body = ListOrdersResponse),
        (status = 403, description = "Caller is not delivery staff"),
    ),
    security(("bearer_auth" = [])),
    tag = "delivery"
)]
pub async fn list_assigned_orders(
    state: web::Data<AppState>,
    courier: AuthenticatedCourier,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let (page, limit) = query.clamped();
    let result =
        blocking(move || state.orders.list_courier_orders(courier.0, page, limit)).await?;

    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.items.into_iter().map(Into::into).collect(),
        total: result.total,
        page,
        limit,
    }))
}

/// PUT /api/delivery/orders/{order_id}/status
///
/// Moves an order one step forward. Taking it out for delivery assigns it to
/// the caller; after that only the assignee may move it.
#[utoipa::path(
    put,
    path = "/api/delivery/orders/{order_id}/status",
    params(("order_id" = Uuid, Path, description = "Order UUID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status advanced", body = OrderResponse),
        (status = 400, description = "Not the next status in the lifecycle"),
        (status = 403, description = "Order assigned to another courier"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "delivery"
)]
pub async fn update_order_status(
    state: web::Data<AppState>,
    courier: AuthenticatedCourier,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let target = body.into_inner().status;
    let order = blocking(move || state.orders.advance_status(order_id, courier.0, target)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}
