use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::cart::CartView;
use crate::errors::AppError;
use crate::state::AppState;

use super::auth::AuthenticatedShopper;
use super::blocking;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub menu_item_id: Uuid,
    /// Defaults to 1.
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    pub menu_item_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLineResponse {
    pub menu_item_id: Uuid,
    pub quantity: i32,
    /// False once the item has been withdrawn from the menu.
    pub available: bool,
    pub name: Option<String>,
    /// Current menu price, not a snapshot.
    pub price: Option<String>,
    pub image: Option<String>,
    pub line_total: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartLineResponse>,
    pub subtotal: String,
}

impl From<CartView> for CartResponse {
    fn from(view: CartView) -> Self {
        Self {
            items: view
                .lines
                .into_iter()
                .map(|l| {
                    let line_total = l
                        .item
                        .as_ref()
                        .map(|i| (&i.price * BigDecimal::from(l.quantity)).to_string());
                    CartLineResponse {
                        menu_item_id: l.item_id,
                        quantity: l.quantity,
                        available: l.item.is_some(),
                        name: l.item.as_ref().map(|i| i.name.clone()),
                        price: l.item.as_ref().map(|i| i.price.to_string()),
                        image: l.item.and_then(|i| i.image),
                        line_total,
                    }
                })
                .collect(),
            subtotal: view.subtotal.to_string(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/user/cart
///
/// The cart joined with current menu data.
#[utoipa::path(
    get,
    path = "/api/user/cart",
    responses(
        (status = 200, description = "Current cart", body = CartResponse),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = [])),
    tag = "cart"
)]
pub async fn get_cart(
    state: web::Data<AppState>,
    shopper: AuthenticatedShopper,
) -> Result<HttpResponse, AppError> {
    let view = blocking(move || state.carts.get_cart(shopper.0)).await?;
    Ok(HttpResponse::Ok().json(CartResponse::from(view)))
}

/// POST /api/user/cart
#[utoipa::path(
    post,
    path = "/api/user/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Item added", body = CartResponse),
        (status = 400, description = "Quantity below 1"),
        (status = 404, description = "Menu item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "cart"
)]
pub async fn add_to_cart(
    state: web::Data<AppState>,
    shopper: AuthenticatedShopper,
    body: web::Json<AddToCartRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let view = blocking(move || {
        state
            .carts
            .add_item(shopper.0, body.menu_item_id, body.quantity)
    })
    .await?;
    Ok(HttpResponse::Ok().json(CartResponse::from(view)))
}

/// PUT /api/user/cart
#[utoipa::path(
    put,
    path = "/api/user/cart",
    request_body = UpdateCartRequest,
    responses(
        (status = 200, description = "Quantity replaced", body = CartResponse),
        (status = 400, description = "Quantity below 1"),
        (status = 404, description = "Item not in cart"),
    ),
    security(("bearer_auth" = [])),
    tag = "cart"
)]
pub async fn update_cart(
    state: web::Data<AppState>,
    shopper: AuthenticatedShopper,
    body: web::Json<UpdateCartRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let view = blocking(move || {
        state
            .carts
            .set_quantity(shopper.0, body.menu_item_id, body.quantity)
    })
    .await?;
    Ok(HttpResponse::Ok().json(CartResponse::from(view)))
}

/// DELETE /api/user/cart/{menu_item_id}
///
/// Removing an item that is not in the cart succeeds.
#[utoipa::path(
    delete,
    path = "/api/user/cart/{menu_item_id}",
    params(("menu_item_id" = Uuid, Path, description = "Menu item UUID")),
    responses(
        (status = 200, description = "Item removed", body = CartResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "cart"
)]
pub async fn remove_from_cart(
    state: web::Data<AppState>,
    shopper: AuthenticatedShopper,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let item_id = path.into_inner();
    let view = blocking(move || state.carts.remove_item(shopper.0, item_id)).await?;
    Ok(HttpResponse::Ok().json(CartResponse::from(view)))
}

/// DELETE /api/user/cart
#[utoipa::path(
    delete,
    path = "/api/user/cart",
    responses(
        (status = 200, description = "Cart emptied", body = CartResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "cart"
)]
pub async fn clear_cart(
    state: web::Data<AppState>,
    shopper: AuthenticatedShopper,
) -> Result<HttpResponse, AppError> {
    let view = blocking(move || state.carts.clear(shopper.0)).await?;
    Ok(HttpResponse::Ok().json(CartResponse::from(view)))
}
