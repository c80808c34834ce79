use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::menu::DietType;
use crate::domain::order::{OrderStatus, PaymentMethod, PaymentStatus};
use crate::handlers::{cart, delivery, menu, orders};

#[derive(OpenApi)]
#[openapi(
    paths(
        menu::list_menu_items,
        menu::get_menu_item,
        cart::get_cart,
        cart::add_to_cart,
        cart::update_cart,
        cart::remove_from_cart,
        cart::clear_cart,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        orders::cancel_order,
        delivery::list_assigned_orders,
        delivery::update_order_status,
    ),
    components(schemas(
        DietType,
        OrderStatus,
        PaymentMethod,
        PaymentStatus,
        menu::MenuItemResponse,
        cart::AddToCartRequest,
        cart::UpdateCartRequest,
        cart::CartResponse,
        cart::CartLineResponse,
        orders::CreateOrderRequest,
        orders::OrderResponse,
        orders::OrderLineResponse,
        orders::ListOrdersResponse,
        delivery::UpdateStatusRequest,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "menu", description = "Read-only menu"),
        (name = "cart", description = "Shopper cart"),
        (name = "orders", description = "Checkout and order history"),
        (name = "delivery", description = "Order progression by delivery staff"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
