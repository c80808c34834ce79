//! HTTP-level tests over the in-memory store. No database required.

use std::str::FromStr;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use bigdecimal::BigDecimal;
use chrono::Duration;
use quickbite_orders::configure;
use quickbite_orders::domain::identity::Role;
use quickbite_orders::domain::menu::{DietType, MenuItem};
use quickbite_orders::infrastructure::jwt::JwtVerifier;
use quickbite_orders::infrastructure::memory::InMemoryStore;
use quickbite_orders::AppState;
use serde_json::{json, Value};
use uuid::Uuid;

const SECRET: &str = "api-test-secret";

struct Fixture {
    store: Arc<InMemoryStore>,
    state: web::Data<AppState>,
    jwt: JwtVerifier,
}

impl Fixture {
    fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let state = web::Data::new(AppState::new(
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(JwtVerifier::new(SECRET)),
        ));
        Self {
            store,
            state,
            jwt: JwtVerifier::new(SECRET),
        }
    }

    fn token(&self, id: Uuid, role: Role) -> String {
        let token = self.jwt.issue(id, role, Duration::hours(1)).unwrap();
        format!("Bearer {token}")
    }

    fn add_menu_item(&self, name: &str, price: &str) -> MenuItem {
        self.store.upsert_item(MenuItem {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            price: BigDecimal::from_str(price).unwrap(),
            category: "mains".to_string(),
            diet_type: DietType::Veg,
            rating: 4.5,
            image: None,
            prep_time: Some("20 min".to_string()),
            popular: true,
        })
    }
}

fn decimal(v: &Value) -> BigDecimal {
    BigDecimal::from_str(v.as_str().unwrap()).unwrap()
}

fn checkout_body() -> Value {
    json!({
        "deliveryAddress": "12 Elm Street",
        "phone": "555-0100",
        "paymentMethod": "cash"
    })
}

macro_rules! app {
    ($fx:expr) => {
        test::init_service(App::new().app_data($fx.state.clone()).configure(configure)).await
    };
}

#[actix_web::test]
async fn health_check_responds() {
    let fx = Fixture::new();
    let app = app!(fx);

    let body: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(body["message"], "QuickBite API is running!");
}

#[actix_web::test]
async fn cart_requires_a_token() {
    let fx = Fixture::new();
    let app = app!(fx);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/user/cart").to_request()).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "No token, authorization denied.");
}

#[actix_web::test]
async fn forged_token_is_unauthorized() {
    let fx = Fixture::new();
    let app = app!(fx);
    let forged = JwtVerifier::new("other")
        .issue(Uuid::new_v4(), Role::User, Duration::hours(1))
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/user/cart")
        .insert_header(("Authorization", format!("Bearer {forged}")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn courier_cannot_use_shopper_routes_and_vice_versa() {
    let fx = Fixture::new();
    let app = app!(fx);

    let req = test::TestRequest::get()
        .uri("/api/user/orders")
        .insert_header(("Authorization", fx.token(Uuid::new_v4(), Role::Delivery)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/api/delivery/orders/{}/status", Uuid::new_v4()))
        .insert_header(("Authorization", fx.token(Uuid::new_v4(), Role::User)))
        .set_json(json!({ "status": "confirmed" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn menu_filters_by_type_and_rejects_unknown_type() {
    let fx = Fixture::new();
    fx.add_menu_item("Paneer Tikka", "180.00");
    let app = app!(fx);
    let auth = fx.token(Uuid::new_v4(), Role::User);

    let req = test::TestRequest::get()
        .uri("/api/user/menu-items?type=veg")
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["type"], "veg");

    let req = test::TestRequest::get()
        .uri("/api/user/menu-items?type=vegan")
        .insert_header(("Authorization", auth))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn cart_then_checkout_places_order_and_empties_cart() {
    let fx = Fixture::new();
    let burger = fx.add_menu_item("Burger", "125.00");
    let app = app!(fx);
    let auth = fx.token(Uuid::new_v4(), Role::User);

    let req = test::TestRequest::post()
        .uri("/api/user/cart")
        .insert_header(("Authorization", auth.clone()))
        .set_json(json!({ "menuItemId": burger.id, "quantity": 2 }))
        .to_request();
    let cart: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(cart["items"][0]["quantity"], 2);
    assert_eq!(decimal(&cart["subtotal"]), BigDecimal::from(250));

    let req = test::TestRequest::post()
        .uri("/api/user/orders")
        .insert_header(("Authorization", auth.clone()))
        .set_json(checkout_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = test::read_body_json(resp).await;
    assert_eq!(decimal(&order["totalAmount"]), BigDecimal::from(250));
    assert_eq!(order["status"], "pending");
    assert_eq!(order["paymentStatus"], "pending");
    assert_eq!(order["items"][0]["name"], "Burger");

    let order_id = Uuid::parse_str(order["id"].as_str().unwrap()).unwrap();
    assert_eq!(fx.store.events_for(order_id), vec!["OrderPlaced"]);

    let req = test::TestRequest::get()
        .uri("/api/user/cart")
        .insert_header(("Authorization", auth))
        .to_request();
    let cart: Value = test::call_and_read_body_json(&app, req).await;
    assert!(cart["items"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn checkout_with_empty_cart_is_bad_request() {
    let fx = Fixture::new();
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/api/user/orders")
        .insert_header(("Authorization", fx.token(Uuid::new_v4(), Role::User)))
        .set_json(checkout_body())
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Cart is empty");
}

#[actix_web::test]
async fn checkout_without_address_is_bad_request() {
    let fx = Fixture::new();
    let item = fx.add_menu_item("Dosa", "90.00");
    let app = app!(fx);
    let auth = fx.token(Uuid::new_v4(), Role::User);

    let req = test::TestRequest::post()
        .uri("/api/user/cart")
        .insert_header(("Authorization", auth.clone()))
        .set_json(json!({ "menuItemId": item.id }))
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    let req = test::TestRequest::post()
        .uri("/api/user/orders")
        .insert_header(("Authorization", auth))
        .set_json(json!({ "phone": "555-0100", "paymentMethod": "card" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn malformed_json_is_reported_as_error_body() {
    let fx = Fixture::new();
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/api/user/cart")
        .insert_header(("Authorization", fx.token(Uuid::new_v4(), Role::User)))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn other_shoppers_order_is_forbidden() {
    let fx = Fixture::new();
    let item = fx.add_menu_item("Naan", "40.00");
    let app = app!(fx);
    let owner = fx.token(Uuid::new_v4(), Role::User);

    let req = test::TestRequest::post()
        .uri("/api/user/cart")
        .insert_header(("Authorization", owner.clone()))
        .set_json(json!({ "menuItemId": item.id }))
        .to_request();
    test::call_service(&app, req).await;
    let req = test::TestRequest::post()
        .uri("/api/user/orders")
        .insert_header(("Authorization", owner))
        .set_json(checkout_body())
        .to_request();
    let order: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/user/orders/{}", order["id"].as_str().unwrap()))
        .insert_header(("Authorization", fx.token(Uuid::new_v4(), Role::User)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri(&format!("/api/user/orders/{}", Uuid::new_v4()))
        .insert_header(("Authorization", fx.token(Uuid::new_v4(), Role::User)))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn courier_walks_order_to_delivered_and_shopper_can_no_longer_cancel() {
    let fx = Fixture::new();
    let item = fx.add_menu_item("Thali", "220.00");
    let app = app!(fx);
    let shopper = fx.token(Uuid::new_v4(), Role::User);
    let courier_id = Uuid::new_v4();
    let courier = fx.token(courier_id, Role::Delivery);

    let req = test::TestRequest::post()
        .uri("/api/user/cart")
        .insert_header(("Authorization", shopper.clone()))
        .set_json(json!({ "menuItemId": item.id }))
        .to_request();
    test::call_service(&app, req).await;
    let req = test::TestRequest::post()
        .uri("/api/user/orders")
        .insert_header(("Authorization", shopper.clone()))
        .set_json(checkout_body())
        .to_request();
    let order: Value = test::call_and_read_body_json(&app, req).await;
    let order_id = order["id"].as_str().unwrap().to_string();
    let status_uri = format!("/api/delivery/orders/{order_id}/status");

    // Skipping a step is rejected.
    let req = test::TestRequest::put()
        .uri(&status_uri)
        .insert_header(("Authorization", courier.clone()))
        .set_json(json!({ "status": "delivered" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let mut last = Value::Null;
    for status in ["confirmed", "preparing", "out_for_delivery", "delivered"] {
        let req = test::TestRequest::put()
            .uri(&status_uri)
            .insert_header(("Authorization", courier.clone()))
            .set_json(json!({ "status": status }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "advancing to {status}");
        last = test::read_body_json(resp).await;
        assert_eq!(last["status"], status);
    }
    assert_eq!(last["deliveryPerson"], courier_id.to_string());
    assert_eq!(last["paymentStatus"], "completed");
    assert!(last["deliveredAt"].is_string());

    let req = test::TestRequest::put()
        .uri(&format!("/api/user/orders/{order_id}/cancel"))
        .insert_header(("Authorization", shopper))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Cannot cancel order that is already delivered");
}

#[actix_web::test]
async fn cancelling_pending_order_records_event() {
    let fx = Fixture::new();
    let item = fx.add_menu_item("Lassi", "60.00");
    let app = app!(fx);
    let shopper = fx.token(Uuid::new_v4(), Role::User);

    let req = test::TestRequest::post()
        .uri("/api/user/cart")
        .insert_header(("Authorization", shopper.clone()))
        .set_json(json!({ "menuItemId": item.id, "quantity": 3 }))
        .to_request();
    test::call_service(&app, req).await;
    let req = test::TestRequest::post()
        .uri("/api/user/orders")
        .insert_header(("Authorization", shopper.clone()))
        .set_json(checkout_body())
        .to_request();
    let order: Value = test::call_and_read_body_json(&app, req).await;
    let order_id = Uuid::parse_str(order["id"].as_str().unwrap()).unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/user/orders/{order_id}/cancel"))
        .insert_header(("Authorization", shopper.clone()))
        .to_request();
    let cancelled: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(cancelled["status"], "cancelled");
    assert_eq!(fx.store.events_for(order_id), vec!["OrderPlaced", "OrderCancelled"]);

    let req = test::TestRequest::get()
        .uri("/api/user/orders?page=1&limit=10")
        .insert_header(("Authorization", shopper))
        .to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list["total"], 1);
    assert_eq!(list["items"][0]["status"], "cancelled");
}

/// Adds one fresh menu item to the caller's cart and checks out.
macro_rules! place_order {
    ($app:expr, $fx:expr, $auth:expr) => {{
        let item = $fx.add_menu_item("Pakora", "35.00");
        let req = test::TestRequest::post()
            .uri("/api/user/cart")
            .insert_header(("Authorization", $auth.clone()))
            .set_json(json!({ "menuItemId": item.id }))
            .to_request();
        test::call_service(&$app, req).await;
        let req = test::TestRequest::post()
            .uri("/api/user/orders")
            .insert_header(("Authorization", $auth.clone()))
            .set_json(checkout_body())
            .to_request();
        let order: Value = test::call_and_read_body_json(&$app, req).await;
        order
    }};
}

#[actix_web::test]
async fn huge_page_number_returns_empty_page() {
    let fx = Fixture::new();
    let app = app!(fx);
    let auth = fx.token(Uuid::new_v4(), Role::User);
    place_order!(app, fx, auth);

    let req = test::TestRequest::get()
        .uri(&format!("/api/user/orders?page={}&limit=100", i64::MAX))
        .insert_header(("Authorization", auth))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 1);
    assert!(body["items"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn list_limit_is_clamped_to_valid_range() {
    let fx = Fixture::new();
    let app = app!(fx);
    let auth = fx.token(Uuid::new_v4(), Role::User);
    place_order!(app, fx, auth);
    place_order!(app, fx, auth);

    let req = test::TestRequest::get()
        .uri("/api/user/orders?limit=0")
        .insert_header(("Authorization", auth.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["limit"], 1);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["total"], 2);

    let req = test::TestRequest::get()
        .uri("/api/user/orders?limit=1000&page=0")
        .insert_header(("Authorization", auth))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["limit"], 100);
    assert_eq!(body["page"], 1);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn oversized_quantity_is_bad_request() {
    let fx = Fixture::new();
    let item = fx.add_menu_item("Kulfi", "100.00");
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/api/user/cart")
        .insert_header(("Authorization", fx.token(Uuid::new_v4(), Role::User)))
        .set_json(json!({ "menuItemId": item.id, "quantity": 1_000_000_000 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Quantity must be at most 1000");
}

#[actix_web::test]
async fn courier_sees_open_unassigned_and_own_orders() {
    let fx = Fixture::new();
    let app = app!(fx);
    let shopper = fx.token(Uuid::new_v4(), Role::User);
    let courier = fx.token(Uuid::new_v4(), Role::Delivery);
    let rival = fx.token(Uuid::new_v4(), Role::Delivery);

    let first = place_order!(app, fx, shopper);
    let second = place_order!(app, fx, shopper);

    // The rival takes the second order out for delivery.
    for status in ["confirmed", "preparing", "out_for_delivery"] {
        let req = test::TestRequest::put()
            .uri(&format!(
                "/api/delivery/orders/{}/status",
                second["id"].as_str().unwrap()
            ))
            .insert_header(("Authorization", rival.clone()))
            .set_json(json!({ "status": status }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri("/api/delivery/orders")
        .insert_header(("Authorization", courier))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["id"], first["id"]);

    let req = test::TestRequest::get()
        .uri("/api/delivery/orders")
        .insert_header(("Authorization", rival))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["items"][0]["id"], second["id"]);

    let req = test::TestRequest::get()
        .uri("/api/delivery/orders")
        .insert_header(("Authorization", shopper))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}
