use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::menu::{DietType, MenuFilter, MenuItem};
use crate::errors::AppError;
use crate::state::AppState;

use super::auth::AuthenticatedShopper;
use super::blocking;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
pub struct MenuQuery {
    pub category: Option<String>,
    /// `veg` or `nonveg`
    #[serde(rename = "type")]
    pub diet_type: Option<String>,
    pub popular: Option<bool>,
    /// Case-insensitive name search
    pub q: Option<String>,
}

impl MenuQuery {
    fn into_filter(self) -> Result<MenuFilter, DomainError> {
        let diet_type = self
            .diet_type
            .map(|t| {
                DietType::parse(&t)
                    .ok_or_else(|| DomainError::Validation(format!("Unknown type '{t}'")))
            })
            .transpose()?;
        Ok(MenuFilter {
            category: self.category,
            diet_type,
            popular: self.popular,
            q: self.q.filter(|q| !q.trim().is_empty()),
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Decimal price as a string, e.g. "149.00"
    pub price: String,
    pub category: String,
    #[serde(rename = "type")]
    pub diet_type: DietType,
    pub rating: f32,
    pub image: Option<String>,
    pub prep_time: Option<String>,
    pub popular: bool,
}

impl From<MenuItem> for MenuItemResponse {
    fn from(item: MenuItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            price: item.price.to_string(),
            category: item.category,
            diet_type: item.diet_type,
            rating: item.rating,
            image: item.image,
            prep_time: item.prep_time,
            popular: item.popular,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/user/menu-items
#[utoipa::path(
    get,
    path = "/api/user/menu-items",
    params(MenuQuery),
    responses(
        (status = 200, description = "Matching menu items ordered by name", body = [MenuItemResponse]),
        (status = 400, description = "Unknown filter value"),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = [])),
    tag = "menu"
)]
pub async fn list_menu_items(
    state: web::Data<AppState>,
    _shopper: AuthenticatedShopper,
    query: web::Query<MenuQuery>,
) -> Result<HttpResponse, AppError> {
    let filter = query.into_inner().into_filter()?;
    let items = blocking(move || state.catalog.list_items(&filter)).await?;
    let body: Vec<MenuItemResponse> = items.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/user/menu-items/{id}
#[utoipa::path(
    get,
    path = "/api/user/menu-items/{id}",
    params(("id" = Uuid, Path, description = "Menu item UUID")),
    responses(
        (status = 200, description = "Menu item found", body = MenuItemResponse),
        (status = 404, description = "Menu item not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "menu"
)]
pub async fn get_menu_item(
    state: web::Data<AppState>,
    _shopper: AuthenticatedShopper,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let item = blocking(move || {
        state
            .catalog
            .get_item(id)?
            .ok_or(DomainError::NotFound("Menu item"))
    })
    .await?;
    Ok(HttpResponse::Ok().json(MenuItemResponse::from(item)))
}
