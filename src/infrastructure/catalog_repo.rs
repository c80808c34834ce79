use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::menu::{MenuFilter, MenuItem};
use crate::domain::ports::Catalog;
use crate::schema::menu_items;

use super::models::MenuItemRow;

pub struct DieselCatalog {
    pool: DbPool,
}

impl DieselCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn like_pattern(q: &str) -> String {
    let escaped = q
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

impl Catalog for DieselCatalog {
    fn get_item(&self, id: Uuid) -> Result<Option<MenuItem>, DomainError> {
        let mut conn = self.pool.get()?;

        menu_items::table
            .filter(menu_items::id.eq(id))
            .select(MenuItemRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(MenuItem::try_from)
            .transpose()
    }

    fn list_items(&self, filter: &MenuFilter) -> Result<Vec<MenuItem>, DomainError> {
        let mut conn = self.pool.get()?;

        let mut query = menu_items::table
            .select(MenuItemRow::as_select())
            .order(menu_items::name.asc())
            .into_boxed();
        if let Some(category) = &filter.category {
            query = query.filter(menu_items::category.eq(category.clone()));
        }
        if let Some(diet) = filter.diet_type {
            query = query.filter(menu_items::diet_type.eq(diet.as_str()));
        }
        if let Some(popular) = filter.popular {
            query = query.filter(menu_items::popular.eq(popular));
        }
        if let Some(q) = &filter.q {
            query = query.filter(menu_items::name.ilike(like_pattern(q)));
        }

        query
            .load(&mut conn)?
            .into_iter()
            .map(MenuItem::try_from)
            .collect()
    }
}
