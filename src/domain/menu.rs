use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DietType {
    Veg,
    Nonveg,
}

impl DietType {
    pub fn as_str(self) -> &'static str {
        match self {
            DietType::Veg => "veg",
            DietType::Nonveg => "nonveg",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "veg" => Some(DietType::Veg),
            "nonveg" => Some(DietType::Nonveg),
            _ => None,
        }
    }
}

/// A catalog entry. The catalog is the only authority on current price.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub category: String,
    pub diet_type: DietType,
    /// 0.0 ..= 5.0
    pub rating: f32,
    pub image: Option<String>,
    pub prep_time: Option<String>,
    pub popular: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuFilter {
    pub category: Option<String>,
    pub diet_type: Option<DietType>,
    pub popular: Option<bool>,
    /// Case-insensitive substring of the item name.
    pub q: Option<String>,
}

impl MenuFilter {
    pub fn matches(&self, item: &MenuItem) -> bool {
        if let Some(category) = &self.category {
            if &item.category != category {
                return false;
            }
        }
        if let Some(diet) = self.diet_type {
            if item.diet_type != diet {
                return false;
            }
        }
        if let Some(popular) = self.popular {
            if item.popular != popular {
                return false;
            }
        }
        if let Some(q) = &self.q {
            if !item.name.to_lowercase().contains(&q.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
pub(crate) fn sample_item(name: &str, price: &str) -> MenuItem {
    use std::str::FromStr;

    MenuItem {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        price: BigDecimal::from_str(price).expect("valid decimal"),
        category: "mains".to_string(),
        diet_type: DietType::Veg,
        rating: 4.0,
        image: None,
        prep_time: Some("15 mins".to_string()),
        popular: false,
    }
}
