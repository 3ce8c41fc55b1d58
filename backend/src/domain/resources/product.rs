//! Products offered for sale and their stock levels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{
    FieldViolation, Validate, non_negative_amount, non_negative_int, optional_text, ordered,
    require_changes, require_text,
};
use super::{Resource, eq_or_any, in_range};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub stock: i32,
}

impl Validate for ProductDraft {
    fn validate(&self) -> Result<(), FieldViolation> {
        require_text("name", &self.name)?;
        non_negative_amount("price", self.price)?;
        non_negative_int("stock", self.stock)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
}

impl Validate for ProductPatch {
    fn validate(&self) -> Result<(), FieldViolation> {
        require_changes(
            self.name.is_some()
                || self.category.is_some()
                || self.price.is_some()
                || self.stock.is_some(),
        )?;
        optional_text("name", self.name.as_deref())?;
        self.price
            .map_or(Ok(()), |value| non_negative_amount("price", value))?;
        self.stock
            .map_or(Ok(()), |value| non_negative_int("stock", value))
    }
}

/// `stock` matches an exact level; `min_stock`/`max_stock` bound it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub stock: Option<i32>,
    pub min_stock: Option<i32>,
    pub max_stock: Option<i32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl Validate for ProductFilter {
    fn validate(&self) -> Result<(), FieldViolation> {
        ordered("stock", self.min_stock, self.max_stock)?;
        ordered("price", self.min_price, self.max_price)
    }
}

impl Resource for Product {
    type Draft = ProductDraft;
    type Patch = ProductPatch;
    type Filter = ProductFilter;

    const KIND: &'static str = "Product";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: &ProductDraft, at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            category: draft.category.clone(),
            price: draft.price,
            stock: draft.stock,
            created_at: at,
            updated_at: at,
        }
    }

    fn apply(&mut self, patch: &ProductPatch, at: DateTime<Utc>) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(category) = &patch.category {
            self.category.clone_from(category);
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        self.updated_at = at;
    }

    fn matches(&self, filter: &ProductFilter) -> bool {
        eq_or_any(filter.category.as_ref(), &self.category)
            && eq_or_any(filter.stock.as_ref(), &self.stock)
            && in_range(filter.min_stock, filter.max_stock, self.stock)
            && in_range(filter.min_price, filter.max_price, self.price)
    }
}
