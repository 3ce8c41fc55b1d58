//! Catalogue items sourced from suppliers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{
    FieldViolation, Validate, non_negative_amount, non_negative_int, optional_text, ordered,
    require_changes, require_text,
};
use super::{Resource, eq_opt_or_any, eq_or_any, in_range};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub quantity: i32,
    pub price: f64,
    pub supplier_id: Option<i64>,
    pub warehouse_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct ItemDraft {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub price: f64,
    pub supplier_id: Option<i64>,
    pub warehouse_id: Option<i64>,
}

impl Validate for ItemDraft {
    fn validate(&self) -> Result<(), FieldViolation> {
        require_text("name", &self.name)?;
        non_negative_int("quantity", self.quantity)?;
        non_negative_amount("price", self.price)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<i32>,
    pub price: Option<f64>,
    pub supplier_id: Option<i64>,
    pub warehouse_id: Option<i64>,
}

impl Validate for ItemPatch {
    fn validate(&self) -> Result<(), FieldViolation> {
        require_changes(
            self.name.is_some()
                || self.category.is_some()
                || self.quantity.is_some()
                || self.price.is_some()
                || self.supplier_id.is_some()
                || self.warehouse_id.is_some(),
        )?;
        optional_text("name", self.name.as_deref())?;
        self.quantity
            .map_or(Ok(()), |value| non_negative_int("quantity", value))?;
        self.price
            .map_or(Ok(()), |value| non_negative_amount("price", value))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ItemFilter {
    pub category: Option<String>,
    pub supplier_id: Option<i64>,
    pub warehouse_id: Option<i64>,
    pub min_quantity: Option<i32>,
    pub max_quantity: Option<i32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl Validate for ItemFilter {
    fn validate(&self) -> Result<(), FieldViolation> {
        ordered("quantity", self.min_quantity, self.max_quantity)?;
        ordered("price", self.min_price, self.max_price)
    }
}

impl Resource for Item {
    type Draft = ItemDraft;
    type Patch = ItemPatch;
    type Filter = ItemFilter;

    const KIND: &'static str = "Item";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: &ItemDraft, at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            category: draft.category.clone(),
            quantity: draft.quantity,
            price: draft.price,
            supplier_id: draft.supplier_id,
            warehouse_id: draft.warehouse_id,
            created_at: at,
            updated_at: at,
        }
    }

    fn apply(&mut self, patch: &ItemPatch, at: DateTime<Utc>) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(category) = &patch.category {
            self.category.clone_from(category);
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if patch.supplier_id.is_some() {
            self.supplier_id = patch.supplier_id;
        }
        if patch.warehouse_id.is_some() {
            self.warehouse_id = patch.warehouse_id;
        }
        self.updated_at = at;
    }

    fn matches(&self, filter: &ItemFilter) -> bool {
        eq_or_any(filter.category.as_ref(), &self.category)
            && eq_opt_or_any(filter.supplier_id.as_ref(), self.supplier_id.as_ref())
            && eq_opt_or_any(filter.warehouse_id.as_ref(), self.warehouse_id.as_ref())
            && in_range(filter.min_quantity, filter.max_quantity, self.quantity)
            && in_range(filter.min_price, filter.max_price, self.price)
    }
}
