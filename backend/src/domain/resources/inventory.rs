//! Stock-keeping records: what is on hand, at what price, from whom.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{
    FieldViolation, Validate, non_negative_amount, non_negative_int, optional_text,
    require_changes, require_text,
};
use super::{Resource, eq_opt_or_any, eq_or_any};

/// Inventory line identified by a unique SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Inventory {
    pub id: i64,
    pub name: String,
    pub sku: String,
    pub quantity: i32,
    pub price: f64,
    pub vendor_id: Option<i64>,
    pub product_id: Option<i64>,
    pub warehouse_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct InventoryDraft {
    pub name: String,
    pub sku: String,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub price: f64,
    pub vendor_id: Option<i64>,
    pub product_id: Option<i64>,
    pub warehouse_id: Option<i64>,
}

impl Validate for InventoryDraft {
    fn validate(&self) -> Result<(), FieldViolation> {
        require_text("name", &self.name)?;
        require_text("sku", &self.sku)?;
        non_negative_int("quantity", self.quantity)?;
        non_negative_amount("price", self.price)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct InventoryPatch {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub quantity: Option<i32>,
    pub price: Option<f64>,
    pub vendor_id: Option<i64>,
    pub product_id: Option<i64>,
    pub warehouse_id: Option<i64>,
}

impl Validate for InventoryPatch {
    fn validate(&self) -> Result<(), FieldViolation> {
        require_changes(
            self.name.is_some()
                || self.sku.is_some()
                || self.quantity.is_some()
                || self.price.is_some()
                || self.vendor_id.is_some()
                || self.product_id.is_some()
                || self.warehouse_id.is_some(),
        )?;
        optional_text("name", self.name.as_deref())?;
        optional_text("sku", self.sku.as_deref())?;
        self.quantity
            .map_or(Ok(()), |value| non_negative_int("quantity", value))?;
        self.price
            .map_or(Ok(()), |value| non_negative_amount("price", value))
    }
}

/// Inventory list filters; all supplied criteria must match.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InventoryFilter {
    pub vendor_id: Option<i64>,
    pub product_id: Option<i64>,
    pub warehouse_id: Option<i64>,
    pub sku: Option<String>,
}

impl Validate for InventoryFilter {
    fn validate(&self) -> Result<(), FieldViolation> {
        optional_text("sku", self.sku.as_deref())
    }
}

impl Resource for Inventory {
    type Draft = InventoryDraft;
    type Patch = InventoryPatch;
    type Filter = InventoryFilter;

    const KIND: &'static str = "Inventory";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: &InventoryDraft, at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            sku: draft.sku.clone(),
            quantity: draft.quantity,
            price: draft.price,
            vendor_id: draft.vendor_id,
            product_id: draft.product_id,
            warehouse_id: draft.warehouse_id,
            created_at: at,
            updated_at: at,
        }
    }

    fn apply(&mut self, patch: &InventoryPatch, at: DateTime<Utc>) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(sku) = &patch.sku {
            self.sku.clone_from(sku);
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if patch.vendor_id.is_some() {
            self.vendor_id = patch.vendor_id;
        }
        if patch.product_id.is_some() {
            self.product_id = patch.product_id;
        }
        if patch.warehouse_id.is_some() {
            self.warehouse_id = patch.warehouse_id;
        }
        self.updated_at = at;
    }

    fn matches(&self, filter: &InventoryFilter) -> bool {
        eq_opt_or_any(filter.vendor_id.as_ref(), self.vendor_id.as_ref())
            && eq_opt_or_any(filter.product_id.as_ref(), self.product_id.as_ref())
            && eq_opt_or_any(filter.warehouse_id.as_ref(), self.warehouse_id.as_ref())
            && eq_or_any(filter.sku.as_ref(), &self.sku)
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.sku)
    }
}
