//! Customer orders placed against inventory lines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{
    FieldViolation, Validate, non_negative_amount, optional_text, positive_int, require_changes,
};
use super::{Resource, eq_opt_or_any, eq_or_any, in_range};

/// Status given to orders created without one.
pub const DEFAULT_ORDER_STATUS: &str = "pending";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: i64,
    /// Customer account that placed the order.
    pub user_id: i64,
    /// Inventory line being ordered.
    pub inventory_id: i64,
    pub vendor_id: Option<i64>,
    pub quantity: i32,
    pub total_price: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct OrderDraft {
    pub user_id: i64,
    pub inventory_id: i64,
    pub vendor_id: Option<i64>,
    pub quantity: i32,
    #[serde(default)]
    pub total_price: f64,
    pub status: Option<String>,
}

impl OrderDraft {
    /// Status to store, falling back to [`DEFAULT_ORDER_STATUS`].
    pub fn status_or_default(&self) -> &str {
        self.status
            .as_deref()
            .map(str::trim)
            .filter(|status| !status.is_empty())
            .unwrap_or(DEFAULT_ORDER_STATUS)
    }
}

impl Validate for OrderDraft {
    fn validate(&self) -> Result<(), FieldViolation> {
        positive_int("quantity", self.quantity)?;
        non_negative_amount("total_price", self.total_price)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct OrderPatch {
    pub vendor_id: Option<i64>,
    pub quantity: Option<i32>,
    pub total_price: Option<f64>,
    pub status: Option<String>,
}

impl Validate for OrderPatch {
    fn validate(&self) -> Result<(), FieldViolation> {
        require_changes(
            self.vendor_id.is_some()
                || self.quantity.is_some()
                || self.total_price.is_some()
                || self.status.is_some(),
        )?;
        self.quantity
            .map_or(Ok(()), |value| positive_int("quantity", value))?;
        self.total_price
            .map_or(Ok(()), |value| non_negative_amount("total_price", value))?;
        optional_text("status", self.status.as_deref())
    }
}

/// `product_id` selects orders for an inventory line; the time bounds apply
/// to the order's creation instant.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OrderFilter {
    pub customer_id: Option<i64>,
    pub vendor_id: Option<i64>,
    pub product_id: Option<i64>,
    pub status: Option<String>,
    pub placed_after: Option<DateTime<Utc>>,
    pub placed_before: Option<DateTime<Utc>>,
}

impl Validate for OrderFilter {
    fn validate(&self) -> Result<(), FieldViolation> {
        match (self.placed_after, self.placed_before) {
            (Some(after), Some(before)) if after > before => Err(FieldViolation::new(
                "placed_after",
                "invalid_range",
                "placed_after must not be later than placed_before",
            )),
            _ => Ok(()),
        }
    }
}

impl Resource for Order {
    type Draft = OrderDraft;
    type Patch = OrderPatch;
    type Filter = OrderFilter;

    const KIND: &'static str = "Order";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: &OrderDraft, at: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id: draft.user_id,
            inventory_id: draft.inventory_id,
            vendor_id: draft.vendor_id,
            quantity: draft.quantity,
            total_price: draft.total_price,
            status: draft.status_or_default().to_owned(),
            created_at: at,
            updated_at: at,
        }
    }

    fn apply(&mut self, patch: &OrderPatch, at: DateTime<Utc>) {
        if patch.vendor_id.is_some() {
            self.vendor_id = patch.vendor_id;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(total_price) = patch.total_price {
            self.total_price = total_price;
        }
        if let Some(status) = &patch.status {
            self.status.clone_from(status);
        }
        self.updated_at = at;
    }

    fn matches(&self, filter: &OrderFilter) -> bool {
        eq_or_any(filter.customer_id.as_ref(), &self.user_id)
            && eq_opt_or_any(filter.vendor_id.as_ref(), self.vendor_id.as_ref())
            && eq_or_any(filter.product_id.as_ref(), &self.inventory_id)
            && eq_or_any(filter.status.as_ref(), &self.status)
            && in_range(filter.placed_after, filter.placed_before, self.created_at)
    }
}
