//! Supply-chain resources and the generic service that manages them.
//!
//! Every resource kind shares the same lifecycle: a validated draft is
//! stored, fetched by id, listed through a kind-specific filter, patched and
//! deleted. [`Resource`] captures the per-kind pieces; [`ResourceService`]
//! supplies the shared behaviour.

use chrono::{DateTime, Utc};

mod inventory;
mod item;
mod order;
mod product;
mod service;
mod shipment;
mod supplier;
pub(crate) mod validation;
mod vendor;

pub use inventory::{Inventory, InventoryDraft, InventoryFilter, InventoryPatch};
pub use item::{Item, ItemDraft, ItemFilter, ItemPatch};
pub use order::{DEFAULT_ORDER_STATUS, Order, OrderDraft, OrderFilter, OrderPatch};
pub use product::{Product, ProductDraft, ProductFilter, ProductPatch};
pub use service::ResourceService;
pub use shipment::{DEFAULT_SHIPPING_STATUS, Shipment, ShipmentDraft, ShipmentFilter, ShipmentPatch};
pub use supplier::{Supplier, SupplierDraft, SupplierFilter, SupplierPatch};
pub use validation::{FieldViolation, Validate};
pub use vendor::{Vendor, VendorDraft, VendorFilter, VendorPatch};

/// A persisted supply-chain record.
///
/// `from_draft`, `apply` and `matches` describe the resource's semantics in
/// plain Rust. Stores that cannot push the work down to a database use them
/// directly.
pub trait Resource: Clone + Send + Sync + 'static {
    /// Fields accepted on creation.
    type Draft: Validate + Send + Sync + 'static;
    /// Partial update; `None` fields are left untouched.
    type Patch: Validate + Send + Sync + 'static;
    /// List query parameters.
    type Filter: Validate + Default + Send + Sync + 'static;

    /// Human-readable kind used in messages, e.g. `"Inventory"`.
    const KIND: &'static str;

    fn id(&self) -> i64;

    /// Materialise a draft under the given identifier and timestamp.
    fn from_draft(id: i64, draft: &Self::Draft, at: DateTime<Utc>) -> Self;

    /// Apply a patch and bump `updated_at`.
    fn apply(&mut self, patch: &Self::Patch, at: DateTime<Utc>);

    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Value that must be unique across the kind, if any.
    fn unique_key(&self) -> Option<&str> {
        None
    }
}

/// `true` when `expected` is unset or equal to `actual`.
pub(crate) fn eq_or_any<T: PartialEq>(expected: Option<&T>, actual: &T) -> bool {
    expected.is_none_or(|value| value == actual)
}

/// `true` when `expected` is unset or equal to a present `actual`.
pub(crate) fn eq_opt_or_any<T: PartialEq>(expected: Option<&T>, actual: Option<&T>) -> bool {
    match expected {
        None => true,
        Some(value) => actual == Some(value),
    }
}

pub(crate) fn in_range<T: PartialOrd>(min: Option<T>, max: Option<T>, actual: T) -> bool {
    min.is_none_or(|low| actual >= low) && max.is_none_or(|high| actual <= high)
}
