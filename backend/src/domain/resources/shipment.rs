//! Shipments fulfilling orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{FieldViolation, Validate, optional_text, require_changes, require_text};
use super::{Resource, eq_opt_or_any, eq_or_any};

/// Shipping status given to shipments created without one.
pub const DEFAULT_SHIPPING_STATUS: &str = "pending";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Shipment {
    pub id: i64,
    pub order_id: i64,
    pub tracking_number: String,
    pub carrier: String,
    pub shipping_status: String,
    pub origin: String,
    pub destination: String,
    pub warehouse_id: Option<i64>,
    pub product_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct ShipmentDraft {
    pub order_id: i64,
    pub tracking_number: String,
    pub carrier: String,
    pub shipping_status: Option<String>,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    pub warehouse_id: Option<i64>,
    pub product_id: Option<i64>,
}

impl ShipmentDraft {
    /// Status to store, falling back to [`DEFAULT_SHIPPING_STATUS`].
    pub fn status_or_default(&self) -> &str {
        self.shipping_status
            .as_deref()
            .map(str::trim)
            .filter(|status| !status.is_empty())
            .unwrap_or(DEFAULT_SHIPPING_STATUS)
    }
}

impl Validate for ShipmentDraft {
    fn validate(&self) -> Result<(), FieldViolation> {
        require_text("tracking_number", &self.tracking_number)?;
        require_text("carrier", &self.carrier)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct ShipmentPatch {
    pub tracking_number: Option<String>,
    pub carrier: Option<String>,
    pub shipping_status: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub warehouse_id: Option<i64>,
    pub product_id: Option<i64>,
}

impl Validate for ShipmentPatch {
    fn validate(&self) -> Result<(), FieldViolation> {
        require_changes(
            self.tracking_number.is_some()
                || self.carrier.is_some()
                || self.shipping_status.is_some()
                || self.origin.is_some()
                || self.destination.is_some()
                || self.warehouse_id.is_some()
                || self.product_id.is_some(),
        )?;
        optional_text("tracking_number", self.tracking_number.as_deref())?;
        optional_text("carrier", self.carrier.as_deref())?;
        optional_text("shipping_status", self.shipping_status.as_deref())
    }
}

/// `status` matches the shipping status.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ShipmentFilter {
    pub order_id: Option<i64>,
    pub status: Option<String>,
    pub carrier: Option<String>,
    pub tracking_number: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub warehouse_id: Option<i64>,
    pub product_id: Option<i64>,
}

impl Validate for ShipmentFilter {
    fn validate(&self) -> Result<(), FieldViolation> {
        optional_text("tracking_number", self.tracking_number.as_deref())
    }
}

impl Resource for Shipment {
    type Draft = ShipmentDraft;
    type Patch = ShipmentPatch;
    type Filter = ShipmentFilter;

    const KIND: &'static str = "Shipment";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: &ShipmentDraft, at: DateTime<Utc>) -> Self {
        Self {
            id,
            order_id: draft.order_id,
            tracking_number: draft.tracking_number.clone(),
            carrier: draft.carrier.clone(),
            shipping_status: draft.status_or_default().to_owned(),
            origin: draft.origin.clone(),
            destination: draft.destination.clone(),
            warehouse_id: draft.warehouse_id,
            product_id: draft.product_id,
            created_at: at,
            updated_at: at,
        }
    }

    fn apply(&mut self, patch: &ShipmentPatch, at: DateTime<Utc>) {
        if let Some(tracking_number) = &patch.tracking_number {
            self.tracking_number.clone_from(tracking_number);
        }
        if let Some(carrier) = &patch.carrier {
            self.carrier.clone_from(carrier);
        }
        if let Some(status) = &patch.shipping_status {
            self.shipping_status.clone_from(status);
        }
        if let Some(origin) = &patch.origin {
            self.origin.clone_from(origin);
        }
        if let Some(destination) = &patch.destination {
            self.destination.clone_from(destination);
        }
        if patch.warehouse_id.is_some() {
            self.warehouse_id = patch.warehouse_id;
        }
        if patch.product_id.is_some() {
            self.product_id = patch.product_id;
        }
        self.updated_at = at;
    }

    fn matches(&self, filter: &ShipmentFilter) -> bool {
        eq_or_any(filter.order_id.as_ref(), &self.order_id)
            && eq_or_any(filter.status.as_ref(), &self.shipping_status)
            && eq_or_any(filter.carrier.as_ref(), &self.carrier)
            && eq_or_any(filter.tracking_number.as_ref(), &self.tracking_number)
            && eq_or_any(filter.origin.as_ref(), &self.origin)
            && eq_or_any(filter.destination.as_ref(), &self.destination)
            && eq_opt_or_any(filter.warehouse_id.as_ref(), self.warehouse_id.as_ref())
            && eq_opt_or_any(filter.product_id.as_ref(), self.product_id.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn shipment() -> Shipment {
        let draft = ShipmentDraft {
            order_id: 9,
            tracking_number: "1Z999".to_owned(),
            carrier: "UPS".to_owned(),
            shipping_status: None,
            origin: "Leeds".to_owned(),
            destination: "York".to_owned(),
            warehouse_id: Some(1),
            product_id: None,
        };
        Shipment::from_draft(1, &draft, Utc::now())
    }

    #[rstest]
    fn new_shipments_start_pending() {
        assert_eq!(shipment().shipping_status, DEFAULT_SHIPPING_STATUS);
    }

    #[rstest]
    #[case(ShipmentFilter { carrier: Some("UPS".to_owned()), ..ShipmentFilter::default() }, true)]
    #[case(ShipmentFilter { status: Some("delivered".to_owned()), ..ShipmentFilter::default() }, false)]
    #[case(ShipmentFilter { origin: Some("Leeds".to_owned()), destination: Some("York".to_owned()), ..ShipmentFilter::default() }, true)]
    #[case(ShipmentFilter { product_id: Some(5), ..ShipmentFilter::default() }, false)]
    fn filters_select_expected_shipments(#[case] filter: ShipmentFilter, #[case] expected: bool) {
        assert_eq!(shipment().matches(&filter), expected);
    }

    #[rstest]
    fn blank_carrier_is_rejected() {
        let patch = ShipmentPatch {
            carrier: Some(String::new()),
            ..ShipmentPatch::default()
        };
        assert_eq!(patch.validate().expect_err("blank carrier").field, "carrier");
    }
}
