//! Suppliers providing items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{
    FieldViolation, Validate, optional_text, require_changes, require_text, within,
};
use super::{Resource, eq_or_any};

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub location: String,
    pub rating: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn check_rating(rating: Option<f64>) -> Result<(), FieldViolation> {
    rating.map_or(Ok(()), |value| {
        within("rating", value, MIN_RATING, MAX_RATING)
    })
}

#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct SupplierDraft {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub location: String,
    pub rating: Option<f64>,
}

impl Validate for SupplierDraft {
    fn validate(&self) -> Result<(), FieldViolation> {
        require_text("name", &self.name)?;
        check_rating(self.rating)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct SupplierPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub rating: Option<f64>,
}

impl Validate for SupplierPatch {
    fn validate(&self) -> Result<(), FieldViolation> {
        require_changes(
            self.name.is_some()
                || self.category.is_some()
                || self.location.is_some()
                || self.rating.is_some(),
        )?;
        optional_text("name", self.name.as_deref())?;
        check_rating(self.rating)
    }
}

/// Suppliers without a rating never satisfy `min_rating`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SupplierFilter {
    pub category: Option<String>,
    pub location: Option<String>,
    pub min_rating: Option<f64>,
}

impl Validate for SupplierFilter {
    fn validate(&self) -> Result<(), FieldViolation> {
        self.min_rating.map_or(Ok(()), |value| {
            within("min_rating", value, MIN_RATING, MAX_RATING)
        })
    }
}

impl Resource for Supplier {
    type Draft = SupplierDraft;
    type Patch = SupplierPatch;
    type Filter = SupplierFilter;

    const KIND: &'static str = "Supplier";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: &SupplierDraft, at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            category: draft.category.clone(),
            location: draft.location.clone(),
            rating: draft.rating,
            created_at: at,
            updated_at: at,
        }
    }

    fn apply(&mut self, patch: &SupplierPatch, at: DateTime<Utc>) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(category) = &patch.category {
            self.category.clone_from(category);
        }
        if let Some(location) = &patch.location {
            self.location.clone_from(location);
        }
        if patch.rating.is_some() {
            self.rating = patch.rating;
        }
        self.updated_at = at;
    }

    fn matches(&self, filter: &SupplierFilter) -> bool {
        let rated_enough = match (filter.min_rating, self.rating) {
            (None, _) => true,
            (Some(min), Some(rating)) => rating >= min,
            (Some(_), None) => false,
        };
        eq_or_any(filter.category.as_ref(), &self.category)
            && eq_or_any(filter.location.as_ref(), &self.location)
            && rated_enough
    }
}
