//! Vendors that inventory is bought from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validation::{FieldViolation, Validate, optional_text, require_changes, require_text};
use super::{Resource, eq_or_any};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Vendor {
    pub id: i64,
    pub name: String,
    pub contact_info: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct VendorDraft {
    pub name: String,
    #[serde(default)]
    pub contact_info: String,
}

impl Validate for VendorDraft {
    fn validate(&self) -> Result<(), FieldViolation> {
        require_text("name", &self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct VendorPatch {
    pub name: Option<String>,
    pub contact_info: Option<String>,
}

impl Validate for VendorPatch {
    fn validate(&self) -> Result<(), FieldViolation> {
        require_changes(self.name.is_some() || self.contact_info.is_some())?;
        optional_text("name", self.name.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VendorFilter {
    pub name: Option<String>,
}

impl Validate for VendorFilter {
    fn validate(&self) -> Result<(), FieldViolation> {
        Ok(())
    }
}

impl Resource for Vendor {
    type Draft = VendorDraft;
    type Patch = VendorPatch;
    type Filter = VendorFilter;

    const KIND: &'static str = "Vendor";

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: &VendorDraft, at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            contact_info: draft.contact_info.clone(),
            created_at: at,
            updated_at: at,
        }
    }

    fn apply(&mut self, patch: &VendorPatch, at: DateTime<Utc>) {
        if let Some(name) = &patch.name {
            self.name.clone_from(name);
        }
        if let Some(contact_info) = &patch.contact_info {
            self.contact_info.clone_from(contact_info);
        }
        self.updated_at = at;
    }

    fn matches(&self, filter: &VendorFilter) -> bool {
        eq_or_any(filter.name.as_ref(), &self.name)
    }
}
