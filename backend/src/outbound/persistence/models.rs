//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Field order follows the column order in
//! `schema.rs`.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::resources::{
    Inventory, InventoryDraft, InventoryPatch, Item, ItemDraft, ItemPatch, Order, OrderDraft,
    OrderPatch, Product, ProductDraft, ProductPatch, Shipment, ShipmentDraft, ShipmentPatch,
    Supplier, SupplierDraft, SupplierPatch, Vendor, VendorDraft, VendorPatch,
};
use crate::domain::{Address, NewAddress, NewUser, PasswordDigest, User, UserId};

use super::schema::{
    addresses, inventory, items, orders, products, shipments, suppliers, users, vendors,
};

// ---------------------------------------------------------------------------
// Users and addresses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub verified: bool,
    pub permissions: Vec<String>,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn into_user(self, addresses: Vec<Address>) -> User {
        User {
            id: UserId::new(self.id),
            name: self.name,
            email: self.email,
            password: PasswordDigest::new(self.password),
            role: self.role,
            verified: self.verified,
            permissions: self.permissions.into_iter().collect(),
            phone: self.phone,
            addresses,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub role: &'a str,
    pub verified: bool,
    pub permissions: Vec<String>,
    pub phone: &'a str,
}

impl<'a> From<&'a NewUser> for NewUserRow<'a> {
    fn from(user: &'a NewUser) -> Self {
        Self {
            name: &user.name,
            email: &user.email,
            password: user.password.as_str(),
            role: &user.role,
            verified: user.verified,
            permissions: user.permissions.iter().cloned().collect(),
            phone: &user.phone,
        }
    }
}

/// Full overwrite of the mutable user columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub role: &'a str,
    pub verified: bool,
    pub permissions: Vec<String>,
    pub phone: &'a str,
}

impl<'a> From<&'a User> for UserUpdate<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            name: &user.name,
            email: &user.email,
            password: user.password.as_str(),
            role: &user.role,
            verified: user.verified,
            permissions: user.permissions.iter().cloned().collect(),
            phone: &user.phone,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = addresses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AddressRow {
    pub id: i64,
    pub user_id: i64,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[expect(dead_code, reason = "addresses expose no timestamps")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "addresses expose no timestamps")]
    pub updated_at: DateTime<Utc>,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: row.id,
            user_id: UserId::new(row.user_id),
            street: row.street,
            city: row.city,
            state: row.state,
            zip_code: row.zip_code,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = addresses)]
pub(crate) struct NewAddressRow<'a> {
    pub user_id: i64,
    pub street: &'a str,
    pub city: &'a str,
    pub state: &'a str,
    pub zip_code: &'a str,
}

impl<'a> NewAddressRow<'a> {
    pub(crate) fn new(user_id: UserId, address: &'a NewAddress) -> Self {
        Self {
            user_id: user_id.get(),
            street: &address.street,
            city: &address.city,
            state: &address.state,
            zip_code: &address.zip_code,
        }
    }
}

// ---------------------------------------------------------------------------
// Vendors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = vendors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VendorRow {
    pub id: i64,
    pub name: String,
    pub contact_info: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VendorRow> for Vendor {
    fn from(row: VendorRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            contact_info: row.contact_info,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = vendors)]
pub(crate) struct NewVendorRow<'a> {
    pub name: &'a str,
    pub contact_info: &'a str,
}

impl<'a> From<&'a VendorDraft> for NewVendorRow<'a> {
    fn from(draft: &'a VendorDraft) -> Self {
        Self {
            name: &draft.name,
            contact_info: &draft.contact_info,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = vendors)]
pub(crate) struct VendorChangeset<'a> {
    pub name: Option<&'a str>,
    pub contact_info: Option<&'a str>,
}

impl<'a> From<&'a VendorPatch> for VendorChangeset<'a> {
    fn from(patch: &'a VendorPatch) -> Self {
        Self {
            name: patch.name.as_deref(),
            contact_info: patch.contact_info.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Suppliers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = suppliers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SupplierRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub location: String,
    pub rating: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            category: row.category,
            location: row.location,
            rating: row.rating,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = suppliers)]
pub(crate) struct NewSupplierRow<'a> {
    pub name: &'a str,
    pub category: &'a str,
    pub location: &'a str,
    pub rating: Option<f64>,
}

impl<'a> From<&'a SupplierDraft> for NewSupplierRow<'a> {
    fn from(draft: &'a SupplierDraft) -> Self {
        Self {
            name: &draft.name,
            category: &draft.category,
            location: &draft.location,
            rating: draft.rating,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = suppliers)]
pub(crate) struct SupplierChangeset<'a> {
    pub name: Option<&'a str>,
    pub category: Option<&'a str>,
    pub location: Option<&'a str>,
    pub rating: Option<f64>,
}

impl<'a> From<&'a SupplierPatch> for SupplierChangeset<'a> {
    fn from(patch: &'a SupplierPatch) -> Self {
        Self {
            name: patch.name.as_deref(),
            category: patch.category.as_deref(),
            location: patch.location.as_deref(),
            rating: patch.rating,
        }
    }
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProductRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            category: row.category,
            price: row.price,
            stock: row.stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = products)]
pub(crate) struct NewProductRow<'a> {
    pub name: &'a str,
    pub category: &'a str,
    pub price: f64,
    pub stock: i32,
}

impl<'a> From<&'a ProductDraft> for NewProductRow<'a> {
    fn from(draft: &'a ProductDraft) -> Self {
        Self {
            name: &draft.name,
            category: &draft.category,
            price: draft.price,
            stock: draft.stock,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = products)]
pub(crate) struct ProductChangeset<'a> {
    pub name: Option<&'a str>,
    pub category: Option<&'a str>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
}

impl<'a> From<&'a ProductPatch> for ProductChangeset<'a> {
    fn from(patch: &'a ProductPatch) -> Self {
        Self {
            name: patch.name.as_deref(),
            category: patch.category.as_deref(),
            price: patch.price,
            stock: patch.stock,
        }
    }
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = inventory)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct InventoryRow {
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

impl From<InventoryRow> for Inventory {
    fn from(row: InventoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            sku: row.sku,
            quantity: row.quantity,
            price: row.price,
            vendor_id: row.vendor_id,
            product_id: row.product_id,
            warehouse_id: row.warehouse_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = inventory)]
pub(crate) struct NewInventoryRow<'a> {
    pub name: &'a str,
    pub sku: &'a str,
    pub quantity: i32,
    pub price: f64,
    pub vendor_id: Option<i64>,
    pub product_id: Option<i64>,
    pub warehouse_id: Option<i64>,
}

impl<'a> From<&'a InventoryDraft> for NewInventoryRow<'a> {
    fn from(draft: &'a InventoryDraft) -> Self {
        Self {
            name: &draft.name,
            sku: &draft.sku,
            quantity: draft.quantity,
            price: draft.price,
            vendor_id: draft.vendor_id,
            product_id: draft.product_id,
            warehouse_id: draft.warehouse_id,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = inventory)]
pub(crate) struct InventoryChangeset<'a> {
    pub name: Option<&'a str>,
    pub sku: Option<&'a str>,
    pub quantity: Option<i32>,
    pub price: Option<f64>,
    pub vendor_id: Option<i64>,
    pub product_id: Option<i64>,
    pub warehouse_id: Option<i64>,
}

impl<'a> From<&'a InventoryPatch> for InventoryChangeset<'a> {
    fn from(patch: &'a InventoryPatch) -> Self {
        Self {
            name: patch.name.as_deref(),
            sku: patch.sku.as_deref(),
            quantity: patch.quantity,
            price: patch.price,
            vendor_id: patch.vendor_id,
            product_id: patch.product_id,
            warehouse_id: patch.warehouse_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ItemRow {
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

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            category: row.category,
            quantity: row.quantity,
            price: row.price,
            supplier_id: row.supplier_id,
            warehouse_id: row.warehouse_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = items)]
pub(crate) struct NewItemRow<'a> {
    pub name: &'a str,
    pub category: &'a str,
    pub quantity: i32,
    pub price: f64,
    pub supplier_id: Option<i64>,
    pub warehouse_id: Option<i64>,
}

impl<'a> From<&'a ItemDraft> for NewItemRow<'a> {
    fn from(draft: &'a ItemDraft) -> Self {
        Self {
            name: &draft.name,
            category: &draft.category,
            quantity: draft.quantity,
            price: draft.price,
            supplier_id: draft.supplier_id,
            warehouse_id: draft.warehouse_id,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = items)]
pub(crate) struct ItemChangeset<'a> {
    pub name: Option<&'a str>,
    pub category: Option<&'a str>,
    pub quantity: Option<i32>,
    pub price: Option<f64>,
    pub supplier_id: Option<i64>,
    pub warehouse_id: Option<i64>,
}

impl<'a> From<&'a ItemPatch> for ItemChangeset<'a> {
    fn from(patch: &'a ItemPatch) -> Self {
        Self {
            name: patch.name.as_deref(),
            category: patch.category.as_deref(),
            quantity: patch.quantity,
            price: patch.price,
            supplier_id: patch.supplier_id,
            warehouse_id: patch.warehouse_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrderRow {
    pub id: i64,
    pub user_id: i64,
    pub inventory_id: i64,
    pub vendor_id: Option<i64>,
    pub quantity: i32,
    pub total_price: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            inventory_id: row.inventory_id,
            vendor_id: row.vendor_id,
            quantity: row.quantity,
            total_price: row.total_price,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = orders)]
pub(crate) struct NewOrderRow<'a> {
    pub user_id: i64,
    pub inventory_id: i64,
    pub vendor_id: Option<i64>,
    pub quantity: i32,
    pub total_price: f64,
    pub status: &'a str,
}

impl<'a> From<&'a OrderDraft> for NewOrderRow<'a> {
    fn from(draft: &'a OrderDraft) -> Self {
        Self {
            user_id: draft.user_id,
            inventory_id: draft.inventory_id,
            vendor_id: draft.vendor_id,
            quantity: draft.quantity,
            total_price: draft.total_price,
            status: draft.status_or_default(),
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = orders)]
pub(crate) struct OrderChangeset<'a> {
    pub vendor_id: Option<i64>,
    pub quantity: Option<i32>,
    pub total_price: Option<f64>,
    pub status: Option<&'a str>,
}

impl<'a> From<&'a OrderPatch> for OrderChangeset<'a> {
    fn from(patch: &'a OrderPatch) -> Self {
        Self {
            vendor_id: patch.vendor_id,
            quantity: patch.quantity,
            total_price: patch.total_price,
            status: patch.status.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Shipments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = shipments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ShipmentRow {
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

impl From<ShipmentRow> for Shipment {
    fn from(row: ShipmentRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            tracking_number: row.tracking_number,
            carrier: row.carrier,
            shipping_status: row.shipping_status,
            origin: row.origin,
            destination: row.destination,
            warehouse_id: row.warehouse_id,
            product_id: row.product_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = shipments)]
pub(crate) struct NewShipmentRow<'a> {
    pub order_id: i64,
    pub tracking_number: &'a str,
    pub carrier: &'a str,
    pub shipping_status: &'a str,
    pub origin: &'a str,
    pub destination: &'a str,
    pub warehouse_id: Option<i64>,
    pub product_id: Option<i64>,
}

impl<'a> From<&'a ShipmentDraft> for NewShipmentRow<'a> {
    fn from(draft: &'a ShipmentDraft) -> Self {
        Self {
            order_id: draft.order_id,
            tracking_number: &draft.tracking_number,
            carrier: &draft.carrier,
            shipping_status: draft.status_or_default(),
            origin: &draft.origin,
            destination: &draft.destination,
            warehouse_id: draft.warehouse_id,
            product_id: draft.product_id,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = shipments)]
pub(crate) struct ShipmentChangeset<'a> {
    pub tracking_number: Option<&'a str>,
    pub carrier: Option<&'a str>,
    pub shipping_status: Option<&'a str>,
    pub origin: Option<&'a str>,
    pub destination: Option<&'a str>,
    pub warehouse_id: Option<i64>,
    pub product_id: Option<i64>,
}

impl<'a> From<&'a ShipmentPatch> for ShipmentChangeset<'a> {
    fn from(patch: &'a ShipmentPatch) -> Self {
        Self {
            tracking_number: patch.tracking_number.as_deref(),
            carrier: patch.carrier.as_deref(),
            shipping_status: patch.shipping_status.as_deref(),
            origin: patch.origin.as_deref(),
            destination: patch.destination.as_deref(),
            warehouse_id: patch.warehouse_id,
            product_id: patch.product_id,
        }
    }
}
