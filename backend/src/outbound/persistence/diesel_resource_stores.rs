//! PostgreSQL-backed `ResourceStore` implementations, one per resource table.
//!
//! The CRUD plumbing is identical across tables and generated by
//! [`diesel_resource_store!`]; only the query filters differ, so each store
//! supplies its own `apply_*_filter` function over a boxed query.

use async_trait::async_trait;
use chrono::Utc;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ResourceStore, ResourceStoreError};
use crate::domain::resources::{
    Inventory, InventoryFilter, Item, ItemFilter, Order, OrderFilter, Product, ProductFilter,
    Resource, Shipment, ShipmentFilter, Supplier, SupplierFilter, Vendor, VendorFilter,
};

use super::diesel_basic_error_mapping::{
    DieselFailure, classify_diesel_error, constraint_label, pool_error_message,
};
use super::models::{
    InventoryChangeset, InventoryRow, ItemChangeset, ItemRow, NewInventoryRow, NewItemRow,
    NewOrderRow, NewProductRow, NewShipmentRow, NewSupplierRow, NewVendorRow, OrderChangeset,
    OrderRow, ProductChangeset, ProductRow, ShipmentChangeset, ShipmentRow, SupplierChangeset,
    SupplierRow, VendorChangeset, VendorRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{inventory, items, orders, products, shipments, suppliers, vendors};

/// Whether a failed statement wrote rows or removed them.
///
/// A foreign key violation means a dangling reference on writes but a row
/// that is still referenced on deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Write,
    Delete,
}

fn map_pool_error(error: PoolError) -> ResourceStoreError {
    ResourceStoreError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, operation: Operation) -> ResourceStoreError {
    match (classify_diesel_error(error), operation) {
        (DieselFailure::Connection(message), _) => ResourceStoreError::connection(message),
        (DieselFailure::Query(message), _) => ResourceStoreError::query(message),
        (DieselFailure::UniqueViolation { constraint }, _) => {
            ResourceStoreError::conflict(constraint_label(constraint.as_deref()).to_owned())
        }
        (DieselFailure::ForeignKeyViolation { constraint }, Operation::Write) => {
            ResourceStoreError::invalid_reference(
                constraint_label(constraint.as_deref()).to_owned(),
            )
        }
        (DieselFailure::ForeignKeyViolation { constraint }, Operation::Delete) => {
            ResourceStoreError::conflict(format!(
                "still referenced through {}",
                constraint_label(constraint.as_deref())
            ))
        }
    }
}

/// Generate a Diesel store type implementing [`ResourceStore`] for one table.
macro_rules! diesel_resource_store {
    (
        $(#[$meta:meta])*
        $store:ident for $resource:ty {
            table: $table:ident,
            row: $row:ident,
            insert: $new_row:ident,
            changeset: $changeset:ident,
            filter: $apply_filter:ident $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $store {
            pool: DbPool,
        }

        impl $store {
            /// Create a new store with the given connection pool.
            pub fn new(pool: DbPool) -> Self {
                Self { pool }
            }
        }

        #[async_trait]
        impl ResourceStore<$resource> for $store {
            async fn create(
                &self,
                draft: &<$resource as Resource>::Draft,
            ) -> Result<$resource, ResourceStoreError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                diesel::insert_into($table::table)
                    .values($new_row::from(draft))
                    .returning($row::as_returning())
                    .get_result::<$row>(&mut conn)
                    .await
                    .map(Into::into)
                    .map_err(|err| map_diesel_error(err, Operation::Write))
            }

            async fn find(&self, id: i64) -> Result<Option<$resource>, ResourceStoreError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                $table::table
                    .find(id)
                    .select($row::as_select())
                    .first::<$row>(&mut conn)
                    .await
                    .optional()
                    .map(|row| row.map(Into::into))
                    .map_err(|err| map_diesel_error(err, Operation::Write))
            }

            async fn list(
                &self,
                filter: &<$resource as Resource>::Filter,
            ) -> Result<Vec<$resource>, ResourceStoreError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                $apply_filter($table::table.into_boxed(), filter)
                    .order($table::id.asc())
                    .select($row::as_select())
                    .load::<$row>(&mut conn)
                    .await
                    .map(|rows| rows.into_iter().map(Into::into).collect())
                    .map_err(|err| map_diesel_error(err, Operation::Write))
            }

            async fn update(
                &self,
                id: i64,
                patch: &<$resource as Resource>::Patch,
            ) -> Result<Option<$resource>, ResourceStoreError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                diesel::update($table::table.find(id))
                    .set(($changeset::from(patch), $table::updated_at.eq(Utc::now())))
                    .returning($row::as_returning())
                    .get_result::<$row>(&mut conn)
                    .await
                    .optional()
                    .map(|row| row.map(Into::into))
                    .map_err(|err| map_diesel_error(err, Operation::Write))
            }

            async fn delete(&self, id: i64) -> Result<bool, ResourceStoreError> {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                diesel::delete($table::table.find(id))
                    .execute(&mut conn)
                    .await
                    .map(|removed| removed > 0)
                    .map_err(|err| map_diesel_error(err, Operation::Delete))
            }
        }
    };
}

fn apply_vendor_filter<'a>(
    mut query: vendors::BoxedQuery<'a, Pg>,
    filter: &'a VendorFilter,
) -> vendors::BoxedQuery<'a, Pg> {
    if let Some(name) = &filter.name {
        query = query.filter(vendors::name.eq(name));
    }
    query
}

fn apply_supplier_filter<'a>(
    mut query: suppliers::BoxedQuery<'a, Pg>,
    filter: &'a SupplierFilter,
) -> suppliers::BoxedQuery<'a, Pg> {
    if let Some(category) = &filter.category {
        query = query.filter(suppliers::category.eq(category));
    }
    if let Some(location) = &filter.location {
        query = query.filter(suppliers::location.eq(location));
    }
    // NULL ratings never compare, so unrated suppliers drop out.
    if let Some(min_rating) = filter.min_rating {
        query = query.filter(suppliers::rating.ge(min_rating));
    }
    query
}

fn apply_product_filter<'a>(
    mut query: products::BoxedQuery<'a, Pg>,
    filter: &'a ProductFilter,
) -> products::BoxedQuery<'a, Pg> {
    if let Some(category) = &filter.category {
        query = query.filter(products::category.eq(category));
    }
    if let Some(stock) = filter.stock {
        query = query.filter(products::stock.eq(stock));
    }
    if let Some(min) = filter.min_stock {
        query = query.filter(products::stock.ge(min));
    }
    if let Some(max) = filter.max_stock {
        query = query.filter(products::stock.le(max));
    }
    if let Some(min) = filter.min_price {
        query = query.filter(products::price.ge(min));
    }
    if let Some(max) = filter.max_price {
        query = query.filter(products::price.le(max));
    }
    query
}

fn apply_inventory_filter<'a>(
    mut query: inventory::BoxedQuery<'a, Pg>,
    filter: &'a InventoryFilter,
) -> inventory::BoxedQuery<'a, Pg> {
    if let Some(vendor_id) = filter.vendor_id {
        query = query.filter(inventory::vendor_id.eq(vendor_id));
    }
    if let Some(product_id) = filter.product_id {
        query = query.filter(inventory::product_id.eq(product_id));
    }
    if let Some(warehouse_id) = filter.warehouse_id {
        query = query.filter(inventory::warehouse_id.eq(warehouse_id));
    }
    if let Some(sku) = &filter.sku {
        query = query.filter(inventory::sku.eq(sku));
    }
    query
}

fn apply_item_filter<'a>(
    mut query: items::BoxedQuery<'a, Pg>,
    filter: &'a ItemFilter,
) -> items::BoxedQuery<'a, Pg> {
    if let Some(category) = &filter.category {
        query = query.filter(items::category.eq(category));
    }
    if let Some(supplier_id) = filter.supplier_id {
        query = query.filter(items::supplier_id.eq(supplier_id));
    }
    if let Some(warehouse_id) = filter.warehouse_id {
        query = query.filter(items::warehouse_id.eq(warehouse_id));
    }
    if let Some(min) = filter.min_quantity {
        query = query.filter(items::quantity.ge(min));
    }
    if let Some(max) = filter.max_quantity {
        query = query.filter(items::quantity.le(max));
    }
    if let Some(min) = filter.min_price {
        query = query.filter(items::price.ge(min));
    }
    if let Some(max) = filter.max_price {
        query = query.filter(items::price.le(max));
    }
    query
}

fn apply_order_filter<'a>(
    mut query: orders::BoxedQuery<'a, Pg>,
    filter: &'a OrderFilter,
) -> orders::BoxedQuery<'a, Pg> {
    if let Some(customer_id) = filter.customer_id {
        query = query.filter(orders::user_id.eq(customer_id));
    }
    if let Some(vendor_id) = filter.vendor_id {
        query = query.filter(orders::vendor_id.eq(vendor_id));
    }
    if let Some(product_id) = filter.product_id {
        query = query.filter(orders::inventory_id.eq(product_id));
    }
    if let Some(status) = &filter.status {
        query = query.filter(orders::status.eq(status));
    }
    if let Some(after) = filter.placed_after {
        query = query.filter(orders::created_at.ge(after));
    }
    if let Some(before) = filter.placed_before {
        query = query.filter(orders::created_at.le(before));
    }
    query
}

fn apply_shipment_filter<'a>(
    mut query: shipments::BoxedQuery<'a, Pg>,
    filter: &'a ShipmentFilter,
) -> shipments::BoxedQuery<'a, Pg> {
    if let Some(order_id) = filter.order_id {
        query = query.filter(shipments::order_id.eq(order_id));
    }
    if let Some(status) = &filter.status {
        query = query.filter(shipments::shipping_status.eq(status));
    }
    if let Some(carrier) = &filter.carrier {
        query = query.filter(shipments::carrier.eq(carrier));
    }
    if let Some(tracking_number) = &filter.tracking_number {
        query = query.filter(shipments::tracking_number.eq(tracking_number));
    }
    if let Some(origin) = &filter.origin {
        query = query.filter(shipments::origin.eq(origin));
    }
    if let Some(destination) = &filter.destination {
        query = query.filter(shipments::destination.eq(destination));
    }
    if let Some(warehouse_id) = filter.warehouse_id {
        query = query.filter(shipments::warehouse_id.eq(warehouse_id));
    }
    if let Some(product_id) = filter.product_id {
        query = query.filter(shipments::product_id.eq(product_id));
    }
    query
}

diesel_resource_store! {
    /// Vendors table.
    DieselVendorStore for Vendor {
        table: vendors,
        row: VendorRow,
        insert: NewVendorRow,
        changeset: VendorChangeset,
        filter: apply_vendor_filter,
    }
}

diesel_resource_store! {
    /// Suppliers table.
    DieselSupplierStore for Supplier {
        table: suppliers,
        row: SupplierRow,
        insert: NewSupplierRow,
        changeset: SupplierChangeset,
        filter: apply_supplier_filter,
    }
}

diesel_resource_store! {
    /// Products table.
    DieselProductStore for Product {
        table: products,
        row: ProductRow,
        insert: NewProductRow,
        changeset: ProductChangeset,
        filter: apply_product_filter,
    }
}

diesel_resource_store! {
    /// Inventory table; duplicate SKUs surface as conflicts.
    DieselInventoryStore for Inventory {
        table: inventory,
        row: InventoryRow,
        insert: NewInventoryRow,
        changeset: InventoryChangeset,
        filter: apply_inventory_filter,
    }
}

diesel_resource_store! {
    /// Items table.
    DieselItemStore for Item {
        table: items,
        row: ItemRow,
        insert: NewItemRow,
        changeset: ItemChangeset,
        filter: apply_item_filter,
    }
}

diesel_resource_store! {
    /// Orders table.
    DieselOrderStore for Order {
        table: orders,
        row: OrderRow,
        insert: NewOrderRow,
        changeset: OrderChangeset,
        filter: apply_order_filter,
    }
}

diesel_resource_store! {
    /// Shipments table.
    DieselShipmentStore for Shipment {
        table: shipments,
        row: ShipmentRow,
        insert: NewShipmentRow,
        changeset: ShipmentChangeset,
        filter: apply_shipment_filter,
    }
}
