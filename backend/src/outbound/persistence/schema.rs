//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `password` holds an Argon2id PHC digest.
    users (id) {
        id -> Int8,
        name -> Text,
        email -> Text,
        password -> Text,
        role -> Text,
        verified -> Bool,
        permissions -> Array<Text>,
        phone -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    addresses (id) {
        id -> Int8,
        user_id -> Int8,
        street -> Text,
        city -> Text,
        state -> Text,
        zip_code -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    vendors (id) {
        id -> Int8,
        name -> Text,
        contact_info -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    suppliers (id) {
        id -> Int8,
        name -> Text,
        category -> Text,
        location -> Text,
        rating -> Nullable<Float8>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    products (id) {
        id -> Int8,
        name -> Text,
        category -> Text,
        price -> Float8,
        stock -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Stock lines; `sku` is unique.
    inventory (id) {
        id -> Int8,
        name -> Text,
        sku -> Text,
        quantity -> Int4,
        price -> Float8,
        vendor_id -> Nullable<Int8>,
        product_id -> Nullable<Int8>,
        warehouse_id -> Nullable<Int8>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    items (id) {
        id -> Int8,
        name -> Text,
        category -> Text,
        quantity -> Int4,
        price -> Float8,
        supplier_id -> Nullable<Int8>,
        warehouse_id -> Nullable<Int8>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    orders (id) {
        id -> Int8,
        user_id -> Int8,
        inventory_id -> Int8,
        vendor_id -> Nullable<Int8>,
        quantity -> Int4,
        total_price -> Float8,
        status -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    shipments (id) {
        id -> Int8,
        order_id -> Int8,
        tracking_number -> Text,
        carrier -> Text,
        shipping_status -> Text,
        origin -> Text,
        destination -> Text,
        warehouse_id -> Nullable<Int8>,
        product_id -> Nullable<Int8>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(addresses -> users (user_id));
diesel::joinable!(inventory -> vendors (vendor_id));
diesel::joinable!(inventory -> products (product_id));
diesel::joinable!(items -> suppliers (supplier_id));
diesel::joinable!(orders -> users (user_id));
diesel::joinable!(orders -> inventory (inventory_id));
diesel::joinable!(shipments -> orders (order_id));

diesel::allow_tables_to_appear_in_same_query!(
    users, addresses, vendors, suppliers, products, inventory, items, orders, shipments,
);
