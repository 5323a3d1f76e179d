//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation. All monetary columns are `Int8`
//! kobo values, never fractional naira.

diesel::table! {
    /// Registered accounts: parents and admins.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        phone -> Nullable<Varchar>,
        /// Stable role string: `parent` or `admin`.
        role -> Varchar,
        password_hash -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Students and their lunch wallet balances.
    students (id) {
        id -> Uuid,
        parent_id -> Nullable<Uuid>,
        name -> Varchar,
        grade -> Varchar,
        admission_number -> Varchar,
        dietary_preferences -> Array<Text>,
        allergies -> Array<Text>,
        other_allergies -> Nullable<Text>,
        additional_notes -> Nullable<Text>,
        /// Wallet balance in kobo; may go negative.
        balance -> Int8,
        status -> Varchar,
        last_payment_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Funding payments and their gateway lifecycle fields.
    payments (id) {
        id -> Uuid,
        parent_id -> Uuid,
        student_id -> Uuid,
        amount -> Int8,
        payment_type -> Varchar,
        category -> Varchar,
        description -> Nullable<Text>,
        status -> Varchar,
        gateway_ref -> Nullable<Varchar>,
        payment_link -> Nullable<Text>,
        transaction_id -> Nullable<Varchar>,
        gateway_payload -> Nullable<Jsonb>,
        failure_reason -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Canteen menu.
    menu_items (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Nullable<Text>,
        price -> Int8,
        category -> Varchar,
        allergens -> Array<Text>,
        available -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Lunch orders and serve records.
    lunch_orders (id) {
        id -> Uuid,
        student_id -> Uuid,
        menu_item_id -> Nullable<Uuid>,
        amount -> Int8,
        status -> Varchar,
        date -> Timestamptz,
        special_instructions -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One preferences row per student.
    lunch_preferences (student_id) {
        student_id -> Uuid,
        dietary -> Array<Text>,
        allergies -> Array<Text>,
        favorites -> Array<Text>,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Support tickets raised by parents.
    support_tickets (id) {
        id -> Uuid,
        parent_id -> Uuid,
        subject -> Varchar,
        message -> Text,
        priority -> Varchar,
        status -> Varchar,
        attachment_path -> Nullable<Text>,
        admin_response -> Nullable<Text>,
        admin_response_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Conversation entries under a ticket.
    ticket_replies (id) {
        id -> Uuid,
        ticket_id -> Uuid,
        author -> Varchar,
        message -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Stored notification inboxes.
    notifications (id) {
        id -> Uuid,
        recipient_id -> Uuid,
        title -> Varchar,
        body -> Text,
        kind -> Varchar,
        priority -> Varchar,
        read -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(students -> users (parent_id));
diesel::joinable!(payments -> students (student_id));
diesel::joinable!(payments -> users (parent_id));
diesel::joinable!(lunch_orders -> students (student_id));
diesel::joinable!(lunch_orders -> menu_items (menu_item_id));
diesel::joinable!(lunch_preferences -> students (student_id));
diesel::joinable!(support_tickets -> users (parent_id));
diesel::joinable!(ticket_replies -> support_tickets (ticket_id));
diesel::joinable!(notifications -> users (recipient_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    students,
    payments,
    menu_items,
    lunch_orders,
    lunch_preferences,
    support_tickets,
    ticket_replies,
    notifications,
);
