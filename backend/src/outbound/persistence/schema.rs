//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Enumerations
//! (roles, case status, report origin) are stored as text and parsed on read.

diesel::table! {
    /// Registered accounts. `email` carries a unique index.
    users (id) {
        id -> Uuid,
        name -> Text,
        email -> Text,
        password_hash -> Text,
        role -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Forensic cases.
    cases (id) {
        id -> Uuid,
        case_number -> Text,
        title -> Text,
        description -> Nullable<Text>,
        status -> Text,
        location -> Nullable<Text>,
        occurred_on -> Nullable<Date>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Evidence items. `case_id` is indexed but carries no foreign key;
    /// ownership is checked by the application.
    evidence (id) {
        id -> Uuid,
        case_id -> Uuid,
        name -> Text,
        category -> Text,
        collected_at -> Timestamptz,
        description -> Nullable<Text>,
        collection_location -> Nullable<Text>,
        file_url -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Lab reports.
    reports (id) {
        id -> Uuid,
        case_id -> Uuid,
        title -> Text,
        content -> Text,
        author -> Nullable<Text>,
        origin -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Dental-record bank.
    dental_records (id) {
        id -> Uuid,
        patient_name -> Text,
        document_number -> Nullable<Text>,
        dental_chart -> Text,
        notes -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, cases, evidence, reports, dental_records);
