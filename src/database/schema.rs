use crate::domain::{Model, Provider};

/// A record type with a persisted table
pub trait Record {
    const TABLE: &'static str;

    /// Idempotent DDL creating the table when it is missing
    const SCHEMA: &'static str;
}

impl Record for Provider {
    const TABLE: &'static str = "providers";
    const SCHEMA: &'static str = "CREATE TABLE IF NOT EXISTS providers (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        account_id TEXT NOT NULL,
        provider_type TEXT NOT NULL,
        api_key TEXT NOT NULL
    )";
}

impl Record for Model {
    const TABLE: &'static str = "models";
    const SCHEMA: &'static str = "CREATE TABLE IF NOT EXISTS models (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        account_id TEXT NOT NULL,
        provider_id TEXT NOT NULL
    )";
}

/// Tables synchronised when the database is opened, in creation order
pub const REGISTERED_RECORDS: &[(&str, &str)] = &[
    (Provider::TABLE, Provider::SCHEMA),
    (Model::TABLE, Model::SCHEMA),
];
