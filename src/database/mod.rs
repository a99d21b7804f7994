pub mod manager;
pub mod models;
pub mod query_builder;
pub mod repository;
pub mod schema;

pub use manager::{DatabaseError, DatabaseManager};
pub use repository::Repository;

/// Table names, one per collection
pub mod tables {
    pub const CASES: &str = "cases";
    pub const DEPARTMENTS: &str = "departments";
    pub const SUB_DEPARTMENTS: &str = "sub_departments";
    pub const EMAIL_REMINDERS: &str = "email_reminders";
    pub const ADMINS: &str = "admins";
}

/// SQLSTATE codes the services react to
pub mod sqlstate {
    pub const FOREIGN_KEY_VIOLATION: &str = "23503";
    pub const UNIQUE_VIOLATION: &str = "23505";
}

/// True when `err` is a server-side error carrying the given SQLSTATE
pub fn violates(err: &sqlx::Error, code: &str) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .map_or(false, |c| c == code)
}
