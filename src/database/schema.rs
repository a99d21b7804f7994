//! Table definitions, applied idempotently at startup.
//!
//! Referential rules live here rather than in handlers: the primary key on
//! `departments.id` rejects duplicate codes, and the RESTRICT foreign key on
//! `cases.sub_department_id` keeps a referenced sub-department from being
//! removed even when two requests interleave.

use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS departments (
        id          INTEGER PRIMARY KEY,
        name_en     TEXT NOT NULL,
        name_hi     TEXT NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sub_departments (
        id             UUID PRIMARY KEY,
        department_id  INTEGER NOT NULL REFERENCES departments (id) ON DELETE RESTRICT,
        name_en        TEXT NOT NULL,
        name_hi        TEXT NOT NULL,
        created_at     TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at     TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS sub_departments_department_id_idx ON sub_departments (department_id)",
    r#"
    CREATE TABLE IF NOT EXISTS cases (
        id                     UUID PRIMARY KEY,
        case_number            TEXT NOT NULL,
        name                   TEXT NOT NULL,
        filing_date            TIMESTAMPTZ NOT NULL,
        petition_number        TEXT,
        notice_number          TEXT,
        writ_type              TEXT,
        department             INTEGER NOT NULL,
        sub_department_id      UUID REFERENCES sub_departments (id) ON DELETE RESTRICT,
        status                 TEXT NOT NULL DEFAULT 'Pending' CHECK (status IN ('Pending', 'Resolved')),
        hearing_date           TIMESTAMPTZ,
        affidavit_due_date     TIMESTAMPTZ,
        affidavit_filing_date  TIMESTAMPTZ,
        reminder_count         INTEGER NOT NULL DEFAULT 0,
        reminder_sent          BOOLEAN NOT NULL DEFAULT FALSE,
        last_reminder_sent     TIMESTAMPTZ,
        created_at             TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at             TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS cases_sub_department_id_idx ON cases (sub_department_id)",
    "CREATE INDEX IF NOT EXISTS cases_department_idx ON cases (department)",
    "CREATE INDEX IF NOT EXISTS cases_created_at_idx ON cases (created_at DESC)",
    r#"
    CREATE TABLE IF NOT EXISTS email_reminders (
        id               UUID PRIMARY KEY,
        case_id          UUID NOT NULL REFERENCES cases (id) ON DELETE CASCADE,
        recipient_email  TEXT NOT NULL,
        sent_at          TIMESTAMPTZ NOT NULL DEFAULT now(),
        status           TEXT NOT NULL DEFAULT 'sent' CHECK (status IN ('sent', 'failed'))
    )
    "#,
    "CREATE INDEX IF NOT EXISTS email_reminders_case_id_idx ON email_reminders (case_id)",
    r#"
    CREATE TABLE IF NOT EXISTS admins (
        id             UUID PRIMARY KEY,
        email          TEXT NOT NULL UNIQUE,
        password_hash  TEXT NOT NULL,
        created_at     TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
];

/// Create any missing tables and indexes.
pub async fn bootstrap(pool: &PgPool) -> Result<(), DatabaseError> {
    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema ready ({} statements applied)", STATEMENTS.len());
    Ok(())
}
