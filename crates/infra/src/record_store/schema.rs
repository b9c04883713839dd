//! Per-entity table descriptions for the Postgres backend.

use sqlx::Row;
use sqlx::postgres::{PgArguments, PgRow, Postgres};
use sqlx::query::Query;

use recordkeep_core::{Record, RecordId};
use recordkeep_items::{Item, ItemPatch, NewItem};
use recordkeep_todos::{NewTodo, StatusChange, Todo, TodoPatch};

pub type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// How an entity maps onto its table.
///
/// Statements are plain SQL with positional parameters. `INSERT` and `UPDATE`
/// must return `COLUMNS`. `UPDATE` takes the record id as `$1` followed by the
/// patch fields in the order `bind_patch` binds them; absent fields are bound
/// as NULL and keep the stored value, so the patch is resolved against the row
/// inside the statement itself.
pub trait PgSchema: Record {
    const TABLE: &'static str;
    const CREATE_TABLE: &'static str;
    const COLUMNS: &'static str;
    const INSERT: &'static str;
    const UPDATE: &'static str;

    fn bind_draft<'q>(query: PgQuery<'q>, draft: &'q Self::Draft) -> PgQuery<'q>;

    fn bind_patch<'q>(query: PgQuery<'q>, id: RecordId, patch: &'q Self::Patch) -> PgQuery<'q>;

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error>;
}

impl PgSchema for Item {
    const TABLE: &'static str = "items";
    const CREATE_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS items (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL
        )
    "#;
    const COLUMNS: &'static str = "id, name";
    const INSERT: &'static str = "INSERT INTO items (name) VALUES ($1) RETURNING id, name";
    const UPDATE: &'static str = r#"
        UPDATE items
        SET name = COALESCE($2::VARCHAR, name)
        WHERE id = $1
        RETURNING id, name
    "#;

    fn bind_draft<'q>(query: PgQuery<'q>, draft: &'q NewItem) -> PgQuery<'q> {
        query.bind(draft.name())
    }

    fn bind_patch<'q>(query: PgQuery<'q>, id: RecordId, patch: &'q ItemPatch) -> PgQuery<'q> {
        query.bind(id.get()).bind(patch.name())
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Item {
            id: RecordId::new(row.try_get("id")?),
            name: row.try_get("name")?,
        })
    }
}

impl PgSchema for Todo {
    const TABLE: &'static str = "todos";
    const CREATE_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS todos (
            id BIGSERIAL PRIMARY KEY,
            description VARCHAR(255) NOT NULL,
            completed BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
    "#;
    const COLUMNS: &'static str = "id, description, completed, created_at";
    const INSERT: &'static str = r#"
        INSERT INTO todos (description)
        VALUES ($1)
        RETURNING id, description, completed, created_at
    "#;
    /// `$3` is an explicit value, `$4` asks for a flip of the stored flag.
    const UPDATE: &'static str = r#"
        UPDATE todos
        SET description = COALESCE($2::VARCHAR, description),
            completed = CASE WHEN $4::BOOLEAN THEN NOT completed
                             ELSE COALESCE($3::BOOLEAN, completed) END
        WHERE id = $1
        RETURNING id, description, completed, created_at
    "#;

    fn bind_draft<'q>(query: PgQuery<'q>, draft: &'q NewTodo) -> PgQuery<'q> {
        query.bind(draft.description())
    }

    fn bind_patch<'q>(query: PgQuery<'q>, id: RecordId, patch: &'q TodoPatch) -> PgQuery<'q> {
        let (set, flip) = match patch.status() {
            Some(StatusChange::Set(value)) => (Some(value), false),
            Some(StatusChange::Flip) => (None, true),
            None => (None, false),
        };
        query
            .bind(id.get())
            .bind(patch.description())
            .bind(set)
            .bind(flip)
    }

    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Todo {
            id: RecordId::new(row.try_get("id")?),
            description: row.try_get("description")?,
            completed: row.try_get("completed")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
