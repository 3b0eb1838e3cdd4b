//! Generic reader for static reference tables.
//!
//! A reference table is read-only lookup data with an integer primary key. Row types opt in by
//! implementing [`ReferenceRow`], which names the table and its column list; the reader then
//! serves `find_all` and `find_one` for any such type.

use crate::db::errors::Result;
use sqlx::{FromRow, PgConnection, postgres::PgRow};
use tracing::instrument;

pub trait ReferenceRow: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    const TABLE: &'static str;
    const COLUMNS: &'static str;
}

pub struct Reference<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Reference<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self), fields(table = T::TABLE), err)]
    pub async fn find_all<T: ReferenceRow>(&mut self) -> Result<Vec<T>> {
        let rows = sqlx::query_as::<_, T>(&format!("SELECT {} FROM {} ORDER BY id ASC", T::COLUMNS, T::TABLE))
            .fetch_all(&mut *self.db)
            .await?;

        Ok(rows)
    }

    #[instrument(skip(self), fields(table = T::TABLE), err)]
    pub async fn find_one<T: ReferenceRow>(&mut self, id: i64) -> Result<Option<T>> {
        let row = sqlx::query_as::<_, T>(&format!("SELECT {} FROM {} WHERE id = $1", T::COLUMNS, T::TABLE))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(row)
    }
}
