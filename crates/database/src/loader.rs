use configuration::LoadMode;
use polars::prelude::*;
use sqlx::{Postgres, QueryBuilder, Transaction};
use tracing::{debug, info};

use crate::connection::DbHandle;
use crate::error::DbError;
use crate::schema::{ColumnValues, SqlType, column_definitions, dataset_schema, quote_ident};

/// PostgreSQL accepts at most this many bind parameters per statement.
const MAX_BIND_PARAMS: usize = u16::MAX as usize;

/// Upper bound on rows per `INSERT`, independent of the column count.
const MAX_ROWS_PER_INSERT: usize = 1_000;

/// Persists `df` into `table`.
///
/// With [`LoadMode::Replace`] the table is dropped and recreated from the
/// dataset schema, so repeated loads leave only the latest data. With
/// [`LoadMode::Append`] an existing table must already have the dataset's
/// columns and types. Everything runs in one transaction. Returns the number
/// of rows inserted.
pub async fn load_to_db(
    df: &DataFrame,
    table: &str,
    handle: &DbHandle,
    mode: LoadMode,
) -> Result<u64, DbError> {
    validate_table_name(table)?;
    let schema = dataset_schema(df);
    let columns = df
        .get_columns()
        .iter()
        .map(ColumnValues::from_series)
        .collect::<Result<Vec<_>, _>>()?;

    let mut tx = handle.pool().begin().await?;

    match mode {
        LoadMode::Replace => {
            sqlx::query(&format!("DROP TABLE IF EXISTS {}", quote_ident(table)))
                .execute(&mut *tx)
                .await?;
            sqlx::query(&format!(
                "CREATE TABLE {} ({})",
                quote_ident(table),
                column_definitions(&schema)
            ))
            .execute(&mut *tx)
            .await?;
        }
        LoadMode::Append => {
            sqlx::query(&format!(
                "CREATE TABLE IF NOT EXISTS {} ({})",
                quote_ident(table),
                column_definitions(&schema)
            ))
            .execute(&mut *tx)
            .await?;

            let existing = table_schema(&mut tx, table).await?;
            if existing != schema {
                return Err(DbError::SchemaMismatch {
                    table: table.to_string(),
                    detail: format!(
                        "table has [{}], dataset has [{}]",
                        column_definitions(&existing),
                        column_definitions(&schema)
                    ),
                });
            }
        }
    }

    let inserted = insert_rows(&mut tx, table, &schema, &columns, df.height()).await?;
    tx.commit().await?;

    info!("Loaded {} rows into '{}' ({:?})", inserted, table, mode);
    Ok(inserted)
}

/// Reads `table` back into a `DataFrame`, columns in ordinal order and rows
/// in storage order.
pub async fn fetch_table(handle: &DbHandle, table: &str) -> Result<DataFrame, DbError> {
    validate_table_name(table)?;
    let mut tx = handle.pool().begin().await?;
    let schema = table_schema(&mut tx, table).await?;
    if schema.is_empty() {
        return Err(DbError::TableNotFound(table.to_string()));
    }

    let rows = sqlx::query(&select_statement(table, &schema))
        .fetch_all(&mut *tx)
        .await?;
    tx.commit().await?;

    let series = schema
        .iter()
        .enumerate()
        .map(|(index, (name, sql_type))| {
            ColumnValues::from_rows(&rows, index, *sql_type).map(|values| values.into_series(name))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DataFrame::new(series)?)
}

/// Drops `table` if it exists.
pub async fn drop_table(handle: &DbHandle, table: &str) -> Result<(), DbError> {
    validate_table_name(table)?;
    sqlx::query(&format!("DROP TABLE IF EXISTS {}", quote_ident(table)))
        .execute(handle.pool())
        .await?;
    debug!("Dropped table '{}'", table);
    Ok(())
}

/// `SELECT` reading every column of `table` as its mapped type, in physical
/// order, which for a freshly loaded table is insertion order.
fn select_statement(table: &str, schema: &[(String, SqlType)]) -> String {
    let select_list = schema
        .iter()
        .map(|(name, sql_type)| format!("CAST({} AS {})", quote_ident(name), sql_type))
        .collect::<Vec<_>>()
        .join(", ");
    format!("SELECT {} FROM {} ORDER BY ctid", select_list, quote_ident(table))
}

fn validate_table_name(table: &str) -> Result<(), DbError> {
    if table.trim().is_empty() || table.contains('\0') {
        return Err(DbError::InvalidTableName(table.to_string()));
    }
    Ok(())
}

/// Columns of `table` in the current schema, empty if the table is absent.
async fn table_schema(
    tx: &mut Transaction<'_, Postgres>,
    table: &str,
) -> Result<Vec<(String, SqlType)>, DbError> {
    let columns: Vec<(String, String)> = sqlx::query_as(
        "SELECT column_name::text, data_type::text \
         FROM information_schema.columns \
         WHERE table_schema = current_schema() AND table_name = $1 \
         ORDER BY ordinal_position",
    )
    .bind(table)
    .fetch_all(&mut **tx)
    .await?;

    Ok(columns
        .into_iter()
        .map(|(name, data_type)| (name, SqlType::from_information_schema(&data_type)))
        .collect())
}

/// Rows per `INSERT` for a table of `width` columns.
fn rows_per_batch(width: usize) -> usize {
    (MAX_BIND_PARAMS / width.max(1)).clamp(1, MAX_ROWS_PER_INSERT)
}

async fn insert_rows(
    tx: &mut Transaction<'_, Postgres>,
    table: &str,
    schema: &[(String, SqlType)],
    columns: &[ColumnValues],
    height: usize,
) -> Result<u64, DbError> {
    if columns.is_empty() || height == 0 {
        return Ok(0);
    }

    let column_list = schema
        .iter()
        .map(|(name, _)| quote_ident(name))
        .collect::<Vec<_>>()
        .join(", ");
    let batch = rows_per_batch(columns.len());
    let mut inserted = 0;

    for start in (0..height).step_by(batch) {
        let end = (start + batch).min(height);
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("INSERT INTO {} ({}) ", quote_ident(table), column_list));

        builder.push_values(start..end, |mut row_values, row| {
            for column in columns {
                match column {
                    ColumnValues::BigInt(v) => row_values.push_bind(v[row]),
                    ColumnValues::Double(v) => row_values.push_bind(v[row]),
                    ColumnValues::Boolean(v) => row_values.push_bind(v[row]),
                    ColumnValues::Text(v) => row_values.push_bind(v[row].clone()),
                };
            }
        });

        let result = builder.build().execute(&mut **tx).await?;
        inserted += result.rows_affected();
        debug!("Inserted rows {}..{} into '{}'", start, end, table);
    }

    Ok(inserted)
}
