use polars::prelude::*;
use sqlx::Row;
use sqlx::postgres::PgRow;
use std::fmt;

use crate::error::DbError;

/// The column types a dataset is mapped onto in PostgreSQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    BigInt,
    Double,
    Boolean,
    Text,
}

impl SqlType {
    /// Integers become `BIGINT`, floats `DOUBLE PRECISION`, booleans
    /// `BOOLEAN`; everything else (text, all-null, temporal) is stored as `TEXT`.
    pub fn for_dtype(dtype: &DataType) -> Self {
        if dtype.is_integer() {
            SqlType::BigInt
        } else if dtype.is_float() {
            SqlType::Double
        } else if dtype == &DataType::Boolean {
            SqlType::Boolean
        } else {
            SqlType::Text
        }
    }

    /// Maps an `information_schema.columns.data_type` value back to the
    /// closest supported type.
    pub fn from_information_schema(data_type: &str) -> Self {
        match data_type {
            "bigint" | "integer" | "smallint" => SqlType::BigInt,
            "double precision" | "real" => SqlType::Double,
            "boolean" => SqlType::Boolean,
            _ => SqlType::Text,
        }
    }

    pub fn sql_name(&self) -> &'static str {
        match self {
            SqlType::BigInt => "BIGINT",
            SqlType::Double => "DOUBLE PRECISION",
            SqlType::Boolean => "BOOLEAN",
            SqlType::Text => "TEXT",
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

/// Quotes an SQL identifier, doubling any embedded double quote.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Name and mapped type of every column of `df`, in order.
pub fn dataset_schema(df: &DataFrame) -> Vec<(String, SqlType)> {
    df.get_columns()
        .iter()
        .map(|s| (s.name().to_string(), SqlType::for_dtype(s.dtype())))
        .collect()
}

/// `"a" BIGINT, "b" TEXT` for use in `CREATE TABLE`.
pub fn column_definitions(schema: &[(String, SqlType)]) -> String {
    schema
        .iter()
        .map(|(name, sql_type)| format!("{} {}", quote_ident(name), sql_type))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One column's values, converted to the Rust type bound for its `SqlType`.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    BigInt(Vec<Option<i64>>),
    Double(Vec<Option<f64>>),
    Boolean(Vec<Option<bool>>),
    Text(Vec<Option<String>>),
}

impl ColumnValues {
    pub fn from_series(series: &Series) -> Result<Self, DbError> {
        let values = match SqlType::for_dtype(series.dtype()) {
            SqlType::BigInt => {
                let cast = series.cast(&DataType::Int64)?;
                ColumnValues::BigInt(cast.i64()?.into_iter().collect())
            }
            SqlType::Double => {
                let cast = series.cast(&DataType::Float64)?;
                ColumnValues::Double(cast.f64()?.into_iter().collect())
            }
            SqlType::Boolean => ColumnValues::Boolean(series.bool()?.into_iter().collect()),
            SqlType::Text => {
                let cast = series.cast(&DataType::String)?;
                ColumnValues::Text(
                    cast.str()?
                        .into_iter()
                        .map(|v| v.map(str::to_owned))
                        .collect(),
                )
            }
        };
        Ok(values)
    }

    /// Reads column `index` of every row, decoding it as `sql_type`.
    pub fn from_rows(rows: &[PgRow], index: usize, sql_type: SqlType) -> Result<Self, DbError> {
        let values = match sql_type {
            SqlType::BigInt => ColumnValues::BigInt(
                rows.iter()
                    .map(|row| row.try_get::<Option<i64>, _>(index))
                    .collect::<Result<_, _>>()?,
            ),
            SqlType::Double => ColumnValues::Double(
                rows.iter()
                    .map(|row| row.try_get::<Option<f64>, _>(index))
                    .collect::<Result<_, _>>()?,
            ),
            SqlType::Boolean => ColumnValues::Boolean(
                rows.iter()
                    .map(|row| row.try_get::<Option<bool>, _>(index))
                    .collect::<Result<_, _>>()?,
            ),
            SqlType::Text => ColumnValues::Text(
                rows.iter()
                    .map(|row| row.try_get::<Option<String>, _>(index))
                    .collect::<Result<_, _>>()?,
            ),
        };
        Ok(values)
    }

    pub fn into_series(self, name: &str) -> Series {
        match self {
            ColumnValues::BigInt(v) => Series::new(name, v),
            ColumnValues::Double(v) => Series::new(name, v),
            ColumnValues::Boolean(v) => Series::new(name, v),
            ColumnValues::Text(v) => Series::new(name, v),
        }
    }
}
