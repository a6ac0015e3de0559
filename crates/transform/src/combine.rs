use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::error::TransformError;
use crate::normalize::Normalizer;

/// Concatenates a one-shot sequence of datasets and normalizes the result.
///
/// The sequence is pulled exactly once. The first `Err` it yields is returned
/// as-is and nothing after it is pulled, so upstream read failures keep their
/// own error type.
pub fn transform_data<I, E>(frames: I, normalizer: &dyn Normalizer) -> Result<DataFrame, E>
where
    I: IntoIterator<Item = Result<DataFrame, E>>,
    E: From<TransformError>,
{
    let mut collected = Vec::new();
    for frame in frames {
        collected.push(frame?);
    }
    let inputs = collected.len();

    let combined = concat_frames(collected)?;
    let normalized = normalizer.normalize(combined)?;

    info!(
        "Combined {} datasets into {} rows x {} columns (normalization: {})",
        inputs,
        normalized.height(),
        normalized.width(),
        normalizer.name()
    );
    Ok(normalized)
}

/// Stacks `frames` row-wise, aligning columns by name.
///
/// Columns appear in first-seen order. Gaps are filled with nulls and
/// conflicting column types are reconciled before stacking.
pub fn concat_frames(frames: Vec<DataFrame>) -> Result<DataFrame, TransformError> {
    if frames.is_empty() {
        return Ok(DataFrame::empty());
    }

    let frames = reconcile_types(frames)?;
    polars::functions::concat_df_diagonal(&frames).map_err(TransformError::Concat)
}

/// Casts every column that carries different types across `frames` to one
/// common type, so the frames can be stacked.
fn reconcile_types(mut frames: Vec<DataFrame>) -> Result<Vec<DataFrame>, TransformError> {
    let mut dtypes: BTreeMap<String, Vec<DataType>> = BTreeMap::new();
    for df in &frames {
        for series in df.get_columns() {
            let seen = dtypes.entry(series.name().to_string()).or_default();
            if !seen.contains(series.dtype()) {
                seen.push(series.dtype().clone());
            }
        }
    }

    let targets: Vec<(String, DataType)> = dtypes
        .into_iter()
        .filter(|(_, seen)| seen.len() > 1)
        .map(|(name, seen)| {
            let target = common_type(&seen);
            (name, target)
        })
        .collect();

    for (name, target) in &targets {
        debug!("Reconciling column '{}' to {}", name, target);
    }

    for df in frames.iter_mut() {
        for (name, target) in &targets {
            let cast = match df.column(name) {
                Ok(series) if series.dtype() != target => {
                    series
                        .cast(target)
                        .map_err(|source| TransformError::Reconcile {
                            column: name.clone(),
                            source,
                        })?
                }
                _ => continue,
            };
            df.with_column(cast)
                .map_err(|source| TransformError::Reconcile {
                    column: name.clone(),
                    source,
                })?;
        }
    }

    Ok(frames)
}

/// All-null columns adopt the other type, numeric conflicts widen to
/// `Float64`, anything else becomes text.
fn common_type(dtypes: &[DataType]) -> DataType {
    let concrete: Vec<&DataType> = dtypes.iter().filter(|d| **d != DataType::Null).collect();
    match concrete.as_slice() {
        [] => DataType::Null,
        [only] => (*only).clone(),
        many if many.iter().all(|d| d.is_numeric()) => DataType::Float64,
        _ => DataType::String,
    }
}
