use configuration::Normalization;
use polars::prelude::*;

use crate::error::TransformError;

/// A column-level normalization pass run on the concatenated dataset.
///
/// Implementations must keep the row count and the set of columns intact.
pub trait Normalizer: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    fn normalize(&self, df: DataFrame) -> Result<DataFrame, TransformError>;
}

/// Returns the dataset unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Normalizer for Passthrough {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    fn normalize(&self, df: DataFrame) -> Result<DataFrame, TransformError> {
        Ok(df)
    }
}

/// Strips leading and trailing whitespace from every text value.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimStrings;

impl Normalizer for TrimStrings {
    fn name(&self) -> &'static str {
        "trim_strings"
    }

    fn normalize(&self, mut df: DataFrame) -> Result<DataFrame, TransformError> {
        let text_columns: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|s| s.dtype() == &DataType::String)
            .map(|s| s.name().to_string())
            .collect();

        let failed = |source| TransformError::Normalize {
            policy: self.name(),
            source,
        };

        for name in text_columns {
            let trimmed: StringChunked = df
                .column(&name)
                .and_then(|s| s.str())
                .map_err(failed)?
                .into_iter()
                .map(|value| value.map(str::trim))
                .collect();
            let mut trimmed = trimmed.into_series();
            trimmed.rename(&name);
            df.with_column(trimmed).map_err(failed)?;
        }

        Ok(df)
    }
}

/// Maps the configured policy to its implementation.
pub fn normalizer_for(policy: Normalization) -> Box<dyn Normalizer> {
    match policy {
        Normalization::Passthrough => Box::new(Passthrough),
        Normalization::TrimStrings => Box::new(TrimStrings),
    }
}
