use thiserror::Error;

/// Rejected tuning value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("`{field}` must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("`{field}` must be non-negative and finite, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("`{low_field}` ({low}) must be below `{high_field}` ({high})")]
    InvertedRange {
        low_field: &'static str,
        low: f32,
        high_field: &'static str,
        high: f32,
    },
}

pub fn ensure_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

pub fn ensure_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}
