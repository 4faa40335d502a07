//! Error type for configuration loading and validation.

/// Errors raised while loading or validating a [`GraphConfig`](crate::GraphConfig).
///
/// None of these can happen once the scene is running: every value the
/// per-frame code divides by or multiplies with is checked up front.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// A value is NaN or infinite.
	#[error("config value `{field}` must be finite, got {value}")]
	NonFinite { field: &'static str, value: f64 },
	/// A value that must be positive is not.
	#[error("config value `{field}` must be greater than zero, got {value}")]
	NonPositive { field: &'static str, value: f64 },
	/// A value lies outside its allowed range.
	#[error("config value `{field}` must lie in {min}..={max}, got {value}")]
	OutOfRange {
		field: &'static str,
		value: f64,
		min: f64,
		max: f64,
	},
	/// `zoom_min` exceeds `zoom_max`.
	#[error("zoom extent is inverted: min {min} > max {max}")]
	InvertedZoomExtent { min: f64, max: f64 },
	/// The JSON document is malformed or mistyped.
	#[error("failed to parse graph config: {0}")]
	Parse(#[from] serde_json::Error),
}

/// Result alias for configuration loading.
pub type Result<T> = std::result::Result<T, Error>;
