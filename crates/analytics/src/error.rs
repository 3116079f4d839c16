use core_types::CoreError;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// A trade that could not be turned into a `TradeRecord`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("Trade #{index} rejected: {source}")]
pub struct ValidationError {
    /// Position of the offending record in the input batch.
    pub index: usize,
    /// The raw timestamp as it was received.
    pub timestamp: String,
    #[source]
    #[serde(rename = "reason", serialize_with = "serialize_display")]
    pub source: CoreError,
}

fn serialize_display<S: Serializer>(error: &CoreError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid category configuration: {0}")]
    InvalidCategory(#[from] CoreError),

    /// A sum, product or ratio left the range of `Decimal`.
    #[error("Arithmetic overflow while computing {0}")]
    Overflow(&'static str),
}
