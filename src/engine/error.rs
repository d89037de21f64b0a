//! Error types for the reconciliation engine.

use crate::client::ClientError;
use thiserror::Error;

/// Errors during engine construction and row processing.
///
/// Only `MissingIdentityMapping` escapes to the caller before the row loop;
/// everything else is caught at the row boundary and converted into a
/// `RowOutcome::Failed`.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Identity field absent or unmapped in the field mapping table.
    #[error("Identity field '{0}' is not mapped to a CSV column")]
    MissingIdentityMapping(String),

    /// A remote client call failed for this row.
    #[error(transparent)]
    Client(#[from] ClientError),
}
