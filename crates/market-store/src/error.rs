//! Store errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Another record already holds this value for a unique field.
    #[error("Duplicate {field}: {value}")]
    Duplicate { field: &'static str, value: String },

    /// One or more schema constraints were violated on insert.
    #[error("{}", .violations.join("; "))]
    Schema { violations: Vec<String> },
}
