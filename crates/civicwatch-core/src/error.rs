use thiserror::Error;

/// Failure to parse a user-supplied value (CLI flag, lookup id) into a core type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("unknown {kind}: {value:?}")]
    Unknown { kind: &'static str, value: String },
}
