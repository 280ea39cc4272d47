use compact_str::CompactString;
use thiserror::Error;

/// HTTP-analogous status attached to every error so that the surrounding
/// protocol layer can answer the client without inspecting the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    BadRequest,
    InternalServerError,
    NotImplemented,
}

impl Status {
    pub const fn code(&self) -> u16 {
        match self {
            Status::BadRequest => 400,
            Status::InternalServerError => 500,
            Status::NotImplemented => 501,
        }
    }
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// Operator, function or aggregation the translator does not implement
    /// for the active dialect
    #[error("Unsupported operator: {name}")]
    UnsupportedOperator { name: CompactString, status: Status },

    /// Filter that is structurally invalid, e.g. wrong argument count
    #[error("Unsupported filter: {name}")]
    UnsupportedFilter { name: CompactString, status: Status },

    /// A literal cannot be coerced to the type required by its counterpart
    #[error("Cannot convert value '{value}' for parameter '{parameter}'")]
    Conversion {
        value: CompactString,
        parameter: CompactString,
    },

    /// A result tree level was populated twice for the same path
    #[error("Result for navigation path '{path}' inserted twice")]
    DuplicateResultInsertion { path: CompactString },

    /// A navigation level was derived with a target type that differs from
    /// the terminal type of its navigation path
    #[error("Navigation path '{path}' targets '{expected}', not '{actual}'")]
    NavigationTargetMismatch {
        path: CompactString,
        expected: CompactString,
        actual: CompactString,
    },

    /// Navigation level id that does not belong to the tree it was used with
    #[error("Navigation level {0} not present in tree")]
    UnknownLevel(usize),

    /// Key column missing from a row
    #[error("Column '{0}' not present in row")]
    MissingColumn(CompactString),

    #[error("Unknown attribute '{attribute}' of '{entity}'")]
    UnknownAttribute {
        entity: CompactString,
        attribute: CompactString,
    },

    #[error("Unknown entity type '{0}'")]
    UnknownEntity(CompactString),

    /// Failure reported by a row source, propagated as-is
    #[error("Row source error: {0}")]
    RowSource(String),

    /// Rusqlite specific errors
    #[cfg(feature = "rusqlite")]
    #[error("Rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),

    /// Invalid processor configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn unsupported_operator(name: impl Into<CompactString>) -> Self {
        Error::UnsupportedOperator {
            name: name.into(),
            status: Status::NotImplemented,
        }
    }

    pub fn unsupported_filter(name: impl Into<CompactString>) -> Self {
        Error::UnsupportedFilter {
            name: name.into(),
            status: Status::BadRequest,
        }
    }

    pub fn conversion(value: impl Into<CompactString>, parameter: impl Into<CompactString>) -> Self {
        Error::Conversion {
            value: value.into(),
            parameter: parameter.into(),
        }
    }

    pub fn status(&self) -> Status {
        match self {
            Error::UnsupportedOperator { status, .. } | Error::UnsupportedFilter { status, .. } => {
                *status
            }
            Error::Conversion { .. }
            | Error::UnknownAttribute { .. }
            | Error::UnknownEntity(_) => Status::BadRequest,
            Error::DuplicateResultInsertion { .. }
            | Error::NavigationTargetMismatch { .. }
            | Error::MissingColumn(_)
            | Error::UnknownLevel(_)
            | Error::RowSource(_)
            | Error::Config(_) => Status::InternalServerError,
            #[cfg(feature = "rusqlite")]
            Error::Rusqlite(_) => Status::InternalServerError,
        }
    }
}

/// Result type for translation, correlation and execution
pub type Result<T> = std::result::Result<T, Error>;
