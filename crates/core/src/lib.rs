//! Core shared types and errors (loader-agnostic).

use std::{fmt, io};

use thiserror::Error;

/// Raw attribute stream a face corner can point into.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Attribute {
    Position,
    TexCoord,
    Normal,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Attribute::Position => "position",
            Attribute::TexCoord => "texture coordinate",
            Attribute::Normal => "normal",
        })
    }
}

/// Every way a mesh load can fail. No variant carries a partial mesh.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Resource '{resource}' could not be opened: {source}")]
    ResourceNotFound {
        resource: String,
        #[source]
        source: io::Error,
    },

    /// Line and column are 1-based.
    #[error("Malformed record on line {line}, column {column}: {reason} ('{text}')")]
    MalformedRecord {
        line: usize,
        column: usize,
        text: String,
        reason: String,
    },

    #[error("Failed to read line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: io::Error,
    },

    /// `line` is where the offending corner first appeared.
    #[error("{attribute} index {index} out of range (len={len}) on line {line}")]
    IndexOutOfRange {
        line: usize,
        attribute: Attribute,
        index: usize,
        len: usize,
    },

    #[error("Too many unique vertices (>{})", u32::MAX)]
    TooManyVertices,

    #[error("Load cancelled")]
    Cancelled,
}

impl LoadError {
    /// Line the failure is attributed to, if it has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            LoadError::MalformedRecord { line, .. }
            | LoadError::Io { line, .. }
            | LoadError::IndexOutOfRange { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type LoadResult<T> = Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_record_display_names_position() {
        let err = LoadError::MalformedRecord {
            line: 7,
            column: 9,
            text: "v 1.0 2.0".into(),
            reason: "missing z coordinate".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 7"));
        assert!(msg.contains("column 9"));
        assert!(msg.contains("v 1.0 2.0"));
        assert_eq!(err.line(), Some(7));
    }

    #[test]
    fn not_found_keeps_source() {
        use std::error::Error as _;

        let err = LoadError::ResourceNotFound {
            resource: "models/gate.obj".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("models/gate.obj"));
        assert!(err.source().is_some());
        assert_eq!(err.line(), None);
    }

    #[test]
    fn index_out_of_range_display() {
        let err = LoadError::IndexOutOfRange {
            line: 3,
            attribute: Attribute::Normal,
            index: 4,
            len: 2,
        };
        assert_eq!(
            err.to_string(),
            "normal index 4 out of range (len=2) on line 3"
        );
    }
}
