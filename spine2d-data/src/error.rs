use std::path::PathBuf;
use thiserror::Error;

/// Error produced by a [`crate::TextureLoader`].
pub type TextureLoadError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid atlas line {line}: '{content}'")]
    AtlasInvalidLine { line: usize, content: String },

    #[error("invalid atlas tuple on line {line}: expected {expected} value(s), found {found}")]
    AtlasTupleArity {
        line: usize,
        expected: &'static str,
        found: usize,
    },

    #[error("invalid number '{value}' on atlas line {line}")]
    AtlasInvalidNumber { line: usize, value: String },

    #[error("unknown {kind} '{value}' on atlas line {line}")]
    AtlasUnknownValue {
        line: usize,
        kind: &'static str,
        value: String,
    },

    #[error("failed to read atlas line {line}")]
    AtlasRead {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("unexpected end of atlas after line {line}")]
    AtlasUnexpectedEof { line: usize },

    #[error("error reading atlas file: {}", path.display())]
    AtlasFile {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load texture {}", path.display())]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: TextureLoadError,
    },

    #[error("{kind} name cannot be empty")]
    EmptyName { kind: &'static str },

    #[error("{kind} '{name}' references {field} {index}, which does not exist")]
    InvalidReference {
        kind: &'static str,
        name: String,
        field: &'static str,
        index: usize,
    },

    #[error("bone '{bone}' is listed before its parent '{parent}'")]
    BoneOrder { bone: String, parent: String },

    #[error("root bone '{bone}' must not have a parent")]
    RootBoneHasParent { bone: String },

    #[error("unknown animation: {name}")]
    UnknownAnimation { name: String },
}
