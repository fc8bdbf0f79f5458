use thiserror::Error;

#[derive(Error, Debug)]
pub enum AttrError {
    #[error("Unknown attribute type: {0}")]
    UnknownType(String),

    #[error("Cannot coerce {value} to {kind}")]
    Coercion { kind: &'static str, value: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("MessagePack encode error: {0}")]
    MsgpackEncode(#[from] rmp_serde::encode::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Record was not persisted")]
    NotPersisted,
}

impl AttrError {
    pub(crate) fn coercion(kind: &'static str, value: impl std::fmt::Display) -> Self {
        AttrError::Coercion {
            kind,
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AttrError>;
