//! Error types shared by the registry, controller and session.

/// Class definitions that must not be used. Raised while loading or saving a
/// registry; the caller keeps its previous registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("at least one label class is required")]
    NoClasses,

    #[error("default class id `{0}` is missing in the class list")]
    DefaultIdMissing(u32),

    #[error("class ids are not unique")]
    DuplicateIds,

    #[error("at least one class name is empty")]
    EmptyClassName,
}

#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    #[error("invalid class definitions: {0}")]
    Validation(#[from] ValidationError),

    #[error("unknown class `{0}`")]
    UnknownClass(String),

    #[error("unknown axis or dimension `{0}`")]
    InvalidAxis(String),

    #[error("unknown label format `{0}`")]
    UnknownLabelFormat(String),

    #[error("invalid color `{0}`")]
    InvalidColor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
}

pub type LabelResult<T> = Result<T, LabelError>;
