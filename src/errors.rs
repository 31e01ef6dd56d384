use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoopAutomaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input capture error: {0}")]
    Capture(String),

    #[error("Geometry lookup error: {0}")]
    Geometry(String),

    #[error("Recorder error: {0}")]
    Recorder(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Recording cancelled")]
    Cancelled,
}

impl serde::Serialize for LoopAutomaError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

pub type LoopAutomaResult<T> = Result<T, LoopAutomaError>;
