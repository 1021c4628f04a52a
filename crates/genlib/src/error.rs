use genlib_core::synth::NameError;

#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
pub enum Error {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Corrupt cache entry {0}: {1}")]
    CorruptEntry(String, String),
}

/// Why a generation request produced no code.
#[derive(thiserror::Error, Debug)]
pub enum GenerationError {
    #[error("Invalid module name: {0}")]
    InvalidName(#[from] NameError),

    #[error("Please set the OPENAI_API_KEY environment variable.")]
    Configuration,

    #[error("Error generating code: {0}")]
    Service(String),

    #[error("Generated code is not valid.")]
    Validation,
}
