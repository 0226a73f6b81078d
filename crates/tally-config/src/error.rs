use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A provider could not be read, or a value has the wrong type. The
    /// message names the key and the source it came from.
    #[error("cannot read tally configuration: {0}")]
    Source(Box<figment::Error>),

    /// The value parsed but is outside what the client or server accepts.
    #[error("invalid {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        Self::Source(Box::new(error))
    }
}
