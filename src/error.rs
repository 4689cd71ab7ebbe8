#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// The module could not be parsed or transformed. Fatal for that module.
    #[error("Failed to compile {id}:\n{}", .messages.join("\n"))]
    Compile { id: String, messages: Vec<String> },

    #[error("Invalid filter regex `{pattern}`: {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid filter glob `{pattern}`: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Invalid plugin options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PluginError>;

#[cfg(feature = "napi")]
impl From<PluginError> for napi::Error {
    fn from(err: PluginError) -> Self {
        napi::Error::from_reason(err.to_string())
    }
}
