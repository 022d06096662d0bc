use stackguard_domain::policy::PackError;

/// Setup-time failure. Always surfaced before any resource is evaluated.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("parse policy config (json): {0}")]
    Json(#[from] serde_json::Error),

    #[error("parse policy config (toml): {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unknown policy '{name}' in configuration (known: {known})")]
    UnknownPolicy { name: String, known: String },

    /// The configuration does not satisfy a policy's declared schema.
    #[error("invalid configuration for policy '{policy}', key '{key}': {reason}")]
    Schema {
        policy: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Pack(#[from] PackError),
}

impl ConfigError {
    pub(crate) fn schema(policy: &str, key: &str, reason: impl Into<String>) -> Self {
        ConfigError::Schema {
            policy: policy.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
