use std::path::PathBuf;

use fetchr_api::TransportError;
use fetchr_types::ApplierError;
use fetchr_util::JsonParseError;
use thiserror::Error;

/// A resolver that cannot be built or a rule set that cannot be evaluated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown resolver type \"{kind}\"")]
    UnknownResolverType { kind: String },

    #[error("Unexpected apply \"{applier}\" for the rule \"{rule}\"")]
    UnknownApplier { applier: String, rule: String },

    #[error("no rule matched the response")]
    NoMatchingRule,

    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported config document {}: {message}", path.display())]
    Document { path: PathBuf, message: String },

    #[error("failed to build HTTP transport: {0}")]
    Transport(#[from] TransportError),
}

/// Why a resolve call was rejected.
///
/// Every variant carries exactly one human readable message; `Rule` and
/// `GraphQl` display nothing but the message itself.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Raised by a `throw` rule.
    #[error("{message}")]
    Rule { message: String },

    /// The response carried a GraphQL `errors` array.
    #[error("{message}")]
    GraphQl { message: String },

    #[error(transparent)]
    Decode(#[from] JsonParseError),

    /// Returned by an inline applier.
    #[error("{message}")]
    Applier { message: String },
}

impl From<ApplierError> for ResolveError {
    fn from(error: ApplierError) -> Self {
        Self::Applier { message: error.message }
    }
}
