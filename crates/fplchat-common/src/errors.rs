use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Top-level error for the `fplchat` binary and crate seams.
#[derive(Debug, thiserror::Error)]
pub enum FplChatError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("tool backend error: {0}")]
    Tools(String),

    #[error("llm error: {0}")]
    Llm(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ValidationError("agent.max_steps = 0".into());
        assert_eq!(
            err.to_string(),
            "config validation error: agent.max_steps = 0"
        );
    }

    #[test]
    fn fplchat_error_from_config() {
        let err: FplChatError = ConfigError::ParseError("bad toml".into()).into();
        assert!(matches!(err, FplChatError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn fplchat_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: FplChatError = io_err.into();
        assert!(matches!(err, FplChatError::Io(_)));
    }

    #[test]
    fn collaborator_variants_prefix_their_source() {
        assert_eq!(
            FplChatError::Tools("connection refused".into()).to_string(),
            "tool backend error: connection refused"
        );
        assert_eq!(
            FplChatError::Llm("no key".into()).to_string(),
            "llm error: no key"
        );
    }
}
