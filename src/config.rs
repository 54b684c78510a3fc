//! Client Configuration
//!
//! Parses the optional TOML file given with `--config`:
//!
//! ```toml
//! [ssh]
//! user = "ops"
//! port = 830
//! identity_file = "~/.ssh/id_ed25519"
//!
//! [session]
//! err_on_warnings = true
//! ```

use std::path::{Path, PathBuf};

use netconf_proto::hello::capabilities;
use serde::{Deserialize, Serialize};

use crate::session::SessionConfig;
use crate::transport::SshConfig;

/// Client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub ssh: SshConfig,
    pub session: SessionConfig,
}

/// Errors that can occur when loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ClientConfig {
    /// Load configuration from a specific path
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ssh.port == 0 {
            return Err(invalid("ssh.port", "must be between 1 and 65535"));
        }

        if self.ssh.subsystem.trim().is_empty() {
            return Err(invalid("ssh.subsystem", "must not be empty"));
        }

        if !self
            .session
            .capabilities
            .iter()
            .any(|c| c == capabilities::BASE_1_0)
        {
            return Err(invalid(
                "session.capabilities",
                "must include urn:ietf:params:xml:ns:netconf:base:1.0",
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ClientConfig::parse("").unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.ssh.port, 830);
        assert!(!config.session.err_on_warnings);
    }

    #[test]
    fn test_parse_sections() {
        let config = ClientConfig::parse(
            r#"
[ssh]
user = "ops"
port = 2830
ssh_key_path = "/keys/ops"
strict_host_key_checking = "accept-new"

[session]
err_on_warnings = true
capabilities = [
    "urn:ietf:params:xml:ns:netconf:base:1.0",
    "urn:ietf:params:xml:ns:netconf:capability:candidate:1.0",
]
"#,
        )
        .unwrap();

        assert_eq!(config.ssh.user.as_deref(), Some("ops"));
        assert_eq!(config.ssh.port, 2830);
        assert_eq!(config.ssh.identity_file, Some(PathBuf::from("/keys/ops")));
        assert_eq!(config.ssh.subsystem, "netconf");
        assert!(config.session.err_on_warnings);
        assert_eq!(config.session.capabilities.len(), 2);
    }

    #[test]
    fn test_password_never_read_from_file() {
        let config = ClientConfig::parse("[ssh]\npassword = \"hunter2\"\n").unwrap();
        assert!(config.ssh.password.is_none());
    }

    #[test]
    fn test_rejects_zero_port() {
        let err = ClientConfig::parse("[ssh]\nport = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "ssh.port"));
    }

    #[test]
    fn test_rejects_missing_base_capability() {
        let err = ClientConfig::parse("[session]\ncapabilities = [\"urn:example\"]\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ssh]\nuser = \"admin\"").unwrap();

        let config = ClientConfig::load(file.path()).unwrap();
        assert_eq!(config.ssh.user.as_deref(), Some("admin"));
    }

    #[test]
    fn test_missing_file() {
        let err = ClientConfig::load(Path::new("/nonexistent/netconf.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
