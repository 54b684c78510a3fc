//! SSH subsystem transport.
//!
//! Runs the system `ssh` client with `-s netconf` and uses the child's
//! stdout/stdin as the NETCONF byte stream. Authentication, host key
//! checking and channel setup are left to `ssh`.

use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use netconf_proto::HelloMessage;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::stream::StreamTransport;
use super::{Transport, TransportError};

/// IANA-assigned NETCONF over SSH port.
pub const DEFAULT_NETCONF_PORT: u16 = 830;

/// SSH subsystem name for NETCONF.
pub const NETCONF_SUBSYSTEM: &str = "netconf";

/// SSH transport configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshConfig {
    /// Remote host
    pub host: String,
    /// SSH port (default 830)
    pub port: u16,
    /// Login user; `ssh` picks its own default when unset
    pub user: Option<String>,
    /// Password, fed to `sshpass` through the environment. Never read from
    /// config files.
    #[serde(skip)]
    pub password: Option<String>,
    /// Path to SSH private key
    #[serde(alias = "ssh_key_path")]
    pub identity_file: Option<PathBuf>,
    /// Connection timeout in seconds
    pub connect_timeout_seconds: u32,
    /// Server alive interval for detecting dead connections
    pub server_alive_interval: u32,
    /// Server alive count max
    pub server_alive_count_max: u32,
    /// Subsystem to request
    pub subsystem: String,
    /// Value for `StrictHostKeyChecking`; `ssh` default when unset
    pub strict_host_key_checking: Option<String>,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_NETCONF_PORT,
            user: None,
            password: None,
            identity_file: None,
            connect_timeout_seconds: 30,
            server_alive_interval: 15,
            server_alive_count_max: 2,
            subsystem: NETCONF_SUBSYSTEM.to_string(),
            strict_host_key_checking: None,
        }
    }
}

impl SshConfig {
    /// Configuration for `host` with password authentication.
    pub fn with_password(host: impl Into<String>, user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: Some(user.into()),
            password: Some(password.into()),
            ..Self::default()
        }
    }

    /// Build SSH command arguments
    pub fn build_ssh_args(&self) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            format!("ConnectTimeout={}", self.connect_timeout_seconds),
            "-o".to_string(),
            format!("ServerAliveInterval={}", self.server_alive_interval),
            "-o".to_string(),
            format!("ServerAliveCountMax={}", self.server_alive_count_max),
        ];

        // Password logins need the interactive prompt that sshpass answers.
        if self.password.is_none() {
            args.push("-o".to_string());
            args.push("BatchMode=yes".to_string());
        }

        if let Some(ref policy) = self.strict_host_key_checking {
            args.push("-o".to_string());
            args.push(format!("StrictHostKeyChecking={}", policy));
        }

        args.push("-p".to_string());
        args.push(self.port.to_string());

        if let Some(ref key_path) = self.identity_file {
            args.push("-i".to_string());
            args.push(key_path.display().to_string());
        }

        if let Some(ref user) = self.user {
            args.push("-l".to_string());
            args.push(user.clone());
        }

        args.push("-s".to_string());
        args.push(self.host.clone());
        args.push(self.subsystem.clone());

        args
    }

    fn command(&self) -> Command {
        let mut command = match self.password {
            Some(ref password) => {
                let mut command = Command::new("sshpass");
                command.arg("-e").arg("ssh").env("SSHPASS", password);
                command
            }
            None => Command::new("ssh"),
        };
        command.args(self.build_ssh_args());
        command
    }
}

/// NETCONF over an `ssh` child process.
pub struct SshTransport {
    child: Child,
    stream: StreamTransport<ChildStdout, ChildStdin>,
}

impl SshTransport {
    /// Spawn `ssh` and request the configured subsystem.
    ///
    /// Subsystem or authentication failures surface on the first read, when
    /// the child closes its stdout.
    pub fn connect(config: &SshConfig) -> Result<Self, TransportError> {
        if config.host.is_empty() {
            return Err(TransportError::Ssh("no host configured".to_string()));
        }

        debug!(host = %config.host, port = config.port, subsystem = %config.subsystem, "spawning ssh");
        let mut child = config
            .command()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| TransportError::Ssh(format!("Failed to spawn SSH: {}", e)))?;

        let (stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(TransportError::Ssh("SSH child has no stdio pipes".to_string()));
            }
        };

        Ok(Self {
            child,
            stream: StreamTransport::new(stdout, stdin),
        })
    }

    /// The framed stream, for prompt matching before the handshake.
    pub fn stream_mut(&mut self) -> &mut StreamTransport<ChildStdout, ChildStdin> {
        &mut self.stream
    }

    fn reap(&mut self) -> Result<(), TransportError> {
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
        }
        let status = self
            .child
            .wait()
            .map_err(|e| TransportError::Ssh(format!("SSH process error: {}", e)))?;
        debug!(%status, "ssh exited");
        Ok(())
    }
}

impl Transport for SshTransport {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.stream.send(data)
    }

    fn receive(&mut self) -> Result<Vec<u8>, TransportError> {
        self.stream.receive()
    }

    fn close(&mut self) -> Result<(), TransportError> {
        let closed = self.stream.close();
        self.reap()?;
        closed
    }

    fn send_hello(&mut self, hello: &HelloMessage) -> Result<(), TransportError> {
        self.stream.send_hello(hello)
    }

    fn receive_hello(&mut self) -> Result<HelloMessage, TransportError> {
        self.stream.receive_hello()
    }
}

impl Drop for SshTransport {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            if let Err(e) = self.child.kill() {
                warn!(error = %e, "failed to kill ssh child");
            }
            let _ = self.child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_for(config: &SshConfig) -> String {
        config.build_ssh_args().join(" ")
    }

    #[test]
    fn test_ssh_config_defaults() {
        let config = SshConfig::default();
        assert_eq!(config.port, 830);
        assert_eq!(config.subsystem, "netconf");
        assert_eq!(config.connect_timeout_seconds, 30);
        assert!(config.user.is_none());
    }

    #[test]
    fn test_key_auth_args() {
        let config = SshConfig {
            host: "router1".to_string(),
            user: Some("ops".to_string()),
            identity_file: Some(PathBuf::from("/home/ops/.ssh/id_ed25519")),
            ..SshConfig::default()
        };
        assert_eq!(
            args_for(&config),
            "-o ConnectTimeout=30 -o ServerAliveInterval=15 -o ServerAliveCountMax=2 \
             -o BatchMode=yes -p 830 -i /home/ops/.ssh/id_ed25519 -l ops -s router1 netconf"
        );
    }

    #[test]
    fn test_password_auth_disables_batch_mode() {
        let config = SshConfig::with_password("10.0.0.1", "admin", "secret");
        let args = config.build_ssh_args();
        assert!(!args.contains(&"BatchMode=yes".to_string()));
        assert!(!args.iter().any(|a| a.contains("secret")));
        assert_eq!(&args[args.len() - 3..], ["-s", "10.0.0.1", "netconf"]);
    }

    #[test]
    fn test_host_key_policy_passed_through() {
        let config = SshConfig {
            host: "r".to_string(),
            strict_host_key_checking: Some("accept-new".to_string()),
            ..SshConfig::default()
        };
        assert!(args_for(&config).contains("-o StrictHostKeyChecking=accept-new"));
    }

    #[test]
    fn test_connect_requires_host() {
        let err = SshTransport::connect(&SshConfig::default()).err().unwrap();
        assert!(matches!(err, TransportError::Ssh(_)));
    }
}
