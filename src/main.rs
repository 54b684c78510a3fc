//! NETCONF CLI
//!
//! Entry point for the `netconf` command-line tool: fetches a datastore
//! from each target and prints it.

use clap::{ArgAction, Parser};
use netconf_client::{Client, ClientConfig, FailureKind, NetconfError};
use std::io::Write;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "netconf")]
#[command(about = "Fetch device configuration over NETCONF", version)]
struct Cli {
    /// Login username
    #[arg(long, short = 'u')]
    username: Option<String>,

    /// Login password (uses sshpass)
    #[arg(long, short = 'p', env = "NETCONF_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// NETCONF port (default: 830)
    #[arg(long, short = 'P')]
    port: Option<u16>,

    /// Path to SSH private key
    #[arg(long, short = 'i')]
    identity_file: Option<PathBuf>,

    /// Path to client config file
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Datastore to fetch
    #[arg(long, default_value = "running")]
    datastore: String,

    /// Treat warning-severity rpc-errors as failures
    #[arg(long)]
    err_on_warnings: bool,

    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    verbose: u8,

    /// Hosts to query
    #[arg(required = true)]
    targets: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(FailureKind::Config as i32);
        }
    };

    let mut exit_code = 0;
    for target in &cli.targets {
        if let Err(e) = run_target(target, &cli, &config) {
            eprintln!("{}: {}", target, e);
            if exit_code == 0 {
                exit_code = e.exit_code();
            }
        }
    }

    process::exit(exit_code);
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Merge the config file (if any) with command-line flags.
fn load_config(cli: &Cli) -> Result<ClientConfig, NetconfError> {
    let mut config = match cli.config {
        Some(ref path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };

    if let Some(ref user) = cli.username {
        config.ssh.user = Some(user.clone());
    }
    if let Some(ref password) = cli.password {
        config.ssh.password = Some(password.clone());
    }
    if let Some(port) = cli.port {
        config.ssh.port = port;
    }
    if let Some(ref key) = cli.identity_file {
        config.ssh.identity_file = Some(key.clone());
    }
    if cli.err_on_warnings {
        config.session.err_on_warnings = true;
    }

    config.validate()?;
    Ok(config)
}

fn run_target(target: &str, cli: &Cli, config: &ClientConfig) -> Result<(), NetconfError> {
    let mut ssh = config.ssh.clone();
    ssh.host = target.to_string();

    let mut client = Client::connect(&ssh, &config.session)?;
    let data = match client.get_config(&cli.datastore) {
        Ok(data) => data,
        Err(e) => {
            // The fetch error is the one worth reporting.
            let _ = client.close();
            return Err(e);
        }
    };

    let written = if cli.json {
        let session = client.session();
        let output = serde_json::json!({
            "host": target,
            "session_id": session.id(),
            "capabilities": session.server_capabilities(),
            "datastore": cli.datastore,
            "data": String::from_utf8_lossy(&data),
        });
        write_json(&mut std::io::stdout().lock(), &output)
    } else {
        write_raw(&mut std::io::stdout().lock(), &data)
    };

    let closed = client.close();
    written?;
    closed
}

fn write_json<W: Write>(out: &mut W, output: &serde_json::Value) -> Result<(), NetconfError> {
    serde_json::to_writer_pretty(&mut *out, output)
        .map_err(|e| NetconfError::Output(e.into()))?;
    writeln!(out).and_then(|_| out.flush()).map_err(NetconfError::Output)
}

fn write_raw<W: Write>(out: &mut W, data: &[u8]) -> Result<(), NetconfError> {
    out.write_all(data)
        .and_then(|_| writeln!(out))
        .and_then(|_| out.flush())
        .map_err(NetconfError::Output)
}
