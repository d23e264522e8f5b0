//! Server configuration.

use std::net::SocketAddr;

use blockq_blocks::Limits;
use clap::Parser;

/// Register ceiling for the bundled simulator.
pub const DEFAULT_MAX_SIM_QUBITS: u32 = 20;

/// Runtime configuration for the HTTP service.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_address: SocketAddr,
    /// Allow any origin, method and header (the Scratch GUI is served elsewhere).
    pub cors_allow_any: bool,
    /// Largest register the simulator will allocate.
    pub max_sim_qubits: u32,
    /// Limits applied to every block program.
    pub limits: Limits,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: ([0, 0, 0, 0], 8000).into(),
            cors_allow_any: true,
            max_sim_qubits: DEFAULT_MAX_SIM_QUBITS,
            limits: Limits::DEFAULT,
        }
    }
}

/// Command-line arguments for the `blockq-server` binary.
#[derive(Debug, Parser)]
#[command(name = "blockq-server")]
#[command(author, version, about = "Run Scratch quantum block programs over HTTP", long_about = None)]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, env = "BLOCKQ_BIND", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// Largest register the simulator will allocate
    #[arg(long, env = "BLOCKQ_MAX_SIM_QUBITS", default_value_t = DEFAULT_MAX_SIM_QUBITS)]
    pub max_sim_qubits: u32,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ServerArgs {
    /// Log filter used when `RUST_LOG` is unset.
    pub fn default_filter(&self) -> &'static str {
        match self.verbose {
            0 => "blockq_server=info,blockq_blocks=info,tower_http=info",
            1 => "blockq_server=debug,blockq_blocks=debug,tower_http=debug",
            2 => "blockq_server=trace,blockq_blocks=trace,blockq_adapter_sim=debug,tower_http=debug",
            _ => "trace",
        }
    }

    pub fn into_config(self) -> ServerConfig {
        ServerConfig {
            bind_address: self.bind,
            max_sim_qubits: self.max_sim_qubits,
            ..ServerConfig::default()
        }
    }
}
