//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use alloy::primitives::Address;
use clap::{Args, Parser, Subcommand};
use reqwest::Url;
use tracing::info;

use crate::{
    commands::{deploy_contracts, list_networks, print_accounts},
    constants::{DEFAULT_ARTIFACTS_DIR, DEFAULT_DEPLOYMENTS_DIR, DEFAULT_NETWORK},
    errors::ScriptError,
    network::{EnvSecrets, NetworkConfig},
};

/// Scripts for deploying the ConditionalTokens & Treasury contracts
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Name of the network to use
    #[arg(short, long, env = "NETWORK", default_value = DEFAULT_NETWORK)]
    pub network: String,

    /// Network RPC URL, replaces the one of the network table
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: Option<Url>,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The possible CLI commands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy ConditionalTokens, then the Treasury
    Deploy(DeployArgs),
    /// List the supported networks
    Networks,
    /// Print the named accounts of the selected network
    Accounts,
}

impl Command {
    /// Run the command
    pub async fn run(
        self,
        network_name: &str,
        rpc_url: Option<Url>,
        secrets: &EnvSecrets,
    ) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => {
                let network = resolve_network(network_name, rpc_url, secrets)?;
                info!("Deploying contracts on {}...", network.name);
                let suite = deploy_contracts(args, &network).await?;
                info!(
                    "Deployed ConditionalTokens at {} and Treasury at {}",
                    suite.conditional_tokens.address, suite.treasury.address
                );

                Ok(())
            }
            Command::Networks => {
                list_networks(network_name, secrets);
                Ok(())
            }
            Command::Accounts => {
                let network = resolve_network(network_name, rpc_url, secrets)?;
                print_accounts(&network)
            }
        }
    }
}

/// Resolve the selected network, applying the endpoint override
fn resolve_network(
    network_name: &str,
    rpc_url: Option<Url>,
    secrets: &EnvSecrets,
) -> Result<NetworkConfig, ScriptError> {
    let network = NetworkConfig::resolve(network_name, secrets)?;
    Ok(match rpc_url {
        Some(url) => network.with_rpc_url(url),
        None => network,
    })
}

/// Deploy contracts
#[derive(Args)]
pub struct DeployArgs {
    /// Second constructor argument of the Treasury, next to the ConditionalTokens address
    #[arg(long, env = "TREASURY_TRUSTED_ADDRESS")]
    pub treasury_trusted_address: Address,

    /// Directory of the compiled contract artifacts
    #[arg(long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts: PathBuf,

    /// Directory of the deployment records
    #[arg(long, default_value = DEFAULT_DEPLOYMENTS_DIR)]
    pub deployments: PathBuf,

    /// Redeploy even if a matching deployment is recorded
    #[arg(long)]
    pub reset: bool,
}
