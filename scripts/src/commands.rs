//! Implementations of the CLI commands

use alloy::primitives::Address;
use tracing::{info, warn};

use crate::{
    accounts::{NamedAccount, NamedAccounts},
    artifacts::ArtifactStore,
    cli::DeployArgs,
    constants::GWEI,
    deploy::{deploy_treasury_and_ct, DeployedSuite, RpcDeployer},
    errors::ScriptError,
    network::{EnvSecrets, NetworkConfig, NetworkDefinition, NETWORKS},
    output_writer::DeploymentStore,
    tx::client::create_rpc_provider,
};

/// Deploy the ConditionalTokens & Treasury contracts on `network`
pub async fn deploy_contracts(
    args: DeployArgs,
    network: &NetworkConfig,
) -> Result<DeployedSuite, ScriptError> {
    if args.treasury_trusted_address == Address::ZERO {
        return Err(ScriptError::Configuration(
            "the Treasury trusted address can't be the zero address".to_string(),
        ));
    }

    // Resolve the deployer
    let accounts = NamedAccounts::derive(&network.accounts)?;
    let signer = accounts.deployer()?.clone();
    let deployer_address = signer.address();
    info!("Deployer: {}", deployer_address);

    // Build our RPC client with signer
    info!("Connecting to {}...", network.display_url());
    let client = create_rpc_provider(network.rpc_url.clone(), signer, network.chain_id).await?;

    let mut deployer = RpcDeployer::new(
        client,
        deployer_address,
        ArtifactStore::new(&args.artifacts),
    )
    .with_gas_price(network.gas_price);
    if network.save_deployments {
        deployer = deployer.with_records(
            DeploymentStore::new(&args.deployments, &network.name, network.chain_id),
            args.reset,
        );
    } else if args.reset {
        warn!("{} does not save deployments, nothing to reset", network.name);
    }

    deploy_treasury_and_ct(&mut deployer, args.treasury_trusted_address).await
}

/// Print the network table, marking the selected network
pub fn list_networks(selected: &str, secrets: &EnvSecrets) {
    for network in NETWORKS {
        let marker = if network.name.eq_ignore_ascii_case(selected) {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {:<8} chain {:<6} gas price {:<10} secrets {}",
            network.name,
            network.chain_id,
            format_gas_price(network.gas_price),
            secrets_status(network, secrets)
        );
    }

    let etherscan = if secrets.etherscan_api_key.is_some() {
        "set"
    } else {
        "missing"
    };
    println!("explorer api key: {etherscan}");
}

/// Print the named accounts of `network`
pub fn print_accounts(network: &NetworkConfig) -> Result<(), ScriptError> {
    let accounts = NamedAccounts::derive(&network.accounts)?;

    for account in NamedAccount::ALL {
        println!("{:<8} {}", account.name(), accounts.get(account)?.address());
    }
    for (position, address) in accounts.addresses().iter().enumerate() {
        println!(
            "#{:<7} {address}",
            position as u32 + network.accounts.initial_index
        );
    }

    Ok(())
}

fn format_gas_price(gas_price: Option<u128>) -> String {
    match gas_price {
        Some(wei) if wei % GWEI == 0 => format!("{} gwei", wei / GWEI),
        Some(wei) => format!("{wei} wei"),
        None => "auto".to_string(),
    }
}

/// Whether the secrets needed by `network` are available
fn secrets_status(network: &NetworkDefinition, secrets: &EnvSecrets) -> &'static str {
    match NetworkConfig::resolve(network.name, secrets) {
        Ok(_) => "ok",
        Err(_) if network.needs_infura_key() && secrets.infura_api_key.is_none() => {
            "missing INFURA_API_KEY"
        }
        Err(_) => "missing MNEMONIC",
    }
}
