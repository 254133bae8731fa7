use alloy::{
    network::{Ethereum, EthereumWallet},
    providers::{
        fillers::{ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller, WalletFiller},
        Identity, Provider, ProviderBuilder, ReqwestProvider,
    },
    signers::local::PrivateKeySigner,
};
use reqwest::{Client, Url};
use tracing::info;

use crate::errors::ScriptError;

/// Re-export from alloy recommend filter
type RecommendFiller =
    JoinFill<JoinFill<JoinFill<Identity, GasFiller>, NonceFiller>, ChainIdFiller>;

/// An alloy provider that signs with a local private key
/// & interfaces with the RPC endpoint over HTTP
pub type RpcProvider = FillProvider<
    JoinFill<RecommendFiller, WalletFiller<EthereumWallet>>,
    ReqwestProvider,
    alloy::transports::http::Http<Client>,
    Ethereum,
>;

/// Build the provider signing with `signer`, checking that the endpoint
/// serves the expected chain
pub async fn create_rpc_provider(
    rpc_url: Url,
    signer: PrivateKeySigner,
    expected_chain_id: u64,
) -> Result<RpcProvider, ScriptError> {
    let wallet = EthereumWallet::from(signer);

    // Create our provider with the rpc client + signer
    let provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .wallet(wallet)
        .on_http(rpc_url);

    // Fetch chain id
    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    check_chain_id(chain_id, expected_chain_id)?;

    info!("Build client on chain ID: {}", chain_id);

    Ok(provider)
}

/// Refuse an endpoint serving another chain than the selected network's
fn check_chain_id(chain_id: u64, expected_chain_id: u64) -> Result<(), ScriptError> {
    if chain_id != expected_chain_id {
        return Err(ScriptError::Configuration(format!(
            "endpoint serves chain {chain_id}, expected {expected_chain_id}"
        )));
    }
    Ok(())
}
