//! Constants used in the deploy scripts

/// Name of the first contract of the suite
pub const CONDITIONAL_TOKENS_CONTRACT: &str = "ConditionalTokens";

/// Name of the second contract of the suite, built on top of the conditional tokens
pub const TREASURY_CONTRACT: &str = "Treasury";

/// Network used when none is given
pub const DEFAULT_NETWORK: &str = "hardhat";

/// Endpoint of a local hardhat (or anvil) node
pub const LOCAL_RPC: &str = "http://127.0.0.1:8545";

/// Well known development mnemonic, funded on every local dev node
pub const DEV_MNEMONIC: &str = "test test test test test test test test test test test junk";

/// HD derivation path of the accounts, the account index is appended to it
pub const HD_PATH: &str = "m/44'/60'/0'/0";

/// Number of accounts derived from the mnemonic
pub const ACCOUNTS_COUNT: u32 = 10;

/// Index of the first derived account
pub const ACCOUNTS_INITIAL_INDEX: u32 = 0;

/// Default directory holding the compiled artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "./artifacts";

/// Default directory holding the deployment records
pub const DEFAULT_DEPLOYMENTS_DIR: &str = "./deployments";

/// One gwei, in wei
pub const GWEI: u128 = 1_000_000_000;

// Environment variables
pub const MNEMONIC_ENV: &str = "MNEMONIC";
pub const INFURA_API_KEY_ENV: &str = "INFURA_API_KEY";
pub const ETHERSCAN_API_KEY_ENV: &str = "ETHERSCAN_API_KEY";
