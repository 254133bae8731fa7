//! Named accounts, derived from a mnemonic

use std::fmt;

use alloy::{
    primitives::{Address, B256},
    signers::local::PrivateKeySigner,
};
use ethers::signers::{coins_bip39::English, MnemonicBuilder};

use crate::{
    constants::{ACCOUNTS_COUNT, ACCOUNTS_INITIAL_INDEX, HD_PATH},
    errors::ScriptError,
};

/// How the accounts of a network are derived from its mnemonic
#[derive(Clone, PartialEq, Eq)]
pub struct AccountsConfig {
    mnemonic: String,
    /// Derivation path, the account index gets appended to it
    pub path: String,
    pub initial_index: u32,
    pub count: u32,
}

impl AccountsConfig {
    /// Account derivation using the default path and count
    pub fn new(mnemonic: impl Into<String>) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            path: HD_PATH.to_string(),
            initial_index: ACCOUNTS_INITIAL_INDEX,
            count: ACCOUNTS_COUNT,
        }
    }

    /// The mnemonic phrase
    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }
}

impl fmt::Debug for AccountsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountsConfig")
            .field("mnemonic", &"<redacted>")
            .field("path", &self.path)
            .field("initial_index", &self.initial_index)
            .field("count", &self.count)
            .finish()
    }
}

/// Roles the deploy scripts refer to, each mapped to an account index
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamedAccount {
    /// Signs every deployment, do not use it for testing
    Deployer,
    Admin,
}

impl NamedAccount {
    /// Every named account
    pub const ALL: [NamedAccount; 2] = [NamedAccount::Deployer, NamedAccount::Admin];

    /// Position of the account among the derived ones
    pub fn index(self) -> usize {
        match self {
            NamedAccount::Deployer => 0,
            NamedAccount::Admin => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NamedAccount::Deployer => "deployer",
            NamedAccount::Admin => "admin",
        }
    }
}

/// The accounts derived for a network
pub struct NamedAccounts {
    signers: Vec<PrivateKeySigner>,
}

impl NamedAccounts {
    /// Derive `count` accounts from the mnemonic, starting at `initial_index`
    pub fn derive(config: &AccountsConfig) -> Result<Self, ScriptError> {
        let signers = (config.initial_index..config.initial_index + config.count)
            .map(|index| derive_signer(config, index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { signers })
    }

    /// Signer behind a named account
    pub fn get(&self, account: NamedAccount) -> Result<&PrivateKeySigner, ScriptError> {
        self.signers.get(account.index()).ok_or_else(|| {
            ScriptError::ClientInitialization(format!(
                "named account {} maps to index {} but only {} accounts are derived",
                account.name(),
                account.index(),
                self.signers.len()
            ))
        })
    }

    /// Signer of the deployments
    pub fn deployer(&self) -> Result<&PrivateKeySigner, ScriptError> {
        self.get(NamedAccount::Deployer)
    }

    /// Addresses of every derived account, in derivation order
    pub fn addresses(&self) -> Vec<Address> {
        self.signers.iter().map(|s| s.address()).collect()
    }
}

/// Derive a single account, and map the ethers wallet to an alloy signer
fn derive_signer(config: &AccountsConfig, index: u32) -> Result<PrivateKeySigner, ScriptError> {
    let wallet = MnemonicBuilder::<English>::default()
        .phrase(config.mnemonic.as_str())
        .derivation_path(&format!("{}/{}", config.path, index))
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?
        .build()
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    let private_key = B256::from_slice(&wallet.signer().to_bytes());
    PrivateKeySigner::from_bytes(&private_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))
}
