//! Network table and resolution of a network name into its connection parameters.
//!
//! Resolution is a pure lookup: the secrets it needs are read from the
//! environment once, into [`EnvSecrets`], and passed in explicitly.

use std::{env, fmt};

use reqwest::Url;

use crate::{
    accounts::AccountsConfig,
    constants::{
        DEV_MNEMONIC, ETHERSCAN_API_KEY_ENV, GWEI, INFURA_API_KEY_ENV, LOCAL_RPC, MNEMONIC_ENV,
    },
    errors::ScriptError,
};

/// Where the RPC endpoint of a network lives
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// A node running on the local machine
    Local,
    /// An Infura endpoint, identified by its subdomain
    Infura(&'static str),
    /// A fixed public endpoint
    Fixed(&'static str),
}

/// Static definition of a supported network
#[derive(Clone, Copy, Debug)]
pub struct NetworkDefinition {
    pub name: &'static str,
    pub chain_id: u64,
    pub endpoint: Endpoint,
    /// Legacy gas price forced on every transaction, in wei
    pub gas_price: Option<u128>,
    /// Whether deployment records are written to disk for this network
    pub save_deployments: bool,
}

/// Every network the scripts know how to deploy on
pub const NETWORKS: &[NetworkDefinition] = &[
    NetworkDefinition {
        name: "hardhat",
        chain_id: 31337,
        endpoint: Endpoint::Local,
        gas_price: None,
        save_deployments: false,
    },
    NetworkDefinition {
        name: "goerli",
        chain_id: 5,
        endpoint: Endpoint::Infura("goerli"),
        gas_price: None,
        save_deployments: true,
    },
    NetworkDefinition {
        name: "kovan",
        chain_id: 42,
        endpoint: Endpoint::Infura("kovan"),
        gas_price: None,
        save_deployments: true,
    },
    NetworkDefinition {
        name: "rinkeby",
        chain_id: 4,
        endpoint: Endpoint::Infura("rinkeby"),
        gas_price: None,
        save_deployments: true,
    },
    NetworkDefinition {
        name: "ropsten",
        chain_id: 3,
        endpoint: Endpoint::Infura("ropsten"),
        gas_price: None,
        save_deployments: true,
    },
    NetworkDefinition {
        name: "mumbai",
        chain_id: 80001,
        endpoint: Endpoint::Fixed(
            "https://polygon-mumbai.gateway.pokt.network/v1/lb/62ff2f0b852035003a873a88",
        ),
        gas_price: Some(8 * GWEI),
        save_deployments: true,
    },
    NetworkDefinition {
        name: "matic",
        chain_id: 137,
        endpoint: Endpoint::Infura("polygon-mainnet"),
        gas_price: Some(100 * GWEI),
        save_deployments: true,
    },
    NetworkDefinition {
        name: "mainnet",
        chain_id: 1,
        endpoint: Endpoint::Infura("mainnet"),
        gas_price: None,
        save_deployments: true,
    },
];

impl NetworkDefinition {
    /// Find a network by its name
    pub fn lookup(name: &str) -> Option<&'static NetworkDefinition> {
        NETWORKS.iter().find(|n| n.name.eq_ignore_ascii_case(name))
    }

    /// Whether this network needs an Infura API key
    pub fn needs_infura_key(&self) -> bool {
        matches!(self.endpoint, Endpoint::Infura(_))
    }
}

/// Secrets read from the environment (or the `.env` file)
#[derive(Clone, Default)]
pub struct EnvSecrets {
    pub mnemonic: Option<String>,
    pub infura_api_key: Option<String>,
    /// Only needed for explorer verification, which is done outside of these scripts
    pub etherscan_api_key: Option<String>,
}

impl EnvSecrets {
    /// Read every secret from the process environment
    pub fn from_env() -> Self {
        Self {
            mnemonic: read_env(MNEMONIC_ENV),
            infura_api_key: read_env(INFURA_API_KEY_ENV),
            etherscan_api_key: read_env(ETHERSCAN_API_KEY_ENV),
        }
    }
}

impl fmt::Debug for EnvSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvSecrets")
            .field("mnemonic", &self.mnemonic.as_ref().map(|_| "<redacted>"))
            .field("infura_api_key", &self.infura_api_key.as_ref().map(|_| "<redacted>"))
            .field(
                "etherscan_api_key",
                &self.etherscan_api_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Read an env variable, blank values count as unset
fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Fetch a secret that must be present for the given network
fn required<'a>(
    secret: &'a Option<String>,
    var: &str,
    network: &str,
) -> Result<&'a str, ScriptError> {
    secret
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            ScriptError::Configuration(format!(
                "{var} must be set to deploy on the {network} network"
            ))
        })
}

/// Connection parameters of the selected network, immutable once resolved
#[derive(Clone, Debug)]
pub struct NetworkConfig {
    pub name: String,
    pub chain_id: u64,
    pub rpc_url: Url,
    pub gas_price: Option<u128>,
    pub accounts: AccountsConfig,
    pub save_deployments: bool,
}

impl NetworkConfig {
    /// Resolve the configuration of the network called `name`
    pub fn resolve(name: &str, secrets: &EnvSecrets) -> Result<Self, ScriptError> {
        let definition = NetworkDefinition::lookup(name).ok_or_else(|| {
            let known: Vec<&str> = NETWORKS.iter().map(|n| n.name).collect();
            ScriptError::Configuration(format!(
                "unknown network {name}, expected one of: {}",
                known.join(", ")
            ))
        })?;
        let network = definition.name;

        let (rpc_url, mnemonic) = match definition.endpoint {
            // Local nodes only fund the dev accounts, MNEMONIC is for remote networks
            Endpoint::Local => (LOCAL_RPC.to_string(), DEV_MNEMONIC.to_string()),
            Endpoint::Infura(subdomain) => {
                let mnemonic = required(&secrets.mnemonic, MNEMONIC_ENV, network)?;
                let key = required(&secrets.infura_api_key, INFURA_API_KEY_ENV, network)?;
                (
                    format!("https://{subdomain}.infura.io/v3/{key}"),
                    mnemonic.to_string(),
                )
            }
            Endpoint::Fixed(url) => {
                let mnemonic = required(&secrets.mnemonic, MNEMONIC_ENV, network)?;
                (url.to_string(), mnemonic.to_string())
            }
        };

        let rpc_url = rpc_url.parse::<Url>().map_err(|e| {
            ScriptError::Configuration(format!("invalid rpc url for {network}: {e}"))
        })?;

        Ok(Self {
            name: network.to_string(),
            chain_id: definition.chain_id,
            rpc_url,
            gas_price: definition.gas_price,
            accounts: AccountsConfig::new(mnemonic),
            save_deployments: definition.save_deployments,
        })
    }

    /// Replace the endpoint of the network, keeping everything else
    pub fn with_rpc_url(mut self, rpc_url: Url) -> Self {
        self.rpc_url = rpc_url;
        self
    }

    /// Endpoint stripped of its path, safe to print (Infura keys live in the path)
    pub fn display_url(&self) -> String {
        match self.rpc_url.host_str() {
            Some(host) => match self.rpc_url.port() {
                Some(port) => format!("{}://{host}:{port}", self.rpc_url.scheme()),
                None => format!("{}://{host}", self.rpc_url.scheme()),
            },
            None => self.rpc_url.scheme().to_string(),
        }
    }
}
