//! Deployment records, persisted as `<deployments>/<network>/<Contract>.json`

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::{
    dyn_abi::DynSolValue,
    hex,
    primitives::{Address, TxHash, B256},
};
use json::JsonValue;

use crate::{deploy::DeploymentRecord, errors::ScriptError};

/// Name of the file holding the chain id of a network's deployments
const CHAIN_ID_FILE: &str = ".chainId";

/// A deployment record as read back from disk
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedDeployment {
    pub address: Address,
    pub transaction_hash: Option<TxHash>,
    pub block_number: Option<u64>,
    /// Constructor arguments, as written by [`format_arg`]
    pub args: Vec<String>,
    pub bytecode_hash: B256,
}

impl SavedDeployment {
    /// Whether this record was produced by the same bytecode and arguments
    pub fn matches(&self, bytecode_hash: B256, args: &[DynSolValue]) -> bool {
        self.bytecode_hash == bytecode_hash
            && self.args.len() == args.len()
            && self.args.iter().zip(args).all(|(saved, arg)| *saved == format_arg(arg))
    }

    /// Turn it back into a record of a deployment that did not happen in this run
    pub fn into_record(self, contract_name: &str, args: Vec<DynSolValue>) -> DeploymentRecord {
        DeploymentRecord {
            contract_name: contract_name.to_string(),
            address: self.address,
            constructor_args: args,
            transaction_hash: self.transaction_hash,
            block_number: self.block_number,
            bytecode_hash: self.bytecode_hash,
            newly_deployed: false,
        }
    }
}

/// Printable form of a constructor argument
pub fn format_arg(arg: &DynSolValue) -> String {
    match arg {
        DynSolValue::Address(address) => address.to_checksum(None),
        DynSolValue::Bool(value) => value.to_string(),
        DynSolValue::Uint(value, _) => value.to_string(),
        DynSolValue::Int(value, _) => value.to_string(),
        DynSolValue::String(value) => value.clone(),
        other => format!("0x{}", hex::encode(other.abi_encode())),
    }
}

/// The deployment records of one network
#[derive(Clone, Debug)]
pub struct DeploymentStore {
    network_dir: PathBuf,
    chain_id: u64,
}

impl DeploymentStore {
    /// Records of `network` below the `root` deployments directory
    pub fn new(root: impl AsRef<Path>, network: &str, chain_id: u64) -> Self {
        Self {
            network_dir: root.as_ref().join(network),
            chain_id,
        }
    }

    fn record_path(&self, contract_name: &str) -> PathBuf {
        self.network_dir.join(format!("{contract_name}.json"))
    }

    /// Read the record of a contract, if it was deployed before
    pub fn read(&self, contract_name: &str) -> Result<Option<SavedDeployment>, ScriptError> {
        let path = self.record_path(contract_name);
        if !path.exists() {
            return Ok(None);
        }
        self.check_chain_id()?;

        let parsed = get_json_from_file(&path)?;
        let field_err = |field: &str| {
            ScriptError::JsonOutputError(format!("{}: invalid {field}", path.display()))
        };

        let address = parsed["address"]
            .as_str()
            .and_then(|s| s.parse::<Address>().ok())
            .ok_or_else(|| field_err("address"))?;
        let bytecode_hash = parsed["bytecodeHash"]
            .as_str()
            .and_then(|s| s.parse::<B256>().ok())
            .ok_or_else(|| field_err("bytecodeHash"))?;
        let transaction_hash = match parsed["transactionHash"].as_str() {
            Some(s) => Some(s.parse::<TxHash>().map_err(|_| field_err("transactionHash"))?),
            None => None,
        };
        let args = parsed["args"]
            .members()
            .map(|arg| arg.as_str().map(str::to_string).ok_or_else(|| field_err("args")))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(SavedDeployment {
            address,
            transaction_hash,
            block_number: parsed["blockNumber"].as_u64(),
            args,
            bytecode_hash,
        }))
    }

    /// Write (or overwrite) the record of a deployed contract
    pub fn write(&self, record: &DeploymentRecord) -> Result<(), ScriptError> {
        fs::create_dir_all(&self.network_dir)
            .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;
        fs::write(self.network_dir.join(CHAIN_ID_FILE), self.chain_id.to_string())
            .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;

        let address = record.address.to_checksum(None);
        let args: Vec<String> = record.constructor_args.iter().map(format_arg).collect();
        let bytecode_hash = format!("{:#x}", record.bytecode_hash);
        let mut content = JsonValue::new_object();
        content["address"] = address.into();
        content["args"] = args.into();
        content["bytecodeHash"] = bytecode_hash.into();
        if let Some(tx_hash) = record.transaction_hash {
            content["transactionHash"] = JsonValue::String(format!("{tx_hash:#x}"));
        }
        if let Some(block_number) = record.block_number {
            content["blockNumber"] = block_number.into();
        }

        fs::write(
            self.record_path(&record.contract_name),
            json::stringify_pretty(content, 4),
        )
        .map_err(|e| ScriptError::JsonOutputError(e.to_string()))
    }

    /// Refuse to reuse records made on another chain under the same network name
    fn check_chain_id(&self) -> Result<(), ScriptError> {
        let path = self.network_dir.join(CHAIN_ID_FILE);
        if !path.exists() {
            return Ok(());
        }
        let saved = fs::read_to_string(&path)
            .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;
        match saved.trim().parse::<u64>() {
            Ok(chain_id) if chain_id == self.chain_id => Ok(()),
            _ => Err(ScriptError::JsonOutputError(format!(
                "records in {} belong to chain {}, not {}",
                self.network_dir.display(),
                saved.trim(),
                self.chain_id
            ))),
        }
    }
}

/// Parses the JSON file at the given path
fn get_json_from_file(path: &Path) -> Result<JsonValue, ScriptError> {
    let file_contents =
        fs::read_to_string(path).map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;

    json::parse(&file_contents).map_err(|e| ScriptError::JsonOutputError(e.to_string()))
}
