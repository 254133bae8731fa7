use alloy::{
    dyn_abi::DynSolValue,
    network::TransactionBuilder,
    primitives::{Address, Bytes, TxHash, B256},
    providers::Provider,
    rpc::types::eth::{TransactionReceipt, TransactionRequest},
};
use tracing::{info, warn};

use crate::{
    artifacts::ArtifactStore,
    deploy::{predict_contract_address, ContractDeployer, DeploymentRecord},
    errors::ScriptError,
    output_writer::DeploymentStore,
    tx::client::RpcProvider,
};

/// What a deployment needs from its transaction receipt
#[derive(Clone, Debug)]
struct DeployReceipt {
    status: bool,
    transaction_hash: TxHash,
    contract_address: Option<Address>,
    block_number: Option<u64>,
    gas_used: u128,
}

impl From<&TransactionReceipt> for DeployReceipt {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            status: receipt.status(),
            transaction_hash: receipt.transaction_hash,
            contract_address: receipt.contract_address,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        }
    }
}

/// Deploys compiled artifacts by sending creation transactions over RPC
pub struct RpcDeployer {
    client: RpcProvider,
    /// Account signing the deployments, must be the provider's wallet
    from: Address,
    artifacts: ArtifactStore,
    /// Legacy gas price forced by the network, if any
    gas_price: Option<u128>,
    records: Option<DeploymentStore>,
    /// Redeploy even when a matching record exists
    reset: bool,
}

impl RpcDeployer {
    pub fn new(client: RpcProvider, from: Address, artifacts: ArtifactStore) -> Self {
        Self {
            client,
            from,
            artifacts,
            gas_price: None,
            records: None,
            reset: false,
        }
    }

    /// Force a legacy gas price on the deployments
    pub fn with_gas_price(mut self, gas_price: Option<u128>) -> Self {
        self.gas_price = gas_price;
        self
    }

    /// Persist records in `store`, and reuse the matching ones unless `reset` is set
    pub fn with_records(mut self, store: DeploymentStore, reset: bool) -> Self {
        self.records = Some(store);
        self.reset = reset;
        self
    }

    /// Predict the address of the next contract created by the deployer
    async fn predict_next_address(&self) -> Result<Address, ScriptError> {
        let nonce = self
            .client
            .get_transaction_count(self.from)
            .await
            .map_err(|e| ScriptError::NonceFetching(e.to_string()))?;

        Ok(predict_contract_address(self.from, nonce))
    }

    /// Creation transaction of `creation_code`, signed by the deployer
    fn deploy_tx(&self, creation_code: Bytes) -> TransactionRequest {
        let tx_request = TransactionRequest::default()
            .with_from(self.from)
            .with_deploy_code(creation_code);
        match self.gas_price {
            Some(gas_price) => tx_request.with_gas_price(gas_price),
            None => tx_request,
        }
    }

    /// Check the receipt of a deployment and persist the resulting record
    fn record_from_receipt(
        &self,
        contract_name: &str,
        args: Vec<DynSolValue>,
        bytecode_hash: B256,
        expected_address: Address,
        receipt: DeployReceipt,
    ) -> Result<DeploymentRecord, ScriptError> {
        if !receipt.status {
            return Err(ScriptError::ContractDeployment(format!(
                "{contract_name}: transaction {} reverted",
                receipt.transaction_hash
            )));
        }
        let address = receipt.contract_address.ok_or_else(|| {
            ScriptError::ContractDeployment(format!(
                "{contract_name}: receipt of {} has no contract address",
                receipt.transaction_hash
            ))
        })?;
        if address != expected_address {
            warn!(
                "{} landed at {} instead of the predicted {}",
                contract_name, address, expected_address
            );
        }
        info!(
            "{} deployed in block {:?}, gas used: {}",
            contract_name, receipt.block_number, receipt.gas_used
        );

        let record = DeploymentRecord {
            contract_name: contract_name.to_string(),
            address,
            constructor_args: args,
            transaction_hash: Some(receipt.transaction_hash),
            block_number: receipt.block_number,
            bytecode_hash,
            newly_deployed: true,
        };
        if let Some(store) = &self.records {
            store.write(&record)?;
        }

        Ok(record)
    }
}

impl ContractDeployer for RpcDeployer {
    async fn deploy(
        &mut self,
        contract_name: &str,
        args: Vec<DynSolValue>,
    ) -> Result<DeploymentRecord, ScriptError> {
        let artifact = self.artifacts.load(contract_name)?;
        let creation_code = artifact.creation_code(&args)?;
        let bytecode_hash = artifact.bytecode_hash();

        // Reuse what was already deployed with the same code and arguments
        if let Some(store) = &self.records {
            if let Some(saved) = store.read(contract_name)? {
                if self.reset {
                    info!("Reset requested, redeploying {}", contract_name);
                } else if saved.matches(bytecode_hash, &args) {
                    info!("Reusing {} deployed at {}", contract_name, saved.address);
                    return Ok(saved.into_record(contract_name, args));
                } else {
                    info!("{} changed since its last deployment, redeploying", contract_name);
                }
            }
        }

        let expected_address = self.predict_next_address().await?;
        info!("Deploying {} to {}...", contract_name, expected_address);

        // Send it
        let pending_tx = self
            .client
            .send_transaction(self.deploy_tx(creation_code))
            .await
            .map_err(|e| ScriptError::ContractDeployment(format!("{contract_name}: {e}")))?;
        info!("Pending deploy transaction... {}", pending_tx.tx_hash());

        // Wait for the transaction to be included.
        let receipt = pending_tx
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractDeployment(format!("{contract_name}: {e}")))?;

        self.record_from_receipt(
            contract_name,
            args,
            bytecode_hash,
            expected_address,
            DeployReceipt::from(&receipt),
        )
    }
}
