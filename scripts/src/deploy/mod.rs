//! Contract deployments.
//!
//! [`ContractDeployer`] is the seam between the deployment sequence and the
//! chain: [`RpcDeployer`] sends real transactions, tests swap in their own.

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, TxHash, B256},
};

use crate::errors::ScriptError;

mod rpc;
pub mod sequence;

pub use rpc::RpcDeployer;
pub use sequence::{deploy_treasury_and_ct, treasury_args, DeployedSuite};

/// A contract living on the network, never mutated once created
#[derive(Clone, Debug, PartialEq)]
pub struct DeploymentRecord {
    pub contract_name: String,
    pub address: Address,
    pub constructor_args: Vec<DynSolValue>,
    /// Hash of the creation transaction, absent for records made by another tool
    pub transaction_hash: Option<TxHash>,
    pub block_number: Option<u64>,
    /// Hash of the creation bytecode, without the constructor arguments
    pub bytecode_hash: B256,
    /// False when an existing deployment was reused
    pub newly_deployed: bool,
}

/// Something able to get a contract deployed on a network
#[allow(async_fn_in_trait)]
pub trait ContractDeployer {
    /// Deploy `contract_name` with the given constructor arguments, returning
    /// once the deployment is confirmed
    async fn deploy(
        &mut self,
        contract_name: &str,
        args: Vec<DynSolValue>,
    ) -> Result<DeploymentRecord, ScriptError>;
}

/// Address a contract created by `deployer` at `nonce` will live at
pub fn predict_contract_address(deployer: Address, nonce: u64) -> Address {
    deployer.create(nonce)
}
