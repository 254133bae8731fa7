//! Deployment of the ConditionalTokens + Treasury suite

use alloy::{dyn_abi::DynSolValue, primitives::Address};
use tracing::info;

use crate::{
    constants::{CONDITIONAL_TOKENS_CONTRACT, TREASURY_CONTRACT},
    deploy::{ContractDeployer, DeploymentRecord},
    errors::ScriptError,
};

/// The two records produced by one run
#[derive(Clone, Debug, PartialEq)]
pub struct DeployedSuite {
    pub conditional_tokens: DeploymentRecord,
    pub treasury: DeploymentRecord,
}

/// Constructor arguments of the Treasury contract
pub fn treasury_args(conditional_tokens: Address, trusted_address: Address) -> Vec<DynSolValue> {
    vec![
        DynSolValue::Address(conditional_tokens),
        DynSolValue::Address(trusted_address),
    ]
}

/// Deploy ConditionalTokens, then the Treasury built on top of it.
///
/// The Treasury is only attempted once the ConditionalTokens deployment is
/// confirmed, any error aborts the whole sequence.
pub async fn deploy_treasury_and_ct<D: ContractDeployer>(
    deployer: &mut D,
    trusted_address: Address,
) -> Result<DeployedSuite, ScriptError> {
    let conditional_tokens = deployer
        .deploy(CONDITIONAL_TOKENS_CONTRACT, Vec::new())
        .await?;
    info!(
        "{} available at {}",
        CONDITIONAL_TOKENS_CONTRACT, conditional_tokens.address
    );

    let treasury = deployer
        .deploy(
            TREASURY_CONTRACT,
            treasury_args(conditional_tokens.address, trusted_address),
        )
        .await?;
    info!("{} available at {}", TREASURY_CONTRACT, treasury.address);

    Ok(DeployedSuite {
        conditional_tokens,
        treasury,
    })
}

#[cfg(test)]
mod tests {
    use alloy::primitives::B256;

    use super::*;
    use crate::{
        accounts::NamedAccounts,
        deploy::predict_contract_address,
        network::{EnvSecrets, NetworkConfig, NETWORKS},
    };

    /// Deploys at the CREATE addresses of a fresh account, remembering every call
    struct MockDeployer {
        from: Address,
        nonce: u64,
        calls: Vec<(String, Vec<DynSolValue>)>,
        fail_on: Option<&'static str>,
    }

    impl MockDeployer {
        fn new(from: Address) -> Self {
            Self {
                from,
                nonce: 0,
                calls: Vec::new(),
                fail_on: None,
            }
        }

        fn failing_on(from: Address, contract_name: &'static str) -> Self {
            Self {
                fail_on: Some(contract_name),
                ..Self::new(from)
            }
        }
    }

    impl ContractDeployer for MockDeployer {
        async fn deploy(
            &mut self,
            contract_name: &str,
            args: Vec<DynSolValue>,
        ) -> Result<DeploymentRecord, ScriptError> {
            self.calls.push((contract_name.to_string(), args.clone()));
            if self.fail_on == Some(contract_name) {
                return Err(ScriptError::ContractDeployment(format!(
                    "{contract_name} reverted"
                )));
            }

            let address = predict_contract_address(self.from, self.nonce);
            self.nonce += 1;
            Ok(DeploymentRecord {
                contract_name: contract_name.to_string(),
                address,
                constructor_args: args,
                transaction_hash: None,
                block_number: Some(self.nonce),
                bytecode_hash: B256::ZERO,
                newly_deployed: true,
            })
        }
    }

    fn trusted() -> Address {
        "0xfe4F5145f6e09952a5ba9e956ED0C25e3Fa4c7F1".parse().unwrap()
    }

    #[tokio::test]
    async fn test_hardhat_deployment_scenario() {
        let network = NetworkConfig::resolve("hardhat", &EnvSecrets::default()).unwrap();
        let accounts = NamedAccounts::derive(&network.accounts).unwrap();
        let deployer = accounts.deployer().unwrap().address();
        let mut mock = MockDeployer::new(deployer);

        let suite = deploy_treasury_and_ct(&mut mock, trusted()).await.unwrap();

        let ct: Address = "0x5FbDB2315678afecb367f032d93F642f64180aa3".parse().unwrap();
        let treasury: Address = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512".parse().unwrap();
        assert_eq!(suite.conditional_tokens.contract_name, "ConditionalTokens");
        assert_eq!(suite.conditional_tokens.address, ct);
        assert!(suite.conditional_tokens.constructor_args.is_empty());
        assert_eq!(suite.treasury.contract_name, "Treasury");
        assert_eq!(suite.treasury.address, treasury);
        assert_eq!(
            suite.treasury.constructor_args,
            vec![DynSolValue::Address(ct), DynSolValue::Address(trusted())]
        );

        // ConditionalTokens strictly before the Treasury
        let order: Vec<&str> = mock.calls.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(order, vec!["ConditionalTokens", "Treasury"]);
    }

    #[tokio::test]
    async fn test_treasury_not_attempted_when_ct_fails() {
        let mut mock = MockDeployer::failing_on(Address::repeat_byte(0x01), "ConditionalTokens");

        let err = deploy_treasury_and_ct(&mut mock, trusted()).await.unwrap_err();

        assert!(matches!(err, ScriptError::ContractDeployment(_)));
        assert_eq!(mock.calls.len(), 1);
        assert_eq!(mock.calls[0].0, "ConditionalTokens");
    }

    #[tokio::test]
    async fn test_treasury_failure_is_propagated() {
        let mut mock = MockDeployer::failing_on(Address::repeat_byte(0x01), "Treasury");

        let result = deploy_treasury_and_ct(&mut mock, trusted()).await;

        assert!(matches!(result, Err(ScriptError::ContractDeployment(_))));
        assert_eq!(mock.calls.len(), 2);
    }

    #[tokio::test]
    async fn test_treasury_args_follow_ct_address_on_every_network() {
        // Different deployers give different ConditionalTokens addresses, the
        // trusted address is the same everywhere
        for (position, network) in NETWORKS.iter().enumerate() {
            let from = Address::with_last_byte(position as u8 + 1);
            let mut mock = MockDeployer::new(from);

            let suite = deploy_treasury_and_ct(&mut mock, trusted()).await.unwrap();

            assert_eq!(
                suite.treasury.constructor_args,
                treasury_args(suite.conditional_tokens.address, trusted()),
                "treasury args on {}",
                network.name
            );
            assert_eq!(
                suite.treasury.constructor_args[1],
                DynSolValue::Address(trusted())
            );
        }
    }
}
