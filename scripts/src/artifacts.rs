//! Compiled contract artifacts.
//!
//! Both the Hardhat layout (`bytecode` is a hex string) and the Foundry layout
//! (`bytecode.object`) are understood. Artifacts are looked up by contract
//! name anywhere below the artifacts directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::{
    dyn_abi::{DynSolType, DynSolValue},
    hex,
    primitives::{keccak256, Bytes, B256},
};
use json::JsonValue;

use crate::errors::ScriptError;

/// What the scripts need from a compiled contract
#[derive(Clone, Debug)]
pub struct Artifact {
    pub contract_name: String,
    /// Creation bytecode, without constructor arguments
    pub bytecode: Bytes,
    /// Types of the constructor parameters, in order
    pub constructor_inputs: Vec<DynSolType>,
}

impl Artifact {
    /// Parse the json content of an artifact
    pub fn parse(contract_name: &str, contents: &str) -> Result<Self, ScriptError> {
        let artifact_err =
            |msg: String| ScriptError::ArtifactLoading(format!("{contract_name}: {msg}"));

        let parsed = json::parse(contents).map_err(|e| artifact_err(e.to_string()))?;

        // Hardhat stores the bytecode directly, foundry nests it under `object`
        let raw_bytecode = parsed["bytecode"]
            .as_str()
            .or_else(|| parsed["bytecode"]["object"].as_str())
            .ok_or_else(|| artifact_err("no bytecode found".to_string()))?;
        if raw_bytecode.contains("__") {
            return Err(artifact_err("bytecode has unlinked libraries".to_string()));
        }
        let bytecode = hex::decode(raw_bytecode.strip_prefix("0x").unwrap_or(raw_bytecode))
            .map_err(|e| artifact_err(format!("invalid bytecode: {e}")))?;
        if bytecode.is_empty() {
            return Err(artifact_err(
                "empty bytecode, is it an abstract contract or an interface?".to_string(),
            ));
        }

        if !parsed["abi"].is_array() {
            return Err(artifact_err("no abi found".to_string()));
        }
        let constructor_inputs = match parsed["abi"]
            .members()
            .find(|entry| entry["type"] == "constructor")
        {
            Some(constructor) => constructor["inputs"]
                .members()
                .map(|input| {
                    let ty = param_type(input).map_err(&artifact_err)?;
                    DynSolType::parse(&ty)
                        .map_err(|e| artifact_err(format!("invalid constructor type {ty}: {e}")))
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            contract_name: contract_name.to_string(),
            bytecode: Bytes::from(bytecode),
            constructor_inputs,
        })
    }

    /// Hash of the creation bytecode, used to detect a changed contract
    pub fn bytecode_hash(&self) -> B256 {
        keccak256(&self.bytecode)
    }

    /// Creation bytecode followed by the abi encoded constructor arguments
    pub fn creation_code(&self, args: &[DynSolValue]) -> Result<Bytes, ScriptError> {
        if args.len() != self.constructor_inputs.len() {
            return Err(ScriptError::ContractDeployment(format!(
                "{} expects {} constructor arguments, got {}",
                self.contract_name,
                self.constructor_inputs.len(),
                args.len()
            )));
        }
        for (position, (ty, arg)) in self.constructor_inputs.iter().zip(args).enumerate() {
            if !ty.matches(arg) {
                return Err(ScriptError::ContractDeployment(format!(
                    "{} constructor argument {position} should be a {ty}",
                    self.contract_name
                )));
            }
        }

        let mut code = self.bytecode.to_vec();
        if !args.is_empty() {
            code.extend(DynSolValue::Tuple(args.to_vec()).abi_encode_params());
        }
        Ok(Bytes::from(code))
    }
}

/// Canonical solidity type of an abi parameter, tuples expanded into their components
fn param_type(param: &JsonValue) -> Result<String, String> {
    let ty = param["type"]
        .as_str()
        .ok_or_else(|| "abi parameter without type".to_string())?;

    match ty.strip_prefix("tuple") {
        Some(array_suffix) => {
            let components = param["components"]
                .members()
                .map(param_type)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("({}){array_suffix}", components.join(",")))
        }
        None => Ok(ty.to_string()),
    }
}

/// Directory of compiled artifacts
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Load the artifact of the given contract
    pub fn load(&self, contract_name: &str) -> Result<Artifact, ScriptError> {
        let path = self.find(contract_name)?;
        let contents = fs::read_to_string(&path)
            .map_err(|e| ScriptError::ArtifactLoading(format!("{}: {e}", path.display())))?;
        Artifact::parse(contract_name, &contents)
    }

    /// Find the single `<contract_name>.json` below the root
    fn find(&self, contract_name: &str) -> Result<PathBuf, ScriptError> {
        let file_name = format!("{contract_name}.json");
        let mut candidates = Vec::new();
        collect_matching(&self.root, &file_name, &mut candidates)?;
        candidates.sort();

        match candidates.len() {
            0 => Err(ScriptError::ArtifactLoading(format!(
                "no artifact for {contract_name} in {}, are the contracts compiled?",
                self.root.display()
            ))),
            1 => Ok(candidates.remove(0)),
            _ => Err(ScriptError::ArtifactLoading(format!(
                "several artifacts named {contract_name}: {}",
                candidates
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

/// Walk `dir` recursively, skipping hardhat's build-info
fn collect_matching(
    dir: &Path,
    file_name: &str,
    out: &mut Vec<PathBuf>,
) -> Result<(), ScriptError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| ScriptError::ArtifactLoading(format!("{}: {e}", dir.display())))?;

    for entry in entries {
        let entry = entry.map_err(|e| ScriptError::ArtifactLoading(e.to_string()))?;
        let path = entry.path();
        // Symlinked directories are not followed
        let file_type = entry
            .file_type()
            .map_err(|e| ScriptError::ArtifactLoading(format!("{}: {e}", path.display())))?;
        if file_type.is_dir() {
            if path.file_name().is_some_and(|name| name == "build-info") {
                continue;
            }
            collect_matching(&path, file_name, out)?;
        } else if path.file_name().is_some_and(|name| name == file_name) {
            out.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{Address, U256};
    use tempfile::TempDir;

    use super::*;

    const TREASURY_HARDHAT: &str = r#"{
        "contractName": "Treasury",
        "abi": [
            {
                "type": "constructor",
                "inputs": [
                    { "name": "conditionalTokens", "type": "address" },
                    { "name": "trusted", "type": "address" }
                ]
            },
            { "type": "function", "name": "owner", "inputs": [], "outputs": [] }
        ],
        "bytecode": "0x6080604052"
    }"#;

    const CT_FOUNDRY: &str = r#"{
        "abi": [],
        "bytecode": { "object": "0x60806040", "linkReferences": {} }
    }"#;

    fn write(dir: &Path, relative: &str, contents: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_parse_hardhat_layout() {
        let artifact = Artifact::parse("Treasury", TREASURY_HARDHAT).unwrap();

        assert_eq!(artifact.bytecode.to_vec(), vec![0x60, 0x80, 0x60, 0x40, 0x52]);
        assert_eq!(
            artifact.constructor_inputs,
            vec![DynSolType::Address, DynSolType::Address]
        );
    }

    #[test]
    fn test_parse_foundry_layout_without_constructor() {
        let artifact = Artifact::parse("ConditionalTokens", CT_FOUNDRY).unwrap();

        assert_eq!(artifact.bytecode.len(), 4);
        assert!(artifact.constructor_inputs.is_empty());
    }

    #[test]
    fn test_parse_tuple_constructor_input() {
        let contents = r#"{
            "abi": [{
                "type": "constructor",
                "inputs": [{
                    "name": "cfg",
                    "type": "tuple[]",
                    "components": [
                        { "name": "a", "type": "address" },
                        { "name": "b", "type": "uint256" }
                    ]
                }]
            }],
            "bytecode": "0x00"
        }"#;
        let artifact = Artifact::parse("Config", contents).unwrap();

        assert_eq!(
            artifact.constructor_inputs,
            vec![DynSolType::Array(Box::new(DynSolType::Tuple(vec![
                DynSolType::Address,
                DynSolType::Uint(256)
            ])))]
        );
    }

    #[test]
    fn test_reject_unusable_bytecode() {
        let unlinked = r#"{ "abi": [], "bytecode": "0x60__$abcdef$__00" }"#;
        let empty = r#"{ "abi": [], "bytecode": "0x" }"#;
        let missing = r#"{ "abi": [] }"#;

        for contents in [unlinked, empty, missing] {
            assert!(matches!(
                Artifact::parse("Broken", contents),
                Err(ScriptError::ArtifactLoading(_))
            ));
        }
    }

    #[test]
    fn test_creation_code_appends_encoded_args() {
        let artifact = Artifact::parse("Treasury", TREASURY_HARDHAT).unwrap();
        let first = Address::repeat_byte(0x11);
        let second = Address::repeat_byte(0x22);

        let code = artifact
            .creation_code(&[DynSolValue::Address(first), DynSolValue::Address(second)])
            .unwrap();

        assert_eq!(code.len(), 5 + 64);
        assert_eq!(&code[..5], &artifact.bytecode[..]);
        assert_eq!(&code[5..17], &[0u8; 12]);
        assert_eq!(&code[17..37], first.as_slice());
        assert_eq!(&code[49..69], second.as_slice());
    }

    #[test]
    fn test_creation_code_checks_arguments() {
        let artifact = Artifact::parse("Treasury", TREASURY_HARDHAT).unwrap();

        let too_few = artifact.creation_code(&[DynSolValue::Address(Address::ZERO)]);
        assert!(matches!(too_few, Err(ScriptError::ContractDeployment(_))));

        let wrong_type = artifact.creation_code(&[
            DynSolValue::Address(Address::ZERO),
            DynSolValue::Uint(U256::from(1), 256),
        ]);
        assert!(matches!(wrong_type, Err(ScriptError::ContractDeployment(_))));
    }

    #[test]
    fn test_store_finds_nested_artifact() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "contracts/Treasury.sol/Treasury.json", TREASURY_HARDHAT);
        write(dir.path(), "contracts/Treasury.sol/Treasury.dbg.json", "{}");
        write(dir.path(), "build-info/Treasury.json", "{}");

        let artifact = ArtifactStore::new(dir.path()).load("Treasury").unwrap();
        assert_eq!(artifact.contract_name, "Treasury");
        assert_eq!(artifact.constructor_inputs.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_store_does_not_follow_directory_symlinks() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "contracts/Treasury.sol/Treasury.json", TREASURY_HARDHAT);
        // A link back to the root would loop forever if followed
        std::os::unix::fs::symlink(dir.path(), dir.path().join("contracts/loop")).unwrap();

        let artifact = ArtifactStore::new(dir.path()).load("Treasury").unwrap();
        assert_eq!(artifact.contract_name, "Treasury");
    }

    #[test]
    fn test_store_missing_and_ambiguous() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        assert!(matches!(
            store.load("ConditionalTokens"),
            Err(ScriptError::ArtifactLoading(_))
        ));

        write(dir.path(), "a/ConditionalTokens.json", CT_FOUNDRY);
        write(dir.path(), "b/ConditionalTokens.json", CT_FOUNDRY);
        let err = store.load("ConditionalTokens").unwrap_err();
        assert!(matches!(err, ScriptError::ArtifactLoading(msg) if msg.contains("several")));
    }
}
