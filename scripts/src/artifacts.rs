//! Resolution of compiled contract artifacts from the build output.
//!
//! Artifacts are laid out one directory per source file, e.g.
//! `artifacts/contracts/Treasury.sol/Treasury.json`, next to a `.dbg.json`
//! file pointing at the compiler build info. Foundry's `out/` tree uses the
//! same per-source layout and is accepted as well.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy::{
    dyn_abi::{DynSolValue, JsonAbiExt, Specifier},
    json_abi::JsonAbi,
    primitives::Bytes,
};
use itertools::Itertools;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    config::{OptimizerConfig, SolidityConfig},
    constants::{
        ARTIFACT_EXTENSION, BUILD_INFO_DIR, DBG_ARTIFACT_SUFFIX, FQN_SEPARATOR,
        SOURCE_DIR_EXTENSION,
    },
    errors::ScriptError,
};

/// A compiled contract, ready to be deployed
#[derive(Debug, Clone)]
pub struct Artifact {
    /// The contract name
    pub contract_name: String,
    /// The source file the contract is defined in, e.g. `contracts/Treasury.sol`
    pub source_name: String,
    /// The contract ABI
    pub abi: JsonAbi,
    /// The creation bytecode, without constructor arguments
    pub bytecode: Bytes,
    /// The build info the artifact was produced from, if known
    pub build_info_path: Option<PathBuf>,
}

impl Artifact {
    /// The `source:name` form of the contract identifier
    pub fn fully_qualified_name(&self) -> String {
        format!("{}{}{}", self.source_name, FQN_SEPARATOR, self.contract_name)
    }

    /// ABI-encode string constructor arguments against the contract's
    /// constructor signature
    pub fn encode_constructor_args(&self, args: &[String]) -> Result<Vec<u8>, ScriptError> {
        let Some(constructor) = self.abi.constructor() else {
            if args.is_empty() {
                return Ok(Vec::new());
            }

            return Err(ScriptError::CalldataConstruction(format!(
                "`{}` has no constructor, but {} arguments were given",
                self.contract_name,
                args.len()
            )));
        };

        if constructor.inputs.len() != args.len() {
            return Err(ScriptError::CalldataConstruction(format!(
                "`{}` constructor takes {} arguments, got {}",
                self.contract_name,
                constructor.inputs.len(),
                args.len()
            )));
        }

        let values = constructor
            .inputs
            .iter()
            .zip(args)
            .map(|(param, arg)| {
                let ty = param.resolve().map_err(|e| {
                    ScriptError::CalldataConstruction(format!(
                        "unsupported parameter type `{}`: {}",
                        param.ty, e
                    ))
                })?;

                ty.coerce_str(arg).map_err(|e| {
                    ScriptError::CalldataConstruction(format!(
                        "`{}` is not a valid `{}`: {}",
                        arg, param.ty, e
                    ))
                })
            })
            .collect::<Result<Vec<DynSolValue>, _>>()?;

        constructor
            .abi_encode_input(&values)
            .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))
    }

    /// The full init code of a creation transaction: bytecode followed by the
    /// encoded constructor arguments
    pub fn creation_code(&self, args: &[String]) -> Result<Bytes, ScriptError> {
        let encoded_args = self.encode_constructor_args(args)?;
        Ok([self.bytecode.as_ref(), encoded_args.as_slice()].concat().into())
    }

    /// Read the build info the artifact was compiled in
    pub fn build_info(&self) -> Result<BuildInfo, ScriptError> {
        let path = self.build_info_path.as_ref().ok_or_else(|| {
            ScriptError::ArtifactParsing(format!(
                "no build info recorded for `{}`",
                self.fully_qualified_name()
            ))
        })?;

        let contents = fs::read_to_string(path).map_err(|e| {
            ScriptError::ArtifactParsing(format!("reading {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            ScriptError::ArtifactParsing(format!("parsing {}: {}", path.display(), e))
        })
    }
}

/// The compiler run an artifact came from
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    /// The short compiler version, e.g. `0.8.1`
    pub solc_version: String,
    /// The full compiler version, e.g. `0.8.1+commit.df193b15`
    pub solc_long_version: String,
    /// The standard JSON input given to the compiler
    pub input: Value,
}

impl BuildInfo {
    /// The optimizer settings in the compiler input
    pub fn optimizer(&self) -> Option<OptimizerConfig> {
        let optimizer = self.input.get("settings")?.get("optimizer")?;
        serde_json::from_value(optimizer.clone()).ok()
    }
}

/// A source of compiled contract artifacts
pub trait ArtifactResolver {
    /// Resolve a bare contract name or a `source:name` identifier
    fn resolve(&self, contract: &str) -> Result<Artifact, ScriptError>;
}

/// The on-disk shape of an artifact file
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactFile {
    /// The contract name
    contract_name: Option<String>,
    /// The source file
    source_name: Option<String>,
    /// The contract ABI
    abi: JsonAbi,
    /// The creation bytecode
    bytecode: BytecodeField,
    /// Libraries that must be linked into the bytecode
    #[serde(default)]
    link_references: Map<String, Value>,
}

/// Hardhat stores bytecode as a hex string, Foundry as an object
#[derive(Deserialize)]
#[serde(untagged)]
enum BytecodeField {
    /// A bare hex string
    Hex(String),
    /// An object with the hex string under `object`
    Object {
        /// The hex string
        object: String,
    },
}

impl BytecodeField {
    /// The hex string, wherever it lives
    fn as_hex(&self) -> &str {
        match self {
            BytecodeField::Hex(hex) => hex,
            BytecodeField::Object { object } => object,
        }
    }
}

/// The debug file sitting next to each Hardhat artifact
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DbgFile {
    /// The build info path, relative to the debug file
    build_info: String,
}

/// Resolves artifacts from a Hardhat (or Foundry) build output directory
#[derive(Debug, Clone)]
pub struct HardhatArtifacts {
    /// The root of the artifacts tree
    root: PathBuf,
    /// The compiler settings artifacts are expected to be built with
    solidity: Option<SolidityConfig>,
}

impl HardhatArtifacts {
    /// Create a resolver over the given artifacts root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            solidity: None,
        }
    }

    /// Warn when resolved artifacts were not built with the given settings
    pub fn with_solidity(mut self, solidity: SolidityConfig) -> Self {
        self.solidity = Some(solidity);
        self
    }

    /// Find every artifact file for the given contract name
    fn find(&self, contract_name: &str) -> Result<Vec<PathBuf>, ScriptError> {
        let file_name = format!("{}.{}", contract_name, ARTIFACT_EXTENSION);
        let mut found = Vec::new();
        find_artifact_files(&self.root, &file_name, &mut found)?;
        found.sort();
        Ok(found)
    }

    /// The `source:name` identifier for an artifact file under the root
    fn fully_qualified_name(&self, path: &Path, contract_name: &str) -> String {
        let source = path
            .parent()
            .and_then(|dir| dir.strip_prefix(&self.root).ok())
            .unwrap_or(Path::new(""));
        format!("{}{}{}", source.display(), FQN_SEPARATOR, contract_name)
    }

    /// Load and validate a single artifact file
    fn load(&self, path: &Path, contract_name: &str) -> Result<Artifact, ScriptError> {
        debug!(path = %path.display(), "loading artifact");
        let contents = fs::read_to_string(path).map_err(|e| {
            ScriptError::ArtifactParsing(format!("reading {}: {}", path.display(), e))
        })?;
        let file: ArtifactFile = serde_json::from_str(&contents).map_err(|e| {
            ScriptError::ArtifactParsing(format!("parsing {}: {}", path.display(), e))
        })?;

        let fqn = self.fully_qualified_name(path, contract_name);
        if !file.link_references.is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "`{}` needs libraries linked: {}",
                fqn,
                file.link_references.keys().join(", ")
            )));
        }

        let hex = file.bytecode.as_hex();
        if hex.trim_start_matches("0x").is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "`{}` has no creation bytecode, is it abstract or an interface?",
                fqn
            )));
        }
        let bytecode = Bytes::from_str(hex).map_err(|e| {
            ScriptError::ArtifactParsing(format!("invalid bytecode for `{}`: {}", fqn, e))
        })?;

        let source_name = file.source_name.unwrap_or_else(|| {
            fqn.rsplit_once(FQN_SEPARATOR)
                .map(|(source, _)| source.to_string())
                .unwrap_or_default()
        });

        Ok(Artifact {
            contract_name: file
                .contract_name
                .unwrap_or_else(|| contract_name.to_string()),
            source_name,
            abi: file.abi,
            bytecode,
            build_info_path: build_info_path(path, contract_name),
        })
    }

    /// Warn if the artifact was built with settings the project does not use
    fn check_compiler(&self, artifact: &Artifact) {
        let Some(solidity) = &self.solidity else {
            return;
        };
        let build_info = match artifact.build_info() {
            Ok(build_info) => build_info,
            Err(e) => {
                debug!("skipping compiler check: {}", e);
                return;
            }
        };

        if !solidity.uses_compiler(&build_info.solc_version) {
            warn!(
                contract = %artifact.fully_qualified_name(),
                solc = %build_info.solc_version,
                "artifact was built with a compiler the project does not configure"
            );
        }
        if let Some(optimizer) = build_info.optimizer() {
            if optimizer != solidity.optimizer {
                warn!(
                    contract = %artifact.fully_qualified_name(),
                    enabled = optimizer.enabled,
                    runs = optimizer.runs,
                    "artifact was built with different optimizer settings"
                );
            }
        }
    }
}

impl ArtifactResolver for HardhatArtifacts {
    fn resolve(&self, contract: &str) -> Result<Artifact, ScriptError> {
        if !self.root.is_dir() {
            return Err(ScriptError::ArtifactNotFound(format!(
                "artifacts directory {} does not exist, compile the contracts first",
                self.root.display()
            )));
        }

        let artifact = match contract.rsplit_once(FQN_SEPARATOR) {
            Some((source, name)) => {
                let path = self
                    .root
                    .join(source)
                    .join(format!("{}.{}", name, ARTIFACT_EXTENSION));
                if !path.is_file() {
                    return Err(ScriptError::ArtifactNotFound(contract.to_string()));
                }
                self.load(&path, name)?
            }
            None => {
                let mut found = self.find(contract)?;
                match found.len() {
                    0 => return Err(ScriptError::ArtifactNotFound(contract.to_string())),
                    1 => self.load(&found.remove(0), contract)?,
                    _ => {
                        return Err(ScriptError::AmbiguousArtifact(format!(
                            "`{}` matches several contracts, use one of: {}",
                            contract,
                            found
                                .iter()
                                .map(|path| self.fully_qualified_name(path, contract))
                                .join(", ")
                        )))
                    }
                }
            }
        };

        self.check_compiler(&artifact);
        Ok(artifact)
    }
}

/// Recursively collect artifact files with the given name, skipping build info
fn find_artifact_files(
    dir: &Path,
    file_name: &str,
    found: &mut Vec<PathBuf>,
) -> Result<(), ScriptError> {
    let entries = fs::read_dir(dir).map_err(|e| {
        ScriptError::ArtifactParsing(format!("reading {}: {}", dir.display(), e))
    })?;

    for entry in entries {
        let path = entry
            .map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?
            .path();

        if path.is_dir() {
            if path.file_name().is_some_and(|name| name == BUILD_INFO_DIR) {
                continue;
            }
            find_artifact_files(&path, file_name, found)?;
        } else if path.file_name().is_some_and(|name| name == file_name)
            && path
                .parent()
                .and_then(Path::extension)
                .is_some_and(|ext| ext == SOURCE_DIR_EXTENSION)
        {
            found.push(path);
        }
    }

    Ok(())
}

/// Follow an artifact's debug file to its build info, if both exist
fn build_info_path(artifact_path: &Path, contract_name: &str) -> Option<PathBuf> {
    let dir = artifact_path.parent()?;
    let dbg_path = dir.join(format!("{}{}", contract_name, DBG_ARTIFACT_SUFFIX));
    let contents = fs::read_to_string(dbg_path).ok()?;
    let dbg: DbgFile = serde_json::from_str(&contents).ok()?;

    let path = dir.join(dbg.build_info);
    path.is_file().then_some(path)
}
