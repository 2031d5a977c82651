//! Constants used in the deploy scripts

use std::time::Duration;

// -----------
// | Process |
// -----------

/// The exit code reported when a script succeeds
pub const EXIT_SUCCESS: u8 = 0;

/// The exit code reported when a script fails for any reason
pub const EXIT_FAILURE: u8 = 1;

/// The log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

// -----------------
// | Configuration |
// -----------------

/// The environment variable selecting the network to deploy to
pub const NETWORK_ENV_VAR: &str = "DEPLOY_NETWORK";

/// The environment variable pointing at the project config file
pub const CONFIG_ENV_VAR: &str = "DEPLOY_CONFIG";

/// The config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "deploy.toml";

/// The network used when neither the CLI nor the config names one
pub const DEFAULT_NETWORK: &str = "bscTestNet";

/// The BSC mainnet network name
pub const BSC_MAINNET: &str = "bscMainNet";

/// The BSC mainnet RPC endpoint
pub const BSC_MAINNET_RPC_URL: &str = "https://bsc-dataseed.binance.org";

/// The environment variable holding the BSC mainnet deployer key
pub const BSC_MAINNET_KEY_ENV_VAR: &str = "BSCMainNet";

/// The BSC mainnet chain ID
pub const BSC_MAINNET_CHAIN_ID: u64 = 56;

/// The BscScan mainnet API endpoint
pub const BSC_MAINNET_EXPLORER_API_URL: &str = "https://api.bscscan.com/api";

/// The BSC testnet network name
pub const BSC_TESTNET: &str = "bscTestNet";

/// The BSC testnet RPC endpoint
pub const BSC_TESTNET_RPC_URL: &str = "https://data-seed-prebsc-1-s1.binance.org:8545";

/// The environment variable holding the BSC testnet deployer key
pub const BSC_TESTNET_KEY_ENV_VAR: &str = "BSCTestNet";

/// The BSC testnet chain ID
pub const BSC_TESTNET_CHAIN_ID: u64 = 97;

/// The BscScan testnet API endpoint
pub const BSC_TESTNET_EXPLORER_API_URL: &str = "https://api-testnet.bscscan.com/api";

/// The environment variable holding the BscScan API key
pub const BSCSCAN_API_KEY_ENV_VAR: &str = "BSCSCAN_API_KEY";

/// The Solidity compiler version the contracts are built with
pub const DEFAULT_SOLC_VERSION: &str = "0.8.1";

/// The number of optimizer runs the contracts are built with
pub const DEFAULT_OPTIMIZER_RUNS: u64 = 200;

/// The directory holding compiled artifacts, relative to the project root
pub const DEFAULT_ARTIFACTS_PATH: &str = "./artifacts";

/// The number of confirmations to wait for the contract deployment transaction
pub const NUM_DEPLOY_CONFIRMATIONS: u64 = 1;

// -------------
// | Artifacts |
// -------------

/// The directory inside the artifacts root holding compiler build info
pub const BUILD_INFO_DIR: &str = "build-info";

/// The extension of artifact files
pub const ARTIFACT_EXTENSION: &str = "json";

/// The suffix of the debug files that sit next to each artifact
pub const DBG_ARTIFACT_SUFFIX: &str = ".dbg.json";

/// The extension of the per-source directories artifacts are grouped in
pub const SOURCE_DIR_EXTENSION: &str = "sol";

/// The separator between source name and contract name in a fully qualified name
pub const FQN_SEPARATOR: char = ':';

// ---------------
// | Deployments |
// ---------------

/// The deployments key in the deployments file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The JSON indentation used when writing the deployments file
pub const DEPLOYMENTS_INDENT: &[u8] = b"    ";

// -----------------
// | Fixed Scripts |
// -----------------

/// The AMM query contract
pub const AMM_QUERY_CONTRACT: &str = "AMMQuery";

/// The arbitrage contract
pub const ARBITRAGE_CONTRACT: &str = "Arbitrage";

/// The treasury contract
pub const TREASURY_CONTRACT: &str = "Treasury";

/// The token the treasury manages
pub const TREASURY_TOKEN: &str = "0xae13d989dac2f0debff460ac112a837c89baa7cd";

/// The treasury's amount parameter, in wei
pub const TREASURY_AMOUNT_WEI: &str = "10000000000000000";

/// The treasury's period parameter, in seconds (30 days)
pub const TREASURY_PERIOD_SECS: &str = "2592000";

/// The treasury's delay parameter, in seconds
pub const TREASURY_DELAY_SECS: &str = "300";

// ----------------
// | Verification |
// ----------------

/// The code format used when submitting sources to the explorer
pub const STANDARD_JSON_CODE_FORMAT: &str = "solidity-standard-json-input";

/// The explorer status string for a successful request
pub const EXPLORER_STATUS_OK: &str = "1";

/// The number of times to poll the explorer for a verification result
pub const VERIFY_POLL_ATTEMPTS: usize = 10;

/// The delay between explorer verification polls
pub const VERIFY_POLL_INTERVAL: Duration = Duration::from_secs(5);
