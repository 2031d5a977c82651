//! Scripts for deploying the compiled AMM query, arbitrage and treasury
//! contracts, and for deploying or verifying arbitrary contracts from the
//! same build output.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod deployer;
pub mod errors;
pub mod runner;
pub mod types;
pub mod utils;
pub mod verify;
