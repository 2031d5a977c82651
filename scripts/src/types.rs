//! Type definitions used throughout the scripts

use std::fmt::{self, Display};

use clap::ValueEnum;

use crate::{
    constants::{
        AMM_QUERY_CONTRACT, ARBITRAGE_CONTRACT, TREASURY_AMOUNT_WEI, TREASURY_CONTRACT,
        TREASURY_DELAY_SECS, TREASURY_PERIOD_SECS, TREASURY_TOKEN,
    },
    runner::DeploymentRequest,
};

/// The deployments that ship as fixed scripts
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum FixedScript {
    /// The AMM query contract, no constructor arguments
    AmmQuery,
    /// The arbitrage contract, no constructor arguments
    Arbitrage,
    /// The treasury contract, with its token and schedule parameters
    Treasury,
}

impl FixedScript {
    /// The contract this script deploys
    pub fn contract(&self) -> &'static str {
        match self {
            FixedScript::AmmQuery => AMM_QUERY_CONTRACT,
            FixedScript::Arbitrage => ARBITRAGE_CONTRACT,
            FixedScript::Treasury => TREASURY_CONTRACT,
        }
    }

    /// The constructor arguments this script deploys with
    pub fn constructor_args(&self) -> &'static [&'static str] {
        match self {
            FixedScript::AmmQuery | FixedScript::Arbitrage => &[],
            FixedScript::Treasury => &[
                TREASURY_TOKEN,
                TREASURY_AMOUNT_WEI,
                TREASURY_PERIOD_SECS,
                TREASURY_DELAY_SECS,
            ],
        }
    }

    /// The deployment request this script makes
    pub fn request(&self) -> DeploymentRequest {
        DeploymentRequest::new(self.contract(), self.constructor_args().iter().copied())
    }
}

impl Display for FixedScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixedScript::AmmQuery => write!(f, "amm-query"),
            FixedScript::Arbitrage => write!(f, "arbitrage"),
            FixedScript::Treasury => write!(f, "treasury"),
        }
    }
}
