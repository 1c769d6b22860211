//! Phase resolution.
//!
//! The phase is never stored. It is recomputed from four remote values in a
//! fixed priority order:
//!
//! ```text
//! !deployed                   → NOT_DEPLOYED
//! !isSetup()                  → SETUP
//! height < revealBlock()      → COMMIT
//! adminSecret() == 0          → REVEAL
//! otherwise                   → MINT
//! ```

use alloy::primitives::U256;

use crate::config::schema::DeploymentConfig;
use crate::error::MintResult;
use crate::game::gateway::MintGateway;
use crate::game::types::{GamePhase, PhaseInputs};

/// Pure phase function over already-read values.
pub fn resolve_phase(inputs: &PhaseInputs) -> GamePhase {
    if !inputs.deployed {
        GamePhase::NotDeployed
    } else if !inputs.is_setup {
        GamePhase::Setup
    } else if U256::from(inputs.current_block) < inputs.reveal_block {
        GamePhase::Commit
    } else if inputs.admin_secret.is_zero() {
        GamePhase::Reveal
    } else {
        GamePhase::Mint
    }
}

/// Read the phase from the contracts, short-circuiting in priority order.
///
/// Reads stop as soon as a rule matches. Any read failure is returned as
/// is; it never turns into a phase.
pub async fn read_phase(
    deployment: &DeploymentConfig,
    contracts: Option<&dyn MintGateway>,
) -> MintResult<GamePhase> {
    let contracts = match contracts {
        Some(contracts) if deployment.deployed => contracts,
        _ => return Ok(GamePhase::NotDeployed),
    };

    if !contracts.is_setup().await? {
        return Ok(GamePhase::Setup);
    }

    let reveal_block = contracts.reveal_block().await?;
    let current_block = contracts.current_block().await?;
    if U256::from(current_block) < reveal_block {
        return Ok(GamePhase::Commit);
    }

    let admin_secret = contracts.admin_secret().await?;
    Ok(resolve_phase(&PhaseInputs {
        deployed: true,
        is_setup: true,
        reveal_block,
        current_block,
        admin_secret,
    }))
}
