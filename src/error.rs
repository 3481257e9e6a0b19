/*
 * Error Module
 *
 * Configuration errors surfaced by the steering engine. Numeric edge cases
 * (zero vectors, zero divisors) never become errors; they resolve to zero
 * contributions inside the force math.
 */

use thiserror::Error;

use crate::behavior::BehaviorKind;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SwarmError {
    #[error("behavior {0} is not present in the pipeline")]
    BehaviorNotFound(BehaviorKind),

    #[error("behavior {0} is already present in the pipeline")]
    DuplicateBehavior(BehaviorKind),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type SwarmResult<T> = Result<T, SwarmError>;
