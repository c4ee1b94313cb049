use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::PuzzleConfig;
use crate::error::{PuzzleError, Result};
use crate::model::{FluidColor, FluidContainer};
use crate::state::PuzzleState;

/// Upper bound on shuffle-and-deal retries before giving up.
pub const MAX_DEAL_ATTEMPTS: usize = 10_000;

/// Every palette color repeated `capacity` times, in color order.
pub fn unit_pool(config: &PuzzleConfig) -> Vec<FluidColor> {
    (0..config.palette_size)
        .flat_map(|id| std::iter::repeat_n(FluidColor::new(id), config.capacity))
        .collect()
}

/// Uniform Fisher-Yates shuffle: walks from the last index down to 1 and swaps
/// with a uniformly chosen index in `0..=i`.
pub fn shuffle_pool<R: Rng + ?Sized>(pool: &mut [FluidColor], rng: &mut R) {
    pool.shuffle(rng);
}

/// Deal `capacity` units per container in sequence order, then append the
/// empty containers.
pub fn deal(config: &PuzzleConfig, pool: &[FluidColor]) -> Result<PuzzleState> {
    let mut containers = pool
        .chunks(config.capacity)
        .map(|chunk| FluidContainer::with_fluids(config.capacity, chunk.to_vec()))
        .collect::<Result<Vec<_>>>()?;
    containers.extend((0..config.extra_empty_containers).map(|_| FluidContainer::new(config.capacity)));
    Ok(PuzzleState::new(containers))
}

/// A deal is valid when no container starts out already complete.
pub fn is_valid_deal(state: &PuzzleState) -> bool {
    state
        .containers()
        .iter()
        .all(|c| c.is_empty() || !c.is_complete())
}

/// Shuffle, deal and retry until no container is born complete.
///
/// Solvability is not checked; only trivially finished containers are rejected.
pub fn generate_layout<R: Rng + ?Sized>(config: &PuzzleConfig, rng: &mut R) -> Result<PuzzleState> {
    generate_layout_within(config, rng, MAX_DEAL_ATTEMPTS)
}

/// Same as [`generate_layout`] with an explicit bound on the number of deals.
pub fn generate_layout_within<R: Rng + ?Sized>(
    config: &PuzzleConfig,
    rng: &mut R,
    max_attempts: usize,
) -> Result<PuzzleState> {
    config.validate()?;
    let mut pool = unit_pool(config);
    for attempt in 1..=max_attempts {
        shuffle_pool(&mut pool, rng);
        let state = deal(config, &pool)?;
        if is_valid_deal(&state) {
            log::debug!("Dealt layout {} after {} attempt(s)", state, attempt);
            return Ok(state);
        }
        log::trace!("Rejected deal {}", state);
    }
    log::warn!("No valid layout after {} deals", max_attempts);
    Err(PuzzleError::GenerationExhausted {
        attempts: max_attempts,
    })
}
