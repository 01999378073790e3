use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use roster_core::{username_for, USER_COUNT};
use tracing::trace;

use crate::state::StateStore;

/// Draws the highlighted record uniformly from the full `user1..=user100`
/// key space. Deliberately not scoped to the visible page; narrowing the
/// range would be a product decision, not a cleanup.
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn draw(&mut self) -> String {
        username_for(self.rng.gen_range(1..=USER_COUNT))
    }

    /// Registers this selector as the store's refresh reaction.
    pub fn install(mut self, store: &mut StateStore) {
        store.on_refresh(move |counter| {
            let key = self.draw();
            trace!(counter, %key, "refresh drew new selection");
            key
        });
    }
}
