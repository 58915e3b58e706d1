// tether_sim/src/simulation/core/prng.rs

use bevy::prelude::Resource;
use rand_chacha::ChaCha8Rng;

/// A newtype wrapper around `ChaCha8Rng` to make it a Bevy Resource.
/// This is the single deterministic pseudo-random number generator for a run;
/// link jitter and packet loss both draw from it.
#[derive(Resource)]
pub struct SimulationRng(pub ChaCha8Rng);
