use clap::ValueEnum;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which pool/history a pending spin is resolved against.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResolvePolicy {
    /// Read the pool and history as they are when the wheel stops.
    #[default]
    Live,
    /// Read the pool and history as they were when the spin started.
    Snapshot,
}

/// Pool entries not yet in `used`, matched by exact content, in pool order.
pub fn available_prompts<'a>(pool: &'a [String], used: &[String]) -> Vec<&'a str> {
    pool.iter()
        .filter(|p| !used.contains(p))
        .map(String::as_str)
        .collect()
}

pub fn choose_prompt<'a, R: Rng + ?Sized>(available: &[&'a str], rng: &mut R) -> Option<&'a str> {
    available.choose(rng).copied()
}
