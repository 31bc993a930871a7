//! Monte Carlo tournament simulation
//!
//! Plays the bracket forward many times under a win-probability model and
//! reports how often each team reaches each stage.
//!
//! # Models
//!
//! - `seed`: historical first-round rates by seed pairing
//! - `rating`: team ratings (Elo, Barthag or AdjEM); falls back to seed
//!   when either rating is missing
//! - `blend`: `alpha * rating + (1 - alpha) * seed`

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::selection::SelectionSet;
use crate::team::{round_one_games, Team};
use crate::topology::{game_count, NUM_ROUNDS};

/// Team ratings keyed by team
pub type Ratings = FxHashMap<Team, f64>;

/// Simulations per parallel work unit (each unit gets its own RNG stream)
const CHUNK_SIZE: usize = 1_000;

/// Stages tracked for advancement: round-2 entry through champion
const STAGES: usize = 5;

/// Historical win rate of the better seed in each first-round pairing
const SEED_TABLE: [((u8, u8), f64); 8] = [
    ((1, 16), 0.99),
    ((2, 15), 0.94),
    ((3, 14), 0.86),
    ((4, 13), 0.79),
    ((5, 12), 0.64),
    ((6, 11), 0.62),
    ((7, 10), 0.60),
    ((8, 9), 0.52),
];

/// Better-seed win rate for pairings outside the table
const DEFAULT_SEED_EDGE: f64 = 0.55;

const DEFAULT_ELO_SCALE: f64 = 400.0;
const DEFAULT_ADJEM_SCALE: f64 = 1.0;
const FALLBACK_ADJEM_SCALE: f64 = 25.0;
const DEFAULT_BLEND_ALPHA: f64 = 0.7;

/// Which probability model to use
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    #[default]
    Seed,
    Rating,
    Blend,
}

/// How ratings are interpreted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingKind {
    #[default]
    #[serde(rename = "elo")]
    Elo,
    #[serde(rename = "barthag", alias = "pythag", alias = "pyth")]
    Barthag,
    #[serde(rename = "adjem", alias = "adjEM")]
    AdjEm,
}

/// Win-probability model
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinModel {
    #[serde(rename = "type", default)]
    pub kind: ModelKind,
    #[serde(default)]
    pub rating_type: RatingKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
}

impl WinModel {
    /// Seed-table model
    pub fn seed() -> Self {
        Self::default()
    }

    /// Rating model of the given kind
    pub fn rating(rating_type: RatingKind) -> Self {
        Self {
            kind: ModelKind::Rating,
            rating_type,
            ..Default::default()
        }
    }

    /// Blend of rating and seed models
    pub fn blend(rating_type: RatingKind, alpha: f64) -> Self {
        Self {
            kind: ModelKind::Blend,
            rating_type,
            alpha: Some(alpha),
            ..Default::default()
        }
    }

    /// Set the rating scale
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Probability that `a` beats `b`
    pub fn probability(&self, a: Team, b: Team, ratings: &Ratings) -> f64 {
        let by_seed = seed_probability(a.seed, b.seed);
        match self.kind {
            ModelKind::Seed => by_seed,
            ModelKind::Rating => self.rating_probability(a, b, ratings).unwrap_or(by_seed),
            ModelKind::Blend => match self.rating_probability(a, b, ratings) {
                Some(by_rating) => {
                    // Zero means unset, like a missing alpha
                    let alpha = self
                        .alpha
                        .filter(|a| *a != 0.0)
                        .unwrap_or(DEFAULT_BLEND_ALPHA);
                    alpha * by_rating + (1.0 - alpha) * by_seed
                }
                None => by_seed,
            },
        }
    }

    fn rating_probability(&self, a: Team, b: Team, ratings: &Ratings) -> Option<f64> {
        let ra = *ratings.get(&a)?;
        let rb = *ratings.get(&b)?;
        let p = match self.rating_type {
            RatingKind::Elo => {
                let scale = self.scale.filter(|s| *s > 0.0).unwrap_or(DEFAULT_ELO_SCALE);
                1.0 / (1.0 + 10f64.powf(-(ra - rb) / scale))
            }
            RatingKind::Barthag => {
                let pa = ra.clamp(1e-6, 1.0 - 1e-6);
                let pb = rb.clamp(1e-6, 1.0 - 1e-6);
                logistic((pa / (1.0 - pa)).ln() - (pb / (1.0 - pb)).ln())
            }
            RatingKind::AdjEm => {
                let k = match self.scale {
                    Some(s) if s > 0.0 => s,
                    Some(_) => FALLBACK_ADJEM_SCALE,
                    None => DEFAULT_ADJEM_SCALE,
                };
                logistic((ra - rb) / k)
            }
        };
        Some(p)
    }
}

/// Probability that seed `a` beats seed `b` under the seed table
pub fn seed_probability(a: u8, b: u8) -> f64 {
    if a == b {
        return 0.5;
    }
    let (lo, hi) = (a.min(b), a.max(b));
    let base = SEED_TABLE
        .iter()
        .find(|(pair, _)| *pair == (lo, hi))
        .map_or(DEFAULT_SEED_EDGE, |(_, p)| *p);
    if a < b {
        base
    } else {
        1.0 - base
    }
}

/// Numerically stable logistic function
fn logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Win probabilities for one round-1 game
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupProbability {
    pub region: char,
    pub team_a: Team,
    pub seed_a: u8,
    pub team_b: Team,
    pub seed_b: u8,
    pub p_a: f64,
    pub p_b: f64,
}

/// Share of simulations in which a team reached each stage
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Advancement {
    /// Won round 1
    pub r32: f64,
    /// Reached the Sweet 16
    pub s16: f64,
    /// Reached the Elite 8
    pub e8: f64,
    /// Reached the Final Four
    pub ff: f64,
    /// Won the title
    pub champ: f64,
}

/// Simulation parameters
#[derive(Clone, Debug, Default)]
pub struct SimulationConfig {
    pub sims: usize,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
    pub model: WinModel,
    pub ratings: Ratings,
}

/// Simulation output
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    pub round1_probs: Vec<MatchupProbability>,
    pub champion_probs: BTreeMap<String, f64>,
    pub advancement: BTreeMap<String, Advancement>,
    pub sims: usize,
    pub used_model: WinModel,
}

/// Round-1 win probabilities under a model
pub fn round_one_probabilities(model: &WinModel, ratings: &Ratings) -> Vec<MatchupProbability> {
    round_one_games()
        .into_iter()
        .map(|[a, b]| {
            let p = model.probability(a, b, ratings);
            MatchupProbability {
                region: a.region.code(),
                team_a: a,
                seed_a: a.seed,
                team_b: b,
                seed_b: b.seed,
                p_a: round4(p),
                p_b: round4(1.0 - p),
            }
        })
        .collect()
}

/// Play the whole bracket once
pub fn simulate_once<R: Rng>(model: &WinModel, ratings: &Ratings, rng: &mut R) -> SelectionSet {
    play_bracket(model, ratings, |p| rng.gen::<f64>() < p)
}

/// Bracket where the favourite wins every game
pub fn most_likely_bracket(model: &WinModel, ratings: &Ratings) -> SelectionSet {
    play_bracket(model, ratings, |p| p >= 0.5)
}

/// Fill a bracket round by round; `first_wins` decides each game from the
/// probability that the first option wins
fn play_bracket(
    model: &WinModel,
    ratings: &Ratings,
    mut first_wins: impl FnMut(f64) -> bool,
) -> SelectionSet {
    let mut selection = SelectionSet::new();
    for round in 1..=NUM_ROUNDS as u8 {
        for index in 0..game_count(round) {
            let winner = match selection.options(round, index).as_slice() {
                [a, b] => {
                    if first_wins(model.probability(*a, *b, ratings)) {
                        *a
                    } else {
                        *b
                    }
                }
                [only] => *only,
                _ => continue,
            };
            selection.assign(round, index, Some(winner));
        }
    }
    selection
}

/// Stage counts per team
#[derive(Default)]
struct StageCounts {
    counts: FxHashMap<Team, [u32; STAGES]>,
}

impl StageCounts {
    fn record(&mut self, bracket: &SelectionSet) {
        // Winners of rounds 1-4 advance to the next stage; the final's
        // winner is the champion
        for (stage, round) in [1u8, 2, 3, 4, 6].into_iter().enumerate() {
            for team in bracket.round(round).iter().flatten() {
                self.counts.entry(*team).or_default()[stage] += 1;
            }
        }
    }

    fn merge(mut self, other: Self) -> Self {
        for (team, stages) in other.counts {
            let entry = self.counts.entry(team).or_default();
            for (total, n) in entry.iter_mut().zip(stages) {
                *total += n;
            }
        }
        self
    }
}

/// Run a Monte Carlo simulation
///
/// Work is split into fixed-size chunks, each with its own RNG seeded from
/// the base seed, so results do not depend on the thread count.
pub fn simulate(config: &SimulationConfig) -> SimulationReport {
    let base_seed = config.seed.unwrap_or_else(rand::random);
    let chunks = config.sims.div_ceil(CHUNK_SIZE);

    tracing::debug!(
        "Simulating {} brackets in {} chunks (seed {})",
        config.sims,
        chunks,
        base_seed
    );

    let totals = (0..chunks)
        .into_par_iter()
        .map(|chunk| {
            let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(chunk as u64));
            let runs = CHUNK_SIZE.min(config.sims - chunk * CHUNK_SIZE);
            let mut counts = StageCounts::default();
            for _ in 0..runs {
                counts.record(&simulate_once(&config.model, &config.ratings, &mut rng));
            }
            counts
        })
        .reduce(StageCounts::default, StageCounts::merge);

    let mut advancement = BTreeMap::new();
    let mut champion_probs = BTreeMap::new();
    if config.sims > 0 {
        let n = config.sims as f64;
        for (team, [r32, s16, e8, ff, champ]) in totals.counts {
            let share = |c: u32| round4(c as f64 / n);
            if champ > 0 {
                champion_probs.insert(team.to_string(), share(champ));
            }
            advancement.insert(
                team.to_string(),
                Advancement {
                    r32: share(r32),
                    s16: share(s16),
                    e8: share(e8),
                    ff: share(ff),
                    champ: share(champ),
                },
            );
        }
    }

    SimulationReport {
        round1_probs: round_one_probabilities(&config.model, &config.ratings),
        champion_probs,
        advancement,
        sims: config.sims,
        used_model: config.model,
    }
}
