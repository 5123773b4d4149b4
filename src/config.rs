//! Search configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    EXPLORATION, HEURISTIC_WEIGHT, MAX_ROLLOUT_TURNS, N_ITERATIONS, PROB_FOLLOW_ROUTE, PROB_MOVE,
    TERMINAL_SCORE,
};
use crate::error::{Error, Result};

/// Tunables for one search invocation.
///
/// Missing fields in a JSON file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of selection/expansion/rollout/backpropagation rounds.
    pub iterations: usize,

    /// Constant `C` in the exploration term `sqrt(C * ln(N) / n)`.
    pub exploration: f64,

    /// Weight of the route-length differential added to UCB1.
    pub heuristic_weight: f64,

    /// Score magnitude propagated from already-decided nodes.
    pub terminal_score: f64,

    /// Probability a rollout moves the pawn rather than placing a wall.
    pub move_probability: f64,

    /// Probability a rollout move follows the cached shortest route.
    pub route_probability: f64,

    /// Rollout length cap.
    pub max_rollout_turns: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: N_ITERATIONS,
            exploration: EXPLORATION,
            heuristic_weight: HEURISTIC_WEIGHT,
            terminal_score: TERMINAL_SCORE,
            move_probability: PROB_MOVE,
            route_probability: PROB_FOLLOW_ROUTE,
            max_rollout_turns: MAX_ROLLOUT_TURNS,
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn with_iterations(iterations: usize) -> Self {
        Self {
            iterations,
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config {}", path.display()),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(invalid("iterations must be positive"));
        }
        if self.max_rollout_turns == 0 {
            return Err(invalid("max_rollout_turns must be positive"));
        }
        for (name, p) in [
            ("move_probability", self.move_probability),
            ("route_probability", self.route_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(&format!("{name} {p} is outside [0, 1]")));
            }
        }
        for (name, v) in [
            ("exploration", self.exploration),
            ("heuristic_weight", self.heuristic_weight),
            ("terminal_score", self.terminal_score),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(invalid(&format!("{name} {v} must be non-negative and finite")));
            }
        }
        Ok(())
    }
}

fn invalid(message: &str) -> Error {
    Error::InvalidConfiguration {
        message: message.to_string(),
    }
}
