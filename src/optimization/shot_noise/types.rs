//! shot_noise::types — numeric aliases and solver wiring for the alpha fit.
//!
//! The Nelder–Mead solver is driven with a one-element `Vec<f64>` parameter
//! so the simplex arithmetic comes from `argmin-math`'s `vec` backend.
use std::collections::HashMap;

use crate::optimization::shot_noise::simplex::ShotNoiseSimplex;

/// Optimizer parameter: `[alpha]`.
pub type Alpha = Vec<f64>;

pub type Cost = f64;

pub type FnEvalMap = HashMap<String, u64>;

pub type ShotNoiseSolver = ShotNoiseSimplex;

/// Ratio between the two initial simplex vertices.
pub const SIMPLEX_STEP: f64 = 1.05;

/// Second simplex vertex used when the starting alpha is exactly zero.
pub const ZERO_ALPHA_STEP: f64 = 0.00025;
