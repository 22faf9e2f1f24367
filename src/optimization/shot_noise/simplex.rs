//! shot_noise::simplex — Nelder–Mead with a parameter-width stopping rule.
//!
//! Purpose
//! -------
//! Argmin's bundled Nelder–Mead only stops on the spread of the simplex
//! costs. On a flat likelihood that spread collapses long before the
//! vertices do, leaving alpha off by the simplex width. [`ShotNoiseSimplex`]
//! runs the same reflect / expand / contract / shrink moves as an argmin
//! [`Solver`] and stops only when both
//!
//! - the sample standard deviation of the vertex costs is below
//!   `sd_tolerance`, and
//! - every vertex lies within `alpha_tolerance` of the best vertex.
//!
//! Conventions
//! -----------
//! - Coefficients: reflection 1, expansion 2, contraction 0.5, shrink 0.5.
//! - Vertex arithmetic uses `argmin-math`'s `vec` backend.
//! - Cost errors propagate out of `init` and `next_iter` unchanged.
use argmin::{
    core::{
        ArgminError, CostFunction, Error, IterState, KV, Problem, Solver, TerminationReason,
        TerminationStatus,
    },
    kv,
};
use argmin_math::{ArgminAdd, ArgminMul, ArgminSub};

use crate::optimization::shot_noise::types::{Alpha, Cost};

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

type SimplexState = IterState<Alpha, (), (), (), (), Cost>;

/// Nelder–Mead over [`Alpha`] vertices.
#[derive(Debug, Clone)]
pub struct ShotNoiseSimplex {
    vertices: Vec<(Alpha, Cost)>,
    sd_tolerance: f64,
    alpha_tolerance: f64,
}

impl ShotNoiseSimplex {
    /// Solver over `simplex`. Costs are evaluated in `init`.
    pub fn new(simplex: Vec<Alpha>, sd_tolerance: f64, alpha_tolerance: f64) -> Self {
        let vertices = simplex.into_iter().map(|v| (v, f64::INFINITY)).collect();
        Self { vertices, sd_tolerance, alpha_tolerance }
    }

    /// Current vertices with their costs, best first after `init`.
    pub fn vertices(&self) -> &[(Alpha, Cost)] {
        &self.vertices
    }

    fn sort(&mut self) {
        self.vertices.sort_by(|a, b| a.1.total_cmp(&b.1));
    }

    /// Sample standard deviation of the vertex costs.
    fn cost_spread(&self) -> f64 {
        let n = self.vertices.len() as f64;
        let mean = self.vertices.iter().map(|(_, c)| c).sum::<f64>() / n;
        let ss: f64 = self.vertices.iter().map(|(_, c)| (c - mean).powi(2)).sum();
        (ss / (n - 1.0)).sqrt()
    }

    /// Largest coordinate distance from any vertex to the best one.
    fn alpha_width(&self) -> f64 {
        let Some((best, _)) = self.vertices.first() else {
            return 0.0;
        };
        self.vertices
            .iter()
            .flat_map(|(v, _)| v.iter().zip(best).map(|(x, b)| (x - b).abs()))
            .fold(0.0, f64::max)
    }

    /// Centroid of every vertex but the worst.
    fn centroid(&self) -> Alpha {
        let kept = &self.vertices[..self.vertices.len() - 1];
        let scale = 1.0 / kept.len() as f64;
        let mut sum = kept[0].0.clone();
        for (v, _) in &kept[1..] {
            sum = sum.add(v);
        }
        sum.mul(&scale)
    }

    /// `centroid + t·(centroid − worst)`.
    fn along(centroid: &Alpha, worst: &Alpha, t: f64) -> Alpha {
        centroid.add(&centroid.sub(worst).mul(&t))
    }

    fn replace_worst(&mut self, vertex: (Alpha, Cost)) {
        if let Some(last) = self.vertices.last_mut() {
            *last = vertex;
        }
    }
}

impl<O> Solver<O, SimplexState> for ShotNoiseSimplex
where
    O: CostFunction<Param = Alpha, Output = Cost>,
{
    const NAME: &'static str = "Nelder-Mead (alpha width)";

    fn init(
        &mut self, problem: &mut Problem<O>, state: SimplexState,
    ) -> Result<(SimplexState, Option<KV>), Error> {
        if self.vertices.len() < 2 {
            return Err(ArgminError::InvalidParameter {
                text: "Nelder-Mead needs at least two simplex vertices.".to_string(),
            }
            .into());
        }
        for vertex in &mut self.vertices {
            vertex.1 = problem.cost(&vertex.0)?;
        }
        self.sort();
        let (best, cost) = self.vertices[0].clone();
        Ok((state.param(best).cost(cost), None))
    }

    fn next_iter(
        &mut self, problem: &mut Problem<O>, state: SimplexState,
    ) -> Result<(SimplexState, Option<KV>), Error> {
        let n = self.vertices.len();
        let best_cost = self.vertices[0].1;
        let second_worst_cost = self.vertices[n - 2].1;
        let (worst, worst_cost) = self.vertices[n - 1].clone();

        let centroid = self.centroid();
        let reflected = Self::along(&centroid, &worst, REFLECT);
        let reflected_cost = problem.cost(&reflected)?;

        let action = if reflected_cost < best_cost {
            let expanded = Self::along(&centroid, &worst, REFLECT * EXPAND);
            let expanded_cost = problem.cost(&expanded)?;
            if expanded_cost < reflected_cost {
                self.replace_worst((expanded, expanded_cost));
                "expansion"
            } else {
                self.replace_worst((reflected, reflected_cost));
                "reflection"
            }
        } else if reflected_cost < second_worst_cost {
            self.replace_worst((reflected, reflected_cost));
            "reflection"
        } else {
            let contracted = if reflected_cost < worst_cost {
                let outside = Self::along(&centroid, &worst, REFLECT * CONTRACT);
                let cost = problem.cost(&outside)?;
                (cost <= reflected_cost).then_some((outside, cost))
            } else {
                let inside = Self::along(&centroid, &worst, -CONTRACT);
                let cost = problem.cost(&inside)?;
                (cost < worst_cost).then_some((inside, cost))
            };
            match contracted {
                Some(vertex) => {
                    self.replace_worst(vertex);
                    "contraction"
                }
                None => {
                    let best = self.vertices[0].0.clone();
                    for vertex in self.vertices.iter_mut().skip(1) {
                        let moved = best.add(&vertex.0.sub(&best).mul(&SHRINK));
                        let cost = problem.cost(&moved)?;
                        *vertex = (moved, cost);
                    }
                    "shrink"
                }
            }
        };

        self.sort();
        let (best, cost) = self.vertices[0].clone();
        Ok((state.param(best).cost(cost), Some(kv!("action" => action;))))
    }

    fn terminate(&mut self, _state: &SimplexState) -> TerminationStatus {
        if self.cost_spread() < self.sd_tolerance && self.alpha_width() <= self.alpha_tolerance {
            return TerminationStatus::Terminated(TerminationReason::SolverConverged);
        }
        TerminationStatus::NotTerminated
    }
}
