//! Adapter that exposes the shot-noise likelihood as an `argmin` problem.
//!
//! The cost is `−log L1(alpha)` evaluated on the jackknife sample set. `+∞`
//! penalties pass through to the solver unchanged; NaN is reported as an
//! error because Nelder–Mead cannot order it.
use argmin::core::{CostFunction, Error};
use ndarray::Array2;

use crate::{
    covariance::types::SampleSet,
    optimization::{
        errors::OptError,
        shot_noise::{
            likelihood::neg_log_l1,
            types::{Alpha, Cost},
        },
    },
};

#[derive(Debug, Clone)]
pub struct ShotNoiseProblem<'a> {
    pub samples: &'a SampleSet,
    pub data_cov: &'a Array2<f64>,
}

impl<'a> ShotNoiseProblem<'a> {
    pub fn new(samples: &'a SampleSet, data_cov: &'a Array2<f64>) -> Self {
        Self { samples, data_cov }
    }
}

impl<'a> CostFunction for ShotNoiseProblem<'a> {
    type Param = Alpha;
    type Output = Cost;

    fn cost(&self, alpha: &Self::Param) -> Result<Self::Output, Error> {
        let Some(&a) = alpha.first() else {
            return Err(OptError::MissingAlphaHat.into());
        };
        let value = neg_log_l1(self.samples, self.data_cov, a)?;
        if value.is_nan() {
            return Err((OptError::NonFiniteCost { value }).into());
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::covariance::types::CovTriple;

    #[test]
    // Purpose
    // -------
    // Estimator failures surface through argmin's error type and convert
    // back to the crate error.
    fn singular_theory_is_reported_as_precision_error() {
        let z = Array2::<f64>::zeros((2, 2));
        let t = CovTriple::new(z.clone(), z.clone(), z.clone()).unwrap();
        let samples = SampleSet::new(t.clone(), vec![t.clone(), t]).unwrap();
        let problem = ShotNoiseProblem::new(&samples, &z);

        let err = problem.cost(&vec![1.0]).unwrap_err();
        assert!(matches!(OptError::from(err), OptError::Precision(_)));
    }
}
