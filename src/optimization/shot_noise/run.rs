//! Execution helper that runs Nelder–Mead on the shot-noise problem and
//! returns a crate-friendly [`ShotNoiseFit`].
use argmin::core::{Executor, State};

use crate::optimization::{
    errors::OptResult,
    shot_noise::{
        adapter::ShotNoiseProblem,
        traits::{ShotNoiseFit, ShotNoiseOptions},
        types::ShotNoiseSolver,
    },
};

/// Run `solver` on `problem` under the iteration cap of `opts`.
///
/// With the `obs_slog` feature and `opts.verbose`, argmin's terminal
/// observer prints every iteration.
///
/// # Errors
/// - Errors raised inside the cost function, unwrapped back to `OptError`.
/// - Validation errors from [`ShotNoiseFit::new`].
pub fn run_nelder_mead(
    problem: ShotNoiseProblem<'_>, solver: ShotNoiseSolver, opts: &ShotNoiseOptions,
) -> OptResult<ShotNoiseFit> {
    let mut optimizer = Executor::new(problem, solver);
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    let max_iter = opts.max_iter as u64;
    optimizer = optimizer.configure(|state| state.max_iters(max_iter));

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let fn_evals = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    ShotNoiseFit::new(
        result.take_best_param(),
        result.get_best_cost(),
        termination,
        iterations,
        fn_evals,
    )
}
