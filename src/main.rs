//! rescaled-cov CLI

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rescaled_cov::{
    optimization::shot_noise::ShotNoiseOptions,
    pipeline::{
        LegendreConfig, MixJackknifeConfig, run_legendre_from_files, run_mix_jackknife_from_files,
    },
    report::LogReporter,
};

#[derive(Parser)]
#[command(name = "rescaled-cov")]
#[command(about = "Rescale Legendre covariance matrices and debias their precision matrices")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Single-field Legendre covariance with a fixed shot-noise rescaling
    Legendre {
        /// Directory containing CovMatricesAll/
        cov_dir: PathBuf,
        /// Number of radial bins
        n_r_bins: usize,
        /// Maximum Legendre multipole
        max_l: usize,
        /// Number of subsamples
        n_subsamples: usize,
        /// Output directory
        output_dir: PathBuf,
        /// Shot-noise rescaling parameter
        #[arg(default_value = "1.0")]
        shot_noise_rescaling: f64,
        /// Leading radial bins to skip
        #[arg(default_value = "0")]
        skip_r_bins: usize,
        /// Trailing multipoles to skip
        #[arg(default_value = "0")]
        skip_l: usize,
    },

    /// Mixed Legendre jackknife covariance with a fitted shot-noise rescaling
    LegendreMixJackknife {
        /// Jackknife correlation function estimates
        xi_jackknife_file: PathBuf,
        /// Directory containing the jackknife weights and mu bin Legendre factors
        weights_dir: PathBuf,
        /// Directory containing CovMatricesAll/ and CovMatricesJack/
        cov_dir: PathBuf,
        /// Number of mu bins
        n_mu_bins: usize,
        /// Maximum (even) Legendre multipole
        max_l: usize,
        /// Number of subsamples
        n_subsamples: usize,
        /// Output directory
        output_dir: PathBuf,
        /// Leading radial bins to skip
        #[arg(default_value = "0")]
        skip_r_bins: usize,
        /// Trailing multipoles to skip
        #[arg(default_value = "0")]
        skip_l: usize,
        /// Maximum Nelder-Mead iterations for the shot-noise fit
        #[arg(long, default_value = "200")]
        max_iter: usize,
        /// Simplex cost standard-deviation tolerance for the shot-noise fit
        #[arg(long, default_value = "0.0001")]
        sd_tolerance: f64,
        /// Simplex alpha-width tolerance for the shot-noise fit
        #[arg(long, default_value = "0.0001")]
        alpha_tolerance: f64,
        /// Starting shot-noise rescaling for the fit
        #[arg(long, default_value = "1.0")]
        alpha0: f64,
        /// Attach the solver's iteration observer (requires the `obs_slog` feature)
        #[arg(long)]
        verbose_fit: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let reporter = LogReporter;
    match cli.command {
        Commands::Legendre {
            cov_dir,
            n_r_bins,
            max_l,
            n_subsamples,
            output_dir,
            shot_noise_rescaling,
            skip_r_bins,
            skip_l,
        } => {
            let config = LegendreConfig::new(
                cov_dir,
                n_r_bins,
                max_l,
                n_subsamples,
                output_dir,
                shot_noise_rescaling,
                skip_r_bins,
                skip_l,
            )
            .context("invalid legendre arguments")?;
            run_legendre_from_files(&config, &reporter).context("legendre run failed")?;
        }
        Commands::LegendreMixJackknife {
            xi_jackknife_file,
            weights_dir,
            cov_dir,
            n_mu_bins,
            max_l,
            n_subsamples,
            output_dir,
            skip_r_bins,
            skip_l,
            max_iter,
            sd_tolerance,
            alpha_tolerance,
            alpha0,
            verbose_fit,
        } => {
            let shot_noise =
                ShotNoiseOptions::new(alpha0, sd_tolerance, alpha_tolerance, max_iter, verbose_fit)
                    .context("invalid shot-noise fit options")?;
            let config = MixJackknifeConfig::new(
                xi_jackknife_file,
                weights_dir,
                cov_dir,
                n_mu_bins,
                max_l,
                n_subsamples,
                output_dir,
                skip_r_bins,
                skip_l,
                shot_noise,
            )
            .context("invalid legendre-mix-jackknife arguments")?;
            run_mix_jackknife_from_files(&config, &reporter)
                .context("legendre-mix-jackknife run failed")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Fit options belong to the mixed-jackknife subcommand only.
    fn fit_flags_parse_on_mix_jackknife_only() {
        // Arrange
        let mix = [
            "rescaled-cov", "legendre-mix-jackknife", "xi.dat", "w", "cov", "4", "2", "10", "out",
            "--alpha0", "1.2", "--alpha-tolerance", "1e-6",
        ];
        let legendre = ["rescaled-cov", "legendre", "cov", "5", "2", "10", "out", "--max-iter", "5"];

        // Act
        let parsed = Cli::try_parse_from(mix).unwrap();
        let rejected = Cli::try_parse_from(legendre);

        // Assert
        match parsed.command {
            Commands::LegendreMixJackknife { alpha0, alpha_tolerance, max_iter, .. } => {
                assert_eq!(alpha0, 1.2);
                assert_eq!(alpha_tolerance, 1e-6);
                assert_eq!(max_iter, 200);
            }
            Commands::Legendre { .. } => panic!("parsed the wrong subcommand"),
        }
        assert!(rejected.is_err());
    }
}
