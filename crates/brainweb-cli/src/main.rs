// ─────────────────────────────────────────────────────────────────────
// SCPN Brainweb Phantom — Synthesis CLI
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Brainweb phantom synthesis CLI.
//!
//! # Usage
//!
//! ```bash
//! # Raw phantom -> mMR PET, mu-map, T1, T2 (npz)
//! brainweb-synth synth subject_04.rawb -o subject_04_mmr.npz
//!
//! # Subject archive -> 1 mm MR grid with 5% smoothed PET noise
//! brainweb-synth synth subject_04.npz --target MR --noise 0.05 --seed 1 -o out.npz
//!
//! # List subject archives
//! brainweb-synth list ~/.brainweb
//! ```

use anyhow::Context;
use brainweb_core::io::{list_subjects, load_raw, load_subject_npz, save_volumes_npz, DEFAULT_NPZ_KEY};
use brainweb_core::noise::noise_from_config;
use brainweb_core::synth::{to_pet_mmr, ModalityVolumes, SynthesisOptions};
use brainweb_types::config::{NoiseConfig, OversizePolicy, SynthesisConfig};
use brainweb_types::geometry::CoordinateSystem;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Brainweb phantom synthesis
#[derive(Parser, Debug)]
#[command(name = "brainweb-synth")]
#[command(author, version, about = "Synthetic PET/MR volumes from brainweb phantoms", long_about = None)]
struct Cli {
    /// Logging verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Synthesize PET, mu-map, T1 and T2 volumes from a labeled phantom
    Synth {
        /// Raw `u16` phantom file, or a `.npz` subject archive
        input: PathBuf,

        /// Output `.npz` file
        #[arg(short, long)]
        output: PathBuf,

        /// JSON synthesis config; flags below override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Array name inside an npz input
        #[arg(long, default_value = DEFAULT_NPZ_KEY)]
        key: String,

        /// Target coordinate system: mMR, MR or brainweb
        #[arg(short, long)]
        target: Option<String>,

        /// Skip zero-padding to the target shape
        #[arg(long)]
        no_pad: bool,

        /// Fail instead of cropping when the resampled volume is too large
        #[arg(long)]
        strict: bool,

        /// PET noise fraction
        #[arg(long)]
        noise: Option<f64>,

        /// Noise smoothing width in voxels (1.0 unless set in the config)
        #[arg(long)]
        sigma: Option<f64>,

        /// Noise RNG seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List subject archives in a data directory
    List {
        /// Data directory
        dir: PathBuf,
    },

    /// Print voxel size and shape of each coordinate system
    Grids,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("brainweb-synth v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Synth {
            input,
            output,
            config,
            key,
            target,
            no_pad,
            strict,
            noise,
            sigma,
            seed,
        } => {
            let mut cfg = match config {
                Some(path) => SynthesisConfig::from_file(&path.to_string_lossy())
                    .with_context(|| format!("loading config '{}'", path.display()))?,
                None => SynthesisConfig::default(),
            };
            if let Some(name) = target {
                cfg.target = name.parse::<CoordinateSystem>()?;
            }
            if no_pad {
                cfg.pad = false;
            }
            if strict {
                cfg.oversize = OversizePolicy::Error;
            }
            merge_noise_flags(&mut cfg, noise, sigma, seed);
            cfg.validate()?;
            run_synth(&input, &key, &output, &cfg)?;
        }
        Commands::List { dir } => {
            for path in list_subjects(&dir)
                .with_context(|| format!("listing '{}'", dir.display()))?
            {
                println!("{}", path.display());
            }
        }
        Commands::Grids => {
            for cs in CoordinateSystem::ALL {
                println!(
                    "{:<9} resolution {:?} mm  shape {:?}",
                    cs.name(),
                    cs.resolution(),
                    cs.shape()
                );
            }
        }
    }

    Ok(())
}

/// Overlay `--noise`, `--sigma` and `--seed` onto the config's noise
/// settings field by field. Flags only touch the fields they name; a
/// `--sigma` or `--seed` without any noise fraction is ignored.
fn merge_noise_flags(cfg: &mut SynthesisConfig, fraction: Option<f64>, sigma: Option<f64>, seed: Option<u64>) {
    let base = match (cfg.noise.take(), fraction) {
        (Some(existing), _) => existing,
        (None, Some(fraction)) => NoiseConfig {
            fraction,
            sigma: 1.0,
            seed: None,
        },
        (None, None) => return,
    };
    cfg.noise = Some(NoiseConfig {
        fraction: fraction.unwrap_or(base.fraction),
        sigma: sigma.unwrap_or(base.sigma),
        seed: seed.or(base.seed),
    });
}

fn run_synth(input: &Path, key: &str, output: &Path, cfg: &SynthesisConfig) -> anyhow::Result<()> {
    let is_npz = input.extension().is_some_and(|ext| ext == "npz");
    let labels = if is_npz {
        load_subject_npz(input, key)
    } else {
        load_raw(input)
    }
    .with_context(|| format!("reading phantom '{}'", input.display()))?;
    info!("Loaded {} {:?}", input.display(), labels.dim());

    let mut volumes: ModalityVolumes<f32> = to_pet_mmr(&labels, &SynthesisOptions::from(cfg))?;
    if let Some(noise_cfg) = &cfg.noise {
        info!("PET noise {:.1}% (sigma {})", noise_cfg.fraction * 100.0, noise_cfg.sigma);
        volumes.pet = noise_from_config(&volumes.pet, noise_cfg)?;
    }

    save_volumes_npz(output, &volumes)
        .with_context(|| format!("writing '{}'", output.display()))?;
    info!("Wrote {} -> {}", cfg.target, output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_file_noise() -> SynthesisConfig {
        SynthesisConfig {
            noise: Some(NoiseConfig {
                fraction: 0.05,
                sigma: 2.5,
                seed: Some(42),
            }),
            ..SynthesisConfig::default()
        }
    }

    #[test]
    fn test_noise_flag_keeps_file_seed_and_sigma() {
        let mut cfg = with_file_noise();
        merge_noise_flags(&mut cfg, Some(0.2), None, None);
        let noise = cfg.noise.unwrap();
        assert_eq!(noise.fraction, 0.2);
        assert_eq!(noise.sigma, 2.5);
        assert_eq!(noise.seed, Some(42));
    }

    #[test]
    fn test_flags_override_named_fields() {
        let mut cfg = with_file_noise();
        merge_noise_flags(&mut cfg, None, Some(0.5), Some(7));
        let noise = cfg.noise.unwrap();
        assert_eq!(noise.fraction, 0.05);
        assert_eq!(noise.sigma, 0.5);
        assert_eq!(noise.seed, Some(7));
    }

    #[test]
    fn test_noise_flag_without_config_uses_defaults() {
        let mut cfg = SynthesisConfig::default();
        merge_noise_flags(&mut cfg, Some(0.1), None, Some(3));
        let noise = cfg.noise.unwrap();
        assert_eq!(noise.fraction, 0.1);
        assert_eq!(noise.sigma, 1.0);
        assert_eq!(noise.seed, Some(3));
    }

    #[test]
    fn test_no_noise_flags_leave_config_alone() {
        let mut cfg = SynthesisConfig::default();
        merge_noise_flags(&mut cfg, None, Some(2.0), Some(1));
        assert!(cfg.noise.is_none());

        let mut cfg = with_file_noise();
        merge_noise_flags(&mut cfg, None, None, None);
        assert_eq!(cfg.noise, with_file_noise().noise);
    }
}
