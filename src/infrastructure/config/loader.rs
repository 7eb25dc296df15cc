use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "bler-sweep.yaml";

/// Optional local overrides, merged over the project configuration
pub const LOCAL_CONFIG_FILE: &str = "bler-sweep.local.yaml";

/// Prefix of environment overrides, nested keys separated by `__`
pub const ENV_PREFIX: &str = "BLER_SWEEP_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid esn0_step_db: {0}. Must be finite and greater than 0")]
    InvalidStep(f64),

    #[error("Invalid target_bler: {0}. Must lie strictly between 0 and 1")]
    InvalidTargetBler(f64),

    #[error("Invalid target_block_errors: {0}. Must be at least 1")]
    InvalidTargetErrors(u64),

    #[error("Invalid max_iterations: {0}. Must be at least 1")]
    InvalidMaxIterations(u32),

    #[error("Invalid min_sum_scale: {0}. Must lie in (0, 1]")]
    InvalidMinSumScale(f64),

    #[error("Invalid parallel_sweeps: {0}. Must be at least 1")]
    InvalidParallelSweeps(usize),

    #[error("Invalid info_bits: {0}. Must be at least 1")]
    InvalidInfoBits(usize),

    #[error("{0} cannot be empty")]
    EmptyList(&'static str),

    #[error(
        "esn0_start_db has {starts} values but {structures} structures are configured (expected 1 or {structures})"
    )]
    StartSnrMismatch { starts: usize, structures: usize },

    #[error("Combination {structure} z={scaling} seed={seed} is configured more than once")]
    DuplicateCombination {
        structure: String,
        scaling: u32,
        seed: u64,
    },

    #[error("Invalid start SNR: {0}. Must be finite")]
    InvalidStartSnr(f64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Build the figment without extracting it.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `path`, or bler-sweep.yaml in the working directory
    /// 3. bler-sweep.local.yaml (optional local overrides)
    /// 4. Environment variables (BLER_SWEEP_* prefix)
    ///
    /// Nested keys are separated by `__`. List-valued settings take the
    /// bracketed form, e.g. `BLER_SWEEP_SWEEP__SEEDS=[1, 2]`; a bare scalar
    /// is rejected at extraction.
    pub fn figment(path: Option<&Path>) -> Figment {
        let primary = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(primary))
            .merge(Yaml::file(LOCAL_CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load and validate configuration.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let config = Self::extract(path)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Merge every source without validating, for callers that apply further
    /// overrides first.
    ///
    /// An explicitly requested file must exist; the default file is optional.
    pub fn extract(path: Option<&Path>) -> Result<Config> {
        if let Some(path) = path {
            if !path.is_file() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
        }

        Self::figment(path)
            .extract()
            .context("Failed to extract configuration from figment")
    }

    /// Load configuration from a specific file, ignoring local overrides and
    /// the environment
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        // Code selection
        if config.codes.structures.is_empty() {
            return Err(ConfigError::EmptyList("codes.structures"));
        }
        if config.codes.scalings.is_empty() {
            return Err(ConfigError::EmptyList("codes.scalings"));
        }
        if config.codes.info_bits == Some(0) {
            return Err(ConfigError::InvalidInfoBits(0));
        }

        // Decoder
        if config.decoder.max_iterations == 0 {
            return Err(ConfigError::InvalidMaxIterations(
                config.decoder.max_iterations,
            ));
        }
        let scale = config.decoder.min_sum_scale;
        if !(scale > 0.0 && scale <= 1.0) {
            return Err(ConfigError::InvalidMinSumScale(scale));
        }

        // Sweep
        let sweep = &config.sweep;
        if !(sweep.esn0_step_db.is_finite() && sweep.esn0_step_db > 0.0) {
            return Err(ConfigError::InvalidStep(sweep.esn0_step_db));
        }
        if !(sweep.target_bler > 0.0 && sweep.target_bler < 1.0) {
            return Err(ConfigError::InvalidTargetBler(sweep.target_bler));
        }
        if sweep.target_block_errors == 0 {
            return Err(ConfigError::InvalidTargetErrors(sweep.target_block_errors));
        }
        if sweep.seeds.is_empty() {
            return Err(ConfigError::EmptyList("sweep.seeds"));
        }
        if sweep.esn0_start_db.is_empty() {
            return Err(ConfigError::EmptyList("sweep.esn0_start_db"));
        }
        let structures = config.codes.structures.len();
        if sweep.esn0_start_db.len() != 1 && sweep.esn0_start_db.len() != structures {
            return Err(ConfigError::StartSnrMismatch {
                starts: sweep.esn0_start_db.len(),
                structures,
            });
        }
        if let Some(&start) = sweep.esn0_start_db.iter().find(|s| !s.is_finite()) {
            return Err(ConfigError::InvalidStartSnr(start));
        }

        // Every combination owns one result file
        let mut seen = HashSet::new();
        for structure in &config.codes.structures {
            for &scaling in &config.codes.scalings {
                for &seed in &sweep.seeds {
                    if !seen.insert((structure.as_str(), scaling, seed)) {
                        return Err(ConfigError::DuplicateCombination {
                            structure: structure.clone(),
                            scaling,
                            seed,
                        });
                    }
                }
            }
        }

        // Execution
        if config.execution.parallel_sweeps == 0 {
            return Err(ConfigError::InvalidParallelSweeps(0));
        }

        // Logging
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(
                config.logging.rotation.clone(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::config::Modulation;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn yaml_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.codes.structures, vec!["qc-r12"]);
        assert_eq!(config.decoder.max_iterations, 20);
        assert_eq!(config.sweep.target_block_errors, 50);
        assert_eq!(config.execution.parallel_sweeps, 1);
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
codes:
  structures: [qc-r12, repetition]
  scalings: [8]
  info_bits: 24
decoder:
  max_iterations: 12
sweep:
  target_block_errors: 20
  target_bler: 0.05
  esn0_start_db: [0.0, -4.0]
  esn0_step_db: 0.5
  seeds: [1, 2, 3]
modulation: qpsk
logging:
  level: debug
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.codes.structures, vec!["qc-r12", "repetition"]);
        assert_eq!(config.codes.info_bits, Some(24));
        assert_eq!(config.decoder.max_iterations, 12);
        assert!((config.decoder.min_sum_scale - 0.75).abs() < f64::EPSILON);
        assert_eq!(config.sweep.seeds, vec![1, 2, 3]);
        assert_eq!(config.modulation, Modulation::Qpsk);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_step() {
        for step in [0.0, -0.5, f64::INFINITY, f64::NAN] {
            let mut config = Config::default();
            config.sweep.esn0_step_db = step;
            assert!(matches!(
                ConfigLoader::validate(&config),
                Err(ConfigError::InvalidStep(_))
            ));
        }
    }

    #[test]
    fn test_validate_target_bler() {
        for target in [0.0, 1.0, 1.5] {
            let mut config = Config::default();
            config.sweep.target_bler = target;
            assert!(matches!(
                ConfigLoader::validate(&config),
                Err(ConfigError::InvalidTargetBler(_))
            ));
        }
    }

    #[test]
    fn test_validate_zero_target_errors() {
        let mut config = Config::default();
        config.sweep.target_block_errors = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidTargetErrors(0))
        ));
    }

    #[test]
    fn test_validate_decoder() {
        let mut config = Config::default();
        config.decoder.max_iterations = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxIterations(0))
        ));

        let mut config = Config::default();
        config.decoder.min_sum_scale = 1.2;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMinSumScale(_))
        ));
    }

    #[test]
    fn test_validate_empty_lists() {
        let mut config = Config::default();
        config.sweep.seeds.clear();
        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::EmptyList(name) => assert_eq!(name, "sweep.seeds"),
            other => panic!("Expected EmptyList error, got {other}"),
        }
    }

    #[test]
    fn test_validate_start_snr_count() {
        let mut config = Config::default();
        config.codes.structures = vec!["qc-r12".into(), "qc-r23".into(), "repetition".into()];
        config.sweep.esn0_start_db = vec![0.0, 1.0];
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::StartSnrMismatch {
                starts: 2,
                structures: 3
            })
        ));

        config.sweep.esn0_start_db = vec![0.0];
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_duplicate_structure() {
        let mut config = Config::default();
        config.codes.structures = vec!["repetition".into(), "repetition".into()];
        config.codes.scalings = vec![3];
        config.sweep.esn0_start_db = vec![-6.0, 2.0];
        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::DuplicateCombination {
                structure,
                scaling,
                seed,
            } => {
                assert_eq!(structure, "repetition");
                assert_eq!(scaling, 3);
                assert_eq!(seed, 1);
            }
            other => panic!("Expected DuplicateCombination error, got {other}"),
        }
    }

    #[test]
    fn test_validate_repeated_seed_or_scaling() {
        let mut config = Config::default();
        config.sweep.seeds = vec![1, 2, 1];
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::DuplicateCombination { seed: 1, .. })
        ));

        let mut config = Config::default();
        config.codes.scalings = vec![16, 16];
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::DuplicateCombination { scaling: 16, .. })
        ));
    }

    #[test]
    fn test_validate_zero_parallel_sweeps() {
        let mut config = Config::default();
        config.execution.parallel_sweeps = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidParallelSweeps(0))
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "invalid"),
            _ => panic!("Expected InvalidLogLevel error"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogFormat(format) => assert_eq!(format, "xml"),
            _ => panic!("Expected InvalidLogFormat error"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let file = yaml_file("sweep:\n  target_bler: 0.1\n  seeds: [9]\n");
        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert!((config.sweep.target_bler - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.sweep.seeds, vec![9]);
        assert_eq!(config.codes.scalings, vec![16, 32]);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let file = yaml_file("sweep:\n  target_bler: 2.0\n");
        assert!(ConfigLoader::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = ConfigLoader::load(Some(Path::new("/nonexistent/bler-sweep.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_env_override() {
        let file = yaml_file("sweep:\n  target_block_errors: 10\n  target_bler: 0.2\n");
        temp_env::with_vars(
            [
                ("BLER_SWEEP_SWEEP__TARGET_BLER", Some("0.05")),
                ("BLER_SWEEP_LOGGING__LEVEL", Some("debug")),
            ],
            || {
                let config = ConfigLoader::load(Some(file.path())).unwrap();
                assert_eq!(config.sweep.target_block_errors, 10, "File value persists");
                assert!((config.sweep.target_bler - 0.05).abs() < f64::EPSILON);
                assert_eq!(config.logging.level, "debug");
            },
        );
    }

    #[test]
    fn test_env_override_lists_use_brackets() {
        temp_env::with_vars(
            [
                ("BLER_SWEEP_SWEEP__ESN0_START_DB", Some("[-1.5]")),
                ("BLER_SWEEP_SWEEP__SEEDS", Some("[3, 4]")),
                ("BLER_SWEEP_CODES__STRUCTURES", Some(r#"["qc-r12", "repetition"]"#)),
                ("BLER_SWEEP_CODES__SCALINGS", Some("[8]")),
            ],
            || {
                let config = ConfigLoader::load(None).unwrap();
                assert_eq!(config.sweep.esn0_start_db, vec![-1.5]);
                assert_eq!(config.sweep.seeds, vec![3, 4]);
                assert_eq!(config.codes.structures, vec!["qc-r12", "repetition"]);
                assert_eq!(config.codes.scalings, vec![8]);
            },
        );
    }

    #[test]
    fn test_env_override_bare_scalar_for_list_fails() {
        temp_env::with_var("BLER_SWEEP_SWEEP__ESN0_START_DB", Some("-1.5"), || {
            assert!(ConfigLoader::extract(None).is_err());
        });
    }

    #[test]
    fn test_hierarchical_merging() {
        let base_file = yaml_file("sweep:\n  target_block_errors: 5\nlogging:\n  level: info\n  format: json\n");
        let override_file = yaml_file("sweep:\n  target_block_errors: 15\nlogging:\n  level: debug\n");

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.sweep.target_block_errors, 15, "Override should win");
        assert_eq!(
            config.logging.level, "debug",
            "Override should win for nested fields"
        );
        assert_eq!(
            config.logging.format, "json",
            "Base value should persist when not overridden"
        );
    }
}
