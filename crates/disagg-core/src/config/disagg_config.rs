//! Top-level disaggregation configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{BinningConfig, CalculationConfig, ExecutionConfig, ExecutionMode};
use crate::errors::ConfigError;
use crate::types::PmfKind;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_cli_overrides`)
/// 2. Environment variables (`DISAGG_*`)
/// 3. Project config (`disagg.toml` in the job root)
/// 4. User config (`~/.disagg/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DisaggConfig {
    pub binning: BinningConfig,
    pub calculation: CalculationConfig,
    pub execution: ExecutionConfig,
}

/// Override arguments that take precedence over every other layer.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub mode: Option<ExecutionMode>,
    pub threads: Option<usize>,
    pub concurrent_tasks: Option<usize>,
    pub poes_disagg: Option<Vec<f64>>,
}

impl DisaggConfig {
    /// Load configuration with layered resolution and validate the result.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        let project_config_path = root.join("disagg.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (no layering, validated).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: DisaggConfig = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &DisaggConfig) -> Result<(), ConfigError> {
        let positive = [
            ("binning.mag_bin_width", config.binning.mag_bin_width),
            ("binning.distance_bin_width", config.binning.distance_bin_width),
            ("binning.coordinate_bin_width", config.binning.coordinate_bin_width),
            ("calculation.truncation_level", config.calculation.truncation_level),
            ("calculation.maximum_distance", config.calculation.maximum_distance),
            ("calculation.investigation_time", config.calculation.investigation_time),
            ("execution.sanity_tolerance", config.execution.sanity_tolerance),
        ];
        for (field, value) in positive {
            if let Some(v) = value {
                if !(v.is_finite() && v > 0.0) {
                    return Err(invalid(field, "must be finite and greater than 0"));
                }
            }
        }

        if config.binning.num_epsilon_bins == Some(0) {
            return Err(invalid("binning.num_epsilon_bins", "must be at least 1"));
        }
        if config.execution.concurrent_tasks == Some(0) {
            return Err(invalid("execution.concurrent_tasks", "must be at least 1"));
        }
        if let Some(w) = config.execution.point_source_weight {
            if !(w.is_finite() && w >= 0.0) {
                return Err(invalid("execution.point_source_weight", "must be finite and >= 0"));
            }
        }

        let calc = &config.calculation;
        for poe in &calc.poes_disagg {
            if !(*poe > 0.0 && *poe <= 1.0) {
                return Err(invalid("calculation.poes_disagg", "every PoE must be in (0, 1]"));
            }
        }
        for (imt, iml) in &calc.iml_disagg {
            if !(iml.is_finite() && *iml > 0.0) {
                return Err(invalid(
                    "calculation.iml_disagg",
                    &format!("level for {imt} must be finite and greater than 0"),
                ));
            }
            if !calc.intensity_measure_types.is_empty()
                && !calc.intensity_measure_types.contains(imt)
            {
                return Err(invalid(
                    "calculation.iml_disagg",
                    &format!("{imt} is not one of the intensity measure types"),
                ));
            }
        }
        if !calc.iml_disagg.is_empty() {
            for imt in &calc.intensity_measure_types {
                if !calc.iml_disagg.contains_key(imt) {
                    return Err(invalid(
                        "calculation.iml_disagg",
                        &format!("missing a level for {imt}"),
                    ));
                }
            }
        }

        for name in &config.execution.pmf_views {
            if PmfKind::from_name(name).is_none() {
                return Err(invalid(
                    "execution.pmf_views",
                    &format!("unknown PMF view '{name}'"),
                ));
            }
        }
        Ok(())
    }

    /// Checks that a request can actually be run: something to disaggregate
    /// and at least one IMT. Kept apart from `validate` so partial
    /// configs (e.g. a user file) can be layered.
    pub fn validate_request(&self) -> Result<(), ConfigError> {
        let calc = &self.calculation;
        if calc.poes_disagg.is_empty() && calc.iml_disagg.is_empty() {
            return Err(invalid(
                "calculation.poes_disagg",
                "either poes_disagg or iml_disagg must be given",
            ));
        }
        if calc.imts().is_empty() {
            return Err(invalid(
                "calculation.intensity_measure_types",
                "at least one intensity measure type is required",
            ));
        }
        Ok(())
    }

    /// The PMF views selected by `execution.pmf_views`, or all of them.
    pub fn pmf_views(&self) -> Vec<PmfKind> {
        if self.execution.pmf_views.is_empty() {
            PmfKind::ALL.to_vec()
        } else {
            self.execution
                .pmf_views
                .iter()
                .filter_map(|name| PmfKind::from_name(name))
                .collect()
        }
    }

    fn user_config_path() -> Option<std::path::PathBuf> {
        home_dir().map(|h| h.join(".disagg").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut DisaggConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: DisaggConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; set values in `other` win.
    fn merge(base: &mut DisaggConfig, other: &DisaggConfig) {
        let b = &mut base.binning;
        let o = &other.binning;
        merge_opt(&mut b.mag_bin_width, o.mag_bin_width);
        merge_opt(&mut b.distance_bin_width, o.distance_bin_width);
        merge_opt(&mut b.coordinate_bin_width, o.coordinate_bin_width);
        merge_opt(&mut b.num_epsilon_bins, o.num_epsilon_bins);

        let c = &mut base.calculation;
        let o = &other.calculation;
        merge_opt(&mut c.truncation_level, o.truncation_level);
        merge_opt(&mut c.maximum_distance, o.maximum_distance);
        merge_opt(&mut c.investigation_time, o.investigation_time);
        if !o.poes_disagg.is_empty() {
            c.poes_disagg = o.poes_disagg.clone();
        }
        if !o.iml_disagg.is_empty() {
            c.iml_disagg = o.iml_disagg.clone();
        }
        if !o.intensity_measure_types.is_empty() {
            c.intensity_measure_types = o.intensity_measure_types.clone();
        }

        let e = &mut base.execution;
        let o = &other.execution;
        merge_opt(&mut e.mode, o.mode);
        merge_opt(&mut e.threads, o.threads);
        merge_opt(&mut e.concurrent_tasks, o.concurrent_tasks);
        merge_opt(&mut e.point_source_weight, o.point_source_weight);
        merge_opt(&mut e.sanity_tolerance, o.sanity_tolerance);
        merge_opt(&mut e.strict_sanity_check, o.strict_sanity_check);
        if !o.pmf_views.is_empty() {
            e.pmf_views = o.pmf_views.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `DISAGG_BINNING_MAG_BIN_WIDTH`, `DISAGG_EXECUTION_MODE`, etc.
    fn apply_env_overrides(config: &mut DisaggConfig) {
        env_parse("DISAGG_BINNING_MAG_BIN_WIDTH", &mut config.binning.mag_bin_width);
        env_parse("DISAGG_BINNING_DISTANCE_BIN_WIDTH", &mut config.binning.distance_bin_width);
        env_parse("DISAGG_BINNING_COORDINATE_BIN_WIDTH", &mut config.binning.coordinate_bin_width);
        env_parse("DISAGG_BINNING_NUM_EPSILON_BINS", &mut config.binning.num_epsilon_bins);
        env_parse("DISAGG_CALCULATION_TRUNCATION_LEVEL", &mut config.calculation.truncation_level);
        env_parse("DISAGG_CALCULATION_MAXIMUM_DISTANCE", &mut config.calculation.maximum_distance);
        env_parse("DISAGG_EXECUTION_MODE", &mut config.execution.mode);
        env_parse("DISAGG_EXECUTION_THREADS", &mut config.execution.threads);
        env_parse("DISAGG_EXECUTION_CONCURRENT_TASKS", &mut config.execution.concurrent_tasks);
        env_parse("DISAGG_EXECUTION_STRICT_SANITY_CHECK", &mut config.execution.strict_sanity_check);
    }

    fn apply_cli_overrides(config: &mut DisaggConfig, cli: &CliOverrides) {
        merge_opt(&mut config.execution.mode, cli.mode);
        merge_opt(&mut config.execution.threads, cli.threads);
        merge_opt(&mut config.execution.concurrent_tasks, cli.concurrent_tasks);
        if let Some(ref poes) = cli.poes_disagg {
            config.calculation.poes_disagg = poes.clone();
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn merge_opt<T: Copy>(base: &mut Option<T>, other: Option<T>) {
    if other.is_some() {
        *base = other;
    }
}

/// Unparseable values are logged and ignored.
fn env_parse<T: std::str::FromStr>(key: &str, slot: &mut Option<T>) {
    if let Ok(val) = std::env::var(key) {
        match val.parse::<T>() {
            Ok(v) => *slot = Some(v),
            Err(_) => tracing::warn!(key, value = %val, "ignoring unparseable environment override"),
        }
    }
}

fn home_dir() -> Option<std::path::PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(std::path::PathBuf::from)
}
