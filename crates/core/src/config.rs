use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub fallback: FallbackConfig,
    pub logging: LoggingConfig,
}

/// Thresholds used by the primary recommendation pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    pub min_profit_margin: f64,
    pub min_stock: u32,
    pub min_rating: f64,
    pub rating_relaxation_step: f64,
    pub min_satisfied_results: usize,
    pub default_rating: f64,
    pub max_recent_alcohol_units: f64,
    pub high_proof_abv: f64,
}

/// Limits and tolerances of the additive fallback scorer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FallbackConfig {
    pub recommendation_limit: usize,
    pub similar_limit: usize,
    pub price_tolerance: f64,
    pub abv_tolerance: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub min_stock: Option<u32>,
    pub min_rating: Option<f64>,
    pub recommendation_limit: Option<usize>,
    pub similar_limit: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_profit_margin: 0.3,
            min_stock: 5,
            min_rating: 4.0,
            rating_relaxation_step: 0.5,
            min_satisfied_results: 3,
            default_rating: 5.0,
            max_recent_alcohol_units: 3.0,
            high_proof_abv: 30.0,
        }
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self { recommendation_limit: 5, similar_limit: 3, price_tolerance: 0.2, abv_tolerance: 2.0 }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            fallback: FallbackConfig::default(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("barkeep.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(engine) = patch.engine {
            if let Some(min_profit_margin) = engine.min_profit_margin {
                self.engine.min_profit_margin = min_profit_margin;
            }
            if let Some(min_stock) = engine.min_stock {
                self.engine.min_stock = min_stock;
            }
            if let Some(min_rating) = engine.min_rating {
                self.engine.min_rating = min_rating;
            }
            if let Some(step) = engine.rating_relaxation_step {
                self.engine.rating_relaxation_step = step;
            }
            if let Some(min_satisfied_results) = engine.min_satisfied_results {
                self.engine.min_satisfied_results = min_satisfied_results;
            }
            if let Some(default_rating) = engine.default_rating {
                self.engine.default_rating = default_rating;
            }
            if let Some(units) = engine.max_recent_alcohol_units {
                self.engine.max_recent_alcohol_units = units;
            }
            if let Some(high_proof_abv) = engine.high_proof_abv {
                self.engine.high_proof_abv = high_proof_abv;
            }
        }

        if let Some(fallback) = patch.fallback {
            if let Some(limit) = fallback.recommendation_limit {
                self.fallback.recommendation_limit = limit;
            }
            if let Some(limit) = fallback.similar_limit {
                self.fallback.similar_limit = limit;
            }
            if let Some(price_tolerance) = fallback.price_tolerance {
                self.fallback.price_tolerance = price_tolerance;
            }
            if let Some(abv_tolerance) = fallback.abv_tolerance {
                self.fallback.abv_tolerance = abv_tolerance;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("BARKEEP_ENGINE_MIN_PROFIT_MARGIN") {
            self.engine.min_profit_margin = parse_f64("BARKEEP_ENGINE_MIN_PROFIT_MARGIN", &value)?;
        }
        if let Some(value) = read_env("BARKEEP_ENGINE_MIN_STOCK") {
            self.engine.min_stock = parse_u32("BARKEEP_ENGINE_MIN_STOCK", &value)?;
        }
        if let Some(value) = read_env("BARKEEP_ENGINE_MIN_RATING") {
            self.engine.min_rating = parse_f64("BARKEEP_ENGINE_MIN_RATING", &value)?;
        }
        if let Some(value) = read_env("BARKEEP_ENGINE_RATING_RELAXATION_STEP") {
            self.engine.rating_relaxation_step =
                parse_f64("BARKEEP_ENGINE_RATING_RELAXATION_STEP", &value)?;
        }
        if let Some(value) = read_env("BARKEEP_ENGINE_MIN_SATISFIED_RESULTS") {
            self.engine.min_satisfied_results =
                parse_usize("BARKEEP_ENGINE_MIN_SATISFIED_RESULTS", &value)?;
        }
        if let Some(value) = read_env("BARKEEP_ENGINE_DEFAULT_RATING") {
            self.engine.default_rating = parse_f64("BARKEEP_ENGINE_DEFAULT_RATING", &value)?;
        }
        if let Some(value) = read_env("BARKEEP_ENGINE_MAX_RECENT_ALCOHOL_UNITS") {
            self.engine.max_recent_alcohol_units =
                parse_f64("BARKEEP_ENGINE_MAX_RECENT_ALCOHOL_UNITS", &value)?;
        }
        if let Some(value) = read_env("BARKEEP_ENGINE_HIGH_PROOF_ABV") {
            self.engine.high_proof_abv = parse_f64("BARKEEP_ENGINE_HIGH_PROOF_ABV", &value)?;
        }

        if let Some(value) = read_env("BARKEEP_FALLBACK_RECOMMENDATION_LIMIT") {
            self.fallback.recommendation_limit =
                parse_usize("BARKEEP_FALLBACK_RECOMMENDATION_LIMIT", &value)?;
        }
        if let Some(value) = read_env("BARKEEP_FALLBACK_SIMILAR_LIMIT") {
            self.fallback.similar_limit = parse_usize("BARKEEP_FALLBACK_SIMILAR_LIMIT", &value)?;
        }
        if let Some(value) = read_env("BARKEEP_FALLBACK_PRICE_TOLERANCE") {
            self.fallback.price_tolerance = parse_f64("BARKEEP_FALLBACK_PRICE_TOLERANCE", &value)?;
        }
        if let Some(value) = read_env("BARKEEP_FALLBACK_ABV_TOLERANCE") {
            self.fallback.abv_tolerance = parse_f64("BARKEEP_FALLBACK_ABV_TOLERANCE", &value)?;
        }

        let log_level =
            read_env("BARKEEP_LOGGING_LEVEL").or_else(|| read_env("BARKEEP_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("BARKEEP_LOGGING_FORMAT").or_else(|| read_env("BARKEEP_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
        if let Some(min_stock) = overrides.min_stock {
            self.engine.min_stock = min_stock;
        }
        if let Some(min_rating) = overrides.min_rating {
            self.engine.min_rating = min_rating;
        }
        if let Some(limit) = overrides.recommendation_limit {
            self.fallback.recommendation_limit = limit;
        }
        if let Some(limit) = overrides.similar_limit {
            self.fallback.similar_limit = limit;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_engine(&self.engine)?;
        validate_fallback(&self.fallback)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("barkeep.toml"), PathBuf::from("config/barkeep.toml")]
        .into_iter()
        .find(|path| path.exists())
}

/// Path of the config file `AppConfig::load` would pick up without an explicit path.
pub fn detect_config_path() -> Option<PathBuf> {
    resolve_config_path(None)
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_engine(engine: &EngineConfig) -> Result<(), ConfigError> {
    if !(0.0..1.0).contains(&engine.min_profit_margin) {
        return Err(ConfigError::Validation(
            "engine.min_profit_margin must be in range 0.0..1.0".to_string(),
        ));
    }

    for (key, rating) in [
        ("engine.min_rating", engine.min_rating),
        ("engine.default_rating", engine.default_rating),
    ] {
        if !(0.0..=5.0).contains(&rating) {
            return Err(ConfigError::Validation(format!("{key} must be in range 0.0..=5.0")));
        }
    }

    if !engine.rating_relaxation_step.is_finite() || engine.rating_relaxation_step < 0.0 {
        return Err(ConfigError::Validation(
            "engine.rating_relaxation_step must be a non-negative number".to_string(),
        ));
    }

    if !engine.max_recent_alcohol_units.is_finite() || engine.max_recent_alcohol_units < 0.0 {
        return Err(ConfigError::Validation(
            "engine.max_recent_alcohol_units must be a non-negative number".to_string(),
        ));
    }

    if !engine.high_proof_abv.is_finite() || !(0.0..=100.0).contains(&engine.high_proof_abv) {
        return Err(ConfigError::Validation(
            "engine.high_proof_abv must be in range 0.0..=100.0".to_string(),
        ));
    }

    Ok(())
}

fn validate_fallback(fallback: &FallbackConfig) -> Result<(), ConfigError> {
    if fallback.recommendation_limit == 0 {
        return Err(ConfigError::Validation(
            "fallback.recommendation_limit must be greater than zero".to_string(),
        ));
    }

    if fallback.similar_limit == 0 {
        return Err(ConfigError::Validation(
            "fallback.similar_limit must be greater than zero".to_string(),
        ));
    }

    if !fallback.price_tolerance.is_finite() || fallback.price_tolerance < 0.0 {
        return Err(ConfigError::Validation(
            "fallback.price_tolerance must be a non-negative fraction".to_string(),
        ));
    }

    if !fallback.abv_tolerance.is_finite() || fallback.abv_tolerance < 0.0 {
        return Err(ConfigError::Validation(
            "fallback.abv_tolerance must be non-negative percentage points".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse::<f64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    engine: Option<EnginePatch>,
    fallback: Option<FallbackPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct EnginePatch {
    min_profit_margin: Option<f64>,
    min_stock: Option<u32>,
    min_rating: Option<f64>,
    rating_relaxation_step: Option<f64>,
    min_satisfied_results: Option<usize>,
    default_rating: Option<f64>,
    max_recent_alcohol_units: Option<f64>,
    high_proof_abv: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct FallbackPatch {
    recommendation_limit: Option<usize>,
    similar_limit: Option<usize>,
    price_tolerance: Option<f64>,
    abv_tolerance: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
