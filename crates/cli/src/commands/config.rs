use std::env;
use std::fs;
use std::path::Path;

use barkeep_core::config::{detect_config_path, AppConfig, LoadOptions};
use barkeep_core::errors::ApplicationError;
use toml::Value;

use crate::commands::CommandResult;

const COMMAND: &str = "config";

pub fn run(options: LoadOptions) -> CommandResult {
    let config_file_path = options.config_path.clone().or_else(detect_config_path);
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error(COMMAND, &ApplicationError::from(error)),
    };

    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let engine = &config.engine;
    let fallback = &config.fallback;

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    let mut push = |key_path: &str, value: String, env_keys: &[&str]| {
        let source = field_source(
            key_path,
            env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(key_path, &value, source));
    };

    push(
        "engine.min_profit_margin",
        engine.min_profit_margin.to_string(),
        &["BARKEEP_ENGINE_MIN_PROFIT_MARGIN"],
    );
    push("engine.min_stock", engine.min_stock.to_string(), &["BARKEEP_ENGINE_MIN_STOCK"]);
    push("engine.min_rating", engine.min_rating.to_string(), &["BARKEEP_ENGINE_MIN_RATING"]);
    push(
        "engine.rating_relaxation_step",
        engine.rating_relaxation_step.to_string(),
        &["BARKEEP_ENGINE_RATING_RELAXATION_STEP"],
    );
    push(
        "engine.min_satisfied_results",
        engine.min_satisfied_results.to_string(),
        &["BARKEEP_ENGINE_MIN_SATISFIED_RESULTS"],
    );
    push(
        "engine.default_rating",
        engine.default_rating.to_string(),
        &["BARKEEP_ENGINE_DEFAULT_RATING"],
    );
    push(
        "engine.max_recent_alcohol_units",
        engine.max_recent_alcohol_units.to_string(),
        &["BARKEEP_ENGINE_MAX_RECENT_ALCOHOL_UNITS"],
    );
    push(
        "engine.high_proof_abv",
        engine.high_proof_abv.to_string(),
        &["BARKEEP_ENGINE_HIGH_PROOF_ABV"],
    );
    push(
        "fallback.recommendation_limit",
        fallback.recommendation_limit.to_string(),
        &["BARKEEP_FALLBACK_RECOMMENDATION_LIMIT"],
    );
    push(
        "fallback.similar_limit",
        fallback.similar_limit.to_string(),
        &["BARKEEP_FALLBACK_SIMILAR_LIMIT"],
    );
    push(
        "fallback.price_tolerance",
        fallback.price_tolerance.to_string(),
        &["BARKEEP_FALLBACK_PRICE_TOLERANCE"],
    );
    push(
        "fallback.abv_tolerance",
        fallback.abv_tolerance.to_string(),
        &["BARKEEP_FALLBACK_ABV_TOLERANCE"],
    );
    push(
        "logging.level",
        config.logging.level.clone(),
        &["BARKEEP_LOGGING_LEVEL", "BARKEEP_LOG_LEVEL"],
    );
    push(
        "logging.format",
        format!("{:?}", config.logging.format).to_lowercase(),
        &["BARKEEP_LOGGING_FORMAT", "BARKEEP_LOG_FORMAT"],
    );

    CommandResult::success(COMMAND, lines.join("\n"))
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
