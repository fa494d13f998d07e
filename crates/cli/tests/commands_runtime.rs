use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use barkeep_cli::commands::{config, personalize, recommend, similar};
use barkeep_core::config::{ConfigOverrides, LoadOptions};
use serde_json::{json, Value};
use tempfile::TempDir;

#[test]
fn recommend_returns_categorized_results_for_scenario_request() {
    with_env(&[], || {
        let dir = temp_dir();
        let request =
            write_json(&dir, "request.json", &scenario_request(25, &["sweet", "fruity"]));

        let result = recommend::run(LoadOptions::default(), &request, false);
        assert_eq!(result.exit_code, 0, "expected successful recommendation run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "recommend");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["cocktails"], json!(["Sweet Martini"]));
        assert!(payload["data"].get("seasonal").is_none());
    });
}

#[test]
fn recommend_keeps_minors_on_virgin_drinks() {
    with_env(&[], || {
        let dir = temp_dir();
        let request = write_json(&dir, "request.json", &scenario_request(18, &["sweet"]));

        let result = recommend::run(LoadOptions::default(), &request, true);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["cocktails"], json!(["Virgin Smoothie"]));
        assert!(payload["data"]["seasonal"].is_array(), "current season should be filled in");
    });
}

#[test]
fn recommend_reports_malformed_request_as_input_failure() {
    with_env(&[], || {
        let dir = temp_dir();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{\"customer\": ").expect("fixture should be writable");

        let result = recommend::run(LoadOptions::default(), &path, false);
        assert_eq!(result.exit_code, 3, "expected input failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "input");
    });
}

#[test]
fn recommend_reports_duplicate_drinks_as_domain_failure() {
    with_env(&[], || {
        let dir = temp_dir();
        let mut body = scenario_request(30, &["sweet"]);
        let duplicate = body["drinks"][0].clone();
        body["drinks"].as_array_mut().expect("drinks should be an array").push(duplicate);
        let request = write_json(&dir, "request.json", &body);

        let result = recommend::run(LoadOptions::default(), &request, false);
        assert_eq!(result.exit_code, 3);
        assert_eq!(parse_payload(&result.output)["error_class"], "domain_validation");
    });
}

#[test]
fn recommend_returns_config_failure_for_invalid_env() {
    with_env(&[("BARKEEP_ENGINE_MIN_STOCK", "plenty")], || {
        let dir = temp_dir();
        let request = write_json(&dir, "request.json", &scenario_request(25, &["sweet"]));

        let result = recommend::run(LoadOptions::default(), &request, false);
        assert_eq!(result.exit_code, 2, "expected config validation failure code");
        assert_eq!(parse_payload(&result.output)["error_class"], "config_validation");
    });
}

#[test]
fn personalize_is_served_by_primary_for_complete_profiles() {
    with_env(&[], || {
        let dir = temp_dir();
        let body = json!({
            "user_id": "u-100",
            "profile": {"age": 30, "preferred_flavors": ["sweet", "fruity"], "allergies": ["nuts"]},
            "items": menu_items(),
        });
        let request = write_json(&dir, "personalize.json", &body);

        let result = personalize::run(LoadOptions::default(), &request);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["source"]["path"], "primary");
        assert_eq!(payload["data"]["value"][0]["name"], "Sweet Martini");
    });
}

#[test]
fn personalize_falls_back_when_flavors_are_missing() {
    with_env(&[], || {
        let dir = temp_dir();
        let body = json!({
            "user_id": "u-101",
            "profile": {"age": 30, "preferred_categories": ["beer"]},
            "items": menu_items(),
            "limit": 2,
        });
        let request = write_json(&dir, "personalize.json", &body);

        let result = personalize::run(LoadOptions::default(), &request);
        assert_eq!(result.exit_code, 0, "fallback is still a successful response");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["source"]["path"], "fallback");
        assert_eq!(payload["data"]["value"][0]["name"], "Pale Ale");
        assert_eq!(payload["data"]["value"].as_array().map(Vec::len), Some(2));
    });
}

#[test]
fn similar_excludes_reference_and_honors_limit() {
    with_env(&[], || {
        let dir = temp_dir();
        let menu = write_json(&dir, "menu.json", &menu_items());

        let options = LoadOptions {
            overrides: ConfigOverrides { similar_limit: Some(2), ..ConfigOverrides::default() },
            ..LoadOptions::default()
        };
        let result = similar::run(options, &menu, 3);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let items = payload["data"]["value"].as_array().cloned().unwrap_or_default();
        assert!(items.len() <= 2);
        assert!(items.iter().all(|item| item["id"] != 3));
    });
}

#[test]
fn similar_reports_unknown_item_as_input_failure() {
    with_env(&[], || {
        let dir = temp_dir();
        let menu = write_json(&dir, "menu.json", &menu_items());

        let result = similar::run(LoadOptions::default(), &menu, 99);
        assert_eq!(result.exit_code, 3);
        assert_eq!(parse_payload(&result.output)["error_class"], "input");
    });
}

#[test]
fn recommend_honors_min_stock_override() {
    with_env(&[], || {
        let dir = temp_dir();
        let request =
            write_json(&dir, "request.json", &scenario_request(25, &["sweet", "fruity"]));
        let options = LoadOptions {
            overrides: ConfigOverrides { min_stock: Some(12), ..ConfigOverrides::default() },
            ..LoadOptions::default()
        };

        let result = recommend::run(options, &request, false);
        assert_eq!(result.exit_code, 0);
        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["inventory_based"], json!(["Sweet Martini"]));
    });
}

#[test]
fn config_reports_env_and_file_sources() {
    with_env(&[("BARKEEP_LOG_LEVEL", "debug")], || {
        let dir = temp_dir();
        let path = dir.path().join("barkeep.toml");
        fs::write(&path, "[engine]\nmin_stock = 8\n").expect("config should be writable");

        let options =
            LoadOptions { config_path: Some(path), require_file: true, ..LoadOptions::default() };
        let result = config::run(options);
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let message = payload["message"].as_str().unwrap_or("");
        assert!(message.contains("- engine.min_stock = 8 (source: file ("));
        assert!(message.contains("- logging.level = debug (source: env (BARKEEP_LOG_LEVEL))"));
        assert!(message.contains("- engine.min_rating = 4 (source: default)"));
    });
}

#[test]
fn config_fails_when_required_file_is_missing() {
    with_env(&[], || {
        let dir = temp_dir();
        let options = LoadOptions {
            config_path: Some(dir.path().join("missing.toml")),
            require_file: true,
            ..LoadOptions::default()
        };

        let result = config::run(options);
        assert_eq!(result.exit_code, 2);
        assert_eq!(parse_payload(&result.output)["error_class"], "config_validation");
    });
}

fn scenario_request(age: u32, flavors: &[&str]) -> Value {
    json!({
        "customer": {
            "id": "C001",
            "age": age,
            "preferences": {"flavors": flavors},
            "restrictions": {"allergies": ["nuts"]}
        },
        "drinks": [
            {"name": "Sweet Martini", "category": "cocktail", "abv": 20.0,
             "flavors": ["sweet", "fruity"], "price": 14.99},
            {"name": "Nutty Alexander", "category": "cocktail", "abv": 15.0,
             "flavors": ["sweet", "nutty"], "allergens": ["nuts"], "price": 13.99},
            {"name": "Virgin Smoothie", "category": "mocktail", "abv": 0.0,
             "flavors": ["sweet", "fruity"], "price": 8.99}
        ],
        "inventory": {"Sweet Martini": 20, "Nutty Alexander": 15, "Virgin Smoothie": 10},
        "costs": {"Sweet Martini": 4.0, "Nutty Alexander": 4.0, "Virgin Smoothie": 2.0},
        "feedback": {},
        "rejections": [],
    })
}

fn menu_items() -> Value {
    json!([
        {"id": 1, "name": "Sweet Martini", "category": "cocktail", "alcohol_content": 20.0,
         "flavor_profile": ["sweet", "fruity"], "price": 14.99},
        {"id": 2, "name": "Nutty Alexander", "category": "cocktail", "alcohol_content": 15.0,
         "flavor_profile": "sweet,nutty", "allergens": "nuts", "price": 13.99},
        {"id": 3, "name": "Virgin Smoothie", "category": "mocktail", "alcohol_content": 0.0,
         "flavor_profile": ["sweet", "fruity"], "price": 8.99},
        {"id": 4, "name": "Pale Ale", "category": "beer", "alcohol_content": 5.5,
         "flavor_profile": ["hoppy"], "price": 7.0},
        {"id": 5, "name": "Seasonal Punch", "category": "cocktail", "alcohol_content": 10.0,
         "flavor_profile": ["sweet"], "price": 9.0, "is_available": false}
    ])
}

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("temp dir should be created")
}

fn write_json(dir: &TempDir, name: &str, value: &Value) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, value.to_string()).expect("fixture should be writable");
    path
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "BARKEEP_ENGINE_MIN_PROFIT_MARGIN",
        "BARKEEP_ENGINE_MIN_STOCK",
        "BARKEEP_ENGINE_MIN_RATING",
        "BARKEEP_ENGINE_RATING_RELAXATION_STEP",
        "BARKEEP_ENGINE_MIN_SATISFIED_RESULTS",
        "BARKEEP_ENGINE_DEFAULT_RATING",
        "BARKEEP_ENGINE_MAX_RECENT_ALCOHOL_UNITS",
        "BARKEEP_ENGINE_HIGH_PROOF_ABV",
        "BARKEEP_FALLBACK_RECOMMENDATION_LIMIT",
        "BARKEEP_FALLBACK_SIMILAR_LIMIT",
        "BARKEEP_FALLBACK_PRICE_TOLERANCE",
        "BARKEEP_FALLBACK_ABV_TOLERANCE",
        "BARKEEP_LOGGING_LEVEL",
        "BARKEEP_LOGGING_FORMAT",
        "BARKEEP_LOG_LEVEL",
        "BARKEEP_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
