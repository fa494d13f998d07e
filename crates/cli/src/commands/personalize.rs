use std::path::Path;

use barkeep_core::config::{AppConfig, LoadOptions};
use barkeep_core::domain::menu::{MenuItem, PreferenceProfile};
use barkeep_core::errors::ApplicationError;
use barkeep_core::service::{MenuConstraints, RecommendationService, Served};
use serde::Deserialize;

use crate::commands::{read_json, CommandResult};

const COMMAND: &str = "personalize";

#[derive(Debug, Deserialize)]
struct PersonalizeRequest {
    user_id: String,
    #[serde(default)]
    profile: PreferenceProfile,
    items: Vec<MenuItem>,
    #[serde(default)]
    constraints: MenuConstraints,
    #[serde(default)]
    limit: Option<usize>,
}

pub fn run(options: LoadOptions, request_path: &Path) -> CommandResult {
    match execute(options, request_path) {
        Ok(served) => CommandResult::success_with_data(
            COMMAND,
            format!("{} item(s) recommended", served.value.len()),
            &served,
        ),
        Err(error) => CommandResult::from_error(COMMAND, &error),
    }
}

fn execute(
    options: LoadOptions,
    request_path: &Path,
) -> Result<Served<Vec<MenuItem>>, ApplicationError> {
    let config = AppConfig::load(options)?;
    let request: PersonalizeRequest = read_json(request_path)?;
    let limit = request.limit.unwrap_or(config.fallback.recommendation_limit);

    let service = RecommendationService::from_config(&config);
    Ok(service.personalized(
        &request.user_id,
        &request.profile,
        &request.items,
        &request.constraints,
        limit,
    ))
}
