use std::path::Path;

use barkeep_core::agent::{Agent, RecommendationRequest};
use barkeep_core::config::{AppConfig, LoadOptions};
use barkeep_core::errors::ApplicationError;
use barkeep_core::recommendations::{Recommendations, Season};
use chrono::Local;

use crate::commands::{read_json, CommandResult};

const COMMAND: &str = "recommend";

pub fn run(options: LoadOptions, request_path: &Path, current_season: bool) -> CommandResult {
    match execute(options, request_path, current_season) {
        Ok(recommendations) => {
            let keys: Vec<&str> =
                recommendations.categories().iter().map(|category| category.key()).collect();
            CommandResult::success_with_data(
                COMMAND,
                format!("recommendations ready: {}", keys.join(", ")),
                &recommendations,
            )
        }
        Err(error) => CommandResult::from_error(COMMAND, &error),
    }
}

fn execute(
    options: LoadOptions,
    request_path: &Path,
    current_season: bool,
) -> Result<Recommendations, ApplicationError> {
    let config = AppConfig::load(options)?;
    let mut request: RecommendationRequest = read_json(request_path)?;

    if current_season && request.season.is_none() {
        request.season = Some(Season::for_date(Local::now().date_naive()).to_string());
    }

    let agent = Agent::new(config.engine);
    Ok(agent.get_recommendations(&request)?)
}
