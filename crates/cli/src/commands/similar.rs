use std::path::Path;

use barkeep_core::config::{AppConfig, LoadOptions};
use barkeep_core::domain::menu::MenuItem;
use barkeep_core::errors::ApplicationError;
use barkeep_core::service::{RecommendationService, Served};

use crate::commands::{read_json, CommandResult};

const COMMAND: &str = "similar";

pub fn run(options: LoadOptions, menu_path: &Path, item_id: u64) -> CommandResult {
    match execute(options, menu_path, item_id) {
        Ok(served) => CommandResult::success_with_data(
            COMMAND,
            format!("{} item(s) similar to {item_id}", served.value.len()),
            &served,
        ),
        Err(error) => CommandResult::from_error(COMMAND, &error),
    }
}

fn execute(
    options: LoadOptions,
    menu_path: &Path,
    item_id: u64,
) -> Result<Served<Vec<MenuItem>>, ApplicationError> {
    let config = AppConfig::load(options)?;
    let menu: Vec<MenuItem> = read_json(menu_path)?;

    let reference = menu.iter().find(|item| item.id == item_id).ok_or_else(|| {
        ApplicationError::Input {
            path: menu_path.display().to_string(),
            message: format!("no menu item with id {item_id}"),
        }
    })?;

    let service = RecommendationService::from_config(&config);
    Ok(service.similar(reference, &menu, config.fallback.similar_limit))
}
