use crate::domain::customer::Customer;
use crate::domain::drink::{Drink, DrinkCategory};
use crate::domain::history::Inventory;
use crate::domain::tags::tag_set;
use crate::recommendations::season::Season;

fn names<'a>(drinks: impl IntoIterator<Item = &'a Drink>) -> Vec<String> {
    drinks.into_iter().map(|drink| drink.name().to_owned()).collect()
}

/// Cocktails sharing a flavor with the customer's preferences.
///
/// Adults get drinks in the cocktail category. Underage customers only get
/// "Virgin" variants, and only those without alcohol. Input order is kept.
pub fn recommend_cocktails(customer: &Customer, candidates: &[&Drink]) -> Vec<String> {
    let wanted = &customer.preferences.flavors;
    let underage = customer.is_underage();

    names(candidates.iter().copied().filter(|drink| {
        let eligible = if underage {
            drink.is_virgin_variant() && !drink.is_alcoholic()
        } else {
            drink.category() == &DrinkCategory::Cocktail
        };
        eligible && drink.shares_flavor_with(wanted)
    }))
}

/// Well-stocked drinks, most stock first. Stock must be strictly above `min_stock`.
pub fn recommend_by_inventory(
    customer: &Customer,
    candidates: &[&Drink],
    inventory: &Inventory,
    min_stock: u32,
) -> Vec<String> {
    let stock_of = |drink: &Drink| inventory.get(drink.name()).copied().unwrap_or(0);

    let mut stocked: Vec<(&Drink, u32)> = candidates
        .iter()
        .copied()
        .map(|drink| (drink, stock_of(drink)))
        .filter(|(_, stock)| *stock > min_stock)
        .filter(|(drink, _)| !customer.is_underage() || !drink.is_alcoholic())
        .collect();

    stocked.sort_by(|a, b| b.1.cmp(&a.1));
    names(stocked.into_iter().map(|(drink, _)| drink))
}

/// Drinks matching the season's flavor traits. Unknown seasons match nothing.
pub fn recommend_seasonal(customer: &Customer, candidates: &[&Drink], season: &str) -> Vec<String> {
    let Some(season) = Season::parse(season) else {
        tracing::debug!(event_name = "engine.seasonal.unknown", season, "unknown season");
        return Vec::new();
    };
    let traits = tag_set(season.traits());

    names(candidates.iter().copied().filter(|drink| {
        drink.shares_flavor_with(&traits) && (!customer.is_underage() || !drink.is_alcoholic())
    }))
}
