use crate::domain::drink::Drink;
use crate::domain::history::BrandPriorities;

/// Priority of the first brand, in key order, whose name appears
/// case-insensitively inside the drink name. Unmatched drinks score zero.
pub fn brand_score(drink: &Drink, priorities: &BrandPriorities) -> f64 {
    let name = drink.name().to_lowercase();
    priorities
        .iter()
        .find(|(brand, _)| name.contains(&brand.to_lowercase()))
        .map(|(_, priority)| *priority)
        .unwrap_or(0.0)
}

/// Reorders candidates by brand priority, highest first. Never drops a drink.
pub fn rank_by_brand<'a>(candidates: &[&'a Drink], priorities: &BrandPriorities) -> Vec<&'a Drink> {
    let mut scored: Vec<(&'a Drink, f64)> =
        candidates.iter().map(|drink| (*drink, brand_score(drink, priorities))).collect();

    // `sort_by` is stable, so equal priorities keep their input order.
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.into_iter().map(|(drink, _)| drink).collect()
}
