use std::collections::HashMap;

use crate::domain::bundle::{
    ComboDefinition, ComboRecommendation, PackageDefinition, PackageRecommendation,
};
use crate::domain::customer::Customer;
use crate::domain::drink::Drink;

/// Drinks keyed by name, built from the full request catalog.
pub type CatalogIndex<'a> = HashMap<&'a str, &'a Drink>;

pub fn index_catalog(catalog: &[Drink]) -> CatalogIndex<'_> {
    catalog.iter().map(|drink| (drink.name(), drink)).collect()
}

/// An underage customer may only get a bundle whose every drink is known and
/// alcohol-free.
fn bundle_is_legal(customer: &Customer, drinks: &[String], catalog: &CatalogIndex<'_>) -> bool {
    if !customer.is_underage() {
        return true;
    }
    drinks.iter().all(|name| {
        catalog.get(name.as_str()).is_some_and(|drink| !drink.is_alcoholic())
    })
}

pub fn recommend_combos(
    customer: &Customer,
    catalog: &CatalogIndex<'_>,
    combos: &[ComboDefinition],
) -> Vec<ComboRecommendation> {
    combos
        .iter()
        .filter(|combo| !customer.is_allergic_to(&combo.allergens))
        .filter(|combo| bundle_is_legal(customer, &combo.drinks, catalog))
        .map(|combo| ComboRecommendation {
            name: combo.name.clone(),
            description: combo.description.clone(),
            price: combo.price,
        })
        .collect()
}

/// Packages sized for `group_size`, with `customer` standing in for the group.
/// A package whose `min_size` exceeds its `max_size` is skipped.
pub fn recommend_group_packages(
    group_size: u32,
    customer: &Customer,
    catalog: &CatalogIndex<'_>,
    packages: &[PackageDefinition],
) -> Vec<PackageRecommendation> {
    packages
        .iter()
        .filter(|package| has_usable_range(package))
        .filter(|package| package.fits_group(group_size))
        .filter(|package| !customer.is_allergic_to(&package.allergens))
        .filter(|package| bundle_is_legal(customer, &package.drinks, catalog))
        .map(|package| PackageRecommendation {
            name: package.name.clone(),
            description: package.description.clone(),
            price: package.price,
            serves: package.serves.unwrap_or(group_size),
        })
        .collect()
}

fn has_usable_range(package: &PackageDefinition) -> bool {
    if package.has_valid_range() {
        return true;
    }
    tracing::warn!(
        event_name = "engine.package.skipped",
        package = package.name.as_str(),
        min_size = package.min_size,
        max_size = package.max_size.unwrap_or_default(),
        "package range is inverted, skipping"
    );
    false
}
