//! Recommendation generators. Each one reads the filtered, ranked candidate
//! set and produces one category of the final result.

mod bundles;
mod generators;
mod season;

use serde::{Deserialize, Serialize};

use crate::domain::bundle::{ComboRecommendation, PackageRecommendation};

pub use bundles::{index_catalog, recommend_combos, recommend_group_packages, CatalogIndex};
pub use generators::{recommend_by_inventory, recommend_cocktails, recommend_seasonal};
pub use season::Season;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationCategory {
    Cocktails,
    InventoryBased,
    Seasonal,
    Combos,
    GroupPackages,
}

impl RecommendationCategory {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Cocktails => "cocktails",
            Self::InventoryBased => "inventory_based",
            Self::Seasonal => "seasonal",
            Self::Combos => "combos",
            Self::GroupPackages => "group_packages",
        }
    }
}

/// Categorized output of one orchestrator run. Categories whose generator
/// did not run are `None` and left out of serialized output.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub cocktails: Vec<String>,
    pub inventory_based: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonal: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combos: Option<Vec<ComboRecommendation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_packages: Option<Vec<PackageRecommendation>>,
}

impl Recommendations {
    /// Categories present in this result, in output order.
    pub fn categories(&self) -> Vec<RecommendationCategory> {
        let mut present =
            vec![RecommendationCategory::Cocktails, RecommendationCategory::InventoryBased];
        if self.seasonal.is_some() {
            present.push(RecommendationCategory::Seasonal);
        }
        if self.combos.is_some() {
            present.push(RecommendationCategory::Combos);
        }
        if self.group_packages.is_some() {
            present.push(RecommendationCategory::GroupPackages);
        }
        present
    }

    /// Every drink name across the name-based categories.
    pub fn drink_names(&self) -> impl Iterator<Item = &str> {
        self.cocktails
            .iter()
            .chain(&self.inventory_based)
            .chain(self.seasonal.iter().flatten())
            .map(String::as_str)
    }
}
