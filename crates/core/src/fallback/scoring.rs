//! Additive scoring over menu rows

use serde::{Deserialize, Serialize};

use crate::config::FallbackConfig;
use crate::domain::menu::{MenuItem, PreferenceProfile};
use crate::domain::tags::overlap;

/// Points earned by one item, per component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// 2 when the category matches
    pub category: u32,
    /// One point per shared flavor tag
    pub flavor: u32,
    /// 1 when the price is in range
    pub price: u32,
    /// 1 when the alcohol content matches
    pub alcohol: u32,
}

impl ScoreBreakdown {
    pub const CATEGORY_POINTS: u32 = 2;

    pub fn total(&self) -> u32 {
        self.category + self.flavor + self.price + self.alcohol
    }

    /// Human-readable reasons for the non-zero components.
    pub fn reasoning(&self) -> Vec<String> {
        let mut reasons = Vec::new();
        if self.category > 0 {
            reasons.push("Matches a preferred category".to_string());
        }
        if self.flavor > 0 {
            reasons.push(format!("Shares {} flavor note(s)", self.flavor));
        }
        if self.price > 0 {
            reasons.push("Priced within range".to_string());
        }
        if self.alcohol > 0 {
            reasons.push("Alcohol strength fits".to_string());
        }
        reasons
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredItem<'a> {
    pub item: &'a MenuItem,
    pub breakdown: ScoreBreakdown,
}

impl ScoredItem<'_> {
    pub fn score(&self) -> u32 {
        self.breakdown.total()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FallbackScorer {
    /// Relative price distance still counted as similar
    price_tolerance: f64,
    /// Absolute abv distance still counted as similar
    abv_tolerance: f64,
}

impl Default for FallbackScorer {
    fn default() -> Self {
        Self::from(&FallbackConfig::default())
    }
}

impl From<&FallbackConfig> for FallbackScorer {
    fn from(config: &FallbackConfig) -> Self {
        Self { price_tolerance: config.price_tolerance, abv_tolerance: config.abv_tolerance }
    }
}

impl FallbackScorer {
    pub fn new(price_tolerance: f64, abv_tolerance: f64) -> Self {
        Self { price_tolerance, abv_tolerance }
    }

    pub fn price_tolerance(&self) -> f64 {
        self.price_tolerance
    }

    pub fn score_preferences(
        &self,
        profile: &PreferenceProfile,
        item: &MenuItem,
    ) -> ScoreBreakdown {
        let category = item.category();
        ScoreBreakdown {
            category: if profile.preferred_categories.contains(&category) {
                ScoreBreakdown::CATEGORY_POINTS
            } else {
                0
            },
            flavor: points(overlap(&profile.preferred_flavors, &item.flavor_profile)),
            price: profile
                .preferred_price_range
                .is_some_and(|range| range.contains(item.price))
                .into(),
            alcohol: profile.alcohol_preference.matches(item.alcohol()).into(),
        }
    }

    pub fn score_similarity(&self, reference: &MenuItem, item: &MenuItem) -> ScoreBreakdown {
        let price_close = reference.price > 0.0
            && ((item.price - reference.price).abs() / reference.price) <= self.price_tolerance;
        let abv_close = match (reference.alcohol(), item.alcohol()) {
            (Some(left), Some(right)) => (left - right).abs() <= self.abv_tolerance,
            _ => false,
        };

        ScoreBreakdown {
            category: if item.category() == reference.category() {
                ScoreBreakdown::CATEGORY_POINTS
            } else {
                0
            },
            flavor: points(overlap(&reference.flavor_profile, &item.flavor_profile)),
            price: price_close.into(),
            alcohol: abv_close.into(),
        }
    }

    /// Every item scored against the profile, best first. Ties keep menu order.
    pub fn rank_by_preferences<'a>(
        &self,
        profile: &PreferenceProfile,
        items: &'a [MenuItem],
    ) -> Vec<ScoredItem<'a>> {
        sorted(
            items
                .iter()
                .map(|item| ScoredItem { item, breakdown: self.score_preferences(profile, item) })
                .collect(),
        )
    }

    /// Items other than the reference scored by likeness, best first.
    pub fn rank_by_similarity<'a>(
        &self,
        reference: &MenuItem,
        items: &'a [MenuItem],
    ) -> Vec<ScoredItem<'a>> {
        sorted(
            items
                .iter()
                .filter(|item| item.id != reference.id)
                .map(|item| ScoredItem { item, breakdown: self.score_similarity(reference, item) })
                .collect(),
        )
    }

    pub fn recommend<'a>(
        &self,
        profile: &PreferenceProfile,
        items: &'a [MenuItem],
        limit: usize,
    ) -> Vec<&'a MenuItem> {
        self.rank_by_preferences(profile, items).into_iter().take(limit).map(|s| s.item).collect()
    }

    pub fn similar<'a>(
        &self,
        reference: &MenuItem,
        items: &'a [MenuItem],
        limit: usize,
    ) -> Vec<&'a MenuItem> {
        self.rank_by_similarity(reference, items).into_iter().take(limit).map(|s| s.item).collect()
    }
}

fn points(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

fn sorted(mut scored: Vec<ScoredItem<'_>>) -> Vec<ScoredItem<'_>> {
    scored.sort_by(|a, b| b.score().cmp(&a.score()));
    scored
}
