//! Menu-facing recommendation service.
//!
//! Applies route-level menu constraints, asks the primary strategy first and
//! serves the fallback strategy whenever the primary returns an error. The
//! caller always gets a list, tagged with the path that produced it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, FallbackConfig};
use crate::constraints::{filter_legal, filter_safe, SafetyLimits};
use crate::domain::customer::LEGAL_DRINKING_AGE;
use crate::domain::drink::Drink;
use crate::domain::menu::{MenuItem, PreferenceProfile};
use crate::domain::tags::{intersects, TagSet};
use crate::errors::DomainError;
use crate::fallback::{FallbackScorer, ScoredItem};
use crate::recommendations::recommend_cocktails;

/// Hard filters a route applies before any strategy sees the menu.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuConstraints {
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub max_alcohol_content: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    /// Matched against item allergens.
    #[serde(default, deserialize_with = "crate::domain::tags::deserialize_tags")]
    pub dietary_restrictions: TagSet,
}

impl MenuConstraints {
    /// Adds the profile's age, allergies and dietary restrictions. When both
    /// sides carry an age the younger one applies.
    pub fn merged_with(&self, profile: &PreferenceProfile) -> Self {
        let mut dietary_restrictions = self.dietary_restrictions.clone();
        dietary_restrictions.extend(profile.allergies.iter().cloned());
        dietary_restrictions.extend(profile.dietary_restrictions.iter().cloned());

        Self {
            age: match (self.age, profile.age) {
                (Some(explicit), Some(declared)) => Some(explicit.min(declared)),
                (explicit, declared) => explicit.or(declared),
            },
            max_alcohol_content: self.max_alcohol_content,
            max_price: self.max_price,
            dietary_restrictions,
        }
    }

    fn admits(&self, item: &MenuItem) -> bool {
        if !item.is_available {
            return false;
        }
        if self.age.is_some_and(|age| age < LEGAL_DRINKING_AGE) && item.alcohol().is_some() {
            return false;
        }
        if self.max_alcohol_content.is_some_and(|max| item.alcohol().unwrap_or(0.0) > max) {
            return false;
        }
        if self.max_price.is_some_and(|max| item.price > max) {
            return false;
        }
        !intersects(&self.dietary_restrictions, &item.allergens)
    }
}

/// Keeps available items that pass every constraint, in menu order.
pub fn filter_by_constraints(items: &[MenuItem], constraints: &MenuConstraints) -> Vec<MenuItem> {
    items.iter().filter(|item| constraints.admits(item)).cloned().collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "path", rename_all = "snake_case")]
pub enum ServedBy {
    Primary,
    Fallback { reason: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Served<T> {
    pub value: T,
    pub source: ServedBy,
}

impl<T> Served<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ServedBy::Fallback { .. })
    }
}

pub trait MenuRecommender: Send + Sync {
    fn recommend(
        &self,
        user_id: &str,
        profile: &PreferenceProfile,
        items: &[MenuItem],
        limit: usize,
    ) -> Result<Vec<MenuItem>, DomainError>;

    fn similar(
        &self,
        reference: &MenuItem,
        items: &[MenuItem],
        limit: usize,
    ) -> Result<Vec<MenuItem>, DomainError>;
}

/// The rule engine: legality, safety and the cocktail generator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrimaryRecommender {
    limits: SafetyLimits,
    price_tolerance: f64,
}

impl Default for PrimaryRecommender {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for PrimaryRecommender {
    fn from(config: &AppConfig) -> Self {
        Self::new(SafetyLimits::from(&config.engine), config.fallback.price_tolerance)
    }
}

impl PrimaryRecommender {
    pub fn new(limits: SafetyLimits, price_tolerance: f64) -> Self {
        Self { limits, price_tolerance }
    }
}

impl MenuRecommender for PrimaryRecommender {
    fn recommend(
        &self,
        user_id: &str,
        profile: &PreferenceProfile,
        items: &[MenuItem],
        limit: usize,
    ) -> Result<Vec<MenuItem>, DomainError> {
        if profile.preferred_flavors.is_empty() {
            return Err(DomainError::MissingField("preferred_flavors"));
        }
        if let Some(range) = profile.preferred_price_range.filter(|range| !range.is_well_formed()) {
            return Err(DomainError::InvalidRequest(format!(
                "price range {}..{} is inverted",
                range.min, range.max
            )));
        }

        let drinks = items.iter().map(Drink::try_from).collect::<Result<Vec<_>, _>>()?;
        let customer = profile.to_customer(user_id);

        let legal = filter_legal(&customer, &drinks);
        let safe = filter_safe(&customer, &legal, &[], self.limits);
        let picked: HashSet<String> = recommend_cocktails(&customer, &safe).into_iter().collect();

        Ok(items
            .iter()
            .filter(|item| picked.contains(item.name.trim()))
            .take(limit)
            .cloned()
            .collect())
    }

    fn similar(
        &self,
        reference: &MenuItem,
        items: &[MenuItem],
        limit: usize,
    ) -> Result<Vec<MenuItem>, DomainError> {
        if reference.flavor_profile.is_empty() {
            return Err(DomainError::MissingField("flavor_profile"));
        }
        if !reference.price.is_finite() || reference.price <= 0.0 {
            return Err(DomainError::InvalidRequest(format!(
                "reference item {} has non-positive price {}",
                reference.id, reference.price
            )));
        }

        let profile = PreferenceProfile::from_reference(reference, self.price_tolerance);
        let others: Vec<MenuItem> =
            items.iter().filter(|item| item.id != reference.id).cloned().collect();
        self.recommend(&format!("similar-to-{}", reference.id), &profile, &others, limit)
    }
}

/// Additive scoring over raw rows. Never fails.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FallbackRecommender {
    scorer: FallbackScorer,
}

impl From<&FallbackConfig> for FallbackRecommender {
    fn from(config: &FallbackConfig) -> Self {
        Self { scorer: FallbackScorer::from(config) }
    }
}

impl MenuRecommender for FallbackRecommender {
    fn recommend(
        &self,
        _user_id: &str,
        profile: &PreferenceProfile,
        items: &[MenuItem],
        limit: usize,
    ) -> Result<Vec<MenuItem>, DomainError> {
        Ok(served_scores("personalized", self.scorer.rank_by_preferences(profile, items), limit))
    }

    fn similar(
        &self,
        reference: &MenuItem,
        items: &[MenuItem],
        limit: usize,
    ) -> Result<Vec<MenuItem>, DomainError> {
        Ok(served_scores("similar", self.scorer.rank_by_similarity(reference, items), limit))
    }
}

fn served_scores(
    operation: &'static str,
    ranked: Vec<ScoredItem<'_>>,
    limit: usize,
) -> Vec<MenuItem> {
    ranked
        .into_iter()
        .take(limit)
        .map(|scored| {
            let breakdown = scored.breakdown;
            tracing::debug!(
                event_name = "service.fallback.scored",
                operation,
                item_id = scored.item.id,
                score = breakdown.total(),
                category = breakdown.category,
                flavor = breakdown.flavor,
                price = breakdown.price,
                alcohol = breakdown.alcohol,
                reasoning = %breakdown.reasoning().join("; "),
                "fallback item scored"
            );
            scored.item.clone()
        })
        .collect()
}

pub struct RecommendationService<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> RecommendationService<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl Default for RecommendationService<PrimaryRecommender, FallbackRecommender> {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl RecommendationService<PrimaryRecommender, FallbackRecommender> {
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(PrimaryRecommender::from(config), FallbackRecommender::from(&config.fallback))
    }
}

impl<P, F> RecommendationService<P, F>
where
    P: MenuRecommender,
    F: MenuRecommender,
{
    pub fn personalized(
        &self,
        user_id: &str,
        profile: &PreferenceProfile,
        items: &[MenuItem],
        constraints: &MenuConstraints,
        limit: usize,
    ) -> Served<Vec<MenuItem>> {
        let eligible = filter_by_constraints(items, &constraints.merged_with(profile));

        let served = match self.primary.recommend(user_id, profile, &eligible, limit) {
            Ok(value) => Served { value, source: ServedBy::Primary },
            Err(error) => {
                fallback_engaged("personalized", &error);
                let value = self
                    .fallback
                    .recommend(user_id, profile, &eligible, limit)
                    .unwrap_or_default();
                Served { value, source: ServedBy::Fallback { reason: error.to_string() } }
            }
        };

        request_served("personalized", &served);
        served
    }

    pub fn similar(
        &self,
        reference: &MenuItem,
        items: &[MenuItem],
        limit: usize,
    ) -> Served<Vec<MenuItem>> {
        let eligible = filter_by_constraints(items, &MenuConstraints::default());

        let served = match self.primary.similar(reference, &eligible, limit) {
            Ok(value) => Served { value, source: ServedBy::Primary },
            Err(error) => {
                fallback_engaged("similar", &error);
                let value = self.fallback.similar(reference, &eligible, limit).unwrap_or_default();
                Served { value, source: ServedBy::Fallback { reason: error.to_string() } }
            }
        };

        request_served("similar", &served);
        served
    }
}

fn fallback_engaged(operation: &'static str, error: &DomainError) {
    tracing::warn!(
        event_name = "service.fallback.engaged",
        operation,
        reason_code = error.code(),
        error = %error,
        "primary recommender failed, serving fallback"
    );
}

fn request_served(operation: &'static str, served: &Served<Vec<MenuItem>>) {
    tracing::info!(
        event_name = "service.request.served",
        operation,
        fallback = served.is_fallback(),
        count = served.value.len(),
        "recommendations served"
    );
}
