use crate::config::EngineConfig;
use crate::domain::customer::Customer;
use crate::domain::drink::Drink;
use crate::domain::history::{FeedbackHistory, RejectionHistory};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SatisfactionPolicy {
    pub min_rating: f64,
    /// Rating given to drinks without feedback.
    pub default_rating: f64,
    /// Amount the threshold drops by in the single relaxation pass.
    pub relaxation_step: f64,
    /// Fewer survivors than this triggers the relaxation pass.
    pub min_results: usize,
}

impl Default for SatisfactionPolicy {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

impl From<&EngineConfig> for SatisfactionPolicy {
    fn from(config: &EngineConfig) -> Self {
        Self {
            min_rating: config.min_rating,
            default_rating: config.default_rating,
            relaxation_step: config.rating_relaxation_step,
            min_results: config.min_satisfied_results,
        }
    }
}

impl SatisfactionPolicy {
    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = min_rating;
        self
    }
}

/// Removes rejected drinks and keeps well-rated ones. When too few survive,
/// the threshold is lowered once and the rejection-filtered set re-checked.
pub fn filter_by_satisfaction<'a>(
    customer: &Customer,
    candidates: &[&'a Drink],
    feedback: &FeedbackHistory,
    rejections: &RejectionHistory,
    policy: SatisfactionPolicy,
) -> Vec<&'a Drink> {
    let not_rejected: Vec<&'a Drink> =
        candidates.iter().copied().filter(|drink| !rejections.contains(drink.name())).collect();

    let rating_of =
        |drink: &Drink| feedback.get(drink.name()).copied().unwrap_or(policy.default_rating);
    let rated_at_least = |threshold: f64| -> Vec<&'a Drink> {
        not_rejected.iter().copied().filter(|drink| rating_of(*drink) >= threshold).collect()
    };

    let rated = rated_at_least(policy.min_rating);
    if rated.len() >= policy.min_results {
        return rated;
    }

    let relaxed_threshold = policy.min_rating - policy.relaxation_step;
    tracing::debug!(
        event_name = "engine.satisfaction.relaxed",
        customer_id = customer.id.0.as_str(),
        strict_count = rated.len(),
        relaxed_threshold,
        "too few well-rated drinks, relaxing rating threshold once"
    );
    rated_at_least(relaxed_threshold)
}
