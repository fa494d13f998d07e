//! Recommendation orchestrator.
//!
//! Runs the constraint filters and business re-rankers once, in a fixed
//! order, and hands the surviving candidates to every applicable generator.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::constraints::{filter_legal, filter_safe, SafetyLimits};
use crate::domain::bundle::{ComboDefinition, PackageDefinition};
use crate::domain::customer::Customer;
use crate::domain::drink::Drink;
use crate::domain::history::{
    BrandPriorities, ConsumptionRecord, CostTable, FeedbackHistory, Inventory, RejectionHistory,
};
use crate::errors::DomainError;
use crate::ranking::{
    filter_by_satisfaction, optimize_profit, rank_by_brand, ProfitPolicy, SatisfactionPolicy,
};
use crate::recommendations::{
    index_catalog, recommend_by_inventory, recommend_cocktails, recommend_combos,
    recommend_group_packages, recommend_seasonal, Recommendations,
};

fn default_group_size() -> u32 {
    1
}

/// Everything one recommendation run needs. The engine keeps no state
/// between requests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub customer: Customer,
    /// Full menu snapshot. Names are unique within a request.
    pub drinks: Vec<Drink>,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub costs: CostTable,
    #[serde(default)]
    pub brand_priorities: BrandPriorities,
    /// Average rating per drink name.
    #[serde(default)]
    pub feedback: FeedbackHistory,
    /// Drinks the customer recently turned down.
    #[serde(default)]
    pub rejections: RejectionHistory,
    #[serde(default)]
    pub consumption_history: Vec<ConsumptionRecord>,
    #[serde(default)]
    pub combos: Option<Vec<ComboDefinition>>,
    #[serde(default)]
    pub packages: Option<Vec<PackageDefinition>>,
    #[serde(default = "default_group_size")]
    pub group_size: u32,
    #[serde(default)]
    pub season: Option<String>,
}

impl RecommendationRequest {
    pub fn new(customer: Customer, drinks: Vec<Drink>) -> Self {
        Self {
            customer,
            drinks,
            inventory: Inventory::new(),
            costs: CostTable::new(),
            brand_priorities: BrandPriorities::new(),
            feedback: FeedbackHistory::new(),
            rejections: RejectionHistory::new(),
            consumption_history: Vec::new(),
            combos: None,
            packages: None,
            group_size: default_group_size(),
            season: None,
        }
    }

    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn with_costs(mut self, costs: CostTable) -> Self {
        self.costs = costs;
        self
    }

    pub fn with_brand_priorities(mut self, priorities: BrandPriorities) -> Self {
        self.brand_priorities = priorities;
        self
    }

    pub fn with_feedback(mut self, feedback: FeedbackHistory) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn with_rejections<I, S>(mut self, rejections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rejections = rejections.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_consumption_history(mut self, history: Vec<ConsumptionRecord>) -> Self {
        self.consumption_history = history;
        self
    }

    pub fn with_combos(mut self, combos: Vec<ComboDefinition>) -> Self {
        self.combos = Some(combos);
        self
    }

    pub fn with_packages(mut self, packages: Vec<PackageDefinition>, group_size: u32) -> Self {
        self.packages = Some(packages);
        self.group_size = group_size;
        self
    }

    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = Some(season.into());
        self
    }

    /// Rejects duplicate drink names. Package ranges are checked by the
    /// package generator, which skips inverted ones.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::with_capacity(self.drinks.len());
        if let Some(duplicate) = self.drinks.iter().find(|drink| !seen.insert(drink.name())) {
            return Err(DomainError::InvalidRequest(format!(
                "drink `{}` appears more than once",
                duplicate.name()
            )));
        }

        Ok(())
    }

    fn active_season(&self) -> Option<&str> {
        self.season.as_deref().map(str::trim).filter(|season| !season.is_empty())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Agent {
    config: EngineConfig,
}

impl Agent {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs legality, safety, brand, profit and satisfaction in that order,
    /// then every generator the request asks for.
    pub fn get_recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Recommendations, DomainError> {
        request.validate()?;
        let customer = &request.customer;

        let legal = filter_legal(customer, &request.drinks);
        stage_completed(customer, "legality", legal.len());

        let safe = filter_safe(
            customer,
            &legal,
            &request.consumption_history,
            SafetyLimits::from(&self.config),
        );
        stage_completed(customer, "safety", safe.len());

        let branded = rank_by_brand(&safe, &request.brand_priorities);
        stage_completed(customer, "brand", branded.len());

        let profitable = optimize_profit(
            &branded,
            &request.costs,
            &request.inventory,
            ProfitPolicy::from(&self.config),
        );
        stage_completed(customer, "profit", profitable.len());

        let candidates = filter_by_satisfaction(
            customer,
            &profitable,
            &request.feedback,
            &request.rejections,
            SatisfactionPolicy::from(&self.config),
        );
        stage_completed(customer, "satisfaction", candidates.len());

        let catalog = index_catalog(&request.drinks);
        let recommendations = Recommendations {
            cocktails: recommend_cocktails(customer, &candidates),
            inventory_based: recommend_by_inventory(
                customer,
                &candidates,
                &request.inventory,
                self.config.min_stock,
            ),
            seasonal: request
                .active_season()
                .map(|season| recommend_seasonal(customer, &candidates, season)),
            combos: request
                .combos
                .as_deref()
                .filter(|combos| !combos.is_empty())
                .map(|combos| recommend_combos(customer, &catalog, combos)),
            group_packages: request
                .packages
                .as_deref()
                .filter(|packages| !packages.is_empty() && request.group_size > 1)
                .map(|packages| {
                    recommend_group_packages(request.group_size, customer, &catalog, packages)
                }),
        };

        tracing::debug!(
            event_name = "engine.recommendations.assembled",
            customer_id = customer.id.0.as_str(),
            categories = recommendations.categories().len(),
            "recommendations assembled"
        );
        Ok(recommendations)
    }
}

fn stage_completed(customer: &Customer, stage: &'static str, remaining: usize) {
    tracing::debug!(
        event_name = "engine.stage.completed",
        customer_id = customer.id.0.as_str(),
        stage,
        remaining,
        "pipeline stage completed"
    );
}
