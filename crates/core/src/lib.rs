pub mod agent;
pub mod config;
pub mod constraints;
pub mod domain;
pub mod errors;
pub mod fallback;
pub mod ranking;
pub mod recommendations;
pub mod service;

pub use agent::{Agent, RecommendationRequest};
pub use config::{AppConfig, ConfigError, LoadOptions};
pub use constraints::{
    evaluate_constraints, legality_filter, safety_filter, ConstraintResult, ConstraintViolation,
    SafetyLimits,
};
pub use domain::bundle::{
    ComboDefinition, ComboRecommendation, PackageDefinition, PackageRecommendation,
};
pub use domain::customer::{
    AlcoholPreference, Customer, CustomerId, Preferences, PriceRange, Restrictions,
    LEGAL_DRINKING_AGE,
};
pub use domain::drink::{Drink, DrinkCategory};
pub use domain::history::ConsumptionRecord;
pub use domain::menu::{MenuItem, PreferenceProfile};
pub use errors::{ApplicationError, DomainError};
pub use fallback::{FallbackScorer, ScoreBreakdown};
pub use recommendations::{RecommendationCategory, Recommendations, Season};
pub use service::{
    filter_by_constraints, FallbackRecommender, MenuConstraints, MenuRecommender,
    PrimaryRecommender, RecommendationService, Served, ServedBy,
};
