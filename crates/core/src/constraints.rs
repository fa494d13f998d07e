//! Hard legal and safety constraints. A violation always excludes the drink.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::domain::customer::Customer;
use crate::domain::drink::Drink;
use crate::domain::history::{recent_alcohol_units, ConsumptionRecord};

pub const UNDERAGE_ALCOHOL: &str = "UNDERAGE_ALCOHOL";
pub const ALLERGEN_CONFLICT: &str = "ALLERGEN_CONFLICT";
pub const OVER_SERVICE_HIGH_PROOF: &str = "OVER_SERVICE_HIGH_PROOF";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintViolation {
    pub code: String,
    pub message: String,
    pub suggestion: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintResult {
    pub valid: bool,
    pub violations: Vec<ConstraintViolation>,
}

impl Default for ConstraintResult {
    fn default() -> Self {
        Self { valid: true, violations: Vec::new() }
    }
}

/// Over-service guard: once a customer has had more than
/// `max_recent_alcohol_units`, nothing above `high_proof_abv` is served.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SafetyLimits {
    pub max_recent_alcohol_units: f64,
    pub high_proof_abv: f64,
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

impl From<&EngineConfig> for SafetyLimits {
    fn from(config: &EngineConfig) -> Self {
        Self {
            max_recent_alcohol_units: config.max_recent_alcohol_units,
            high_proof_abv: config.high_proof_abv,
        }
    }
}

pub fn check_legality(customer: &Customer, drink: &Drink) -> Option<ConstraintViolation> {
    (customer.is_underage() && drink.is_alcoholic()).then(|| ConstraintViolation {
        code: UNDERAGE_ALCOHOL.to_string(),
        message: format!(
            "{} contains alcohol ({}% abv) and customer is {}",
            drink.name(),
            drink.abv(),
            customer.age
        ),
        suggestion: Some("Offer a non-alcoholic variant".to_string()),
    })
}

pub fn check_safety(
    customer: &Customer,
    drink: &Drink,
    recent_units: f64,
    limits: SafetyLimits,
) -> Vec<ConstraintViolation> {
    let mut violations = Vec::new();

    if customer.is_allergic_to(drink.allergens()) {
        let conflicts: Vec<&str> = customer
            .restrictions
            .allergies
            .intersection(drink.allergens())
            .map(String::as_str)
            .collect();
        violations.push(ConstraintViolation {
            code: ALLERGEN_CONFLICT.to_string(),
            message: format!("{} contains {}", drink.name(), conflicts.join(", ")),
            suggestion: Some("Choose a drink without these allergens".to_string()),
        });
    }

    if recent_units > limits.max_recent_alcohol_units && drink.abv() > limits.high_proof_abv {
        violations.push(ConstraintViolation {
            code: OVER_SERVICE_HIGH_PROOF.to_string(),
            message: format!(
                "{} is {}% abv after {recent_units} recent alcohol units",
                drink.name(),
                drink.abv()
            ),
            suggestion: Some("Suggest a lower-proof drink".to_string()),
        });
    }

    violations
}

pub fn evaluate_constraints(
    customer: &Customer,
    drink: &Drink,
    consumption_history: &[ConsumptionRecord],
    limits: SafetyLimits,
) -> ConstraintResult {
    let mut result = ConstraintResult::default();
    result.violations.extend(check_legality(customer, drink));
    result.violations.extend(check_safety(
        customer,
        drink,
        recent_alcohol_units(consumption_history),
        limits,
    ));
    result.valid = result.violations.is_empty();
    result
}

/// False iff the customer is under the legal drinking age and the drink contains alcohol.
pub fn legality_filter(customer: &Customer, drink: &Drink) -> bool {
    check_legality(customer, drink).is_none()
}

/// False on any allergen conflict or when the over-service guard applies.
pub fn safety_filter(
    customer: &Customer,
    drink: &Drink,
    consumption_history: &[ConsumptionRecord],
) -> bool {
    let recent_units = recent_alcohol_units(consumption_history);
    check_safety(customer, drink, recent_units, SafetyLimits::default()).is_empty()
}

pub fn filter_legal<'a>(customer: &Customer, drinks: &'a [Drink]) -> Vec<&'a Drink> {
    drinks.iter().filter(|drink| legality_filter(customer, drink)).collect()
}

pub fn filter_safe<'a>(
    customer: &Customer,
    candidates: &[&'a Drink],
    consumption_history: &[ConsumptionRecord],
    limits: SafetyLimits,
) -> Vec<&'a Drink> {
    let recent_units = recent_alcohol_units(consumption_history);
    candidates
        .iter()
        .copied()
        .filter(|drink| {
            let violations = check_safety(customer, drink, recent_units, limits);
            for violation in &violations {
                tracing::debug!(
                    event_name = "engine.constraint.excluded",
                    drink = drink.name(),
                    code = violation.code.as_str(),
                    "{}",
                    violation.message
                );
            }
            violations.is_empty()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        evaluate_constraints, filter_legal, filter_safe, legality_filter, safety_filter,
        SafetyLimits, ALLERGEN_CONFLICT, OVER_SERVICE_HIGH_PROOF, UNDERAGE_ALCOHOL,
    };
    use crate::domain::customer::{Customer, Restrictions};
    use crate::domain::drink::Drink;
    use crate::domain::history::ConsumptionRecord;
    use crate::errors::DomainError;

    fn menu() -> Result<Vec<Drink>, DomainError> {
        Ok(vec![
            Drink::new("Sweet Martini", "cocktail", 20.0, ["sweet", "fruity"], 14.99)?,
            Drink::new("Nutty Alexander", "cocktail", 15.0, ["sweet", "nutty"], 13.99)?
                .with_allergens(["nuts"]),
            Drink::new("Virgin Smoothie", "mocktail", 0.0, ["sweet", "fruity"], 8.99)?,
            Drink::new("Cask Strength", "spirit", 58.0, ["smoky"], 18.0)?,
        ])
    }

    #[test]
    fn underage_customers_only_pass_non_alcoholic_drinks() -> Result<(), DomainError> {
        let drinks = menu()?;
        let minor = Customer::new("C002", 18);

        let legal: Vec<&str> = filter_legal(&minor, &drinks).iter().map(|d| d.name()).collect();
        assert_eq!(legal, vec!["Virgin Smoothie"]);

        let adult = Customer::new("C001", 21);
        assert!(drinks.iter().all(|drink| legality_filter(&adult, drink)));
        Ok(())
    }

    #[test]
    fn allergen_conflicts_are_excluded() -> Result<(), DomainError> {
        let drinks = menu()?;
        let customer = Customer::new("C003", 30)
            .with_restrictions(Restrictions::default().with_allergies(["nuts"]));

        assert!(!safety_filter(&customer, &drinks[1], &[]));
        assert!(safety_filter(&customer, &drinks[0], &[]));

        let result = evaluate_constraints(&customer, &drinks[1], &[], SafetyLimits::default());
        assert!(!result.valid);
        assert_eq!(result.violations[0].code, ALLERGEN_CONFLICT);
        Ok(())
    }

    #[test]
    fn high_proof_is_blocked_only_after_over_service_threshold() -> Result<(), DomainError> {
        let drinks = menu()?;
        let customer = Customer::new("C004", 40);
        let moderate = vec![ConsumptionRecord::with_alcohol_units(3.0)];
        let heavy = vec![
            ConsumptionRecord::with_alcohol_units(2.0),
            ConsumptionRecord::with_alcohol_units(1.5),
        ];

        assert!(safety_filter(&customer, &drinks[3], &moderate));
        assert!(!safety_filter(&customer, &drinks[3], &heavy));
        assert!(safety_filter(&customer, &drinks[0], &heavy));

        let candidates: Vec<&Drink> = drinks.iter().collect();
        let safe = filter_safe(&customer, &candidates, &heavy, SafetyLimits::default());
        assert_eq!(safe.len(), 3);
        assert!(safe.iter().all(|drink| drink.name() != "Cask Strength"));

        let result = evaluate_constraints(&customer, &drinks[3], &heavy, SafetyLimits::default());
        assert_eq!(result.violations[0].code, OVER_SERVICE_HIGH_PROOF);
        Ok(())
    }

    #[test]
    fn drinks_at_exactly_the_high_proof_limit_are_still_served() -> Result<(), DomainError> {
        let at_limit = Drink::new("Navy Gimlet", "cocktail", 30.0, ["citrus"], 13.0)?;
        let just_over = Drink::new("Overproof Gimlet", "cocktail", 30.5, ["citrus"], 14.0)?;
        let customer = Customer::new("C006", 45);
        let heavy = vec![ConsumptionRecord::with_alcohol_units(4.0)];

        assert!(safety_filter(&customer, &at_limit, &heavy));
        assert!(!safety_filter(&customer, &just_over, &heavy));
        assert!(
            evaluate_constraints(&customer, &at_limit, &heavy, SafetyLimits::default()).valid
        );
        Ok(())
    }

    #[test]
    fn violations_accumulate_across_checks() -> Result<(), DomainError> {
        let drink =
            Drink::new("Amaretto Sour", "cocktail", 35.0, ["nutty"], 12.0)?.with_allergens(["nuts"]);
        let minor = Customer::new("C005", 19)
            .with_restrictions(Restrictions::default().with_allergies(["nuts"]));
        let heavy = vec![ConsumptionRecord::with_alcohol_units(5.0)];

        let result = evaluate_constraints(&minor, &drink, &heavy, SafetyLimits::default());
        let codes: Vec<&str> = result.violations.iter().map(|v| v.code.as_str()).collect();
        assert_eq!(codes, vec![UNDERAGE_ALCOHOL, ALLERGEN_CONFLICT, OVER_SERVICE_HIGH_PROOF]);
        Ok(())
    }
}
