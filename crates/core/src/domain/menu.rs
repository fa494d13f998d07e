use serde::{Deserialize, Serialize};

use crate::domain::customer::{
    AlcoholPreference, Customer, Preferences, PriceRange, Restrictions, LEGAL_DRINKING_AGE,
};
use crate::domain::drink::{Drink, DrinkCategory};
use crate::domain::tags::{deserialize_tags, TagSet};
use crate::errors::DomainError;

fn default_available() -> bool {
    true
}

/// A menu row as stored by the ordering service. The fallback scorer reads
/// these rows directly, so a row need not convert into a valid [`Drink`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub alcohol_content: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub flavor_profile: TagSet,
    #[serde(default)]
    pub price: f64,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub allergens: TagSet,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

impl MenuItem {
    /// Alcohol content when present and above zero.
    pub fn alcohol(&self) -> Option<f64> {
        self.alcohol_content.filter(|abv| *abv > 0.0)
    }

    pub fn category(&self) -> DrinkCategory {
        DrinkCategory::from(self.category.as_str())
    }
}

impl TryFrom<&MenuItem> for Drink {
    type Error = DomainError;

    fn try_from(item: &MenuItem) -> Result<Self, Self::Error> {
        Ok(Drink::new(
            item.name.as_str(),
            item.category(),
            item.alcohol_content.unwrap_or(0.0),
            &item.flavor_profile,
            item.price,
        )?
        .with_allergens(&item.allergens))
    }
}

/// Structured preferences supplied with a service-level request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceProfile {
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub preferred_categories: Vec<DrinkCategory>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub preferred_flavors: TagSet,
    #[serde(default)]
    pub preferred_price_range: Option<PriceRange>,
    #[serde(default)]
    pub alcohol_preference: AlcoholPreference,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub allergies: TagSet,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub dietary_restrictions: TagSet,
}

impl PreferenceProfile {
    /// Builds the engine-side customer. Unknown age defaults to the legal drinking age.
    pub fn to_customer(&self, customer_id: impl Into<String>) -> Customer {
        Customer::new(customer_id, self.age.unwrap_or(LEGAL_DRINKING_AGE))
            .with_preferences(Preferences {
                flavors: self.preferred_flavors.clone(),
                categories: self.preferred_categories.clone(),
                price_range: self.preferred_price_range,
                alcohol: self.alcohol_preference,
            })
            .with_restrictions(Restrictions {
                allergies: self.allergies.clone(),
                dietary: self.dietary_restrictions.clone(),
            })
    }

    /// Preferences that make a reference item's look-alikes score well.
    pub fn from_reference(reference: &MenuItem, price_tolerance: f64) -> Self {
        Self {
            age: Some(LEGAL_DRINKING_AGE),
            preferred_categories: vec![reference.category()],
            preferred_flavors: reference.flavor_profile.clone(),
            preferred_price_range: Some(PriceRange::new(
                reference.price * (1.0 - price_tolerance),
                reference.price * (1.0 + price_tolerance),
            )),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MenuItem, PreferenceProfile};
    use crate::domain::customer::LEGAL_DRINKING_AGE;
    use crate::domain::drink::{Drink, DrinkCategory};

    fn row(json: &str) -> MenuItem {
        match serde_json::from_str(json) {
            Ok(item) => item,
            Err(error) => panic!("fixture should parse: {error}"),
        }
    }

    #[test]
    fn menu_rows_convert_into_drinks() {
        let item = row(
            r#"{"id": 7, "name": "Margarita", "category": "cocktail", "alcohol_content": 15.0,
                "flavor_profile": "citrus,sour", "price": 11.99, "allergens": null}"#,
        );

        let drink = Drink::try_from(&item);
        assert!(matches!(drink, Ok(ref d) if d.category() == &DrinkCategory::Cocktail));
        assert!(item.is_available);
    }

    #[test]
    fn malformed_rows_fail_conversion() {
        let item = row(r#"{"id": 8, "name": "Half Pour", "category": "beer", "price": 0.0}"#);
        assert!(Drink::try_from(&item).is_err());
    }

    #[test]
    fn missing_age_defaults_to_legal_age() {
        let customer = PreferenceProfile::default().to_customer("42");
        assert_eq!(customer.age, LEGAL_DRINKING_AGE);
    }

    #[test]
    fn reference_profile_spans_price_tolerance() {
        let item = row(
            r#"{"id": 1, "name": "Mojito", "category": "cocktail", "alcohol_content": 12.0,
                "flavor_profile": ["minty", "sweet"], "price": 10.0}"#,
        );
        let profile = PreferenceProfile::from_reference(&item, 0.2);

        let range = profile.preferred_price_range.unwrap_or_else(|| panic!("range expected"));
        assert!((range.min - 8.0).abs() < 1e-9);
        assert!((range.max - 12.0).abs() < 1e-9);
        assert_eq!(profile.preferred_categories, vec![DrinkCategory::Cocktail]);
    }
}
