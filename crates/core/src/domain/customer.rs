use serde::{Deserialize, Serialize};

use crate::domain::drink::DrinkCategory;
use crate::domain::tags::{deserialize_tags, intersects, tag_set, TagSet};

/// Minimum age for being served any drink with abv above zero.
pub const LEGAL_DRINKING_AGE: u32 = 21;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub String);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlcoholPreference {
    Low,
    Medium,
    High,
    #[default]
    Any,
}

impl AlcoholPreference {
    /// Whether an alcohol content falls inside this band.
    ///
    /// Bands: low `(0, 5]`, medium `(5, 12]`, high `(12, inf)`. Missing or zero
    /// alcohol content never matches a band, and `Any` matches nothing because
    /// it expresses no preference to reward.
    pub fn matches(&self, alcohol_content: Option<f64>) -> bool {
        let Some(abv) = alcohol_content.filter(|abv| *abv > 0.0) else {
            return false;
        };

        match self {
            Self::Low => abv <= 5.0,
            Self::Medium => abv > 5.0 && abv <= 12.0,
            Self::High => abv > 12.0,
            Self::Any => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }

    pub fn is_well_formed(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, alias = "flavor", deserialize_with = "deserialize_tags")]
    pub flavors: TagSet,
    #[serde(default, alias = "category")]
    pub categories: Vec<DrinkCategory>,
    #[serde(default)]
    pub price_range: Option<PriceRange>,
    #[serde(default)]
    pub alcohol: AlcoholPreference,
}

impl Preferences {
    pub fn with_flavors<I, S>(mut self, flavors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.flavors = tag_set(flavors);
        self
    }

    pub fn with_categories<I, C>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<DrinkCategory>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_price_range(mut self, range: PriceRange) -> Self {
        self.price_range = Some(range);
        self
    }

    pub fn with_alcohol(mut self, alcohol: AlcoholPreference) -> Self {
        self.alcohol = alcohol;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Restrictions {
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub allergies: TagSet,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub dietary: TagSet,
}

impl Restrictions {
    pub fn with_allergies<I, S>(mut self, allergies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allergies = tag_set(allergies);
        self
    }

    pub fn with_dietary<I, S>(mut self, dietary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.dietary = tag_set(dietary);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub age: u32,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub restrictions: Restrictions,
}

impl Customer {
    pub fn new(id: impl Into<String>, age: u32) -> Self {
        Self {
            id: CustomerId(id.into()),
            age,
            preferences: Preferences::default(),
            restrictions: Restrictions::default(),
        }
    }

    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn with_restrictions(mut self, restrictions: Restrictions) -> Self {
        self.restrictions = restrictions;
        self
    }

    pub fn is_underage(&self) -> bool {
        self.age < LEGAL_DRINKING_AGE
    }

    /// True when any of the customer's allergies appears in `allergens`.
    pub fn is_allergic_to(&self, allergens: &TagSet) -> bool {
        intersects(&self.restrictions.allergies, allergens)
    }
}
