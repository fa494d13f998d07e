use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::tags::{deserialize_tags, intersects, tag_set, TagSet};
use crate::errors::DomainError;

/// Name prefix marking the non-alcoholic variant of a menu item.
pub const VIRGIN_PREFIX: &str = "Virgin";

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DrinkCategory {
    Cocktail,
    Mocktail,
    Beer,
    Wine,
    Spirit,
    Other(String),
}

impl From<&str> for DrinkCategory {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "cocktail" => Self::Cocktail,
            "mocktail" => Self::Mocktail,
            "beer" => Self::Beer,
            "wine" => Self::Wine,
            "spirit" => Self::Spirit,
            _ => Self::Other(value.trim().to_owned()),
        }
    }
}

impl From<String> for DrinkCategory {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<DrinkCategory> for String {
    fn from(value: DrinkCategory) -> Self {
        value.as_str().to_owned()
    }
}

impl DrinkCategory {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cocktail => "cocktail",
            Self::Mocktail => "mocktail",
            Self::Beer => "beer",
            Self::Wine => "wine",
            Self::Spirit => "spirit",
            Self::Other(other) => other,
        }
    }
}

impl fmt::Display for DrinkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A menu item. Values are validated at construction and never change afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DrinkRecord", into = "DrinkRecord")]
pub struct Drink {
    name: String,
    category: DrinkCategory,
    abv: f64,
    flavors: TagSet,
    price: f64,
    allergens: TagSet,
}

impl Drink {
    pub fn new<I, S>(
        name: impl Into<String>,
        category: impl Into<DrinkCategory>,
        abv: f64,
        flavors: I,
        price: f64,
    ) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(DomainError::invalid_drink("<blank>", "name must not be blank"));
        }
        if !abv.is_finite() || abv < 0.0 {
            return Err(DomainError::invalid_drink(name, format!("abv must be >= 0, got {abv}")));
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(DomainError::invalid_drink(
                name,
                format!("price must be positive, got {price}"),
            ));
        }

        Ok(Self {
            name,
            category: category.into(),
            abv,
            flavors: tag_set(flavors),
            price,
            allergens: TagSet::new(),
        })
    }

    pub fn with_allergens<I, S>(mut self, allergens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allergens = tag_set(allergens);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &DrinkCategory {
        &self.category
    }

    pub fn abv(&self) -> f64 {
        self.abv
    }

    pub fn flavors(&self) -> &TagSet {
        &self.flavors
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn allergens(&self) -> &TagSet {
        &self.allergens
    }

    pub fn is_alcoholic(&self) -> bool {
        self.abv > 0.0
    }

    pub fn is_virgin_variant(&self) -> bool {
        self.name.starts_with(VIRGIN_PREFIX)
    }

    pub fn shares_flavor_with(&self, wanted: &TagSet) -> bool {
        intersects(&self.flavors, wanted)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct DrinkRecord {
    name: String,
    category: DrinkCategory,
    #[serde(default)]
    abv: f64,
    #[serde(default, alias = "flavor_profile", deserialize_with = "deserialize_tags")]
    flavors: TagSet,
    price: f64,
    #[serde(default, deserialize_with = "deserialize_tags")]
    allergens: TagSet,
}

impl TryFrom<DrinkRecord> for Drink {
    type Error = DomainError;

    fn try_from(record: DrinkRecord) -> Result<Self, Self::Error> {
        Ok(Drink::new(record.name, record.category, record.abv, record.flavors, record.price)?
            .with_allergens(record.allergens))
    }
}

impl From<Drink> for DrinkRecord {
    fn from(drink: Drink) -> Self {
        Self {
            name: drink.name,
            category: drink.category,
            abv: drink.abv,
            flavors: drink.flavors,
            price: drink.price,
            allergens: drink.allergens,
        }
    }
}
