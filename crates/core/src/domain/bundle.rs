use serde::{Deserialize, Serialize};

use crate::domain::tags::{deserialize_tags, tag_set, TagSet};

fn default_min_size() -> u32 {
    1
}

/// A named set of drinks sold together at a single price.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComboDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub drinks: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub allergens: TagSet,
    #[serde(default)]
    pub price: f64,
}

impl ComboDefinition {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            drinks: Vec::new(),
            allergens: TagSet::new(),
            price,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_drinks<I, S>(mut self, drinks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drinks = drinks.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_allergens<I, S>(mut self, allergens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allergens = tag_set(allergens);
        self
    }
}

/// A bundle sized for groups. `max_size = None` means no upper bound.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackageDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub drinks: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub allergens: TagSet,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_min_size")]
    pub min_size: u32,
    #[serde(default)]
    pub max_size: Option<u32>,
    #[serde(default)]
    pub serves: Option<u32>,
}

impl PackageDefinition {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            drinks: Vec::new(),
            allergens: TagSet::new(),
            price,
            min_size: default_min_size(),
            max_size: None,
            serves: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_drinks<I, S>(mut self, drinks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drinks = drinks.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_allergens<I, S>(mut self, allergens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allergens = tag_set(allergens);
        self
    }

    pub fn with_group_range(mut self, min_size: u32, max_size: Option<u32>) -> Self {
        self.min_size = min_size;
        self.max_size = max_size;
        self
    }

    pub fn with_serves(mut self, serves: u32) -> Self {
        self.serves = Some(serves);
        self
    }

    pub fn fits_group(&self, group_size: u32) -> bool {
        self.min_size <= group_size && self.max_size.map_or(true, |max| group_size <= max)
    }

    pub fn has_valid_range(&self) -> bool {
        self.max_size.map_or(true, |max| self.min_size <= max)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComboRecommendation {
    pub name: String,
    pub description: String,
    pub price: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackageRecommendation {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub serves: u32,
}

#[cfg(test)]
mod tests {
    use super::PackageDefinition;

    #[test]
    fn group_range_is_inclusive_and_open_ended_by_default() {
        let bounded = PackageDefinition::new("Party Pitchers", 60.0).with_group_range(4, Some(8));
        assert!(bounded.fits_group(4));
        assert!(bounded.fits_group(8));
        assert!(!bounded.fits_group(3));
        assert!(!bounded.fits_group(9));

        let open = PackageDefinition::new("Open Bar", 300.0).with_group_range(10, None);
        assert!(open.fits_group(250));
        assert!(!open.fits_group(9));
    }

    #[test]
    fn missing_size_fields_take_defaults() -> Result<(), serde_json::Error> {
        let package: PackageDefinition =
            serde_json::from_str(r#"{"name": "Duo", "price": 20.0, "allergens": "dairy"}"#)?;

        assert_eq!(package.min_size, 1);
        assert_eq!(package.max_size, None);
        assert!(package.allergens.contains("dairy"));
        assert!(package.has_valid_range());
        Ok(())
    }
}
