//! Tag normalization shared by flavor, allergen and restriction sets.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer};

pub type TagSet = BTreeSet<String>;

/// Lowercases and trims a tag. Blank tags normalize to `None`.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

pub fn tag_set<I, S>(tags: I) -> TagSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter().filter_map(|tag| normalize_tag(tag.as_ref())).collect()
}

pub fn intersects(left: &TagSet, right: &TagSet) -> bool {
    left.intersection(right).next().is_some()
}

pub fn overlap(left: &TagSet, right: &TagSet) -> usize {
    left.intersection(right).count()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTags {
    List(Vec<String>),
    Csv(String),
}

/// Accepts either `["sweet", "fruity"]` or `"sweet,fruity"`.
pub fn deserialize_tags<'de, D>(deserializer: D) -> Result<TagSet, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTags>::deserialize(deserializer)?;
    Ok(match raw {
        None => TagSet::new(),
        Some(RawTags::List(values)) => tag_set(values),
        Some(RawTags::Csv(value)) => tag_set(value.split(',')),
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::{deserialize_tags, intersects, overlap, tag_set, TagSet};

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "deserialize_tags")]
        tags: TagSet,
    }

    #[test]
    fn tags_are_trimmed_lowercased_and_deduplicated() {
        let tags = tag_set([" Sweet", "sweet", "", "FRUITY "]);
        assert_eq!(tags.into_iter().collect::<Vec<_>>(), vec!["fruity", "sweet"]);
    }

    #[test]
    fn accepts_list_and_comma_separated_forms() -> Result<(), serde_json::Error> {
        let list: Holder = serde_json::from_str(r#"{"tags": ["Citrus", "sour"]}"#)?;
        let csv: Holder = serde_json::from_str(r#"{"tags": "citrus, Sour"}"#)?;
        let null: Holder = serde_json::from_str(r#"{"tags": null}"#)?;
        let missing: Holder = serde_json::from_str("{}")?;

        assert_eq!(list.tags, csv.tags);
        assert!(null.tags.is_empty());
        assert!(missing.tags.is_empty());
        Ok(())
    }

    #[test]
    fn overlap_counts_shared_tags() {
        let left = tag_set(["sweet", "fruity", "sour"]);
        let right = tag_set(["fruity", "sour", "bitter"]);

        assert!(intersects(&left, &right));
        assert_eq!(overlap(&left, &right), 2);
        assert!(!intersects(&left, &TagSet::new()));
    }
}
