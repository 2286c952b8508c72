use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Photos of a record: original file name to public URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct ImageSet(BTreeMap<String, String>);

impl ImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the URL stored under `name`.
    pub fn insert(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.0.insert(name.into(), url.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Only the photos named in `kept` remain.
    pub fn retain_names(&mut self, kept: &BTreeSet<String>) {
        self.0.retain(|name, _| kept.contains(name));
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, url)| (name.as_str(), url.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<String>, U: Into<String>> FromIterator<(N, U)> for ImageSet {
    fn from_iter<I: IntoIterator<Item = (N, U)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, url)| (name.into(), url.into()))
                .collect(),
        )
    }
}

/// Older entries hold a single URL instead of a mapping, or nothing at all.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredImages {
    Mapping(BTreeMap<String, String>),
    Single(String),
}

impl<'de> Deserialize<'de> for ImageSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let images = match Option::<StoredImages>::deserialize(deserializer)? {
            Some(StoredImages::Mapping(mapping)) => mapping,
            Some(StoredImages::Single(url)) if url.is_empty() => BTreeMap::new(),
            Some(StoredImages::Single(url)) => {
                let name = url.rsplit('/').next().unwrap_or(&url).to_owned();
                BTreeMap::from([(name, url)])
            }
            None => BTreeMap::new(),
        };
        Ok(Self(images))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retain_names_drops_unlisted_photos() {
        let mut images: ImageSet = [
            ("a.jpg", "https://host/bucket/a.jpg"),
            ("b.jpg", "https://host/bucket/b.jpg"),
        ]
        .into_iter()
        .collect();
        images.retain_names(&BTreeSet::from(["b.jpg".to_owned()]));
        assert_eq!(images.len(), 1);
        assert_eq!(images.get("b.jpg"), Some("https://host/bucket/b.jpg"));
    }

    #[test]
    fn reads_legacy_single_url_and_null() {
        let single: ImageSet =
            serde_json::from_str(r#""https://storage.cloud.google.com/b/bugis.png""#).unwrap();
        assert_eq!(
            single.get("bugis.png"),
            Some("https://storage.cloud.google.com/b/bugis.png")
        );
        let none: ImageSet = serde_json::from_str("null").unwrap();
        assert!(none.is_empty());
    }
}
