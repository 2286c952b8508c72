use std::{error, fmt, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The closed set of things a location can be logged as.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
)]
pub enum Category {
    #[default]
    Food,
    Drink,
    Shopping,
    Activity,
    Accommodation,
    #[serde(rename = "View Point")]
    ViewPoint,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Drink,
        Category::Shopping,
        Category::Activity,
        Category::Accommodation,
        Category::ViewPoint,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Drink => "Drink",
            Category::Shopping => "Shopping",
            Category::Activity => "Activity",
            Category::Accommodation => "Accommodation",
            Category::ViewPoint => "View Point",
        }
    }

    /// Glyph name of the marker icon (bootstrap glyphicons, as understood by
    /// leaflet's awesome-markers).
    pub fn icon(&self) -> &'static str {
        match self {
            Category::Food => "cutlery",
            Category::Drink => "glass",
            Category::Shopping => "shopping-cart",
            Category::Activity => "star",
            Category::Accommodation => "home",
            Category::ViewPoint => "eye-open",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Category::Food => "red",
            Category::Drink => "orange",
            Category::Shopping => "purple",
            Category::Activity => "blue",
            Category::Accommodation => "green",
            Category::ViewPoint => "darkblue",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl error::Error for UnknownCategory {}

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let known = Category::ALL.map(|category| category.name()).join(", ");
        write!(f, "unknown category '{}', expected one of: {}", self.0, known)
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_display_name() {
        for category in Category::ALL {
            assert_eq!(category.name().parse::<Category>(), Ok(category));
        }
        assert_eq!(" view point ".parse::<Category>(), Ok(Category::ViewPoint));
    }

    #[test]
    fn rejects_categories_outside_the_set() {
        let err = "Nightlife".parse::<Category>().unwrap_err();
        assert_eq!(err, UnknownCategory("Nightlife".to_owned()));
        assert!(err.to_string().contains("View Point"));
        assert!(serde_json::from_str::<Category>(r#""Nightlife""#).is_err());
    }

    #[test]
    fn serializes_as_display_name() {
        assert_eq!(
            serde_json::to_string(&Category::ViewPoint).unwrap(),
            r#""View Point""#
        );
        assert_eq!(
            serde_json::from_str::<Category>(r#""Drink""#).unwrap(),
            Category::Drink
        );
    }
}
