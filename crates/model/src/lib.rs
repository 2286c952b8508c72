use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use serde_with;

pub mod category;
pub mod image;
pub mod location;
pub mod rating;
pub mod record;

pub trait ExampleData {
    fn example_data() -> Self;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithDistance<T> {
    pub distance_km: f64,
    #[serde(flatten)]
    pub content: T,
}

impl<T> WithDistance<T> {
    pub fn new(distance_km: f64, content: T) -> Self {
        Self {
            distance_km,
            content,
        }
    }
}
