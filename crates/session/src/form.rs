use std::{
    collections::{BTreeSet, HashSet},
    error, fmt,
};

use chrono::NaiveDate;
use media_store::PhotoUpload;
use model::{
    category::Category,
    image::ImageSet,
    location::{Address, Coordinates},
    rating::Rating,
    record::{LocationRecord, RecordKey},
};
use serde::{Deserialize, Serialize};

use crate::search::SearchCriteria;

/// Whether submitting the form creates a new record or rewrites an existing
/// one. Chosen explicitly by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormMode {
    #[default]
    Create,
    Edit {
        key: RecordKey,
    },
}

/// State of the entry form as the user filled it in. Values are kept raw so
/// that every mistake can be reported next to its field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryForm {
    #[serde(default)]
    pub mode: FormMode,
    #[serde(default)]
    pub locality: String,
    #[serde(default)]
    pub suburb: String,
    #[serde(default)]
    pub country: String,
    /// Position of the dropped pin.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub category: String,
    pub rating: u8,
    pub period: NaiveDate,
    #[serde(default)]
    pub comment: String,
    /// Names of the stored photos that stay with the record.
    #[serde(default)]
    pub kept_images: BTreeSet<String>,
    /// Stored photos, shown for selection. Not trusted on submit.
    #[serde(default)]
    pub images: ImageSet,
}

impl EntryForm {
    /// A fresh form for a new record, prefilled from the search.
    pub fn blank(search: &SearchCriteria, today: NaiveDate) -> Self {
        Self {
            mode: FormMode::Create,
            locality: search.locality.trim().to_owned(),
            suburb: String::new(),
            country: search.country.trim().to_owned(),
            latitude: None,
            longitude: None,
            category: Category::default().name().to_owned(),
            rating: Rating::default().stars(),
            period: today,
            comment: String::new(),
            kept_images: BTreeSet::new(),
            images: ImageSet::new(),
        }
    }

    /// The form for editing `record`, holding exactly its stored values.
    pub fn from_record(record: &LocationRecord) -> Self {
        Self {
            mode: FormMode::Edit {
                key: record.key.clone(),
            },
            locality: record.locality.clone(),
            suburb: record.suburb.clone(),
            country: record.country.clone(),
            latitude: Some(record.latitude()),
            longitude: Some(record.longitude()),
            category: record.category.name().to_owned(),
            rating: record.rating.stars(),
            period: record.period,
            comment: record.comment.clone(),
            kept_images: record.image.names().map(str::to_owned).collect(),
            images: record.image.clone(),
        }
    }

    /// Moves the pin and fills suburb and country from the resolved address.
    pub fn pin(&mut self, coordinates: Coordinates, address: &Address) {
        self.latitude = Some(coordinates.latitude);
        self.longitude = Some(coordinates.longitude);
        if let Some(suburb) = &address.suburb {
            self.suburb = suburb.clone();
        }
        if let Some(country) = &address.country {
            self.country = country.clone();
        }
    }

    /// Checks every field and the photos to upload. Nothing may be written
    /// unless this succeeds.
    pub fn validate(&self, new_photos: &[PhotoUpload]) -> Result<ValidEntry, ValidationError> {
        let mut errors = vec![];

        let locality = self.locality.trim();
        if locality.is_empty() {
            errors.push(FieldError::new("locality", "Enter the name of the place."));
        }

        let country = self.country.trim();
        if country.is_empty() {
            errors.push(FieldError::new("country", "Enter a country."));
        }

        let coordinates = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Coordinates::new(latitude, longitude)
                .map_err(|why| errors.push(FieldError::new("location", why.to_string())))
                .ok(),
            _ => {
                errors.push(FieldError::new(
                    "location",
                    "Drop a pin on the map to set the location.",
                ));
                None
            }
        };

        let category = self
            .category
            .parse::<Category>()
            .map_err(|why| errors.push(FieldError::new("category", why.to_string())))
            .ok();

        let rating = Rating::new(self.rating)
            .map_err(|why| errors.push(FieldError::new("rating", why.to_string())))
            .ok();

        if let FormMode::Edit { key } = &self.mode {
            if key.as_str().trim().is_empty() {
                errors.push(FieldError::new("key", "The edited record has no key."));
            }
        }

        let mut names = HashSet::new();
        for photo in new_photos {
            if let Err(why) = photo.validate() {
                errors.push(FieldError::new("photos", why.to_string()));
            } else if !names.insert(photo.name.as_str()) {
                errors.push(FieldError::new(
                    "photos",
                    format!("Photo '{}' was selected twice.", photo.name),
                ));
            }
        }

        match (coordinates, category, rating) {
            (Some(coordinates), Some(category), Some(rating)) if errors.is_empty() => {
                let key = match &self.mode {
                    FormMode::Create => RecordKey::compose(self.period, locality),
                    FormMode::Edit { key } => key.clone(),
                };
                Ok(ValidEntry {
                    key,
                    locality: locality.to_owned(),
                    suburb: self.suburb.trim().to_owned(),
                    country: country.to_owned(),
                    coordinates,
                    category,
                    rating,
                    period: self.period,
                    comment: self.comment.clone(),
                })
            }
            _ => Err(ValidationError(errors)),
        }
    }
}

/// A checked form, everything but the photos of the future record.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidEntry {
    pub key: RecordKey,
    pub locality: String,
    pub suburb: String,
    pub country: String,
    pub coordinates: Coordinates,
    pub category: Category,
    pub rating: Rating,
    pub period: NaiveDate,
    pub comment: String,
}

impl ValidEntry {
    pub fn into_record(self, image: ImageSet) -> LocationRecord {
        LocationRecord {
            key: self.key,
            locality: self.locality,
            suburb: self.suburb,
            country: self.country,
            coordinates: self.coordinates,
            category: self.category,
            rating: self.rating,
            period: self.period,
            comment: self.comment,
            image,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationError(pub Vec<FieldError>);

impl ValidationError {
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|error| error.field)
    }
}

impl error::Error for ValidationError {}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let messages = self
            .0
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect::<Vec<_>>();
        write!(f, "invalid entry ({})", messages.join("; "))
    }
}
