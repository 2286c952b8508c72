use std::{error, fmt};

use media_store::{MediaError, PhotoUpload};
use model::{
    image::ImageSet,
    record::{LocationRecord, RecordKey},
};
use record_store::{not_found_to_none, StoreError};

use crate::{
    form::{EntryForm, FormMode, ValidationError},
    Logbook,
};

#[derive(Debug, Clone)]
pub enum SubmitError {
    /// Nothing was written.
    Validation(ValidationError),
    /// The form edits a record which is not stored (anymore).
    UnknownRecord(RecordKey),
    /// `uploaded` lists the photos stored before the failure.
    Media {
        photo: String,
        source: MediaError,
        uploaded: Vec<String>,
    },
    /// The record was not written. Photos listed in `uploaded` are in the
    /// bucket without a record referencing them.
    Store {
        source: StoreError,
        uploaded: Vec<String>,
    },
}

impl error::Error for SubmitError {}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubmitError::Validation(e) => write!(f, "{e}"),
            SubmitError::UnknownRecord(key) => {
                write!(f, "The location '{}' does not exist anymore.", key)
            }
            SubmitError::Media { photo, source, .. } => {
                write!(f, "Could not upload photo '{}': {}", photo, source)
            }
            SubmitError::Store { source, uploaded } if uploaded.is_empty() => {
                write!(f, "Could not save the location: {}", source)
            }
            SubmitError::Store { source, uploaded } => write!(
                f,
                "Could not save the location: {} (already uploaded: {})",
                source,
                uploaded.join(", ")
            ),
        }
    }
}

impl From<ValidationError> for SubmitError {
    fn from(e: ValidationError) -> Self {
        SubmitError::Validation(e)
    }
}

impl Logbook {
    /// Writes the form as a complete record.
    ///
    /// New photos are uploaded first, then merged with the kept photos of the
    /// stored record, then the record is put. There is no rollback: if the
    /// put fails, uploaded photos stay in the bucket unreferenced.
    pub async fn submit(
        &self,
        form: &EntryForm,
        new_photos: &[PhotoUpload],
    ) -> Result<LocationRecord, SubmitError> {
        let entry = form.validate(new_photos)?;

        let mut images = match &form.mode {
            FormMode::Create => ImageSet::new(),
            FormMode::Edit { key } => {
                let stored = not_found_to_none(self.records.get(key).await)
                    .map_err(|source| SubmitError::Store {
                        source,
                        uploaded: vec![],
                    })?
                    .ok_or_else(|| SubmitError::UnknownRecord(key.clone()))?;
                let mut images = stored.image;
                images.retain_names(&form.kept_images);
                images
            }
        };

        let mut uploaded = vec![];
        for photo in new_photos {
            let url = self
                .media
                .upload(photo)
                .await
                .map_err(|source| SubmitError::Media {
                    photo: photo.name.clone(),
                    source,
                    uploaded: uploaded.clone(),
                })?;
            images.insert(photo.name.clone(), url);
            uploaded.push(photo.name.clone());
        }

        let record = entry.into_record(images);
        if let Err(source) = self.records.put(&record).await {
            if !uploaded.is_empty() {
                log::warn!(
                    "record '{}' was not stored, photos {:?} are left without a record",
                    record.key,
                    uploaded
                );
            }
            return Err(SubmitError::Store { source, uploaded });
        }

        log::info!(
            "stored record '{}' with {} photos ({} new)",
            record.key,
            record.image.len(),
            uploaded.len()
        );
        Ok(record)
    }
}
