use chrono::{Local, NaiveDate};
use geocoding::GeocodeError;
use model::{image::ImageSet, record::LocationRecord};
use record_store::StoreError;
use serde::{Deserialize, Serialize};

use crate::{
    form::EntryForm,
    map::{MapView, MarkerId},
    search::SearchCriteria,
    table::RecordTable,
    Logbook,
};

/// What the entry tab is used for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryIntent {
    Create,
    Edit(MarkerId),
}

/// The tab shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum View {
    /// Map tab, optionally with the marker the user clicked.
    Browse { selected: Option<MarkerId> },
    Entry(EntryIntent),
}

impl Default for View {
    fn default() -> Self {
        View::Browse { selected: None }
    }
}

/// Everything one interaction cycle depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    pub search: SearchCriteria,
    pub view: View,
    /// Default date of a new entry.
    pub today: NaiveDate,
}

impl Interaction {
    pub fn new(search: SearchCriteria, view: View) -> Self {
        Self {
            search,
            view,
            today: Local::now().date_naive(),
        }
    }
}

/// Read only view of a record next to the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDetail {
    pub marker: MarkerId,
    pub caption: String,
    pub title: String,
    pub comment: String,
    pub images: ImageSet,
}

impl RecordDetail {
    pub fn of(record: &LocationRecord) -> Self {
        Self {
            marker: MarkerId::for_record(record),
            caption: record.caption(),
            title: record.locality.clone(),
            comment: record.comment.clone(),
            images: record.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Panel {
    Empty,
    Detail(RecordDetail),
    Form(EntryForm),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeKind {
    PlaceNotFound,
    EmptySearch,
    GeocoderUnavailable,
    UnknownMarker,
}

/// A problem shown inline instead of failing the whole cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl From<&GeocodeError> for Notice {
    fn from(why: &GeocodeError) -> Self {
        match why {
            GeocodeError::NotFound(query) => Notice {
                kind: NoticeKind::PlaceNotFound,
                message: format!(
                    "No place found for '{query}'. Check the spelling or search for the country only."
                ),
            },
            GeocodeError::EmptyQuery => Notice {
                kind: NoticeKind::EmptySearch,
                message: "Enter a location or a country to move the map.".to_owned(),
            },
            other => Notice {
                kind: NoticeKind::GeocoderUnavailable,
                message: format!("Place search is unavailable right now: {other}"),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderCycle {
    pub map: MapView,
    pub panel: Panel,
    pub notices: Vec<Notice>,
    #[serde(skip)]
    pub table: RecordTable,
}

impl Logbook {
    /// Runs one interaction cycle: fetches the whole table, places one marker
    /// per record, centers the map on the search and builds the side panel.
    ///
    /// Only a failing record store fails the cycle, everything else ends up
    /// in `notices`.
    pub async fn render(&self, interaction: &Interaction) -> Result<RenderCycle, StoreError> {
        let table = self.table().await?;
        let mut notices = vec![];

        let focus = self
            .locate(&interaction.search)
            .await
            .map_err(|why| {
                log::warn!("could not locate {:?}: {why}", interaction.search);
                notices.push(Notice::from(&why));
            })
            .ok();

        let selected = match &interaction.view {
            View::Browse { selected: Some(marker) }
            | View::Entry(EntryIntent::Edit(marker)) => {
                let record = table.by_marker(marker);
                if record.is_none() {
                    notices.push(Notice {
                        kind: NoticeKind::UnknownMarker,
                        message: format!("The location '{marker}' does not exist anymore."),
                    });
                }
                record
            }
            _ => None,
        };

        let panel = match (&interaction.view, selected) {
            (View::Browse { .. }, Some(record)) => Panel::Detail(RecordDetail::of(record)),
            (View::Browse { .. }, None) => Panel::Empty,
            (View::Entry(EntryIntent::Create), _) => {
                Panel::Form(EntryForm::blank(&interaction.search, interaction.today))
            }
            (View::Entry(EntryIntent::Edit(_)), Some(record)) => {
                Panel::Form(EntryForm::from_record(record))
            }
            (View::Entry(EntryIntent::Edit(_)), None) => Panel::Empty,
        };

        Ok(RenderCycle {
            map: MapView::new(focus, table.markers()),
            panel,
            notices,
            table,
        })
    }
}
