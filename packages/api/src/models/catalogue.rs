//! Unit content and the admin catalogue.
//!
//! Elements and performance criteria are public. Everything else here backs
//! admin-only endpoints: listing what the national training register offers,
//! queueing bulk downloads and polling the resulting jobs.

use serde::{Deserialize, Serialize};

use super::de::{null_as_default, string_or_number};

/// Page size the backend uses for catalogue listings.
pub const CATALOGUE_PAGE_SIZE: u32 = 50;

/// Performance criterion within an element, e.g. `1.2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceCriterion {
    #[serde(deserialize_with = "string_or_number")]
    pub pc_num: String,
    pub pc_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitElement {
    #[serde(deserialize_with = "string_or_number")]
    pub element_num: String,
    pub element_text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub performance_criteria: Vec<PerformanceCriterion>,
}

/// `GET /api/units/{id}/elements-with-pc`.
///
/// Older backends answer with a bare list of elements, newer ones wrap it
/// with the unit's code and title. Both decode to this.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "ElementsShape")]
pub struct UnitElements {
    pub unit_code: Option<String>,
    pub unit_title: Option<String>,
    pub elements: Vec<UnitElement>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ElementsShape {
    Bare(Vec<UnitElement>),
    Wrapped {
        #[serde(default)]
        unit_code: Option<String>,
        #[serde(default)]
        unit_title: Option<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        elements: Vec<UnitElement>,
    },
}

impl From<ElementsShape> for UnitElements {
    fn from(shape: ElementsShape) -> Self {
        match shape {
            ElementsShape::Bare(elements) => Self {
                elements,
                ..Default::default()
            },
            ElementsShape::Wrapped {
                unit_code,
                unit_title,
                elements,
            } => Self {
                unit_code,
                unit_title,
                elements,
            },
        }
    }
}

/// Which half of the catalogue an admin call addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogueKind {
    TrainingPackages,
    Units,
}

impl CatalogueKind {
    /// Endpoint prefix relative to the API base.
    pub fn path(self) -> &'static str {
        match self {
            CatalogueKind::TrainingPackages => "api/training-packages",
            CatalogueKind::Units => "api/units",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CatalogueKind::TrainingPackages => "Training packages",
            CatalogueKind::Units => "Units",
        }
    }
}

/// An item the register offers, annotated with whether it is imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueEntry {
    pub code: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub in_database: bool,
    /// `"Y"` once the backend has extracted the item's content.
    #[serde(default)]
    pub processed: Option<String>,
}

impl CatalogueEntry {
    pub fn is_processed(&self) -> bool {
        self.processed.as_deref() == Some("Y")
    }
}

/// One page of `GET /api/{training-packages,units}/available`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CataloguePage {
    #[serde(alias = "packages", alias = "units", default)]
    pub entries: Vec<CatalogueEntry>,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "catalogue_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub total: u32,
}

fn first_page() -> u32 {
    1
}

fn catalogue_page_size() -> u32 {
    CATALOGUE_PAGE_SIZE
}

/// Reply to a bulk download request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DownloadJob {
    pub job_id: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: JobState,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    #[default]
    Queued,
    Processing,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl JobState {
    pub fn is_finished(self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

/// `GET /api/{training-packages,units}/download-status/{job_id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobStatus {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub status: JobState,
    #[serde(default)]
    pub total_items: u32,
    #[serde(default)]
    pub completed_items: u32,
    #[serde(default)]
    pub failed_items: u32,
    #[serde(default)]
    pub current_item: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<String>,
}

impl JobStatus {
    /// Whole percent of items handled, failed ones included.
    pub fn percent_done(&self) -> u32 {
        if self.total_items == 0 {
            return if self.status.is_finished() { 100 } else { 0 };
        }
        let handled = (self.completed_items + self.failed_items).min(self.total_items);
        handled * 100 / self.total_items
    }
}
