//! Unit explorer and quest summaries.

use serde::{Deserialize, Serialize};

use super::de::{null_as_default, string_or_number};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// A unit of competency as listed by the training package index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub nominal_hours: Option<u32>,
}

/// Search parameters for `GET /api/units/search`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitQuery {
    pub query: String,
    pub page: u32,
    pub page_size: u32,
    pub training_package_code: Option<String>,
}

impl Default for UnitQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            training_package_code: None,
        }
    }
}

impl UnitQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_package(mut self, code: impl Into<String>) -> Self {
        let code = code.into();
        self.training_package_code = (!code.trim().is_empty()).then_some(code);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn next_page(&self) -> Self {
        self.clone().page(self.page.saturating_add(1))
    }

    /// `None` on the first page.
    pub fn previous_page(&self) -> Option<Self> {
        (self.page > 1).then(|| self.clone().page(self.page - 1))
    }

    /// Query-string pairs in the order the backend documents them.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("query", self.query.trim().to_string()),
            ("page", self.page.max(1).to_string()),
            ("page_size", self.page_size.to_string()),
        ];
        if let Some(code) = &self.training_package_code {
            params.push(("training_package_code", code.clone()));
        }
        params
    }
}

/// Introductory quest, playable without an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience_points: i64,
}
