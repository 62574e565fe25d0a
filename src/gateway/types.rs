use std::collections::BTreeMap;
use std::env;

use serde::{Deserialize, Serialize};

/// Default service address; override with `SPEND_API_URL`.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

pub fn service_base_url() -> String {
    env::var("SPEND_API_URL")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Body of the key-check endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationVerdict {
    pub valid: bool,
}

/// Body of a successful file submission.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadReceipt {
    pub message: String,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Numeric summary fields of the dashboard payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_income: f64,
    pub total_expenses: f64,
    pub savings: f64,
    pub savings_rate: f64,
}

/// Pre-rendered markup produced by the analysis service. The client hands
/// these to the presentation layer verbatim and never looks inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkupFragment(pub String);

impl MarkupFragment {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Dashboard payload envelope: summary statistics plus every named markup
/// fragment the service sends, captured without interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub summary_stats: SummaryStats,
    #[serde(flatten)]
    pub fragments: BTreeMap<String, MarkupFragment>,
}

impl DashboardData {
    pub fn fragment(&self, name: &str) -> Option<&str> {
        self.fragments.get(name).map(MarkupFragment::as_str)
    }
}
