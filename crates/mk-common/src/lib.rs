pub mod api;
pub mod logging;
pub mod matching;
pub mod recommendation;
pub mod run_id;

use serde::{Deserialize, Serialize};
use strum::AsRefStr;

/// Category tag that gets the extended operator training package.
pub const SIX_AXIS_ARM_CATEGORY: &str = "6-axis-arm";

/// How the buyer wants the equipment wired into the existing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr)]
pub enum IntegrationStyle {
    #[serde(rename = "PLC", alias = "plc")]
    #[strum(serialize = "PLC")]
    Plc,
    #[serde(rename = "FIELDBUS", alias = "fieldbus", alias = "ETHERNET_IP")]
    #[strum(serialize = "Fieldbus")]
    Fieldbus,
    #[serde(rename = "STANDALONE", alias = "standalone")]
    #[strum(serialize = "Standalone")]
    Standalone,
    #[serde(rename = "OTHER", alias = "other")]
    #[strum(serialize = "Other")]
    Other,
}

// Buyer intake, validated upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub use_case: String,
    pub payload_kg: f64,
    pub throughput_per_hr: f64,
    pub integration: IntegrationStyle,
    pub timeline_weeks: u32,
    #[serde(default)]
    pub budget_band: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub uptime_target_pct: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProductStatus {
    Live,
    #[default]
    Draft,
    Disabled,
}

/// Typed view of the supplier's open attribute bag.
///
/// Every key is optional; scoring treats an absent key as "not declared" and
/// falls back to the base contribution for that dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAttributes {
    pub certifications: Option<Vec<String>>,
    pub safety_rating: Option<String>,
    pub connectivity: Option<Vec<String>>,
    pub service_team: Option<bool>,
    pub remote_diagnostics: Option<bool>,
    pub training_included: Option<bool>,
    pub warranty_months: Option<u32>,
    pub mttr_hours: Option<f64>,
    pub priority_support: Option<bool>,
    pub reliability_rating: Option<String>,
    #[serde(rename = "operatingCostINRPerYear")]
    pub operating_cost_inr_per_year: Option<f64>,
    #[serde(rename = "maintenanceCostINRPerYear")]
    pub maintenance_cost_inr_per_year: Option<f64>,
}

impl ProductAttributes {
    pub fn has_certifications(&self) -> bool {
        non_empty_list(&self.certifications)
    }

    pub fn has_safety_rating(&self) -> bool {
        non_blank(&self.safety_rating)
    }

    pub fn has_connectivity(&self) -> bool {
        non_empty_list(&self.connectivity)
    }

    pub fn has_service_team(&self) -> bool {
        self.service_team.unwrap_or(false)
    }

    pub fn has_remote_diagnostics(&self) -> bool {
        self.remote_diagnostics.unwrap_or(false)
    }

    pub fn has_training_included(&self) -> bool {
        self.training_included.unwrap_or(false)
    }

    pub fn has_priority_support(&self) -> bool {
        self.priority_support.unwrap_or(false)
    }

    /// Warranty in months; 12 when the supplier did not declare one.
    pub fn warranty_months_or_default(&self) -> u32 {
        self.warranty_months.unwrap_or(12)
    }

    pub fn is_high_reliability(&self) -> bool {
        self.reliability_rating
            .as_deref()
            .is_some_and(|r| r.trim().eq_ignore_ascii_case("high"))
    }
}

fn non_empty_list(value: &Option<Vec<String>>) -> bool {
    value.as_ref().is_some_and(|v| !v.is_empty())
}

fn non_blank(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Supplier product as listed in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub org_id: String,
    pub category: String,
    #[serde(default)]
    pub payload_kg: Option<f64>,
    #[serde(default)]
    pub reach_mm: Option<f64>,
    #[serde(default)]
    pub repeatability_mm: Option<f64>,
    #[serde(default)]
    pub max_speed_mps: Option<f64>,
    #[serde(default)]
    pub ip_rating: Option<String>,
    #[serde(default)]
    pub controller: Option<String>,
    #[serde(default, alias = "specs")]
    pub attributes: ProductAttributes,
    pub price_min: f64,
    pub price_max: f64,
    pub lead_time_weeks: u32,
    #[serde(default)]
    pub status: ProductStatus,
}

impl Candidate {
    pub fn is_live(&self) -> bool {
        self.status == ProductStatus::Live
    }

    pub fn price_midpoint(&self) -> f64 {
        (self.price_min + self.price_max) / 2.0
    }
}
