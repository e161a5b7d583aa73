//! Offer, delivery and service-level generation.
//!
//! These are fixed business multipliers applied to a candidate's listing;
//! they never depend on the buyer requirement.

use serde::{Deserialize, Serialize};

use crate::{Candidate, SIX_AXIS_ARM_CATEGORY};

/// Placeholder pricing constants pending business-owner review.
#[derive(Debug, Clone, PartialEq)]
pub struct CommercialTermsConfig {
    pub lease_monthly_rate: f64,
    pub lease_term_months: u32,
    pub pilot_rate: f64,
    pub pilot_duration_weeks: u32,
}

impl Default for CommercialTermsConfig {
    fn default() -> Self {
        Self {
            lease_monthly_rate: 0.08,
            lease_term_months: 36,
            pilot_rate: 0.15,
            pilot_duration_weeks: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryConfig {
    pub min_install_weeks: u32,
    pub install_factor: f64,
    pub six_axis_training_hours: u32,
    pub default_training_hours: u32,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            min_install_weeks: 2,
            install_factor: 0.2,
            six_axis_training_hours: 40,
            default_training_hours: 24,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceLevelConfig {
    pub base_uptime_pct: f64,
    pub high_reliability_bonus_pct: f64,
    pub priority_response_hours: u32,
    pub standard_response_hours: u32,
    pub default_restore_hours: f64,
}

impl Default for ServiceLevelConfig {
    fn default() -> Self {
        Self {
            base_uptime_pct: 95.0,
            high_reliability_bonus_pct: 2.0,
            priority_response_hours: 2,
            standard_response_hours: 4,
            default_restore_hours: 8.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOffer {
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseOffer {
    pub monthly_rate: f64,
    pub term_months: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PilotOffer {
    pub cost: f64,
    pub duration_weeks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommercialTerms {
    pub purchase: PurchaseOffer,
    pub lease: LeaseOffer,
    pub pilot: PilotOffer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryEstimate {
    pub lead_time_weeks: u32,
    pub install_weeks: u32,
    pub total_weeks: u32,
    pub training_hours: u32,
    pub support_included: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceLevel {
    pub uptime_pct: f64,
    pub response_hours: u32,
    pub restore_hours: f64,
}

pub fn commercial_terms(candidate: &Candidate, config: &CommercialTermsConfig) -> CommercialTerms {
    let midpoint = candidate.price_midpoint();

    CommercialTerms {
        purchase: PurchaseOffer { price: midpoint },
        lease: LeaseOffer {
            monthly_rate: midpoint * config.lease_monthly_rate,
            term_months: config.lease_term_months,
        },
        pilot: PilotOffer {
            cost: midpoint * config.pilot_rate,
            duration_weeks: config.pilot_duration_weeks,
        },
    }
}

pub fn delivery_estimate(candidate: &Candidate, config: &DeliveryConfig) -> DeliveryEstimate {
    let scaled = (candidate.lead_time_weeks as f64 * config.install_factor).ceil() as u32;
    let install_weeks = scaled.max(config.min_install_weeks);
    let training_hours = if candidate.category == SIX_AXIS_ARM_CATEGORY {
        config.six_axis_training_hours
    } else {
        config.default_training_hours
    };

    DeliveryEstimate {
        lead_time_weeks: candidate.lead_time_weeks,
        install_weeks,
        total_weeks: candidate.lead_time_weeks.saturating_add(install_weeks),
        training_hours,
        support_included: true,
    }
}

pub fn service_level(candidate: &Candidate, config: &ServiceLevelConfig) -> ServiceLevel {
    let attrs = &candidate.attributes;

    let uptime_pct = if attrs.is_high_reliability() {
        config.base_uptime_pct + config.high_reliability_bonus_pct
    } else {
        config.base_uptime_pct
    };
    let response_hours = if attrs.has_priority_support() {
        config.priority_response_hours
    } else {
        config.standard_response_hours
    };

    ServiceLevel {
        uptime_pct,
        response_hours,
        restore_hours: attrs.mttr_hours.unwrap_or(config.default_restore_hours),
    }
}
