use super::scoring::ScoreBreakdown;
use crate::{Candidate, Requirement};

pub const BASIC_FIT_REASON: &str = "Meets basic requirements for your use case";
pub const SERVICE_COVERAGE_REASON: &str =
    "Comprehensive service coverage and support available in your region";

pub const MISSING_PAYLOAD_ASSUMPTION: &str =
    "Payload capacity not specified by supplier; confirm it before ordering";
pub const MISSING_LOCATION_ASSUMPTION: &str =
    "Service coverage assumed available; provide a site location to confirm";
pub const MISSING_UPTIME_ASSUMPTION: &str =
    "No uptime target given; standard 95% uptime assumed";

const SPEC_THRESHOLD: f64 = 70.0;
const INTEGRATION_THRESHOLD: f64 = 70.0;
const LEAD_TIME_THRESHOLD: f64 = 90.0;
const SERVICE_THRESHOLD: f64 = 70.0;

/// Human-readable reasons for a fit. Never empty.
pub fn justifications(
    requirement: &Requirement,
    candidate: &Candidate,
    breakdown: &ScoreBreakdown,
) -> Vec<String> {
    let mut reasons = Vec::new();

    if breakdown.spec.score > SPEC_THRESHOLD {
        reasons.push(format!(
            "Technical specifications meet your {} kg payload requirement",
            format_quantity(requirement.payload_kg)
        ));
    }
    if breakdown.integration.score > INTEGRATION_THRESHOLD {
        reasons.push(format!(
            "Strong {} integration compatibility",
            requirement.integration.as_ref()
        ));
    }
    if breakdown.lead_time.score > LEAD_TIME_THRESHOLD {
        reasons.push(format!(
            "Delivers in {} weeks, within your {}-week timeline",
            candidate.lead_time_weeks, requirement.timeline_weeks
        ));
    }
    if breakdown.service.score > SERVICE_THRESHOLD {
        reasons.push(SERVICE_COVERAGE_REASON.to_string());
    }

    if reasons.is_empty() {
        reasons.push(BASIC_FIT_REASON.to_string());
    }

    reasons
}

/// Caveats for every input that was missing during scoring.
pub fn assumptions(requirement: &Requirement, candidate: &Candidate) -> Vec<String> {
    let mut caveats = Vec::new();

    if candidate.payload_kg.is_none() {
        caveats.push(MISSING_PAYLOAD_ASSUMPTION.to_string());
    }
    if requirement
        .location
        .as_deref()
        .map_or(true, |l| l.trim().is_empty())
    {
        caveats.push(MISSING_LOCATION_ASSUMPTION.to_string());
    }
    if requirement.uptime_target_pct.is_none() {
        caveats.push(MISSING_UPTIME_ASSUMPTION.to_string());
    }

    caveats
}

fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
