//! Closed vocabularies for agent profile fields.
//!
//! Values are stored as plain strings so that every violation in a request can
//! be reported at once, keyed by field, instead of failing on the first
//! unrecognized variant during deserialization.

use std::borrow::Cow;

use validator::ValidationError;

/// US license jurisdictions: the fifty states plus DC. Territories are not accepted.
pub const LICENSE_STATES: [&str; 51] = [
    "AK", "AL", "AR", "AZ", "CA", "CO", "CT", "DC", "DE", "FL", "GA", "HI", "IA", "ID", "IL", "IN",
    "KS", "KY", "LA", "MA", "MD", "ME", "MI", "MN", "MO", "MS", "MT", "NC", "ND", "NE", "NH", "NJ",
    "NM", "NV", "NY", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VA", "VT", "WA",
    "WI", "WV", "WY",
];

pub const SPECIALTIES: [&str; 35] = [
    "Rentals",
    "Auctions",
    "Business Opportunities",
    "Buyer Brokerage",
    "Condominiums",
    "Development Land",
    "Farm Land",
    "Farm/Ranch",
    "First Time Buyers",
    "Foreclosure Property",
    "Historic Property",
    "Horse Property",
    "Hospitality",
    "Industrial",
    "International",
    "Investments",
    "Lake/Beach Property",
    "Land",
    "Luxury Homes",
    "Military",
    "Multi-Family",
    "New Construction",
    "None",
    "Office",
    "Power of Sale",
    "Property Management",
    "RE/MAX Other",
    "Relocation",
    "Residential Acreages",
    "Retail",
    "Senior Communities",
    "Short Sales",
    "Time Share",
    "Vacation and Resorts",
    "Vineyards",
];

pub const EXPERTISE: [&str; 4] = [
    "Commercial",
    "Commercial / Residential",
    "Residential",
    "Residential / Commercial",
];

pub const DEFAULT_EXPERTISE: &str = "Residential";

pub const AGENT_STATUSES: [&str; 3] = ["active", "inactive", "pending"];

pub const STATUS_ACTIVE: &str = "active";

fn not_in_vocabulary(code: &'static str, value: &str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::from(format!("`{}` is not a valid value", value)));
    error.add_param(Cow::from("value"), &value);
    error
}

pub fn validate_license_states(states: &[String]) -> Result<(), ValidationError> {
    match states.iter().find(|s| !LICENSE_STATES.contains(&s.as_str())) {
        Some(bad) => Err(not_in_vocabulary("license_state", bad)),
        None => Ok(()),
    }
}

pub fn validate_specialties(specialties: &[String]) -> Result<(), ValidationError> {
    match specialties.iter().find(|s| !SPECIALTIES.contains(&s.as_str())) {
        Some(bad) => Err(not_in_vocabulary("specialty", bad)),
        None => Ok(()),
    }
}

pub fn validate_expertise(expertise: &str) -> Result<(), ValidationError> {
    if EXPERTISE.contains(&expertise) {
        Ok(())
    } else {
        Err(not_in_vocabulary("expertise", expertise))
    }
}

pub fn validate_agent_status(status: &str) -> Result<(), ValidationError> {
    if AGENT_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(not_in_vocabulary("status", status))
    }
}
