//! Repeated activity entries: the farmer-scoped, ordered lists of dated
//! records. Rows have no stable identity of their own; they are addressed
//! by position and reconciled against the store by full replacement.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One chemical application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SprayingEntry {
    pub chemical_name: String,
    pub spraying_date: Option<NaiveDate>,
    /// Quantity in ml.
    pub spraying_qty: i64,
}

/// One harvest event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestEntry {
    pub harvest_date: Option<NaiveDate>,
    pub harvest_qty: i64,
}

/// One delivery received from the farmer. `accepted_qty` is expected to be
/// at most `receiving_qty` but is not enforced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceivingEntry {
    pub receiving_date: Option<NaiveDate>,
    pub receiving_qty: i64,
    pub accepted_qty: i64,
}

/// Addresses one of the three repeated collections on a session form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Spraying,
    Harvesting,
    Receiving,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Spraying => write!(f, "spraying"),
            Collection::Harvesting => write!(f, "harvesting"),
            Collection::Receiving => write!(f, "receiving"),
        }
    }
}
