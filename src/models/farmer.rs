use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Editable fields of a farmer record. The store-assigned `farmer_id`
/// lives outside this struct (on the session form / repository side) and
/// is immutable once created; farmers are never deleted by this tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Farmer {
    pub farmer_code: String,
    pub farmer_name: String,
    /// Area (location).
    pub area: String,
    pub soil_type: String,
    pub field: String,
    /// Defaults to today when absent, at save and export time.
    pub contract_date: Option<NaiveDate>,
    /// Contracted area in acres, kept as free text.
    pub contracted_area: String,
}

/// Projection used for the farmer selection listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmerSummary {
    pub farmer_id: i64,
    pub farmer_name: String,
}
