use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Nursery profile for a farmer. At most one per farmer; upserted keyed
/// by `farmer_id` on every save, even when all fields are still defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nursery {
    pub seedling_supplier: String,
    pub seeding_receive_date: Option<NaiveDate>,
    pub seeding_receive_qty: i64,
    pub transplanting_date: Option<NaiveDate>,
    pub transplanting_qty_seedling: i64,
}
