mod activity;
mod dates;
mod farmer;
mod nursery;

pub use activity::{Collection, HarvestEntry, ReceivingEntry, SprayingEntry};
pub use dates::{coerce_date, effective_date, fmt_date, parse_date, today, DATE_FORMAT};
pub use farmer::{Farmer, FarmerSummary};
pub use nursery::Nursery;
