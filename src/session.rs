//! In-memory form state for one editing session.
//!
//! One `SessionForm` holds the farmer and nursery singletons plus the three
//! repeated collections, keyed by the active farmer id (`None` means "new,
//! unsaved farmer"). Rows are addressed by position; the store is brought in
//! line with this state by full replacement at save time, so the form never
//! tracks per-row identity.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{FarmerRepository, StoreError};
use crate::models::{
    parse_date, Collection, Farmer, HarvestEntry, Nursery, ReceivingEntry, SprayingEntry,
};

#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("no {collection} row at index {index}")]
    RowOutOfRange { collection: Collection, index: usize },
    #[error("unknown {collection} field '{field}'")]
    UnknownField { collection: Collection, field: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionForm {
    /// Store-assigned id of the loaded farmer; `None` until first save.
    pub farmer_id: Option<i64>,
    pub farmer: Farmer,
    pub nursery: Nursery,
    pub spraying: Vec<SprayingEntry>,
    pub harvesting: Vec<HarvestEntry>,
    pub receiving: Vec<ReceivingEntry>,
}

impl SessionForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace this form with the stored record set for `farmer_id`.
    ///
    /// Loading the already-active farmer is a no-op so that repeated
    /// selections cannot clobber in-progress edits. On error the form is
    /// left untouched.
    pub async fn load(
        &mut self,
        repo: &FarmerRepository,
        farmer_id: i64,
    ) -> Result<(), StoreError> {
        if self.farmer_id == Some(farmer_id) {
            return Ok(());
        }
        *self = repo.load(farmer_id).await?;
        Ok(())
    }

    /// Clear to an empty form for entering a new farmer.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Append a defaulted row (empty strings, zero quantities, no date —
    /// the date becomes today at save and export time).
    pub fn add_row(&mut self, collection: Collection) {
        match collection {
            Collection::Spraying => self.spraying.push(SprayingEntry::default()),
            Collection::Harvesting => self.harvesting.push(HarvestEntry::default()),
            Collection::Receiving => self.receiving.push(ReceivingEntry::default()),
        }
    }

    /// Remove the row at `index`, preserving the order of the rest.
    /// Out-of-range indexes are a silent no-op.
    pub fn remove_row(&mut self, collection: Collection, index: usize) {
        match collection {
            Collection::Spraying if index < self.spraying.len() => {
                self.spraying.remove(index);
            }
            Collection::Harvesting if index < self.harvesting.len() => {
                self.harvesting.remove(index);
            }
            Collection::Receiving if index < self.receiving.len() => {
                self.receiving.remove(index);
            }
            _ => {}
        }
    }

    pub fn row_count(&self, collection: Collection) -> usize {
        match collection {
            Collection::Spraying => self.spraying.len(),
            Collection::Harvesting => self.harvesting.len(),
            Collection::Receiving => self.receiving.len(),
        }
    }

    /// Set one field of one row from raw string input. Quantities and dates
    /// are coerced, never rejected: an unparseable quantity becomes 0 and an
    /// unparseable date is cleared (so it defaults to today at save time).
    pub fn set_field(
        &mut self,
        collection: Collection,
        index: usize,
        field: &str,
        value: &str,
    ) -> Result<(), FormError> {
        let out_of_range = FormError::RowOutOfRange { collection, index };
        match collection {
            Collection::Spraying => {
                let row = self.spraying.get_mut(index).ok_or(out_of_range)?;
                match field {
                    "chemical_name" => row.chemical_name = value.to_string(),
                    "spraying_date" => row.spraying_date = coerce_date_field(value),
                    "spraying_qty" => row.spraying_qty = coerce_qty(value),
                    _ => return Err(unknown_field(collection, field)),
                }
            }
            Collection::Harvesting => {
                let row = self.harvesting.get_mut(index).ok_or(out_of_range)?;
                match field {
                    "harvest_date" => row.harvest_date = coerce_date_field(value),
                    "harvest_qty" => row.harvest_qty = coerce_qty(value),
                    _ => return Err(unknown_field(collection, field)),
                }
            }
            Collection::Receiving => {
                let row = self.receiving.get_mut(index).ok_or(out_of_range)?;
                match field {
                    "receiving_date" => row.receiving_date = coerce_date_field(value),
                    "receiving_qty" => row.receiving_qty = coerce_qty(value),
                    "accepted_qty" => row.accepted_qty = coerce_qty(value),
                    _ => return Err(unknown_field(collection, field)),
                }
            }
        }
        Ok(())
    }
}

fn unknown_field(collection: Collection, field: &str) -> FormError {
    FormError::UnknownField {
        collection,
        field: field.to_string(),
    }
}

fn coerce_date_field(value: &str) -> Option<chrono::NaiveDate> {
    let parsed = parse_date(value);
    if parsed.is_none() && !value.trim().is_empty() {
        tracing::warn!(value, "unparseable date input, clearing field");
    }
    parsed
}

fn coerce_qty(value: &str) -> i64 {
    match value.trim().parse::<i64>() {
        Ok(qty) => qty.max(0),
        Err(_) => {
            if !value.trim().is_empty() {
                tracing::warn!(value, "unparseable quantity, substituting 0");
            }
            0
        }
    }
}
