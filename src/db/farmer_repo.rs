use sqlx::SqlitePool;

use crate::models::{
    coerce_date, fmt_date, Farmer, FarmerSummary, HarvestEntry, Nursery, ReceivingEntry,
    SprayingEntry,
};
use crate::session::SessionForm;

use super::StoreError;

/// Repository over the five record tables. `save` is the reconciler: it
/// flushes a whole session form in one transaction, replacing the repeated
/// collections wholesale (delete-all then reinsert) since rows carry no
/// identity the editor could diff against.
pub struct FarmerRepository {
    pool: SqlitePool,
}

// Row types for database queries
#[derive(sqlx::FromRow)]
struct FarmerRow {
    farmer_code: String,
    farmer_name: String,
    area: String,
    soil_type: String,
    field: String,
    contract_date: String,
    contracted_area: String,
}

#[derive(sqlx::FromRow)]
struct NurseryRow {
    seedling_supplier: String,
    seeding_receive_date: String,
    seeding_receive_qty: i64,
    transplanting_date: String,
    transplanting_qty_seedling: i64,
}

#[derive(sqlx::FromRow)]
struct SprayingRow {
    chemical_name: String,
    spraying_date: String,
    spraying_qty: i64,
}

#[derive(sqlx::FromRow)]
struct HarvestRow {
    harvest_date: String,
    harvest_qty: i64,
}

#[derive(sqlx::FromRow)]
struct ReceivingRow {
    receiving_date: String,
    receiving_qty: i64,
    accepted_qty: i64,
}

impl FarmerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All farmers projected for the selection listing, ordered by name.
    pub async fn list(&self) -> Result<Vec<FarmerSummary>, StoreError> {
        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT farmer_id, farmer_name FROM farmers ORDER BY farmer_name")
                .fetch_all(&self.pool)
                .await
                .map_err(StoreError::op("farmers", "select"))?;

        Ok(rows
            .into_iter()
            .map(|(farmer_id, farmer_name)| FarmerSummary {
                farmer_id,
                farmer_name,
            })
            .collect())
    }

    /// Load the full record set for one farmer into a fresh session form.
    pub async fn load(&self, farmer_id: i64) -> Result<SessionForm, StoreError> {
        let farmer: Option<FarmerRow> = sqlx::query_as(
            "SELECT farmer_code, farmer_name, area, soil_type, field, contract_date, contracted_area \
             FROM farmers WHERE farmer_id = ?",
        )
        .bind(farmer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::op("farmers", "select"))?;

        let farmer = farmer.ok_or(StoreError::FarmerNotFound(farmer_id))?;

        let nursery: Option<NurseryRow> = sqlx::query_as(
            "SELECT seedling_supplier, seeding_receive_date, seeding_receive_qty, \
                    transplanting_date, transplanting_qty_seedling \
             FROM nursery WHERE farmer_id = ?",
        )
        .bind(farmer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::op("nursery", "select"))?;

        let spraying: Vec<SprayingRow> = sqlx::query_as(
            "SELECT chemical_name, spraying_date, spraying_qty \
             FROM spraying WHERE farmer_id = ? ORDER BY id",
        )
        .bind(farmer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::op("spraying", "select"))?;

        let harvesting: Vec<HarvestRow> = sqlx::query_as(
            "SELECT harvest_date, harvest_qty \
             FROM harvesting WHERE farmer_id = ? ORDER BY id",
        )
        .bind(farmer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::op("harvesting", "select"))?;

        let receiving: Vec<ReceivingRow> = sqlx::query_as(
            "SELECT receiving_date, receiving_qty, accepted_qty \
             FROM receiving WHERE farmer_id = ? ORDER BY id",
        )
        .bind(farmer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::op("receiving", "select"))?;

        Ok(SessionForm {
            farmer_id: Some(farmer_id),
            farmer: Farmer {
                farmer_code: farmer.farmer_code,
                farmer_name: farmer.farmer_name,
                area: farmer.area,
                soil_type: farmer.soil_type,
                field: farmer.field,
                contract_date: read_date(&farmer.contract_date),
                contracted_area: farmer.contracted_area,
            },
            nursery: nursery
                .map(|n| Nursery {
                    seedling_supplier: n.seedling_supplier,
                    seeding_receive_date: read_date(&n.seeding_receive_date),
                    seeding_receive_qty: n.seeding_receive_qty,
                    transplanting_date: read_date(&n.transplanting_date),
                    transplanting_qty_seedling: n.transplanting_qty_seedling,
                })
                .unwrap_or_default(),
            spraying: spraying
                .into_iter()
                .map(|s| SprayingEntry {
                    chemical_name: s.chemical_name,
                    spraying_date: read_date(&s.spraying_date),
                    spraying_qty: s.spraying_qty,
                })
                .collect(),
            harvesting: harvesting
                .into_iter()
                .map(|h| HarvestEntry {
                    harvest_date: read_date(&h.harvest_date),
                    harvest_qty: h.harvest_qty,
                })
                .collect(),
            receiving: receiving
                .into_iter()
                .map(|r| ReceivingEntry {
                    receiving_date: read_date(&r.receiving_date),
                    receiving_qty: r.receiving_qty,
                    accepted_qty: r.accepted_qty,
                })
                .collect(),
        })
    }

    /// Commit a session form to the store in one transaction.
    ///
    /// New farmers (no `farmer_id`) are inserted and the generated id is
    /// promoted onto the form; existing farmers get a full-overwrite update.
    /// The nursery row is upserted, and each repeated collection is replaced
    /// wholesale. Any failure rolls the whole save back.
    pub async fn save(&self, form: &mut SessionForm) -> Result<i64, StoreError> {
        let mut tx = self.pool.begin().await.map_err(StoreError::Connection)?;

        let farmer = &form.farmer;
        let contract_date = fmt_date(farmer.contract_date);

        let farmer_id = match form.farmer_id {
            Some(id) => {
                sqlx::query(
                    "UPDATE farmers \
                     SET farmer_code = ?, farmer_name = ?, area = ?, soil_type = ?, \
                         field = ?, contract_date = ?, contracted_area = ? \
                     WHERE farmer_id = ?",
                )
                .bind(&farmer.farmer_code)
                .bind(&farmer.farmer_name)
                .bind(&farmer.area)
                .bind(&farmer.soil_type)
                .bind(&farmer.field)
                .bind(&contract_date)
                .bind(&farmer.contracted_area)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(StoreError::op("farmers", "update"))?;
                id
            }
            None => sqlx::query(
                "INSERT INTO farmers \
                     (farmer_code, farmer_name, area, soil_type, field, contract_date, contracted_area) \
                     VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&farmer.farmer_code)
            .bind(&farmer.farmer_name)
            .bind(&farmer.area)
            .bind(&farmer.soil_type)
            .bind(&farmer.field)
            .bind(&contract_date)
            .bind(&farmer.contracted_area)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::op("farmers", "insert"))?
            .last_insert_rowid(),
        };

        let nursery = &form.nursery;
        sqlx::query(
            "INSERT INTO nursery \
             (farmer_id, seedling_supplier, seeding_receive_date, seeding_receive_qty, \
              transplanting_date, transplanting_qty_seedling) \
             VALUES (?, ?, ?, ?, ?, ?) \
             ON CONFLICT(farmer_id) DO UPDATE SET \
                 seedling_supplier = excluded.seedling_supplier, \
                 seeding_receive_date = excluded.seeding_receive_date, \
                 seeding_receive_qty = excluded.seeding_receive_qty, \
                 transplanting_date = excluded.transplanting_date, \
                 transplanting_qty_seedling = excluded.transplanting_qty_seedling",
        )
        .bind(farmer_id)
        .bind(&nursery.seedling_supplier)
        .bind(fmt_date(nursery.seeding_receive_date))
        .bind(nursery.seeding_receive_qty)
        .bind(fmt_date(nursery.transplanting_date))
        .bind(nursery.transplanting_qty_seedling)
        .execute(&mut *tx)
        .await
        .map_err(StoreError::op("nursery", "upsert"))?;

        // Replace spraying entries
        sqlx::query("DELETE FROM spraying WHERE farmer_id = ?")
            .bind(farmer_id)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::op("spraying", "delete"))?;

        for entry in &form.spraying {
            sqlx::query(
                "INSERT INTO spraying (farmer_id, chemical_name, spraying_date, spraying_qty) \
                 VALUES (?, ?, ?, ?)",
            )
            .bind(farmer_id)
            .bind(&entry.chemical_name)
            .bind(fmt_date(entry.spraying_date))
            .bind(entry.spraying_qty)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::op("spraying", "insert"))?;
        }

        // Replace harvesting entries
        sqlx::query("DELETE FROM harvesting WHERE farmer_id = ?")
            .bind(farmer_id)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::op("harvesting", "delete"))?;

        for entry in &form.harvesting {
            sqlx::query(
                "INSERT INTO harvesting (farmer_id, harvest_date, harvest_qty) VALUES (?, ?, ?)",
            )
            .bind(farmer_id)
            .bind(fmt_date(entry.harvest_date))
            .bind(entry.harvest_qty)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::op("harvesting", "insert"))?;
        }

        // Replace receiving entries
        sqlx::query("DELETE FROM receiving WHERE farmer_id = ?")
            .bind(farmer_id)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::op("receiving", "delete"))?;

        for entry in &form.receiving {
            sqlx::query(
                "INSERT INTO receiving (farmer_id, receiving_date, receiving_qty, accepted_qty) \
                 VALUES (?, ?, ?, ?)",
            )
            .bind(farmer_id)
            .bind(fmt_date(entry.receiving_date))
            .bind(entry.receiving_qty)
            .bind(entry.accepted_qty)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::op("receiving", "insert"))?;
        }

        tx.commit().await.map_err(StoreError::Connection)?;

        form.farmer_id = Some(farmer_id);
        Ok(farmer_id)
    }
}

// Stored dates are always concrete; a corrupt value falls back to today
// rather than surfacing an error.
fn read_date(raw: &str) -> Option<chrono::NaiveDate> {
    Some(coerce_date(Some(raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::models::Collection;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    struct TestContext {
        repo: FarmerRepository,
        _temp_dir: TempDir, // Keep alive for duration of test
    }

    async fn setup_repo() -> TestContext {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let pool = init_db(&db_path).await.unwrap();
        TestContext {
            repo: FarmerRepository::new(pool),
            _temp_dir: temp_dir,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[tokio::test]
    async fn test_new_farmer_save_inserts_everything() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let mut form = SessionForm::new();
        form.farmer = Farmer {
            farmer_code: "F100".to_string(),
            farmer_name: "Jane Doe".to_string(),
            area: "North".to_string(),
            soil_type: "Loam".to_string(),
            field: "F1".to_string(),
            contract_date: date(2024, 1, 15),
            contracted_area: "5".to_string(),
        };
        form.spraying.push(SprayingEntry {
            chemical_name: "NPK".to_string(),
            spraying_date: date(2024, 2, 1),
            spraying_qty: 200,
        });

        let id = repo.save(&mut form).await.unwrap();
        assert_eq!(form.farmer_id, Some(id));

        let loaded = repo.load(id).await.unwrap();
        assert_eq!(loaded.farmer.farmer_code, "F100");
        assert_eq!(loaded.farmer.farmer_name, "Jane Doe");
        assert_eq!(loaded.farmer.contract_date, date(2024, 1, 15));
        // Nursery row exists with default fields even though nothing was
        // entered; its dates were coerced to today at save time.
        assert_eq!(loaded.nursery.seedling_supplier, "");
        assert_eq!(loaded.nursery.seeding_receive_qty, 0);
        assert_eq!(loaded.nursery.transplanting_qty_seedling, 0);
        assert_eq!(
            loaded.nursery.seeding_receive_date,
            Some(crate::models::today())
        );
        assert_eq!(loaded.spraying.len(), 1);
        assert_eq!(loaded.spraying[0].spraying_qty, 200);
        assert_eq!(loaded.spraying[0].chemical_name, "NPK");
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let mut form = SessionForm::new();
        form.farmer.farmer_name = "Round Trip".to_string();
        form.spraying.push(SprayingEntry {
            chemical_name: "A".to_string(),
            spraying_date: date(2024, 3, 1),
            spraying_qty: 10,
        });
        form.spraying.push(SprayingEntry {
            chemical_name: "B".to_string(),
            spraying_date: date(2024, 3, 2),
            spraying_qty: 20,
        });
        form.harvesting.push(HarvestEntry {
            harvest_date: date(2024, 6, 1),
            harvest_qty: 500,
        });

        let id = repo.save(&mut form).await.unwrap();
        let loaded = repo.load(id).await.unwrap();

        assert_eq!(loaded.spraying.len(), 2);
        assert_eq!(loaded.harvesting.len(), 1);
        assert_eq!(loaded.receiving.len(), 0);
        assert_eq!(loaded.spraying, form.spraying);
        assert_eq!(loaded.harvesting, form.harvesting);
    }

    #[tokio::test]
    async fn test_resave_replaces_collections_exactly() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let mut form = SessionForm::new();
        form.farmer.farmer_name = "Replace".to_string();
        for (name, qty) in [("a", 1), ("b", 2), ("c", 3)] {
            form.spraying.push(SprayingEntry {
                chemical_name: name.to_string(),
                spraying_date: date(2024, 4, 1),
                spraying_qty: qty,
            });
        }
        let id = repo.save(&mut form).await.unwrap();

        // Remove one row, add one new row, save again.
        let mut form = repo.load(id).await.unwrap();
        form.remove_row(Collection::Spraying, 1);
        form.spraying.push(SprayingEntry {
            chemical_name: "d".to_string(),
            spraying_date: date(2024, 4, 2),
            spraying_qty: 4,
        });
        repo.save(&mut form).await.unwrap();

        let loaded = repo.load(id).await.unwrap();
        let names: Vec<&str> = loaded
            .spraying
            .iter()
            .map(|s| s.chemical_name.as_str())
            .collect();
        // Exactly the three resulting rows, never 4 or 6.
        assert_eq!(names, vec!["a", "c", "d"]);
    }

    #[tokio::test]
    async fn test_update_overwrites_farmer_and_upserts_nursery() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let mut form = SessionForm::new();
        form.farmer.farmer_name = "Before".to_string();
        let id = repo.save(&mut form).await.unwrap();

        let mut form = repo.load(id).await.unwrap();
        form.farmer.farmer_name = "After".to_string();
        form.farmer.soil_type = "Clay".to_string();
        form.nursery.seedling_supplier = "Green Co".to_string();
        form.nursery.seeding_receive_qty = 1200;
        repo.save(&mut form).await.unwrap();
        // Save twice to prove the nursery upsert stays a single row.
        repo.save(&mut form).await.unwrap();

        let loaded = repo.load(id).await.unwrap();
        assert_eq!(loaded.farmer.farmer_name, "After");
        assert_eq!(loaded.farmer.soil_type, "Clay");
        assert_eq!(loaded.nursery.seedling_supplier, "Green Co");
        assert_eq!(loaded.nursery.seeding_receive_qty, 1200);

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM nursery WHERE farmer_id = ?")
            .bind(id)
            .fetch_one(&repo.pool)
            .await
            .unwrap();
        assert_eq!(count.0, 1);
    }

    #[tokio::test]
    async fn test_missing_dates_persist_as_today() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let mut form = SessionForm::new();
        form.farmer.farmer_name = "No Dates".to_string();
        form.harvesting.push(HarvestEntry {
            harvest_date: None,
            harvest_qty: 7,
        });
        let id = repo.save(&mut form).await.unwrap();

        let loaded = repo.load(id).await.unwrap();
        assert_eq!(loaded.farmer.contract_date, Some(crate::models::today()));
        assert_eq!(loaded.harvesting[0].harvest_date, Some(crate::models::today()));
    }

    #[tokio::test]
    async fn test_list_farmers() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        for name in ["Charlie", "Alice", "Bob"] {
            let mut form = SessionForm::new();
            form.farmer.farmer_name = name.to_string();
            repo.save(&mut form).await.unwrap();
        }

        let farmers = repo.list().await.unwrap();
        let names: Vec<&str> = farmers.iter().map(|f| f.farmer_name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Charlie"]);
    }

    #[tokio::test]
    async fn test_load_unknown_farmer() {
        let ctx = setup_repo().await;
        let err = ctx.repo.load(42).await.unwrap_err();
        assert!(matches!(err, StoreError::FarmerNotFound(42)));
    }
}
