use clap::Args;
use std::path::PathBuf;

use crate::config::Config;
use crate::db::FarmerRepository;
use crate::export::{export_workbook, EXPORT_FILENAME};
use crate::session::SessionForm;

#[derive(Args)]
pub struct ExportCommand {
    /// Farmer id to export
    pub farmer_id: i64,

    /// Output file (defaults to farmer_records.xlsx in the export directory)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl ExportCommand {
    pub async fn run(
        &self,
        repo: &FarmerRepository,
        config: &Config,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut form = SessionForm::new();
        form.load(repo, self.farmer_id).await?;

        let bytes = export_workbook(&form)?;

        let path = self
            .output
            .clone()
            .unwrap_or_else(|| config.export_dir.value.join(EXPORT_FILENAME));
        std::fs::write(&path, bytes)?;

        println!("Exported farmer {} to {}", self.farmer_id, path.display());
        Ok(())
    }
}
