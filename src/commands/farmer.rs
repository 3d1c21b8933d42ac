use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::db::FarmerRepository;
use crate::models::fmt_date;
use crate::session::SessionForm;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct FarmerCommand {
    #[command(subcommand)]
    pub command: FarmerSubcommand,
}

#[derive(Subcommand)]
pub enum FarmerSubcommand {
    /// List all farmers
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a farmer's full record set
    Show {
        /// Farmer id
        farmer_id: i64,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Save a session file (JSON). A file without a farmer_id creates a
    /// new farmer; otherwise the stored records are replaced with the
    /// file's contents.
    Save {
        /// Path to the session JSON file
        file: PathBuf,
    },
}

impl FarmerCommand {
    pub async fn run(&self, repo: &FarmerRepository) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            FarmerSubcommand::List { format } => {
                let farmers = repo.list().await?;

                if farmers.is_empty() {
                    println!("No farmers found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&farmers)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<10}  NAME", "ID");
                        println!("{}", "-".repeat(40));
                        for farmer in &farmers {
                            println!("{:<10}  {}", farmer.farmer_id, farmer.farmer_name);
                        }
                        println!("\nTotal: {} farmer(s)", farmers.len());
                    }
                }
                Ok(())
            }

            FarmerSubcommand::Show { farmer_id, format } => {
                let mut form = SessionForm::new();
                form.load(repo, *farmer_id).await?;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&form)?);
                    }
                    OutputFormat::Text => print_form(&form),
                }
                Ok(())
            }

            FarmerSubcommand::Save { file } => {
                let contents = std::fs::read_to_string(file)?;
                let mut form: SessionForm = serde_json::from_str(&contents)?;

                let is_new = form.farmer_id.is_none();
                let id = repo.save(&mut form).await?;

                if is_new {
                    println!("Created farmer {} ({})", id, form.farmer.farmer_name);
                } else {
                    println!("Updated farmer {} ({})", id, form.farmer.farmer_name);
                }
                Ok(())
            }
        }
    }
}

fn print_form(form: &SessionForm) {
    let farmer = &form.farmer;
    println!("Farmer {}", form.farmer_id.unwrap_or_default());
    println!("  code:            {}", farmer.farmer_code);
    println!("  name:            {}", farmer.farmer_name);
    println!("  area:            {}", farmer.area);
    println!("  soil type:       {}", farmer.soil_type);
    println!("  field:           {}", farmer.field);
    println!("  contract date:   {}", fmt_date(farmer.contract_date));
    println!("  contracted area: {}", farmer.contracted_area);

    let nursery = &form.nursery;
    println!("\nNursery");
    println!("  supplier:          {}", nursery.seedling_supplier);
    println!(
        "  seeding received:  {} ({})",
        nursery.seeding_receive_qty,
        fmt_date(nursery.seeding_receive_date)
    );
    println!(
        "  transplanted:      {} ({})",
        nursery.transplanting_qty_seedling,
        fmt_date(nursery.transplanting_date)
    );

    println!("\nSpraying ({} entries)", form.spraying.len());
    for (i, s) in form.spraying.iter().enumerate() {
        println!(
            "  {}. {} {} ml on {}",
            i + 1,
            s.chemical_name,
            s.spraying_qty,
            fmt_date(s.spraying_date)
        );
    }

    println!("\nHarvesting ({} entries)", form.harvesting.len());
    for (i, h) in form.harvesting.iter().enumerate() {
        println!("  {}. {} on {}", i + 1, h.harvest_qty, fmt_date(h.harvest_date));
    }

    println!("\nReceiving ({} entries)", form.receiving.len());
    for (i, r) in form.receiving.iter().enumerate() {
        println!(
            "  {}. received {} / accepted {} on {}",
            i + 1,
            r.receiving_qty,
            r.accepted_qty,
            fmt_date(r.receiving_date)
        );
    }
}
