mod config_cmd;
mod export_cmd;
mod farmer;

pub use config_cmd::ConfigCommand;
pub use export_cmd::ExportCommand;
pub use farmer::FarmerCommand;
