//! Collects generated addresses from a remote API and writes them to an
//! xlsx workbook.

pub mod config;
pub mod generator;
pub mod output;
pub mod record;

pub use config::Settings;
pub use generator::AddressCollector;
pub use record::AddressRecord;

pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
