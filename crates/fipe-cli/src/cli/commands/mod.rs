//! CLI command handlers, one file per command.

mod checksum;
mod consolidate;
mod list;
mod price;
mod scrape;
mod search;

pub use checksum::run_checksum;
pub use consolidate::run_consolidate;
pub use list::run_list;
pub use price::run_price;
pub use scrape::run_scrape;
pub use search::run_search;
