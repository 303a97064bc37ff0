pub mod config;
pub mod logging;

pub mod api;
pub mod catalog;
pub mod checksum;
pub mod consolidate;
pub mod model_year;
pub mod reference;
pub mod report;
pub mod sheet;
pub mod traverse;
