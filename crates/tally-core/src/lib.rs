pub mod aggregate;
pub mod catalog;
pub mod checks;
pub mod clock;
pub mod config;
pub mod engine;
pub mod errors;
pub mod judge;
pub mod ledger;
pub mod model;
pub mod providers;
pub mod report;
