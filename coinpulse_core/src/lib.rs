pub mod aggregator;
pub mod config;
pub mod dashboard;
pub mod helpers;
pub mod preferences;
pub mod providers;
pub mod votes;
