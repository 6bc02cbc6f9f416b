pub mod asset;
pub mod chart;
pub mod exchange;
pub mod portfolio;
pub mod settings;
pub mod transaction;
