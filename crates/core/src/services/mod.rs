pub mod calculation_service;
pub mod exchange_service;
pub mod format_service;
pub mod portfolio_store;
pub mod price_simulator;
pub mod revaluation_service;
