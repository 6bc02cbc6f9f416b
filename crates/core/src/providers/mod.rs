pub mod traits;

// Provider and randomness implementations
pub mod mock_data;
pub mod random;
