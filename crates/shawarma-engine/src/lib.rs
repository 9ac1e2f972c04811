pub mod error;
pub mod marketplace;
pub mod seed;
pub mod state;

pub use error::EngineError;
pub use marketplace::Marketplace;
pub use seed::rider_weekly_earnings;
pub use state::{MarketState, RiderRegistration};
