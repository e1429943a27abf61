/// Vault Market Actions SDK
///
/// Validation and transaction planning for incentive actions on vault
/// markets. Provides:
/// - Request validation for extending and refunding incentive intervals
/// - Fee-adjusted rate math and token amount conversion
/// - Contract-call descriptors with allowance-aware approval ordering
/// - Capability traits for the market, quote and allowance reads
/// - Cached protocol statistics with the `[stats]` stale time
pub mod actions;
pub mod clock;
pub mod config;
pub mod contracts;
pub mod error;
pub mod incentives;
pub mod readers;
pub mod sequencer;
pub mod stats;
pub mod testing;
pub mod transactions;
pub mod validation;

pub use actions::*;
pub use clock::*;
pub use config::*;
pub use contracts::*;
pub use error::*;
pub use incentives::*;
pub use readers::*;
pub use sequencer::*;
pub use stats::*;
pub use transactions::*;
pub use validation::*;

// Re-export the shared crates
pub use market_math as math;
pub use market_types as types;
