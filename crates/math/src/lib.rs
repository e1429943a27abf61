/// Fixed-point arithmetic for vault market incentives
///
/// Raw token amounts, rates and fee fractions are 256-bit unsigned integers
/// scaled by 10^decimals (fees by 10^18). All operations return errors
/// instead of panicking; only display values use floating point.

pub mod safe;
pub mod fixed_point;
pub mod units;

// Re-export commonly used functions
pub use safe::*;
pub use fixed_point::*;
pub use units::*;
