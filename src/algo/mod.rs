//! Relief construction and validation algorithms.
//!
//! - **Relief**: surface, base plate, and wall construction plus assembly
//! - **Validation**: closure, orientation, and volume checks
//! - **Progress**: callback-based reporting for long conversions

pub mod progress;
pub mod relief;
pub mod validate;

pub use progress::Progress;
