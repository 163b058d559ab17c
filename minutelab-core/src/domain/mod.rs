//! Domain types for MinuteLab.

pub mod candle;
pub mod position;

pub use candle::Candle;
pub use position::{ClosedTrade, Position, PositionId};
