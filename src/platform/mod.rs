//! Platform abstraction layer
//!
//! Translates window-system events into the logical inputs the simulation
//! understands. Nothing in here touches game state.

pub mod input;

pub use input::{InputState, Key};
