//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input (keyboard keys, on-screen joystick)
//! - Storage (LocalStorage on web, memory on native)
//! - Frame timing

pub mod input;
pub mod storage;
pub mod time;

pub use input::{Joystick, KeyState, movement_intent};
pub use storage::{DefaultStore, KeyValueStore, MemoryStore, StorageError, default_store};
pub use time::FrameClock;
