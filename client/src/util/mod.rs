//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns (router, storage,
//! timers) from page and component logic.

pub mod guard;
pub mod navigation;
pub mod storage;
pub mod time;
