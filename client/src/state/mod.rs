//! Reactive mirrors of the session core.
//!
//! DESIGN
//! ======
//! The core publishes through `watch` channels; components read signals.
//! `session` owns the bridge between the two.

pub mod session;
