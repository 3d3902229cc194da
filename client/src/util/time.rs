//! Browser clock and timers.
//!
//! TRADE-OFFS
//! ==========
//! `std::time::SystemTime` panics on `wasm32-unknown-unknown`, so the client
//! reads `Date.now()` instead. SSR paths return zero and never wait.

/// Seconds since the Unix epoch.
#[allow(clippy::cast_possible_truncation)]
pub fn unix_now() -> i64 {
    #[cfg(feature = "hydrate")]
    {
        (js_sys::Date::now() / 1000.0) as i64
    }
    #[cfg(not(feature = "hydrate"))]
    {
        0
    }
}

/// Resolve after `ms` milliseconds.
pub async fn sleep_ms(ms: u64) {
    #[cfg(feature = "hydrate")]
    {
        let ms = u32::try_from(ms).unwrap_or(u32::MAX);
        gloo_timers::future::TimeoutFuture::new(ms).await;
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = ms;
    }
}
