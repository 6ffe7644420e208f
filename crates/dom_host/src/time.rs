//! Time helpers shared by typeahead buffers and transition timers.

use std::cell::Cell;
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

thread_local! {
    static LAST_NOW_MS: Cell<f64> = const { Cell::new(0.0) };
}

/// Returns the current wall-clock time in milliseconds.
pub fn now_ms() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().max(0.0)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64()
            * 1000.0
    }
}

/// Returns a millisecond timestamp that never moves backwards within the current thread.
///
/// Wall clocks can step backwards; keystroke windows measured against them would otherwise
/// appear negative and never expire.
pub fn monotonic_now_ms() -> f64 {
    let now = now_ms();
    LAST_NOW_MS.with(|last| {
        let next = now.max(last.get());
        last.set(next);
        next
    })
}
