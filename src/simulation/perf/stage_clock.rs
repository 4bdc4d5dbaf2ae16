//! Wall-clock split timing for the stages of a tick.

#[cfg(target_arch = "wasm32")]
fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    ORIGIN.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

/// Measures consecutive stages with `lap` and the whole span with `total`.
pub(crate) struct StageClock {
    started: f64,
    last: f64,
}

impl StageClock {
    pub(crate) fn start() -> Self {
        let now = now_ms();
        Self { started: now, last: now }
    }

    /// Milliseconds since the previous lap (or the start). Never negative,
    /// even if the host clock steps backwards.
    pub(crate) fn lap(&mut self) -> f64 {
        let now = now_ms();
        let ms = (now - self.last).max(0.0);
        self.last = now;
        ms
    }

    pub(crate) fn total(&self) -> f64 {
        (now_ms() - self.started).max(0.0)
    }
}
