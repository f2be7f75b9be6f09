use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;
use std::time::Instant;

static PERF_ENABLED: AtomicBool = AtomicBool::new(false);
static PERF_INIT: Once = Once::new();

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// 是否输出性能日志
///
/// 开关：
/// - Debug 默认开启；Release 默认关闭
/// - `CEMENT_PLANNER_PERF=1` 强制开启，`=0` 强制关闭
pub fn perf_enabled() -> bool {
    PERF_INIT.call_once(|| {
        let enabled = match std::env::var("CEMENT_PLANNER_PERF") {
            Ok(v) => is_true(&v),
            Err(_) => cfg!(debug_assertions),
        };
        PERF_ENABLED.store(enabled, Ordering::Relaxed);
    });
    PERF_ENABLED.load(Ordering::Relaxed)
}

/// 性能统计 Guard：记录 elapsed_ms
///
/// 使用方式：
/// ```ignore
/// let _perf = cement_planner::perf::PerfGuard::new("render_dashboard");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        Self {
            op,
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        if !perf_enabled() {
            return;
        }

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms = self.elapsed_ms(),
            "done"
        );
    }
}
