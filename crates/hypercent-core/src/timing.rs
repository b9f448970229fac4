//! Opt-in stage timing.
//!
//! Wrap a stage in [`timed`] to record its wall time under a dotted name
//! (`"load.hypergraph"`, `"metric.betweenness"`). Samples stay in a
//! thread-local buffer until [`take_report`] drains them, so stages must be
//! timed on the thread that later builds the report. Nothing is recorded
//! until [`enable`] is called; a disabled [`timed`] is one relaxed load.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};

/// Environment variable that switches timing on.
pub const TIMING_ENV: &str = "HYPERCENT_TIMING";

static ENABLED: AtomicBool = AtomicBool::new(false);

thread_local! {
    static SAMPLES: RefCell<Vec<(String, Duration)>> = const { RefCell::new(Vec::new()) };
}

/// Per-stage summaries, sorted by stage name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimingReport {
    pub stages: Vec<StageTiming>,
}

/// Sample count and latency distribution of one stage. Durations serialize
/// as whole microseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageTiming {
    pub name: String,
    pub count: usize,
    #[serde(rename = "total_us", serialize_with = "micros")]
    pub total: Duration,
    #[serde(rename = "p50_us", serialize_with = "micros")]
    pub p50: Duration,
    #[serde(rename = "p95_us", serialize_with = "micros")]
    pub p95: Duration,
    #[serde(rename = "max_us", serialize_with = "micros")]
    pub max: Duration,
}

/// Whether [`TIMING_ENV`] is set to `1`, `true`, `yes` or `on`.
#[must_use]
pub fn enabled_from_env() -> bool {
    std::env::var(TIMING_ENV).is_ok_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

/// Turn recording on or off. Turning it off also drops this thread's
/// buffered samples.
pub fn enable(on: bool) {
    ENABLED.store(on, Ordering::Relaxed);
    if !on {
        reset();
    }
}

#[must_use]
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Drop this thread's buffered samples.
pub fn reset() {
    SAMPLES.with_borrow_mut(Vec::clear);
}

/// Run `f` and, when enabled, record how long it took under `stage`.
pub fn timed<R>(stage: &str, f: impl FnOnce() -> R) -> R {
    if !is_enabled() {
        return f();
    }
    let start = Instant::now();
    let out = f();
    let elapsed = start.elapsed();
    SAMPLES.with_borrow_mut(|s| s.push((stage.to_owned(), elapsed)));
    out
}

/// Drain this thread's samples into a report.
#[must_use]
pub fn take_report() -> TimingReport {
    let samples = SAMPLES.with_borrow_mut(std::mem::take);

    let mut by_stage: BTreeMap<String, Vec<Duration>> = BTreeMap::new();
    for (stage, d) in samples {
        by_stage.entry(stage).or_default().push(d);
    }

    TimingReport {
        stages: by_stage
            .into_iter()
            .map(|(name, mut durations)| {
                durations.sort_unstable();
                StageTiming {
                    count: durations.len(),
                    total: durations.iter().sum(),
                    p50: nearest_rank(&durations, 50),
                    p95: nearest_rank(&durations, 95),
                    max: durations.last().copied().unwrap_or_default(),
                    name,
                }
            })
            .collect(),
    }
}

impl TimingReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl fmt::Display for TimingReport {
    /// Fixed-width table, one row per stage.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<24} {:>5} {:>10} {:>10} {:>10} {:>10}",
            "stage", "n", "total", "p50", "p95", "max"
        )?;
        writeln!(f, "{}", "-".repeat(74))?;
        for s in &self.stages {
            writeln!(
                f,
                "{:<24} {:>5} {:>10} {:>10} {:>10} {:>10}",
                s.name,
                s.count,
                Human(s.total),
                Human(s.p50),
                Human(s.p95),
                Human(s.max)
            )?;
        }
        Ok(())
    }
}

/// Nearest-rank percentile of an ascending slice; zero when empty.
fn nearest_rank(sorted: &[Duration], pct: usize) -> Duration {
    let Some(last) = sorted.len().checked_sub(1) else {
        return Duration::ZERO;
    };
    let rank = (pct.min(100) * sorted.len()).div_ceil(100);
    sorted[rank.saturating_sub(1).min(last)]
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn micros<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_micros()).unwrap_or(u64::MAX))
}

/// Duration with a unit suited to its size.
struct Human(Duration);

impl fmt::Display for Human {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let us = self.0.as_micros();
        let text = match us {
            0..1_000 => format!("{us}us"),
            1_000..1_000_000 => format!("{:.2}ms", self.0.as_secs_f64() * 1e3),
            _ => format!("{:.3}s", self.0.as_secs_f64()),
        };
        f.pad(&text)
    }
}
