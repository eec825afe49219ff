use std::cell::Cell;
use std::io::{self, Write};
use std::time::Instant;

/// Stderr log sink for a publish run: `[mm:ss] message` lines plus numbered
/// pipeline stages.
pub struct ConsoleProgress {
    enabled: bool,
    t0: Instant,
}

impl ConsoleProgress {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            t0: Instant::now(),
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if !self.enabled {
            return;
        }
        let ts = fmt_elapsed(self.t0.elapsed().as_secs_f64());
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "[{ts}] {}", msg.as_ref());
    }

    /// Starts counting the stages of one publish run.
    pub fn stages(&self, total: usize) -> Stages<'_> {
        Stages {
            progress: self,
            total: total.max(1),
            done: Cell::new(0),
        }
    }
}

/// Stage counter for one run; each [`Stages::advance`] logs `label done/total (pct%)`.
pub struct Stages<'a> {
    progress: &'a ConsoleProgress,
    total: usize,
    done: Cell<usize>,
}

impl Stages<'_> {
    pub fn advance(&self, label: &str) {
        let done = (self.done.get() + 1).min(self.total);
        self.done.set(done);
        self.progress.info(stage_line(label, done, self.total));
    }

    pub fn done(&self) -> usize {
        self.done.get()
    }
}

fn stage_line(label: &str, done: usize, total: usize) -> String {
    let pct = (done as f64 / total as f64) * 100.0;
    format!("{label} {done}/{total} ({pct:5.1}%)")
}

fn fmt_elapsed(seconds: f64) -> String {
    let seconds = seconds.max(0.0) as u64;
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    if h > 0 {
        format!("{h:02}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}
