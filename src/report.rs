use chrono::{DateTime, Local};
use tracing::info;

/// Start/end timing for one run. Created at start and handed to whatever
/// needs to report on it.
#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    started_at: DateTime<Local>,
}

impl RunReport {
    pub fn start() -> Self {
        Self::started_at(Local::now())
    }

    pub fn started_at(started_at: DateTime<Local>) -> Self {
        info!("⏱️ Start time: {}", started_at.format("%H:%M:%S"));
        Self { started_at }
    }

    pub fn finish(&self) -> String {
        self.finish_at(Local::now())
    }

    /// Logs end and elapsed time; returns the elapsed summary.
    pub fn finish_at(&self, ended_at: DateTime<Local>) -> String {
        info!("⏱️ End time: {}", ended_at.format("%H:%M:%S"));
        let summary = elapsed_summary(self.started_at, ended_at);
        info!("⏱️ Elapsed time: {}", summary);
        summary
    }
}

fn elapsed_summary(start: DateTime<Local>, end: DateTime<Local>) -> String {
    let millis = (end - start).num_milliseconds().max(0);
    let minutes = millis / 60_000;
    let seconds = (millis % 60_000) as f64 / 1000.0;
    format!("{} minutes and {:.2} seconds", minutes, seconds)
}
