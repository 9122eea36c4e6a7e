use std::fs::{create_dir_all, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use chrono::Local;
use csv::Writer;
use crate::error::Result;

const BASE_COLUMNS: [&str; 5] = [
    "episode",
    "mean_score",
    "mean_duration",
    "total_elapsed_secs",
    "interval_elapsed_secs",
];

/// Metrics every algorithm logs; algorithm loggers append their own columns.
#[derive(Clone, Debug)]
pub struct RecordBase {
    pub episode: usize,
    pub mean_score: f32,
    pub mean_duration: Duration,
    pub total_elapsed_secs: f64,
    pub interval_elapsed_secs: f64,
}

/// Owns the run directory and its `metadata.csv`.
pub struct BaseLogger {
    writer: Writer<File>,
    start_time: Instant,
    last_log_time: Instant,
    run_dir: PathBuf,
}

impl BaseLogger {
    /// Create `<base_dir>/run<timestamp>` and write the CSV header.
    pub fn new(base_dir: impl AsRef<Path>, extra_columns: &[&str]) -> Result<Self> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let run_dir = base_dir.as_ref().join(format!("run{timestamp}"));
        create_dir_all(&run_dir)?;

        let csv_path = run_dir.join("metadata.csv");
        let is_new = std::fs::metadata(&csv_path).map(|m| m.len() == 0).unwrap_or(true);
        let file = OpenOptions::new().create(true).append(true).open(&csv_path)?;
        let mut writer = Writer::from_writer(file);
        if is_new {
            let header: Vec<&str> = BASE_COLUMNS.iter().chain(extra_columns.iter()).copied().collect();
            writer.write_record(&header)?;
            writer.flush()?;
        }

        let now = Instant::now();
        Ok(BaseLogger { writer, start_time: now, last_log_time: now, run_dir })
    }

    pub fn make_base(&mut self, episode: usize, mean_score: f32, mean_duration: Duration) -> RecordBase {
        let now = Instant::now();
        let total = now.duration_since(self.start_time).as_secs_f64();
        let interval = now.duration_since(self.last_log_time).as_secs_f64();
        self.last_log_time = now;
        RecordBase {
            episode,
            mean_score,
            mean_duration,
            total_elapsed_secs: total,
            interval_elapsed_secs: interval,
        }
    }

    /// Append one row. `record` must serialize to the base columns followed
    /// by the extra columns given at construction.
    pub fn write<R: serde::Serialize>(&mut self, record: R) -> Result<()> {
        self.writer.serialize(record)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn run_dir(&self) -> &PathBuf { &self.run_dir }
}
