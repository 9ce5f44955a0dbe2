//! Report sinks and console progress.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::error::{BoxError, Result};
use crate::schema::BenchmarkResult;

/// Where a finished report goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sink {
    Stdout,
    /// Exact file path.
    File(PathBuf),
    /// Directory; the report is written to `<dir>/<slug>.json`.
    Dir(PathBuf),
}

impl Sink {
    /// Interprets a `--out` value: existing directories and paths ending in a
    /// separator are directories, anything else is a file. `None` is stdout.
    pub fn from_out(out: Option<&Path>) -> Self {
        match out {
            None => Sink::Stdout,
            Some(path) => {
                let trailing_sep = path
                    .as_os_str()
                    .to_string_lossy()
                    .ends_with(std::path::MAIN_SEPARATOR);
                if path.is_dir() || trailing_sep {
                    Sink::Dir(path.to_path_buf())
                } else {
                    Sink::File(path.to_path_buf())
                }
            }
        }
    }

    /// Writes `result` and returns the file written, if any.
    pub fn write(&self, slug: &str, result: &BenchmarkResult) -> Result<Option<PathBuf>> {
        let json = to_json(result)?;
        match self {
            Sink::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{json}")?;
                Ok(None)
            }
            Sink::File(path) => {
                write_file(path, &json)?;
                Ok(Some(path.clone()))
            }
            Sink::Dir(dir) => {
                fs::create_dir_all(dir)?;
                let path = dir.join(format!("{slug}.json"));
                write_file(&path, &json)?;
                Ok(Some(path))
            }
        }
    }
}

fn write_file(path: &Path, json: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    info!(path = %path.display(), "wrote report");
    Ok(())
}

pub fn to_json(result: &BenchmarkResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

pub fn from_json(json: &str) -> Result<BenchmarkResult> {
    Ok(serde_json::from_str(json)?)
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Start/finish lines plus a single rewritable progress line on stderr.
pub struct ConsoleProgress {
    bar: ProgressBar,
    title: String,
    total: usize,
}

impl ConsoleProgress {
    pub fn start(title: &str, total_sizes: usize) -> Self {
        eprintln!("[{}] Starting: {}", timestamp(), title);

        let bar = ProgressBar::new(total_sizes as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.enable_steady_tick(Duration::from_millis(100));

        Self::with_bar(bar, title, total_sizes)
    }

    /// Same bookkeeping as [`start`](Self::start) without drawing anything.
    pub fn hidden(title: &str, total_sizes: usize) -> Self {
        Self::with_bar(ProgressBar::hidden(), title, total_sizes)
    }

    fn with_bar(bar: ProgressBar, title: &str, total_sizes: usize) -> Self {
        bar.set_length(total_sizes as u64);
        Self {
            bar,
            title: title.to_string(),
            total: total_sizes,
        }
    }

    /// Number of sizes completed so far.
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn message(&self) -> String {
        self.bar.message()
    }

    pub fn on_size_start(&self, index: usize, size: u64) -> std::result::Result<(), BoxError> {
        self.bar.set_position(index.saturating_sub(1) as u64);
        self.bar
            .set_message(format!("size {size} ({index}/{})", self.total));
        Ok(())
    }

    pub fn finish(self) {
        self.bar.set_position(self.total as u64);
        self.bar.finish_and_clear();
        eprintln!("[{}] Finished: {}", timestamp(), self.title);
    }

    /// Clears the progress line without a finish message.
    pub fn abandon(self) {
        self.bar.abandon();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::compute_stats;
    use crate::schema::{DataPoint, ResultSeries};
    use tempfile::tempdir;

    fn sample_result() -> BenchmarkResult {
        BenchmarkResult {
            title: "Sample".to_string(),
            size_interpretation: "items".to_string(),
            series: vec![ResultSeries {
                name: "only".to_string(),
                results: vec![DataPoint {
                    size: 4,
                    stats: compute_stats(vec![0.5, 1.5]),
                }],
            }],
        }
    }

    #[test]
    fn test_from_out() {
        let dir = tempdir().unwrap();
        assert_eq!(Sink::from_out(None), Sink::Stdout);
        assert_eq!(
            Sink::from_out(Some(dir.path())),
            Sink::Dir(dir.path().to_path_buf())
        );

        let file = dir.path().join("report.json");
        assert_eq!(Sink::from_out(Some(&file)), Sink::File(file.clone()));
    }

    #[test]
    fn test_dir_sink_uses_slug() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("reports");

        let written = Sink::Dir(out.clone())
            .write("sorting", &sample_result())
            .unwrap()
            .unwrap();

        assert_eq!(written, out.join("sorting.json"));
        let parsed = from_json(&fs::read_to_string(&written).unwrap()).unwrap();
        assert_eq!(parsed, sample_result());
    }

    #[test]
    fn test_file_sink_creates_parent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");

        Sink::File(path.clone())
            .write("ignored", &sample_result())
            .unwrap();

        let json = fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"sizeInterpretation\": \"items\""));
    }

    #[test]
    fn test_console_progress_tracks_sizes() {
        let progress = ConsoleProgress::hidden("Sample", 3);
        assert_eq!(progress.position(), 0);

        progress.on_size_start(1, 10).unwrap();
        assert_eq!(progress.position(), 0);
        assert_eq!(progress.message(), "size 10 (1/3)");

        progress.on_size_start(3, 1000).unwrap();
        assert_eq!(progress.position(), 2);
        assert_eq!(progress.message(), "size 1000 (3/3)");

        progress.finish();
    }
}
