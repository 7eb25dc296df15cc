//! Result sinks.
//!
//! [`FileSinkFactory`] writes one tab-separated file per sweep, one
//! `snr<TAB>bler` line per informative operating point:
//!
//! ```text
//! 1.00	6.666667e-01
//! 1.25	2.173913e-01
//! ```
//!
//! Lines are flushed as they are written so a long sweep can be followed with
//! `tail -f`. [`MemorySinkFactory`] keeps the same records in memory.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::SweepParameters;
use crate::domain::ports::{ResultSink, SinkFactory};

/// Format a BLER value the way C's `%e` does: six mantissa digits and a signed
/// exponent of at least two digits.
pub fn format_scientific(value: f64) -> String {
    let formatted = format!("{value:.6e}");
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return formatted;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

/// One result line, including the trailing newline.
pub fn format_record(snr_db: f64, bler: f64) -> String {
    format!("{snr_db:.2}\t{}\n", format_scientific(bler))
}

/// Appends records to a single result file.
#[derive(Debug)]
pub struct FileResultSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileResultSink {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: &Path) -> DomainResult<Self> {
        let file = File::create(path).map_err(|source| DomainError::ResultFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for FileResultSink {
    fn record(&mut self, snr_db: f64, bler: f64) -> DomainResult<()> {
        self.writer.write_all(format_record(snr_db, bler).as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> DomainResult<()> {
        self.writer.flush()?;
        tracing::debug!(path = %self.path().display(), "Result file complete");
        Ok(())
    }
}

/// Opens `<dir>/<label>.tsv` for every sweep.
#[derive(Debug, Clone)]
pub struct FileSinkFactory {
    dir: PathBuf,
}

impl FileSinkFactory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Where the result file of `params` is written.
    pub fn path_for(&self, params: &SweepParameters) -> PathBuf {
        self.dir.join(format!("{}.tsv", params.label()))
    }
}

impl SinkFactory for FileSinkFactory {
    fn open(&self, params: &SweepParameters) -> DomainResult<Box<dyn ResultSink>> {
        fs::create_dir_all(&self.dir).map_err(|source| DomainError::ResultFile {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path_for(params);
        tracing::debug!(path = %path.display(), "Opening result file");
        Ok(Box::new(FileResultSink::create(&path)?))
    }
}

type Records = Arc<Mutex<BTreeMap<String, Vec<(f64, f64)>>>>;

/// Collects records per sweep label in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySinkFactory {
    records: Records,
}

impl MemorySinkFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records of every sweep opened so far, keyed by sweep label.
    pub fn snapshot(&self) -> BTreeMap<String, Vec<(f64, f64)>> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SinkFactory for MemorySinkFactory {
    fn open(&self, params: &SweepParameters) -> DomainResult<Box<dyn ResultSink>> {
        let label = params.label();
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(label.clone(), Vec::new());
        Ok(Box::new(MemorySink {
            label,
            records: Arc::clone(&self.records),
        }))
    }
}

struct MemorySink {
    label: String,
    records: Records,
}

impl ResultSink for MemorySink {
    fn record(&mut self, snr_db: f64, bler: f64) -> DomainResult<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(self.label.clone())
            .or_default()
            .push((snr_db, bler));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::CodeSpec;

    fn params() -> SweepParameters {
        SweepParameters {
            code: CodeSpec {
                structure: "qc-r12".to_string(),
                scaling: 8,
                max_iterations: 20,
                min_sum_scale: 0.75,
                info_bits: None,
            },
            target_block_errors: 10,
            target_bler: 0.01,
            esn0_start_db: 0.0,
            esn0_step_db: 0.5,
            seed: 3,
        }
    }

    #[test]
    fn test_scientific_formatting_matches_c() {
        assert_eq!(format_scientific(2.0 / 3.0), "6.666667e-01");
        assert_eq!(format_scientific(0.5), "5.000000e-01");
        assert_eq!(format_scientific(1.0), "1.000000e+00");
        assert_eq!(format_scientific(1.23e-105), "1.230000e-105");
        assert_eq!(format_scientific(0.0), "0.000000e+00");
    }

    #[test]
    fn test_record_line() {
        assert_eq!(format_record(1.0, 2.0 / 3.0), "1.00\t6.666667e-01\n");
        assert_eq!(format_record(-0.25, 0.05), "-0.25\t5.000000e-02\n");
    }

    #[test]
    fn test_file_sink_writes_lines() {
        let dir = tempfile::tempdir().unwrap();
        let factory = FileSinkFactory::new(dir.path().join("nested"));
        let mut sink = factory.open(&params()).unwrap();
        sink.record(1.0, 2.0 / 3.0).unwrap();
        sink.record(1.25, 0.2).unwrap();
        sink.finish().unwrap();

        let path = factory.path_for(&params());
        assert!(path.ends_with("qc-r12_z8_it20_e10_s3.tsv"));
        let contents = fs::read_to_string(path).unwrap();
        assert_eq!(contents, "1.00\t6.666667e-01\n1.25\t2.000000e-01\n");
    }

    #[test]
    fn test_file_sink_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("curve.tsv");
        fs::write(&target, "stale\n").unwrap();

        let mut sink = FileResultSink::create(&target).unwrap();
        assert_eq!(sink.path(), target.as_path());
        sink.record(1.0, 2.0 / 3.0).unwrap();
        sink.record(1.25, 0.2).unwrap();
        sink.finish().unwrap();

        let contents = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(contents, "1.00\t6.666667e-01\n1.25\t2.000000e-01\n");
    }

    #[test]
    fn test_unwritable_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();
        let factory = FileSinkFactory::new(blocker.join("sub"));
        assert!(matches!(
            factory.open(&params()),
            Err(DomainError::ResultFile { .. })
        ));
    }

    #[test]
    fn test_memory_sink_keys_by_label() {
        let factory = MemorySinkFactory::new();
        let mut sink = factory.open(&params()).unwrap();
        sink.record(0.5, 0.1).unwrap();
        let snapshot = factory.snapshot();
        assert_eq!(snapshot["qc-r12_z8_it20_e10_s3"], vec![(0.5, 0.1)]);
    }
}
