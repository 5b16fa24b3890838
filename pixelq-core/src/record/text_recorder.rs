//! Recorder writing one text line per report.
use super::{Record, Recorder};
use log::{info, warn};
use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

/// Appends one formatted line per record to a text file.
///
/// The line format is
/// `Step: <step> | Episode <episode> | Return: <return> | Elapsed: <minutes> min`.
/// Lines are also mirrored to the log at info level. A failed append is
/// logged and otherwise ignored; reporting must never interrupt training.
pub struct TextRecorder {
    path: PathBuf,
}

impl TextRecorder {
    /// Constructs a recorder appending to the file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn format(record: &Record) -> Option<String> {
        let step = record.get_scalar("step").ok()?;
        let episode = record.get_scalar("episode").ok()?;
        let episode_return = record.get_scalar("episode_return").ok()?;
        let elapsed_min = record.get_scalar("elapsed_min").ok()?;
        Some(format!(
            "Step: {} | Episode {} | Return: {} | Elapsed: {:.2} min",
            step as i64, episode as i64, episode_return, elapsed_min
        ))
    }
}

impl Recorder for TextRecorder {
    fn write(&mut self, record: Record) {
        let line = match Self::format(&record) {
            Some(line) => line,
            None => return,
        };
        info!("{}", line);

        let res = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut f| writeln!(f, "{}", line));
        if let Err(e) = res {
            warn!("failed to append to {:?}: {}", self.path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TextRecorder;
    use crate::record::{Record, RecordValue::Scalar};

    #[test]
    fn formats_the_report_line() {
        let record = Record::from_slice(&[
            ("step", Scalar(12000.0)),
            ("episode", Scalar(300.0)),
            ("episode_return", Scalar(21.0)),
            ("elapsed_min", Scalar(1.5)),
        ]);
        let line = TextRecorder::format(&record).unwrap();
        assert_eq!(line, "Step: 12000 | Episode 300 | Return: 21 | Elapsed: 1.50 min");
    }

    #[test]
    fn incomplete_records_produce_no_line() {
        let record = Record::from_scalar("step", 1.0);
        assert!(TextRecorder::format(&record).is_none());
    }
}
