//! Rolling Logger
//!
//! Keeps the newest `capacity` log lines in memory and mirrors them to
//! `<dir>/<app>.log`. The file is append-only until it holds twice the
//! capacity, then it is rewritten from the buffer.
//!
//! `init_logger` installs a `tracing` subscriber writing through the rolling
//! file; `log` records are bridged into it, so `log::info!` works too.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;

/// Lines kept in memory (and at least on disk)
pub const DEFAULT_CAPACITY: usize = 5000;

static GLOBAL: OnceLock<RollingWriter> = OnceLock::new();

/// Circular line buffer backed by a log file
#[derive(Debug)]
pub struct RollingLog {
    path: PathBuf,
    capacity: usize,
    lines: VecDeque<String>,
    lines_on_disk: usize,
    partial: String,
}

impl RollingLog {
    /// Open (or create) `<dir>/<app_name>.log`, loading its tail into memory
    pub fn open(dir: &Path, app_name: &str, capacity: usize) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.log", app_name));
        let capacity = capacity.max(1);

        let mut lines = VecDeque::with_capacity(capacity);
        let mut lines_on_disk = 0;
        if path.exists() {
            for line in BufReader::new(File::open(&path)?).lines() {
                if lines.len() == capacity {
                    lines.pop_front();
                }
                lines.push_back(line?);
                lines_on_disk += 1;
            }
        }

        Ok(Self { path, capacity, lines, lines_on_disk, partial: String::new() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn push_line(&mut self, line: &str) -> io::Result<()> {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line.to_string());

        if self.lines_on_disk + 1 > self.capacity * 2 {
            return self.compact();
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", line)?;
        self.lines_on_disk += 1;
        Ok(())
    }

    /// Feed raw bytes; complete lines are pushed, the rest is kept
    pub fn write_bytes(&mut self, buf: &[u8]) -> io::Result<()> {
        self.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(pos) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=pos).collect();
            self.push_line(line.trim_end_matches(['\n', '\r']))?;
        }
        Ok(())
    }

    pub fn recent_lines(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    fn compact(&mut self) -> io::Result<()> {
        let mut file = File::create(&self.path)?;
        for line in &self.lines {
            writeln!(file, "{}", line)?;
        }
        self.lines_on_disk = self.lines.len();
        Ok(())
    }
}

/// Shared handle usable as a `tracing` writer
#[derive(Clone, Debug)]
pub struct RollingWriter {
    log: Arc<Mutex<RollingLog>>,
    echo_stderr: bool,
}

impl RollingWriter {
    pub fn new(log: RollingLog, echo_stderr: bool) -> Self {
        Self { log: Arc::new(Mutex::new(log)), echo_stderr }
    }

    pub fn recent_lines(&self) -> Vec<String> {
        match self.log.lock() {
            Ok(log) => log.recent_lines(),
            Err(poisoned) => poisoned.into_inner().recent_lines(),
        }
    }
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.echo_stderr {
            let _ = io::stderr().write_all(buf);
        }
        let mut log = self
            .log
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "rolling log poisoned"))?;
        log.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for RollingWriter {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Local wall-clock timestamps
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Install the global subscriber writing to `<log_dir>/<app_name>.log`
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<(), String> {
    init_logger_with_capacity(log_dir, app_name, DEFAULT_CAPACITY)
}

pub fn init_logger_with_capacity(log_dir: PathBuf, app_name: &str, capacity: usize) -> Result<(), String> {
    let log = RollingLog::open(&log_dir, app_name, capacity)
        .map_err(|e| format!("Failed to open log in {}: {}", log_dir.display(), e))?;
    let writer = RollingWriter::new(log, true);

    tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_ansi(false)
        .with_timer(LocalTime)
        .try_init()
        .map_err(|e| format!("Failed to install logger: {}", e))?;

    GLOBAL
        .set(writer)
        .map_err(|_| "Logger already initialized".to_string())
}

pub fn info(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::info!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::error!("{}", msg);
    Ok(())
}

/// Newest lines of the global logger (empty before `init_logger`)
pub fn recent_lines() -> Vec<String> {
    GLOBAL.get().map(RollingWriter::recent_lines).unwrap_or_default()
}

fn ensure_initialized() -> Result<(), String> {
    if GLOBAL.get().is_none() {
        return Err("Logger not initialized".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path).unwrap().lines().map(str::to_string).collect()
    }

    #[test]
    fn test_buffer_keeps_newest_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = RollingLog::open(dir.path(), "app", 3).unwrap();
        for i in 0..5 {
            log.push_line(&format!("line {}", i)).unwrap();
        }
        assert_eq!(log.recent_lines(), vec!["line 2", "line 3", "line 4"]);
        assert_eq!(file_lines(log.path()).len(), 5);
    }

    #[test]
    fn test_file_is_compacted_past_twice_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = RollingLog::open(dir.path(), "app", 2).unwrap();
        for i in 0..5 {
            log.push_line(&format!("line {}", i)).unwrap();
        }
        assert_eq!(file_lines(log.path()), vec!["line 3", "line 4"]);
    }

    #[test]
    fn test_reopen_loads_tail() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut log = RollingLog::open(dir.path(), "app", 10).unwrap();
            for i in 0..4 {
                log.push_line(&format!("line {}", i)).unwrap();
            }
        }
        let log = RollingLog::open(dir.path(), "app", 2).unwrap();
        assert_eq!(log.recent_lines(), vec!["line 2", "line 3"]);
    }

    #[test]
    fn test_writer_joins_partial_writes() {
        let dir = tempfile::tempdir().unwrap();
        let log = RollingLog::open(dir.path(), "app", 10).unwrap();
        let mut writer = RollingWriter::new(log, false);
        writer.write_all(b"hello ").unwrap();
        assert!(writer.recent_lines().is_empty());
        writer.write_all(b"world\nsecond\r\nthi").unwrap();
        assert_eq!(writer.recent_lines(), vec!["hello world", "second"]);
    }

    #[test]
    fn test_helpers_require_init() {
        assert_eq!(error("boom"), Err("Logger not initialized".to_string()));
        assert!(recent_lines().is_empty());
    }
}
