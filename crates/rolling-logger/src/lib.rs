//! Rolling Logger
//!
//! File logger for the app: a `tracing-subscriber` fmt layer writing into a
//! size-capped log file (rotated once to `<app>.log.1`), plus an in-memory
//! circular buffer of the most recent lines for in-app diagnostics.
//!
//! Records emitted through the `log` facade are bridged into the same sink.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;

/// Rotate once the active file grows past this size
pub const MAX_FILE_BYTES: u64 = 1024 * 1024;

/// Lines kept in memory
pub const BUFFER_LINES: usize = 500;

static SINK: OnceLock<RollingSink> = OnceLock::new();

/// Local wall-clock timestamps, same format the app prints elsewhere
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

struct SinkState {
    path: PathBuf,
    file: File,
    written: u64,
    max_bytes: u64,
    recent: VecDeque<String>,
    capacity: usize,
    /// Tail of the last write that did not end in a newline
    partial: String,
}

impl SinkState {
    fn push_text(&mut self, text: &str) {
        self.partial.push_str(text);
        while let Some(pos) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=pos).collect();
            let line = line.trim_end_matches(['\n', '\r']).to_string();
            if self.recent.len() == self.capacity {
                self.recent.pop_front();
            }
            self.recent.push_back(line);
        }
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        let rotated = rotated_path(&self.path);
        if rotated.exists() {
            fs::remove_file(&rotated)?;
        }
        fs::rename(&self.path, &rotated)?;
        self.file = open_append(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

/// Shared handle to the log file and the recent-lines buffer
#[derive(Clone)]
pub struct RollingSink {
    inner: Arc<Mutex<SinkState>>,
}

impl RollingSink {
    /// Open (or continue) `<dir>/<app_name>.log`
    pub fn open(dir: &Path, app_name: &str, max_bytes: u64, capacity: usize) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.log", app_name));
        let file = open_append(&path)?;
        let written = file.metadata().map(|m| m.len()).unwrap_or(0);

        Ok(Self {
            inner: Arc::new(Mutex::new(SinkState {
                path,
                file,
                written,
                max_bytes,
                recent: VecDeque::with_capacity(capacity),
                capacity: capacity.max(1),
                partial: String::new(),
            })),
        })
    }

    /// Path of the active log file
    pub fn path(&self) -> PathBuf {
        self.lock().path.clone()
    }

    /// Most recent complete lines, oldest first
    pub fn recent(&self) -> Vec<String> {
        self.lock().recent.iter().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, SinkState> {
        // A panic mid-write leaves the state usable; keep logging.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Writer handed out per event by the fmt layer
pub struct SinkWriter {
    inner: Arc<Mutex<SinkState>>,
}

impl Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.file.write_all(buf)?;
        state.written += buf.len() as u64;
        state.push_text(&String::from_utf8_lossy(buf));
        if state.written >= state.max_bytes {
            state.rotate()?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.file.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingSink {
    type Writer = SinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SinkWriter {
            inner: self.inner.clone(),
        }
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn rotated_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".1");
    PathBuf::from(name)
}

/// Install the global subscriber. Call once at startup.
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<(), String> {
    let sink = RollingSink::open(&log_dir, app_name, MAX_FILE_BYTES, BUFFER_LINES)
        .map_err(|e| format!("Failed to open log file in {}: {}", log_dir.display(), e))?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(sink.clone())
        .with_ansi(false)
        .with_timer(LocalTime);
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_timer(LocalTime);

    let subscriber = tracing_subscriber::registry()
        .with(LevelFilter::INFO)
        .with(file_layer)
        .with(stderr_layer);

    #[cfg(target_os = "android")]
    {
        android_logger::init_once(
            android_logger::Config::default()
                .with_max_level(log::LevelFilter::Info)
                .with_tag(app_name),
        );
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| format!("Failed to install subscriber: {}", e))?;
    }

    #[cfg(not(target_os = "android"))]
    subscriber
        .try_init()
        .map_err(|e| format!("Failed to install subscriber: {}", e))?;

    SINK.set(sink)
        .map_err(|_| "Logger already initialized".to_string())?;

    log::info!("{} logging to {}", app_name, log_dir.display());
    Ok(())
}

fn ensure_initialized() -> Result<(), String> {
    SINK.get()
        .map(|_| ())
        .ok_or_else(|| "Logger not initialized".to_string())
}

pub fn info(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::info!("{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::warn!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::error!("{}", msg);
    Ok(())
}

/// Recent log lines, empty before `init_logger`
pub fn recent_lines() -> Vec<String> {
    SINK.get().map(|sink| sink.recent()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_lines_are_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let sink = RollingSink::open(dir.path(), "test", MAX_FILE_BYTES, 3).unwrap();
        let mut writer = sink.make_writer();

        for i in 0..5 {
            writeln!(writer, "line {}", i).unwrap();
        }

        assert_eq!(sink.recent(), vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn test_partial_writes_join_into_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let sink = RollingSink::open(dir.path(), "test", MAX_FILE_BYTES, 10).unwrap();
        let mut writer = sink.make_writer();

        write!(writer, "hello ").unwrap();
        assert!(sink.recent().is_empty());
        writeln!(writer, "world").unwrap();

        assert_eq!(sink.recent(), vec!["hello world"]);
    }

    #[test]
    fn test_rotation_moves_full_file_aside() {
        let dir = tempfile::tempdir().unwrap();
        let sink = RollingSink::open(dir.path(), "app", 16, 10).unwrap();
        let mut writer = sink.make_writer();

        writeln!(writer, "0123456789abcdef").unwrap();
        writeln!(writer, "after").unwrap();
        writer.flush().unwrap();

        let rotated = fs::read_to_string(dir.path().join("app.log.1")).unwrap();
        assert_eq!(rotated, "0123456789abcdef\n");
        let active = fs::read_to_string(sink.path()).unwrap();
        assert_eq!(active, "after\n");
    }
}
