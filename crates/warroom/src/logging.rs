use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log file name inside the data directory
pub const LOG_FILE: &str = "warroom.log";

/// Maximum log file size before rotation (5 MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
/// Size to keep after rotation (1 MB of most recent logs)
const KEEP_SIZE: u64 = 1024 * 1024;

const ROTATION_MARKER: &[u8] = b"--- Log rotated (older entries removed) ---\n";

/// Truncate the log to its most recent `keep` bytes once it grows past `max`.
///
/// The kept tail starts at a line boundary.
fn rotate_log_if_needed(log_path: &Path, max: u64, keep: u64) -> io::Result<bool> {
    if !log_path.exists() {
        return Ok(false);
    }

    let file_size = fs::metadata(log_path)?.len();
    if file_size <= max {
        return Ok(false);
    }

    let mut file = File::open(log_path)?;
    file.seek(SeekFrom::Start(file_size.saturating_sub(keep)))?;
    let mut tail = Vec::new();
    file.read_to_end(&mut tail)?;
    drop(file);

    let skip = tail
        .iter()
        .position(|&b| b == b'\n')
        .map_or(0, |i| i + 1);

    let mut file = File::create(log_path)?;
    file.write_all(ROTATION_MARKER)?;
    file.write_all(&tail[skip..])?;

    Ok(true)
}

/// Cloneable handle to one log sink
///
/// Each event gets its own clone from `make_writer`; all clones append to the
/// same underlying writer under a lock that survives a panicking holder.
struct SharedLog<W>(Arc<Mutex<W>>);

impl<W: Write> SharedLog<W> {
    fn new(inner: W) -> Self {
        Self(Arc::new(Mutex::new(inner)))
    }

    fn with_inner<T>(&self, f: impl FnOnce(&mut W) -> io::Result<T>) -> io::Result<T> {
        let mut guard = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl<W> Clone for SharedLog<W> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<W: Write> Write for SharedLog<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with_inner(|w| w.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_inner(Write::flush)
    }
}

impl<'a, W: Write + 'a> MakeWriter<'a> for SharedLog<W> {
    type Writer = SharedLog<W>;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Route `tracing` output to `{data_dir}/warroom.log`.
///
/// The file is trimmed to its last 1MB once it passes 5MB. `RUST_LOG`
/// overrides `level`; by default the front end logs at `level` and the
/// engine only at warn.
pub fn init_logging(data_dir: &Path, level: &str) -> color_eyre::Result<()> {
    fs::create_dir_all(data_dir)?;

    let log_path = data_dir.join(LOG_FILE);

    if let Err(e) = rotate_log_if_needed(&log_path, MAX_LOG_SIZE, KEEP_SIZE) {
        eprintln!("Warning: Failed to rotate log file: {e}");
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let default_filter = format!("warroom={level},warroom_core=warn");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(SharedLog::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false),
        )
        .init();

    tracing::info!(log_path = %log_path.display(), "War room logging initialized");
    Ok(())
}
