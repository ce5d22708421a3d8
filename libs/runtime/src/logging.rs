use std::{
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex},
};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry,
};

use crate::config::{LoggingConfig, Section};
use crate::paths::resolve_against;

const DEFAULT_KEY: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 3;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

fn parse_level(s: &str) -> LevelFilter {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" | "warning" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" | "none" => LevelFilter::OFF,
        // unset or unknown
        _ => LevelFilter::INFO,
    }
}

// -------- rotating file writer --------

#[derive(Clone)]
struct RotatingWriter(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl RotatingWriter {
    fn open(path: &Path, section: &Section) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
        let keep = section.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS);
        let rotate = FileRotate::new(
            path,
            AppendTimestamp::default(FileLimit::MaxFiles(keep)),
            ContentLimit::BytesSurpassed(max_bytes as usize),
            Compression::None,
            #[cfg(unix)]
            None,
        );
        Ok(Self(Arc::new(Mutex::new(rotate))))
    }
}

impl Write for RotatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?
            .write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?
            .flush()
    }
}

impl<'a> fmt::MakeWriter<'a> for RotatingWriter {
    type Writer = RotatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

// -------- filters --------

/// Console filter: the default section sets the fallback level, named sections override it.
fn console_targets(cfg: &LoggingConfig) -> Targets {
    let fallback = cfg
        .get(DEFAULT_KEY)
        .map(|s| parse_level(&s.console_level))
        .unwrap_or(LevelFilter::OFF);

    cfg.iter()
        .filter(|(name, _)| name.as_str() != DEFAULT_KEY)
        .fold(Targets::new().with_default(fallback), |targets, (name, s)| {
            targets.with_target(name.clone(), parse_level(&s.console_level))
        })
}

/// File filter for one section. Records from other named sections are routed
/// to their own files, so the default file mutes them.
fn file_targets(cfg: &LoggingConfig, name: &str, section: &Section) -> Targets {
    let level = parse_level(&section.file_level);
    if name != DEFAULT_KEY {
        return Targets::new()
            .with_default(LevelFilter::OFF)
            .with_target(name.to_string(), level);
    }

    cfg.keys()
        .filter(|k| k.as_str() != DEFAULT_KEY)
        .fold(Targets::new().with_default(level), |targets, other| {
            targets.with_target(other.clone(), LevelFilter::OFF)
        })
}

fn file_layers(cfg: &LoggingConfig, base_dir: &Path) -> Vec<BoxedLayer> {
    let mut layers = Vec::new();
    for (name, section) in cfg {
        if section.file.trim().is_empty() {
            continue;
        }
        let path = resolve_against(&section.file, base_dir);
        let writer = match RotatingWriter::open(&path, section) {
            Ok(w) => w,
            Err(e) => {
                eprintln!(
                    "failed to open log file '{}' for '{}': {}",
                    path.display(),
                    name,
                    e
                );
                continue;
            }
        };
        let layer: BoxedLayer = fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(writer)
            .with_filter(file_targets(cfg, name, section))
            .boxed();
        layers.push(layer);
    }
    layers
}

// -------- public init --------

/// Install the global subscriber.
///
/// `base_dir` anchors relative log file paths (normally `server.home_dir`).
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` records before the subscriber goes in.
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        init_default_logging();
        return;
    }

    let console: BoxedLayer = fmt::layer()
        .with_ansi(io::stdout().is_terminal())
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(console_targets(cfg))
        .boxed();

    let mut layers = vec![console];
    layers.extend(file_layers(cfg, base_dir));

    let _ = Registry::default().with(layers).try_init();
}

fn init_default_logging() {
    let _ = fmt()
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .try_init();
}
