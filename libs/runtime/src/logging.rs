use crate::config::{LoggingConfig, Section};
use std::{
    io::{IsTerminal, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::filter::{FilterFn, Targets};
use tracing_subscriber::fmt;

use file_rotate::{
    compression::Compression,
    suffix::AppendCount,
    ContentLimit, FileRotate,
};

const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 3;

// -------- levels --------

fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

/// True if `target` is `prefix` itself or a path below it (`prefix::...`).
fn matches_target_prefix(target: &str, prefix: &str) -> bool {
    target == prefix
        || (target.starts_with(prefix) && target[prefix.len()..].starts_with("::"))
}

type CatchAllFilter = FilterFn<Box<dyn Fn(&tracing::Metadata<'_>) -> bool + Send + Sync>>;

/// Filter for the "default" section: everything not claimed by an explicit subsystem.
fn catch_all_filter(claimed: &[String], max_level: Level) -> CatchAllFilter {
    let claimed = claimed.to_vec();
    FilterFn::new(Box::new(move |meta: &tracing::Metadata<'_>| {
        !claimed.iter().any(|c| matches_target_prefix(meta.target(), c))
            && meta.level() <= &max_level
    }))
}

// -------- rotating file sinks --------

#[derive(Clone)]
struct RotatingFile(Arc<Mutex<FileRotate<AppendCount>>>);

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.0.lock() {
            Ok(mut f) => f.write(buf),
            // poisoned by a panicking writer: drop the record
            Err(_) => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self.0.lock() {
            Ok(mut f) => f.flush(),
            Err(_) => Ok(()),
        }
    }
}

/// Writer that silently discards, used when a record has no file destination.
struct Discard;

impl Write for Discard {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

enum FileSink {
    File(RotatingFile),
    Discard(Discard),
}

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            FileSink::File(f) => f.write(buf),
            FileSink::Discard(d) => d.write(buf),
        }
    }
    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            FileSink::File(f) => f.flush(),
            FileSink::Discard(d) => d.flush(),
        }
    }
}

/// Routes each record to the file of the subsystem whose prefix matches its target,
/// falling back to the default file.
#[derive(Clone, Default)]
struct FileRouter {
    default: Option<RotatingFile>,
    by_prefix: Vec<(String, RotatingFile)>,
}

impl FileRouter {
    fn resolve(&self, target: &str) -> Option<RotatingFile> {
        self.by_prefix
            .iter()
            .find(|(prefix, _)| matches_target_prefix(target, prefix))
            .map(|(_, f)| f.clone())
            .or_else(|| self.default.clone())
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_prefix.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = FileSink;

    fn make_writer(&'a self) -> Self::Writer {
        match &self.default {
            Some(f) => FileSink::File(f.clone()),
            None => FileSink::Discard(Discard),
        }
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        match self.resolve(meta.target()) {
            Some(f) => FileSink::File(f),
            None => FileSink::Discard(Discard),
        }
    }
}

/// Relative paths are joined onto `base_dir`; absolute paths are kept.
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn open_rotating_file(section: &Section, base_dir: &Path) -> std::io::Result<RotatingFile> {
    let path = resolve_log_path(&section.file, base_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let backups = section.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS);

    let rot = FileRotate::new(
        &path,
        AppendCount::new(backups),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Ok(RotatingFile(Arc::new(Mutex::new(rot))))
}

fn file_for(name: &str, section: &Section, base_dir: &Path) -> Option<RotatingFile> {
    if section.file.trim().is_empty() {
        return None;
    }
    match open_rotating_file(section, base_dir) {
        Ok(f) => Some(f),
        Err(e) => {
            // the subscriber is not installed yet, stderr is the only channel
            eprintln!(
                "Failed to open log file for '{name}' ({}): {e}",
                resolve_log_path(&section.file, base_dir).display()
            );
            None
        }
    }
}

// -------- plan --------

/// Logging setup derived from the config, before any subscriber is installed.
struct LoggingPlan {
    console: Targets,
    file: Targets,
    default_console: Option<Level>,
    default_file: Option<Level>,
    claimed: Vec<String>,
    router: FileRouter,
}

fn build_plan(cfg: &LoggingConfig, base_dir: &Path) -> LoggingPlan {
    let mut console = Targets::new().with_default(LevelFilter::OFF);
    let mut file = Targets::new().with_default(LevelFilter::OFF);
    let mut router = FileRouter::default();
    let mut claimed = Vec::new();

    for (name, section) in cfg.iter().filter(|(k, _)| k.as_str() != "default") {
        claimed.push(name.clone());
        if let Some(level) = parse_tracing_level(&section.console_level) {
            console = console.with_target(name.clone(), LevelFilter::from_level(level));
        }
        if let Some(f) = file_for(name, section, base_dir) {
            if let Some(level) = parse_tracing_level(&section.file_level) {
                file = file.with_target(name.clone(), LevelFilter::from_level(level));
            }
            router.by_prefix.push((name.clone(), f));
        }
    }

    let default = cfg.get("default");
    router.default = default.and_then(|s| file_for("default", s, base_dir));

    LoggingPlan {
        console,
        file,
        default_console: default.and_then(|s| parse_tracing_level(&s.console_level)),
        default_file: default
            .filter(|_| router.default.is_some())
            .and_then(|s| parse_tracing_level(&s.file_level)),
        claimed,
        router,
    }
}

// -------- public init --------

/// Install the global tracing subscriber.
/// - `cfg`: subsystem sections ("default" is the catch-all)
/// - `base_dir`: directory relative log file paths are resolved against (server.home_dir)
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // bridge `log` records before the subscriber goes in
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        init_default_logging();
        return;
    }

    install(build_plan(cfg, base_dir));
}

fn init_default_logging() {
    let _ = fmt()
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .try_init();
}

fn install(plan: LoggingPlan) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, Registry};

    let ansi = std::io::stdout().is_terminal();

    let console = fmt::layer()
        .with_ansi(ansi)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(plan.console);

    let console_default = plan.default_console.map(|level| {
        fmt::layer()
            .with_ansi(ansi)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_filter(catch_all_filter(&plan.claimed, level))
    });

    let files = (!plan.router.is_empty()).then(|| {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(plan.router.clone())
            .with_filter(plan.file)
    });

    let file_default = plan.default_file.map(|level| {
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(plan.router.clone())
            .with_filter(catch_all_filter(&plan.claimed, level))
    });

    // Option<Layer> is itself a Layer, absent sinks are no-ops
    let _ = Registry::default()
        .with(console)
        .with(console_default)
        .with(files)
        .with(file_default)
        .try_init();
}

/// Explicit subsystem sections keyed by name, for diagnostics (`--print-config`).
pub fn subsystem_names(cfg: &LoggingConfig) -> Vec<String> {
    let mut names: Vec<String> = cfg
        .keys()
        .filter(|k| k.as_str() != "default")
        .cloned()
        .collect();
    names.sort();
    names
}
