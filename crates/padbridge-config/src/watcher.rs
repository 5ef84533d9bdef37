use std::path::{Path, PathBuf};
use std::time::Duration;
use std::fs;

use crossbeam_channel::{unbounded, Receiver, Sender};
use notify::{Config, Error as NotifyError, RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{
    new_debouncer_opt, DebounceEventResult, DebouncedEventKind, Debouncer,
};
use thiserror::Error;

use crate::{parse_config, Config as PadConfig, ConfigError};

const DEBOUNCE_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Error, Debug)]
pub enum WatcherError {
    #[error("notify error: {0}")]
    Notify(#[from] NotifyError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] ConfigError),
}

/// Watches one config file and reports every settled change.
///
/// The parent directory is watched, so editors that save by replacing the
/// file are picked up too.
pub struct ConfigWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
}

#[derive(Debug)]
pub enum ConfigEvent {
    Changed(PadConfig),
    Removed,
    Error(WatcherError),
}

type ConfigEventSender = Sender<ConfigEvent>;
pub type ConfigEventReceiver = Receiver<ConfigEvent>;

fn read_config_event(path: &Path) -> ConfigEvent {
    if !path.exists() {
        return ConfigEvent::Removed;
    }
    match fs::read_to_string(path) {
        Ok(content) => match parse_config(&content) {
            Ok(config) => ConfigEvent::Changed(config),
            Err(e) => ConfigEvent::Error(WatcherError::Parse(e)),
        },
        Err(e) => ConfigEvent::Error(WatcherError::Io(e)),
    }
}

fn is_target(event_path: &Path, target: &Path) -> bool {
    event_path == target || event_path.file_name() == target.file_name()
}

impl ConfigWatcher {
    pub fn new_with_sender(
        path: &Path,
        tx: ConfigEventSender,
    ) -> Result<Self, WatcherError> {
        let target: PathBuf = path.to_owned();
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_owned(),
            _ => PathBuf::from("."),
        };

        let debouncer_config = notify_debouncer_mini::Config::default()
            .with_timeout(DEBOUNCE_TIMEOUT)
            .with_notify_config(Config::default());
        let mut debouncer = new_debouncer_opt::<_, RecommendedWatcher>(
            debouncer_config,
            move |events: DebounceEventResult| match events {
                Ok(events) => {
                    let touched = events.iter().any(|event| {
                        matches!(
                            event.kind,
                            DebouncedEventKind::Any | DebouncedEventKind::AnyContinuous
                        ) && is_target(&event.path, &target)
                    });
                    if touched {
                        log::debug!("config changed: {}", target.display());
                        let _ = tx.send(read_config_event(&target));
                    }
                }
                Err(error) => {
                    let _ = tx.send(ConfigEvent::Error(WatcherError::Notify(error)));
                }
            },
        )?;

        debouncer.watcher().watch(&dir, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _debouncer: debouncer,
        })
    }

    pub fn new(path: &Path) -> Result<(Self, ConfigEventReceiver), WatcherError> {
        let (tx, rx) = unbounded();

        Ok((Self::new_with_sender(path, tx)?, rx))
    }

    /// Like [`ConfigWatcher::new`], with the current file contents queued
    /// as the first event.
    pub fn new_with_starting_event(
        path: &Path,
    ) -> Result<(Self, ConfigEventReceiver), WatcherError> {
        let (tx, rx) = unbounded();

        let _ = tx.send(read_config_event(path));
        Ok((Self::new_with_sender(path, tx)?, rx))
    }
}
