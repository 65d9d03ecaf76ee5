//! Event logger
//!
//! Writes drained bus events as JSON lines, one file per session.

use bevy::prelude::*;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::bus::BusEvent;
use super::types::GameEvent;

/// Configuration for event logging
#[derive(Resource, Clone, Debug)]
pub struct EventLogConfig {
    /// Directory for log files
    pub log_dir: PathBuf,
    pub enabled: bool,
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            enabled: true,
        }
    }
}

/// One line of an `.evlog` file
#[derive(Serialize)]
struct LogLine<'a> {
    t: u32,
    tick: u64,
    event: &'a GameEvent,
}

/// Active event logger with file handle
#[derive(Resource)]
pub struct EventLogger {
    writer: Option<BufWriter<File>>,
    path: Option<PathBuf>,
    session_id: String,
    config: EventLogConfig,
}

impl EventLogger {
    /// Create a new event logger (but don't open file yet)
    pub fn new(config: EventLogConfig) -> Self {
        Self {
            writer: None,
            path: None,
            session_id: String::new(),
            config,
        }
    }

    /// Start a new log session and write its SessionStart line
    pub fn start_session(&mut self) {
        if !self.config.enabled {
            return;
        }

        self.session_id = Uuid::new_v4().to_string();

        if let Err(e) = std::fs::create_dir_all(&self.config.log_dir) {
            warn!("Failed to create log directory: {}", e);
            return;
        }

        let now = chrono::Local::now();
        let filename = format!(
            "{}_{}.evlog",
            now.format("%Y%m%d_%H%M%S"),
            &self.session_id[..8]
        );
        let path = self.config.log_dir.join(filename);

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
        {
            Ok(file) => {
                self.writer = Some(BufWriter::new(file));
                info!(
                    "Event logging started: {} (session: {})",
                    path.display(),
                    &self.session_id[..8]
                );
                self.path = Some(path);

                let start = BusEvent {
                    time_ms: 0,
                    tick: 0,
                    event: GameEvent::SessionStart {
                        session_id: self.session_id.clone(),
                        timestamp: now.to_rfc3339(),
                    },
                };
                self.log(&start);
            }
            Err(e) => {
                warn!("Failed to open event log: {}", e);
            }
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Path of the file being written, once a session is open
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Flush and close the current session
    pub fn end_session(&mut self) {
        if let Some(mut writer) = self.writer.take()
            && let Err(e) = writer.flush()
        {
            warn!("Failed to flush event log: {}", e);
        }
    }

    pub fn log(&mut self, event: &BusEvent) {
        let Some(writer) = &mut self.writer else {
            return;
        };

        let line = LogLine {
            t: event.time_ms,
            tick: event.tick,
            event: &event.event,
        };
        match serde_json::to_string(&line) {
            Ok(json) => {
                if let Err(e) = writeln!(writer, "{}", json) {
                    warn!("Failed to write event: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize event: {}", e),
        }
    }

    pub fn log_all<'a>(&mut self, events: impl IntoIterator<Item = &'a BusEvent>) {
        for event in events {
            self.log(event);
        }
    }

    /// Check if logging is active
    pub fn is_active(&self) -> bool {
        self.writer.is_some()
    }
}

impl Default for EventLogger {
    fn default() -> Self {
        Self::new(EventLogConfig::default())
    }
}
