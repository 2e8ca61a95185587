//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.diskarte/config.toml` unless `--config` points
//! elsewhere. If the default file is missing on first run, a commented-out
//! default is generated so users can discover all options.

use log::Level;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::script::{CannedReplies, ReplyTemplate};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DiskarteConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub replies: RepliesConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub reply_delay_ms: Option<u64>,
    pub log_file: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RepliesConfig {
    pub typed: Option<ReplyTemplate>,
    pub quick_reply: Option<ReplyTemplate>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_REPLY_DELAY_MS: u64 = 1500;
pub const DEFAULT_LOG_FILE: &str = "diskarte.log";
pub const DEFAULT_LOG_LEVEL: &str = "debug";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub reply_delay: Duration,
    pub log_file: PathBuf,
    pub log_level: log::LevelFilter,
    pub replies: CannedReplies,
}

/// Values supplied on the command line. `None` = flag not given.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub delay_ms: Option<u64>,
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Startup Log
// ============================================================================

/// Log lines produced while loading config.
///
/// The file logger's path and level come from the config itself, so nothing
/// is installed yet while it loads. Lines are held here and replayed once
/// the logger is up.
#[derive(Debug, Default)]
pub struct StartupLog {
    entries: Vec<(Level, String)>,
}

impl StartupLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, level: Level, message: impl Into<String>) {
        self.entries.push((level, message.into()));
    }

    pub fn entries(&self) -> &[(Level, String)] {
        &self.entries
    }

    /// Emit every held line through the installed logger.
    pub fn flush(self) {
        for (level, message) in self.entries {
            log::log!(level, "{}", message);
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.diskarte/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".diskarte").join("config.toml"))
}

/// Load config from `explicit` if given, otherwise from the default path.
///
/// A missing default file is generated and treated as empty. A missing
/// explicit file is an error, since the user asked for it by name.
pub fn load_config(
    explicit: Option<&Path>,
    log: &mut StartupLog,
) -> Result<DiskarteConfig, ConfigError> {
    if let Some(path) = explicit {
        return parse_file(path, log);
    }

    let path = match config_path() {
        Some(p) => p,
        None => {
            log.push(Level::Warn, "Could not determine home directory, using default config");
            return Ok(DiskarteConfig::default());
        }
    };

    if !path.exists() {
        log.push(
            Level::Info,
            format!("No config file found, generating default at {}", path.display()),
        );
        generate_default_config(&path, log);
        return Ok(DiskarteConfig::default());
    }

    parse_file(&path, log)
}

fn parse_file(path: &Path, log: &mut StartupLog) -> Result<DiskarteConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: DiskarteConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    log.push(Level::Info, format!("Loaded config from {}", path.display()));
    log.push(Level::Debug, format!("Config: {:?}", config));
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path, log: &mut StartupLog) {
    let default_content = r#"# Diskarte Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# reply_delay_ms = 1500              # Or set DISKARTE_REPLY_DELAY_MS
# log_file = "diskarte.log"
# log_level = "debug"                # Or set DISKARTE_LOG_LEVEL

# Answer given after free text
# [replies.typed]
# content = "That's a great question!"
# is_list = false
# quick_replies = ["Tell me more", "Show examples", "Next steps"]

# Answer given after a quick reply
# [replies.quick_reply]
# content = "Perfect! Here are some tips for that:\n\n• Use action verbs"
# is_list = true
# quick_replies = ["More tips", "Review my draft", "What's next?"]
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            log.push(Level::Warn, format!("Failed to create config directory: {}", e));
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        log.push(Level::Warn, format!("Failed to write default config: {}", e));
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &DiskarteConfig, cli: &CliOverrides, log: &mut StartupLog) -> ResolvedConfig {
    let env_delay = std::env::var("DISKARTE_REPLY_DELAY_MS").ok();
    let env_level = std::env::var("DISKARTE_LOG_LEVEL").ok();
    resolve_with_env(config, cli, env_delay.as_deref(), env_level.as_deref(), log)
}

fn resolve_with_env(
    config: &DiskarteConfig,
    cli: &CliOverrides,
    env_delay: Option<&str>,
    env_level: Option<&str>,
    log: &mut StartupLog,
) -> ResolvedConfig {
    // Delay: CLI → env → config → default
    let env_delay_ms = env_delay.and_then(|s| match s.trim().parse::<u64>() {
        Ok(ms) => Some(ms),
        Err(e) => {
            log.push(
                Level::Warn,
                format!("Ignoring DISKARTE_REPLY_DELAY_MS={:?}: {}", s, e),
            );
            None
        }
    });
    let delay_ms = cli
        .delay_ms
        .or(env_delay_ms)
        .or(config.general.reply_delay_ms)
        .unwrap_or(DEFAULT_REPLY_DELAY_MS);

    // Log file: CLI → config → default
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.general.log_file.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    // Log level: env → config → default
    let level_name = env_level
        .map(str::to_string)
        .or_else(|| config.general.log_level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    let log_level = parse_level(&level_name, log);

    let defaults = CannedReplies::default();
    let replies = CannedReplies {
        typed: config.replies.typed.clone().unwrap_or(defaults.typed),
        quick_reply: config.replies.quick_reply.clone().unwrap_or(defaults.quick_reply),
    };

    ResolvedConfig {
        reply_delay: Duration::from_millis(delay_ms),
        log_file,
        log_level,
        replies,
    }
}

fn parse_level(name: &str, log: &mut StartupLog) -> log::LevelFilter {
    name.trim().parse().unwrap_or_else(|_| {
        log.push(
            Level::Warn,
            format!("Unknown log level {:?}, using {}", name, DEFAULT_LOG_LEVEL),
        );
        log::LevelFilter::Debug
    })
}
