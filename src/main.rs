use clap::Parser;
use diskarte::core::config::{self, CliOverrides, StartupLog};
use diskarte::tui;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "diskarte", about = "Career assistant chat in the terminal")]
struct Args {
    /// Config file to use instead of ~/.diskarte/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulated assistant reply delay in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Where to write the log
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Held until the logger exists: its file and level come from this config
    let mut startup_log = StartupLog::new();
    let file_config = match config::load_config(args.config.as_deref(), &mut startup_log) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("diskarte: {e}");
            std::process::exit(1);
        }
    };
    let cli = CliOverrides {
        delay_ms: args.delay_ms,
        log_file: args.log_file,
    };
    let config = config::resolve(&file_config, &cli, &mut startup_log);

    // File logger: the terminal belongs to the TUI
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&config.log_file) {
        let _ = WriteLogger::init(config.log_level, log_config, log_file);
    }
    startup_log.flush();

    log::info!(
        "Diskarte starting up (reply delay {:?}, log level {})",
        config.reply_delay,
        config.log_level
    );

    tui::run(config)
}
