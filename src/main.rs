use chatline::core::config::{self, CliOverrides};
use chatline::tui;
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "chatline", about = "Terminal client for a remote chat assistant")]
struct Args {
    /// Chat service base URL (overrides config and CHATLINE_BASE_URL)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Render replies as literal text instead of markdown
    #[arg(long)]
    plain: bool,
}

/// Installs the file logger wide open; the configured level is applied with
/// `log::set_max_level` once the config has been read, so config loading
/// itself gets logged.
fn init_logging(log_file: File) -> bool {
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();
    WriteLogger::init(LevelFilter::Trace, log_config, log_file).is_ok()
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to chatline.log in current directory
    if let Ok(log_file) = File::create("chatline.log") {
        init_logging(log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Ignoring config file: {}", e);
        eprintln!("Ignoring config file: {e}");
        config::ChatlineConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            base_url: args.base_url,
            plain: args.plain,
        },
    );
    log::set_max_level(resolved.log_level);

    log::info!("Chatline starting up against {}", resolved.base_url);

    tui::run(resolved)
}
