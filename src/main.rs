use clap::Parser;
use duka::core::config::{self, CliOverrides};
use duka::gateway::Language;
use duka::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "duka", about = "Bilingual shop assistant chat client")]
struct Args {
    /// Chat service base URL (overrides config and DUKA_BASE_URL)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Starting language
    #[arg(short, long, value_enum)]
    language: Option<Language>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to duka.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("duka.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::error!("{}; falling back to defaults", e);
        Default::default()
    });
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            base_url: args.base_url,
            language: args.language,
        },
    );

    log::info!(
        "Duka starting up against {} ({})",
        resolved.base_url,
        resolved.language.code()
    );

    tui::run(resolved)
}
