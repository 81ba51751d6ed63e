use clap::Parser;
use marquee::SortBy;
use marquee::core::config::{self, CliOverrides};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "marquee", about = "Browse TMDB movie listings in the terminal")]
struct Args {
    /// Sort order to open with
    #[arg(short, long, value_enum)]
    sort: Option<SortBy>,

    /// TMDB API key (overrides config file and TMDB_API_KEY)
    #[arg(long)]
    api_key: Option<String>,
}

/// `~/.marquee/marquee.log`, or `marquee.log` in the current directory.
fn log_path() -> PathBuf {
    config::config_dir()
        .filter(|dir| std::fs::create_dir_all(dir).is_ok())
        .map(|dir| dir.join("marquee.log"))
        .unwrap_or_else(|| PathBuf::from("marquee.log"))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(log_path()) {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().map_err(std::io::Error::other)?;
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            sort_by: args.sort,
            api_key: args.api_key,
        },
    );

    log::info!("Marquee starting up with sort order: {:?}", resolved.sort_by);

    marquee::tui::run(resolved)
}
