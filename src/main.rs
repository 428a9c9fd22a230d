use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use ratatui::crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use ratatui::crossterm::execute;

use scribe::app::{self, App};
use scribe::config::load_config;
use scribe::context::Granularity;
use scribe::engine::SuggestionEngine;
use scribe::service::{HttpSuggestionService, SuggestionService};

/// Real-time AI writing suggestions in the terminal
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Text file to start from (never written back)
    file: Option<PathBuf>,

    /// Config file path (default: <config dir>/scribe/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Suggest per paragraph or for the whole document
    #[arg(long, value_enum)]
    granularity: Option<Granularity>,

    /// Suggestion service base URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Quiet period before a request is sent, in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,
}

fn main() -> Result<()> {
    // Install color-eyre panic hook for better error messages
    color_eyre::install()?;

    let args = Args::parse();

    #[cfg(debug_assertions)]
    init_file_logger();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(granularity) = args.granularity {
        config.suggestions.granularity = granularity;
    }
    if let Some(endpoint) = args.endpoint {
        config.service.endpoint = endpoint;
    }
    if let Some(debounce_ms) = args.debounce_ms {
        config.suggestions.debounce_ms = debounce_ms;
    }

    let (initial, title) = match &args.file {
        Some(path) => (
            fs::read_to_string(path)
                .wrap_err_with(|| format!("Failed to read {}", path.display()))?,
            path.display().to_string(),
        ),
        None => (String::new(), "scribe".to_string()),
    };

    let service: Arc<dyn SuggestionService> =
        Arc::new(HttpSuggestionService::from_config(&config.service)?);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let engine = SuggestionEngine::new(&config, service);
        let app = App::new(&initial, title, engine);

        // Initialize terminal (handles raw mode, alternate screen, etc.)
        let terminal = ratatui::init();
        // Pasted text arrives as one event instead of a key per char
        execute!(io::stdout(), EnableBracketedPaste)?;
        let result = app::run(terminal, app).await;

        // Restore terminal (automatic cleanup)
        let _ = execute!(io::stdout(), DisableBracketedPaste);
        ratatui::restore();

        result
    })
}

/// Log to a file in the temp dir so output doesn't corrupt the UI
#[cfg(debug_assertions)]
fn init_file_logger() {
    let path = std::env::temp_dir().join("scribe-debug.log");
    let Ok(file) = fs::File::create(&path) else {
        return;
    };

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init();
}
