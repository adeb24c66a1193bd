//! postbot CLI: terminal client for the postbot chat endpoint

use clap::{Parser, Subcommand};
use postbot_engine::conversation::CONNECTION_APOLOGY;
use postbot_engine::{
    locator_from_config, Config, Conversation, Driver, HttpBackend, LocationConfig, Sender, Timing,
};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Terminal chat client for the India Post assistant
#[derive(Parser, Debug)]
#[command(name = "postbot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (default: .postbot/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Chat endpoint URL, overriding the config file
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Latitude reported for location lookups (requires --lon)
    #[arg(long, global = true, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Longitude reported for location lookups (requires --lat)
    #[arg(long, global = true, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// More logging (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log file used while the chat window is open
    #[arg(long, global = true, default_value = "postbot.log")]
    log_file: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the chat window (default when no command specified)
    Tui,
    /// Send one message and print the reply
    Send {
        /// Message text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Send the greeting first, as opening the window would
        #[arg(long)]
        greet: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    let config = match effective_config(&cli) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    match cli.command {
        None | Some(Commands::Tui) => {
            // The screen belongs to the TUI, so logs go to a file.
            if let Err(e) = init_logging(cli.verbose, Some(&cli.log_file)) {
                fail(&format!("Failed to open {}: {e}", cli.log_file.display()));
            }
            let rt = runtime();
            if let Err(e) = rt.block_on(postbot_tui::run_tui(&config)) {
                fail(&e.to_string());
            }
        }
        Some(Commands::Send { text, greet, json }) => {
            let _ = init_logging(cli.verbose, None);
            cmd_send(&config, &text.join(" "), greet, json);
        }
        Some(Commands::Init { force }) => {
            let _ = init_logging(cli.verbose, None);
            let path = cli.config.clone().unwrap_or_else(Config::default_path);
            cmd_init(&path, force);
        }
        Some(Commands::Config) => {
            let _ = init_logging(cli.verbose, None);
            cmd_config(&config);
        }
    }
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

fn runtime() -> tokio::runtime::Runtime {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => fail(&format!("Failed to create tokio runtime: {e}")),
    }
}

/// Config file contents with command-line overrides applied.
fn effective_config(cli: &Cli) -> Result<Config, String> {
    let path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_default(&path)
        .map_err(|e| format!("Failed to load {}: {e}", path.display()))?;

    if let Some(endpoint) = &cli.endpoint {
        config.endpoint.clone_from(endpoint);
    }
    if let (Some(latitude), Some(longitude)) = (cli.lat, cli.lon) {
        config.location = LocationConfig::Fixed {
            latitude,
            longitude,
        };
    }
    Ok(config)
}

/// Install the tracing subscriber. `RUST_LOG` overrides the verbosity.
fn init_logging(verbosity: u8, log_file: Option<&Path>) -> std::io::Result<()> {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
    Ok(())
}

fn cmd_send(config: &Config, text: &str, greet: bool, json: bool) {
    let backend = match HttpBackend::new(config.endpoint.clone()) {
        Ok(backend) => backend,
        Err(e) => fail(&e.to_string()),
    };
    let (driver, mut outcomes) = Driver::new(Arc::new(backend), locator_from_config(&config.location));
    let mut conversation = Conversation::new(Timing::immediate());
    debug!(endpoint = %config.endpoint, greet, "sending one-shot message");

    let rt = runtime();
    rt.block_on(async {
        if greet {
            driver.dispatch(conversation.open_window());
            driver.settle(&mut conversation, &mut outcomes).await;
        }
        driver.dispatch(conversation.send_message(text));
        driver.settle(&mut conversation, &mut outcomes).await;
    });

    if json {
        let output = serde_json::json!({
            "messages": conversation.transcript().messages(),
            "options": conversation.options(),
        });
        match serde_json::to_string_pretty(&output) {
            Ok(s) => println!("{s}"),
            Err(e) => fail(&e.to_string()),
        }
    } else {
        for message in conversation.transcript().messages() {
            let who = match message.sender {
                Sender::User => "you",
                Sender::Bot => "bot",
            };
            println!("{who}> {}", message.text);
        }
        if !conversation.options().is_empty() {
            println!("\nOptions:");
            for option in conversation.options() {
                println!("  {} ({})", option.text, option.value);
            }
        }
    }

    let failed = conversation
        .transcript()
        .last()
        .is_some_and(|m| m.sender == Sender::Bot && m.text == CONNECTION_APOLOGY);
    if failed {
        fail(&format!("No usable reply from {}", config.endpoint));
    }
}

fn cmd_init(path: &Path, force: bool) {
    if path.exists() && !force {
        println!("Config already exists at {}", path.display());
        return;
    }
    match Config::default().save(path) {
        Ok(()) => println!("Created {}", path.display()),
        Err(e) => fail(&format!("Failed to write config: {e}")),
    }
}

fn cmd_config(config: &Config) {
    match serde_json::to_string_pretty(config) {
        Ok(s) => println!("{s}"),
        Err(e) => fail(&e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_is_tui() {
        let cli = parse(&["postbot"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.log_file, PathBuf::from("postbot.log"));
    }

    #[test]
    fn test_send_joins_words() {
        let cli = parse(&["postbot", "send", "--greet", "track", "my", "parcel"]);
        match cli.command {
            Some(Commands::Send { text, greet, json }) => {
                assert_eq!(text.join(" "), "track my parcel");
                assert!(greet);
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_send_requires_text() {
        assert!(Cli::try_parse_from(["postbot", "send"]).is_err());
    }

    #[test]
    fn test_lat_requires_lon() {
        assert!(Cli::try_parse_from(["postbot", "--lat", "12.9"]).is_err());
    }

    #[test]
    fn test_overrides_apply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let path_arg = path.to_string_lossy().to_string();
        let cli = parse(&[
            "postbot",
            "--config",
            &path_arg,
            "--endpoint",
            "http://localhost:8080/chatbot",
            "--lat",
            "-33.9",
            "--lon",
            "18.4",
            "config",
        ]);
        let config = effective_config(&cli).unwrap();
        assert_eq!(config.endpoint, "http://localhost:8080/chatbot");
        assert_eq!(
            config.location,
            LocationConfig::Fixed {
                latitude: -33.9,
                longitude: 18.4
            }
        );
        assert_eq!(config.title, "India Post Assistant");
    }

    #[test]
    fn test_bad_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        let path_arg = path.to_string_lossy().to_string();

        let cli = parse(&["postbot", "--config", &path_arg, "config"]);
        let err = effective_config(&cli).unwrap_err();
        assert!(err.starts_with("Failed to load"));
    }
}
