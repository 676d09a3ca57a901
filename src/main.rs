use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use taskbot::commands::{Context, Dispatcher};
use taskbot::error::BotError;
use taskbot::output::Markup;
use taskbot::store::Store;
use taskbot::transport::console::ConsoleTransport;
use taskbot::transport::serve;
use taskbot::transport::telegram::TelegramTransport;
use taskbot::transport::telegram::api::TelegramApi;

const DEFAULT_POLL_TIMEOUT: u64 = 30;

#[derive(Parser)]
#[command(
    name = "taskbot",
    version,
    about = "Chat bot for tasks, tags, task lists and day plans"
)]
struct Cli {
    /// SQLite database file (created if missing)
    #[arg(long, global = true, env = "TASKBOT_DB", default_value = "taskbot.db")]
    db: PathBuf,
    /// Image sent by /lisy
    #[arg(
        long,
        global = true,
        env = "TASKBOT_ASSET",
        default_value = "assets/lisy.png"
    )]
    asset: PathBuf,
    /// Telegram bot token
    #[arg(long, global = true, env = "TASKBOT_TOKEN", hide_env_values = true)]
    token: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Long-poll Telegram and answer commands (the default)
    Serve {
        /// Seconds each getUpdates call waits for new messages
        #[arg(long, default_value_t = DEFAULT_POLL_TIMEOUT)]
        poll_timeout: u64,
    },
    /// Read commands from stdin, one per line, and print the replies
    Console {
        /// Account id the commands are attributed to
        #[arg(long, env = "TASKBOT_ACCOUNT", default_value_t = 1)]
        account: i64,
        /// Reply markup
        #[arg(long, value_enum, default_value = "plain")]
        markup: Markup,
    },
}

fn open_dispatcher(db: &Path, asset: &Path, markup: Markup) -> taskbot::error::Result<Dispatcher> {
    let store = Store::open(db)?;
    Ok(Dispatcher::new(Context {
        store,
        markup,
        asset_path: asset.to_path_buf(),
    }))
}

fn run(cli: Cli) -> taskbot::error::Result<()> {
    info!(version = %taskbot::build_info::version_line(), "starting taskbot");

    let command = cli.command.unwrap_or(Commands::Serve {
        poll_timeout: DEFAULT_POLL_TIMEOUT,
    });

    match command {
        Commands::Serve { poll_timeout } => {
            let token = cli.token.filter(|t| !t.trim().is_empty()).ok_or_else(|| {
                BotError::Config("missing bot token (use --token or TASKBOT_TOKEN)".into())
            })?;
            let api = TelegramApi::new(&token, poll_timeout)?;
            let dispatcher = open_dispatcher(&cli.db, &cli.asset, Markup::Html)?;
            let mut transport = TelegramTransport::new(api, poll_timeout, Markup::Html);
            serve(&mut transport, &dispatcher)?;
            dispatcher.into_context().store.close()
        }
        Commands::Console { account, markup } => {
            let dispatcher = open_dispatcher(&cli.db, &cli.asset, markup)?;
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            let mut transport = ConsoleTransport::new(stdin.lock(), stdout.lock(), account);
            serve(&mut transport, &dispatcher)?;
            dispatcher.into_context().store.close()
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
