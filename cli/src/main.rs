use board::position::{Grid, PositionError, STANDARD_POSITION};
use clap::{Args, Parser, Subcommand};
use session::channel::{EventReceiver, Payload, TungsteniteConnector};
use session::host::HttpHostApi;
use session::manager::MessageHandler;
use session::notice::TracingNotifier;
use session::state::SessionState;
use session::{GameCode, SessionConfig, SessionError, SessionManager};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("invalid position: {0}")]
    Position(#[from] PositionError),
    #[error("stdin read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not host a game")]
    HostFailed,
    #[error("live session failed")]
    SessionFailed,
}

#[derive(Parser, Debug)]
#[command(name = "prime-chess", about = "prime-chess terminal client")]
struct Cli {
    /// Page origin the game server is reached through.
    #[arg(long, env = "PRIME_CHESS_ORIGIN")]
    origin: Option<String>,

    #[arg(long, env = "PRIME_CHESS_HTTP_TIMEOUT_SECS")]
    http_timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask the server for a new game, then join it.
    Host,
    /// Join an existing game by its 4-character code.
    Join(JoinArgs),
    /// Print a position as an 8x8 board.
    Show(ShowArgs),
}

#[derive(Args, Debug)]
struct JoinArgs {
    code: GameCode,
}

#[derive(Args, Debug)]
struct ShowArgs {
    #[arg(default_value = STANDARD_POSITION)]
    position: String,

    /// Reject malformed positions instead of padding or truncating them.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let mut config = SessionConfig::from_env();
    if let Some(origin) = cli.origin.as_deref() {
        config = config.with_origin(origin);
    }
    if let Some(secs) = cli.http_timeout_secs {
        config = config.with_http_timeout_secs(secs);
    }

    match cli.command {
        Command::Host => run_host(&config).await,
        Command::Join(args) => run_join(&config, args.code).await,
        Command::Show(args) => run_show(&args),
    }
}

async fn run_host(config: &SessionConfig) -> Result<(), CliError> {
    let api = HttpHostApi::new(config)?;
    let (mut manager, mut events) =
        SessionManager::new(config.origin.clone(), TungsteniteConnector, TracingNotifier, print_payload);

    if manager.host_game(&api).await.is_none() {
        return Err(CliError::HostFailed);
    }
    drive(&mut manager, &mut events).await
}

async fn run_join(config: &SessionConfig, code: GameCode) -> Result<(), CliError> {
    let (mut manager, mut events) =
        SessionManager::new(config.origin.clone(), TungsteniteConnector, TracingNotifier, print_payload);

    manager.connect(code);
    drive(&mut manager, &mut events).await
}

fn run_show(args: &ShowArgs) -> Result<(), CliError> {
    let grid = if args.strict { Grid::parse(&args.position)? } else { Grid::expand(&args.position) };
    println!("{grid}");
    println!("{}", grid.to_position());
    Ok(())
}

/// Relay channel events to the manager and stdin lines to the server until
/// the session ends.
async fn drive<H: MessageHandler>(
    manager: &mut SessionManager<TungsteniteConnector, TracingNotifier, H>,
    events: &mut EventReceiver,
) -> Result<(), CliError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    while !manager.state().is_terminal() {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                manager.handle(event);
            }
            line = lines.next_line(), if stdin_open => match line? {
                Some(text) if text.trim().is_empty() => {}
                Some(text) => {
                    if let Err(err) = manager.send(text) {
                        tracing::warn!(%err, "message not sent");
                    }
                }
                None => stdin_open = false,
            },
        }
    }

    match manager.state() {
        SessionState::Errored => Err(CliError::SessionFailed),
        _ => Ok(()),
    }
}

/// Positions are drawn as boards; anything else is echoed raw.
fn print_payload(payload: Payload) {
    match payload {
        Payload::Text(text) => match Grid::parse(text.trim()) {
            Ok(grid) => println!("{grid}"),
            Err(_) => println!("< {text}"),
        },
        Payload::Binary(bytes) => println!("< [{} bytes]", bytes.len()),
    }
}
