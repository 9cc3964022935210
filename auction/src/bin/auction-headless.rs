//! Headless auction client driven over stdio.
//!
//! Reads `Command` JSON lines from stdin and writes one `Response` line per
//! command to stdout. Logging goes to stderr; stdout is reserved for the
//! protocol.
//!
//! Usage:
//!   AUCTION_STORE_PATH=/tmp/auctions.json AUCTION_ACCOUNT=0xA auction-headless
//!
//! On startup, emits a `Ready` JSON line to stdout.

use std::io::Write;

use charity_auction::{
    AuctionConfig, AuctionError, AuctionFilter, AuctionStatus, JsonFileStore, LocalSigner,
    MutationOutcome, NewAuction, Operation, RegistrySync, StatusFilter, Wallet,
};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// ── IPC types ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ReadyEvent<'a> {
    event: &'static str,
    store_path: String,
    account: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(tag = "cmd")]
enum Command {
    Connect {
        address: String,
    },
    Disconnect,
    List {
        #[serde(default)]
        search: Option<String>,
        #[serde(default)]
        status: Option<String>,
    },
    Stats,
    Create {
        item_name: String,
        charity: String,
        starting_bid: String,
    },
    PlaceBid {
        auction_id: String,
        amount: String,
    },
    Close {
        auction_id: String,
    },
    Shutdown,
}

#[derive(Serialize)]
#[serde(tag = "status")]
enum Response {
    Ok { data: Option<serde_json::Value> },
    Err { message: String },
}

type Session = RegistrySync<JsonFileStore>;

// ── Helpers ──────────────────────────────────────────────────────────

fn init_logging_stderr() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .init();
}

fn emit_json(value: &impl Serialize) {
    let line = match serde_json::to_string(value) {
        Ok(line) => line,
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            return;
        }
    };
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{line}").and_then(|()| stdout.flush()) {
        error!("stdout write failed: {}", e);
    }
}

fn ok(data: impl Serialize) -> Response {
    match serde_json::to_value(data) {
        Ok(value) => Response::Ok { data: Some(value) },
        Err(e) => Response::Err {
            message: format!("Failed to encode result: {e}"),
        },
    }
}

fn connect(session: &Session, address: String) {
    let signer = LocalSigner::new(address.clone());
    session.connect(Wallet::new(address, signer));
}

fn parse_status_filter(status: Option<&str>) -> Result<StatusFilter, AuctionError> {
    match status {
        None | Some("all") => Ok(StatusFilter::All),
        Some(s) => s.parse::<AuctionStatus>().map(StatusFilter::Only),
    }
}

fn mutation_response(op: Operation, result: Result<MutationOutcome, AuctionError>) -> Response {
    match result {
        Ok(outcome) => {
            if !outcome.refresh.is_fresh() {
                warn!("Write committed, but the auction list may be stale");
            }
            ok(outcome)
        }
        Err(e) => Response::Err {
            message: e.user_message(op),
        },
    }
}

async fn handle(session: &Session, cmd: Command) -> Response {
    match cmd {
        Command::Connect { address } => {
            // A local signer is bound to one address, so switching accounts
            // means replacing the whole wallet.
            connect(session, address);
            ok(serde_json::json!({ "account": session.account() }))
        }
        Command::Disconnect => {
            session.disconnect();
            Response::Ok { data: None }
        }
        Command::List { search, status } => {
            let status = match parse_status_filter(status.as_deref()) {
                Ok(s) => s,
                Err(e) => {
                    return Response::Err {
                        message: e.to_string(),
                    }
                }
            };
            if let Err(e) = session.load_all().await {
                warn!("Refresh failed, showing cached list: {}", e);
            }
            let filter = AuctionFilter {
                search: search.unwrap_or_default(),
                status,
            };
            ok(session.filtered(&filter))
        }
        Command::Stats => {
            if let Err(e) = session.load_all().await {
                warn!("Refresh failed, showing cached stats: {}", e);
            }
            ok(session.stats())
        }
        Command::Create {
            item_name,
            charity,
            starting_bid,
        } => mutation_response(
            Operation::Create,
            session
                .create(NewAuction::new(item_name, charity, starting_bid))
                .await,
        ),
        Command::PlaceBid { auction_id, amount } => mutation_response(
            Operation::PlaceBid,
            session.place_bid(&auction_id, &amount).await,
        ),
        Command::Close { auction_id } => mutation_response(
            Operation::Close,
            session.close_auction(&auction_id).await,
        ),
        Command::Shutdown => Response::Ok { data: None },
    }
}

// ── Main ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    init_logging_stderr();

    let config = match AuctionConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    info!("auction-headless starting (store={})", config.store_path.display());

    let session = RegistrySync::new(JsonFileStore::new(config.store_path.clone()));
    if let Some(account) = config.default_account.clone() {
        connect(&session, account);
    }

    if let Err(e) = session.load_all().await {
        warn!("Initial load failed: {}", e);
    }

    emit_json(&ReadyEvent {
        event: "Ready",
        store_path: config.store_path.display().to_string(),
        account: config.default_account.as_deref(),
    });

    // Command loop
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(l)) => l,
            Ok(None) => {
                info!("stdin closed, shutting down");
                break;
            }
            Err(e) => {
                error!("stdin read error: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let cmd: Command = match serde_json::from_str(&line) {
            Ok(c) => c,
            Err(e) => {
                emit_json(&Response::Err {
                    message: format!("Invalid command JSON: {e}"),
                });
                continue;
            }
        };

        let shutdown = matches!(cmd, Command::Shutdown);
        emit_json(&handle(&session, cmd).await);
        if shutdown {
            info!("Shutdown command received");
            break;
        }
    }

    info!("Shutdown complete");
}
