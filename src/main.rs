//! Speak through a mask.
//!
//! A Discord bot offering a single slash command, `/écrire`, which reposts the
//! invoking user's text and images in the current channel under the bot's
//! name. Interactions are received over HTTP; see [discord].
//!
//! The same server answers `GET /` so that the host doesn't idle the process.

use config::{Config, DiscordConfig};
use discord::api::DiscordClient;
use dotenvy::dotenv;
use router::{Deps, DiscordDeps};
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, sync::oneshot};
use tracing::{error, info, warn};

mod anon;
mod config;
mod discord;
mod router;

/// Application entrypoint. Initialises tracing, reads configuration from the
/// environment, binds to 0.0.0.0, and starts the server.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    // A panicking task is torn down by Tokio without taking the process with
    // it. This makes sure it's at least in the logs.
    std::panic::set_hook(Box::new(|info| error!("{}", info)));

    let has_dotenv = dotenv().is_ok();
    if !has_dotenv {
        warn!("No .env found");
    }

    let config = Config::from_env();
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    server_(addr, config).await;
}

/// Initialise a server without graceful shutdown.
async fn server_(addr: SocketAddr, config: Config) {
    let listener = match TcpListener::bind(addr).await {
        Ok(x) => x,
        Err(e) => {
            error!("Could not bind to {}: {}", addr, e);
            return;
        }
    };

    // Giving a receiver that will never resolve.
    server(listener, config, oneshot::channel::<()>().1).await;
}

/// Initialise a server with graceful shutdown via `rx`.
async fn server(listener: TcpListener, config: Config, rx: oneshot::Receiver<()>) {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on {}", addr);
    }

    let discord = match config.discord {
        Ok(x) => Some(connect(x)),
        Err(e) => {
            error!("Discord is unavailable, {}; serving liveness only", e);
            None
        }
    };

    let res = axum::serve(listener, router::new(Deps { discord }))
        .with_graceful_shutdown(async {
            rx.await.ok();
        })
        .await;

    if let Err(e) = res {
        error!("Server failed: {}", e);
    }
}

/// Build the Discord client and sync our slash command in the background.
fn connect(config: DiscordConfig) -> DiscordDeps {
    let DiscordConfig {
        token,
        application_id,
        public_key,
        api_base,
    } = config;

    let client = Arc::new(DiscordClient::new(api_base, token));

    tokio::spawn({
        let client = client.clone();
        async move { anon::command::register(&client, &application_id).await }
    });

    DiscordDeps {
        api: client,
        public_key,
    }
}
