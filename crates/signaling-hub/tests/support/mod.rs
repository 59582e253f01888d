//! Test harness: spawns a real hub on an ephemeral port against the backing
//! services named by `DATABASE_URL` and `REDIS_URL`, seeds users, and drives
//! WebSocket clients.

#![allow(dead_code)] // Each integration test binary uses a subset of the harness

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use signaling_hub::auth::jwt;
use signaling_hub::config::Config;
use signaling_hub::redis::SignalBus;
use signaling_hub::routes::{build_routes, AppState};
use signaling_hub::services::tokens::TokenIssuer;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use uuid::Uuid;

/// Session secret every test hub signs with.
pub const TEST_SESSION_SECRET: &str = "integration-test-session-secret";

/// A hub instance listening on an ephemeral port.
pub struct TestHub {
    pub addr: SocketAddr,
    pub pool: PgPool,
    pub bus: SignalBus,
    pub config: Config,
}

impl TestHub {
    /// Spawn a hub against `DATABASE_URL` / `REDIS_URL` with migrations
    /// applied and the debug endpoints enabled.
    pub async fn spawn() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL must point at a test database")?;
        let redis_url =
            std::env::var("REDIS_URL").context("REDIS_URL must point at a test instance")?;

        let vars = HashMap::from([
            ("SESSION_SECRET".to_string(), TEST_SESSION_SECRET.to_string()),
            ("LIVEKIT_API_KEY".to_string(), "APItest".to_string()),
            (
                "LIVEKIT_API_SECRET".to_string(),
                "integration-test-sfu-secret".to_string(),
            ),
            (
                "LIVEKIT_SERVER_URL".to_string(),
                "wss://sfu.test.example.com".to_string(),
            ),
            ("DATABASE_URL".to_string(), database_url.clone()),
            ("REDIS_URL".to_string(), redis_url.clone()),
            ("ENABLE_DEBUG_ENDPOINTS".to_string(), "true".to_string()),
        ]);
        let config = Config::from_vars(&vars)?;

        let pool = PgPoolOptions::new()
            .max_connections(4)
            .connect(&database_url)
            .await?;
        sqlx::migrate!("../../migrations").run(&pool).await?;

        let bus = SignalBus::connect(&redis_url).await?;
        let tokens = TokenIssuer::from_config(&config);

        let state = Arc::new(AppState {
            pool: pool.clone(),
            config: config.clone(),
            bus: bus.clone(),
            tokens,
        });
        let app = build_routes(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("test hub server error: {e}");
            }
        });

        Ok(Self {
            addr,
            pool,
            bus,
            config,
        })
    }

    /// Base URL for HTTP requests.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Insert a team and return its id.
    pub async fn seed_team(&self, name: &str) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("INSERT INTO teams (name) VALUES ($1) RETURNING id")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    /// Insert a user and return their id.
    pub async fn seed_user(
        &self,
        first_name: &str,
        email: &str,
        team_id: Option<i64>,
    ) -> Result<String> {
        let id = Uuid::now_v7().to_string();
        sqlx::query(
            "INSERT INTO users (id, first_name, last_name, email, team_id) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&id)
        .bind(first_name)
        .bind("Tester")
        .bind(email)
        .bind(team_id)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    /// Mint a bearer token the hub will accept for this email.
    pub fn bearer_for(&self, email: &str) -> String {
        jwt::issue_session_token(email, &self.config.session_secret)
            .expect("test token should sign")
    }

    /// Open a signaling WebSocket as the given user, authenticating through
    /// the `token` query parameter like the desktop client does.
    pub async fn connect_ws(&self, email: &str) -> Result<WsClient> {
        let token = self.bearer_for(email);
        let url = format!("ws://{}/api/auth/websocket?token={token}", self.addr);
        let (socket, _response) = connect_async(url).await?;
        Ok(WsClient { socket })
    }

    /// Poll the presence registry until it reports `expected`, or fail after
    /// ~5 seconds.
    pub async fn await_presence(&self, user_id: &str, expected: bool) -> Result<()> {
        for _ in 0..50 {
            if self.bus.is_present(user_id).await? == expected {
                return Ok(());
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("presence for {user_id} never became {expected}");
    }
}

/// A connected signaling client.
pub struct WsClient {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    /// Send a raw text frame.
    pub async fn send_text(&mut self, text: &str) -> Result<()> {
        self.socket.send(Message::Text(text.into())).await?;
        Ok(())
    }

    /// Receive the next text frame as JSON, skipping non-text frames.
    pub async fn next_json(&mut self) -> Result<serde_json::Value> {
        loop {
            let frame = tokio::time::timeout(Duration::from_secs(5), self.socket.next())
                .await
                .context("timed out waiting for a frame")?
                .context("socket closed")??;
            if let Message::Text(text) = frame {
                return Ok(serde_json::from_str(&text)?);
            }
        }
    }

    /// Receive frames until one carries the given tag, returning it.
    ///
    /// Interleaved presence traffic (`teammate_online`) makes strict
    /// expectations brittle; skipped frames are simply dropped.
    pub async fn wait_for(&mut self, tag: &str) -> Result<serde_json::Value> {
        for _ in 0..20 {
            let value = self.next_json().await?;
            if value["type"] == tag {
                return Ok(value);
            }
        }
        anyhow::bail!("never received a \"{tag}\" frame");
    }

    /// Close the connection.
    pub async fn close(mut self) -> Result<()> {
        self.socket.close(None).await?;
        Ok(())
    }
}

/// A unique label for this test run, keeping seeded rows disjoint.
pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// A unique email address for this test run.
pub fn unique_email(prefix: &str) -> String {
    format!("{}@example.com", unique(prefix))
}
