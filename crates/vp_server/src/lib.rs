//! vp_server: pick log persistence.
//!
//! | Method | Path                | Result                          |
//! |--------|---------------------|---------------------------------|
//! | POST   | `/api/picks`        | 201 + stored row, 400 on bad body |
//! | GET    | `/api/picks`        | rows newest first (`limit`, `offset`) |
//! | DELETE | `/api/picks/{id}`   | `{success, id}` or 404          |
//! | GET    | `/api/stats/recap`  | per-agent appearance counts     |

pub mod error;
pub mod routes;
pub mod store;

pub use error::{Result, ServerError};
pub use routes::{router, AppState};
pub use store::{PickRow, PickStore, RecapRow};

use std::sync::Arc;
use tokio::net::TcpListener;

pub const PORT: u16 = 3001;
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const DEFAULT_DATABASE_PATH: &str = "agent_picks.sqlite3";

/// Serve the API on an already-bound listener until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    store: Arc<PickStore>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = router(store);
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await
}
