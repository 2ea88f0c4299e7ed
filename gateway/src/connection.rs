//! Connection manager - owns the single database session
//!
//! The session is created lazily and replaced whenever it reports itself
//! closed. It sits behind an async mutex: an operation holds the lock from
//! the liveness check until its last fetch, so concurrent requests are
//! serialised and never interleave on the same link.

use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::error::GatewayResult;
use crate::session::{Connector, Session};

/// Exclusive hold on the session slot for one operation; always `Some`
/// when returned by [`ConnectionManager::ensure_connected`]
pub type SessionGuard<'a> = MutexGuard<'a, Option<Box<dyn Session>>>;

/// Lazily connecting, auto-reconnecting owner of one database session
pub struct ConnectionManager {
    connector: Arc<dyn Connector>,
    session: Mutex<Option<Box<dyn Session>>>,
}

impl ConnectionManager {
    /// Create a manager; no connection is made until first use
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            session: Mutex::new(None),
        }
    }

    /// Establish a new session, replacing any previous one
    ///
    /// Failures are logged and reported as `false`, never raised.
    pub async fn connect(&self) -> bool {
        let mut slot = self.session.lock().await;
        self.open(&mut slot).await.is_ok()
    }

    /// Release the session if one is held
    pub async fn disconnect(&self) {
        let session = self.session.lock().await.take();
        if let Some(session) = session {
            session.close().await;
        }
        tracing::info!("Database connection closed");
    }

    /// Whether a session is currently held (it may still be stale)
    pub async fn has_session(&self) -> bool {
        self.session.lock().await.is_some()
    }

    /// Lock the session, reconnecting first if it is missing or closed
    pub async fn ensure_connected(&self) -> GatewayResult<SessionGuard<'_>> {
        let mut slot = self.session.lock().await;

        let alive = match slot.as_mut() {
            Some(session) => session.is_open().await,
            None => false,
        };
        if !alive {
            if slot.is_some() {
                tracing::info!("Database session closed, reconnecting");
            }
            self.open(&mut slot).await?;
        }

        Ok(slot)
    }

    async fn open(&self, slot: &mut Option<Box<dyn Session>>) -> GatewayResult<()> {
        match self.connector.connect().await {
            Ok(session) => {
                if let Some(previous) = slot.replace(session) {
                    previous.close().await;
                }
                tracing::info!("Database connection established: {}", self.connector.describe());
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    "Database connection to {} failed: {}",
                    self.connector.describe(),
                    e
                );
                Err(e)
            }
        }
    }
}
