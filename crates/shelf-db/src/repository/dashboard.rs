//! # Dashboard Repository
//!
//! Per-member dashboard state under `user_<name>_dashboard`: loans,
//! reservations and fines in one document.

use std::sync::Arc;

use tracing::debug;

use shelf_core::DashboardState;

use super::{read_json, write_json};
use crate::error::DbResult;
use crate::keys;
use crate::store::{KvStore, WriteBatch};

/// Repository for dashboard state.
#[derive(Debug)]
pub struct DashboardRepository<S> {
    store: Arc<S>,
}

impl<S: KvStore> DashboardRepository<S> {
    /// Creates a new DashboardRepository.
    pub fn new(store: Arc<S>) -> Self {
        DashboardRepository { store }
    }

    /// The member's dashboard; empty lists when never written.
    pub async fn get(&self, username: &str) -> DbResult<DashboardState> {
        let state: DashboardState = read_json(&*self.store, &keys::dashboard(username))
            .await?
            .unwrap_or_default();
        debug!(
            username = %username,
            loans = state.loans.len(),
            fines = state.fines.len(),
            "Loaded dashboard"
        );
        Ok(state)
    }

    pub async fn save(&self, username: &str, state: &DashboardState) -> DbResult<()> {
        write_json(&*self.store, &keys::dashboard(username), state).await
    }

    /// Adds the dashboard write to `batch`.
    pub fn stage(&self, batch: &mut WriteBatch, username: &str, state: &DashboardState) -> DbResult<()> {
        batch.put_json(keys::dashboard(username), state)
    }
}
