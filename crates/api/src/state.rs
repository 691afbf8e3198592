use std::sync::Arc;

use warden_db::CredentialStore;
use warden_events::ResetNotifier;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// User records (PostgreSQL or in-memory).
    pub store: Arc<dyn CredentialStore>,
    /// Out-of-band channel for password-reset tokens.
    pub notifier: Arc<dyn ResetNotifier>,
    /// Server configuration (token keys, cookie policy, reset link base).
    pub config: Arc<ServerConfig>,
}
