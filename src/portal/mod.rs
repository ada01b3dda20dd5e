//! The portal-facing workflows and the session facade.

mod accept;
mod auth;
mod search;

pub use accept::accept_current_row;
pub use auth::login;
pub use search::SearchPipeline;

use rust_decimal::Decimal;

use crate::browser::{chrome, BrowserSession, SessionState};
use crate::config::PortalConfig;
use crate::credentials::Credentials;
use crate::error::PortalError;
use crate::models::{ExpedienteRequest, SearchOutcome};
use crate::recon::{StatsAggregator, StatsSnapshot};

/// Owns the single browser session, the search pipeline, and the session
/// counters. Constructed once by the batch driver; `&mut self` on the
/// per-record entry point rules out concurrent use of the page at compile
/// time.
pub struct Reconciler {
    config: PortalConfig,
    session: BrowserSession,
    pipeline: SearchPipeline,
    stats: StatsAggregator,
}

impl Reconciler {
    pub fn new(config: PortalConfig) -> Self {
        let session = BrowserSession::new(config.navigation_timeout, config.action_timeout);
        let pipeline = SearchPipeline::new(config.clone());
        Self {
            config,
            session,
            pipeline,
            stats: StatsAggregator::new(),
        }
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Launch the browser and log in. Failures here are fatal and surfaced to
    /// the caller; there is no automatic retry for authentication.
    pub async fn initialize(&mut self, credentials: &Credentials) -> Result<(), PortalError> {
        let executable = chrome::find_chrome().ok_or(PortalError::BrowserNotFound)?;
        self.session.launch(&executable).await?;

        let page = self
            .session
            .page()
            .ok_or_else(|| PortalError::Launch("no live page after launch".to_string()))?;
        let result = auth::login(page, &self.config, credentials).await;

        match result {
            Ok(()) => {
                self.session.set_state(SessionState::Authenticated);
                Ok(())
            }
            Err(err) => {
                self.session.set_state(SessionState::Error);
                Err(err)
            }
        }
    }

    /// The primary per-record entry point. Requires an authenticated session;
    /// per-record search failures never surface here, they degrade into the
    /// outcome's `validacion` field.
    pub async fn search_expediente(
        &mut self,
        id: &str,
        expected_cost: Decimal,
    ) -> Result<SearchOutcome, PortalError> {
        if self.session.state() != SessionState::Authenticated {
            return Err(PortalError::NotAuthenticated);
        }
        let request = ExpedienteRequest::new(id, expected_cost)?;
        let page = self.session.page().ok_or(PortalError::NotAuthenticated)?;
        Ok(self.pipeline.search(page, &mut self.stats, &request).await)
    }

    /// Idempotent teardown; counters survive until `reset_stats`.
    pub async fn close(&mut self) {
        self.session.close().await;
    }
}
