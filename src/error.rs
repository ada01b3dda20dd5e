//! Error taxonomy for the reconciliation core.
//!
//! Exhausted-retry and failed-acceptance conditions are not errors: they are
//! recorded in the outcome's `validacion` field so one bad record never stops
//! the batch.

/// Failures surfaced by the browser session and the portal workflows.
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    #[error("no compatible browser executable found")]
    BrowserNotFound,

    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("credentials are missing or empty")]
    MissingCredentials,

    #[error("expediente id must contain only digits: {0:?}")]
    InvalidExpedienteId(String),

    #[error("timed out waiting for {0}")]
    SelectorTimeout(String),

    #[error("login failed: the portal still shows the password field")]
    LoginFailed,

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// A DOM evaluation or element interaction failed. Usually transient;
    /// the search pipeline retries these.
    #[error("page operation failed: {0}")]
    Evaluation(String),

    #[error("accept control not found in the result row")]
    AcceptButtonNotFound,

    #[error("no confirmation control containing {0:?} in the modal layer")]
    ConfirmationNotFound(String),

    #[error("session is not authenticated")]
    NotAuthenticated,
}
