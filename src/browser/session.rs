//! Ownership of the automated browser process and its single page.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::browser::page::CdpPage;
use crate::error::PortalError;

/// Lifecycle of the one browser session this process drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Closed,
    Launching,
    Authenticating,
    Authenticated,
    Error,
}

struct Live {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: CdpPage,
}

/// Sole owner of the Chrome process and its single active page. There is no
/// pooling; one page serves the whole batch.
pub struct BrowserSession {
    state: SessionState,
    live: Option<Live>,
    navigation_timeout: Duration,
    action_timeout: Duration,
}

impl BrowserSession {
    pub fn new(navigation_timeout: Duration, action_timeout: Duration) -> Self {
        Self {
            state: SessionState::Closed,
            live: None,
            navigation_timeout,
            action_timeout,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: SessionState) {
        self.state = state;
    }

    /// The live page, when the session has been launched.
    pub fn page(&self) -> Option<&CdpPage> {
        self.live.as_ref().map(|live| &live.page)
    }

    /// Start the browser process, headful and full-viewport, and open the
    /// single page. On success the session is ready for authentication.
    pub async fn launch(&mut self, executable: &Path) -> Result<(), PortalError> {
        if self.live.is_some() {
            return Err(PortalError::Launch("session already launched".to_string()));
        }

        self.state = SessionState::Launching;
        match self.launch_inner(executable).await {
            Ok(live) => {
                self.live = Some(live);
                self.state = SessionState::Authenticating;
                tracing::info!(executable = %executable.display(), "browser session launched");
                Ok(())
            }
            Err(err) => {
                self.state = SessionState::Closed;
                Err(err)
            }
        }
    }

    async fn launch_inner(&self, executable: &Path) -> Result<Live, PortalError> {
        let profile_dir = profile_dir().map_err(PortalError::Launch)?;

        let config = BrowserConfig::builder()
            .chrome_executable(executable)
            .with_head()
            .viewport(None)
            .user_data_dir(profile_dir)
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-infobars")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .build()
            .map_err(PortalError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|err| PortalError::Launch(err.to_string()))?;

        let handler_task = tokio::spawn(async move { while (handler.next().await).is_some() {} });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(err) => {
                handler_task.abort();
                return Err(PortalError::Launch(err.to_string()));
            }
        };

        Ok(Live {
            browser,
            handler_task,
            page: CdpPage::new(page, self.navigation_timeout, self.action_timeout),
        })
    }

    /// Release the page and process. Safe to call when already closed.
    pub async fn close(&mut self) {
        if let Some(mut live) = self.live.take() {
            if let Err(err) = live.browser.close().await {
                tracing::debug!(error = %err, "browser did not close cleanly");
            }
            live.handler_task.abort();
            tracing::info!("browser session closed");
        }
        self.state = SessionState::Closed;
    }
}

fn profile_dir() -> Result<PathBuf, String> {
    let base = dirs::data_dir().ok_or_else(|| "could not find data directory".to_string())?;
    let dir = base.join("conciliador").join("profile");
    std::fs::create_dir_all(&dir)
        .map_err(|err| format!("failed to create profile dir {}: {err}", dir.display()))?;
    Ok(dir)
}
