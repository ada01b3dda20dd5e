//! Portal login.
//!
//! The portal has no dedicated success indicator; the password field
//! disappearing after submit is the login-success signal.

use secrecy::ExposeSecret;

use crate::browser::selectors::{self, Selector};
use crate::browser::PortalPage;
use crate::config::PortalConfig;
use crate::credentials::Credentials;
use crate::error::PortalError;

const USERNAME_CANDIDATES: &[Selector] = &[
    Selector::ControlName("usuario"),
    Selector::Placeholder("Usuario"),
    Selector::Css("input[type='text']"),
];

const PASSWORD_CANDIDATES: &[Selector] = &[
    Selector::ControlName("password"),
    Selector::Css("input[type='password']"),
];

const SUBMIT_CANDIDATES: &[Selector] = &[
    Selector::Css("button[type='submit']"),
    Selector::Css(".dx-button-submit"),
];

/// Establish an authenticated session on the portal root.
pub async fn login(
    page: &dyn PortalPage,
    config: &PortalConfig,
    credentials: &Credentials,
) -> Result<(), PortalError> {
    if !credentials.is_complete() {
        return Err(PortalError::MissingCredentials);
    }

    tracing::info!(url = %config.base_url, "navigating to portal login");
    page.navigate(&config.base_url).await?;

    let username_field = selectors::resolve_within(page, USERNAME_CANDIDATES, config.action_timeout)
        .await
        .ok_or_else(|| PortalError::SelectorTimeout("username field".to_string()))?;
    let password_field = selectors::resolve_within(page, PASSWORD_CANDIDATES, config.action_timeout)
        .await
        .ok_or_else(|| PortalError::SelectorTimeout("password field".to_string()))?;

    page.type_text(&username_field, &credentials.username, config.type_delay)
        .await?;
    page.type_text(
        &password_field,
        credentials.password.expose_secret(),
        config.type_delay,
    )
    .await?;

    match selectors::resolve(page, SUBMIT_CANDIDATES).await {
        Some(submit) => page.click(&submit).await?,
        None => page.press_enter(&password_field).await?,
    }

    page.wait_for_navigation().await?;

    if selectors::resolve(page, PASSWORD_CANDIDATES).await.is_some() {
        return Err(PortalError::LoginFailed);
    }

    // Let the portal's post-login redirects settle before the first search.
    tokio::time::sleep(config.settle_delay).await;

    tracing::info!(username = %credentials.username, "login verified");
    Ok(())
}
