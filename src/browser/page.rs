//! The narrow page capability the reconciliation pipeline is written against.
//!
//! [`PortalPage`] describes what the pipeline needs from a page (navigate,
//! wait, type, click, extract the first result row) without exposing the CDP
//! surface. [`CdpPage`] implements it over a live `chromiumoxide` page; tests
//! implement it with a scripted fake.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::element::Element;
use chromiumoxide::Page;
use tokio::time::timeout;

use crate::browser::selectors::Selector;
use crate::error::PortalError;
use crate::models::ResultRow;

/// Everything the auth, search, and acceptance flows do to a page.
///
/// All operations are issued strictly one at a time; implementations may
/// assume no concurrent calls.
#[async_trait]
pub trait PortalPage: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<(), PortalError>;

    async fn current_url(&self) -> Result<String, PortalError>;

    /// Wait for an in-flight page transition to finish.
    async fn wait_for_navigation(&self) -> Result<(), PortalError>;

    /// Whether the selector currently matches an element in the DOM. Bounded
    /// waits are built on top of this by polling; see
    /// [`selectors::resolve_within`](crate::browser::selectors::resolve_within).
    async fn is_present(&self, selector: &Selector) -> Result<bool, PortalError>;

    async fn click(&self, selector: &Selector) -> Result<(), PortalError>;

    /// Triple-click, selecting the element's current content.
    async fn triple_click(&self, selector: &Selector) -> Result<(), PortalError>;

    /// Programmatically empty an input's value. Combined with
    /// [`triple_click`](Self::triple_click) this defeats input masks that
    /// restore content on focus.
    async fn clear_value(&self, selector: &Selector) -> Result<(), PortalError>;

    /// Type character-by-character with `char_delay` between keystrokes, so
    /// client-side validators that drop fast paste events still see input.
    async fn type_text(
        &self,
        selector: &Selector,
        text: &str,
        char_delay: Duration,
    ) -> Result<(), PortalError>;

    async fn press_enter(&self, selector: &Selector) -> Result<(), PortalError>;

    /// Extract the cells of the first result row, or `None` when the grid
    /// rendered no row.
    async fn extract_first_row(&self) -> Result<Option<ResultRow>, PortalError>;

    /// Click the structural accept control in the first result row.
    /// `Ok(false)` when no such control exists.
    async fn click_accept_button(&self) -> Result<bool, PortalError>;

    /// Click a control in the modal/overlay layer whose visible text contains
    /// `label` (case-insensitive). `Ok(false)` when none matches.
    async fn click_modal_control(&self, label: &str) -> Result<bool, PortalError>;
}

/// Extracts the first result row of the pending-services grid in a single
/// evaluation, so a mid-extraction re-render cannot tear the row.
const EXTRACT_ROW_JS: &str = r#"
(() => {
    const row = document.querySelector('.dx-data-row, table tbody tr');
    if (!row) return null;
    const cells = row.querySelectorAll('td');
    const text = (i) => (cells[i] ? cells[i].innerText.trim() : '');
    return {
        costo: text(6),
        estatus: text(5),
        notas: text(7),
        fecha_registro: text(2),
        servicio: text(3),
        subservicio: text(4),
    };
})()
"#;

/// The accept control is identified structurally: a button in the row's first
/// column containing the framework's inner touch target.
const CLICK_ACCEPT_JS: &str = r#"
(() => {
    const row = document.querySelector('.dx-data-row, table tbody tr');
    if (!row) return false;
    const button = row.querySelector('td:first-child .dx-button');
    if (!button || !button.querySelector('.dx-button-content')) return false;
    button.click();
    return true;
})()
"#;

/// Implementation of [`PortalPage`] over a Chrome DevTools Protocol page.
pub struct CdpPage {
    page: Page,
    navigation_timeout: Duration,
    action_timeout: Duration,
}

impl CdpPage {
    pub fn new(page: Page, navigation_timeout: Duration, action_timeout: Duration) -> Self {
        Self {
            page,
            navigation_timeout,
            action_timeout,
        }
    }

    async fn element(&self, selector: &Selector) -> Result<Element, PortalError> {
        let css = selector.to_css();
        match timeout(self.action_timeout, self.page.find_element(css)).await {
            Ok(Ok(element)) => Ok(element),
            Ok(Err(err)) => Err(PortalError::Evaluation(format!("{selector}: {err}"))),
            Err(_) => Err(PortalError::SelectorTimeout(selector.to_string())),
        }
    }

    async fn eval<T: serde::de::DeserializeOwned>(&self, js: &str) -> Result<T, PortalError> {
        let result = timeout(self.action_timeout, self.page.evaluate(js))
            .await
            .map_err(|_| PortalError::Evaluation("evaluation timed out".to_string()))?
            .map_err(|err| PortalError::Evaluation(err.to_string()))?;
        result
            .into_value()
            .map_err(|err| PortalError::Evaluation(format!("unexpected evaluation result: {err}")))
    }
}

#[async_trait]
impl PortalPage for CdpPage {
    async fn navigate(&self, url: &str) -> Result<(), PortalError> {
        match timeout(self.navigation_timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(err)) => Err(PortalError::Navigation {
                url: url.to_string(),
                reason: err.to_string(),
            }),
            Err(_) => Err(PortalError::Navigation {
                url: url.to_string(),
                reason: "navigation timed out".to_string(),
            }),
        }
    }

    async fn current_url(&self) -> Result<String, PortalError> {
        let url = self
            .page
            .url()
            .await
            .map_err(|err| PortalError::Evaluation(err.to_string()))?;
        Ok(url.unwrap_or_else(|| "about:blank".to_string()))
    }

    async fn wait_for_navigation(&self) -> Result<(), PortalError> {
        match timeout(self.navigation_timeout, self.page.wait_for_navigation()).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(err)) => Err(PortalError::Navigation {
                url: String::new(),
                reason: err.to_string(),
            }),
            Err(_) => Err(PortalError::Navigation {
                url: String::new(),
                reason: "navigation timed out".to_string(),
            }),
        }
    }

    async fn is_present(&self, selector: &Selector) -> Result<bool, PortalError> {
        let css = selector.to_css();
        match timeout(self.action_timeout, self.page.find_element(css)).await {
            Ok(found) => Ok(found.is_ok()),
            Err(_) => Ok(false),
        }
    }

    async fn click(&self, selector: &Selector) -> Result<(), PortalError> {
        let element = self.element(selector).await?;
        element
            .click()
            .await
            .map_err(|err| PortalError::Evaluation(format!("{selector}: {err}")))?;
        Ok(())
    }

    async fn triple_click(&self, selector: &Selector) -> Result<(), PortalError> {
        let element = self.element(selector).await?;
        for _ in 0..3 {
            element
                .click()
                .await
                .map_err(|err| PortalError::Evaluation(format!("{selector}: {err}")))?;
        }
        Ok(())
    }

    async fn clear_value(&self, selector: &Selector) -> Result<(), PortalError> {
        let css = selector.to_css();
        let js = format!(
            r#"
(() => {{
    const el = document.querySelector("{css}");
    if (!el) return false;
    el.value = '';
    el.dispatchEvent(new Event('input', {{ bubbles: true }}));
    el.dispatchEvent(new Event('change', {{ bubbles: true }}));
    return true;
}})()
"#
        );
        let cleared: bool = self.eval(&js).await?;
        if !cleared {
            return Err(PortalError::Evaluation(format!(
                "{selector}: element disappeared before clear"
            )));
        }
        Ok(())
    }

    async fn type_text(
        &self,
        selector: &Selector,
        text: &str,
        char_delay: Duration,
    ) -> Result<(), PortalError> {
        let element = self.element(selector).await?;
        element
            .focus()
            .await
            .map_err(|err| PortalError::Evaluation(format!("{selector}: {err}")))?;
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            element
                .type_str(ch.encode_utf8(&mut buf))
                .await
                .map_err(|err| PortalError::Evaluation(format!("{selector}: {err}")))?;
            tokio::time::sleep(char_delay).await;
        }
        Ok(())
    }

    async fn press_enter(&self, selector: &Selector) -> Result<(), PortalError> {
        let element = self.element(selector).await?;
        element
            .press_key("Enter")
            .await
            .map_err(|err| PortalError::Evaluation(format!("{selector}: {err}")))?;
        Ok(())
    }

    async fn extract_first_row(&self) -> Result<Option<ResultRow>, PortalError> {
        self.eval(EXTRACT_ROW_JS).await
    }

    async fn click_accept_button(&self) -> Result<bool, PortalError> {
        self.eval(CLICK_ACCEPT_JS).await
    }

    async fn click_modal_control(&self, label: &str) -> Result<bool, PortalError> {
        let needle = label.to_lowercase().replace('\'', "");
        let js = format!(
            r#"
(() => {{
    const overlay = document.querySelector('.dx-overlay-wrapper, [role="dialog"], .modal');
    if (!overlay) return false;
    const controls = overlay.querySelectorAll('button, .dx-button, [role="button"]');
    for (const control of controls) {{
        const text = (control.innerText || '').toLowerCase();
        if (text.includes('{needle}')) {{
            control.click();
            return true;
        }}
    }}
    return false;
}})()
"#
        );
        self.eval(&js).await
    }
}
