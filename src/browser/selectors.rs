//! Selector candidates and first-present-wins resolution.
//!
//! The portal exposes the same logical control under different attributes
//! across releases, so every lookup goes through an ordered candidate list:
//! most specific descriptor first, generic fallback last.

use std::time::Duration;

use tokio::time::Instant;

use crate::browser::page::PortalPage;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// One way of locating a logical UI control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Match an input by (partial) placeholder text.
    Placeholder(&'static str),
    /// Match by the framework's control `name` attribute.
    ControlName(&'static str),
    /// Raw CSS selector, used for class-based and structural fallbacks.
    Css(&'static str),
}

impl Selector {
    pub fn to_css(&self) -> String {
        match self {
            Selector::Placeholder(text) => format!("input[placeholder*='{text}']"),
            Selector::ControlName(name) => format!("[name='{name}']"),
            Selector::Css(css) => (*css).to_string(),
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Placeholder(text) => write!(f, "placeholder~{text:?}"),
            Selector::ControlName(name) => write!(f, "name={name:?}"),
            Selector::Css(css) => write!(f, "css({css})"),
        }
    }
}

/// Return the first candidate currently present in the page.
///
/// A transient lookup failure on one candidate is not fatal; the next
/// candidate is tried. `None` means nothing matched, and the caller decides
/// whether that is a hard failure.
pub async fn resolve(page: &dyn PortalPage, candidates: &[Selector]) -> Option<Selector> {
    for candidate in candidates {
        match page.is_present(candidate).await {
            Ok(true) => {
                tracing::debug!(selector = %candidate, "resolved candidate");
                return Some(candidate.clone());
            }
            Ok(false) => {}
            Err(err) => {
                tracing::debug!(selector = %candidate, error = %err, "candidate lookup failed, trying next");
            }
        }
    }
    None
}

/// Poll [`resolve`] until a candidate appears or the timeout elapses.
pub async fn resolve_within(
    page: &dyn PortalPage,
    candidates: &[Selector],
    timeout: Duration,
) -> Option<Selector> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(found) = resolve(page, candidates).await {
            return Some(found);
        }
        if Instant::now() >= deadline {
            return None;
        }
        tokio::time::sleep(POLL_INTERVAL.min(timeout)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PortalError;
    use crate::models::ResultRow;
    use async_trait::async_trait;

    /// Page where one selector errors and another is present.
    struct FlakyPage;

    #[async_trait]
    impl PortalPage for FlakyPage {
        async fn navigate(&self, _url: &str) -> Result<(), PortalError> {
            Ok(())
        }
        async fn current_url(&self) -> Result<String, PortalError> {
            Ok("about:blank".to_string())
        }
        async fn wait_for_navigation(&self) -> Result<(), PortalError> {
            Ok(())
        }
        async fn is_present(&self, selector: &Selector) -> Result<bool, PortalError> {
            match selector {
                Selector::Placeholder(_) => {
                    Err(PortalError::Evaluation("detached frame".to_string()))
                }
                Selector::ControlName(_) => Ok(false),
                Selector::Css(css) => Ok(*css == "input[type='text']"),
            }
        }
        async fn click(&self, _selector: &Selector) -> Result<(), PortalError> {
            Ok(())
        }
        async fn triple_click(&self, _selector: &Selector) -> Result<(), PortalError> {
            Ok(())
        }
        async fn clear_value(&self, _selector: &Selector) -> Result<(), PortalError> {
            Ok(())
        }
        async fn type_text(
            &self,
            _selector: &Selector,
            _text: &str,
            _char_delay: Duration,
        ) -> Result<(), PortalError> {
            Ok(())
        }
        async fn press_enter(&self, _selector: &Selector) -> Result<(), PortalError> {
            Ok(())
        }
        async fn extract_first_row(&self) -> Result<Option<ResultRow>, PortalError> {
            Ok(None)
        }
        async fn click_accept_button(&self) -> Result<bool, PortalError> {
            Ok(false)
        }
        async fn click_modal_control(&self, _label: &str) -> Result<bool, PortalError> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn transient_candidate_errors_are_skipped() {
        let candidates = [
            Selector::Placeholder("Buscar"),
            Selector::ControlName("busqueda"),
            Selector::Css("input[type='text']"),
        ];
        let found = resolve(&FlakyPage, &candidates).await;
        assert_eq!(found, Some(Selector::Css("input[type='text']")));
    }

    #[tokio::test]
    async fn nothing_present_yields_none() {
        let candidates = [Selector::ControlName("busqueda"), Selector::Css("#missing")];
        assert_eq!(resolve(&FlakyPage, &candidates).await, None);
    }

    #[test]
    fn descriptors_render_to_css() {
        assert_eq!(
            Selector::Placeholder("Buscar").to_css(),
            "input[placeholder*='Buscar']"
        );
        assert_eq!(
            Selector::ControlName("expediente").to_css(),
            "[name='expediente']"
        );
        assert_eq!(Selector::Css(".dx-data-row").to_css(), ".dx-data-row");
    }
}
