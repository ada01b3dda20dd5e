//! Scripted fake portal page for exercising the pipeline without a browser.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use conciliador::browser::{PortalPage, Selector};
use conciliador::config::PortalConfig;
use conciliador::error::PortalError;
use conciliador::models::ResultRow;

/// Portal timings shrunk so retry/backoff tests run in milliseconds.
pub fn fast_config() -> PortalConfig {
    PortalConfig {
        base_url: "https://portal.test".to_string(),
        settle_delay: Duration::from_millis(1),
        type_delay: Duration::ZERO,
        retry_delay: Duration::from_millis(1),
        results_timeout: Duration::from_millis(50),
        action_timeout: Duration::from_millis(200),
        ..Default::default()
    }
}

#[derive(Default)]
struct State {
    url: String,
    present: HashSet<String>,
    row: Option<ResultRow>,
    type_failures: u32,
    accept_present: bool,
    confirm_present: bool,
    password_clears_on_navigation: bool,
    typed: Vec<String>,
    navigations: Vec<String>,
    accept_clicks: u32,
    confirm_clicks: u32,
}

/// A pending-services view scripted with a fixed response.
#[derive(Default)]
pub struct FakePage {
    state: Mutex<State>,
}

impl FakePage {
    /// A view whose grid answers with no row at all.
    pub fn without_results() -> Self {
        let page = Self::default();
        {
            let mut state = page.state.lock().unwrap();
            state.present.insert("input[type='text']".to_string());
            state.present.insert(".dx-datagrid-nodata".to_string());
        }
        page
    }

    /// A view whose grid answers with `row` and a working acceptance flow.
    pub fn with_row(row: ResultRow) -> Self {
        let page = Self::default();
        {
            let mut state = page.state.lock().unwrap();
            state.present.insert("input[type='text']".to_string());
            state.present.insert(".dx-data-row".to_string());
            state.row = Some(row);
            state.accept_present = true;
            state.confirm_present = true;
        }
        page
    }

    /// A login view exposing username and password inputs. The password field
    /// persists after submit unless [`with_login_success`](Self::with_login_success)
    /// is scripted.
    pub fn login_form() -> Self {
        let page = Self::default();
        {
            let mut state = page.state.lock().unwrap();
            state.present.insert("input[type='text']".to_string());
            state.present.insert("input[type='password']".to_string());
        }
        page
    }

    /// Script a successful submit: the password field disappears on the
    /// post-submit navigation.
    pub fn with_login_success(self) -> Self {
        self.state.lock().unwrap().password_clears_on_navigation = true;
        self
    }

    /// A row carrying `cost` plus plausible surrounding cells.
    pub fn with_cost(cost: &str) -> Self {
        Self::with_row(ResultRow {
            costo: cost.to_string(),
            estatus: "Pendiente".to_string(),
            notas: String::new(),
            fecha_registro: "2024-03-15".to_string(),
            servicio: "Mantenimiento".to_string(),
            subservicio: "Correctivo".to_string(),
        })
    }

    /// Fail the next `n` typing interactions with a transient error.
    pub fn failing_types(self, n: u32) -> Self {
        self.state.lock().unwrap().type_failures = n;
        self
    }

    /// Script the acceptance controls: whether the row button and the modal
    /// confirmation exist.
    pub fn with_acceptance(self, button: bool, confirmation: bool) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.accept_present = button;
            state.confirm_present = confirmation;
        }
        self
    }

    pub fn typed(&self) -> Vec<String> {
        self.state.lock().unwrap().typed.clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().unwrap().navigations.clone()
    }

    pub fn accept_clicks(&self) -> u32 {
        self.state.lock().unwrap().accept_clicks
    }

    pub fn confirm_clicks(&self) -> u32 {
        self.state.lock().unwrap().confirm_clicks
    }
}

#[async_trait]
impl PortalPage for FakePage {
    async fn navigate(&self, url: &str) -> Result<(), PortalError> {
        let mut state = self.state.lock().unwrap();
        state.url = url.to_string();
        state.navigations.push(url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<String, PortalError> {
        Ok(self.state.lock().unwrap().url.clone())
    }

    async fn wait_for_navigation(&self) -> Result<(), PortalError> {
        let mut state = self.state.lock().unwrap();
        if state.password_clears_on_navigation {
            state.present.remove("input[type='password']");
        }
        Ok(())
    }

    async fn is_present(&self, selector: &Selector) -> Result<bool, PortalError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .present
            .contains(&selector.to_css()))
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
        text: &str,
        _char_delay: Duration,
    ) -> Result<(), PortalError> {
        let mut state = self.state.lock().unwrap();
        if state.type_failures > 0 {
            state.type_failures -= 1;
            return Err(PortalError::Evaluation("element detached".to_string()));
        }
        state.typed.push(text.to_string());
        Ok(())
    }

    async fn press_enter(&self, _selector: &Selector) -> Result<(), PortalError> {
        Ok(())
    }

    async fn extract_first_row(&self) -> Result<Option<ResultRow>, PortalError> {
        Ok(self.state.lock().unwrap().row.clone())
    }

    async fn click_accept_button(&self) -> Result<bool, PortalError> {
        let mut state = self.state.lock().unwrap();
        state.accept_clicks += 1;
        Ok(state.accept_present)
    }

    async fn click_modal_control(&self, _label: &str) -> Result<bool, PortalError> {
        let mut state = self.state.lock().unwrap();
        state.confirm_clicks += 1;
        Ok(state.confirm_present)
    }
}
