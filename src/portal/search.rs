//! Per-record search, extraction, and outcome classification.

use tokio::time::Instant;

use crate::browser::selectors::{self, Selector};
use crate::browser::PortalPage;
use crate::config::PortalConfig;
use crate::error::PortalError;
use crate::models::{ExpedienteRequest, ResultRow, SearchOutcome, Validation};
use crate::portal::accept;
use crate::recon::{self, StatsAggregator};

/// Most specific selector first; the portal has shipped the search box under
/// all of these at one point or another.
const SEARCH_INPUT_CANDIDATES: &[Selector] = &[
    Selector::Placeholder("Buscar expediente"),
    Selector::ControlName("numeroExpediente"),
    Selector::Css("input.dx-texteditor-input"),
    Selector::Css("input[type='text']"),
];

const SEARCH_BUTTON_CANDIDATES: &[Selector] = &[
    Selector::Css(".dx-icon-search"),
    Selector::Css("button[type='submit']"),
];

/// Either of these appearing means the grid finished answering.
const RESULT_MARKERS: &[Selector] = &[
    Selector::Css(".dx-data-row"),
    Selector::Css(".dx-datagrid-nodata"),
];

/// Drives one record through navigation, form submission, extraction, and
/// reconciliation, with a bounded fixed-delay retry around the fallible part.
pub struct SearchPipeline {
    config: PortalConfig,
}

impl SearchPipeline {
    pub fn new(config: PortalConfig) -> Self {
        Self { config }
    }

    /// Search one expediente and classify the outcome.
    ///
    /// `totalRevisados` is incremented exactly once here, before the first
    /// attempt; the retry loop below never touches it. This call never fails:
    /// exhausted retries degrade to an `ErrorInQuery` outcome so one bad
    /// record cannot stop the batch.
    pub async fn search(
        &self,
        page: &dyn PortalPage,
        stats: &mut StatsAggregator,
        request: &ExpedienteRequest,
    ) -> SearchOutcome {
        stats.record_reviewed();

        let max_attempts = self.config.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            match self.attempt(page, request).await {
                Ok(row) => return self.classify(page, stats, request, row).await,
                Err(err) => {
                    tracing::warn!(
                        expediente = %request.id,
                        attempt,
                        max_attempts,
                        error = %err,
                        "search attempt failed"
                    );
                    if attempt < max_attempts {
                        tokio::time::sleep(self.config.retry_delay).await;
                    }
                }
            }
        }

        tracing::error!(expediente = %request.id, "search attempts exhausted");
        SearchOutcome::error_in_query(stats.snapshot())
    }

    /// One full search attempt: ensure the pending-services view, type the
    /// id, submit, extract the first row.
    async fn attempt(
        &self,
        page: &dyn PortalPage,
        request: &ExpedienteRequest,
    ) -> Result<Option<ResultRow>, PortalError> {
        let current = page.current_url().await?;
        if !current.contains(&self.config.pending_path) {
            page.navigate(&self.config.pending_url()).await?;
        }

        let input =
            selectors::resolve_within(page, SEARCH_INPUT_CANDIDATES, self.config.action_timeout)
                .await
                .ok_or_else(|| PortalError::SelectorTimeout("search input".to_string()))?;

        // Triple-click-select plus programmatic clear defeats input masks
        // that restore stale content on focus.
        page.triple_click(&input).await?;
        page.clear_value(&input).await?;
        page.type_text(&input, &request.id, self.config.type_delay)
            .await?;

        match selectors::resolve(page, SEARCH_BUTTON_CANDIDATES).await {
            Some(button) => page.click(&button).await?,
            None => page.press_enter(&input).await?,
        }

        self.wait_for_results(page).await;

        page.extract_first_row().await
    }

    /// Bounded wait for the grid to either render a row or its empty marker.
    /// Neither appearing is tolerated and reads as "no data" downstream.
    async fn wait_for_results(&self, page: &dyn PortalPage) {
        let deadline = Instant::now() + self.config.results_timeout;
        loop {
            for marker in RESULT_MARKERS {
                if page.is_present(marker).await.unwrap_or(false) {
                    return;
                }
            }
            if Instant::now() >= deadline {
                tracing::debug!("results grid stayed silent; treating as no data");
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(150)).await;
        }
    }

    async fn classify(
        &self,
        page: &dyn PortalPage,
        stats: &mut StatsAggregator,
        request: &ExpedienteRequest,
        row: Option<ResultRow>,
    ) -> SearchOutcome {
        let Some(row) = row else {
            tracing::info!(expediente = %request.id, "no result row");
            return SearchOutcome::no_data(None, stats.snapshot());
        };

        if recon::is_no_data(&row.costo) {
            tracing::info!(expediente = %request.id, costo = %row.costo, "row without usable cost");
            return SearchOutcome::no_data(Some(row), stats.snapshot());
        }

        let reconciliation = recon::reconcile(&row.costo, request.expected_cost);
        if !reconciliation.matches {
            tracing::info!(
                expediente = %request.id,
                reportado = %reconciliation.formatted,
                esperado = %request.expected_cost,
                "cost mismatch"
            );
            stats.record_mismatch();
            return SearchOutcome::from_row(
                row,
                reconciliation.formatted,
                Validation::NotAccepted,
                stats.snapshot(),
            );
        }

        stats.record_match();
        let validacion = match accept::accept_current_row(page, self.config.settle_delay).await {
            Ok(()) => {
                tracing::info!(expediente = %request.id, costo = %reconciliation.formatted, "accepted");
                Validation::Accepted
            }
            Err(err) => {
                // "Accepted" only means the server actually confirmed it, so
                // the classification is downgraded. The counters keep the
                // values recorded at reconciliation time.
                tracing::warn!(expediente = %request.id, error = %err, "acceptance failed after match");
                Validation::ErrorInAcceptance
            }
        };

        SearchOutcome::from_row(row, reconciliation.formatted, validacion, stats.snapshot())
    }
}
