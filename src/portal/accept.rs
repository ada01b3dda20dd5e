//! The two-step on-portal acceptance sequence.

use std::time::Duration;

use crate::browser::PortalPage;
use crate::error::PortalError;

/// Visible text that identifies the confirmation control inside the modal.
const CONFIRM_LABEL: &str = "aceptar";

/// Accept the currently-displayed result row: click the row's accept control,
/// wait for the confirmation modal, click the control whose text contains
/// "aceptar".
///
/// No internal retry; either step failing is reported to the caller, who
/// downgrades the record's classification.
pub async fn accept_current_row(
    page: &dyn PortalPage,
    settle_delay: Duration,
) -> Result<(), PortalError> {
    if !page.click_accept_button().await? {
        return Err(PortalError::AcceptButtonNotFound);
    }

    // Give the modal time to animate in.
    tokio::time::sleep(settle_delay).await;

    if !page.click_modal_control(CONFIRM_LABEL).await? {
        return Err(PortalError::ConfirmationNotFound(CONFIRM_LABEL.to_string()));
    }

    tracing::debug!("acceptance confirmed in modal");
    Ok(())
}
