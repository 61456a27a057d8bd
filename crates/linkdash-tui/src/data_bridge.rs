//! Bridges `DashboardController` view updates into the TUI action loop.
//!
//! Kicks off the first fetch, optionally schedules periodic refreshes, then
//! forwards every published [`DashboardView`](linkdash_core::DashboardView)
//! as an [`Action::DashboardUpdated`].

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use linkdash_core::DashboardController;

use crate::action::Action;

/// Spawn the bridge. Runs until `cancel` fires or the action channel closes.
pub async fn spawn_data_bridge(
    controller: DashboardController,
    action_tx: UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut view_rx = controller.subscribe();

    // Initial snapshot so screens render the loading state right away
    let initial = view_rx.borrow_and_update().clone();
    if action_tx
        .send(Action::DashboardUpdated(Box::new(initial)))
        .is_err()
    {
        return;
    }

    if controller.start().is_some() {
        info!("initial dashboard fetch started");
    }
    let _auto = controller.spawn_auto_refresh(cancel.child_token());

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            changed = view_rx.changed() => {
                if changed.is_err() {
                    debug!("dashboard view channel closed");
                    break;
                }
                let view = view_rx.borrow_and_update().clone();
                debug!(state = %view.state, generation = view.generation, "dashboard view updated");
                if action_tx.send(Action::DashboardUpdated(Box::new(view))).is_err() {
                    break;
                }
            }
        }
    }

    debug!("data bridge stopped");
}
