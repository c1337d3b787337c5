//! Delayed navigation that can be called off.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::application::pages::Navigation;

/// A navigation scheduled to fire after a delay. Dropping the handle
/// cancels it, so a redirect never outlives the view that scheduled it.
#[derive(Debug)]
pub struct ScheduledRedirect {
    task: Option<JoinHandle<()>>,
}

impl ScheduledRedirect {
    pub fn schedule(
        delay: Duration,
        target: Navigation,
        navigator: UnboundedSender<Navigation>,
    ) -> Self {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!(?target, "redirect fired");
            // The receiver may be gone when the host shut down first.
            let _ = navigator.send(target);
        });
        Self { task: Some(task) }
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Scheduled and neither fired nor cancelled yet.
    pub fn is_pending(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for ScheduledRedirect {
    fn drop(&mut self) {
        self.cancel();
    }
}
