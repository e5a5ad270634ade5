pub mod timer;

use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

use crate::config::ControllerConfig;
use crate::page::{ClickEvent, NodeId, Page, PageError};
use self::timer::{SubmitTimer, TimerEvent};

/// Fixed delay between the trigger click and the form submission, long
/// enough for the loading indicator to paint before the server round-trip
pub const SUBMIT_DELAY: Duration = Duration::from_millis(12_000);

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("no element with id \"{id}\"")]
    MissingElement { id: String },

    #[error(transparent)]
    Page(#[from] PageError),
}

/// Deferred-submit flow. Single-shot: once triggered, further clicks on the
/// load button are rejected rather than arming a second timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Triggered,
    Submitted,
}

/// Wires up three independent behaviors on a page: sanitizing the current
/// history entry so a reload never re-POSTs, turning the back link into an
/// in-history pop, and submitting a form after a fixed delay so the spinner
/// gets a chance to render first.
///
/// Each behavior is optional; the page simply lacking the marker element
/// disables it without error.
pub struct Controller {
    config: ControllerConfig,
    back_link: Option<NodeId>,
    load_button: Option<NodeId>,
    phase: SubmitPhase,
    submit_timer: Option<SubmitTimer>,
    timer_events: UnboundedSender<TimerEvent>,
}

impl Controller {
    /// Attach to a page. Runs the history sanitizer right away and binds
    /// the load button if the page has one; the back link is bound later,
    /// once the page content has finished loading.
    pub fn attach<P: Page>(
        config: ControllerConfig,
        page: &mut P,
        timer_events: UnboundedSender<TimerEvent>,
    ) -> Self {
        sanitize_history(page);

        let load_button = page.element_by_id(&config.load_button_id);
        if load_button.is_some() {
            tracing::debug!("Bound load button #{}", config.load_button_id);
        }

        Self {
            config,
            back_link: None,
            load_button,
            phase: SubmitPhase::Idle,
            submit_timer: None,
            timer_events,
        }
    }

    /// Bind the back link once the structural content is parsed. No match
    /// is a valid page, not an error.
    pub fn handle_content_loaded<P: Page>(&mut self, page: &P) {
        self.back_link = page.query_selector(&self.config.back_link_selector);
        if self.back_link.is_some() {
            tracing::debug!("Bound back link {}", self.config.back_link_selector);
        }
    }

    /// Dispatch a click. Clicks on nodes the controller never bound are
    /// ignored so ordinary page interaction passes through untouched.
    pub fn handle_click<P: Page>(
        &mut self,
        page: &mut P,
        event: &mut ClickEvent,
    ) -> Result<(), ControllerError> {
        if self.back_link == Some(event.target) {
            event.prevent_default();
            event.stop_propagation();
            page.history_back();
            tracing::info!("Back link clicked, popped one history entry");
            return Ok(());
        }

        if self.load_button == Some(event.target) {
            return self.trigger_deferred_submit(page, event);
        }

        Ok(())
    }

    fn trigger_deferred_submit<P: Page>(
        &mut self,
        page: &mut P,
        event: &mut ClickEvent,
    ) -> Result<(), ControllerError> {
        event.prevent_default();

        if self.phase != SubmitPhase::Idle {
            // Already armed or already submitted; never arm a second timer
            tracing::debug!("Load trigger ignored in phase {:?}", self.phase);
            return Ok(());
        }

        let spinner = page
            .element_by_id(&self.config.spinner_id)
            .ok_or_else(|| ControllerError::MissingElement {
                id: self.config.spinner_id.clone(),
            })?;
        page.set_hidden(spinner, false)?;

        if let Some(button) = self.load_button {
            page.remove_from_layout(button)?;
        }

        self.submit_timer = Some(SubmitTimer::arm(SUBMIT_DELAY, self.timer_events.clone()));
        self.phase = SubmitPhase::Triggered;
        tracing::info!(
            "Load triggered, submitting #{} in {:?}",
            self.config.form_id,
            SUBMIT_DELAY
        );
        Ok(())
    }

    /// Timer fired: submit the form. Fires arriving in any phase other
    /// than `Triggered` (e.g. after teardown raced the channel) are ignored.
    pub fn handle_submit_delay_elapsed<P: Page>(
        &mut self,
        page: &mut P,
    ) -> Result<(), ControllerError> {
        if self.phase != SubmitPhase::Triggered {
            return Ok(());
        }

        self.phase = SubmitPhase::Submitted;
        self.submit_timer = None;

        let form = page
            .element_by_id(&self.config.form_id)
            .ok_or_else(|| ControllerError::MissingElement {
                id: self.config.form_id.clone(),
            })?;
        page.submit_form(form)?;
        tracing::info!("Submitted form #{}", self.config.form_id);
        Ok(())
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    /// Cancel any armed timer. Also happens implicitly when the controller
    /// is dropped with the page context.
    pub fn teardown(&mut self) {
        if let Some(timer) = self.submit_timer.take() {
            timer.cancel();
            tracing::debug!("Cancelled pending submit timer on teardown");
        }
    }
}

/// Replace the current history entry with a state-free one at the same URL
/// so reloading never raises a resubmission prompt. Hosts without the
/// capability are silently left alone.
fn sanitize_history<P: Page>(page: &mut P) {
    if !page.supports_replace_state() {
        return;
    }
    page.replace_state();
    tracing::debug!("Replaced current history entry (resubmit warning suppressed)");
}
