//! Console and failed-request observers.
//!
//! Both observers are registered before navigation and are passive: the pump
//! task translates CDP push events into [`DiagnosticEvent`]s and feeds them
//! through a bounded channel to the printer task, which writes report lines in
//! arrival order. Ordering is preserved per stream; no ordering is guaranteed
//! between console and network events.

use std::{collections::HashMap, sync::Arc};

use {
    chromiumoxide::{
        Page,
        cdp::{
            browser_protocol::network::{EventLoadingFailed, EventRequestWillBeSent},
            js_protocol::runtime::{EventConsoleApiCalled, RemoteObject},
        },
    },
    futures::StreamExt,
    serde_json::Value,
    tokio::{sync::mpsc, task::JoinHandle},
    tracing::debug,
};

use crate::{error::Error, report::Reporter};

/// Backpressure bound for the observer channel. Bursty pages can emit many
/// console lines between suspension points of the main sequence.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// An ephemeral observation pushed by the browser engine during the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// A console message emitted by script on the page.
    Console { text: String },
    /// A network request that did not complete successfully.
    RequestFailed { url: String, reason: String },
}

/// Handles for the two observer tasks. Shut down after the main sequence so
/// queued events still drain before the session closes.
pub struct EventObservers {
    pump_task: JoinHandle<()>,
    printer_task: JoinHandle<()>,
}

impl EventObservers {
    /// Stop the pump and let the printer drain whatever is already queued.
    pub async fn shutdown(self) {
        self.pump_task.abort();
        let _ = self.printer_task.await;
    }
}

/// Register both observers on `page` and spawn the pump and printer tasks.
pub async fn register_observers(
    page: &Page,
    reporter: Arc<Reporter>,
) -> Result<EventObservers, Error> {
    let mut console_events = page.event_listener::<EventConsoleApiCalled>().await?;
    let mut request_events = page.event_listener::<EventRequestWillBeSent>().await?;
    let mut failure_events = page.event_listener::<EventLoadingFailed>().await?;

    let (tx, rx) = mpsc::channel::<DiagnosticEvent>(EVENT_CHANNEL_CAPACITY);

    let pump_task = tokio::spawn(async move {
        // Network.loadingFailed only carries the request id; remember the URL
        // from the matching requestWillBeSent.
        let mut urls_by_request: HashMap<String, String> = HashMap::new();

        loop {
            tokio::select! {
                Some(event) = console_events.next() => {
                    let text = console_text(&event.args);
                    if tx.send(DiagnosticEvent::Console { text }).await.is_err() {
                        break;
                    }
                }
                Some(event) = request_events.next() => {
                    urls_by_request.insert(
                        event.request_id.inner().clone(),
                        event.request.url.clone(),
                    );
                }
                Some(event) = failure_events.next() => {
                    let failed = failed_request_event(
                        &mut urls_by_request,
                        event.request_id.inner(),
                        &event.error_text,
                        event.canceled.unwrap_or(false),
                    );
                    if tx.send(failed).await.is_err() {
                        break;
                    }
                }
                else => break,
            }
        }
        debug!("event pump exited");
    });

    let printer_task = tokio::spawn(drain_events(rx, reporter));

    Ok(EventObservers {
        pump_task,
        printer_task,
    })
}

/// Write queued events out in arrival order until the channel closes.
async fn drain_events(mut rx: mpsc::Receiver<DiagnosticEvent>, reporter: Arc<Reporter>) {
    while let Some(event) = rx.recv().await {
        match event {
            DiagnosticEvent::Console { text } => reporter.console(&text),
            DiagnosticEvent::RequestFailed { url, reason } => {
                reporter.failed_request(&url, &reason);
            },
        }
    }
}

/// Render a console call the way devtools would: arguments joined by spaces.
fn console_text(args: &[RemoteObject]) -> String {
    args.iter()
        .map(render_remote_object)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Best-effort string form of a CDP remote object: primitive value, then
/// description, then the unserializable marker (NaN, Infinity, ...).
fn render_remote_object(obj: &RemoteObject) -> String {
    if let Some(value) = &obj.value {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    } else if let Some(description) = &obj.description {
        description.clone()
    } else if let Some(unserializable) = &obj.unserializable_value {
        unserializable.inner().clone()
    } else {
        String::from("[object]")
    }
}

/// Assemble the failed-request event for a loadingFailed notification: the
/// URL recorded at requestWillBeSent, or the request id for requests that
/// were never observed starting.
fn failed_request_event(
    urls_by_request: &mut HashMap<String, String>,
    request_id: &str,
    error_text: &str,
    canceled: bool,
) -> DiagnosticEvent {
    let url = urls_by_request
        .remove(request_id)
        .unwrap_or_else(|| format!("request {request_id}"));
    DiagnosticEvent::RequestFailed {
        url,
        reason: failure_reason(error_text, canceled),
    }
}

fn failure_reason(error_text: &str, canceled: bool) -> String {
    if canceled {
        format!("{error_text} (canceled)")
    } else {
        error_text.to_string()
    }
}
