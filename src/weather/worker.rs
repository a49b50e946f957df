//! Off-thread weather fetches marshalled back to the UI thread

use super::{WeatherClient, WeatherReport, WeatherTransport};
use crate::error::{Result, WidgetError};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, error};

/// One weather lookup, tagged with the generation that requested it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherRequest {
    pub generation: u64,
    pub city: String,
    pub api_key: String,
}

/// Result of a lookup, tagged with its request generation
#[derive(Debug)]
pub struct WeatherOutcome {
    pub generation: u64,
    pub result: Result<WeatherReport>,
}

type Waker = Box<dyn Fn() + Send + Sync>;

/// Runs each lookup on its own short-lived thread
///
/// There is no cancellation: superseded requests run to completion and their
/// outcomes are dropped by the receiver based on the generation tag.
pub struct WeatherWorker<T> {
    client: Arc<WeatherClient<T>>,
    outcome_tx: Sender<WeatherOutcome>,
    outcome_rx: Receiver<WeatherOutcome>,
    waker: Arc<Mutex<Option<Waker>>>,
}

impl<T: WeatherTransport + Send + Sync + 'static> WeatherWorker<T> {
    pub fn new(client: WeatherClient<T>) -> Self {
        let (outcome_tx, outcome_rx) = unbounded();
        Self {
            client: Arc::new(client),
            outcome_tx,
            outcome_rx,
            waker: Arc::new(Mutex::new(None)),
        }
    }

    pub fn client(&self) -> &WeatherClient<T> {
        &self.client
    }

    /// Called from the worker thread after an outcome is posted,
    /// so an idle UI loop wakes up to apply it
    pub fn set_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        *self.waker.lock() = Some(Box::new(waker));
    }

    /// Start a lookup in the background
    pub fn spawn(&self, request: WeatherRequest) {
        let client = Arc::clone(&self.client);
        let tx = self.outcome_tx.clone();
        let waker = Arc::clone(&self.waker);
        let generation = request.generation;

        let spawned = thread::Builder::new()
            .name(format!("weather-{}", generation))
            .spawn(move || {
                let result = client.fetch(&request.city, &request.api_key);
                debug!("Weather request {} finished (ok={})", generation, result.is_ok());
                let _ = tx.send(WeatherOutcome { generation, result });
                if let Some(wake) = waker.lock().as_ref() {
                    wake();
                }
            });

        if let Err(e) = spawned {
            error!("Failed to spawn weather thread: {}", e);
            let _ = self.outcome_tx.send(WeatherOutcome {
                generation,
                result: Err(WidgetError::Network(format!("request not started: {}", e))),
            });
        }
    }

    /// Drain all finished lookups without blocking
    pub fn try_recv_all(&self) -> Vec<WeatherOutcome> {
        self.outcome_rx.try_iter().collect()
    }

    /// Wait for the next finished lookup
    pub fn recv_timeout(&self, timeout: Duration) -> Option<WeatherOutcome> {
        self.outcome_rx.recv_timeout(timeout).ok()
    }
}
