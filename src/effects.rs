//! Effect runner
//!
//! Executes [`FetchRequest`]s issued by the orchestrator. Each request runs
//! as its own task and reports back on a channel; superseded tasks are not
//! cancelled, their outcomes are discarded by the orchestrator.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::TmdbClient;
use crate::query::{FetchOutcome, FetchRequest};

/// Sending half handed to fetch tasks
pub type OutcomeSender = mpsc::UnboundedSender<FetchOutcome>;

/// Receiving half polled by the event loop
pub type OutcomeReceiver = mpsc::UnboundedReceiver<FetchOutcome>;

/// Spawns catalog calls and funnels their outcomes into one channel
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Arc<TmdbClient>,
    tx: OutcomeSender,
}

impl Fetcher {
    /// Create a fetcher and the receiver its outcomes arrive on
    pub fn new(client: TmdbClient) -> (Self, OutcomeReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                client: Arc::new(client),
                tx,
            },
            rx,
        )
    }

    /// Run one request in the background
    pub fn spawn(&self, request: FetchRequest) -> JoinHandle<()> {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = run(&client, request).await;
            if tx.send(outcome).is_err() {
                debug!("outcome receiver dropped");
            }
        })
    }
}

/// Perform a request and tag the result with its sequence number
pub async fn run(client: &TmdbClient, request: FetchRequest) -> FetchOutcome {
    debug!(seq = request.seq, query = %request.query, page = request.page, "fetch start");
    let result = client.search(&request.query, request.page).await;
    if let Err(e) = &result {
        warn!(seq = request.seq, error = %e, "fetch failed");
    }
    FetchOutcome {
        seq: request.seq,
        result,
    }
}
