use tokio::task::JoinHandle;

use crate::accumulator::{
    AccumulatorConfig, Completion, FetchRequest, Rejected, ResultAccumulator, Ticket,
};
use crate::client::ApiClient;
use crate::error::{BrowseError, Result};
use crate::types::Page;

struct InFlight {
    ticket: Ticket,
    handle: JoinHandle<Result<Page>>,
}

/// Drives a [`ResultAccumulator`] against the upstream API.
///
/// Each request is fetched on its own task. Dispatching a new request aborts
/// the task of the one it supersedes.
pub struct Session {
    client: ApiClient,
    accumulator: ResultAccumulator,
    in_flight: Option<InFlight>,
}

impl Session {
    pub fn new(client: ApiClient, accumulator: ResultAccumulator) -> Self {
        Self {
            client,
            accumulator,
            in_flight: None,
        }
    }

    /// Fetch the first page before anything is shown, then hand back a
    /// session seeded with it.
    pub async fn bootstrap(client: ApiClient, config: AccumulatorConfig) -> Result<Self> {
        let first_page = client.fetch_page(&config.endpoint).await?;
        log::debug!(
            "bootstrap: {} of {} records",
            first_page.results.len(),
            first_page.info.count
        );
        Ok(Self::new(client, ResultAccumulator::new(config, first_page)))
    }

    pub fn accumulator(&self) -> &ResultAccumulator {
        &self.accumulator
    }

    pub fn is_loading(&self) -> bool {
        self.accumulator.is_loading()
    }

    pub fn initial_fetch(&mut self) {
        let request = self.accumulator.initial_fetch();
        self.dispatch(request);
    }

    pub fn load_more(&mut self) -> std::result::Result<(), Rejected> {
        let request = self.accumulator.load_more()?;
        self.dispatch(request);
        Ok(())
    }

    pub fn search(&mut self, query: &str) -> std::result::Result<(), Rejected> {
        let request = self.accumulator.search(query)?;
        self.dispatch(request);
        Ok(())
    }

    fn dispatch(&mut self, request: FetchRequest) {
        if let Some(superseded) = self.in_flight.take() {
            superseded.handle.abort();
        }

        let client = self.client.clone();
        let url = request.url;
        self.in_flight = Some(InFlight {
            ticket: request.ticket,
            handle: tokio::spawn(async move { client.fetch_page(&url).await }),
        });
    }

    /// Wait for the in-flight fetch to finish and apply it.
    ///
    /// Returns `None` when nothing is in flight. Cancel safe: dropping the
    /// future leaves the fetch running.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        let in_flight = self.in_flight.as_mut()?;
        let joined = (&mut in_flight.handle).await;
        let ticket = in_flight.ticket;
        self.in_flight = None;

        let outcome = joined
            .map_err(|e| BrowseError::TaskAborted(e.to_string()))
            .and_then(|outcome| outcome);
        Some(self.accumulator.complete(ticket, outcome))
    }

    /// Wait until the latest request has resolved. Stale deliveries are
    /// skipped; the latest request's failure is returned as an error.
    pub async fn settle(&mut self) -> Result<()> {
        while let Some(completion) = self.next_completion().await {
            match completion {
                Completion::Failed(e) => return Err(e),
                Completion::Stale => continue,
                Completion::Replaced(_) | Completion::Appended(_) => {}
            }
        }
        Ok(())
    }

    /// Follow `next` links until `pages` pages are loaded in total (counting
    /// the one already shown) or the collection runs out. `None` loads all.
    pub async fn load_pages(&mut self, pages: Option<u32>) -> Result<()> {
        let mut loaded = 1;
        while pages.map_or(true, |limit| loaded < limit) {
            match self.load_more() {
                Ok(()) => {}
                Err(Rejected::NoNextPage) => break,
                Err(rejected) => return Err(BrowseError::from(rejected)),
            }
            self.settle().await?;
            loaded += 1;
        }
        Ok(())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.handle.abort();
        }
    }
}
