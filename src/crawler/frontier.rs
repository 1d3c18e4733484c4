//! Crawl frontier: the pending-URL queue and the visited set
//!
//! All workers of a crawl share one `Frontier`. Claiming a URL pops it from
//! the queue and records it as visited inside a single critical section, so
//! two workers can never process the same URL and the page budget can never
//! be overshot, whatever the concurrency level.

use std::collections::{HashSet, VecDeque};
use std::ops::Deref;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
struct FrontierState {
    /// URLs awaiting a visit, in discovery order
    queue: VecDeque<String>,

    /// Membership mirror of `queue`
    queued: HashSet<String>,

    /// URLs already claimed by a worker
    visited: HashSet<String>,

    /// Claims that have not been released yet
    in_flight: usize,
}

/// Shared FIFO frontier with a page budget
#[derive(Debug)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    page_budget: usize,
    changed: Notify,
}

/// A URL claimed from the frontier
///
/// The claim stays in flight until this guard is dropped. While any claim is
/// in flight, `Frontier::next_url` keeps idle workers waiting instead of
/// letting them exit, since the holder may still offer new links.
#[derive(Debug)]
pub struct ClaimedUrl<'a> {
    frontier: &'a Frontier,
    url: String,
}

impl ClaimedUrl<'_> {
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl Deref for ClaimedUrl<'_> {
    type Target = str;

    fn deref(&self) -> &str {
        &self.url
    }
}

impl Drop for ClaimedUrl<'_> {
    fn drop(&mut self) {
        {
            let mut state = self.frontier.lock();
            state.in_flight = state.in_flight.saturating_sub(1);
        }
        self.frontier.changed.notify_waiters();
    }
}

impl Frontier {
    /// Creates a frontier seeded with a single URL
    ///
    /// # Arguments
    ///
    /// * `seed` - The URL the crawl starts from
    /// * `page_budget` - Maximum number of URLs that may ever be marked visited
    pub fn new(seed: &str, page_budget: usize) -> Self {
        let mut state = FrontierState::default();
        state.queue.push_back(seed.to_string());
        state.queued.insert(seed.to_string());

        Self {
            state: Mutex::new(state),
            page_budget,
            changed: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        // No code path panics while holding the lock
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pops queue heads until one that was never visited turns up, then marks
    /// it visited. Must be called with the lock held.
    fn claim_locked(state: &mut FrontierState, page_budget: usize) -> Option<String> {
        while state.visited.len() < page_budget {
            let url = state.queue.pop_front()?;
            state.queued.remove(&url);

            if state.visited.insert(url.clone()) {
                state.in_flight += 1;
                return Some(url);
            }
        }

        None
    }

    /// Claims the next URL without waiting
    ///
    /// Returns `None` when the queue is empty or the page budget has been
    /// reached. The claimed URL is recorded as visited in the same step.
    pub fn try_claim_next(&self) -> Option<ClaimedUrl<'_>> {
        let url = {
            let mut state = self.lock();
            Self::claim_locked(&mut state, self.page_budget)?
        };

        Some(ClaimedUrl {
            frontier: self,
            url,
        })
    }

    /// Claims the next URL, waiting for in-flight work if the queue is
    /// momentarily empty
    ///
    /// Returns `None` once the budget is reached, once the queue is empty with
    /// nothing left in flight, or once `cancel` fires. Cancellation is checked
    /// before every claim.
    pub async fn next_url(&self, cancel: &CancellationToken) -> Option<ClaimedUrl<'_>> {
        loop {
            if cancel.is_cancelled() {
                return None;
            }

            // Register for wake-ups before inspecting the state so a release
            // that lands between the check and the await is not missed.
            let changed = self.changed.notified();
            tokio::pin!(changed);
            changed.as_mut().enable();

            {
                let mut state = self.lock();

                if let Some(url) = Self::claim_locked(&mut state, self.page_budget) {
                    return Some(ClaimedUrl {
                        frontier: self,
                        url,
                    });
                }

                if state.visited.len() >= self.page_budget || state.in_flight == 0 {
                    return None;
                }
            }

            tokio::select! {
                _ = &mut changed => {}
                _ = cancel.cancelled() => return None,
            }
        }
    }

    /// Offers a discovered URL to the frontier
    ///
    /// The URL is enqueued only if it was never visited, is not already
    /// queued, and `visited + queued` is still below the page budget.
    /// Returns whether the URL was enqueued.
    pub fn offer(&self, url: &str) -> bool {
        {
            let mut state = self.lock();

            if state.visited.contains(url) || state.queued.contains(url) {
                return false;
            }

            if state.visited.len() + state.queue.len() >= self.page_budget {
                return false;
            }

            state.queue.push_back(url.to_string());
            state.queued.insert(url.to_string());
        }

        self.changed.notify_waiters();
        true
    }

    /// Returns true when the queue is empty or the page budget is used up
    pub fn is_exhausted(&self) -> bool {
        let state = self.lock();
        state.queue.is_empty() || state.visited.len() >= self.page_budget
    }

    /// Returns the number of URLs marked visited so far
    pub fn visited_count(&self) -> usize {
        self.lock().visited.len()
    }

    /// Returns the number of URLs waiting in the queue
    pub fn queued_count(&self) -> usize {
        self.lock().queue.len()
    }

    /// Returns the page budget this frontier enforces
    pub fn page_budget(&self) -> usize {
        self.page_budget
    }

    /// Returns true if the URL has been claimed by a worker
    pub fn is_visited(&self, url: &str) -> bool {
        self.lock().visited.contains(url)
    }
}
