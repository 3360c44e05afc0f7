// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Latest-wins request tracking.
//!
//! Each logical operation (say, "load the dashboard") owns a
//! [`RequestGeneration`]. Starting a new request cancels the previous one,
//! and a response that arrives for a ticket that is no longer current is
//! reported as [`ClientError::Superseded`] instead of being applied.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Default)]
pub struct RequestGeneration {
    current: AtomicU64,
    cancel: Mutex<Option<CancellationToken>>,
}

/// Handle for one in-flight request.
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    cancel: CancellationToken,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, cancelling whichever one was in flight.
    ///
    /// The generation bump and the token swap happen under one lock.
    pub fn begin(&self) -> Ticket {
        let cancel = CancellationToken::new();
        let mut slot = match self.cancel.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };

        let generation = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = slot.replace(cancel.clone()) {
            previous.cancel();
        }

        Ticket { generation, cancel }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        !ticket.is_cancelled() && self.current.load(Ordering::SeqCst) == ticket.generation
    }

    /// Cancel whatever is in flight without starting anything new.
    pub fn cancel_all(&self) {
        let mut slot = match self.cancel.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.current.fetch_add(1, Ordering::SeqCst);
        if let Some(previous) = slot.take() {
            previous.cancel();
        }
    }

    /// Drive `fut` under `ticket`. Resolves to `Superseded` if the ticket is
    /// cancelled first or is stale by the time `fut` completes.
    pub async fn run<T, F>(&self, ticket: &Ticket, fut: F) -> ClientResult<T>
    where
        F: Future<Output = ClientResult<T>>,
    {
        let result = tokio::select! {
            result = fut => result,
            _ = ticket.cancel.cancelled() => {
                debug!(generation = ticket.generation, "Request cancelled by a newer one");
                return Err(ClientError::Superseded);
            }
        };

        if !self.is_current(ticket) {
            debug!(generation = ticket.generation, "Discarding stale response");
            return Err(ClientError::Superseded);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn newer_ticket_supersedes_older() {
        let generation = RequestGeneration::new();
        let first = generation.begin();
        assert!(generation.is_current(&first));

        let second = generation.begin();
        assert!(first.is_cancelled());
        assert!(!generation.is_current(&first));
        assert!(generation.is_current(&second));
        assert!(second.generation() > first.generation());
    }

    #[tokio::test]
    async fn current_ticket_returns_its_result() {
        let generation = RequestGeneration::new();
        let ticket = generation.begin();
        let value = generation.run(&ticket, async { Ok(42) }).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn in_flight_request_is_cancelled_by_a_newer_one() {
        let generation = std::sync::Arc::new(RequestGeneration::new());
        let first = generation.begin();

        let runner = {
            let generation = generation.clone();
            tokio::spawn(async move {
                generation
                    .run(&first, async {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        Ok::<_, ClientError>("stale")
                    })
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = generation.begin();

        let result = runner.await.unwrap();
        assert!(matches!(result, Err(ClientError::Superseded)));

        let fresh = generation.run(&second, async { Ok("fresh") }).await.unwrap();
        assert_eq!(fresh, "fresh");
    }

    #[tokio::test]
    async fn errors_pass_through_for_current_ticket() {
        let generation = RequestGeneration::new();
        let ticket = generation.begin();
        let result: ClientResult<()> = generation
            .run(&ticket, async { Err(ClientError::NoAccounts) })
            .await;
        assert!(matches!(result, Err(ClientError::NoAccounts)));
    }

    #[test]
    fn concurrent_begins_leave_exactly_one_live_ticket() {
        let generation = std::sync::Arc::new(RequestGeneration::new());

        let tickets: Vec<Ticket> = (0..8)
            .map(|_| {
                let generation = generation.clone();
                std::thread::spawn(move || {
                    (0..50).map(|_| generation.begin()).collect::<Vec<_>>()
                })
            })
            .collect::<Vec<_>>()
            .into_iter()
            .flat_map(|handle| handle.join().unwrap())
            .collect();

        let live: Vec<&Ticket> = tickets.iter().filter(|t| !t.is_cancelled()).collect();
        assert_eq!(live.len(), 1);

        let newest = tickets.iter().map(Ticket::generation).max().unwrap();
        assert_eq!(live[0].generation(), newest);
        assert!(generation.is_current(live[0]));
    }

    #[tokio::test]
    async fn cancel_all_discards_everything() {
        let generation = RequestGeneration::new();
        let ticket = generation.begin();
        generation.cancel_all();

        let result = generation.run(&ticket, async { Ok(1) }).await;
        assert!(matches!(result, Err(ClientError::Superseded)));
    }
}
