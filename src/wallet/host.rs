// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Host environment actions the wallet flow needs: opening an install page
//! and reloading the application after a disconnect or chain switch.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tracing::info;

pub trait BrowserHost: Send + Sync {
    /// Open `url` in a new tab (or the platform equivalent).
    fn open_new_tab(&self, url: &str);

    /// Drop in-memory state and start over from persisted storage.
    fn reload(&self);
}

/// Host for terminal use: prints install links and logs reload requests.
#[derive(Debug, Default)]
pub struct TerminalHost;

impl BrowserHost for TerminalHost {
    fn open_new_tab(&self, url: &str) {
        info!(url = %url, "Opening wallet install page");
        eprintln!("Install the wallet extension from: {url}");
    }

    fn reload(&self) {
        info!("Reload requested; session state will be re-read on next command");
    }
}

/// Host that records every call. Useful for embedding and tests.
#[derive(Debug, Default)]
pub struct RecordingHost {
    opened: Mutex<Vec<String>>,
    reloads: AtomicUsize,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened_urls(&self) -> Vec<String> {
        self.opened.lock().map(|urls| urls.clone()).unwrap_or_default()
    }

    pub fn reload_count(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

impl BrowserHost for RecordingHost {
    fn open_new_tab(&self, url: &str) {
        if let Ok(mut opened) = self.opened.lock() {
            opened.push(url.to_string());
        }
    }

    fn reload(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }
}
