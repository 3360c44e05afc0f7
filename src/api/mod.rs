// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Module
//!
//! Typed calls against the gift-card backend.
//!
//! - `facade` - one method per backend operation, with fallback handling
//! - `outcome` - success / degraded / failed results and the UI envelope
//! - `generation` - latest-wins tracking for overlapping loads

pub mod facade;
pub mod generation;
pub mod outcome;

pub use facade::GiftCardApi;
pub use generation::{RequestGeneration, Ticket};
pub use outcome::{ApiOutcome, ApiResponse, FallbackPolicy};
