// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session lifecycle management for the Wahub control plane.
//!
//! The [`SessionManager`] owns every tenant session: it opens connections
//! through a [`WaConnector`](wahub_core::traits::WaConnector), consumes
//! each connection's event stream in a dedicated loop, reconnects with
//! bounded exponential backoff, and publishes progress to the tenant's
//! event bus room. Auth flows (QR image or pairing code), per-tenant log
//! rings, and graceful shutdown live here too.

pub mod logbuf;
pub mod manager;
pub mod qr;
mod session;
pub mod shutdown;
pub mod status;

pub use logbuf::{LOG_CAPACITY, LogRing};
pub use manager::SessionManager;
pub use session::{MAX_QR_ISSUES, MAX_RECONNECT_ATTEMPTS, QR_TIMEOUT, backoff_delay};
pub use status::SessionStatus;
