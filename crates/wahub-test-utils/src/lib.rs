// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles for the Wahub workspace.
//!
//! Provides a scripted [`MockConnector`]/[`MockSocket`] pair that records
//! every call made through the socket seam, in-memory record and auth
//! stores, a [`RecordingBus`] for event assertions, and message builders.

pub mod bus;
pub mod message;
pub mod mock_connector;
pub mod mock_socket;
pub mod store;

pub use bus::RecordingBus;
pub use message::{group_text, private_text};
pub use mock_connector::MockConnector;
pub use mock_socket::MockSocket;
pub use store::{MemoryAuthStore, MemoryRecordStore};
