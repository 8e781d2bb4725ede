// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The delivery contract between the reporter and whatever ships events.

mod channel;
mod memory;

use loom_report_core::Event;
use tracing::debug;

use crate::error::Result;

pub use channel::{ChannelTransport, DEFAULT_CHANNEL_CAPACITY};
pub use memory::{MemoryTransport, DEFAULT_MEMORY_CAPACITY};

/// Delivers finished events to a collector.
///
/// `send` runs on the reporting thread and may block. Retrying, buffering and
/// dropping are the transport's own business. An error (or panic) returned
/// here is logged by the reporter and never reaches application code.
pub trait Transport: Send + Sync {
	fn send(&self, event: Event) -> Result<()>;
}

/// Transport that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTransport;

impl Transport for NoopTransport {
	fn send(&self, event: Event) -> Result<()> {
		debug!(event_id = %event.id(), "No transport configured, dropping event");
		Ok(())
	}
}
