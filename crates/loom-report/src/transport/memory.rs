// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-process ring buffer of delivered events.

use std::collections::VecDeque;
use std::sync::Arc;

use loom_report_core::Event;
use parking_lot::RwLock;

use super::Transport;
use crate::error::Result;

/// Default buffer capacity.
pub const DEFAULT_MEMORY_CAPACITY: usize = 1_000;

/// A transport that keeps the most recent events in memory.
///
/// When the buffer is full, the oldest event is evicted. Cloning shares the
/// buffer, so a test can hand one clone to the reporter and inspect another.
#[derive(Debug, Clone)]
pub struct MemoryTransport {
	inner: Arc<MemoryTransportInner>,
}

#[derive(Debug)]
struct MemoryTransportInner {
	events: RwLock<VecDeque<Event>>,
	capacity: usize,
}

impl MemoryTransport {
	pub fn new(capacity: usize) -> Self {
		Self {
			inner: Arc::new(MemoryTransportInner {
				events: RwLock::new(VecDeque::with_capacity(capacity.min(DEFAULT_MEMORY_CAPACITY))),
				capacity,
			}),
		}
	}

	pub fn with_default_capacity() -> Self {
		Self::new(DEFAULT_MEMORY_CAPACITY)
	}

	/// Buffered events, oldest first.
	pub fn events(&self) -> Vec<Event> {
		self.inner.events.read().iter().cloned().collect()
	}

	/// Removes and returns all buffered events, oldest first.
	pub fn drain(&self) -> Vec<Event> {
		self.inner.events.write().drain(..).collect()
	}

	pub fn last(&self) -> Option<Event> {
		self.inner.events.read().back().cloned()
	}

	pub fn clear(&self) {
		self.inner.events.write().clear();
	}

	pub fn len(&self) -> usize {
		self.inner.events.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.events.read().is_empty()
	}

	pub fn capacity(&self) -> usize {
		self.inner.capacity
	}
}

impl Default for MemoryTransport {
	fn default() -> Self {
		Self::with_default_capacity()
	}
}

impl Transport for MemoryTransport {
	fn send(&self, event: Event) -> Result<()> {
		if self.inner.capacity == 0 {
			return Ok(());
		}
		let mut events = self.inner.events.write();
		if events.len() >= self.inner.capacity {
			events.pop_front();
		}
		events.push_back(event);
		Ok(())
	}
}
