// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Hand-off to an asynchronous delivery task.

use loom_report_core::Event;
use tokio::sync::mpsc;
use tracing::warn;

use super::Transport;
use crate::error::{ReportError, Result};

/// Default queue depth between the reporter and the delivery task.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1_000;

/// Queues events on a bounded channel for an async task to deliver.
///
/// `send` never blocks: when the queue is full the event is dropped and
/// [`ReportError::QueueFull`] returned. Once the receiving side is gone every
/// send fails with [`ReportError::TransportClosed`].
///
/// ```ignore
/// let (transport, mut rx) = ChannelTransport::new(DEFAULT_CHANNEL_CAPACITY);
/// tokio::spawn(async move {
///     while let Some(event) = rx.recv().await {
///         deliver(event).await;
///     }
/// });
/// reporter.set_transport(Arc::new(transport));
/// ```
#[derive(Debug, Clone)]
pub struct ChannelTransport {
	tx: mpsc::Sender<Event>,
}

impl ChannelTransport {
	/// Creates the transport and the receiver the delivery task drains.
	pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Event>) {
		let (tx, rx) = mpsc::channel(capacity.max(1));
		(Self { tx }, rx)
	}

	pub fn is_closed(&self) -> bool {
		self.tx.is_closed()
	}
}

impl Transport for ChannelTransport {
	fn send(&self, event: Event) -> Result<()> {
		self.tx.try_send(event).map_err(|e| match e {
			mpsc::error::TrySendError::Full(event) => {
				warn!(event_id = %event.id(), "Dropped event due to queue overflow");
				ReportError::QueueFull
			}
			mpsc::error::TrySendError::Closed(_) => ReportError::TransportClosed,
		})
	}
}
