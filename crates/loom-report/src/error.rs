// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the reporting SDK.
//!
//! None of these ever reach callers of the [`Reporter`](crate::Reporter) send
//! operations. Providers and transports return them, and the reporter logs
//! and absorbs them.

use thiserror::Error;

/// Result type alias for reporting operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors raised by enrichment providers and transports.
#[derive(Debug, Error)]
pub enum ReportError {
	/// An enrichment provider could not attach its context.
	#[error("provider '{provider}' failed: {message}")]
	ProviderFailed {
		/// Name of the failing provider.
		provider: String,
		/// What went wrong.
		message: String,
	},

	/// The transport could not deliver the event.
	#[error("transport failed: {0}")]
	TransportFailed(String),

	/// The collector refused the event.
	#[error("event rejected (status {status}): {message}")]
	Rejected {
		/// Status code returned by the collector.
		status: u16,
		/// Error message from the collector.
		message: String,
	},

	/// The transport's queue is full and the event was dropped.
	#[error("transport queue is full")]
	QueueFull,

	/// The transport has been closed.
	#[error("transport has been closed")]
	TransportClosed,

	/// Failed to serialize the event.
	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	/// A provider or transport panicked.
	#[error("panicked: {0}")]
	Panicked(String),
}

impl ReportError {
	pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
		Self::ProviderFailed {
			provider: provider.into(),
			message: message.into(),
		}
	}

	/// Builds a [`ReportError::Panicked`] from a caught panic payload.
	pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
		Self::Panicked(panic_message(payload))
	}
}

/// Extracts the message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&str>() {
		(*s).to_string()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		"Box<dyn Any>".to_string()
	}
}
