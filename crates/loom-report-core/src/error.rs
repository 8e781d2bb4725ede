// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the event model.

use thiserror::Error;

/// Errors raised while parsing or encoding event model values.
#[derive(Debug, Error)]
pub enum CoreError {
	#[error("invalid level: {0}")]
	InvalidLevel(String),

	#[error("invalid event id: {0}")]
	InvalidEventId(#[from] uuid::Error),

	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

/// Result type for event model operations.
pub type Result<T> = std::result::Result<T, CoreError>;
