// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Breadcrumbs: the trail of occurrences leading up to a reported event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::level::Level;

/// A single step in the trail leading up to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breadcrumb {
	pub timestamp: DateTime<Utc>,
	/// "http", "navigation", "query", "log"
	pub category: String,
	pub message: Option<String>,
	pub level: Level,
	pub data: serde_json::Value,
}

impl Breadcrumb {
	/// Creates a breadcrumb stamped with the current time.
	pub fn new(category: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			category: category.into(),
			message: Some(message.into()),
			..Default::default()
		}
	}

	pub fn with_level(mut self, level: Level) -> Self {
		self.level = level;
		self
	}
}

impl Default for Breadcrumb {
	fn default() -> Self {
		Self {
			timestamp: Utc::now(),
			category: String::new(),
			message: None,
			level: Level::Info,
			data: serde_json::Value::Object(serde_json::Map::new()),
		}
	}
}
