// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashMap;

use loom_report_core::{EventBuilder, UserInterface};
use parking_lot::RwLock;

use super::EnrichmentProvider;
use crate::error::Result;

/// Application-controlled tags, extra data and user, attached to every event.
///
/// Values can be changed at any time from any thread; each event sees the
/// state as of its own enrichment.
#[derive(Debug, Default)]
pub struct ContextProvider {
	tags: RwLock<HashMap<String, String>>,
	extra: RwLock<serde_json::Map<String, serde_json::Value>>,
	user: RwLock<Option<UserInterface>>,
}

impl ContextProvider {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a provider pre-populated with tags.
	pub fn with_tags(tags: HashMap<String, String>) -> Self {
		Self {
			tags: RwLock::new(tags),
			..Default::default()
		}
	}

	pub fn set_tag(&self, key: impl Into<String>, value: impl Into<String>) {
		self.tags.write().insert(key.into(), value.into());
	}

	pub fn remove_tag(&self, key: &str) {
		self.tags.write().remove(key);
	}

	pub fn set_extra(&self, key: impl Into<String>, value: serde_json::Value) {
		self.extra.write().insert(key.into(), value);
	}

	pub fn remove_extra(&self, key: &str) {
		self.extra.write().remove(key);
	}

	pub fn set_user(&self, user: UserInterface) {
		*self.user.write() = Some(user);
	}

	pub fn clear_user(&self) {
		*self.user.write() = None;
	}
}

impl EnrichmentProvider for ContextProvider {
	fn name(&self) -> &str {
		"context"
	}

	fn enrich(&self, builder: &mut EventBuilder) -> Result<()> {
		for (key, value) in self.tags.read().iter() {
			builder.add_tag(key.clone(), value.clone());
		}
		for (key, value) in self.extra.read().iter() {
			builder.add_extra(key.clone(), value.clone());
		}
		if let Some(user) = self.user.read().clone() {
			builder.add_interface(user);
		}
		Ok(())
	}
}
