// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::VecDeque;

use loom_report_core::{Breadcrumb, EventBuilder, Interface};
use parking_lot::RwLock;

use super::EnrichmentProvider;
use crate::error::Result;

/// Default number of breadcrumbs to keep.
pub const DEFAULT_MAX_BREADCRUMBS: usize = 100;

/// Keeps a bounded trail of breadcrumbs and attaches it to every event.
///
/// When the trail is full the oldest breadcrumb is evicted.
#[derive(Debug)]
pub struct BreadcrumbProvider {
	breadcrumbs: RwLock<VecDeque<Breadcrumb>>,
	capacity: usize,
}

impl BreadcrumbProvider {
	pub fn new(capacity: usize) -> Self {
		Self {
			breadcrumbs: RwLock::new(VecDeque::with_capacity(capacity)),
			capacity,
		}
	}

	pub fn add(&self, breadcrumb: Breadcrumb) {
		if self.capacity == 0 {
			return;
		}
		let mut breadcrumbs = self.breadcrumbs.write();
		while breadcrumbs.len() >= self.capacity {
			breadcrumbs.pop_front();
		}
		breadcrumbs.push_back(breadcrumb);
	}

	pub fn clear(&self) {
		self.breadcrumbs.write().clear();
	}

	pub fn len(&self) -> usize {
		self.breadcrumbs.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.breadcrumbs.read().is_empty()
	}
}

impl Default for BreadcrumbProvider {
	fn default() -> Self {
		Self::new(DEFAULT_MAX_BREADCRUMBS)
	}
}

impl EnrichmentProvider for BreadcrumbProvider {
	fn name(&self) -> &str {
		"breadcrumbs"
	}

	fn enrich(&self, builder: &mut EventBuilder) -> Result<()> {
		let breadcrumbs = self.breadcrumbs.read();
		if !breadcrumbs.is_empty() {
			builder.add_interface(Interface::Breadcrumbs(breadcrumbs.iter().cloned().collect()));
		}
		Ok(())
	}
}
