// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::provider::DEFAULT_MAX_BREADCRUMBS;

/// Configuration for a [`Reporter`](crate::Reporter).
///
/// Deserializable so the embedding application can load it from wherever it
/// keeps settings; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
	/// Logger name stamped on every event.
	pub logger: Option<String>,
	/// Release version, e.g. `1.2.3` or a git commit SHA.
	pub release: Option<String>,
	/// Environment name, e.g. `production`, `staging`.
	pub environment: String,
	/// Server name. When unset the hostname is used if default providers are on.
	pub server_name: Option<String>,
	/// Tags attached to every event before providers run.
	pub default_tags: BTreeMap<String, String>,
	/// Capture a stacktrace for message events too.
	pub attach_stacktrace: bool,
	/// Breadcrumbs kept by the default breadcrumb provider.
	pub max_breadcrumbs: usize,
	/// Register the context, breadcrumb, thread, server name and SDK providers.
	pub default_providers: bool,
}

impl Default for ReporterConfig {
	fn default() -> Self {
		Self {
			logger: None,
			release: None,
			environment: "production".to_string(),
			server_name: None,
			default_tags: BTreeMap::new(),
			attach_stacktrace: false,
			max_breadcrumbs: DEFAULT_MAX_BREADCRUMBS,
			default_providers: true,
		}
	}
}
