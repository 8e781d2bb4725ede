// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use loom_report_core::EventBuilder;
use tracing::warn;

use super::EnrichmentProvider;
use crate::error::Result;

/// SDK version for identification.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
/// SDK name for identification.
pub const SDK_NAME: &str = "loom-report-rust";

/// Tags events with the name of the thread that reported them.
///
/// Unnamed threads are tagged with their id instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadProvider;

impl EnrichmentProvider for ThreadProvider {
	fn name(&self) -> &str {
		"thread"
	}

	fn enrich(&self, builder: &mut EventBuilder) -> Result<()> {
		let thread = std::thread::current();
		match thread.name() {
			Some(name) => builder.add_tag("thread.name", name),
			None => builder.add_tag("thread.id", format!("{:?}", thread.id())),
		};
		Ok(())
	}
}

/// Sets the server name to the local hostname, unless one is already set.
#[derive(Debug, Clone)]
pub struct ServerNameProvider {
	server_name: Option<String>,
}

impl ServerNameProvider {
	/// Resolves the hostname once, up front.
	pub fn new() -> Self {
		let server_name = match hostname::get() {
			Ok(name) => Some(name.to_string_lossy().to_string()),
			Err(e) => {
				warn!(error = %e, "Failed to resolve hostname, events will carry no server name");
				None
			}
		};
		Self { server_name }
	}

	pub fn with_name(server_name: impl Into<String>) -> Self {
		Self {
			server_name: Some(server_name.into()),
		}
	}

	pub fn server_name(&self) -> Option<&str> {
		self.server_name.as_deref()
	}
}

impl Default for ServerNameProvider {
	fn default() -> Self {
		Self::new()
	}
}

impl EnrichmentProvider for ServerNameProvider {
	fn name(&self) -> &str {
		"server_name"
	}

	fn enrich(&self, builder: &mut EventBuilder) -> Result<()> {
		if builder.server_name().is_none() {
			if let Some(server_name) = &self.server_name {
				builder.set_server_name(server_name.clone());
			}
		}
		Ok(())
	}
}

/// Tags events with the SDK name and version.
#[derive(Debug, Default, Clone, Copy)]
pub struct SdkProvider;

impl EnrichmentProvider for SdkProvider {
	fn name(&self) -> &str {
		"sdk"
	}

	fn enrich(&self, builder: &mut EventBuilder) -> Result<()> {
		builder
			.add_tag("sdk.name", SDK_NAME)
			.add_tag("sdk.version", SDK_VERSION);
		Ok(())
	}
}
