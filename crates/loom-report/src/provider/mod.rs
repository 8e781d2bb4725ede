// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Enrichment providers attach ambient context to events before they are built.

mod breadcrumbs;
mod context;
mod system;

use std::fmt;
use std::sync::Arc;

use loom_report_core::EventBuilder;
use parking_lot::RwLock;

use crate::error::Result;

pub use breadcrumbs::{BreadcrumbProvider, DEFAULT_MAX_BREADCRUMBS};
pub use context::ContextProvider;
pub use system::{SdkProvider, ServerNameProvider, ThreadProvider};

/// A pluggable unit that inspects and mutates an in-progress event.
///
/// Providers run in registration order, so a provider registered later
/// overrides fields set by earlier ones. They must not touch anything outside
/// the builder. A provider that returns an error or panics is logged and
/// skipped; the remaining providers still run.
pub trait EnrichmentProvider: Send + Sync {
	/// Name used in diagnostics.
	fn name(&self) -> &str {
		std::any::type_name::<Self>()
	}

	/// Attaches context to the builder.
	fn enrich(&self, builder: &mut EventBuilder) -> Result<()>;
}

/// Adapts a closure into an [`EnrichmentProvider`].
///
/// ```
/// use loom_report::FnProvider;
///
/// let provider = FnProvider::new("request-id", |builder| {
///     builder.add_tag("request_id", "req_123");
///     Ok(())
/// });
/// ```
pub struct FnProvider<F> {
	name: String,
	f: F,
}

impl<F> FnProvider<F>
where
	F: Fn(&mut EventBuilder) -> Result<()> + Send + Sync,
{
	pub fn new(name: impl Into<String>, f: F) -> Self {
		Self {
			name: name.into(),
			f,
		}
	}
}

impl<F> EnrichmentProvider for FnProvider<F>
where
	F: Fn(&mut EventBuilder) -> Result<()> + Send + Sync,
{
	fn name(&self) -> &str {
		&self.name
	}

	fn enrich(&self, builder: &mut EventBuilder) -> Result<()> {
		(self.f)(builder)
	}
}

impl<F> fmt::Debug for FnProvider<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FnProvider").field("name", &self.name).finish()
	}
}

/// Registered providers, unique by identity, in insertion order.
///
/// Readers take a snapshot and iterate it without holding the lock, so a
/// provider added or removed mid-send is either fully seen or not at all,
/// and providers may touch the registry themselves without deadlocking.
#[derive(Default)]
pub struct ProviderRegistry {
	providers: RwLock<Vec<Arc<dyn EnrichmentProvider>>>,
}

impl ProviderRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a provider. Returns false if this exact provider is already registered.
	pub fn add(&self, provider: Arc<dyn EnrichmentProvider>) -> bool {
		let mut providers = self.providers.write();
		if providers.iter().any(|p| Arc::ptr_eq(p, &provider)) {
			return false;
		}
		providers.push(provider);
		true
	}

	/// Removes a provider. Returns false, changing nothing, if it was not registered.
	pub fn remove(&self, provider: &Arc<dyn EnrichmentProvider>) -> bool {
		let mut providers = self.providers.write();
		let before = providers.len();
		providers.retain(|p| !Arc::ptr_eq(p, provider));
		providers.len() != before
	}

	pub fn contains(&self, provider: &Arc<dyn EnrichmentProvider>) -> bool {
		self.providers
			.read()
			.iter()
			.any(|p| Arc::ptr_eq(p, provider))
	}

	/// Copy of the registered providers in registration order.
	pub fn snapshot(&self) -> Vec<Arc<dyn EnrichmentProvider>> {
		self.providers.read().clone()
	}

	pub fn len(&self) -> usize {
		self.providers.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.providers.read().is_empty()
	}
}

impl fmt::Debug for ProviderRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let names: Vec<String> = self
			.providers
			.read()
			.iter()
			.map(|p| p.name().to_string())
			.collect();
		f.debug_struct("ProviderRegistry")
			.field("providers", &names)
			.finish()
	}
}
