// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The reporting facade: builds events, enriches them and hands them to the transport.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use loom_report_core::{Event, EventBuilder, ExceptionInterface, Level};
use parking_lot::RwLock;
use tracing::{debug, error, info, warn};

use crate::backtrace::capture_backtrace;
use crate::config::ReporterConfig;
use crate::error::ReportError;
use crate::panic_hook::install_panic_hook;
use crate::provider::{
	BreadcrumbProvider, ContextProvider, EnrichmentProvider, ProviderRegistry, SdkProvider,
	ServerNameProvider, ThreadProvider,
};
use crate::reentrancy::PipelineGuard;
use crate::transport::{NoopTransport, Transport};

/// Name of the helper thread that delivers panic events.
const PANIC_REPORT_THREAD: &str = "loom-report-panic";

/// Builder for constructing a [`Reporter`].
pub struct ReporterBuilder {
	config: ReporterConfig,
	transport: Option<Arc<dyn Transport>>,
	providers: Vec<Arc<dyn EnrichmentProvider>>,
}

impl ReporterBuilder {
	/// Creates a new builder with default settings.
	pub fn new() -> Self {
		Self {
			config: ReporterConfig::default(),
			transport: None,
			providers: Vec::new(),
		}
	}

	/// Replaces the whole configuration.
	pub fn config(mut self, config: ReporterConfig) -> Self {
		self.config = config;
		self
	}

	/// Sets the logger name stamped on every event.
	pub fn logger(mut self, logger: impl Into<String>) -> Self {
		self.config.logger = Some(logger.into());
		self
	}

	/// Sets the release version.
	///
	/// Example: `1.2.3` or `git commit SHA`
	pub fn release(mut self, release: impl Into<String>) -> Self {
		self.config.release = Some(release.into());
		self
	}

	/// Sets the environment name.
	///
	/// Example: `production`, `staging`, `development`
	pub fn environment(mut self, env: impl Into<String>) -> Self {
		self.config.environment = env.into();
		self
	}

	/// Sets the server name for identification.
	pub fn server_name(mut self, name: impl Into<String>) -> Self {
		self.config.server_name = Some(name.into());
		self
	}

	/// Adds a tag attached to every event before providers run.
	pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.config.default_tags.insert(key.into(), value.into());
		self
	}

	/// Captures a stacktrace for message events as well as errors.
	pub fn attach_stacktrace(mut self, enabled: bool) -> Self {
		self.config.attach_stacktrace = enabled;
		self
	}

	/// Sets the maximum number of breadcrumbs to keep.
	pub fn max_breadcrumbs(mut self, max: usize) -> Self {
		self.config.max_breadcrumbs = max;
		self
	}

	/// Whether to register the built-in providers. Defaults to true.
	pub fn default_providers(mut self, enabled: bool) -> Self {
		self.config.default_providers = enabled;
		self
	}

	/// Sets the transport. Without one, events are dropped.
	pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
		self.transport = Some(transport);
		self
	}

	/// Registers a provider, after the built-in ones.
	pub fn provider(mut self, provider: Arc<dyn EnrichmentProvider>) -> Self {
		self.providers.push(provider);
		self
	}

	/// Builds the Reporter.
	pub fn build(self) -> Reporter {
		let registry = ProviderRegistry::new();
		let mut context = None;
		let mut breadcrumbs = None;

		if self.config.default_providers {
			let context_provider = Arc::new(ContextProvider::new());
			let breadcrumb_provider = Arc::new(BreadcrumbProvider::new(self.config.max_breadcrumbs));

			// Generic providers first so application context can override them.
			registry.add(Arc::new(ServerNameProvider::new()));
			registry.add(Arc::new(ThreadProvider));
			registry.add(Arc::new(SdkProvider));
			registry.add(context_provider.clone());
			registry.add(breadcrumb_provider.clone());

			context = Some(context_provider);
			breadcrumbs = Some(breadcrumb_provider);
		}

		for provider in self.providers {
			registry.add(provider);
		}

		let transport: Arc<dyn Transport> = match self.transport {
			Some(transport) => transport,
			None => Arc::new(NoopTransport),
		};

		info!(
			environment = %self.config.environment,
			providers = registry.len(),
			"Reporter initialized"
		);

		Reporter {
			inner: Arc::new(ReporterInner {
				config: self.config,
				providers: registry,
				transport: RwLock::new(transport),
				context,
				breadcrumbs,
				closed: AtomicBool::new(false),
			}),
		}
	}
}

impl Default for ReporterBuilder {
	fn default() -> Self {
		Self::new()
	}
}

struct ReporterInner {
	config: ReporterConfig,
	providers: ProviderRegistry,
	transport: RwLock<Arc<dyn Transport>>,
	context: Option<Arc<ContextProvider>>,
	breadcrumbs: Option<Arc<BreadcrumbProvider>>,
	closed: AtomicBool,
}

/// Reports messages, errors and prebuilt events.
///
/// Every send operation runs synchronously on the calling thread: it builds
/// the event, runs the registered providers in order and hands the result to
/// the transport. None of them can fail from the caller's point of view;
/// provider and transport failures are logged and the event is, at worst,
/// dropped.
///
/// A send issued while the same thread is already inside a send (for example
/// from a transport that logs, where the log line is forwarded back here) is
/// dropped instead of recursing.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use loom_report::{MemoryTransport, Reporter};
///
/// let transport = MemoryTransport::default();
/// let reporter = Reporter::builder()
///     .release("1.2.3")
///     .environment("staging")
///     .transport(Arc::new(transport.clone()))
///     .build();
///
/// reporter.send_message("cache warmed");
/// assert_eq!(transport.last().unwrap().message(), "cache warmed");
/// ```
#[derive(Clone)]
pub struct Reporter {
	inner: Arc<ReporterInner>,
}

impl Reporter {
	/// Creates a new builder for constructing a Reporter.
	pub fn builder() -> ReporterBuilder {
		ReporterBuilder::new()
	}

	/// Creates a reporter with no providers, sending to `transport`.
	pub fn new(transport: Arc<dyn Transport>) -> Self {
		ReporterBuilder::new()
			.default_providers(false)
			.transport(transport)
			.build()
	}

	/// The configuration the reporter was built with.
	pub fn config(&self) -> &ReporterConfig {
		&self.inner.config
	}

	/// Sends a message at [`Level::Info`].
	pub fn send_message(&self, message: &str) {
		self.send_message_at(message, Level::Info);
	}

	/// Sends a message at the given level.
	pub fn send_message_at(&self, message: &str, level: Level) {
		let Some(_guard) = self.enter() else {
			return;
		};

		let mut builder = self.new_builder();
		builder.set_message(message).set_level(level);
		if self.inner.config.attach_stacktrace {
			builder.add_interface(capture_backtrace());
		}

		self.run_providers(&mut builder);
		self.dispatch(builder.build());
	}

	/// Sends an error at [`Level::Error`].
	///
	/// The message is the error's `Display` output; the exception interface
	/// carries its type name, its `source()` chain and the current stack.
	pub fn send_exception<E>(&self, error: &E)
	where
		E: std::error::Error + ?Sized,
	{
		let Some(_guard) = self.enter() else {
			return;
		};

		let mut builder = self.new_builder();
		builder
			.set_message(error.to_string())
			.set_level(Level::Error)
			.add_interface(ExceptionInterface::from_error(error, capture_backtrace()));

		self.run_providers(&mut builder);
		self.dispatch(builder.build());
	}

	/// Sends a caller-assembled event as is, without running providers.
	pub fn send_event(&self, event: Event) {
		let Some(_guard) = self.enter() else {
			return;
		};
		self.dispatch(event);
	}

	/// Returns a builder seeded from the configuration.
	///
	/// Use with [`run_providers`](Self::run_providers) and
	/// [`send_event`](Self::send_event) to assemble events by hand.
	pub fn new_builder(&self) -> EventBuilder {
		let config = &self.inner.config;
		let mut builder = EventBuilder::new();
		builder.set_environment(config.environment.clone());
		if let Some(logger) = &config.logger {
			builder.set_logger(logger.clone());
		}
		if let Some(release) = &config.release {
			builder.set_release(release.clone());
		}
		if let Some(server_name) = &config.server_name {
			builder.set_server_name(server_name.clone());
		}
		for (key, value) in &config.default_tags {
			builder.add_tag(key.clone(), value.clone());
		}
		builder
	}

	/// Runs every registered provider against the builder, in registration order.
	///
	/// A provider that fails or panics is logged and skipped.
	pub fn run_providers(&self, builder: &mut EventBuilder) {
		// Already held when called from a send operation.
		let _guard = PipelineGuard::enter();

		for provider in self.inner.providers.snapshot() {
			match panic::catch_unwind(AssertUnwindSafe(|| provider.enrich(builder))) {
				Ok(Ok(())) => {}
				Ok(Err(e)) => {
					warn!(provider = provider.name(), error = %e, "Enrichment provider failed, continuing");
				}
				Err(payload) => {
					let e = ReportError::from_panic(payload.as_ref());
					warn!(provider = provider.name(), error = %e, "Enrichment provider panicked, continuing");
				}
			}
		}
	}

	/// Registers a provider. Returns false if it is already registered.
	pub fn add_provider(&self, provider: Arc<dyn EnrichmentProvider>) -> bool {
		info!(provider = provider.name(), "Adding enrichment provider");
		self.inner.providers.add(provider)
	}

	/// Unregisters a provider. Removing one that is not registered does nothing.
	pub fn remove_provider(&self, provider: &Arc<dyn EnrichmentProvider>) -> bool {
		info!(provider = provider.name(), "Removing enrichment provider");
		self.inner.providers.remove(provider)
	}

	/// Copy of the registered providers, in registration order.
	///
	/// Changing the returned vector does not affect the reporter.
	pub fn providers(&self) -> Vec<Arc<dyn EnrichmentProvider>> {
		self.inner.providers.snapshot()
	}

	/// The built-in context provider, if default providers are enabled.
	pub fn context(&self) -> Option<&Arc<ContextProvider>> {
		self.inner.context.as_ref()
	}

	/// The built-in breadcrumb provider, if default providers are enabled.
	pub fn breadcrumbs(&self) -> Option<&Arc<BreadcrumbProvider>> {
		self.inner.breadcrumbs.as_ref()
	}

	/// The transport events are currently dispatched to.
	pub fn transport(&self) -> Arc<dyn Transport> {
		Arc::clone(&*self.inner.transport.read())
	}

	/// Replaces the transport. Events already dispatched are unaffected.
	pub fn set_transport(&self, transport: Arc<dyn Transport>) {
		*self.inner.transport.write() = transport;
		info!("Transport replaced");
	}

	/// Installs a panic hook that reports panics as [`Level::Fatal`] events.
	///
	/// The previously installed hook still runs afterwards.
	pub fn install_panic_hook(&self) {
		install_panic_hook(self.clone());
		info!("Panic hook installed");
	}

	/// Stops reporting. Every later send is dropped.
	pub fn close(&self) {
		if self.inner.closed.swap(true, Ordering::SeqCst) {
			return;
		}
		info!("Reporter closed");
	}

	/// Returns true if the reporter has been closed.
	pub fn is_closed(&self) -> bool {
		self.inner.closed.load(Ordering::SeqCst)
	}

	/// Reports a panic from inside the panic hook.
	///
	/// A second panic on a thread that is already panicking aborts the process,
	/// so providers and the transport run on a helper thread where
	/// `catch_unwind` still works. The stack is captured here, on the panicking
	/// thread.
	pub(crate) fn send_panic(&self, message: &str, location: Option<String>) {
		let Some(_guard) = self.enter() else {
			return;
		};

		let mut builder = self.new_builder();
		builder
			.set_message(message)
			.set_level(Level::Fatal)
			.add_interface(ExceptionInterface::new("panic", message, capture_backtrace()));
		if let Some(location) = location {
			builder.add_tag("panic.location", location);
		}
		let current = thread::current();
		builder.add_tag(
			"panic.thread",
			current
				.name()
				.map(str::to_string)
				.unwrap_or_else(|| format!("{:?}", current.id())),
		);

		let outcome = thread::scope(|scope| {
			thread::Builder::new()
				.name(PANIC_REPORT_THREAD.to_string())
				.spawn_scoped(scope, || {
					let _guard = PipelineGuard::enter();
					self.run_providers(&mut builder);
					self.dispatch(builder.build());
				})
				.map(|handle| handle.join())
		});

		match outcome {
			Ok(Ok(())) => {}
			Ok(Err(payload)) => {
				let e = ReportError::from_panic(payload.as_ref());
				error!(error = %e, "Panic report thread panicked");
			}
			Err(e) => {
				error!(error = %e, "Failed to spawn panic report thread, dropping panic event");
			}
		}
	}

	/// Marks the thread as inside the pipeline, or returns `None` if the event
	/// should be dropped.
	fn enter(&self) -> Option<PipelineGuard> {
		let Some(guard) = PipelineGuard::enter() else {
			debug!("Already inside the reporting pipeline on this thread, dropping event");
			return None;
		};
		if self.is_closed() {
			debug!("Reporter is closed, dropping event");
			return None;
		}
		Some(guard)
	}

	fn dispatch(&self, event: Event) {
		let transport = self.transport();
		let event_id = event.id();

		match panic::catch_unwind(AssertUnwindSafe(|| transport.send(event))) {
			Ok(Ok(())) => debug!(event_id = %event_id, "Event dispatched"),
			Ok(Err(e)) => {
				error!(event_id = %event_id, error = %e, "An error occurred while sending the event");
			}
			Err(payload) => {
				let e = ReportError::from_panic(payload.as_ref());
				error!(event_id = %event_id, error = %e, "Transport panicked while sending the event");
			}
		}
	}
}
