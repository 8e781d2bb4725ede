// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end behaviour of the reporting pipeline.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use loom_report::{
	is_in_pipeline, EnrichmentProvider, Event, EventBuilder, FnProvider, Interface, Level,
	MemoryTransport, ReportError, Reporter, Result, Transport,
};
use proptest::prelude::*;

fn reporter_with_memory() -> (Reporter, MemoryTransport) {
	let transport = MemoryTransport::default();
	(Reporter::new(Arc::new(transport.clone())), transport)
}

fn recording_provider(
	name: &'static str,
	log: Arc<Mutex<Vec<&'static str>>>,
) -> Arc<dyn EnrichmentProvider> {
	Arc::new(FnProvider::new(name, move |builder: &mut EventBuilder| {
		log.lock().unwrap().push(name);
		builder.add_tag("last", name);
		builder.add_tag(format!("seen.{name}"), "yes");
		Ok(())
	}))
}

#[derive(Debug)]
struct PaymentDeclined {
	source: std::io::Error,
}

impl fmt::Display for PaymentDeclined {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "payment declined by gateway")
	}
}

impl std::error::Error for PaymentDeclined {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		Some(&self.source)
	}
}

#[test]
fn send_message_delivers_one_info_event_enriched_in_order() {
	let (reporter, transport) = reporter_with_memory();
	let log = Arc::new(Mutex::new(Vec::new()));
	for name in ["hostname", "environment", "request"] {
		reporter.add_provider(recording_provider(name, Arc::clone(&log)));
	}

	reporter.send_message("user signed up");

	let events = transport.events();
	assert_eq!(events.len(), 1);
	let event = &events[0];
	assert_eq!(event.level(), Level::Info);
	assert_eq!(event.message(), "user signed up");
	assert_eq!(*log.lock().unwrap(), ["hostname", "environment", "request"]);
	// Later providers win.
	assert_eq!(event.tag("last"), Some("request"));
	for name in ["hostname", "environment", "request"] {
		assert_eq!(event.tag(&format!("seen.{name}")), Some("yes"));
	}
}

#[test]
fn send_exception_carries_error_details() {
	let (reporter, transport) = reporter_with_memory();
	let error = PaymentDeclined {
		source: std::io::Error::new(std::io::ErrorKind::TimedOut, "gateway timed out"),
	};

	reporter.send_exception(&error);

	let event = transport.last().unwrap();
	assert_eq!(event.level(), Level::Error);
	assert_eq!(event.message(), "payment declined by gateway");

	let exception = event.exception().expect("exception interface");
	assert!(exception.exception_type.ends_with("PaymentDeclined"));
	assert_eq!(exception.value, "payment declined by gateway");
	assert_eq!(exception.causes, ["gateway timed out"]);
	// Frame availability depends on debug info, but capture machinery is never included.
	assert!(exception
		.stacktrace
		.frames
		.iter()
		.filter_map(|f| f.function.as_deref())
		.all(|f| !f.starts_with("backtrace::")));
}

#[test]
fn send_exception_accepts_trait_objects() {
	let (reporter, transport) = reporter_with_memory();
	let error: Box<dyn std::error::Error + Send + Sync> = "plain string error".into();

	reporter.send_exception(error.as_ref());

	let event = transport.last().unwrap();
	assert_eq!(event.message(), "plain string error");
	assert!(event.exception().is_some());
}

#[test]
fn failing_provider_does_not_block_later_providers() {
	let (reporter, transport) = reporter_with_memory();
	reporter.add_provider(Arc::new(FnProvider::new("a", |_: &mut EventBuilder| {
		Err(ReportError::provider("a", "lookup failed"))
	})));
	reporter.add_provider(Arc::new(FnProvider::new("b", |b: &mut EventBuilder| {
		b.add_tag("b", "ran");
		Ok(())
	})));

	reporter.send_message("x");

	assert_eq!(transport.len(), 1);
	assert_eq!(transport.last().unwrap().tag("b"), Some("ran"));
}

#[test]
fn panicking_provider_does_not_block_later_providers() {
	let (reporter, transport) = reporter_with_memory();
	reporter.add_provider(Arc::new(FnProvider::new("a", |b: &mut EventBuilder| {
		b.add_tag("a", "partial");
		panic!("provider bug");
	})));
	reporter.add_provider(Arc::new(FnProvider::new("b", |b: &mut EventBuilder| {
		b.add_tag("b", "ran");
		Ok(())
	})));

	reporter.send_message("x");

	let event = transport.last().unwrap();
	assert_eq!(event.tag("b"), Some("ran"));
	// Whatever A managed before panicking stays on the builder.
	assert_eq!(event.tag("a"), Some("partial"));
	assert!(!is_in_pipeline());
}

struct EchoTransport {
	reporter: Mutex<Option<Reporter>>,
	delivered: AtomicUsize,
}

impl Transport for EchoTransport {
	fn send(&self, _event: Event) -> Result<()> {
		self.delivered.fetch_add(1, Ordering::SeqCst);
		let reporter = self.reporter.lock().unwrap().clone();
		if let Some(reporter) = reporter {
			reporter.send_message("delivery log line");
			reporter.send_exception(&std::io::Error::new(std::io::ErrorKind::Other, "nested"));
		}
		Ok(())
	}
}

#[test]
fn transport_calling_back_into_reporter_terminates() {
	let transport = Arc::new(EchoTransport {
		reporter: Mutex::new(None),
		delivered: AtomicUsize::new(0),
	});
	let reporter = Reporter::new(transport.clone());
	*transport.reporter.lock().unwrap() = Some(reporter.clone());

	reporter.send_message("outer");
	reporter.send_message("outer again");

	assert_eq!(transport.delivered.load(Ordering::SeqCst), 2);
	assert!(!is_in_pipeline());

	// Break the reporter <-> transport cycle.
	transport.reporter.lock().unwrap().take();
}

#[test]
fn provider_calling_back_into_reporter_terminates() {
	let (reporter, transport) = reporter_with_memory();
	let inner = reporter.clone();
	let calls = Arc::new(AtomicUsize::new(0));
	let counter = Arc::clone(&calls);
	reporter.add_provider(Arc::new(FnProvider::new("chatty", move |_: &mut EventBuilder| {
		counter.fetch_add(1, Ordering::SeqCst);
		inner.send_message("provider log line");
		Ok(())
	})));

	reporter.send_message("outer");

	assert_eq!(calls.load(Ordering::SeqCst), 1);
	assert_eq!(transport.len(), 1);
	assert_eq!(transport.last().unwrap().message(), "outer");
}

struct FailingTransport;

impl Transport for FailingTransport {
	fn send(&self, _event: Event) -> Result<()> {
		Err(ReportError::Rejected {
			status: 503,
			message: "collector unavailable".to_string(),
		})
	}
}

struct PanickingTransport;

impl Transport for PanickingTransport {
	fn send(&self, _event: Event) -> Result<()> {
		panic!("socket closed");
	}
}

#[test]
fn failing_transport_never_surfaces_to_caller() {
	let reporter = Reporter::new(Arc::new(FailingTransport));
	for _ in 0..10 {
		reporter.send_message("x");
		reporter.send_exception(&std::io::Error::new(std::io::ErrorKind::Other, "y"));
		reporter.send_event(EventBuilder::new().build());
	}
	assert!(!is_in_pipeline());
}

#[test]
fn panicking_transport_never_surfaces_to_caller() {
	let reporter = Reporter::new(Arc::new(PanickingTransport));
	for _ in 0..3 {
		reporter.send_message("x");
	}
	assert!(!is_in_pipeline());

	// The thread can still report normally afterwards.
	let transport = MemoryTransport::default();
	reporter.set_transport(Arc::new(transport.clone()));
	reporter.send_message("recovered");
	assert_eq!(transport.len(), 1);
}

#[test]
fn send_event_bypasses_providers() {
	let (reporter, transport) = reporter_with_memory();
	reporter.add_provider(Arc::new(FnProvider::new("tagger", |b: &mut EventBuilder| {
		b.add_tag("enriched", "yes");
		Ok(())
	})));

	let mut builder = EventBuilder::new();
	builder.set_message("prebuilt").set_level(Level::Warning);
	let event = builder.build();
	let id = event.id();

	reporter.send_event(event);

	let delivered = transport.last().unwrap();
	assert_eq!(delivered.id(), id);
	assert_eq!(delivered.level(), Level::Warning);
	assert_eq!(delivered.tag("enriched"), None);
}

#[test]
fn manual_pipeline_with_run_providers() {
	let (reporter, transport) = reporter_with_memory();
	reporter.add_provider(Arc::new(FnProvider::new("tagger", |b: &mut EventBuilder| {
		b.add_tag("enriched", "yes");
		Ok(())
	})));

	let mut builder = reporter.new_builder();
	builder
		.set_message("assembled by hand")
		.add_interface(Interface::custom("job", serde_json::json!({"id": 7})));
	reporter.run_providers(&mut builder);
	reporter.send_event(builder.build());

	let event = transport.last().unwrap();
	assert_eq!(event.tag("enriched"), Some("yes"));
	assert!(event.interface("job").is_some());
}

#[test]
fn removing_unknown_provider_leaves_registry_unchanged() {
	let (reporter, _) = reporter_with_memory();
	let log = Arc::new(Mutex::new(Vec::new()));
	let a = recording_provider("a", Arc::clone(&log));
	let b = recording_provider("b", Arc::clone(&log));
	reporter.add_provider(Arc::clone(&a));
	reporter.add_provider(Arc::clone(&b));
	let before = reporter.providers();

	let stranger = recording_provider("stranger", log);
	assert!(!reporter.remove_provider(&stranger));

	let after = reporter.providers();
	assert_eq!(before.len(), after.len());
	for (x, y) in before.iter().zip(after.iter()) {
		assert!(Arc::ptr_eq(x, y));
	}
}

#[test]
fn providers_view_cannot_mutate_registry() {
	let (reporter, transport) = reporter_with_memory();
	let log = Arc::new(Mutex::new(Vec::new()));
	reporter.add_provider(recording_provider("kept", Arc::clone(&log)));

	let mut view = reporter.providers();
	view.clear();
	view.push(recording_provider("smuggled", Arc::clone(&log)));

	assert_eq!(reporter.providers().len(), 1);
	assert_eq!(reporter.providers()[0].name(), "kept");

	reporter.send_message("x");
	assert_eq!(*log.lock().unwrap(), ["kept"]);
	assert_eq!(transport.len(), 1);
}

#[test]
fn duplicate_add_is_ignored() {
	let (reporter, transport) = reporter_with_memory();
	let log = Arc::new(Mutex::new(Vec::new()));
	let provider = recording_provider("once", Arc::clone(&log));

	assert!(reporter.add_provider(Arc::clone(&provider)));
	assert!(!reporter.add_provider(Arc::clone(&provider)));
	reporter.send_message("x");

	assert_eq!(*log.lock().unwrap(), ["once"]);
	assert_eq!(transport.len(), 1);
}

#[test]
fn independent_reporters_do_not_share_state() {
	let (first, first_transport) = reporter_with_memory();
	let (second, second_transport) = reporter_with_memory();
	let log = Arc::new(Mutex::new(Vec::new()));
	first.add_provider(recording_provider("first-only", Arc::clone(&log)));

	second.send_message("from second");

	assert!(second.providers().is_empty());
	assert!(first_transport.is_empty());
	assert_eq!(second_transport.len(), 1);
	assert!(log.lock().unwrap().is_empty());
}

#[test]
fn concurrent_sends_each_deliver_their_own_event() {
	let (reporter, transport) = reporter_with_memory();
	reporter.add_provider(Arc::new(loom_report::ThreadProvider));

	let handles: Vec<_> = (0..8)
		.map(|i| {
			let reporter = reporter.clone();
			std::thread::Builder::new()
				.name(format!("worker-{i}"))
				.spawn(move || {
					for j in 0..25 {
						reporter.send_message(&format!("worker {i} message {j}"));
					}
				})
				.unwrap()
		})
		.collect();

	// Registry changes while senders are running.
	let log = Arc::new(Mutex::new(Vec::new()));
	for _ in 0..50 {
		let p = recording_provider("churn", Arc::clone(&log));
		reporter.add_provider(Arc::clone(&p));
		reporter.remove_provider(&p);
	}

	for handle in handles {
		handle.join().unwrap();
	}

	let events = transport.events();
	assert_eq!(events.len(), 200);
	for event in &events {
		let thread = event.tag("thread.name").unwrap();
		let worker = thread.strip_prefix("worker-").unwrap();
		assert!(event.message().starts_with(&format!("worker {worker} ")));
	}
}

#[test]
fn default_providers_attach_context() {
	let transport = MemoryTransport::default();
	let reporter = Reporter::builder()
		.server_name("web-1")
		.release("3.1.0")
		.transport(Arc::new(transport.clone()))
		.build();

	let context = reporter.context().unwrap();
	context.set_tag("tenant", "acme");
	context.set_user(loom_report::UserInterface {
		id: Some("user_1".to_string()),
		..Default::default()
	});
	reporter
		.breadcrumbs()
		.unwrap()
		.add(loom_report::Breadcrumb::new("http", "GET /invoices"));

	reporter.send_message("invoice rendered");

	let event = transport.last().unwrap();
	assert_eq!(event.server_name(), Some("web-1"));
	assert_eq!(event.release(), Some("3.1.0"));
	assert_eq!(event.tag("tenant"), Some("acme"));
	assert_eq!(event.tag("sdk.name"), Some("loom-report-rust"));
	assert!(event.tag("thread.name").is_some() || event.tag("thread.id").is_some());
	assert!(matches!(event.interface("user"), Some(Interface::User(_))));
	assert!(matches!(event.interface("breadcrumbs"), Some(Interface::Breadcrumbs(b)) if b.len() == 1));
}

proptest! {
	#[test]
	fn any_message_is_delivered_verbatim(message in ".*", providers in 0usize..6) {
		let (reporter, transport) = reporter_with_memory();
		let log = Arc::new(Mutex::new(Vec::new()));
		const NAMES: [&str; 6] = ["p0", "p1", "p2", "p3", "p4", "p5"];
		for name in NAMES.iter().copied().take(providers) {
			reporter.add_provider(recording_provider(name, Arc::clone(&log)));
		}

		reporter.send_message(&message);

		let events = transport.events();
		prop_assert_eq!(events.len(), 1);
		prop_assert_eq!(events[0].level(), Level::Info);
		prop_assert_eq!(events[0].message(), message.as_str());
		let seen = log.lock().unwrap().clone();
		prop_assert_eq!(seen.as_slice(), &NAMES[..providers]);
	}
}
