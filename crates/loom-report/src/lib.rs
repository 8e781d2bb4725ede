// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error and event reporting SDK for Rust applications.
//!
//! Application code hands the [`Reporter`] a message, an error or a prebuilt
//! [`Event`]. The reporter assembles the event, runs it through the
//! registered [`EnrichmentProvider`]s in order and passes the result to a
//! [`Transport`]. Send operations never fail or panic from the caller's point
//! of view: provider and transport failures are logged through `tracing` and
//! swallowed.
//!
//! Each thread carries a marker while it is inside the pipeline (see
//! [`reentrancy`]), so a transport or log integration that calls back into
//! the reporter cannot recurse.
//!
//! ```
//! use std::sync::Arc;
//! use loom_report::{FnProvider, MemoryTransport, Reporter};
//!
//! let transport = MemoryTransport::default();
//! let reporter = Reporter::builder()
//!     .release(env!("CARGO_PKG_VERSION"))
//!     .transport(Arc::new(transport.clone()))
//!     .provider(Arc::new(FnProvider::new("request-id", |builder| {
//!         builder.add_tag("request_id", "req_42");
//!         Ok(())
//!     })))
//!     .build();
//!
//! let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
//! reporter.send_exception(&err);
//!
//! let event = transport.last().unwrap();
//! assert_eq!(event.message(), "disk full");
//! assert_eq!(event.tag("request_id"), Some("req_42"));
//! ```

mod backtrace;
pub mod config;
pub mod error;
mod panic_hook;
pub mod provider;
pub mod reentrancy;
pub mod reporter;
pub mod transport;

pub use crate::backtrace::capture_backtrace;
pub use config::ReporterConfig;
pub use error::{ReportError, Result};
pub use provider::{
	BreadcrumbProvider, ContextProvider, EnrichmentProvider, FnProvider, ProviderRegistry,
	SdkProvider, ServerNameProvider, ThreadProvider,
};
pub use reentrancy::{is_in_pipeline, PipelineGuard};
pub use reporter::{Reporter, ReporterBuilder};
pub use transport::{ChannelTransport, MemoryTransport, NoopTransport, Transport};

pub use loom_report_core::{
	Breadcrumb, Event, EventBuilder, EventId, ExceptionInterface, Frame, HttpInterface, Interface,
	Level, MessageInterface, Stacktrace, UserInterface,
};
