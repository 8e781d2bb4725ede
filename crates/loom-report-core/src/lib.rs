// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Loom error reporting SDK.
//!
//! This crate holds the event model shared by the reporting client and any
//! transport implementation:
//!
//! - [`Event`]: an immutable record of one reportable occurrence
//! - [`EventBuilder`]: the mutable staging area enrichment providers write to
//! - [`Interface`]: typed attachments such as exceptions, stack traces,
//!   HTTP requests and users
//! - [`compute_fingerprint`]: the checksum used to group similar events
//!
//! Nothing here performs I/O.

pub mod breadcrumb;
pub mod builder;
pub mod error;
pub mod event;
pub mod fingerprint;
pub mod interface;
pub mod level;

pub use breadcrumb::Breadcrumb;
pub use builder::{EventBuilder, DEFAULT_PLATFORM};
pub use error::{CoreError, Result};
pub use event::{Event, EventId};
pub use fingerprint::compute_fingerprint;
pub use interface::{
	ExceptionInterface, Frame, HttpInterface, Interface, MessageInterface, Stacktrace,
	UserInterface,
};
pub use level::Level;
