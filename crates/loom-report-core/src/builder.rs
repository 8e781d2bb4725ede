// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Mutable staging area for an [`Event`].

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::event::{Event, EventId};
use crate::fingerprint::{compute_fingerprint, find_culprit, truncate};
use crate::interface::{Frame, Interface, EXCEPTION_INTERFACE, STACKTRACE_INTERFACE};
use crate::level::Level;

/// Platform reported for events built by this SDK.
pub const DEFAULT_PLATFORM: &str = "rust";

const MAX_CULPRIT_LENGTH: usize = 200;

/// Accumulates the fields of an event before it is frozen by [`build`](Self::build).
///
/// Setters take `&mut self` and return `&mut Self` so they chain, and so
/// enrichment providers handed a `&mut EventBuilder` can use them directly.
///
/// ```
/// use loom_report_core::{EventBuilder, Level};
///
/// let mut builder = EventBuilder::new();
/// builder.set_message("disk almost full").set_level(Level::Warning);
/// let event = builder.build();
/// assert_eq!(event.level(), Level::Warning);
/// ```
#[derive(Debug, Clone)]
pub struct EventBuilder {
	id: Option<EventId>,
	timestamp: Option<DateTime<Utc>>,
	level: Level,
	message: String,
	logger: Option<String>,
	platform: String,
	culprit: Option<String>,
	server_name: Option<String>,
	release: Option<String>,
	environment: Option<String>,
	tags: BTreeMap<String, String>,
	extra: serde_json::Map<String, serde_json::Value>,
	checksum: Option<String>,
	interfaces: BTreeMap<String, Interface>,
}

impl EventBuilder {
	pub fn new() -> Self {
		Self {
			id: None,
			timestamp: None,
			level: Level::default(),
			message: String::new(),
			logger: None,
			platform: DEFAULT_PLATFORM.to_string(),
			culprit: None,
			server_name: None,
			release: None,
			environment: None,
			tags: BTreeMap::new(),
			extra: serde_json::Map::new(),
			checksum: None,
			interfaces: BTreeMap::new(),
		}
	}

	/// Pins the event id. Without this every `build` generates a fresh one.
	pub fn set_id(&mut self, id: EventId) -> &mut Self {
		self.id = Some(id);
		self
	}

	pub fn set_timestamp(&mut self, timestamp: DateTime<Utc>) -> &mut Self {
		self.timestamp = Some(timestamp);
		self
	}

	pub fn set_message(&mut self, message: impl Into<String>) -> &mut Self {
		self.message = message.into();
		self
	}

	pub fn set_level(&mut self, level: Level) -> &mut Self {
		self.level = level;
		self
	}

	pub fn set_logger(&mut self, logger: impl Into<String>) -> &mut Self {
		self.logger = Some(logger.into());
		self
	}

	pub fn set_platform(&mut self, platform: impl Into<String>) -> &mut Self {
		self.platform = platform.into();
		self
	}

	pub fn set_culprit(&mut self, culprit: impl Into<String>) -> &mut Self {
		self.culprit = Some(culprit.into());
		self
	}

	pub fn set_server_name(&mut self, server_name: impl Into<String>) -> &mut Self {
		self.server_name = Some(server_name.into());
		self
	}

	pub fn set_release(&mut self, release: impl Into<String>) -> &mut Self {
		self.release = Some(release.into());
		self
	}

	pub fn set_environment(&mut self, environment: impl Into<String>) -> &mut Self {
		self.environment = Some(environment.into());
		self
	}

	pub fn add_tag(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
		self.tags.insert(key.into(), value.into());
		self
	}

	pub fn remove_tag(&mut self, key: &str) -> &mut Self {
		self.tags.remove(key);
		self
	}

	pub fn add_extra(&mut self, key: impl Into<String>, value: serde_json::Value) -> &mut Self {
		self.extra.insert(key.into(), value);
		self
	}

	/// Overrides the grouping checksum computed at build time.
	pub fn set_checksum(&mut self, checksum: impl Into<String>) -> &mut Self {
		self.checksum = Some(checksum.into());
		self
	}

	/// Attaches an interface under its name, replacing any previous one.
	pub fn add_interface(&mut self, interface: impl Into<Interface>) -> &mut Self {
		let interface = interface.into();
		self.interfaces.insert(interface.name().to_string(), interface);
		self
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	pub fn level(&self) -> Level {
		self.level
	}

	pub fn culprit(&self) -> Option<&str> {
		self.culprit.as_deref()
	}

	pub fn server_name(&self) -> Option<&str> {
		self.server_name.as_deref()
	}

	pub fn tag(&self, key: &str) -> Option<&str> {
		self.tags.get(key).map(String::as_str)
	}

	pub fn tags(&self) -> &BTreeMap<String, String> {
		&self.tags
	}

	pub fn interface(&self, name: &str) -> Option<&Interface> {
		self.interfaces.get(name)
	}

	/// Freezes the current state into an [`Event`].
	///
	/// The builder is left untouched. Unless pinned, each call assigns a new
	/// id and the current time, so two builds differ only in those fields.
	pub fn build(&self) -> Event {
		let frames = self.frames();
		let exception_type = match self.interfaces.get(EXCEPTION_INTERFACE) {
			Some(Interface::Exception(exception)) => Some(exception.exception_type.as_str()),
			_ => None,
		};

		let culprit = self
			.culprit
			.clone()
			.or_else(|| find_culprit(frames).map(|c| truncate(&c, MAX_CULPRIT_LENGTH)));
		let checksum = self
			.checksum
			.clone()
			.unwrap_or_else(|| compute_fingerprint(exception_type, frames, &self.message));

		Event {
			id: self.id.unwrap_or_else(EventId::new),
			timestamp: self.timestamp.unwrap_or_else(Utc::now),
			level: self.level,
			message: self.message.clone(),
			logger: self.logger.clone(),
			platform: self.platform.clone(),
			culprit,
			server_name: self.server_name.clone(),
			release: self.release.clone(),
			environment: self.environment.clone(),
			tags: self.tags.clone(),
			extra: self.extra.clone(),
			checksum,
			interfaces: self.interfaces.clone(),
		}
	}

	fn frames(&self) -> &[Frame] {
		[EXCEPTION_INTERFACE, STACKTRACE_INTERFACE]
			.iter()
			.filter_map(|name| self.interfaces.get(*name))
			.filter_map(Interface::stacktrace)
			.map(|stacktrace| stacktrace.frames.as_slice())
			.next()
			.unwrap_or(&[])
	}
}

impl Default for EventBuilder {
	fn default() -> Self {
		Self::new()
	}
}
