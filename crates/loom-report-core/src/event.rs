// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The immutable event handed to transports.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CoreError;
use crate::interface::{ExceptionInterface, Interface, EXCEPTION_INTERFACE};
use crate::level::Level;

/// Unique identifier of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
	pub fn new() -> Self {
		Self(Uuid::now_v7())
	}
}

impl Default for EventId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for EventId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for EventId {
	type Err = CoreError;

	fn from_str(s: &str) -> crate::Result<Self> {
		Ok(Self(Uuid::parse_str(s)?))
	}
}

/// One reportable occurrence.
///
/// Events are only produced by [`EventBuilder::build`](crate::EventBuilder::build)
/// and expose no mutators, so a built event can be shared across threads freely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
	pub(crate) id: EventId,
	pub(crate) timestamp: DateTime<Utc>,
	pub(crate) level: Level,
	pub(crate) message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub(crate) logger: Option<String>,
	pub(crate) platform: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub(crate) culprit: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub(crate) server_name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub(crate) release: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub(crate) environment: Option<String>,
	pub(crate) tags: BTreeMap<String, String>,
	pub(crate) extra: serde_json::Map<String, serde_json::Value>,
	pub(crate) checksum: String,
	pub(crate) interfaces: BTreeMap<String, Interface>,
}

impl Event {
	pub fn id(&self) -> EventId {
		self.id
	}

	pub fn timestamp(&self) -> DateTime<Utc> {
		self.timestamp
	}

	pub fn level(&self) -> Level {
		self.level
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	pub fn logger(&self) -> Option<&str> {
		self.logger.as_deref()
	}

	pub fn platform(&self) -> &str {
		&self.platform
	}

	/// Function or location most likely responsible for the event.
	pub fn culprit(&self) -> Option<&str> {
		self.culprit.as_deref()
	}

	pub fn server_name(&self) -> Option<&str> {
		self.server_name.as_deref()
	}

	pub fn release(&self) -> Option<&str> {
		self.release.as_deref()
	}

	pub fn environment(&self) -> Option<&str> {
		self.environment.as_deref()
	}

	pub fn tags(&self) -> &BTreeMap<String, String> {
		&self.tags
	}

	pub fn tag(&self, key: &str) -> Option<&str> {
		self.tags.get(key).map(String::as_str)
	}

	pub fn extra(&self) -> &serde_json::Map<String, serde_json::Value> {
		&self.extra
	}

	/// Grouping fingerprint; see [`compute_fingerprint`](crate::compute_fingerprint).
	pub fn checksum(&self) -> &str {
		&self.checksum
	}

	pub fn interfaces(&self) -> &BTreeMap<String, Interface> {
		&self.interfaces
	}

	pub fn interface(&self, name: &str) -> Option<&Interface> {
		self.interfaces.get(name)
	}

	/// The exception interface, when the event was built from an error.
	pub fn exception(&self) -> Option<&ExceptionInterface> {
		match self.interfaces.get(EXCEPTION_INTERFACE) {
			Some(Interface::Exception(exception)) => Some(exception),
			_ => None,
		}
	}

	/// Encodes the event as JSON, for transports that ship JSON bodies.
	pub fn to_json(&self) -> crate::Result<serde_json::Value> {
		Ok(serde_json::to_value(self)?)
	}
}
