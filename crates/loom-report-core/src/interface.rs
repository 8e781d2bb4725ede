// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Typed attachments ("interfaces") carried by an event.
//!
//! Every interface has a stable name which is used as its key in the event's
//! interface map. Attaching a second interface under the same name replaces
//! the first.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

use crate::breadcrumb::Breadcrumb;

pub const EXCEPTION_INTERFACE: &str = "exception";
pub const STACKTRACE_INTERFACE: &str = "stacktrace";
pub const MESSAGE_INTERFACE: &str = "message";
pub const HTTP_INTERFACE: &str = "request";
pub const USER_INTERFACE: &str = "user";
pub const BREADCRUMBS_INTERFACE: &str = "breadcrumbs";

/// A single stack frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub function: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub module: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub filename: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub abs_path: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub lineno: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub colno: Option<u32>,
	#[serde(default)]
	pub in_app: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub instruction_addr: Option<String>,
}

/// Ordered stack frames, innermost call first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stacktrace {
	pub frames: Vec<Frame>,
}

impl Stacktrace {
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	/// Frames that belong to application code.
	pub fn in_app_frames(&self) -> impl Iterator<Item = &Frame> {
		self.frames.iter().filter(|f| f.in_app)
	}
}

/// An error value and the stack it was captured on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionInterface {
	/// Type name of the error, e.g. `std::io::error::Error`.
	#[serde(rename = "type")]
	pub exception_type: String,
	/// The error's description.
	pub value: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub module: Option<String>,
	/// Descriptions of the error's sources, outermost first.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub causes: Vec<String>,
	pub stacktrace: Stacktrace,
}

impl ExceptionInterface {
	pub fn new(
		exception_type: impl Into<String>,
		value: impl Into<String>,
		stacktrace: Stacktrace,
	) -> Self {
		let exception_type = exception_type.into();
		let module = exception_type
			.rfind("::")
			.map(|idx| exception_type[..idx].to_string());
		Self {
			exception_type,
			value: value.into(),
			module,
			causes: Vec::new(),
			stacktrace,
		}
	}

	/// Builds the interface from an error value, walking its `source()` chain.
	pub fn from_error<E>(error: &E, stacktrace: Stacktrace) -> Self
	where
		E: std::error::Error + ?Sized,
	{
		let mut interface = Self::new(std::any::type_name::<E>(), error.to_string(), stacktrace);
		let mut source = error.source();
		while let Some(cause) = source {
			interface.causes.push(cause.to_string());
			source = cause.source();
		}
		interface
	}
}

/// A message template with its positional parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageInterface {
	pub message: String,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub params: Vec<String>,
}

impl MessageInterface {
	pub fn new(message: impl Into<String>, params: Vec<String>) -> Self {
		Self {
			message: message.into(),
			params,
		}
	}
}

/// HTTP request being served when the event occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpInterface {
	pub url: Option<String>,
	pub method: Option<String>,
	pub headers: HashMap<String, String>,
	pub query_string: Option<String>,
}

/// The user affected by the event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInterface {
	pub id: Option<String>,
	pub email: Option<String>,
	pub username: Option<String>,
	/// IP address (sensitive - not displayed by default)
	pub ip_address: Option<String>,
}

/// A named, typed attachment on an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Interface {
	Exception(ExceptionInterface),
	Stacktrace(Stacktrace),
	Message(MessageInterface),
	Http(HttpInterface),
	User(UserInterface),
	Breadcrumbs(Vec<Breadcrumb>),
	/// Payload for an interface this crate has no type for.
	Custom {
		name: String,
		payload: serde_json::Value,
	},
}

impl Interface {
	pub fn custom(name: impl Into<String>, payload: serde_json::Value) -> Self {
		Self::Custom {
			name: name.into(),
			payload,
		}
	}

	/// Key under which the interface is stored on an event.
	pub fn name(&self) -> &str {
		match self {
			Self::Exception(_) => EXCEPTION_INTERFACE,
			Self::Stacktrace(_) => STACKTRACE_INTERFACE,
			Self::Message(_) => MESSAGE_INTERFACE,
			Self::Http(_) => HTTP_INTERFACE,
			Self::User(_) => USER_INTERFACE,
			Self::Breadcrumbs(_) => BREADCRUMBS_INTERFACE,
			Self::Custom { name, .. } => name,
		}
	}

	/// Stack frames carried by this interface, if any.
	pub fn stacktrace(&self) -> Option<&Stacktrace> {
		match self {
			Self::Exception(exception) => Some(&exception.stacktrace),
			Self::Stacktrace(stacktrace) => Some(stacktrace),
			_ => None,
		}
	}
}

impl Serialize for Interface {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::Exception(v) => v.serialize(serializer),
			Self::Stacktrace(v) => v.serialize(serializer),
			Self::Message(v) => v.serialize(serializer),
			Self::Http(v) => v.serialize(serializer),
			Self::User(v) => v.serialize(serializer),
			Self::Breadcrumbs(v) => v.serialize(serializer),
			Self::Custom { payload, .. } => payload.serialize(serializer),
		}
	}
}

impl From<ExceptionInterface> for Interface {
	fn from(value: ExceptionInterface) -> Self {
		Self::Exception(value)
	}
}

impl From<Stacktrace> for Interface {
	fn from(value: Stacktrace) -> Self {
		Self::Stacktrace(value)
	}
}

impl From<MessageInterface> for Interface {
	fn from(value: MessageInterface) -> Self {
		Self::Message(value)
	}
}

impl From<HttpInterface> for Interface {
	fn from(value: HttpInterface) -> Self {
		Self::Http(value)
	}
}

impl From<UserInterface> for Interface {
	fn from(value: UserInterface) -> Self {
		Self::User(value)
	}
}
