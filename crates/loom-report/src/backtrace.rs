// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stack capture for reported errors and panics.

use loom_report_core::{Frame, Stacktrace};
use rustc_demangle::demangle;

/// Frames from the capture machinery itself, stripped from every stacktrace.
const SDK_PREFIXES: &[&str] = &[
	"backtrace::",
	"<backtrace::",
	"loom_report::backtrace::",
	"loom_report::reporter::",
	"loom_report::panic_hook::",
];

/// Capture the current thread's stack.
pub fn capture_backtrace() -> Stacktrace {
	let backtrace = backtrace::Backtrace::new();
	let mut frames = Vec::new();

	for frame in backtrace.frames() {
		let instruction_addr = Some(format!("{:p}", frame.ip()));
		let symbols = frame.symbols();

		if symbols.is_empty() {
			frames.push(Frame {
				instruction_addr,
				..Default::default()
			});
			continue;
		}

		// Inlined functions resolve to several symbols for a single frame.
		for symbol in symbols {
			let function = symbol.name().map(|name| match name.as_str() {
				Some(raw) => format!("{:#}", demangle(raw)),
				None => format!("{:#}", name),
			});
			if function.as_deref().is_some_and(is_sdk_frame) {
				continue;
			}

			let mut parsed = frame_from_function(function);
			if let Some(path) = symbol.filename() {
				parsed.abs_path = Some(path.display().to_string());
				parsed.filename = path
					.file_name()
					.map(|name| name.to_string_lossy().to_string());
			}
			parsed.lineno = symbol.lineno();
			parsed.colno = symbol.colno();
			parsed.instruction_addr = instruction_addr.clone();
			frames.push(parsed);
		}
	}

	Stacktrace { frames }
}

/// Build a frame from a demangled function path.
fn frame_from_function(function: Option<String>) -> Frame {
	let Some(function) = function else {
		return Frame::default();
	};

	// e.g., "my_app::handlers::checkout::submit" -> "my_app::handlers::checkout"
	let module = function.rfind("::").map(|idx| function[..idx].to_string());
	let in_app = is_in_app_frame(&function);

	Frame {
		function: Some(function),
		module,
		in_app,
		..Default::default()
	}
}

fn is_sdk_frame(function: &str) -> bool {
	SDK_PREFIXES.iter().any(|prefix| function.starts_with(prefix))
}

/// Determine if a frame is from user application code vs standard library.
fn is_in_app_frame(function: &str) -> bool {
	const SYSTEM_PREFIXES: &[&str] = &[
		"std::",
		"core::",
		"alloc::",
		"<std::",
		"<core::",
		"<alloc::",
		"tokio::",
		"<tokio::",
		"futures::",
		"<futures::",
		"tracing::",
		"<tracing::",
		"backtrace::",
		"<backtrace::",
		"panic_unwind::",
		"<panic_unwind::",
		"test::",
		"loom_report::",
		"<loom_report::",
		"rust_begin_unwind",
		"rust_panic",
		"__rust_",
		"_rust_",
		"__libc_start",
		"_start",
	];

	const SYSTEM_CONTAINS: &[&str] = &[
		"::panic::",
		"::panicking::",
		"::thread::",
		"::rt::",
		"::runtime::",
		"::sys_common::",
	];

	if SYSTEM_PREFIXES.iter().any(|p| function.starts_with(p)) {
		return false;
	}

	!SYSTEM_CONTAINS.iter().any(|c| function.contains(c))
}
