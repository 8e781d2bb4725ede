// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Checksum used by the collector to group similar events.

use sha2::{Digest, Sha256};

use crate::interface::Frame;

const FINGERPRINT_FRAMES: usize = 5;

/// Compute a fingerprint for an event.
///
/// The fingerprint is a SHA256 hash based on:
/// 1. Exception type, when there is one
/// 2. Top N in-app frames (function + module)
/// 3. If no in-app frames, the top N frames
/// 4. If there are no frames at all, the message
pub fn compute_fingerprint(exception_type: Option<&str>, frames: &[Frame], message: &str) -> String {
	let mut hasher = Sha256::new();

	if let Some(exception_type) = exception_type {
		hasher.update(exception_type.as_bytes());
	}
	hasher.update(b"|");

	let in_app_frames: Vec<_> = frames
		.iter()
		.filter(|f| f.in_app)
		.take(FINGERPRINT_FRAMES)
		.collect();

	for frame in &in_app_frames {
		if let Some(func) = &frame.function {
			hasher.update(func.as_bytes());
		}
		hasher.update(b"@");
		if let Some(module) = &frame.module {
			hasher.update(module.as_bytes());
		}
		hasher.update(b"|");
	}

	if in_app_frames.is_empty() {
		for frame in frames.iter().take(FINGERPRINT_FRAMES) {
			if let Some(func) = &frame.function {
				hasher.update(func.as_bytes());
			}
			hasher.update(b"|");
		}
	}

	if frames.is_empty() {
		hasher.update(message.as_bytes());
	}

	hex::encode(hasher.finalize())
}

/// Find the culprit function (top in-app frame).
pub fn find_culprit(frames: &[Frame]) -> Option<String> {
	frames
		.iter()
		.find(|f| f.in_app)
		.and_then(|f| f.function.clone())
}

const ELLIPSIS: &str = "...";

/// Truncate a string to at most `max_len` bytes.
///
/// The result ends in an ellipsis unless `max_len` is too small to hold one.
pub fn truncate(s: &str, max_len: usize) -> String {
	if s.len() <= max_len {
		return s.to_string();
	}
	let (budget, suffix) = if max_len < ELLIPSIS.len() {
		(max_len, "")
	} else {
		(max_len - ELLIPSIS.len(), ELLIPSIS)
	};
	let end = s
		.char_indices()
		.map(|(idx, c)| idx + c.len_utf8())
		.take_while(|end| *end <= budget)
		.last()
		.unwrap_or(0);
	format!("{}{}", &s[..end], suffix)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn frame(function: &str, module: Option<&str>, in_app: bool) -> Frame {
		Frame {
			function: Some(function.to_string()),
			module: module.map(str::to_string),
			in_app,
			..Default::default()
		}
	}

	#[test]
	fn fingerprint_is_hex_sha256() {
		let frames = vec![
			frame("handle_request", Some("my_app::server"), true),
			frame("call", Some("tower::service"), false),
		];

		let fingerprint = compute_fingerprint(Some("std::io::Error"), &frames, "");

		assert_eq!(fingerprint.len(), 64);
		assert!(fingerprint.chars().all(|c| c.is_ascii_hexdigit()));
	}

	#[test]
	fn same_type_and_frames_share_fingerprint() {
		let frames = vec![frame("handle_request", Some("my_app::server"), true)];

		// Message differs, stack does not.
		assert_eq!(
			compute_fingerprint(Some("ParseError"), &frames, "bad token at 1"),
			compute_fingerprint(Some("ParseError"), &frames, "bad token at 7"),
		);
	}

	#[test]
	fn different_type_different_fingerprint() {
		let frames = vec![frame("handle_request", None, true)];

		assert_ne!(
			compute_fingerprint(Some("ParseError"), &frames, ""),
			compute_fingerprint(Some("IoError"), &frames, ""),
		);
	}

	#[test]
	fn falls_back_to_all_frames_without_in_app() {
		let a = vec![frame("std::rt::lang_start", None, false)];
		let b = vec![frame("core::ops::function::call", None, false)];

		assert_ne!(
			compute_fingerprint(None, &a, ""),
			compute_fingerprint(None, &b, "")
		);
	}

	#[test]
	fn message_only_events_group_by_message() {
		assert_eq!(
			compute_fingerprint(None, &[], "cache miss"),
			compute_fingerprint(None, &[], "cache miss"),
		);
		assert_ne!(
			compute_fingerprint(None, &[], "cache miss"),
			compute_fingerprint(None, &[], "cache hit"),
		);
	}

	#[test]
	fn find_culprit_returns_in_app_function() {
		let frames = vec![
			frame("external", None, false),
			frame("my_function", None, true),
		];

		assert_eq!(find_culprit(&frames), Some("my_function".to_string()));
		assert_eq!(find_culprit(&frames[..1]), None);
	}

	#[test]
	fn truncate_short_string() {
		assert_eq!(truncate("hello", 10), "hello");
	}

	#[test]
	fn truncate_long_string() {
		assert_eq!(
			truncate("hello world this is a long string", 15),
			"hello world ..."
		);
	}

	#[test]
	fn truncate_respects_char_boundaries() {
		let truncated = truncate("ééééééééé", 8);
		assert!(truncated.ends_with("..."));
		assert!(truncated.len() <= 8);
	}

	#[test]
	fn truncate_below_ellipsis_length_drops_the_ellipsis() {
		assert_eq!(truncate("abcdef", 0), "");
		assert_eq!(truncate("abcdef", 2), "ab");
		assert_eq!(truncate("ééé", 2), "é");
		assert_eq!(truncate("ééé", 1), "");
		assert_eq!(truncate("abcdef", 3), "...");
		assert_eq!(truncate("ab", 2), "ab");
	}
}
