// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Panic hook that reports panics before the previous hook runs.

use std::panic;

use crate::error::panic_message;
use crate::reporter::Reporter;

/// Chains a reporting hook in front of the currently installed one.
///
/// A panic raised inside the reporting pipeline itself is not reported; the
/// thread still holds the pipeline marker when the hook runs.
pub(crate) fn install_panic_hook(reporter: Reporter) {
	let previous = panic::take_hook();
	panic::set_hook(Box::new(move |info| {
		let message = panic_message(info.payload());
		let location = info
			.location()
			.map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()));
		reporter.send_panic(&message, location);
		previous(info);
	}));
}
