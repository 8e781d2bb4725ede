// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-thread marker for "this thread is inside the reporting pipeline".
//!
//! Reporting often hooks into logging, and the pipeline itself logs when a
//! provider or transport fails. Without this marker such a log line could
//! trigger another report, which fails and logs again, and so on until the
//! stack runs out. Every send operation holds a [`PipelineGuard`] while it
//! enriches and dispatches; anything that might feed back into the reporter
//! checks [`is_in_pipeline`] first.

use std::cell::Cell;
use std::marker::PhantomData;

thread_local! {
	static IN_PIPELINE: Cell<bool> = const { Cell::new(false) };
}

/// Returns true if the current thread is inside the reporting pipeline.
pub fn is_in_pipeline() -> bool {
	IN_PIPELINE.with(Cell::get)
}

/// Scoped ownership of the current thread's pipeline marker.
///
/// The marker is cleared when the guard is dropped, including during
/// unwinding. The guard is tied to the thread that acquired it.
#[derive(Debug)]
#[must_use = "the pipeline marker is released as soon as the guard is dropped"]
pub struct PipelineGuard {
	_not_send: PhantomData<*const ()>,
}

impl PipelineGuard {
	/// Marks the current thread as inside the pipeline.
	///
	/// Returns `None` if the thread is already inside it.
	pub fn enter() -> Option<Self> {
		IN_PIPELINE.with(|flag| {
			if flag.replace(true) {
				None
			} else {
				Some(Self {
					_not_send: PhantomData,
				})
			}
		})
	}
}

impl Drop for PipelineGuard {
	fn drop(&mut self) {
		IN_PIPELINE.with(|flag| flag.set(false));
	}
}
