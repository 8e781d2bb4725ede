// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Example: Report messages and errors through a channel drained by a tokio task.
//!
//! Run with:
//!   RUST_LOG=loom_report=debug cargo run --example capture -p loom-report

use std::sync::Arc;

use loom_report::transport::DEFAULT_CHANNEL_CAPACITY;
use loom_report::{
	Breadcrumb, ChannelTransport, EventBuilder, FnProvider, Level, Reporter, UserInterface,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.init();

	let (transport, mut rx) = ChannelTransport::new(DEFAULT_CHANNEL_CAPACITY);

	// Stand-in for a network sender.
	let delivery = tokio::spawn(async move {
		while let Some(event) = rx.recv().await {
			println!("{}", serde_json::to_string_pretty(&event.to_json()?)?);
		}
		Ok::<_, Box<dyn std::error::Error + Send + Sync>>(())
	});

	let reporter = Reporter::builder()
		.logger("capture-example")
		.release("0.1.0-example")
		.environment("development")
		.server_name("example-server")
		.tag("example", "true")
		.transport(Arc::new(transport))
		.provider(Arc::new(FnProvider::new(
			"request-id",
			|builder: &mut EventBuilder| {
				builder.add_tag("request_id", "req_example_42");
				Ok(())
			},
		)))
		.build();

	if let Some(context) = reporter.context() {
		context.set_user(UserInterface {
			id: Some("user_example_123".to_string()),
			email: Some("example@example.com".to_string()),
			username: Some("example_user".to_string()),
			..Default::default()
		});
	}
	if let Some(breadcrumbs) = reporter.breadcrumbs() {
		breadcrumbs.add(Breadcrumb::new("navigation", "Opened settings page"));
		breadcrumbs.add(Breadcrumb::new("http", "POST /api/settings").with_level(Level::Warning));
	}

	println!("Sending message...");
	reporter.send_message("Example started");

	println!("Sending error...");
	let err = std::fs::read_to_string("/definitely/not/here").unwrap_err();
	reporter.send_exception(&err);

	// Dropping every reporter handle closes the channel and ends the delivery task.
	reporter.close();
	drop(reporter);
	delivery.await?.map_err(|e| e as Box<dyn std::error::Error>)?;

	println!("Done.");
	Ok(())
}
