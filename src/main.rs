use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use formpress::{AppState, build_server, telemetry};
use formpress_conf::SettingsManager;
use formpress_remote::FormServiceClient;
use formpress_server::{ShutdownCoordinator, shutdown_signal};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let manager = SettingsManager::new();
	let settings = manager.get().context("failed to load settings")?;
	telemetry::init_tracing(&settings.logging.level);

	let client = FormServiceClient::from_settings(&settings.remote)
		.context("failed to create form service client")?;
	let state = Arc::new(AppState::from_settings(Arc::new(client), &settings));

	let addr: SocketAddr = settings
		.server
		.bind_address()
		.parse()
		.with_context(|| format!("invalid bind address {}", settings.server.bind_address()))?;
	let listener = TcpListener::bind(addr)
		.await
		.with_context(|| format!("failed to bind {addr}"))?;
	tracing::info!(
		addr = %addr,
		base_url = %settings.base.trimmed_url(),
		form_service = %settings.remote.form_service_url,
		"formpress starting"
	);

	let coordinator = ShutdownCoordinator::new(settings.server.shutdown_timeout());
	let server = build_server(&settings, state);
	let serve = tokio::spawn(server.serve_listener(listener, coordinator.clone()));

	shutdown_signal().await;
	tracing::info!("shutting down");
	coordinator.shutdown();
	coordinator.wait_for_shutdown().await;

	serve.await.context("server task panicked")??;
	Ok(())
}
