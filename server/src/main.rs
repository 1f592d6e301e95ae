use clap::Parser;
use server::{Cli, app, setup, shutdown_signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let state = setup(&cli).await?;
    let app = app(state, &cli.assets_dir);

    let listener = tokio::net::TcpListener::bind(cli.bind).await?;
    log::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
