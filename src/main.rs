/*
 * Responsibility
 * - tokio runtime entry
 * - delegate to app::run() (no logic here)
 */
use anyhow::Result;

mod api;
mod app;
mod config;
mod error;
mod middleware;
mod model;
mod services;
mod state;
mod storage;

#[tokio::main]
async fn main() -> Result<()> {
    app::run().await
}
