pub mod context;
pub mod lifecycle;
pub mod logging;

pub use lifecycle::run_standalone;

pub async fn run() -> anyhow::Result<()> {
    run_standalone().await
}
