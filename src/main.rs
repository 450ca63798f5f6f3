mod app;
mod catalog;
mod config;
mod connectivity;
mod coordinator;
mod engine;
mod runtime;
mod ui;

fn main() -> anyhow::Result<()> {
    runtime::run()
}
