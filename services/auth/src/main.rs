//! ef-auth 二进制入口：解析 CLI、加载配置并启动服务。

mod api;
mod app;
mod auth;
mod cli;
mod config;
mod logging;
mod state;
mod users;

#[tokio::main]
/// 启动认证服务。
async fn main() -> anyhow::Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<String>>();
    match cli::dispatch(&args)? {
        cli::CliDispatch::Run => {}
        cli::CliDispatch::Exit => return Ok(()),
    }

    let config = config::AuthConfig::from_env()?;
    let _log_runtime = logging::init("auth", &config.log_dir)?;
    app::run(config).await
}
