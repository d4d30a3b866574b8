//! ef-auth CLI 分发：`run`、`doctor`、`hash-password`、`version`。

use anyhow::anyhow;
use serde_json::json;

use crate::{
    auth::password::hash_password,
    config::{AuthConfig, SecretSource},
};

/// CLI 分发结果。
pub(crate) enum CliDispatch {
    /// 继续进入服务主循环。
    Run,
    /// 命令已处理完成，主程序应退出。
    Exit,
}

/// 解析并执行 CLI。
pub(crate) fn dispatch(args: &[String]) -> anyhow::Result<CliDispatch> {
    if args.is_empty() {
        return Ok(CliDispatch::Run);
    }

    let cmd = args[0].trim();
    if cmd.is_empty() || cmd == "run" {
        return Ok(CliDispatch::Run);
    }

    if matches!(cmd, "-h" | "--help" | "help") {
        print_root_help();
        return Ok(CliDispatch::Exit);
    }

    match cmd {
        "doctor" => {
            let format = parse_doctor_format(&args[1..])?;
            let config = AuthConfig::from_env()?;
            println!("{}", render_doctor(&config, format));
            Ok(CliDispatch::Exit)
        }
        "hash-password" => {
            let Some(plaintext) = args.get(1) else {
                return Err(anyhow!("usage: ef-auth hash-password <plaintext>"));
            };
            println!("{}", hash_password(plaintext));
            Ok(CliDispatch::Exit)
        }
        "version" => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(CliDispatch::Exit)
        }
        other => Err(anyhow!(
            "unknown command: {other}; run `ef-auth --help` for usage"
        )),
    }
}

/// `doctor` 输出格式。
#[derive(Debug, PartialEq, Eq)]
enum DoctorFormat {
    Text,
    Json,
}

/// 解析 doctor 的 `--format` 参数。
fn parse_doctor_format(args: &[String]) -> anyhow::Result<DoctorFormat> {
    if args.is_empty() {
        return Ok(DoctorFormat::Text);
    }
    if args.len() == 2 && args[0] == "--format" {
        return match args[1].as_str() {
            "text" => Ok(DoctorFormat::Text),
            "json" => Ok(DoctorFormat::Json),
            other => Err(anyhow!("unsupported doctor format: {other}")),
        };
    }
    Err(anyhow!("usage: ef-auth doctor [--format text|json]"))
}

/// 渲染解析后的配置（不输出密钥本身）。
fn render_doctor(config: &AuthConfig, format: DoctorFormat) -> String {
    let secret = match config.secret_source {
        SecretSource::Env => "env",
        SecretSource::Generated => "generated",
    };
    match format {
        DoctorFormat::Text => [
            format!("auth-addr: {}", config.addr),
            format!("jwt-secret: {secret}"),
            format!("token-ttl-sec: {}", config.token_ttl_sec),
            format!("seed-users: {}", if config.seed_users { "yes" } else { "no" }),
            format!("log-dir: {}", config.log_dir.display()),
        ]
        .join("\n"),
        DoctorFormat::Json => {
            let payload = json!({
                "authAddr": config.addr,
                "jwtSecret": secret,
                "tokenTtlSec": config.token_ttl_sec,
                "seedUsers": config.seed_users,
                "logDir": config.log_dir.display().to_string(),
            });
            serde_json::to_string_pretty(&payload).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

/// 打印 root help。
fn print_root_help() {
    println!("ef-auth usage:");
    println!("  ef-auth run");
    println!("  ef-auth doctor [--format text|json]");
    println!("  ef-auth hash-password <plaintext>");
    println!("  ef-auth version");
}

#[cfg(test)]
mod tests {
    use super::{CliDispatch, DoctorFormat, dispatch, parse_doctor_format, render_doctor};
    use crate::config::AuthConfig;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn empty_or_run_starts_service() {
        assert!(matches!(dispatch(&[]).unwrap(), CliDispatch::Run));
        assert!(matches!(dispatch(&args(&["run"])).unwrap(), CliDispatch::Run));
    }

    #[test]
    fn unknown_command_is_error() {
        assert!(dispatch(&args(&["serve-forever"])).is_err());
        assert!(dispatch(&args(&["hash-password"])).is_err());
    }

    #[test]
    fn doctor_format_parsing() {
        assert_eq!(parse_doctor_format(&[]).unwrap(), DoctorFormat::Text);
        assert_eq!(
            parse_doctor_format(&args(&["--format", "json"])).unwrap(),
            DoctorFormat::Json
        );
        assert!(parse_doctor_format(&args(&["--format", "yaml"])).is_err());
        assert!(parse_doctor_format(&args(&["json"])).is_err());
    }

    #[test]
    fn doctor_never_prints_secret() {
        let config = AuthConfig::from_lookup(|key| {
            (key == "AUTH_JWT_SECRET").then(|| "very-secret-value".to_string())
        })
        .unwrap();
        for format in [DoctorFormat::Text, DoctorFormat::Json] {
            let rendered = render_doctor(&config, format);
            assert!(!rendered.contains("very-secret-value"));
            assert!(rendered.contains("env"));
        }
    }
}
