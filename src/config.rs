use crate::data::UserRole;
use crate::error::{AppError, Result};
use crate::orchestrator::QueryMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_WEBHOOK_URL: &str =
    "https://accuquery.app.n8n.cloud/webhook/265defbb-0f2c-43ee-bf73-db1cddeec134";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Local,
    Remote,
}

#[derive(Parser, Debug)]
#[command(name = "accuquery")]
#[command(about = "Conversational analytics over background-check orders")]
pub struct Args {
    /// Answer from the generated dataset or forward questions to the webhook
    #[arg(long, value_enum, default_value = "local")]
    pub mode: ModeArg,

    /// Query endpoint used in remote mode
    #[arg(long, env = "ACCUQUERY_WEBHOOK_URL", default_value = DEFAULT_WEBHOOK_URL)]
    pub webhook_url: String,

    /// Directory holding the audit log (default: ~/.accuquery)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Role selected at startup: Recruiter, "HR Manager" or "Compliance Officer"
    #[arg(long, default_value = "Recruiter")]
    pub role: String,

    /// Seed for the generated dataset; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = 5)]
    pub audit_poll_secs: u64,

    #[arg(long, default_value_t = 30)]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub mode: QueryMode,
    pub webhook_url: String,
    pub data_dir: PathBuf,
    pub role: UserRole,
    pub seed: Option<u64>,
    pub audit_poll_interval: Duration,
    pub request_timeout: Duration,
}

impl TryFrom<Args> for Config {
    type Error = AppError;

    fn try_from(args: Args) -> Result<Self> {
        let role = UserRole::parse(&args.role)
            .ok_or_else(|| AppError::Config(format!("unknown role: {}", args.role)))?;

        let webhook_url = args.webhook_url.trim().to_string();
        if !(webhook_url.starts_with("http://") || webhook_url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "webhook url must be http(s): {webhook_url}"
            )));
        }
        if args.audit_poll_secs == 0 {
            return Err(AppError::Config("audit poll interval must be positive".to_string()));
        }
        if args.request_timeout_secs == 0 {
            return Err(AppError::Config("request timeout must be positive".to_string()));
        }

        Ok(Self {
            mode: match args.mode {
                ModeArg::Local => QueryMode::Local,
                ModeArg::Remote => QueryMode::Remote,
            },
            webhook_url,
            data_dir: args.data_dir.unwrap_or_else(default_data_dir),
            role,
            seed: args.seed,
            audit_poll_interval: Duration::from_secs(args.audit_poll_secs),
            request_timeout: Duration::from_secs(args.request_timeout_secs),
        })
    }
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("USERPROFILE").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_data_dir() -> PathBuf {
    home_dir().join(".accuquery")
}
