use clap::{Parser, Subcommand};
use tracing::{error, info};
use uuid::Uuid;

use service::auth::domain::{LoginInput, RegisterInput, UpdateCredentialsInput};
use service::context::AppContext;
use service::errors::ServiceError;

#[derive(Parser)]
#[command(name = "chirpy", version, about = "Operate on a chirpy store file")]
struct Cli {
    /// Store file; overrides storage.path from config.toml / CHIRPY_DB_PATH
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Chirp operations
    #[command(subcommand)]
    Chirp(ChirpCommand),
    /// User operations
    #[command(subcommand)]
    User(UserCommand),
    /// Delete every chirp and user
    Reset,
}

#[derive(Subcommand)]
enum ChirpCommand {
    Create { body: String },
    List,
    Get { id: String },
}

#[derive(Subcommand)]
enum UserCommand {
    Register { email: String, password: String },
    Login {
        email: String,
        password: String,
        #[arg(long)]
        expires_in_seconds: Option<i64>,
    },
    /// Change email and password of the user owning TOKEN
    Update { token: String, email: String, password: String },
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let mut cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };
    if let Some(db) = cli.db.clone() {
        cfg.storage.path = db;
    }

    common::utils::logging::init_logging(&cfg.runtime.log_format);

    let run_id = Uuid::new_v4();
    std::panic::set_hook(Box::new(move |info| {
        error!(service = "chirpy", event = "panic", %run_id, message = %info, "unhandled panic occurred");
    }));

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.runtime.worker_threads { builder.worker_threads(w); }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "chirpy", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    rt.block_on(async move {
        if let Err(e) = service::runtime::ensure_data_dir(&cfg.storage.path).await {
            error!(service = "chirpy", event = "data_dir_failed", error = %e, "cannot prepare data directory");
            return std::process::ExitCode::FAILURE;
        }
        let ctx = match AppContext::from_config(&cfg).await {
            Ok(ctx) => ctx,
            Err(e) => {
                error!(service = "chirpy", event = "open_failed", error = %e, "cannot open store");
                return std::process::ExitCode::FAILURE;
            }
        };
        info!(service = "chirpy", %run_id, db = %cfg.storage.path, "store ready");

        match run(&ctx, cli.command).await {
            Ok(out) => {
                println!("{out}");
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                let body = serde_json::json!({ "error": e.to_string(), "status": e.status_code() });
                eprintln!("{body}");
                std::process::ExitCode::FAILURE
            }
        }
    })
}

async fn run(ctx: &AppContext, command: Command) -> Result<serde_json::Value, ServiceError> {
    let out = match command {
        Command::Chirp(ChirpCommand::Create { body }) => serde_json::to_value(ctx.chirps.create(&body).await?)?,
        Command::Chirp(ChirpCommand::List) => serde_json::to_value(ctx.chirps.list().await?)?,
        Command::Chirp(ChirpCommand::Get { id }) => serde_json::to_value(ctx.chirps.get_by_path(&id).await?)?,
        Command::User(UserCommand::Register { email, password }) => {
            serde_json::to_value(ctx.auth.register(RegisterInput { email, password }).await?)?
        }
        Command::User(UserCommand::Login { email, password, expires_in_seconds }) => {
            serde_json::to_value(ctx.auth.login(LoginInput { email, password, expires_in_seconds }).await?)?
        }
        Command::User(UserCommand::Update { token, email, password }) => {
            let header = format!("Bearer {token}");
            serde_json::to_value(
                ctx.auth
                    .update_credentials(Some(header.as_str()), UpdateCredentialsInput { email, password })
                    .await?,
            )?
        }
        Command::Reset => {
            ctx.reset().await?;
            serde_json::json!({ "ok": true })
        }
    };
    Ok(out)
}
