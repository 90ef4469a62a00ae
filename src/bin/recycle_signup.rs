use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use recycle_admin::api::ApiClient;
use recycle_admin::config;
use recycle_admin::notify::ConsoleNotifier;
use recycle_admin::signup::{SignupController, SubmitOutcome};
use recycle_admin::term::TerminalSignupView;
use recycle_admin::validate::Field;

#[derive(Debug, Parser)]
#[command(author, version, about = "Register a new recycling account")]
struct Args {
    /// Path to YAML config file (reads `api`, `signup` and `notify`)
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    #[arg(long)]
    name: String,

    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    dob: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    username: String,

    #[arg(long)]
    password: String,

    #[arg(long)]
    confirm_password: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config))
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    let api = ApiClient::from_config(&cfg).context("failed to build API client")?;

    let mut controller = SignupController::new(
        api,
        TerminalSignupView,
        ConsoleNotifier::new(&cfg.notify),
        cfg.signup.clone(),
    );

    let values = [
        (Field::Name, args.name),
        (Field::Dob, args.dob),
        (Field::Email, args.email),
        (Field::Username, args.username),
        (Field::Password, args.password),
        (Field::ConfirmPassword, args.confirm_password),
    ];
    for (field, value) in values {
        controller.on_input(field, value);
        controller.on_blur(field);
    }

    match controller.submit().await {
        SubmitOutcome::Registered => Ok(()),
        SubmitOutcome::Invalid => bail!("signup form has errors"),
        SubmitOutcome::Rejected(reason) => bail!("registration rejected: {}", reason),
        SubmitOutcome::Failed => bail!("registration failed"),
    }
}
