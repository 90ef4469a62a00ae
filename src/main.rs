use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use recycle_admin::api::ApiClient;
use recycle_admin::config;
use recycle_admin::model::{FilterField, WasteType};
use recycle_admin::notify::ConsoleNotifier;
use recycle_admin::panel::{ActionOutcome, EditField, FetchOutcome, TransactionPanel};
use recycle_admin::term::TerminalPanelView;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Review, correct and remove recycling transactions of your center"
)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Answer yes to confirmation prompts
    #[arg(long)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Args)]
struct PageArgs {
    /// Page to show (1-based)
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Rows per page; defaults to `panel.items_per_page`
    #[arg(long)]
    limit: Option<u32>,

    /// Username substring
    #[arg(long)]
    username: Option<String>,

    /// Start of the date range (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,

    /// End of the date range (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,

    /// Raw date range, e.g. "2024-01-01 to 2024-01-31"
    #[arg(long, conflicts_with_all = ["from", "to"])]
    date_range: Option<String>,

    #[arg(long)]
    waste_type: Option<WasteType>,

    #[arg(long)]
    min_points: Option<String>,

    #[arg(long)]
    max_points: Option<String>,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Show one page of transactions
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Edit a transaction shown on the selected page; points are recalculated
    Edit {
        id: String,
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        set_username: Option<String>,
        #[arg(long)]
        set_waste_type: Option<WasteType>,
        #[arg(long)]
        set_quantity: Option<String>,
    },
    /// Delete a transaction
    Delete {
        id: String,
        #[command(flatten)]
        page: PageArgs,
    },
}

impl Command {
    fn page_args(&self) -> &PageArgs {
        match self {
            Command::List { page } | Command::Edit { page, .. } | Command::Delete { page, .. } => {
                page
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let mut cfg = config::load(Some(&args.config))
        .with_context(|| format!("failed to load {}", args.config.display()))?;

    let page_args = args.command.page_args();
    if let Some(limit) = page_args.limit {
        if limit == 0 {
            bail!("--limit must be greater than zero");
        }
        cfg.panel.items_per_page = limit;
    }

    let api = ApiClient::from_config(&cfg).context("failed to build API client")?;
    let panel = TransactionPanel::new(
        api,
        TerminalPanelView::new(args.yes),
        ConsoleNotifier::new(&cfg.notify),
        &cfg.panel,
    );

    if let Some(username) = &page_args.username {
        panel.set_filter(FilterField::Username, username.as_str()).await;
    }
    if let (Some(from), Some(to)) = (page_args.from, page_args.to) {
        panel.set_date_range(from, to).await;
    }
    if let Some(range) = &page_args.date_range {
        panel.set_filter(FilterField::DateRange, range.as_str()).await;
    }
    if let Some(kind) = page_args.waste_type {
        panel.set_filter(FilterField::WasteType, kind.as_str()).await;
    }
    if let Some(min) = &page_args.min_points {
        panel.set_filter(FilterField::MinPoints, min.as_str()).await;
    }
    if let Some(max) = &page_args.max_points {
        panel.set_filter(FilterField::MaxPoints, max.as_str()).await;
    }

    if panel.initialize().await != FetchOutcome::Applied {
        bail!("could not load transactions");
    }
    if page_args.page > 1 && !panel.go_to_page(page_args.page).await {
        let total = panel.snapshot().await.pagination.total_pages();
        bail!("page {} is out of range (1..={})", page_args.page, total);
    }

    match &args.command {
        Command::List { .. } => Ok(()),
        Command::Edit {
            id,
            set_username,
            set_waste_type,
            set_quantity,
            page,
        } => {
            if !panel.begin_edit(id).await {
                bail!("transaction {} is not on page {}", id, page.page);
            }
            if let Some(username) = set_username {
                panel.set_edit_field(EditField::Username, username).await;
            }
            if let Some(kind) = set_waste_type {
                panel.set_edit_field(EditField::WasteType, kind.as_str()).await;
            }
            if let Some(quantity) = set_quantity {
                panel.set_edit_field(EditField::Quantity, quantity).await;
            }
            match panel.submit_edit().await {
                ActionOutcome::Done => Ok(()),
                other => bail!("edit of {} did not complete: {:?}", id, other),
            }
        }
        Command::Delete { id, .. } => match panel.delete_transaction(id).await {
            ActionOutcome::Done => Ok(()),
            ActionOutcome::Cancelled => {
                info!(%id, "nothing deleted");
                Ok(())
            }
            other => bail!("delete of {} did not complete: {:?}", id, other),
        },
    }
}
