use std::{fs, path::PathBuf, process::ExitCode, time::Duration};

use clap::{Parser, Subcommand};

use finboard::{
    Category, CategoryFilter, ClientConfig, Dashboard, Error, FilterUpdate, HttpBackend,
    PageDirection, SaveFailurePolicy, SortOrder, SpendingRange, init_logging, parse_amount,
    render_dashboard, resolve_category,
};

/// A command-line client for the finance dashboard backend.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The backend's root URL.
    #[arg(long, env = "FINBOARD_URL")]
    url: String,

    /// The value of the backend's `csrftoken` cookie.
    #[arg(long, env = "FINBOARD_CSRF_TOKEN")]
    csrf_token: String,

    /// The session cookie of a logged in user.
    #[arg(long, env = "FINBOARD_SESSION_ID")]
    session_id: Option<String>,

    /// Seconds to wait for each backend response.
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Transactions per page.
    #[arg(long, default_value_t = 60)]
    page_size: usize,

    /// List the newest transactions first.
    #[arg(long)]
    newest_first: bool,

    /// Drop edits the backend fails to save instead of keeping them.
    #[arg(long)]
    rollback_failed_saves: bool,

    /// Also write debug logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List a page of transactions.
    Transactions {
        /// Only show transactions containing this text.
        #[arg(long, default_value = "")]
        search: String,

        /// Earliest date to show, YYYY-MM-DD.
        #[arg(long, default_value = "")]
        start: String,

        /// Latest date to show, YYYY-MM-DD.
        #[arg(long, default_value = "")]
        end: String,

        /// Only show transactions of at least this absolute amount.
        #[arg(long, value_parser = parse_amount)]
        min_amount: Option<f64>,

        /// Only show this category code.
        #[arg(long)]
        category: Option<i64>,

        /// The page to show, starting at 1.
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// List accounts by group with net worth.
    Accounts,
    /// Summarize spending over recent days.
    Spending {
        /// How many days back to start.
        #[arg(long, default_value_t = 30)]
        days: u32,
    },
    /// Write the dashboard as an HTML page.
    Render {
        /// Where to write the page.
        #[arg(long, default_value = "dashboard.html")]
        output: PathBuf,

        /// Include spending charts for this many days back.
        #[arg(long)]
        spending_days: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(args.log_file.as_deref());

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn build_config(args: &Args) -> Result<ClientConfig, Error> {
    let mut config = ClientConfig::new(&args.url, args.csrf_token.clone())?
        .timeout(Duration::from_secs(args.timeout))
        .page_size(args.page_size)?;

    if let Some(session_id) = &args.session_id {
        config = config.session_id(session_id.clone());
    }
    if args.newest_first {
        config = config.sort_order(SortOrder::Descending);
    }
    if args.rollback_failed_saves {
        config = config.save_failure_policy(SaveFailurePolicy::Rollback);
    }

    Ok(config)
}

async fn run(args: Args) -> Result<(), Error> {
    let config = build_config(&args)?;
    let backend = HttpBackend::new(config.clone())?;
    let mut dashboard = Dashboard::new(backend, &config);

    match args.command {
        Command::Transactions {
            search,
            start,
            end,
            min_amount,
            category,
            page,
        } => {
            let category = match category {
                Some(code) => CategoryFilter::Only(Category::from(code)),
                None => CategoryFilter::Any,
            };
            let mut update = FilterUpdate::default()
                .search(&search)
                .date_range(&start, &end)
                .category(category);
            if let Some(min_amount) = min_amount {
                update = update.min_amount(min_amount);
            }

            let mut transactions = dashboard.set_filter(update).await;
            for _ in 1..page {
                transactions = dashboard.change_page(PageDirection::Next).await;
            }

            for transaction in &transactions {
                let category =
                    resolve_category(transaction.primary_category(), dashboard.custom_categories());
                println!(
                    "{}  {:>12.2}  {:<24}  {}",
                    transaction.date,
                    transaction.amount,
                    category.label(),
                    transaction.description
                );
            }
        }
        Command::Accounts => {
            dashboard.post_dash_load().await?;

            for summary in dashboard.accounts().groups() {
                println!("{}  {:.2}", summary.group.name(), summary.total);
                for account in &summary.accounts {
                    println!(
                        "    {:<32}  {:>12.2}",
                        account.display_name(),
                        summary.group.signed_value(account)
                    );
                }
            }
            println!("Net worth  {:.2}", dashboard.accounts().net_worth());
        }
        Command::Spending { days } => {
            let data = dashboard
                .load_spending_data(SpendingRange { start: days, end: 0 })
                .await?;

            println!("Income    {:.2}", data.income_total);
            println!("Expenses  {:.2}", data.expenses_total);
            println!("Total spending  {:.2}", data.highlights.total);
            for purchase in &data.highlights.large_purchases {
                println!("    {:<32}  {:>12.2}", purchase.description, purchase.amount);
            }
        }
        Command::Render {
            output,
            spending_days,
        } => {
            dashboard.post_dash_load().await?;
            dashboard.refresh().await;
            if let Some(days) = spending_days {
                dashboard
                    .load_spending_data(SpendingRange { start: days, end: 0 })
                    .await?;
            }

            let page = render_dashboard(&dashboard);
            if let Err(error) = fs::write(&output, page.into_string()) {
                tracing::error!("Could not write {}: {error}", output.display());
                return Err(Error::InvalidConfig(format!(
                    "output path {} is not writable",
                    output.display()
                )));
            }
            tracing::info!("Wrote dashboard to {}", output.display());
        }
    }

    for alert in dashboard.take_alerts() {
        tracing::warn!("{}: {}", alert.message, alert.details);
    }

    Ok(())
}
