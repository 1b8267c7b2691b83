use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, CommandFactory, Parser, Subcommand};
use fxtry::cli::ViewOptions;
use fxtry::cli::convert::ConvertOptions;
use fxtry::core::log::init_logging;
use fxtry::core::{CurrencyCode, Preset, SortColumn};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct ViewArgs {
    /// First day of the range (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day of the range (YYYY-MM-DD), defaults to yesterday
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Quick range: 7D, 30D, 90D, 180D or 1Y
    #[arg(short, long, conflicts_with_all = ["from", "to"])]
    preset: Option<Preset>,

    /// Currencies to show, comma separated (at most 10)
    #[arg(long, value_delimiter = ',')]
    currencies: Vec<CurrencyCode>,

    /// Sort the table by `date` or a currency code
    #[arg(short, long)]
    sort: Option<SortColumn>,

    /// Sort in descending order
    #[arg(long, requires = "sort")]
    desc: bool,
}

impl ViewArgs {
    fn into_options(self, json: bool) -> ViewOptions {
        ViewOptions {
            start: self.from,
            end: self.to,
            preset: self.preset,
            currencies: self.currencies,
            sort: self.sort,
            descending: self.desc,
            json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display historical and live rates once
    Rates {
        #[command(flatten)]
        view: ViewArgs,

        /// Print rows as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Interactive dashboard with periodic live refresh
    Watch {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Convert an amount between two currencies
    Convert {
        amount: f64,

        /// Source currency, defaults to the first configured currency
        from: Option<CurrencyCode>,

        /// Target currency, defaults to the quote currency
        to: Option<CurrencyCode>,

        /// Swap source and target
        #[arg(long)]
        swap: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List available currencies
    Currencies,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let command = match cli.command {
        Some(Commands::Setup) => return report(fxtry::cli::setup::setup()),
        Some(Commands::Rates { view, json }) => fxtry::AppCommand::Rates(view.into_options(json)),
        Some(Commands::Watch { view }) => fxtry::AppCommand::Watch(view.into_options(false)),
        Some(Commands::Convert {
            amount,
            from,
            to,
            swap,
            json,
        }) => fxtry::AppCommand::Convert(ConvertOptions {
            amount,
            from,
            to,
            swap,
            json,
        }),
        Some(Commands::Currencies) => fxtry::AppCommand::Currencies,
        None => {
            Cli::command().print_help()?;
            return Ok(());
        }
    };

    report(fxtry::run_command(command, cli.config_path.as_deref()).await)
}

fn report(result: Result<()>) -> Result<()> {
    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
