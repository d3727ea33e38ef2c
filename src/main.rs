use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use insightdash::cli::{self, OutputFormat};
use insightdash::filter::{FilterField, FilterSet, FilterUpdate};

#[derive(Debug, Parser)]
#[command(name = "insightdash")]
#[command(about = "Filter and chart insight records")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the records once and serve the web dashboard
    Serve {
        /// Bind address (default from config: 127.0.0.1:9747)
        #[arg(long)]
        addr: Option<String>,
        /// Do not open the dashboard in a browser
        #[arg(long)]
        no_browser: bool,
    },
    /// Show the bar, doughnut and polar-area chart inputs
    Charts {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        input: InputArgs,
    },
    /// List the records that pass the filters
    Records {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        input: InputArgs,
    },
    /// List the selectable values for every filter
    Options {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Check the data source, config files and event log
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default config to ~/.insightdash/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `source.url http://localhost:9000/getdata`
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

/// Output format and data location shared by the data commands.
#[derive(Debug, Args)]
struct InputArgs {
    /// Output format: table (default), json, csv
    #[arg(long, default_value = "table")]
    format: String,
    /// Read records from a local JSON file instead of the data source
    #[arg(long)]
    file: Option<PathBuf>,
}

/// One flag per dashboard filter. Omitted flags mean "All".
#[derive(Debug, Args)]
struct FilterArgs {
    #[arg(long)]
    start_year: Option<String>,
    #[arg(long)]
    end_year: Option<String>,
    #[arg(long)]
    topic: Option<String>,
    #[arg(long)]
    sector: Option<String>,
    #[arg(long)]
    region: Option<String>,
    #[arg(long)]
    pestle: Option<String>,
    #[arg(long)]
    source: Option<String>,
    #[arg(long)]
    swot: Option<String>,
    #[arg(long)]
    country: Option<String>,
    #[arg(long)]
    city: Option<String>,
}

impl FilterArgs {
    fn into_filter_set(self) -> Result<FilterSet> {
        let pairs = [
            (FilterField::StartYear, self.start_year),
            (FilterField::EndYear, self.end_year),
            (FilterField::Topic, self.topic),
            (FilterField::Sector, self.sector),
            (FilterField::Region, self.region),
            (FilterField::Pestle, self.pestle),
            (FilterField::Source, self.source),
            (FilterField::Swot, self.swot),
            (FilterField::Country, self.country),
            (FilterField::City, self.city),
        ];

        let mut filters = FilterSet::default();
        for (field, value) in pairs {
            if let Some(value) = value {
                filters.update(FilterUpdate::Set(field, value))?;
            }
        }
        Ok(filters)
    }
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Serve { addr, no_browser } => cli::run_serve(addr, no_browser),
        Commands::Charts { filters, input } => {
            let fmt = OutputFormat::from_str_opt(Some(&input.format));
            cli::run_charts(&filters.into_filter_set()?, fmt, input.file.as_deref())
        }
        Commands::Records { filters, input } => {
            let fmt = OutputFormat::from_str_opt(Some(&input.format));
            cli::run_records(&filters.into_filter_set()?, fmt, input.file.as_deref())
        }
        Commands::Options { input } => {
            let fmt = OutputFormat::from_str_opt(Some(&input.format));
            cli::run_options(fmt, input.file.as_deref())
        }
        Commands::Health => cli::run_health(),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
