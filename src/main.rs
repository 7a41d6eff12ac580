use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use stores_admin::cli::{self, StoreArgs};
use stores_admin::error::StoresResult;
use stores_admin::service::StoresService;
use stores_admin::store::YamlStore;
use stores_admin::StoreFilter;

#[derive(Parser)]
#[command(name = "stores")]
#[command(about = "Store management: records, locations, and colour-coded Excel import/export")]
#[command(long_about = "Stores - store management from the command line

Each store has a status. In exported spreadsheets every row is filled with
its status colour, and imports read the status back from the first cell's
fill (falling back to the status column).

COMMANDS:
  list          - List stores (with location/status/search filters)
  add           - Add a store
  update        - Change fields of a store
  delete        - Delete a store
  locations     - List known locations
  add-location  - Add a location
  statuses      - Show statuses and their colours
  export        - Stores to Excel (.xlsx)
  import        - Excel (.xlsx) to stores (always appends)

EXAMPLES:
  stores add --name \"Corner Market\" -l سردا -s اجتماع
  stores list -l سردا --search corner
  stores export -o stores.xlsx
  stores import stores.xlsx")]
#[command(version)]
struct Cli {
    /// Directory holding the document store files
    #[arg(long, global = true, default_value = "stores-data", env = "STORES_DATA_DIR")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug, Clone, Default)]
struct FilterArgs {
    /// Only stores at this location (exact match)
    #[arg(short, long)]
    location: Option<String>,

    /// Only stores with this status (exact match)
    #[arg(short, long)]
    status: Option<String>,

    /// Case-insensitive search in store, employee and manager names
    #[arg(long)]
    search: Option<String>,
}

impl From<FilterArgs> for StoreFilter {
    fn from(args: FilterArgs) -> Self {
        StoreFilter {
            location: args.location,
            status: args.status,
            search: args.search,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List stores
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Show every field
        #[arg(short, long)]
        verbose: bool,
    },

    /// Add a store (name, location and status are required)
    Add {
        #[command(flatten)]
        store: StoreArgs,
    },

    /// Update the given fields of a store
    Update {
        /// Store id
        id: String,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Delete a store
    Delete {
        /// Store id
        id: String,
    },

    /// List known locations
    Locations,

    /// Add a new location
    AddLocation {
        /// Location name (kept exactly as typed)
        name: String,
    },

    /// Show statuses and their export colours
    Statuses,

    #[command(long_about = "Export stores to Excel .xlsx format.

One worksheet, ten columns, one row per store. Every cell of a row is filled
with the store's status colour; unknown statuses are white.

The default file name is المحلات_<today>.xlsx in the current directory.")]
    /// Export stores to Excel .xlsx
    Export {
        /// Output Excel file path (.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,

        /// Show verbose export steps
        #[arg(short, long)]
        verbose: bool,
    },

    #[command(long_about = "Import stores from an Excel .xlsx file.

Reads the first worksheet and skips the header row. A row's status comes
from the fill colour of its first cell; if that colour is not a status
colour, the text of the status column is used as-is.

Rows without a store name are skipped. Every imported row becomes a new
store - existing stores are never updated.")]
    /// Import stores from Excel .xlsx
    Import {
        /// Path to Excel file (.xlsx)
        input: PathBuf,

        /// Show verbose import steps
        #[arg(short, long)]
        verbose: bool,
    },
}

async fn run(cli: Cli) -> StoresResult<()> {
    if let Commands::Statuses = cli.command {
        return cli::statuses();
    }

    let service = StoresService::new(Arc::new(YamlStore::open(&cli.data_dir)?));

    match cli.command {
        Commands::List { filter, verbose } => cli::list(&service, filter.into(), verbose).await,

        Commands::Add { store } => cli::add(&service, store).await,

        Commands::Update { id, store } => cli::update(&service, id, store).await,

        Commands::Delete { id } => cli::delete(&service, id).await,

        Commands::Locations => cli::locations(&service).await,

        Commands::AddLocation { name } => cli::add_location(&service, name).await,

        Commands::Statuses => cli::statuses(),

        Commands::Export {
            output,
            filter,
            verbose,
        } => cli::export(&service, output, filter.into(), verbose).await,

        Commands::Import { input, verbose } => cli::import(&service, input, verbose).await,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("{} {}", "❌ Error:".bold().red(), e);
        std::process::exit(1);
    }
}
