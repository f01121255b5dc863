use clap::{Parser, Subcommand, ValueEnum};
use giteki::pipeline::DEFAULT_EXTENSION;
use giteki::{ScriptRowSource, Store};
use std::path::Path;
use std::process;

mod download;

/// giteki — collect Japan's certified radio equipment listings into SQLite
#[derive(Parser)]
#[command(name = "giteki", version, about)]
struct Cli {
    /// Path to the SQLite database
    #[arg(long, global = true, default_value = "giteki.db")]
    db: String,

    /// Output format
    #[arg(long, global = true, default_value = "yaml")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Download the published listings into a directory
    Download {
        /// Destination directory of the downloaded files
        #[arg(long, default_value = "downloads")]
        dst: String,
        /// Download every listing, including past ones
        #[arg(long, short = 'A')]
        all: bool,
        /// Overwrite files that were already downloaded
        #[arg(long, short = 'U')]
        update: bool,
        /// Fetch script to run
        #[arg(long, env = "GITEKI_DOWNLOAD_SCRIPT", default_value = "scripts/download.py")]
        script: String,
        /// Interpreter used to run the script
        #[arg(long, default_value = "python")]
        interpreter: String,
    },

    /// Load downloaded listings into the database
    Load {
        /// Source directory of the listings to load
        #[arg(long, default_value = "downloads")]
        src: String,
        /// Reader script that turns one listing into JSON rows
        #[arg(long, env = "GITEKI_READ_SCRIPT", default_value = "scripts/read.py")]
        reader: String,
        /// Interpreter used to run the reader
        #[arg(long, default_value = "python")]
        interpreter: String,
        /// Extension of the listing files
        #[arg(long, default_value = DEFAULT_EXTENSION)]
        extension: String,
    },

    /// Print every stored record
    List,

    /// Show record counts per source file and reference code count
    Status,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("ERROR:{e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Download {
            dst,
            all,
            update,
            script,
            interpreter,
        } => {
            download::run(&interpreter, Path::new(&script), Path::new(&dst), all, update)?;
            print_output(&serde_json::json!({ "ok": true, "dst": dst }), &cli.format)?;
        }

        Command::Load {
            src,
            reader,
            interpreter,
            extension,
        } => {
            let source = ScriptRowSource::new(interpreter, reader);
            let summary =
                giteki::load(Path::new(&src), Path::new(&cli.db), &source, &extension)?;
            print_output(&serde_json::to_value(&summary)?, &cli.format)?;
        }

        Command::List => {
            let store = Store::open(Path::new(&cli.db))?;
            let records = store.list_all()?;
            print_output(&serde_json::to_value(&records)?, &cli.format)?;
            store.close()?;
        }

        Command::Status => {
            let store = Store::open(Path::new(&cli.db))?;
            let files: Vec<_> = store
                .provenance_counts()?
                .into_iter()
                .map(|(file, records)| serde_json::json!({ "file": file, "records": records }))
                .collect();
            let status = serde_json::json!({
                "db": cli.db,
                "records": store.count_records()?,
                "files": files,
                "radio_access_technologies": store.list_radio_access_technologies()?.len(),
            });
            print_output(&status, &cli.format)?;
            store.close()?;
        }
    }

    Ok(())
}

fn print_output(
    value: &serde_json::Value,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(value)?);
        }
    }
    Ok(())
}
