use std::error::Error;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info};

use holidays::config::Settings;
use holidays::export::{create_csv_file, create_json_file};
use holidays::{DirectorySource, EmbeddedSource, HolidayStore, SpecificationSource};

#[derive(Parser, Debug)]
#[command(name = "holidays", version, about = "Public and common holidays per country and year")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory with one <ID>.json file per country (default: built-in data)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the available countries
    List,
    /// Create JSON and/or CSV files
    Export {
        /// The year you want the date files for (eg. 2020, 2025)
        #[arg(short, long)]
        year: i32,
        /// Specify country (eg. FI, SE). Default: all countries are created
        #[arg(short, long)]
        country: Option<String>,
        /// Create JSON files
        #[arg(long)]
        json: bool,
        /// Create CSV files
        #[arg(long)]
        csv: bool,
    },
    /// Serve holidays over HTTP
    Serve {
        /// Address to listen on
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
}

fn init_logger() {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    pretty_env_logger::formatted_builder().parse_filters(&filters).init();
}

fn print_countries(countries: &[String]) {
    for country in countries {
        println!("{}", country);
    }
}

fn export(
    source: &dyn SpecificationSource,
    settings: &Settings,
    year: i32,
    country: Option<String>,
    json: bool,
    csv: bool,
) -> Result<ExitCode, Box<dyn Error>> {
    if year == 0 {
        eprintln!("No valid year specified.");
        return Ok(ExitCode::FAILURE);
    }

    let available = source.list_available_countries()?;
    if !json && !csv {
        println!("No creatable country files specified (see --help), these are available:");
        print_countries(&available);
        return Ok(ExitCode::SUCCESS);
    }

    let countries = match country {
        Some(country) => {
            let country = holidays::source::normalize_country(&country);
            if !available.contains(&country) {
                eprintln!(
                    "Specified country {} does not exist in available country files. These are available:",
                    country
                );
                print_countries(&available);
                return Ok(ExitCode::FAILURE);
            }
            vec![country]
        }
        None => available,
    };

    if json {
        fs::create_dir_all(&settings.json_folder)?;
    }
    if csv {
        fs::create_dir_all(&settings.csv_folder)?;
    }

    let mut failed = false;
    for country in &countries {
        info!("Creating specified file(s) for country {}.", country);
        let set = match source.load(country) {
            Ok(set) => set,
            Err(err) => {
                error!("{}", err);
                failed = true;
                continue;
            }
        };
        let mut results = Vec::new();
        if json {
            results.push(create_json_file(&settings.json_folder, &set, year));
        }
        if csv {
            results.push(create_csv_file(&settings.csv_folder, &set, year));
        }
        for err in results.into_iter().filter_map(Result::err) {
            error!("{}: {}", country, error_chain(&err));
            failed = true;
        }
    }
    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if cli.data_dir.is_some() {
        settings.data_dir = cli.data_dir;
    }
    let source: Box<dyn SpecificationSource> = match &settings.data_dir {
        Some(dir) => Box::new(DirectorySource::new(dir)),
        None => Box::new(EmbeddedSource::builtin()),
    };

    match cli.command {
        Command::List => {
            print_countries(&source.list_available_countries()?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Export {
            year,
            country,
            json,
            csv,
        } => export(source.as_ref(), &settings, year, country, json, csv),
        Command::Serve { bind } => {
            let addr = bind.unwrap_or(settings.bind);
            let store = HolidayStore::load_all(source.as_ref())?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(holidays::web::serve(store, addr))?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    init_logger();
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            error!("{}", error_chain(err.as_ref()));
            ExitCode::FAILURE
        }
    }
}
