use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use self::commands::{CreateArgs, PrintArgs};
use self::config::parse_config;
use self::errors::PacknoteError;
use self::master::MasterFile;

mod commands;
pub mod config;
pub mod errors;
mod interactive;
mod ledgers;
mod master;
mod packing_note;

/// Search a Tally ledger export and print A4 packing notes.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
    /// Tally JSON export, overrides `data_file` from the config
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List ledger names
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show the address details of one ledger
    Show { name: String },
    /// Write a packing note PDF
    Print(PrintArgs),
    /// Append a new ledger to the export
    Create(CreateArgs),
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<(), PacknoteError> {
    let args = Args::parse();
    init_logging(args.debug);
    let config = parse_config()?;
    let data_file = args.file.unwrap_or_else(|| config.data_file.clone());

    match args.command {
        None => interactive::run(&config, &data_file)?,
        Some(Command::List { search }) => {
            let master = MasterFile::load(&data_file)?;
            for name in commands::list(&master, search.as_deref()) {
                println!("{name}");
            }
        }
        Some(Command::Show { name }) => {
            let master = MasterFile::load(&data_file)?;
            let ledger = commands::lookup(&master.ledgers(), &name)?;
            println!("{}", ledger.details());
        }
        Some(Command::Print(print_args)) => {
            let master = MasterFile::load(&data_file)?;
            match commands::print_note(&master, &config, print_args)? {
                Some(path) => println!("PDF saved as: {}", path.display()),
                None => println!("Cancelled"),
            }
        }
        Some(Command::Create(create_args)) => {
            let mut master = commands::load_or_empty(&data_file)?;
            match commands::create(&mut master, create_args) {
                Ok(ledger) => println!(
                    "Saved {}. {} ledgers in {}",
                    ledger.name,
                    master.ledgers().len(),
                    master.path().display()
                ),
                Err(e) if e.is_cancel() => println!("Ledger not saved"),
                Err(e) => return Err(e),
            }
        }
    }

    Ok(())
}
