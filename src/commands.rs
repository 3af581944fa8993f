use std::path::{Path, PathBuf};

use clap::Args;
use inquire::{Select, Text};
use tracing::{debug, warn};

use crate::config::PacknoteConfig;
use crate::errors::PacknoteError;
use crate::ledgers::{filter_ledgers, find_ledger, name_matches, Ledger, NewLedger};
use crate::master::MasterFile;
use crate::packing_note::PackingNote;

#[derive(Args, Debug, Default, Clone)]
pub struct PrintArgs {
    /// Ledger name; prompts with a searchable list when omitted
    #[arg(short, long)]
    pub ledger: Option<String>,
    /// Initial search term for the ledger list
    #[arg(short, long)]
    pub search: Option<String>,
    /// Packing note number; prompted for when omitted
    #[arg(short, long)]
    pub note: Option<String>,
    /// Directory the PDF is written to
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Do not open the PDF in the default viewer after writing it
    #[arg(long)]
    pub no_open: bool,
}

#[derive(Args, Debug, Default, Clone)]
pub struct CreateArgs {
    /// Party name; all fields are prompted for when omitted
    #[arg(short, long)]
    pub name: Option<String>,
    /// Address, comma separated lines
    #[arg(short, long, default_value = "")]
    pub address: String,
    #[arg(short, long, default_value = "")]
    pub state: String,
    #[arg(short, long, default_value = "")]
    pub gstin: String,
    #[arg(short, long, default_value = "")]
    pub mobile: String,
}

/// Loads the export, or starts an empty one when there is no file yet.
pub fn load_or_empty(path: &Path) -> Result<MasterFile, PacknoteError> {
    if path.exists() {
        MasterFile::load(path)
    } else {
        debug!(path = %path.display(), "no master file yet, starting empty");
        Ok(MasterFile::empty(path))
    }
}

pub fn list(master: &MasterFile, search: Option<&str>) -> Vec<String> {
    let ledgers = master.ledgers();
    let matching = filter_ledgers(&ledgers, search.unwrap_or_default());
    debug!(total = ledgers.len(), matching = matching.len(), "filtered ledgers");
    matching.into_iter().map(|ledger| ledger.name.clone()).collect()
}

pub fn lookup(ledgers: &[Ledger], name: &str) -> Result<Ledger, PacknoteError> {
    find_ledger(ledgers, name)
        .cloned()
        .ok_or_else(|| PacknoteError::InvalidArgument(format!("No ledger named \"{name}\"")))
}

fn select_ledger(ledgers: Vec<Ledger>, search: &str) -> Result<Option<Ledger>, PacknoteError> {
    if filter_ledgers(&ledgers, search).is_empty() {
        return Err(PacknoteError::InvalidArgument(format!(
            "No ledger matches \"{search}\""
        )));
    }
    let selected = Select::new("Ledger:", ledgers)
        .with_starting_filter_input(search)
        .with_scorer(&|input, _ledger, name, index| {
            name_matches(name, input).then_some(-(index as i64))
        })
        .with_page_size(15)
        .with_help_message("Type to search, Enter to print, Esc to cancel")
        .prompt_skippable()?;
    Ok(selected)
}

/// Writes a packing note. `Ok(None)` means the user cancelled a prompt.
pub fn print_note(
    master: &MasterFile,
    config: &PacknoteConfig,
    args: PrintArgs,
) -> Result<Option<PathBuf>, PacknoteError> {
    let ledgers = master.ledgers();
    let ledger = match &args.ledger {
        Some(name) => lookup(&ledgers, name)?,
        None => match select_ledger(ledgers, args.search.as_deref().unwrap_or_default())? {
            Some(ledger) => ledger,
            None => return Ok(None),
        },
    };

    let number = match args.note {
        Some(number) => number,
        None => match Text::new("Enter Packing Note Number:").prompt_skippable()? {
            Some(number) => number,
            None => return Ok(None),
        },
    };

    let details = ledger.details();
    let output_dir = args.output.as_deref().unwrap_or(&config.output_dir);
    let note = PackingNote::new(Some(number), &details, &config.sender);
    let path = note.save_in(output_dir)?;
    if !args.no_open {
        open_in_viewer(&path);
    }
    Ok(Some(path))
}

/// A viewer that fails to start does not undo a written note.
fn open_in_viewer(path: &Path) {
    match open::that(path) {
        Ok(()) => debug!(path = %path.display(), "opened in viewer"),
        Err(e) => warn!(path = %path.display(), error = %e, "could not open PDF"),
    }
}

impl CreateArgs {
    /// `None` when no name was given, i.e. the ledger has to be prompted for.
    fn into_new_ledger(self) -> Option<NewLedger> {
        Some(NewLedger {
            name: self.name?,
            address: self.address,
            state: self.state,
            gstin: self.gstin,
            mobile: self.mobile,
        })
    }
}

/// Appends a ledger, prompting for it unless a name was given.
pub fn create(master: &mut MasterFile, args: CreateArgs) -> Result<Ledger, PacknoteError> {
    let new_ledger = match args.into_new_ledger() {
        Some(new_ledger) => new_ledger,
        None => NewLedger::prompt()?,
    };
    master.append_ledger(&new_ledger)
}
