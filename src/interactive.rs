use std::fmt::Display;
use std::path::{Path, PathBuf};

use inquire::Select;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::commands::{self, CreateArgs, PrintArgs};
use crate::config::PacknoteConfig;
use crate::errors::PacknoteError;
use crate::master::MasterFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    Print,
    Create,
    Reload,
    Open,
    Quit,
}

impl Display for MenuAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MenuAction::Print => "Print packing note",
            MenuAction::Create => "Create new ledger",
            MenuAction::Reload => "Reload file",
            MenuAction::Open => "Load another JSON file",
            MenuAction::Quit => "Quit",
        };
        write!(f, "{label}")
    }
}

impl MenuAction {
    fn options() -> Vec<Self> {
        vec![
            MenuAction::Print,
            MenuAction::Create,
            MenuAction::Reload,
            MenuAction::Open,
            MenuAction::Quit,
        ]
    }
}

/// `*.json` files in `root` and its direct subdirectories, sorted by path.
pub fn json_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .max_depth(2)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .collect();
    files.sort();
    files
}

fn choose_json_file() -> Result<Option<PathBuf>, PacknoteError> {
    let cur_dir = std::env::current_dir()?;
    let files = json_files(&cur_dir);
    if files.is_empty() {
        println!("No JSON files found under {}", cur_dir.display());
        return Ok(None);
    }
    let options: Vec<String> = files.iter().map(|p| p.display().to_string()).collect();
    let choice = Select::new("Load JSON file:", options).prompt_skippable()?;
    Ok(choice.map(PathBuf::from))
}

fn open_master(default_path: &Path) -> Result<MasterFile, PacknoteError> {
    if default_path.exists() {
        return MasterFile::load(default_path);
    }
    println!("{} not found", default_path.display());
    match choose_json_file()? {
        Some(path) => MasterFile::load(path),
        None => Ok(MasterFile::empty(default_path)),
    }
}

/// Prompt errors and bad input end the current action, not the session.
fn report(result: Result<(), PacknoteError>) -> Result<(), PacknoteError> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.is_cancel() => {
            println!("Cancelled");
            Ok(())
        }
        Err(e @ (PacknoteError::InvalidArgument(_)
        | PacknoteError::Encoding { .. }
        | PacknoteError::Structure(_)
        | PacknoteError::File { .. })) => {
            warn!(error = %e, "action failed");
            println!("Error: {e}");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// The menu loop used when no subcommand is given.
pub fn run(config: &PacknoteConfig, data_file: &Path) -> Result<(), PacknoteError> {
    let mut master = open_master(data_file)?;
    println!(
        "{} ledgers loaded from {}",
        master.ledgers().len(),
        master.path().display()
    );

    loop {
        let action = Select::new("What would you like to do?", MenuAction::options())
            .prompt_skippable()?;
        debug!(?action, "menu");
        match action.unwrap_or(MenuAction::Quit) {
            MenuAction::Print => report(
                commands::print_note(&master, config, PrintArgs::default()).map(|written| {
                    match written {
                        Some(path) => println!("PDF saved as: {}", path.display()),
                        None => println!("Cancelled"),
                    }
                }),
            )?,
            MenuAction::Create => report(
                commands::create(&mut master, CreateArgs::default()).map(|ledger| {
                    println!(
                        "Saved {}. {} ledgers in {}",
                        ledger.name,
                        master.ledgers().len(),
                        master.path().display()
                    )
                }),
            )?,
            MenuAction::Reload => {
                let path = master.path().to_path_buf();
                report(MasterFile::load(&path).map(|reloaded| {
                    master = reloaded;
                    println!("{} ledgers loaded", master.ledgers().len());
                }))?;
            }
            MenuAction::Open => {
                if let Some(path) = choose_json_file()? {
                    report(MasterFile::load(path).map(|loaded| {
                        master = loaded;
                        println!(
                            "{} ledgers loaded from {}",
                            master.ledgers().len(),
                            master.path().display()
                        );
                    }))?;
                }
            }
            MenuAction::Quit => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use inquire::InquireError;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn finds_json_files_two_levels_deep() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("exports/old")).unwrap();
        std::fs::write(root.join("Master.json"), "{}").unwrap();
        std::fs::write(root.join("notes.txt"), "").unwrap();
        std::fs::write(root.join("exports/Daybook.JSON"), "{}").unwrap();
        std::fs::write(root.join("exports/old/Master.json"), "{}").unwrap();

        assert_eq!(
            json_files(root),
            vec![root.join("Master.json"), root.join("exports/Daybook.JSON")]
        );
    }

    #[test]
    fn recoverable_errors_keep_the_session() {
        assert!(report(Err(PacknoteError::Aborted)).is_ok());
        assert!(report(Err(PacknoteError::Prompt(InquireError::OperationCanceled))).is_ok());
        assert!(report(Err(PacknoteError::Prompt(InquireError::OperationInterrupted))).is_err());
        assert!(report(Err(PacknoteError::InvalidArgument("x".into()))).is_ok());
        assert!(report(Err(PacknoteError::Io(std::io::Error::other("disk")))).is_err());
    }
}
