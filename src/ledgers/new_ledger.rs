use std::fmt::Display;

use inquire::{required, Confirm, Text};
use serde::Serialize;
use serde_json::Value;

use crate::errors::PacknoteError;

/// A ledger typed in by the user, before it is turned into a Tally record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewLedger {
    pub name: String,
    /// Comma separated, one printed line per piece.
    pub address: String,
    pub state: String,
    pub gstin: String,
    pub mobile: String,
}

#[derive(Serialize)]
struct Metadata<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'a str,
}

#[derive(Serialize)]
struct MailingDetails<'a> {
    address: Vec<&'a str>,
    state: &'a str,
}

#[derive(Serialize)]
struct GstRegistration<'a> {
    gstin: &'a str,
}

#[derive(Serialize)]
struct TallyLedger<'a> {
    metadata: Metadata<'a>,
    ledgermobile: &'a str,
    ledmailingdetails: [MailingDetails<'a>; 1],
    ledgstregdetails: [GstRegistration<'a>; 1],
}

impl Display for NewLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] State: {} GSTIN: {} Mobile: {}",
            self.name, self.address, self.state, self.gstin, self.mobile
        )
    }
}

impl NewLedger {
    pub fn validate(&self) -> Result<(), PacknoteError> {
        if self.name.trim().is_empty() {
            return Err(PacknoteError::InvalidArgument("Name is required".into()));
        }
        Ok(())
    }

    /// The record in the shape Tally exports ledgers, ready to push onto `tallymessage`.
    pub fn to_tally_value(&self) -> Result<Value, PacknoteError> {
        self.validate()?;
        let record = TallyLedger {
            metadata: Metadata {
                kind: "Ledger",
                name: &self.name,
            },
            ledgermobile: &self.mobile,
            ledmailingdetails: [MailingDetails {
                address: self.address.split(',').collect(),
                state: &self.state,
            }],
            ledgstregdetails: [GstRegistration { gstin: &self.gstin }],
        };
        Ok(serde_json::to_value(record)?)
    }

    pub fn prompt() -> Result<Self, PacknoteError> {
        let ask = |prompt: Text| prompt.prompt().map_err(PacknoteError::from_prompt);
        let name = ask(Text::new("Party Name:").with_validator(required!("Name is required")))?;
        let address = ask(Text::new("Address:").with_help_message("Separate lines with a comma"))?;
        let state = ask(Text::new("State:"))?;
        let gstin = ask(Text::new("GSTIN:"))?;
        let mobile = ask(Text::new("Mobile:"))?;

        let new_instance = Self {
            name,
            address,
            state,
            gstin,
            mobile,
        };
        println!("{}", new_instance);

        let save = Confirm::new("Save this ledger?")
            .prompt()
            .map_err(PacknoteError::from_prompt)?;
        if save {
            Ok(new_instance)
        } else {
            Err(PacknoteError::Aborted)
        }
    }
}
