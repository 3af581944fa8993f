use std::fmt::Display;

use serde_json::Value;

pub const NOT_AVAILABLE: &str = "N/A";

/// The fields of a ledger that end up on a packing note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerDetails {
    pub name: String,
    pub gstin: String,
    pub address: String,
    pub state: String,
    pub mobile: String,
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// First element of `data[key]`, provided it is a non-empty array.
fn first_entry<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    data.get(key)?.as_array()?.first()
}

impl From<&Value> for LedgerDetails {
    fn from(data: &Value) -> Self {
        let name = data
            .get("metadata")
            .and_then(|m| m.get("name"))
            .and_then(text)
            .unwrap_or_default();
        let mobile = data
            .get("ledgermobile")
            .and_then(text)
            .unwrap_or_else(|| NOT_AVAILABLE.into());

        let mut address = String::new();
        let mut state = NOT_AVAILABLE.to_string();
        if let Some(mailing) = first_entry(data, "ledmailingdetails") {
            if let Some(lines) = mailing.get("address").and_then(Value::as_array) {
                address = lines
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
            }
            if let Some(s) = mailing.get("state").and_then(text) {
                state = s;
            }
        }

        let gstin = first_entry(data, "ledgstregdetails")
            .and_then(|gst| gst.get("gstin"))
            .and_then(text)
            .unwrap_or_else(|| NOT_AVAILABLE.into());

        Self {
            name,
            gstin,
            address,
            state,
            mobile,
        }
    }
}

impl LedgerDetails {
    /// Address split on commas, trimmed, blanks removed. One entry per printed line.
    pub fn address_lines(&self) -> Vec<&str> {
        self.address
            .split(',')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }

    pub fn has_mobile(&self) -> bool {
        !self.mobile.is_empty() && self.mobile != NOT_AVAILABLE
    }
}

impl Display for LedgerDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Name:    {}", self.name)?;
        writeln!(f, "Address: {}", self.address)?;
        writeln!(f, "State:   {}", self.state)?;
        writeln!(f, "GSTIN:   {}", self.gstin)?;
        write!(f, "Mobile:  {}", self.mobile)
    }
}
