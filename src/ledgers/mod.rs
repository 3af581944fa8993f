use std::fmt::Display;

use serde_json::Value;

pub mod details;
pub mod new_ledger;

pub use details::LedgerDetails;
pub use new_ledger::NewLedger;

/// A ledger item taken from the `tallymessage` array, kept in its raw form.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    pub name: String,
    pub data: Value,
}

impl Display for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Ledger {
    /// Returns `None` unless `item.metadata.type` is `"Ledger"`.
    pub fn from_item(item: &Value) -> Option<Self> {
        let metadata = item.get("metadata")?;
        if metadata.get("type").and_then(Value::as_str) != Some("Ledger") {
            return None;
        }
        let name = metadata
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string();
        Some(Self {
            name,
            data: item.clone(),
        })
    }

    pub fn details(&self) -> LedgerDetails {
        LedgerDetails::from(&self.data)
    }

    pub fn matches(&self, term: &str) -> bool {
        name_matches(&self.name, term)
    }
}

/// Case-insensitive substring match, the rule used by every ledger search.
pub fn name_matches(name: &str, term: &str) -> bool {
    name.to_lowercase().contains(&term.to_lowercase())
}

pub fn filter_ledgers<'a>(ledgers: &'a [Ledger], term: &str) -> Vec<&'a Ledger> {
    ledgers.iter().filter(|ledger| ledger.matches(term)).collect()
}

/// Exact name first, then a case-insensitive match if it is unambiguous.
pub fn find_ledger<'a>(ledgers: &'a [Ledger], name: &str) -> Option<&'a Ledger> {
    if let Some(ledger) = ledgers.iter().find(|ledger| ledger.name == name) {
        return Some(ledger);
    }
    let mut candidates = ledgers
        .iter()
        .filter(|ledger| ledger.name.to_lowercase() == name.to_lowercase());
    match (candidates.next(), candidates.next()) {
        (Some(ledger), None) => Some(ledger),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn ledger(name: &str) -> Ledger {
        Ledger::from_item(&json!({"metadata": {"type": "Ledger", "name": name}})).unwrap()
    }

    fn names<'a>(ledgers: &[&'a Ledger]) -> Vec<&'a str> {
        ledgers.iter().map(|l| l.name.as_str()).collect()
    }

    #[test]
    fn from_item_requires_ledger_type() {
        assert!(Ledger::from_item(&json!({"metadata": {"type": "Group", "name": "x"}})).is_none());
        assert!(Ledger::from_item(&json!({"name": "no metadata"})).is_none());
        assert!(Ledger::from_item(&json!("string item")).is_none());
    }

    #[test]
    fn from_item_defaults_name() {
        let ledger = Ledger::from_item(&json!({"metadata": {"type": "Ledger"}})).unwrap();
        assert_eq!(ledger.name, "Unknown");
    }

    #[test]
    fn filter_is_case_insensitive_and_keeps_order() {
        let ledgers = vec![
            ledger("Anand Silks"),
            ledger("Bharat Textiles"),
            ledger("SILK HOUSE"),
        ];
        assert_eq!(
            names(&filter_ledgers(&ledgers, "silk")),
            vec!["Anand Silks", "SILK HOUSE"]
        );
        assert_eq!(filter_ledgers(&ledgers, "").len(), 3);
        assert!(filter_ledgers(&ledgers, "cotton").is_empty());
    }

    #[test]
    fn find_prefers_exact_then_unique_caseless() {
        let ledgers = vec![ledger("Ravi"), ledger("RAVI"), ledger("Meena")];
        assert_eq!(find_ledger(&ledgers, "RAVI").unwrap().name, "RAVI");
        assert_eq!(find_ledger(&ledgers, "meena").unwrap().name, "Meena");
        assert!(find_ledger(&ledgers, "ravi").is_none());
        assert!(find_ledger(&ledgers, "Suresh").is_none());
    }
}
