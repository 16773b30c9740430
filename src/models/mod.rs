// ── Transaction ───────────────────────────────────────────────────────────────

/// One transaction as displayed on the activity page. Every value is the
/// page's display text, copied verbatim; missing values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    pub date: String,
    pub description: String,
    pub amount: String,
    pub from: String,
    pub to: String,
    pub status: String,
    /// Shown as `type`.
    pub kind: String,
    pub message: String,
}

impl Transaction {
    /// Rows with no description, amount or date are rendering leftovers.
    pub fn is_artifact(&self) -> bool {
        self.description.is_empty() && self.amount.is_empty() && self.date.is_empty()
    }
}

impl From<Transaction> for Record {
    fn from(tx: Transaction) -> Self {
        let mut record = Record::new();
        record.insert("date", tx.date);
        record.insert("description", tx.description);
        record.insert("amount", tx.amount);
        record.insert("from", tx.from);
        record.insert("to", tx.to);
        record.insert("status", tx.status);
        record.insert("type", tx.kind);
        record.insert("message", tx.message);
        record
    }
}

// ── Record ────────────────────────────────────────────────────────────────────

/// A flat, insertion-ordered mapping of field name to text value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, keeping its original position if it already exists.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

// ── Page structure ────────────────────────────────────────────────────────────

/// An accordion toggle for a single transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    /// Position among all controls, in document order.
    pub index: usize,
    pub expanded: bool,
    /// Id of the detail region this control toggles (`aria-controls`).
    pub region_id: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPair {
    pub label: String,
    pub value: String,
}

/// The detail panel revealed by expanding a control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    pub id: String,
    /// Label/value pairs in document order, both trimmed.
    pub pairs: Vec<FieldPair>,
    /// Text of the first link in the panel, empty when there is none.
    pub link_text: String,
}

impl Region {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_pair(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push(FieldPair {
            label: label.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_link(mut self, text: impl Into<String>) -> Self {
        self.link_text = text.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_record_key_order() {
        let record: Record = Transaction::default().into();
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(
            keys,
            ["date", "description", "amount", "from", "to", "status", "type", "message"]
        );
        assert!(record.keys().all(|k| record.get(k) == Some("")));
    }

    #[test]
    fn test_record_insert_keeps_position() {
        let mut record: Record = [("a", "1"), ("b", "2")].into_iter().collect();
        record.insert("a", "3");
        assert_eq!(record.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(record.get("a"), Some("3"));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_is_artifact() {
        assert!(Transaction::default().is_artifact());

        let tx = Transaction {
            status: "Completed".into(),
            ..Default::default()
        };
        assert!(tx.is_artifact());

        let tx = Transaction {
            amount: "-$5.00".into(),
            ..Default::default()
        };
        assert!(!tx.is_artifact());
    }
}
