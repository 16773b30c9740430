pub mod html;

use crate::models::{Control, Region};
use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

pub use self::html::HtmlPage;

// ── Page trait ────────────────────────────────────────────────────────────────

/// The slice of the host page the exporter needs: enumerate the transaction
/// toggles, read a detail region, and click a toggle.
///
/// Implementations only report what is rendered. A missing region or label
/// is `None`/empty, never an error; errors are reserved for failures to
/// talk to the page at all.
#[async_trait]
pub trait TransactionPage: Send + Sync {
    /// All transaction controls, in document order.
    async fn controls(&self) -> Result<Vec<Control>>;

    /// The detail region whose element id is `id`.
    async fn region(&self, id: &str) -> Result<Option<Region>>;

    /// Simulate a click on `control`.
    async fn activate(&self, control: &Control) -> Result<()>;

    /// Changes whenever the rendered state changes.
    async fn fingerprint(&self) -> Result<u64>;
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("invalid {name} selector `{selector}`: {reason}")]
    Selector {
        name: &'static str,
        selector: String,
        reason: String,
    },

    #[error("no control at index {0}")]
    UnknownControl(usize),

    #[error("activation state lock poisoned")]
    Poisoned,
}

// ── Test fixtures ─────────────────────────────────────────────────────────────

#[cfg(test)]
pub mod fixtures {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    /// In-memory page. Fingerprints are served from a script; the last value
    /// repeats once the script runs out.
    #[derive(Default)]
    pub struct FakePage {
        pub controls: Vec<Control>,
        pub regions: HashMap<String, Region>,
        pub activated: Mutex<Vec<usize>>,
        pub fingerprints: Mutex<VecDeque<u64>>,
    }

    impl FakePage {
        pub fn new() -> Self {
            Self::default()
        }

        /// Adds an expanded control with its region.
        pub fn with_transaction(mut self, description: &str, region: Region) -> Self {
            let index = self.controls.len();
            self.controls.push(Control {
                index,
                expanded: true,
                region_id: Some(region.id.clone()),
                description: description.to_string(),
            });
            self.regions.insert(region.id.clone(), region);
            self
        }

        pub fn with_control(mut self, expanded: bool, region_id: Option<&str>, description: &str) -> Self {
            let index = self.controls.len();
            self.controls.push(Control {
                index,
                expanded,
                region_id: region_id.map(String::from),
                description: description.to_string(),
            });
            self
        }

        pub fn with_fingerprints(self, values: &[u64]) -> Self {
            *self.fingerprints.lock().unwrap() = values.iter().copied().collect();
            self
        }

        pub fn activated(&self) -> Vec<usize> {
            self.activated.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TransactionPage for FakePage {
        async fn controls(&self) -> Result<Vec<Control>> {
            let activated = self.activated.lock().unwrap();
            Ok(self
                .controls
                .iter()
                .map(|c| Control {
                    expanded: c.expanded || activated.contains(&c.index),
                    ..c.clone()
                })
                .collect())
        }

        async fn region(&self, id: &str) -> Result<Option<Region>> {
            Ok(self.regions.get(id).cloned())
        }

        async fn activate(&self, control: &Control) -> Result<()> {
            self.activated.lock().unwrap().push(control.index);
            Ok(())
        }

        async fn fingerprint(&self) -> Result<u64> {
            let mut script = self.fingerprints.lock().unwrap();
            let value = script.front().copied().unwrap_or(0);
            if script.len() > 1 {
                script.pop_front();
            }
            Ok(value)
        }
    }
}
