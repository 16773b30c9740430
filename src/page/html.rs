//! Saved-HTML implementation of [`TransactionPage`].
//!
//! The document is parsed once and reduced to owned controls and regions.
//! Clicks cannot re-run the host page's scripts, so activation is kept as an
//! overlay: an activated control reports itself expanded and its region is
//! read from whatever the snapshot already contains.

use super::{PageError, TransactionPage};
use crate::config::PageConfig;
use crate::models::{Control, FieldPair, Region};
use anyhow::{Context, Result};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

pub struct HtmlPage {
    controls: Vec<Control>,
    regions: HashMap<String, Region>,
    activated: Mutex<BTreeSet<usize>>,
}

struct Selectors {
    control: Selector,
    description: Selector,
    pair_container: Selector,
    pair_text: Selector,
    message: Selector,
    any_id: Selector,
}

impl Selectors {
    fn new(cfg: &PageConfig) -> Result<Self, PageError> {
        Ok(Self {
            control: parse_selector("control", &cfg.control_selector)?,
            description: parse_selector("description", &cfg.description_selector)?,
            pair_container: parse_selector("pair container", &cfg.pair_container_selector)?,
            pair_text: parse_selector("pair text", &cfg.pair_text_selector)?,
            message: parse_selector("message", &cfg.message_selector)?,
            any_id: parse_selector("id", "[id]")?,
        })
    }
}

fn parse_selector(name: &'static str, selector: &str) -> Result<Selector, PageError> {
    Selector::parse(selector).map_err(|e| PageError::Selector {
        name,
        selector: selector.to_string(),
        reason: format!("{:?}", e),
    })
}

/// `textContent`, trimmed.
fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Every container holding at least two text elements yields one pair:
/// the first is the label, the second the value.
fn field_pairs(root: ElementRef<'_>, container: &Selector, text: &Selector) -> Vec<FieldPair> {
    root.select(container)
        .filter_map(|div| {
            let mut texts = div.select(text);
            let label = texts.next()?;
            let value = texts.next()?;
            Some(FieldPair {
                label: text_of(label),
                value: text_of(value),
            })
        })
        .collect()
}

impl HtmlPage {
    pub fn parse(html: &str, cfg: &PageConfig) -> Result<Self, PageError> {
        let sel = Selectors::new(cfg)?;
        let doc = Html::parse_document(html);

        let controls: Vec<Control> = doc
            .select(&sel.control)
            .enumerate()
            .map(|(index, el)| Control {
                index,
                expanded: el.value().attr("aria-expanded") == Some("true"),
                region_id: el
                    .value()
                    .attr("aria-controls")
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(String::from),
                description: el.select(&sel.description).next().map(text_of).unwrap_or_default(),
            })
            .collect();

        let wanted: HashSet<&str> = controls.iter().filter_map(|c| c.region_id.as_deref()).collect();

        let mut regions = HashMap::new();
        for el in doc.select(&sel.any_id) {
            let Some(id) = el.value().id() else { continue };
            // First element with a given id wins, like getElementById.
            if !wanted.contains(id) || regions.contains_key(id) {
                continue;
            }
            regions.insert(
                id.to_string(),
                Region {
                    id: id.to_string(),
                    pairs: field_pairs(el, &sel.pair_container, &sel.pair_text),
                    link_text: el.select(&sel.message).next().map(text_of).unwrap_or_default(),
                },
            );
        }

        debug!(
            "Parsed page: {} controls ({} expanded), {} regions",
            controls.len(),
            controls.iter().filter(|c| c.expanded).count(),
            regions.len()
        );

        Ok(Self {
            controls,
            regions,
            activated: Mutex::new(BTreeSet::new()),
        })
    }

    pub fn open(path: &Path, cfg: &PageConfig) -> Result<Self> {
        let html = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read page snapshot {:?}", path))?;
        Ok(Self::parse(&html, cfg)?)
    }
}

#[async_trait]
impl TransactionPage for HtmlPage {
    async fn controls(&self) -> Result<Vec<Control>> {
        let activated = self.activated.lock().map_err(|_| PageError::Poisoned)?;
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
        if control.index >= self.controls.len() {
            return Err(PageError::UnknownControl(control.index).into());
        }
        self.activated
            .lock()
            .map_err(|_| PageError::Poisoned)?
            .insert(control.index);
        Ok(())
    }

    async fn fingerprint(&self) -> Result<u64> {
        let activated = self.activated.lock().map_err(|_| PageError::Poisoned)?;
        let mut hasher = DefaultHasher::new();
        self.controls.len().hash(&mut hasher);
        self.regions.len().hash(&mut hasher);
        activated.hash(&mut hasher);
        Ok(hasher.finish())
    }
}
