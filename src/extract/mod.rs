pub mod fields;

use crate::models::Transaction;
use crate::page::TransactionPage;
use anyhow::{Context, Result};
use tracing::{debug, info};

use self::fields::{extract_field, extract_first};

/// Labels tried, in order, for the counterparty account.
const FROM_LABELS: &[&str] = &["From", "Account"];

/// Click every collapsed transaction so its details get rendered.
/// Returns the number of clicks issued; success is not checked.
pub async fn expand_all(page: &dyn TransactionPage) -> Result<usize> {
    let collapsed: Vec<_> = page
        .controls()
        .await
        .context("Failed to list transaction controls")?
        .into_iter()
        .filter(|c| !c.expanded)
        .collect();

    for control in &collapsed {
        page.activate(control)
            .await
            .with_context(|| format!("Failed to expand control {}", control.index))?;
    }

    debug!("Expanded {} collapsed controls", collapsed.len());
    Ok(collapsed.len())
}

/// One transaction per expanded control, in document order.
///
/// Controls without a resolvable detail region are skipped, as are rows
/// with no description, amount or date.
pub async fn collect_transactions(page: &dyn TransactionPage) -> Result<Vec<Transaction>> {
    let controls = page
        .controls()
        .await
        .context("Failed to list transaction controls")?;

    let mut transactions = Vec::new();
    let mut skipped = 0usize;

    for control in controls.iter().filter(|c| c.expanded) {
        let Some(region_id) = control.region_id.as_deref() else {
            skipped += 1;
            continue;
        };
        let Some(region) = page
            .region(region_id)
            .await
            .with_context(|| format!("Failed to read region {}", region_id))?
        else {
            debug!("Control {}: region {} not rendered", control.index, region_id);
            skipped += 1;
            continue;
        };
        let region = Some(&region);

        let tx = Transaction {
            date: extract_field(region, "Date"),
            description: control.description.trim().to_string(),
            amount: extract_field(region, "Amount"),
            from: extract_first(region, FROM_LABELS),
            to: extract_field(region, "To"),
            status: extract_field(region, "Status"),
            kind: extract_field(region, "Type"),
            message: region.map(|r| r.link_text.trim().to_string()).unwrap_or_default(),
        };

        if tx.is_artifact() {
            skipped += 1;
            continue;
        }
        transactions.push(tx);
    }

    info!("Collected {} transactions ({} skipped)", transactions.len(), skipped);
    Ok(transactions)
}
