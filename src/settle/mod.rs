//! Waiting for the page to finish rendering expanded panels.
//!
//! The host page gives no completion signal. `fixed` sleeps for a set time;
//! `stable` polls the page fingerprint until it stops changing, bounded by a
//! timeout. Either way, collection proceeds afterwards with whatever is on
//! the page.

use crate::config::{SettleConfig, SettleStrategy};
use crate::page::TransactionPage;
use anyhow::Result;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// The fixed delay elapsed.
    Delay,
    /// The fingerprint held for the required number of polls.
    Stable { polls: u32 },
    /// The timeout hit while the page was still changing.
    TimedOut,
}

pub async fn wait_for_render(page: &dyn TransactionPage, cfg: &SettleConfig) -> Result<Settled> {
    match cfg.strategy {
        SettleStrategy::Fixed => {
            debug!("Waiting {} ms for render", cfg.delay_ms);
            sleep(Duration::from_millis(cfg.delay_ms)).await;
            Ok(Settled::Delay)
        }
        SettleStrategy::Stable => wait_until_stable(page, cfg).await,
    }
}

async fn wait_until_stable(page: &dyn TransactionPage, cfg: &SettleConfig) -> Result<Settled> {
    let interval = Duration::from_millis(cfg.poll_interval_ms.max(1));
    // A timeout too large to represent means no deadline.
    let deadline = Instant::now().checked_add(Duration::from_millis(cfg.timeout_ms));

    let mut last = page.fingerprint().await?;
    let mut quiet = 0u32;
    let mut polls = 0u32;

    while quiet < cfg.quiet_polls {
        let next_poll = Instant::now().checked_add(interval);
        if deadline.is_some_and(|deadline| next_poll.is_none_or(|next| next > deadline)) {
            warn!(
                "Page still changing after {} ms, collecting anyway",
                cfg.timeout_ms
            );
            return Ok(Settled::TimedOut);
        }
        sleep(interval).await;
        polls += 1;

        let current = page.fingerprint().await?;
        if current == last {
            quiet += 1;
        } else {
            quiet = 0;
            last = current;
        }
    }

    debug!("Page stable after {} polls", polls);
    Ok(Settled::Stable { polls })
}
