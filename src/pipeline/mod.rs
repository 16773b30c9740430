//! Export orchestrator: ties page → extraction → CSV file together.
//!
//! ## States
//!
//! `Idle → Expanding → Waiting → Collecting → Encoding → Downloaded`
//!
//! `Collecting → EmptyNotice` when nothing survives filtering; no file is
//! written in that case. There are no retries and no cancellation.

use crate::config::AppConfig;
use crate::export::{encode_csv, export_filename, save_csv};
use crate::extract::{collect_transactions, expand_all};
use crate::models::Record;
use crate::page::TransactionPage;
use crate::settle::wait_for_render;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use std::path::PathBuf;
use tracing::{debug, info};

/// Shown when the page has no transactions to export.
pub const EMPTY_NOTICE: &str = "No transactions found. Make sure transactions are loaded.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Idle,
    Expanding,
    Waiting,
    Collecting,
    Encoding,
    Downloaded,
    EmptyNotice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved { path: PathBuf, count: usize },
    Empty,
}

pub struct Exporter {
    config: AppConfig,
    state: ExportState,
}

impl Exporter {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            state: ExportState::Idle,
        }
    }

    pub fn state(&self) -> ExportState {
        self.state
    }

    fn enter(&mut self, next: ExportState) {
        debug!("Export: {:?} → {:?}", self.state, next);
        self.state = next;
    }

    pub async fn run(&mut self, page: &dyn TransactionPage) -> Result<ExportOutcome> {
        self.run_at(page, Local::now().naive_local()).await
    }

    /// Like [`run`](Self::run) with an explicit clock for the filename.
    pub async fn run_at(
        &mut self,
        page: &dyn TransactionPage,
        now: NaiveDateTime,
    ) -> Result<ExportOutcome> {
        self.enter(ExportState::Expanding);
        let clicked = expand_all(page).await.context("Expansion failed")?;
        info!("Expanded {} transactions", clicked);

        self.enter(ExportState::Waiting);
        let settled = wait_for_render(page, &self.config.settle).await?;
        debug!("Render wait finished: {:?}", settled);

        self.enter(ExportState::Collecting);
        let transactions = collect_transactions(page).await?;
        if transactions.is_empty() {
            self.enter(ExportState::EmptyNotice);
            return Ok(ExportOutcome::Empty);
        }

        self.enter(ExportState::Encoding);
        let count = transactions.len();
        let records: Vec<Record> = transactions.into_iter().map(Record::from).collect();
        let csv = encode_csv(&records, self.config.export.quoting)?;

        let export = &self.config.export;
        let filename = export_filename(&export.file_prefix, export.timestamped, now);
        let path = save_csv(&csv, &export.out_dir, &filename)?;
        self.enter(ExportState::Downloaded);

        info!("Saved {} transactions to {:?}", count, path);
        Ok(ExportOutcome::Saved { path, count })
    }
}
