//! Deep Dive Session
//!
//! The wizard walks an analyst through four clipboard payloads that land in
//! fixed cells of the Deep Dive template: the selected report itself, the
//! vendor ranking, the associate ranking, and finally the target-vendor
//! summary re-aggregated from the grid the analyst pastes back out of the
//! sheet. The session owns the selection state the GUI used to keep in
//! globals, and every payload goes through one [`StageSink`].

use crate::aggregate;
use crate::catalog::{ReportCatalog, ReportFile};
use crate::config::DeepDiveConfig;
use crate::error::{DeepDiveError, Result};
use crate::loader::load_report;
use crate::staging::{from_excel_text, StageSink};
use tracing::info;

/// Where the analyst is in the template walk-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    StageReport,
    RankVendors,
    RankAgents,
    ReAggregate,
    Done,
}

impl Step {
    fn next(self) -> Step {
        match self {
            Step::StageReport => Step::RankVendors,
            Step::RankVendors => Step::RankAgents,
            Step::RankAgents => Step::ReAggregate,
            Step::ReAggregate | Step::Done => Step::Done,
        }
    }
}

pub struct DeepDiveSession<S: StageSink> {
    config: DeepDiveConfig,
    catalog: ReportCatalog,
    sink: S,
    step: Step,
    selected: Option<ReportFile>,
}

impl<S: StageSink> DeepDiveSession<S> {
    pub fn new(config: DeepDiveConfig, sink: S) -> Self {
        let catalog = ReportCatalog::new(config.reports_dir.clone());
        Self {
            config,
            catalog,
            sink,
            step: Step::StageReport,
            selected: None,
        }
    }

    pub fn catalog(&self) -> &ReportCatalog {
        &self.catalog
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn selected(&self) -> Option<&ReportFile> {
        self.selected.as_ref()
    }

    /// Pick the report the remaining steps run against. The name must be an
    /// actual file in the reports directory.
    pub fn select_report(&mut self, file_name: &str) -> Result<()> {
        let file = self
            .catalog
            .files(None)?
            .into_iter()
            .find(|f| f.file_name == file_name)
            .ok_or_else(|| {
                DeepDiveError::Catalog(format!(
                    "No report named {:?} in {}",
                    file_name,
                    self.catalog.dir().display()
                ))
            })?;
        info!("Selected report {}", file.display_name);
        self.selected = Some(file);
        Ok(())
    }

    fn selected_file(&self) -> Result<&ReportFile> {
        self.selected
            .as_ref()
            .ok_or_else(|| DeepDiveError::Catalog("No report selected".to_string()))
    }

    fn advance(&mut self, from: Step) {
        if self.step <= from {
            self.step = from.next();
        }
    }

    /// Step 1: stage the selected report as loaded, for the YTD/LY cells.
    pub fn stage_report(&mut self) -> Result<()> {
        let file = self.selected_file()?.clone();
        let df = load_report(&self.catalog.path_of(&file.file_name))?;
        info!("Staging {} ({} rows)", file.display_name, df.height());
        self.sink.stage(&file.display_name, &df)?;
        self.advance(Step::StageReport);
        Ok(())
    }

    /// Step 2: vendor ranking from the report on disk.
    pub fn rank_vendors(&mut self) -> Result<()> {
        let file = self.selected_file()?.clone();
        let df = load_report(&self.catalog.path_of(&file.file_name))?;
        let ranked = aggregate::rank_vendors(df)?;
        info!("Staging vendor ranks ({} vendors)", ranked.height());
        self.sink.stage("vendor ranks", &ranked)?;
        self.advance(Step::RankVendors);
        Ok(())
    }

    /// Step 3: associate ranking from the report on disk.
    pub fn rank_agents(&mut self) -> Result<()> {
        let file = self.selected_file()?.clone();
        let df = load_report(&self.catalog.path_of(&file.file_name))?;
        let ranked = aggregate::rank_agents(df)?;
        info!("Staging agent ranks ({} associates)", ranked.height());
        self.sink.stage("agent ranks", &ranked)?;
        self.advance(Step::RankAgents);
        Ok(())
    }

    /// Step 4: re-aggregate the grid pasted back from the sheet and stage
    /// the top-associate summary.
    pub fn re_aggregate_pasted(&mut self, pasted: &str) -> Result<()> {
        let df = from_excel_text(pasted)?;
        let summary =
            aggregate::re_aggregate(df, &self.config.target_vendor, self.config.top_n)?;
        info!(
            "Staging {} summary ({} associates)",
            self.config.target_vendor,
            summary.height()
        );
        self.sink.stage("target vendor summary", &summary)?;
        self.advance(Step::ReAggregate);
        Ok(())
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
