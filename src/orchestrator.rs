//! Create and remove pipelines.
//!
//! Both pipelines run two phases in dependency order. Creates establish
//! record types and global option sets before the fields and relationships
//! that refer to them; removals run in the opposite direction. A fatal
//! service failure aborts the run; changes already applied stay in place.

use tracing::{info, warn};

use crate::client::MetadataService;
use crate::config::Config;
use crate::errors::AppResult;
use crate::events::EventSink;
use crate::executor::{BatchExecutor, BatchResult};
use crate::field_registry::RecordKind;
use crate::mapping::{map_worksheet, Operation};
use crate::models::{ChangeRequest, Locale};
use crate::schema::ConfigurationSet;

const CREATE_PHASES: [&[RecordKind]; 2] = [
    &[RecordKind::RecordType, RecordKind::OptionSet],
    &[RecordKind::Field, RecordKind::OneToMany, RecordKind::ManyToMany],
];

const REMOVE_PHASES: [&[RecordKind]; 2] = [
    &[RecordKind::Field, RecordKind::OneToMany, RecordKind::ManyToMany],
    &[RecordKind::RecordType, RecordKind::OptionSet],
];

/// Summary of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub faults: usize,
    pub published: bool,
}

pub struct Provisioner<'a> {
    service: &'a dyn MetadataService,
    events: &'a dyn EventSink,
    config: &'a Config,
}

impl<'a> Provisioner<'a> {
    pub fn new(service: &'a dyn MetadataService, events: &'a dyn EventSink, config: &'a Config) -> Self {
        Self {
            service,
            events,
            config,
        }
    }

    /// Create everything described by `set`.
    pub async fn create(&self, set: &ConfigurationSet) -> AppResult<RunSummary> {
        self.run(set, Operation::Create, &CREATE_PHASES).await
    }

    /// Remove everything described by `set`.
    pub async fn remove(&self, set: &ConfigurationSet) -> AppResult<RunSummary> {
        self.run(set, Operation::Delete, &REMOVE_PHASES).await
    }

    /// Language for every label of the run, looked up once.
    pub async fn resolve_locale(&self) -> AppResult<Locale> {
        let locale = self.service.current_locale().await?;
        Ok(locale.unwrap_or_else(|| {
            let fallback = Locale(self.config.service.fallback_locale);
            warn!("Service did not report a language, using {}", fallback);
            fallback
        }))
    }

    async fn run(
        &self,
        set: &ConfigurationSet,
        operation: Operation,
        phases: &[&[RecordKind]],
    ) -> AppResult<RunSummary> {
        if set.row_count() == 0 {
            info!("Nothing to do, the workbook holds no rows");
            return Ok(RunSummary::default());
        }

        let locale = self.resolve_locale().await?;
        let executor = BatchExecutor::new(self.service, self.events);
        let mut total = BatchResult::default();

        for (index, kinds) in phases.iter().enumerate() {
            if kinds.iter().all(|kind| set.worksheet(*kind).rows.is_empty()) {
                continue;
            }
            let requests = map_phase(set, kinds, operation, locale, self.events);
            info!(
                "Phase {} of {:?}: {} requests from {:?}",
                index + 1,
                operation,
                requests.len(),
                kinds
            );
            total.merge(executor.execute(&requests).await?);
        }

        let published = total.succeeded > 0 && self.config.import.publish;
        if published {
            info!("Publishing after {} successful changes", total.succeeded);
            self.service.publish_all().await?;
            self.events.success("Published all customizations.".to_string());
        }

        Ok(RunSummary {
            succeeded: total.succeeded,
            faults: total.faults.len(),
            published,
        })
    }
}

fn map_phase(
    set: &ConfigurationSet,
    kinds: &[RecordKind],
    operation: Operation,
    locale: Locale,
    events: &dyn EventSink,
) -> Vec<ChangeRequest> {
    kinds
        .iter()
        .flat_map(|kind| map_worksheet(set.worksheet(*kind), operation, locale, events))
        .collect()
}

/// Map every worksheet without submitting anything; returns the number of
/// rows that mapped cleanly. Problems are reported to `events`.
pub fn validate(set: &ConfigurationSet, operation: Operation, locale: Locale, events: &dyn EventSink) -> usize {
    set.worksheets()
        .map(|worksheet| map_worksheet(worksheet, operation, locale, events).len())
        .sum()
}
