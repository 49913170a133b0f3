//! Evaluation record storage.
//!
//! Records are written once and never updated or deleted. Each lives in its own sharded
//! directory keyed by the record id:
//!
//! ```text
//! evaluations/
//!   <s1>/
//!     <s2>/
//!       <record_id>/
//!         evaluation.yaml
//! ```

use crate::config::CoreConfig;
use crate::constants::EVALUATION_FILENAME;
use crate::error::StoreResult;
use crate::evaluation::{EvaluationRecord, EvaluationSink};
use crate::ids::{RecordId, UserId};
use crate::repositories::shared::{create_yaml_entity, read_yaml, sharded_leaf_dirs};
use std::sync::Arc;

/// File-backed [`EvaluationSink`] with read access for later review.
#[derive(Clone, Debug)]
pub struct EvaluationStore {
    cfg: Arc<CoreConfig>,
}

impl EvaluationStore {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    /// Reads a single record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record with this id exists.
    pub fn read(&self, id: &RecordId) -> StoreResult<EvaluationRecord> {
        let path = id
            .sharded_dir(&self.cfg.evaluations_dir())
            .join(EVALUATION_FILENAME);
        read_yaml(&path)
    }

    /// Lists stored records, newest first.
    ///
    /// With `owner` set, only records created by that user are returned. Records that cannot
    /// be parsed are logged and skipped.
    pub fn list(&self, owner: Option<&UserId>) -> Vec<EvaluationRecord> {
        let mut records: Vec<EvaluationRecord> = sharded_leaf_dirs(&self.cfg.evaluations_dir())
            .into_iter()
            .filter_map(|dir| {
                let path = dir.join(EVALUATION_FILENAME);
                match read_yaml::<EvaluationRecord>(&path) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        tracing::warn!("skipping evaluation record {}: {e}", path.display());
                        None
                    }
                }
            })
            .filter(|record| owner.is_none() || record.owner.as_ref() == owner)
            .collect();

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }
}

impl EvaluationSink for EvaluationStore {
    fn persist(&self, record: &EvaluationRecord) -> StoreResult<()> {
        let dir = record.id.sharded_dir(&self.cfg.evaluations_dir());
        create_yaml_entity(&dir, EVALUATION_FILENAME, record)?;
        Ok(())
    }
}
