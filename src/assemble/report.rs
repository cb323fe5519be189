use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{AssemblyConfig, AssemblyContext, AssemblyOutcome, NomineeEntry, TerminationReason};

/// `--report` 输出的 JSON 运行记录
#[derive(Debug, Clone, Serialize)]
pub struct AssemblyReport {
    pub name: String,
    /// RFC 3339
    pub started: String,
    pub finished: String,
    pub config: AssemblyConfig,
    pub termination: TerminationReason,
    pub assembled_length: usize,
    pub extensions: usize,
    /// 溢出时不完整，记为 null
    pub passes: Option<usize>,
    pub reads_examined: Option<usize>,
    pub endgame: Option<NomineeEntry>,
}

impl AssemblyReport {
    pub fn from_outcome(
        name: &str,
        config: &AssemblyConfig,
        started: DateTime<Utc>,
        outcome: &AssemblyOutcome,
    ) -> Self {
        Self {
            name: name.to_string(),
            started: started.to_rfc3339(),
            finished: Utc::now().to_rfc3339(),
            config: config.clone(),
            termination: outcome.termination,
            assembled_length: outcome.assembled_length,
            extensions: outcome.extensions,
            passes: Some(outcome.passes),
            reads_examined: Some(outcome.reads_examined),
            endgame: outcome.endgame.clone(),
        }
    }

    /// Report for a run that stopped on a full nominee table.
    pub fn from_overflow(
        name: &str,
        config: &AssemblyConfig,
        started: DateTime<Utc>,
        ctx: &AssemblyContext,
    ) -> Self {
        Self {
            name: name.to_string(),
            started: started.to_rfc3339(),
            finished: Utc::now().to_rfc3339(),
            config: config.clone(),
            termination: TerminationReason::CapacityExceeded,
            assembled_length: ctx.assembled_len(),
            extensions: ctx.extensions(),
            passes: None,
            reads_examined: None,
            endgame: None,
        }
    }
}
