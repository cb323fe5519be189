//! 基于种子的贪婪延伸组装。
//!
//! 从一段已知的种子序列出发，反复扫描读段集合：包含当前种子的读段提供
//! 一段候选延伸序列，候选在 [`nominee::NomineeTable`] 中按正/负链分别计数，
//! 某个候选的深度达到阈值即被确认、写出，种子随之向前滑动。
//!
//! - [`config`] — 参数、默认值与校验
//! - [`nominee`] — 有界候选表与收尾阶段的截断合并
//! - [`consensus`] — 单条读段的检查与确认规则
//! - [`driver`] — 外层循环：定向、回绕、长度上限与收尾
//! - [`report`] — JSON 运行记录

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::io::reads::ReadError;

pub mod config;
pub mod consensus;
pub mod driver;
pub mod nominee;
pub mod report;

pub use config::{AssemblyConfig, ConfigError};
pub use consensus::{AssemblyContext, Examination, OrientedRead};
pub use driver::{assemble, AssemblyOutcome};
pub use nominee::{DepthRule, NomineeEntry, NomineeTable};
pub use report::AssemblyReport;

/// 读段相对当前种子的方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    /// 原始方向中找到种子
    Plus,
    /// 反向互补后找到种子
    Minus,
}

/// Why an assembly run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// Reads ran out without further progress (endgame already attempted).
    Exhausted,
    /// The assembled length reached the configured maximum.
    LengthCeiling,
    /// Too many distinct candidates for the nominee table.
    CapacityExceeded,
}

/// 组装结果的输出端。数据与终止原因分成两个调用，
/// 终止原因不会混入序列数据。
pub trait BaseSink {
    fn emit(&mut self, bases: &[u8]) -> std::io::Result<()>;
    fn report_termination(&mut self, reason: TerminationReason) -> std::io::Result<()>;
}

#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("nominee table overflow ({capacity} candidates); the seed may be too short")]
    CapacityExceeded { capacity: usize },

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("failed to write assembled bases: {0}")]
    Emit(#[source] std::io::Error),
}

/// 测试用的输出端：记录每次写出的片段和终止原因
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    pub fragments: Vec<Vec<u8>>,
    pub terminations: Vec<TerminationReason>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn contig(&self) -> Vec<u8> {
        self.fragments.concat()
    }
}

#[cfg(test)]
impl BaseSink for RecordingSink {
    fn emit(&mut self, bases: &[u8]) -> std::io::Result<()> {
        self.fragments.push(bases.to_vec());
        Ok(())
    }

    fn report_termination(&mut self, reason: TerminationReason) -> std::io::Result<()> {
        self.terminations.push(reason);
        Ok(())
    }
}
