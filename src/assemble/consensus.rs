use tracing::debug;

use super::{AssembleError, AssemblyConfig, BaseSink, DepthRule, NomineeEntry, NomineeTable, Strand};
use crate::util::qual;

/// 已定向的读段：`seq` 从种子出现的位置开始，`qual` 与之逐碱基对齐
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrientedRead {
    pub seq: Vec<u8>,
    pub qual: Vec<u8>,
    pub strand: Strand,
}

/// Outcome of examining one oriented read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Examination {
    /// Too short or failed the quality gate; the table was not touched.
    Rejected,
    /// Counted towards a candidate that is not yet confirmed.
    Nominated { depth: u32 },
    /// The candidate was confirmed and `extended` bases were emitted.
    Confirmed { depth: u32, extended: usize },
}

/// 一次组装的全部可变状态，由驱动循环独占
#[derive(Debug, Clone)]
pub struct AssemblyContext {
    seed: Vec<u8>,
    window: usize,
    slide: usize,
    min_qscore: i32,
    max_length: usize,
    rule: DepthRule,
    assembled_len: usize,
    extensions: usize,
    extensions_in_pass: usize,
    table: NomineeTable,
}

impl AssemblyContext {
    /// `config` must already be validated.
    pub fn new(config: &AssemblyConfig) -> Self {
        let seed = config.initial_seed();
        Self {
            assembled_len: seed.len(),
            seed,
            window: config.window,
            slide: config.slide,
            min_qscore: config.min_qscore,
            max_length: config.max_length,
            rule: DepthRule { threshold: config.strand_depth, ignore_strand: config.ignore_strand },
            extensions: 0,
            extensions_in_pass: 0,
            table: NomineeTable::new(config.capacity),
        }
    }

    pub fn seed(&self) -> &[u8] {
        &self.seed
    }

    pub fn assembled_len(&self) -> usize {
        self.assembled_len
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn extensions(&self) -> usize {
        self.extensions
    }

    pub fn extensions_in_pass(&self) -> usize {
        self.extensions_in_pass
    }

    /// 开始新一轮扫描，清零本轮的延伸计数
    pub fn begin_pass(&mut self) {
        self.extensions_in_pass = 0;
    }

    pub fn table(&self) -> &NomineeTable {
        &self.table
    }

    /// 检查一条包含当前种子的读段。
    ///
    /// 窗口内任一碱基质量不在 `[min_qscore, MAX_QSCORE]` 内，或读段短于窗口时
    /// 直接拒绝。否则取种子之后、窗口之内的部分作为候选延伸，计入候选表，
    /// 并按确认规则判断；确认后写出延伸序列，种子前移 `slide` 个碱基，候选表清空。
    pub fn examine<S: BaseSink>(
        &mut self,
        read: &OrientedRead,
        sink: &mut S,
    ) -> Result<Examination, AssembleError> {
        let usable = read.seq.len().min(read.qual.len());
        if usable < self.window || !qual::window_passes(&read.qual, self.window, self.min_qscore) {
            return Ok(Examination::Rejected);
        }
        debug_assert!(read.seq.starts_with(&self.seed));

        let extending = &read.seq[self.seed.len()..self.window];
        let entry = self.table.observe(extending, read.strand)?;
        let depth = entry.depth();
        if !self.rule.is_confirmed(entry) {
            return Ok(Examination::Nominated { depth });
        }

        sink.emit(extending).map_err(AssembleError::Emit)?;
        self.assembled_len += extending.len();
        self.seed = read.seq[self.slide..self.window].to_vec();
        self.extensions += 1;
        self.extensions_in_pass += 1;
        self.table.clear();
        debug!(
            depth,
            assembled = self.assembled_len,
            seed = %String::from_utf8_lossy(&self.seed),
            "extension confirmed"
        );
        Ok(Examination::Confirmed { depth, extended: extending.len() })
    }

    /// 读段耗尽且没有候选被确认时的最后尝试：按前缀截断合并候选。
    /// 成功时写出合并后的延伸序列并返回它。无论成败，候选表都会被清空。
    pub fn endgame<S: BaseSink>(
        &mut self,
        sink: &mut S,
    ) -> Result<Option<NomineeEntry>, AssembleError> {
        let longest = self.window.saturating_sub(self.seed.len() + 1);
        let winner = self.table.collapse_by_truncation(longest, &self.rule);
        self.table.clear();
        let Some(winner) = winner else {
            return Ok(None);
        };
        sink.emit(&winner.extension).map_err(AssembleError::Emit)?;
        self.assembled_len += winner.extension.len();
        debug!(
            depth = winner.depth(),
            extended = winner.extension.len(),
            "endgame extension"
        );
        Ok(Some(winner))
    }
}
