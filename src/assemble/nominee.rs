use std::collections::HashMap;
use std::io::Write;

use serde::Serialize;

use super::{AssembleError, Strand};

/// 候选延伸序列及其正/负链支持深度
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NomineeEntry {
    #[serde(serialize_with = "serialize_bases")]
    pub extension: Vec<u8>,
    pub depth_plus: u32,
    pub depth_minus: u32,
}

impl NomineeEntry {
    fn new(extension: Vec<u8>) -> Self {
        Self { extension, depth_plus: 0, depth_minus: 0 }
    }

    pub fn depth(&self) -> u32 {
        self.depth_plus + self.depth_minus
    }

    fn add(&mut self, strand: Strand) {
        match strand {
            Strand::Plus => self.depth_plus += 1,
            Strand::Minus => self.depth_minus += 1,
        }
    }

    fn absorb(&mut self, other: &NomineeEntry) {
        self.depth_plus += other.depth_plus;
        self.depth_minus += other.depth_minus;
    }
}

fn serialize_bases<S: serde::Serializer>(bases: &[u8], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&String::from_utf8_lossy(bases))
}

/// 确认规则：两条链各自达到阈值；非定向模式下合计达到阈值也可
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthRule {
    pub threshold: u32,
    pub ignore_strand: bool,
}

impl DepthRule {
    pub fn is_confirmed(&self, entry: &NomineeEntry) -> bool {
        (entry.depth_plus >= self.threshold && entry.depth_minus >= self.threshold)
            || (self.ignore_strand && entry.depth() >= self.threshold)
    }
}

/// 有界候选表。
///
/// - 每个延伸序列至多一条记录（按字节完全相等判重）
/// - 记录按插入顺序保存，从不重排，只能整体清空
/// - 容量满时插入失败，调用方应终止本次组装
#[derive(Debug, Clone)]
pub struct NomineeTable {
    entries: Vec<NomineeEntry>,
    index: HashMap<Vec<u8>, usize>,
    capacity: usize,
}

impl NomineeTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity.min(1024)),
            index: HashMap::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn find(&self, extension: &[u8]) -> Option<usize> {
        self.index.get(extension).copied()
    }

    pub fn get(&self, slot: usize) -> Option<&NomineeEntry> {
        self.entries.get(slot)
    }

    /// 新候选：本链深度为 1，另一条链为 0。
    /// 已有相同延伸序列时只给对应链加一，返回原来的槽位，表中不会出现重复。
    pub fn insert(&mut self, extension: &[u8], strand: Strand) -> Result<usize, AssembleError> {
        if let Some(slot) = self.find(extension) {
            self.entries[slot].add(strand);
            return Ok(slot);
        }
        if self.is_full() {
            return Err(AssembleError::CapacityExceeded { capacity: self.capacity });
        }
        let slot = self.entries.len();
        let mut entry = NomineeEntry::new(extension.to_vec());
        entry.add(strand);
        self.entries.push(entry);
        self.index.insert(extension.to_vec(), slot);
        Ok(slot)
    }

    /// 计入一次观测并返回更新后的候选
    pub fn observe(
        &mut self,
        extension: &[u8],
        strand: Strand,
    ) -> Result<&NomineeEntry, AssembleError> {
        let slot = self.insert(extension, strand)?;
        Ok(&self.entries[slot])
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Active entries in insertion order.
    pub fn entries(&self) -> &[NomineeEntry] {
        &self.entries
    }

    /// 收尾阶段：从 `longest` 开始逐步缩短截断长度，把截断后相同的候选
    /// 合并并累加深度。每一层都在上一层的合并结果上继续（截断不可逆）。
    /// 某一层出现满足 `rule` 的合并结果时立即返回该结果，不再继续缩短。
    ///
    /// 只有真正发生过合并的组才会被检查：单独的候选在此前的逐读段检查中
    /// 已经没有达到阈值。表本身不被修改。
    pub fn collapse_by_truncation(&self, longest: usize, rule: &DepthRule) -> Option<NomineeEntry> {
        let mut groups = self.entries.clone();
        for len in (1..=longest).rev() {
            let mut merged: Vec<NomineeEntry> = Vec::with_capacity(groups.len());
            let mut merged_any: Vec<bool> = Vec::with_capacity(groups.len());
            let mut slots: HashMap<Vec<u8>, usize> = HashMap::with_capacity(groups.len());

            for entry in &groups {
                let key = &entry.extension[..len.min(entry.extension.len())];
                match slots.get(key) {
                    Some(&slot) => {
                        merged[slot].absorb(entry);
                        merged_any[slot] = true;
                    }
                    None => {
                        slots.insert(key.to_vec(), merged.len());
                        let mut head = NomineeEntry::new(key.to_vec());
                        head.absorb(entry);
                        merged.push(head);
                        merged_any.push(false);
                    }
                }
            }

            let winner = merged
                .iter()
                .zip(&merged_any)
                .position(|(entry, &was_merged)| was_merged && rule.is_confirmed(entry));
            if let Some(slot) = winner {
                return Some(merged.swap_remove(slot));
            }
            groups = merged;
        }
        None
    }
}

/// 诊断输出：`extension\tdepth_plus\tdepth_minus\ttotal`，返回行数
pub fn write_nominee_tsv<W: Write>(
    entries: &[NomineeEntry],
    out: &mut W,
) -> std::io::Result<usize> {
    for e in entries {
        out.write_all(&e.extension)?;
        writeln!(out, "\t{}\t{}\t{}", e.depth_plus, e.depth_minus, e.depth())?;
    }
    Ok(entries.len())
}
