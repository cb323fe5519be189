//! FASTQ 预处理：统计、质量修剪、双端读段合并。
//! 组装前用于清理输入，均为流式处理，不依赖组装模块。

pub mod count;
pub mod merge;
pub mod trim;

pub use count::{count_reads_bases, BaseCounts};
pub use merge::{merge_fastq, merge_pair, MergeOptions, MergeStats, MergedRead};
pub use trim::{trim_low_quality_bases, trim_record, TrimOptions, TrimStats};
