//! # grepwalk
//!
//! 面向小基因组（如线粒体 DNA）的种子延伸式短读段组装器。
//!
//! 从一段已知的种子序列出发，在读段中查找包含种子的读段，统计种子之后
//! 的候选延伸序列；某个候选在正、负两条链上都达到足够深度时被确认，
//! 种子向前滑动，如此反复直到读段耗尽或达到长度上限。
//!
//! ## 快速示例
//!
//! ```rust,no_run
//! use grepwalk::assemble::{assemble, AssemblyConfig, AssemblyContext};
//! use grepwalk::io::emitter::FastaEmitter;
//! use grepwalk::io::reads::ReadSource;
//!
//! let config = AssemblyConfig { seed: "ACGTTGCAGGCTAACC".to_string(), ..Default::default() };
//! config.validate()?;
//!
//! let mut source = ReadSource::open("reads.fq")?;
//! let mut emitter = FastaEmitter::new(std::io::stdout(), 60);
//! emitter.write_header("mito")?;
//!
//! let mut ctx = AssemblyContext::new(&config);
//! let outcome = assemble(&mut ctx, &mut source, &mut emitter)?;
//! eprintln!("{:?}: {} bp", outcome.termination, outcome.assembled_length);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## 模块说明
//!
//! - [`assemble`] — 候选表、共识规则与组装主循环
//! - [`io`] — 读段输入（FASTQ / FASTA 混合）、FASTA 输出
//! - [`preprocess`] — FASTQ 统计、修剪、双端合并
//! - [`util`] — 碱基规范化、反向互补、Phred 质量值

pub mod assemble;
pub mod io;
pub mod preprocess;
pub mod util;
