use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::dna;

/// 人与小鼠线粒体 DNA 之间的保守区（31 nt）
pub const DEFAULT_SEED: &str = "CCGTGCAAAGGTAGCATAATCACTTGTTCCT";
pub const DEFAULT_WINDOW: usize = 64;
pub const DEFAULT_SLIDE: usize = 32;
pub const DEFAULT_STRAND_DEPTH: u32 = 4;
pub const DEFAULT_MIN_QSCORE: i32 = 16;
pub const DEFAULT_MAX_LENGTH: usize = 0x5000;
/// 候选表容量；溢出说明种子太短，无法区分读段
pub const DEFAULT_CAPACITY: usize = 512;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("seed sequence is empty")]
    EmptySeed,

    #[error("seed length ({seed_len}) should be less than the window size ({window})")]
    SeedTooLong { seed_len: usize, window: usize },

    #[error("sliding size ({slide}) should be less than the window size ({window})")]
    SlideTooLong { slide: usize, window: usize },

    #[error("sliding size must be at least 1")]
    ZeroSlide,

    #[error("seed sequence ({seed}) should consist of only T, C, A, or G")]
    InvalidSeed { seed: String },

    #[error("strand depth must be at least 1")]
    ZeroDepth,

    #[error("nominee table capacity must be at least 1")]
    ZeroCapacity,
}

impl ConfigError {
    /// 命令行退出码：202 种子过长，203 滑动步长无效，205 种子序列无效，其余为 1
    pub fn exit_code(&self) -> u8 {
        match self {
            ConfigError::SeedTooLong { .. } => 202,
            ConfigError::SlideTooLong { .. } | ConfigError::ZeroSlide => 203,
            ConfigError::EmptySeed | ConfigError::InvalidSeed { .. } => 205,
            ConfigError::ZeroDepth | ConfigError::ZeroCapacity => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyConfig {
    pub seed: String,
    pub window: usize,
    pub slide: usize,
    pub strand_depth: u32,
    pub min_qscore: i32,
    pub max_length: usize,
    /// 不区分读段方向，两条链的深度合计即可确认
    pub ignore_strand: bool,
    /// 从种子的反向互补链开始延伸
    pub complement: bool,
    pub capacity: usize,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED.to_string(),
            window: DEFAULT_WINDOW,
            slide: DEFAULT_SLIDE,
            strand_depth: DEFAULT_STRAND_DEPTH,
            min_qscore: DEFAULT_MIN_QSCORE,
            max_length: DEFAULT_MAX_LENGTH,
            ignore_strand: false,
            complement: false,
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl AssemblyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seed.is_empty() {
            return Err(ConfigError::EmptySeed);
        }
        if self.seed.len() >= self.window {
            return Err(ConfigError::SeedTooLong { seed_len: self.seed.len(), window: self.window });
        }
        if self.slide >= self.window {
            return Err(ConfigError::SlideTooLong { slide: self.slide, window: self.window });
        }
        if self.slide == 0 {
            return Err(ConfigError::ZeroSlide);
        }
        let mut seed = self.seed.as_bytes().to_vec();
        dna::uc_only_acgt(&mut seed);
        if !seed.iter().all(|&b| dna::is_canonical(b)) {
            return Err(ConfigError::InvalidSeed { seed: self.seed.clone() });
        }
        if self.strand_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }

    /// Upper-cased seed, reverse complemented when `complement` is set.
    pub fn initial_seed(&self) -> Vec<u8> {
        let mut seed = self.seed.as_bytes().to_vec();
        dna::uc_only_acgt(&mut seed);
        if self.complement {
            dna::revcomp_in_place(&mut seed);
        }
        seed
    }
}
