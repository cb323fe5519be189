use anyhow::Result;
use std::io::BufRead;

use crate::io::fastq::FastqReader;
use crate::util::qual::phred;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BaseCounts {
    pub reads: u64,
    /// Bases whose Phred score is at least the minimum.
    pub high_quality: u64,
    pub bases: u64,
}

pub fn count_reads_bases<R: BufRead>(reader: R, min_qscore: i32) -> Result<BaseCounts> {
    let mut reader = FastqReader::new(reader);
    let mut counts = BaseCounts::default();
    while let Some(rec) = reader.next_record()? {
        counts.reads += 1;
        counts.bases += rec.qual.len() as u64;
        counts.high_quality += rec.qual.iter().filter(|&&q| phred(q) >= min_qscore).count() as u64;
    }
    Ok(counts)
}
