use anyhow::{bail, Result};
use std::io::{BufRead, Write};

use crate::io::fastq::{FastqReader, FastqRecord};
use crate::util::dna;

pub const DEFAULT_MIN_OVERLAP: usize = 32;

#[derive(Debug, Clone, Copy)]
pub struct MergeOptions {
    pub min_overlap: usize,
    /// 只输出成功合并的两条 header，不输出序列
    pub ids_only: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub pairs: u64,
    pub merged: u64,
    pub repeats_skipped: u64,
}

/// 重叠区是否为简单重复。按三、二、一核苷酸的顺序检查：
/// 每隔 3/2/1 个位置都与首碱基相同即视为重复，返回对应周期。
pub fn repeat_period(overlap: &[u8]) -> Option<usize> {
    let first = *overlap.first()?;
    [3usize, 2, 1]
        .into_iter()
        .find(|&period| overlap.iter().step_by(period).all(|&b| b == first))
}

/// 双端读段的合并结果（read 1 方向）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRead {
    pub seq: Vec<u8>,
    pub qual: Vec<u8>,
    pub overlap: usize,
}

enum PairOutcome {
    Merged(MergedRead),
    Repeat,
    Unmerged,
}

/// `seq2` / `qual2` 必须已经是 read 1 的方向（反向互补、质量反转）。
/// 寻找 read 1 后缀与 read 2 前缀相同的最长重叠，长度不小于 `min_overlap`。
fn merge_oriented(
    seq1: &[u8],
    qual1: &[u8],
    seq2: &[u8],
    qual2: &[u8],
    min_overlap: usize,
) -> PairOutcome {
    let longest = seq1.len().min(seq2.len());
    if min_overlap == 0 || longest < min_overlap {
        return PairOutcome::Unmerged;
    }
    for overlap in (min_overlap..=longest).rev() {
        let start = seq1.len() - overlap;
        if seq1[start..] != seq2[..overlap] {
            continue;
        }
        if repeat_period(&seq2[..overlap]).is_some() {
            return PairOutcome::Repeat;
        }
        let mut seq = Vec::with_capacity(start + seq2.len());
        seq.extend_from_slice(&seq1[..start]);
        seq.extend_from_slice(seq2);

        let mut qual = Vec::with_capacity(seq.len());
        qual.extend_from_slice(&qual1[..start]);
        for k in 0..overlap {
            qual.push(qual1[start + k].max(qual2[k]));
        }
        qual.extend_from_slice(&qual2[overlap..]);
        return PairOutcome::Merged(MergedRead { seq, qual, overlap });
    }
    PairOutcome::Unmerged
}

fn classify(r1: &FastqRecord, r2: &FastqRecord, min_overlap: usize) -> PairOutcome {
    let mut seq1 = r1.seq.clone();
    dna::uc_only_acgt(&mut seq1);
    let mut seq2 = r2.seq.clone();
    dna::uc_only_acgt(&mut seq2);
    dna::revcomp_in_place(&mut seq2);
    let mut qual2 = r2.qual.clone();
    qual2.reverse();
    merge_oriented(&seq1, &r1.qual, &seq2, &qual2, min_overlap)
}

/// Merge one read pair. Read 2 is given as sequenced.
pub fn merge_pair(r1: &FastqRecord, r2: &FastqRecord, min_overlap: usize) -> Option<MergedRead> {
    match classify(r1, r2, min_overlap) {
        PairOutcome::Merged(m) => Some(m),
        PairOutcome::Repeat | PairOutcome::Unmerged => None,
    }
}

/// 逐对读取两个 FASTQ 文件并合并重叠的双端读段。
///
/// 合并成功时输出两条记录：read 1 的 header 配合并序列，read 2 的 header
/// 配其反向互补（质量反转）。未合并的读段对原样输出。
pub fn merge_fastq<R1, R2, W>(
    r1: R1,
    r2: R2,
    out: &mut W,
    opts: &MergeOptions,
) -> Result<MergeStats>
where
    R1: BufRead,
    R2: BufRead,
    W: Write,
{
    let mut reader1 = FastqReader::new(r1);
    let mut reader2 = FastqReader::new(r2);
    let mut stats = MergeStats::default();

    while let Some(rec1) = reader1.next_record()? {
        let Some(rec2) = reader2.next_record()? else {
            bail!("unexpected end of read 2 file after {} pairs", stats.pairs);
        };
        stats.pairs += 1;

        match classify(&rec1, &rec2, opts.min_overlap) {
            PairOutcome::Merged(merged) => {
                stats.merged += 1;
                if opts.ids_only {
                    writeln!(out, "@{}", rec1.header)?;
                    writeln!(out, "@{}", rec2.header)?;
                    continue;
                }
                let first = FastqRecord {
                    header: rec1.header,
                    seq: merged.seq,
                    plus: rec1.plus,
                    qual: merged.qual,
                };
                let mut qual = first.qual.clone();
                qual.reverse();
                let second = FastqRecord {
                    header: rec2.header,
                    seq: dna::revcomp(&first.seq),
                    plus: rec2.plus,
                    qual,
                };
                first.write_to(out)?;
                second.write_to(out)?;
            }
            outcome => {
                if matches!(outcome, PairOutcome::Repeat) {
                    stats.repeats_skipped += 1;
                }
                if !opts.ids_only {
                    rec1.write_to(out)?;
                    rec2.write_to(out)?;
                }
            }
        }
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn fq(header: &str, seq: &[u8], qual: &[u8]) -> FastqRecord {
        FastqRecord {
            header: header.to_string(),
            seq: seq.to_vec(),
            plus: String::new(),
            qual: qual.to_vec(),
        }
    }

    #[test]
    fn repeat_periods() {
        assert_eq!(repeat_period(b"AAAAAA"), Some(3));
        assert_eq!(repeat_period(b"ACAGAT"), Some(2));
        assert_eq!(repeat_period(b"ACGACG"), Some(3));
        assert_eq!(repeat_period(b"ACGTAC"), None);
        assert_eq!(repeat_period(b""), None);
    }

    #[test]
    fn merges_overlapping_pair() {
        // fragment AACCGGTTGACTAG, read 2 sequenced from the other end
        let fragment = b"AACCGGTTGACTAG";
        let r1 = fq("p/1", &fragment[..10], b"IIIIIIII55");
        let r2 = fq("p/2", &dna::revcomp(&fragment[4..]), b"5555555555");
        let m = merge_pair(&r1, &r2, 6).unwrap();
        assert_eq!(m.seq, fragment.to_vec());
        assert_eq!(m.overlap, 6);
        assert_eq!(m.qual, b"IIIIIIII555555");
    }

    #[test]
    fn short_or_repetitive_overlap_is_not_merged() {
        let r1 = fq("p/1", b"ACGTAAAAAA", b"IIIIIIIIII");
        let r2 = fq("p/2", &dna::revcomp(b"AAAAAAGCAT"), b"IIIIIIIIII");
        assert!(merge_pair(&r1, &r2, 6).is_none());
        assert!(merge_pair(&r1, &r2, 20).is_none());
    }

    #[test]
    fn writes_merged_pair_twice_and_passes_others_through() {
        let fragment = b"AACCGGTTGACTAG";
        let rc2 = dna::revcomp(&fragment[4..]);
        let one = format!(
            "@p/1\n{}\n+\nIIIIIIIIII\n@q/1\nGGGGGGGGGG\n+\nIIIIIIIIII\n",
            String::from_utf8_lossy(&fragment[..10])
        );
        let two = format!(
            "@p/2\n{}\n+\nIIIIIIIIII\n@q/2\nTTTTTTTTTT\n+\nIIIIIIIIII\n",
            String::from_utf8_lossy(&rc2)
        );
        let mut out = Vec::new();
        let opts = MergeOptions { min_overlap: 6, ids_only: false };
        let (one, two) = (Cursor::new(one.into_bytes()), Cursor::new(two.into_bytes()));
        let stats = merge_fastq(one, two, &mut out, &opts).unwrap();
        assert_eq!(stats, MergeStats { pairs: 2, merged: 1, repeats_skipped: 0 });

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "@p/1");
        assert_eq!(lines[1], "AACCGGTTGACTAG");
        assert_eq!(lines[4], "@p/2");
        assert_eq!(lines[5], "CTAGTCAACCGGTT");
        assert_eq!(lines[8], "@q/1");
        assert_eq!(lines[13], "TTTTTTTTTT");
        assert_eq!(lines.len(), 16);
    }

    #[test]
    fn ids_only_lists_merged_headers() {
        let one = "@p/1 x\nAACCGGTTGA\n+\nIIIIIIIIII\n";
        let rc = dna::revcomp(b"CGGTTGACTAG");
        let two = format!("@p/2 y\n{}\n+\nIIIIIIIIIII\n", String::from_utf8_lossy(&rc));
        let mut out = Vec::new();
        let opts = MergeOptions { min_overlap: 6, ids_only: true };
        merge_fastq(Cursor::new(one.as_bytes()), Cursor::new(two.into_bytes()), &mut out, &opts)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "@p/1 x\n@p/2 y\n");
    }

    #[test]
    fn read2_file_ending_early_is_an_error() {
        let one = "@p/1\nACGT\n+\nIIII\n@q/1\nACGT\n+\nIIII\n";
        let two = "@p/2\nACGT\n+\nIIII\n";
        let mut out = Vec::new();
        let opts = MergeOptions { min_overlap: 32, ids_only: false };
        let (one, two) = (Cursor::new(one.as_bytes()), Cursor::new(two.as_bytes()));
        assert!(merge_fastq(one, two, &mut out, &opts).is_err());
    }
}
