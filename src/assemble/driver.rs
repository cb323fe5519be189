use std::io::{BufRead, Seek};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::{
    AssembleError, AssemblyContext, BaseSink, NomineeEntry, OrientedRead, Strand, TerminationReason,
};
use crate::io::reads::ReadSource;
use crate::util::dna;

#[derive(Debug, Clone, Serialize)]
pub struct AssemblyOutcome {
    pub termination: TerminationReason,
    pub assembled_length: usize,
    pub extensions: usize,
    pub passes: usize,
    /// 包含当前种子、交给共识引擎检查的读段数（跨所有轮次）
    pub reads_examined: usize,
    /// 收尾阶段的截断合并结果（仅在读段耗尽时尝试）
    pub endgame: Option<NomineeEntry>,
    /// 终止时（收尾之前）候选表的内容，用于诊断
    pub nominees: Vec<NomineeEntry>,
}

/// 在读段中查找当前种子：先正向，找不到再对读段取反向互补后查找。
/// 找到时截掉种子之前的部分，质量值与序列保持对齐。
pub fn orient(mut seq: Vec<u8>, mut qual: Vec<u8>, seed: &[u8]) -> Option<OrientedRead> {
    dna::uc_only_acgt(&mut seq);
    let (pos, strand) = match dna::find_subseq(&seq, seed) {
        Some(pos) => (pos, Strand::Plus),
        None => {
            dna::revcomp_in_place(&mut seq);
            qual.reverse();
            (dna::find_subseq(&seq, seed)?, Strand::Minus)
        }
    };
    Some(OrientedRead {
        seq: seq.split_off(pos),
        qual: if pos <= qual.len() { qual.split_off(pos) } else { Vec::new() },
        strand,
    })
}

/// 组装主循环。
///
/// 种子先写入 `sink`。每条读段定向后交给 [`AssemblyContext::examine`]；
/// 组装长度达到上限即停止。一轮扫描结束时若本轮有过延伸，回到文件开头
/// 用新种子再扫一遍；否则做收尾合并，然后结束。
///
/// 候选表溢出时先向 `sink` 报告终止原因，再返回
/// [`AssembleError::CapacityExceeded`]，此时 `ctx` 中的候选表保持溢出时的状态。
pub fn assemble<R, S>(
    ctx: &mut AssemblyContext,
    source: &mut ReadSource<R>,
    sink: &mut S,
) -> Result<AssemblyOutcome, AssembleError>
where
    R: BufRead + Seek,
    S: BaseSink,
{
    sink.emit(ctx.seed()).map_err(AssembleError::Emit)?;
    info!(
        seed = %String::from_utf8_lossy(ctx.seed()),
        max_length = ctx.max_length(),
        "assembly started"
    );

    let mut passes = 0usize;
    let mut reads_examined = 0usize;
    loop {
        passes += 1;
        ctx.begin_pass();

        while let Some(record) = source.next_record()? {
            if let Some(read) = orient(record.seq, record.qual, ctx.seed()) {
                reads_examined += 1;
                if let Err(err) = ctx.examine(&read, sink) {
                    if matches!(err, AssembleError::CapacityExceeded { .. }) {
                        warn!(
                            capacity = ctx.table().capacity(),
                            record = source.records_read(),
                            "nominee table overflow"
                        );
                        sink.report_termination(TerminationReason::CapacityExceeded)
                            .map_err(AssembleError::Emit)?;
                    }
                    return Err(err);
                }
            }

            if ctx.assembled_len() >= ctx.max_length() {
                let nominees = ctx.table().entries().to_vec();
                let reason = TerminationReason::LengthCeiling;
                return finish(ctx, sink, reason, passes, reads_examined, None, nominees);
            }
        }

        if ctx.extensions_in_pass() > 0 {
            debug!(pass = passes, extended = ctx.extensions_in_pass(), "rewinding read source");
            source.rewind()?;
            continue;
        }

        let nominees = ctx.table().entries().to_vec();
        let endgame = ctx.endgame(sink)?;
        match &endgame {
            Some(entry) => info!(
                extended = entry.extension.len(),
                depth = entry.depth(),
                "endgame extended the contig"
            ),
            None => warn!(candidates = nominees.len(), "no further extension possible"),
        }
        let reason = TerminationReason::Exhausted;
        return finish(ctx, sink, reason, passes, reads_examined, endgame, nominees);
    }
}

fn finish<S: BaseSink>(
    ctx: &AssemblyContext,
    sink: &mut S,
    termination: TerminationReason,
    passes: usize,
    reads_examined: usize,
    endgame: Option<NomineeEntry>,
    nominees: Vec<NomineeEntry>,
) -> Result<AssemblyOutcome, AssembleError> {
    sink.report_termination(termination).map_err(AssembleError::Emit)?;
    info!(
        ?termination,
        assembled = ctx.assembled_len(),
        extensions = ctx.extensions(),
        passes,
        "assembly finished"
    );
    Ok(AssemblyOutcome {
        termination,
        assembled_length: ctx.assembled_len(),
        extensions: ctx.extensions(),
        passes,
        reads_examined,
        endgame,
        nominees,
    })
}
