use std::io::Write;

use tracing::debug;

use crate::assemble::{BaseSink, TerminationReason};

pub const DEFAULT_COLUMNS: usize = 50;

/// 把确认的碱基写成 FASTA：先写 `>name`，之后按固定列宽折行。
/// 不满一行的碱基留在缓冲区，直到 `report_termination` 时写出。
pub struct FastaEmitter<W: Write> {
    out: W,
    columns: usize,
    buffer: Vec<u8>,
    termination: Option<TerminationReason>,
}

impl<W: Write> FastaEmitter<W> {
    pub fn new(out: W, columns: usize) -> Self {
        Self {
            out,
            columns: columns.max(1),
            buffer: Vec::with_capacity(columns.max(1) * 2),
            termination: None,
        }
    }

    pub fn write_header(&mut self, name: &str) -> std::io::Result<()> {
        writeln!(self.out, ">{}", name)
    }

    pub fn termination(&self) -> Option<TerminationReason> {
        self.termination
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> BaseSink for FastaEmitter<W> {
    fn emit(&mut self, bases: &[u8]) -> std::io::Result<()> {
        self.buffer.extend_from_slice(bases);
        let full = self.buffer.len() / self.columns * self.columns;
        for line in self.buffer[..full].chunks(self.columns) {
            self.out.write_all(line)?;
            self.out.write_all(b"\n")?;
        }
        self.buffer.drain(..full);
        Ok(())
    }

    fn report_termination(&mut self, reason: TerminationReason) -> std::io::Result<()> {
        if !self.buffer.is_empty() {
            self.out.write_all(&self.buffer)?;
            self.out.write_all(b"\n")?;
            self.buffer.clear();
        }
        self.out.flush()?;
        debug!(?reason, "emitter flushed");
        self.termination = Some(reason);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_column_width() {
        let mut em = FastaEmitter::new(Vec::new(), 4);
        em.write_header("contig").unwrap();
        em.emit(b"ACG").unwrap();
        em.emit(b"TACGTA").unwrap();
        em.report_termination(TerminationReason::Exhausted).unwrap();
        assert_eq!(em.termination(), Some(TerminationReason::Exhausted));
        let out = String::from_utf8(em.into_inner()).unwrap();
        assert_eq!(out, ">contig\nACGT\nACGT\nA\n");
    }

    #[test]
    fn termination_never_writes_sentinel_bases() {
        let mut em = FastaEmitter::new(Vec::new(), 4);
        em.emit(b"ACGT").unwrap();
        em.report_termination(TerminationReason::LengthCeiling).unwrap();
        let out = String::from_utf8(em.into_inner()).unwrap();
        assert_eq!(out, "ACGT\n");
        assert!(!out.contains('N'));
    }
}
