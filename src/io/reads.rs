use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use thiserror::Error;

use crate::util::qual::HIGH_QSCORE_CHAR;

/// Which positional line of a record failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLine {
    Header,
    Sequence,
    Separator,
    Quality,
}

impl fmt::Display for RecordLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecordLine::Header => "header",
            RecordLine::Sequence => "sequence",
            RecordLine::Separator => "'+' separator",
            RecordLine::Quality => "quality",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed record #{record}: bad {line} line: {content:?}")]
    Malformed {
        record: usize,
        line: RecordLine,
        content: String,
    },
}

#[derive(Debug, Clone)]
pub struct ReadRecord {
    pub header: String,
    pub seq: Vec<u8>,
    pub qual: Vec<u8>,
}

/// 可回绕的读段来源：逐条产出 FASTQ（4 行）或 FASTA（2 行）记录，
/// 两种格式可以混在同一个文件中。FASTA 记录的质量值统一合成为 'H'。
pub struct ReadSource<R: BufRead + Seek> {
    reader: R,
    buf: Vec<u8>,
    record: usize,
}

impl ReadSource<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let fh = File::open(path)?;
        Ok(Self::new(BufReader::new(fh)))
    }
}

impl<R: BufRead + Seek> ReadSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buf: Vec::new(), record: 0 }
    }

    /// 回到文件开头，重新扫描
    pub fn rewind(&mut self) -> Result<(), ReadError> {
        self.reader.seek(SeekFrom::Start(0))?;
        self.record = 0;
        Ok(())
    }

    /// Number of records yielded since the last rewind.
    pub fn records_read(&self) -> usize {
        self.record
    }

    /// 按字节读取，不要求 UTF-8；header 中的非法字节以替换字符保留。
    pub fn next_record(&mut self) -> Result<Option<ReadRecord>, ReadError> {
        // skip blank lines between records
        let line = loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
                return Ok(None);
            }
            let line = trim_newline(&self.buf);
            if !line.iter().all(u8::is_ascii_whitespace) {
                break line.to_vec();
            }
        };
        self.record += 1;

        match line.first() {
            Some(b'@') => {
                let header = String::from_utf8_lossy(&line[1..]).into_owned();
                let seq = self.required_line(RecordLine::Sequence)?;
                let sep = self.required_line(RecordLine::Separator)?;
                if sep.first() != Some(&b'+') {
                    return Err(self.malformed(RecordLine::Separator, &sep));
                }
                let qual = self.required_line(RecordLine::Quality)?;
                Ok(Some(ReadRecord { header, seq, qual }))
            }
            Some(b'>') => {
                let header = String::from_utf8_lossy(&line[1..]).into_owned();
                let seq = self.required_line(RecordLine::Sequence)?;
                let qual = vec![HIGH_QSCORE_CHAR; seq.len()];
                Ok(Some(ReadRecord { header, seq, qual }))
            }
            _ => Err(self.malformed(RecordLine::Header, &line)),
        }
    }

    fn required_line(&mut self, which: RecordLine) -> Result<Vec<u8>, ReadError> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Err(self.malformed(which, b""));
        }
        Ok(trim_newline(&self.buf).to_vec())
    }

    fn malformed(&self, line: RecordLine, content: &[u8]) -> ReadError {
        ReadError::Malformed {
            record: self.record,
            line,
            content: String::from_utf8_lossy(content).into_owned(),
        }
    }
}

fn trim_newline(line: &[u8]) -> &[u8] {
    let end = line.iter().rposition(|&b| b != b'\n' && b != b'\r').map_or(0, |i| i + 1);
    &line[..end]
}
