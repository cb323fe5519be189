use anyhow::{anyhow, Result};
use std::io::{BufRead, Write};

/// 四行 FASTQ 记录。header / plus 保留原始文本（不含 '@' / '+'），
/// 以便预处理命令原样写回未改动的记录。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    pub header: String,
    pub seq: Vec<u8>,
    pub plus: String,
    pub qual: Vec<u8>,
}

impl FastqRecord {
    /// Read ID: the header up to the first whitespace.
    pub fn id(&self) -> &str {
        self.header.split_whitespace().next().unwrap_or("")
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "@{}", self.header)?;
        out.write_all(&self.seq)?;
        writeln!(out)?;
        writeln!(out, "+{}", self.plus)?;
        out.write_all(&self.qual)?;
        writeln!(out)
    }
}

/// 预处理命令用的严格 FASTQ 读取器：只接受四行记录，
/// 错误信息带上记录序号（从 1 开始）。
pub struct FastqReader<R: BufRead> {
    reader: R,
    line: String,
    records: u64,
}

impl<R: BufRead> FastqReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line: String::new(), records: 0 }
    }

    /// 读取下一行并去掉行尾换行；文件结束时返回 `None`
    fn next_line(&mut self) -> Result<Option<&str>> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }
        Ok(Some(self.line.trim_end_matches(['\n', '\r'])))
    }

    fn expect_line(&mut self, what: &str) -> Result<String> {
        let n = self.records;
        match self.next_line()? {
            Some(l) => Ok(l.to_string()),
            None => Err(anyhow!("FASTQ record {}: missing {} line", n, what)),
        }
    }

    pub fn next_record(&mut self) -> Result<Option<FastqRecord>> {
        let n = self.records + 1;
        let header = match self.next_line()? {
            None => return Ok(None),
            Some(l) => match l.strip_prefix('@') {
                Some(h) => h.to_string(),
                None => {
                    return Err(anyhow!("FASTQ record {}: header must start with '@': {}", n, l));
                }
            },
        };
        self.records = n;

        let seq = self.expect_line("sequence")?.into_bytes();
        let plus = match self.expect_line("'+'")?.strip_prefix('+') {
            Some(p) => p.to_string(),
            None => {
                let n = self.records;
                return Err(anyhow!("FASTQ record {} ('{}'): missing '+' line", n, header));
            }
        };
        let qual = self.expect_line("quality")?.into_bytes();
        if qual.len() != seq.len() {
            return Err(anyhow!(
                "FASTQ record {} ('{}'): {} bases but {} quality scores",
                self.records,
                header,
                seq.len(),
                qual.len()
            ));
        }
        Ok(Some(FastqRecord { header, seq, plus, qual }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parse_and_write_back() {
        let data = b"@r1 1:N:0\nACGT\n+r1\nIIII\n@r2\nGG\n+\n##\n";
        let mut r = FastqReader::new(Cursor::new(&data[..]));

        let r1 = r.next_record().unwrap().unwrap();
        assert_eq!(r1.id(), "r1");
        assert_eq!(r1.plus, "r1");
        let r2 = r.next_record().unwrap().unwrap();
        assert_eq!(r2.seq, b"GG");
        assert!(r.next_record().unwrap().is_none());

        let mut out = Vec::new();
        r1.write_to(&mut out).unwrap();
        r2.write_to(&mut out).unwrap();
        assert_eq!(out, data.to_vec());
    }

    #[test]
    fn rejects_length_mismatch_and_truncation() {
        let mut r = FastqReader::new(Cursor::new(&b"@r1\nACGT\n+\nIII\n"[..]));
        assert!(r.next_record().is_err());

        let mut r = FastqReader::new(Cursor::new(&b"@r1\nACGT\n"[..]));
        assert!(r.next_record().is_err());
    }

    #[test]
    fn error_names_the_record() {
        let mut r = FastqReader::new(Cursor::new(&b"@r1\nAC\n+\nII\nr2\nAC\n+\nII\n"[..]));
        assert!(r.next_record().unwrap().is_some());
        let err = r.next_record().unwrap_err().to_string();
        assert!(err.contains("record 2"), "{err}");
    }
}
