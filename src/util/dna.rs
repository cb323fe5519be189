/// 仅把小写的 t/c/a/g 转为大写，其余字节（N、IUPAC 码等）保持原样。
/// 不认识的碱基不会被改成 N，否则会与真正的 N 混淆。
pub fn uc_only_acgt(seq: &mut [u8]) {
    for b in seq.iter_mut() {
        if matches!(*b, b'a' | b'c' | b'g' | b't') {
            b.make_ascii_uppercase();
        }
    }
}

#[inline]
pub fn is_canonical(base: u8) -> bool {
    matches!(base, b'A' | b'C' | b'G' | b'T')
}

/// Complement of an upper-case base. Anything outside A/C/G/T maps to itself.
#[inline]
pub fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        other => other,
    }
}

pub fn revcomp(seq: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(seq.len());
    for &b in seq.iter().rev() {
        out.push(complement(b));
    }
    out
}

pub fn revcomp_in_place(seq: &mut [u8]) {
    seq.reverse();
    for b in seq.iter_mut() {
        *b = complement(*b);
    }
}

/// 第一次出现的位置（与 strstr 的语义一致）
pub fn find_subseq(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
