use std::io::Cursor;

use grepwalk::assemble::{
    assemble, AssemblyConfig, AssemblyContext, AssemblyOutcome, TerminationReason,
};
use grepwalk::io::emitter::FastaEmitter;
use grepwalk::io::reads::ReadSource;
use grepwalk::util::dna;

fn make_genome(len: usize) -> Vec<u8> {
    let bases = [b'A', b'C', b'G', b'T'];
    let mut seq = Vec::with_capacity(len);
    let mut x: u32 = 42;
    for _ in 0..len {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        seq.push(bases[(x >> 16) as usize % 4]);
    }
    seq
}

/// 100 bp reads every 5 bp; FASTQ for the forward copy, FASTA for the reverse.
fn shotgun(genome: &[u8], both_strands: bool) -> Vec<u8> {
    let mut out = Vec::new();
    for start in (0..=genome.len() - 100).step_by(5) {
        let read = &genome[start..start + 100];
        out.extend_from_slice(format!("@f{}\n", start).as_bytes());
        out.extend_from_slice(read);
        out.extend_from_slice(b"\n+\n");
        out.extend_from_slice(&[b'I'; 100]);
        out.push(b'\n');
        if both_strands {
            out.extend_from_slice(format!(">r{}\n", start).as_bytes());
            out.extend_from_slice(&dna::revcomp(read));
            out.push(b'\n');
        }
    }
    out
}

fn walk(genome: &[u8], both_strands: bool, ignore_strand: bool) -> (String, AssemblyOutcome) {
    let config = AssemblyConfig {
        seed: String::from_utf8(genome[100..131].to_vec()).unwrap(),
        strand_depth: 2,
        ignore_strand,
        ..Default::default()
    };
    config.validate().unwrap();

    let mut source = ReadSource::new(Cursor::new(shotgun(genome, both_strands)));
    let mut emitter = FastaEmitter::new(Vec::new(), 60);
    emitter.write_header("walk").unwrap();
    let mut ctx = AssemblyContext::new(&config);
    let outcome = assemble(&mut ctx, &mut source, &mut emitter).unwrap();
    (String::from_utf8(emitter.into_inner()).unwrap(), outcome)
}

fn contig_of(fasta: &str) -> String {
    let mut lines = fasta.lines();
    assert_eq!(lines.next(), Some(">walk"));
    lines.collect()
}

#[test]
fn walks_synthetic_genome_on_both_strands() {
    let genome = make_genome(1000);
    let (fasta, outcome) = walk(&genome, true, false);

    // the window 932..996 is covered only by the read at 900, but the table
    // survives the rewind, so that read counts once per pass and confirms
    let contig = contig_of(&fasta);
    assert_eq!(contig.as_bytes(), &genome[100..996]);
    assert_eq!(outcome.assembled_length, 896);
    assert_eq!(outcome.extensions, 27);
    assert_eq!(outcome.termination, TerminationReason::Exhausted);
    assert!(outcome.endgame.is_none());
    assert!(fasta.lines().skip(1).all(|l| l.len() <= 60));
}

#[test]
fn forward_only_reads_need_ignore_strand() {
    let genome = make_genome(1000);

    let (fasta, outcome) = walk(&genome, false, false);
    assert_eq!(contig_of(&fasta).as_bytes(), &genome[100..131]);
    assert_eq!(outcome.extensions, 0);
    assert_eq!(outcome.passes, 1);

    let (fasta, outcome) = walk(&genome, false, true);
    assert_eq!(contig_of(&fasta).as_bytes(), &genome[100..996]);
    assert_eq!(outcome.assembled_length, 896);
    assert_eq!(outcome.extensions, 27);
}

#[test]
fn length_ceiling_stops_the_walk() {
    let genome = make_genome(1000);
    let config = AssemblyConfig {
        seed: String::from_utf8(genome[100..131].to_vec()).unwrap(),
        strand_depth: 2,
        max_length: 200,
        ..Default::default()
    };
    let mut source = ReadSource::new(Cursor::new(shotgun(&genome, true)));
    let mut emitter = FastaEmitter::new(Vec::new(), 50);
    let mut ctx = AssemblyContext::new(&config);
    let outcome = assemble(&mut ctx, &mut source, &mut emitter).unwrap();

    assert_eq!(outcome.termination, TerminationReason::LengthCeiling);
    // 31 + 33 + 32 * 5 = 224 is the first length past 200
    assert_eq!(outcome.assembled_length, 224);
    assert_eq!(emitter.termination(), Some(TerminationReason::LengthCeiling));
}
