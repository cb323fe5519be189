use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use grepwalk::assemble::driver::orient;
use grepwalk::assemble::{assemble, AssemblyConfig, AssemblyContext, OrientedRead, Strand};
use grepwalk::io::emitter::FastaEmitter;
use grepwalk::io::fastq::FastqRecord;
use grepwalk::io::reads::ReadSource;
use grepwalk::preprocess::merge_pair;
use grepwalk::util::dna;

fn make_reference(len: usize) -> Vec<u8> {
    let bases = [b'A', b'C', b'G', b'T'];
    let mut seq = Vec::with_capacity(len);
    let mut x: u32 = 42;
    for _ in 0..len {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        seq.push(bases[(x >> 16) as usize % 4]);
    }
    seq
}

/// 100 bp reads every `step` bp on both strands, as FASTQ
fn make_reads(reference: &[u8], step: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for start in (0..=reference.len() - 100).step_by(step) {
        let fwd = &reference[start..start + 100];
        for (tag, seq) in [("f", fwd.to_vec()), ("r", dna::revcomp(fwd))] {
            out.extend_from_slice(format!("@{}{}\n", tag, start).as_bytes());
            out.extend_from_slice(&seq);
            out.extend_from_slice(b"\n+\n");
            out.extend_from_slice(&[b'I'; 100]);
            out.push(b'\n');
        }
    }
    out
}

fn bench_orient(c: &mut Criterion) {
    let reference = make_reference(1_000);
    let read = dna::revcomp(&reference[200..300]);
    let seed = reference[230..262].to_vec();

    c.bench_function("orient_100bp_reverse", |b| {
        b.iter(|| {
            black_box(orient(black_box(read.clone()), vec![b'I'; 100], black_box(&seed)));
        })
    });
}

fn bench_examine(c: &mut Criterion) {
    let reference = make_reference(1_000);
    let config = AssemblyConfig {
        seed: String::from_utf8_lossy(&reference[0..31]).into_owned(),
        strand_depth: 1_000_000,
        capacity: 4,
        ..Default::default()
    };
    let read = OrientedRead {
        seq: reference[0..100].to_vec(),
        qual: vec![b'I'; 100],
        strand: Strand::Plus,
    };

    c.bench_function("examine_nominated", |b| {
        let mut ctx = AssemblyContext::new(&config);
        let mut sink = FastaEmitter::new(std::io::sink(), 50);
        b.iter(|| {
            black_box(ctx.examine(black_box(&read), &mut sink).ok());
        })
    });
}

fn bench_walk(c: &mut Criterion) {
    let reference = make_reference(5_000);
    let reads = make_reads(&reference, 5);
    let config = AssemblyConfig {
        seed: String::from_utf8_lossy(&reference[100..131]).into_owned(),
        strand_depth: 2,
        ..Default::default()
    };

    c.bench_function("walk_5kb_genome", |b| {
        b.iter(|| {
            let mut source = ReadSource::new(Cursor::new(reads.as_slice()));
            let mut sink = FastaEmitter::new(std::io::sink(), 50);
            let mut ctx = AssemblyContext::new(&config);
            black_box(assemble(&mut ctx, &mut source, &mut sink).ok());
        })
    });
}

fn bench_merge_pair(c: &mut Criterion) {
    let reference = make_reference(300);
    let r1 = FastqRecord {
        header: "p/1".to_string(),
        seq: reference[0..150].to_vec(),
        plus: String::new(),
        qual: vec![b'I'; 150],
    };
    let r2 = FastqRecord {
        header: "p/2".to_string(),
        seq: dna::revcomp(&reference[100..250]),
        plus: String::new(),
        qual: vec![b'I'; 150],
    };

    c.bench_function("merge_pair_150bp", |b| {
        b.iter(|| {
            black_box(merge_pair(black_box(&r1), black_box(&r2), 32));
        })
    });
}

criterion_group!(benches, bench_orient, bench_examine, bench_walk, bench_merge_pair);
criterion_main!(benches);
