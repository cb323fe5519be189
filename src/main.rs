use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use grepwalk::assemble::config::{
    DEFAULT_CAPACITY, DEFAULT_MAX_LENGTH, DEFAULT_MIN_QSCORE, DEFAULT_SEED, DEFAULT_SLIDE,
    DEFAULT_STRAND_DEPTH, DEFAULT_WINDOW,
};
use grepwalk::assemble::nominee::write_nominee_tsv;
use grepwalk::assemble::{assemble, AssembleError, AssemblyConfig, AssemblyContext, AssemblyReport};
use grepwalk::io::emitter::{FastaEmitter, DEFAULT_COLUMNS};
use grepwalk::io::reads::{ReadError, ReadSource};
use grepwalk::preprocess::{self, MergeOptions, TrimOptions};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

// 退出码：0 正常结束；配置错误见 `ConfigError::exit_code`；其余错误为 1
const EXIT_CAPACITY_EXCEEDED: u8 = 2;
const EXIT_OPEN_FAILED: u8 = 222;
const EXIT_MALFORMED_READS: u8 = 223;

#[derive(Parser, Debug)]
#[command(
    name = "grepwalk",
    author,
    version,
    about = "Seed-and-extend assembler for small genomes",
    arg_required_else_help = true
)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extend a seed sequence through reads (FASTQ and/or FASTA)
    Assemble(AssembleArgs),
    /// Trim low-quality bases from both ends of each read
    Trim {
        /// Input FASTQ file
        fastq: String,
        #[arg(short = 'q', long = "min-qscore", default_value_t = DEFAULT_MIN_QSCORE)]
        min_qscore: i32,
        /// Keep only the read ID in headers and drop the '+' line text
        #[arg(short = 'p', long = "slim")]
        slim: bool,
        /// Output FASTQ path (stdout if omitted)
        #[arg(long)]
        out: Option<String>,
    },
    /// Count reads, high-quality bases and all bases
    Count {
        fastq: String,
        #[arg(short = 'q', long = "min-qscore", default_value_t = DEFAULT_MIN_QSCORE)]
        min_qscore: i32,
    },
    /// Merge overlapping paired-end reads
    Merge {
        /// Read 1 FASTQ file
        read1: String,
        /// Read 2 FASTQ file
        read2: String,
        #[arg(
            short = 'm',
            long = "min-overlap",
            default_value_t = preprocess::merge::DEFAULT_MIN_OVERLAP
        )]
        min_overlap: usize,
        /// Only list the headers of merged pairs
        #[arg(short = 'i', long = "ids-only")]
        ids_only: bool,
        #[arg(long)]
        out: Option<String>,
    },
}

#[derive(Args, Debug)]
struct AssembleArgs {
    /// Reads file (FASTQ, FASTA or a mix of both)
    reads: String,
    #[arg(short = 's', long, default_value = DEFAULT_SEED)]
    seed: String,
    #[arg(short = 'w', long, default_value_t = DEFAULT_WINDOW)]
    window: usize,
    #[arg(short = 'l', long, default_value_t = DEFAULT_SLIDE)]
    slide: usize,
    /// Depth required on each strand to confirm an extension
    #[arg(short = 'd', long, default_value_t = DEFAULT_STRAND_DEPTH)]
    depth: u32,
    #[arg(short = 'q', long = "min-qscore", default_value_t = DEFAULT_MIN_QSCORE)]
    min_qscore: i32,
    #[arg(short = 'x', long = "max-length", default_value_t = DEFAULT_MAX_LENGTH)]
    max_length: usize,
    /// Sum both strands instead of requiring depth on each
    #[arg(short = 'r', long = "ignore-strand")]
    ignore_strand: bool,
    /// Extend from the reverse complement of the seed
    #[arg(short = 'c', long)]
    complement: bool,
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,
    /// Contig name written on the FASTA header line
    #[arg(short = 'n', long)]
    name: Option<String>,
    #[arg(short = 'o', long, default_value_t = DEFAULT_COLUMNS)]
    columns: usize,
    /// Dump the final nominee table to stderr
    #[arg(short = 'e', long = "print-nominees")]
    print_nominees: bool,
    /// Write a JSON run report to this path
    #[arg(long)]
    report: Option<String>,
    /// Output FASTA path (stdout if omitted)
    #[arg(long)]
    out: Option<String>,
}

impl AssembleArgs {
    fn config(&self) -> AssemblyConfig {
        AssemblyConfig {
            seed: self.seed.clone(),
            window: self.window,
            slide: self.slide,
            strand_depth: self.depth,
            min_qscore: self.min_qscore,
            max_length: self.max_length,
            ignore_strand: self.ignore_strand,
            complement: self.complement,
            capacity: self.capacity,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("grepwalk=debug,info")
    } else {
        EnvFilter::new("grepwalk=warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Commands::Assemble(args) => run_assemble(&args),
        Commands::Trim { fastq, min_qscore, slim, out } => {
            run_trim(&fastq, out.as_deref(), TrimOptions { min_qscore, slim })?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Count { fastq, min_qscore } => {
            run_count(&fastq, min_qscore)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Merge { read1, read2, min_overlap, ids_only, out } => {
            run_merge(&read1, &read2, out.as_deref(), MergeOptions { min_overlap, ids_only })?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn open_input(path: &str) -> Result<BufReader<File>> {
    let fh = File::open(path).map_err(|e| anyhow!("cannot open '{}': {}", path, e))?;
    Ok(BufReader::new(fh))
}

fn open_output(path: Option<&str>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => {
            let fh = File::create(p).map_err(|e| anyhow!("cannot create '{}': {}", p, e))?;
            Box::new(BufWriter::new(fh))
        }
        None => Box::new(BufWriter::new(std::io::stdout())),
    })
}

fn run_assemble(args: &AssembleArgs) -> Result<ExitCode> {
    let config = args.config();
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return Ok(ExitCode::from(e.exit_code()));
    }

    let started = chrono::Utc::now();
    let name = args.name.clone().unwrap_or_else(|| {
        format!("grepwalk {} ({})", env!("CARGO_PKG_VERSION"), started.timestamp())
    });

    let mut source = match ReadSource::open(&args.reads) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: cannot open reads '{}': {}", args.reads, e);
            return Ok(ExitCode::from(EXIT_OPEN_FAILED));
        }
    };
    let mut emitter = FastaEmitter::new(open_output(args.out.as_deref())?, args.columns);
    emitter.write_header(&name)?;

    info!(
        seed = %config.seed,
        window = config.window,
        slide = config.slide,
        depth = config.strand_depth,
        "assembling {}",
        args.reads
    );
    let mut ctx = AssemblyContext::new(&config);
    let (report, code) = match assemble(&mut ctx, &mut source, &mut emitter) {
        Ok(outcome) => {
            if args.print_nominees {
                write_nominee_tsv(&outcome.nominees, &mut std::io::stderr().lock())?;
            }
            (AssemblyReport::from_outcome(&name, &config, started, &outcome), ExitCode::SUCCESS)
        }
        Err(AssembleError::CapacityExceeded { capacity }) => {
            eprintln!(
                "nominee table is full ({} candidates); try a longer seed or a larger window",
                capacity
            );
            if args.print_nominees {
                write_nominee_tsv(ctx.table().entries(), &mut std::io::stderr().lock())?;
            }
            (
                AssemblyReport::from_overflow(&name, &config, started, &ctx),
                ExitCode::from(EXIT_CAPACITY_EXCEEDED),
            )
        }
        Err(AssembleError::Read(e @ ReadError::Malformed { .. })) => {
            eprintln!("Error: {}: {}", args.reads, e);
            return Ok(ExitCode::from(EXIT_MALFORMED_READS));
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(path) = &args.report {
        let fh = File::create(path).map_err(|e| anyhow!("cannot create report '{}': {}", path, e))?;
        serde_json::to_writer_pretty(BufWriter::new(fh), &report)?;
    }
    Ok(code)
}

fn run_trim(path: &str, out_path: Option<&str>, opts: TrimOptions) -> Result<()> {
    let mut out = open_output(out_path)?;
    let stats = preprocess::trim_low_quality_bases(open_input(path)?, &mut out, &opts)?;
    out.flush()?;
    info!(
        reads = stats.reads,
        trimmed_bases = stats.trimmed_bases,
        masked = stats.masked_reads,
        "trimmed {}",
        path
    );
    Ok(())
}

fn run_count(path: &str, min_qscore: i32) -> Result<()> {
    let counts = preprocess::count_reads_bases(open_input(path)?, min_qscore)?;
    println!("{}\t{}\t{}", counts.reads, counts.high_quality, counts.bases);
    Ok(())
}

fn run_merge(read1: &str, read2: &str, out_path: Option<&str>, opts: MergeOptions) -> Result<()> {
    let mut out = open_output(out_path)?;
    let stats = preprocess::merge_fastq(open_input(read1)?, open_input(read2)?, &mut out, &opts)?;
    out.flush()?;
    info!(
        pairs = stats.pairs,
        merged = stats.merged,
        repeats = stats.repeats_skipped,
        "merged {} and {}",
        read1,
        read2
    );
    Ok(())
}
