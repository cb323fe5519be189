pub mod emitter;
pub mod fastq;
pub mod reads;
