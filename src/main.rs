// This is the main file of AutoAssemb and where execution starts. It mainly handles the CLI and
// then calls into other files to run whichever subcommand the user chose.

// Copyright 2026 AutoAssemb contributors

// This file is part of AutoAssemb. AutoAssemb is free software: you can redistribute it and/or
// modify it under the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version. AutoAssemb
// is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
// implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General
// Public License for more details. You should have received a copy of the GNU General Public
// License along with AutoAssemb. If not, see <http://www.gnu.org/licenses/>.

use std::path::PathBuf;
use clap::{Parser, Subcommand, crate_version};

mod batch;
mod log;
mod metrics;
mod misc;
mod novoplasty;
mod pipeline;
mod relocate;
mod report;
mod samples;
mod stage;


#[derive(Parser)]
#[clap(name = "AutoAssemb",
       version = concat!("v", crate_version!()),
       about = "batch mitochondrial genome assembly from SRA accessions\n\
                prefetch > fastq-dump > FastQC > Trim Galore > FLASH > SPAdes > NOVOPlasty")]
#[command(author, version, long_about = None, disable_help_subcommand = true,
          propagate_version = true)]
#[clap(subcommand_required = true)]
#[clap(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {

    /// write a NOVOPlasty config file for one sample
    Config {
        /// SRA accession of the sample (required)
        #[clap(short = 's', long = "sample_id", required = true)]
        sample_id: String,

        /// Read length to put in the config (required)
        #[clap(short = 'l', long = "read_length", required = true)]
        read_length: u32,

        /// Path to seed FASTA (required)
        #[clap(long = "seed_file", required = true)]
        seed_file: PathBuf,

        /// Path to reference FASTA (required)
        #[clap(long = "refseq_file", required = true)]
        refseq_file: PathBuf,

        /// Directory containing the sample's SAMPLE_1.fastq and SAMPLE_2.fastq (required)
        #[clap(long = "reads_dir", required = true)]
        reads_dir: PathBuf,

        /// Isolate output directory, NOVOPlasty output goes in its NOVOPlasty subdirectory (required)
        #[clap(long = "output_dir", required = true)]
        output_dir: PathBuf,

        /// Config file to create (required)
        #[clap(short = 'o', long = "out_file", required = true)]
        out_file: PathBuf,
    },

    /// print the read length from a FastQC HTML report
    Readlen {
        /// FastQC HTML report (required)
        #[clap(short = 'i', long = "report", required = true)]
        report: PathBuf,
    },

    /// assemble mitochondrial genomes for every sample in a list
    Run {
        /// File with SRR IDs and isolate names, one per line, comma separated: SRR,ID (required)
        #[clap(long = "srr_list", required = true)]
        srr_list: PathBuf,

        /// Directory for output and final results (required)
        #[clap(long = "output_dir", required = true)]
        output_dir: PathBuf,

        /// Working directory for temp/intermediate files (required)
        #[clap(long = "work_dir", required = true)]
        work_dir: PathBuf,

        /// Path to seed FASTA (required)
        #[clap(long = "seed_file", required = true)]
        seed_file: PathBuf,

        /// Path to reference FASTA (required)
        #[clap(long = "refseq_file", required = true)]
        refseq_file: PathBuf,

        /// Log file for skipped SRRs
        #[clap(long = "log_file", default_value = "skipped_srr_ids.txt")]
        log_file: PathBuf,

        /// Number of FastQC threads
        #[clap(long = "fastqc_threads", default_value = "10")]
        fastqc_threads: usize,

        /// Number of Trim Galore cores
        #[clap(long = "trim_cores", default_value = "4")]
        trim_cores: usize,

        /// NOVOPlasty executable
        #[clap(long = "novoplasty", default_value = "NOVOPlasty4.3.5.pl")]
        novoplasty: String,

        /// Stop any tool that runs longer than this many minutes
        #[clap(long = "timeout", hide_default_value = true,
               help = "Stop any tool that runs longer than this many minutes [default: no limit]")]
        timeout: Option<u64>,

        /// Delete each sample's working directory after it finishes successfully
        #[clap(long = "clean")]
        clean: bool,
    },
}


fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config { sample_id, read_length, seed_file, refseq_file, reads_dir,
                                output_dir, out_file }) => {
            novoplasty::config(sample_id, read_length, seed_file, refseq_file, reads_dir,
                               output_dir, out_file);
        },
        Some(Commands::Readlen { report }) => {
            report::readlen(report);
        },
        Some(Commands::Run { srr_list, output_dir, work_dir, seed_file, refseq_file, log_file,
                             fastqc_threads, trim_cores, novoplasty, timeout, clean }) => {
            batch::run(srr_list, output_dir, work_dir, seed_file, refseq_file, log_file,
                       fastqc_threads, trim_cores, novoplasty, timeout, clean);
        },
        None => {}
    }
}
