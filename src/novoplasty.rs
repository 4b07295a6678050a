// This file contains the code for building NOVOPlasty config files and for the autoassemb config
// subcommand, which writes one without running the pipeline.

// Copyright 2026 AutoAssemb contributors

// This file is part of AutoAssemb. AutoAssemb is free software: you can redistribute it and/or
// modify it under the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version. AutoAssemb
// is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
// implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General
// Public License for more details. You should have received a copy of the GNU General Public
// License along with AutoAssemb. If not, see <http://www.gnu.org/licenses/>.

use std::fs::File;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::log::{section_header, explanation};
use crate::misc::{check_if_file_exists, quit_with_error};
use crate::samples::SampleJob;


const GENOME_RANGE: (u32, u32) = (30000, 55000);
const KMER: u32 = 25;
const INSERT_SIZE: u32 = 300;
const KEY_WIDTH: usize = 22;


pub fn config(sample_id: String, read_length: u32, seed_file: PathBuf, refseq_file: PathBuf,
              reads_dir: PathBuf, output_dir: PathBuf, out_file: PathBuf) {
    check_settings(&seed_file, &refseq_file, read_length);
    starting_message();
    print_settings(&sample_id, read_length, &seed_file, &refseq_file, &reads_dir, &output_dir,
                   &out_file);
    let job = SampleJob { sample_id: sample_id.clone(), isolate_label: sample_id,
                          working_dir: reads_dir, output_dir };
    let config = AssemblyConfig::for_sample(&job, read_length, &seed_file, &refseq_file);
    if let Err(e) = config.save(&out_file) {
        quit_with_error(&format!("failed to write {}\n{}", out_file.display(), e));
    }
    section_header("Finished!");
    eprintln!("NOVOPlasty config: {}", out_file.display());
    eprintln!();
}


fn check_settings(seed_file: &Path, refseq_file: &Path, read_length: u32) {
    check_if_file_exists(seed_file);
    check_if_file_exists(refseq_file);
    if read_length == 0 {
        quit_with_error("--read_length must be at least 1");
    }
}


fn starting_message() {
    section_header("Starting autoassemb config");
    explanation("This command writes a NOVOPlasty config file for one sample, using the same \
                 settings as autoassemb run.");
}


fn print_settings(sample_id: &str, read_length: u32, seed_file: &Path, refseq_file: &Path,
                  reads_dir: &Path, output_dir: &Path, out_file: &Path) {
    eprintln!("Settings:");
    eprintln!("  --sample_id {}", sample_id);
    eprintln!("  --read_length {}", read_length);
    eprintln!("  --seed_file {}", seed_file.display());
    eprintln!("  --refseq_file {}", refseq_file.display());
    eprintln!("  --reads_dir {}", reads_dir.display());
    eprintln!("  --output_dir {}", output_dir.display());
    eprintln!("  --out_file {}", out_file.display());
    eprintln!();
}


/// Everything NOVOPlasty needs for one sample. It is built right before the tool runs and the
/// text form is the only thing that outlives it.
#[derive(Clone, Debug, PartialEq)]
pub struct AssemblyConfig {
    pub project_name: String,
    pub genome_range: (u32, u32),
    pub kmer: u32,
    pub seed_file: PathBuf,
    pub refseq_file: PathBuf,
    pub read_length: u32,
    pub insert_size: u32,
    pub forward_reads: PathBuf,
    pub reverse_reads: PathBuf,
    pub output_path: PathBuf,
}

impl AssemblyConfig {
    pub fn for_sample(job: &SampleJob, read_length: u32, seed_file: &Path,
                      refseq_file: &Path) -> Self {
        AssemblyConfig {
            project_name: format!("{}_mito", job.sample_id),
            genome_range: GENOME_RANGE,
            kmer: KMER,
            seed_file: seed_file.to_path_buf(),
            refseq_file: refseq_file.to_path_buf(),
            read_length,
            insert_size: INSERT_SIZE,
            forward_reads: job.forward_reads(),
            reverse_reads: job.reverse_reads(),
            output_path: job.novoplasty_dir(),
        }
    }

    /// NOVOPlasty reads its config by line position and label, so section order, key spelling
    /// (including its typos) and the blank values all have to stay exactly as they are.
    pub fn to_text(&self) -> String {
        let genome_range = format!("{}-{}", self.genome_range.0, self.genome_range.1);
        let kmer = self.kmer.to_string();
        let seed = self.seed_file.display().to_string();
        let refseq = self.refseq_file.display().to_string();
        let read_length = self.read_length.to_string();
        let insert_size = self.insert_size.to_string();
        let forward = self.forward_reads.display().to_string();
        let reverse = self.reverse_reads.display().to_string();

        // NOVOPlasty appends file names directly to the output path.
        let output = format!("{}{}", self.output_path.display(), std::path::MAIN_SEPARATOR);

        let sections: [(&str, Vec<(&str, &str)>); 4] = [
            ("Project", vec![
                ("Project name", self.project_name.as_str()),
                ("Type", "mito"),
                ("Genome Range", genome_range.as_str()),
                ("K-mer", kmer.as_str()),
                ("Max memory", ""),
                ("Extended log", "0"),
                ("Save assembled reads", "no"),
                ("Seed Input", seed.as_str()),
                ("Extend seed directly", "no"),
                ("Reference sequence", refseq.as_str()),
                ("Variance detection", ""),
                ("Chloroplast sequence", ""),
            ]),
            ("Dataset 1", vec![
                ("Read Length", read_length.as_str()),
                ("Insert size", insert_size.as_str()),
                ("Platform", "illumina"),
                ("Single/Paired", "PE"),
                ("Combined reads", ""),
                ("Forward reads", forward.as_str()),
                ("Reverse reads", reverse.as_str()),
                ("Store Hash", ""),
            ]),
            ("Heteroplasmy", vec![
                ("MAF", ""),
                ("HP exclude list", ""),
                ("PCR-free", ""),
            ]),
            ("Optional", vec![
                ("Insert size auto", "yes"),
                ("Use Quality Scores", "no"),
                ("Reduce ambigious N's", ""),
                ("Output path", output.as_str()),
            ]),
        ];

        let mut text = String::new();
        for (i, (title, entries)) in sections.iter().enumerate() {
            if i > 0 { text.push('\n'); }
            text.push_str(&format!("{}:\n-----------------------\n", title));
            for (key, value) in entries {
                text.push_str(&config_line(key, value));
                text.push('\n');
            }
        }
        text
    }

    pub fn save(&self, filename: &Path) -> io::Result<()> {
        let mut file = File::create(filename)?;
        file.write_all(self.to_text().as_bytes())?;
        Ok(())
    }
}


fn config_line(key: &str, value: &str) -> String {
    if value.is_empty() {
        format!("{:<width$}=", key, width = KEY_WIDTH)
    } else {
        format!("{:<width$}= {}", key, value, width = KEY_WIDTH)
    }
}
