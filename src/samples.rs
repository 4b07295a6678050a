// This file contains the SampleJob struct and the code for loading the sample list.

// Copyright 2026 AutoAssemb contributors

// This file is part of AutoAssemb. AutoAssemb is free software: you can redistribute it and/or
// modify it under the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version. AutoAssemb
// is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
// implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General
// Public License for more details. You should have received a copy of the GNU General Public
// License along with AutoAssemb. If not, see <http://www.gnu.org/licenses/>.

use std::path::{Path, PathBuf};

use crate::misc::{load_file_lines, quit_with_error};


/// One unit of work: an accession to download and assemble, plus where its files go.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleJob {
    pub sample_id: String,
    pub isolate_label: String,
    pub working_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl SampleJob {
    pub fn new(sample_id: &str, isolate_label: &str, work_root: &Path, out_root: &Path) -> Self {
        SampleJob {
            sample_id: sample_id.to_string(),
            isolate_label: isolate_label.to_string(),
            working_dir: work_root.join(sample_id),
            output_dir: out_root.join(isolate_label),
        }
    }

    pub fn forward_reads(&self) -> PathBuf { self.work_file(&format!("{}_1.fastq", self.sample_id)) }

    pub fn reverse_reads(&self) -> PathBuf { self.work_file(&format!("{}_2.fastq", self.sample_id)) }

    pub fn forward_trimmed(&self) -> PathBuf { self.work_file(&format!("{}_1_val_1.fq", self.sample_id)) }

    pub fn reverse_trimmed(&self) -> PathBuf { self.work_file(&format!("{}_2_val_2.fq", self.sample_id)) }

    pub fn qc_report(&self) -> PathBuf { self.work_file(&format!("{}_1_fastqc.html", self.sample_id)) }

    pub fn config_path(&self) -> PathBuf { self.work_file(&format!("config_{}.txt", self.sample_id)) }

    pub fn flash_prefix(&self) -> String { format!("flash_{}", self.sample_id) }

    pub fn spades_dir(&self) -> String { format!("spades_{}", self.sample_id) }

    pub fn novoplasty_dir(&self) -> PathBuf { self.output_dir.join("NOVOPlasty") }

    fn work_file(&self, name: &str) -> PathBuf { self.working_dir.join(name) }
}


pub fn load_sample_list(srr_list: &Path, work_dir: &Path, output_dir: &Path) -> Vec<SampleJob> {
    let lines = load_file_lines(srr_list);
    let jobs = parse_sample_lines(&lines, work_dir, output_dir);
    if jobs.is_empty() {
        quit_with_error(&format!("no samples found in {}", srr_list.display()));
    }
    jobs
}


pub fn parse_sample_lines(lines: &[String], work_dir: &Path, output_dir: &Path) -> Vec<SampleJob> {
    // Each non-blank line must be exactly "sample_id,isolate_label". Anything else is a problem
    // with the input file, not with a sample, so it stops the whole run.
    let mut jobs = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let line = line.trim();
        if line.is_empty() { continue; }
        let parts: Vec<&str> = line.split(',').map(|p| p.trim()).collect();
        if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) {
            quit_with_error(&format!("line {} of sample list is not formatted as \
                                      SRR_ID,ISOLATE_ID: {}", i + 1, line));
        }
        for part in &parts {
            if part.contains('/') || part.contains('\\') || *part == "." || *part == ".." {
                quit_with_error(&format!("line {} of sample list contains a name that cannot be \
                                          used as a directory: {}", i + 1, part));
            }
        }
        jobs.push(SampleJob::new(parts[0], parts[1], work_dir, output_dir));
    }
    jobs
}
