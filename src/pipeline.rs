// This file contains the per-sample pipeline: the fixed sequence of tools that takes one accession
// from download to a NOVOPlasty assembly.

// Copyright 2026 AutoAssemb contributors

// This file is part of AutoAssemb. AutoAssemb is free software: you can redistribute it and/or
// modify it under the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version. AutoAssemb
// is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
// implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General
// Public License for more details. You should have received a copy of the GNU General Public
// License along with AutoAssemb. If not, see <http://www.gnu.org/licenses/>.

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;

use crate::log::stage_header;
use crate::novoplasty::AssemblyConfig;
use crate::report::read_length_from_report;
use crate::samples::SampleJob;
use crate::stage::{run_stage, StageCommand, ToolRunner};


const TRIM_MIN_QUALITY: u32 = 30;
const TRIM_MIN_LENGTH: u32 = 20;
const MERGE_MIN_OVERLAP: u32 = 25;

pub const READ_LENGTH_FAILURE: &str = "Failed to extract sequence length";


/// Settings shared by every sample in a batch.
#[derive(Clone, Debug)]
pub struct PipelineSettings {
    pub seed_file: PathBuf,
    pub refseq_file: PathBuf,
    pub fastqc_threads: usize,
    pub trim_cores: usize,
    pub novoplasty: String,
}


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Split,
    QualityCheck,
    Trim,
    Merge,
    AssembleContigs,
    AssembleTarget,
}

impl Stage {
    pub const ALL: [Stage; 7] = [Stage::Fetch, Stage::Split, Stage::QualityCheck, Stage::Trim,
                                 Stage::Merge, Stage::AssembleContigs, Stage::AssembleTarget];

    pub fn tool_name(&self) -> &'static str {
        match self {
            Stage::Fetch           => "prefetch",
            Stage::Split           => "fastq-dump",
            Stage::QualityCheck    => "FastQC",
            Stage::Trim            => "TrimGalore",
            Stage::Merge           => "FLASH",
            Stage::AssembleContigs => "SPAdes",
            Stage::AssembleTarget  => "NOVOPlasty",
        }
    }

    pub fn failure_reason(&self) -> String {
        format!("{} failed", self.tool_name())
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetch           => "fetch",
            Stage::Split           => "split",
            Stage::QualityCheck    => "quality check",
            Stage::Trim            => "trim",
            Stage::Merge           => "merge",
            Stage::AssembleContigs => "assemble contigs",
            Stage::AssembleTarget  => "assemble mitogenome",
        };
        write!(f, "{}", name)
    }
}


/// Working state for one sample's run. The read length is set once (after quality check) and
/// an abort is permanent.
#[derive(Debug, Default)]
pub struct PipelineState {
    read_length: Option<u32>,
    current_stage: Option<Stage>,
    abort_reason: Option<String>,
    completed_stages: Vec<Stage>,
}

impl PipelineState {
    pub fn new() -> Self { Self::default() }

    pub fn read_length(&self) -> Option<u32> { self.read_length }

    pub fn current_stage(&self) -> Option<Stage> { self.current_stage }

    pub fn abort_reason(&self) -> Option<&str> { self.abort_reason.as_deref() }

    pub fn is_aborted(&self) -> bool { self.abort_reason.is_some() }

    pub fn completed_stages(&self) -> &[Stage] { &self.completed_stages }

    fn set_read_length(&mut self, read_length: u32) {
        assert!(self.read_length.is_none(), "read length can only be set once");
        self.read_length = Some(read_length);
    }

    fn abort(&mut self, reason: String) {
        if self.abort_reason.is_none() {
            self.abort_reason = Some(reason);
        }
    }
}


/// Runs the stages in order, stopping at the first one that fails. Returns whether the sample
/// completed along with the final state.
pub fn run_sample(job: &SampleJob, settings: &PipelineSettings, runner: &mut dyn ToolRunner)
        -> (bool, PipelineState) {
    let mut state = PipelineState::new();
    for stage in Stage::ALL {
        if state.is_aborted() { break; }
        state.current_stage = Some(stage);
        stage_header(&job.sample_id, &format!("{} ({})", stage, stage.tool_name()));
        match run_one_stage(stage, job, settings, runner, &mut state) {
            Ok(()) => state.completed_stages.push(stage),
            Err(reason) => {
                eprintln!("  {}", format!("{}: {}", job.sample_id, reason).red());
                state.abort(reason);
            }
        }
    }
    (!state.is_aborted(), state)
}


fn run_one_stage(stage: Stage, job: &SampleJob, settings: &PipelineSettings,
                 runner: &mut dyn ToolRunner, state: &mut PipelineState) -> Result<(), String> {
    if stage == Stage::AssembleTarget {
        write_assembly_config(job, settings, state)?;
    }
    let command = stage_command(stage, job, settings, state.read_length())?;
    eprintln!("  {}", command.command_line().dimmed());
    let result = run_stage(runner, &command, &job.working_dir);
    if !result.is_success() {
        eprintln!("  {} {} ({})", stage.tool_name(), result.classification, result.describe());
        return Err(stage.failure_reason());
    }
    if stage == Stage::QualityCheck {
        match read_length_from_report(&job.qc_report()) {
            Some(read_length) => {
                eprintln!("  read length: {} bp", read_length);
                state.set_read_length(read_length);
            }
            None => return Err(READ_LENGTH_FAILURE.to_string()),
        }
    }
    Ok(())
}


fn write_assembly_config(job: &SampleJob, settings: &PipelineSettings, state: &PipelineState)
        -> Result<(), String> {
    let read_length = state.read_length().ok_or_else(|| READ_LENGTH_FAILURE.to_string())?;
    let config = AssemblyConfig::for_sample(job, read_length, &settings.seed_file,
                                            &settings.refseq_file);
    let config_path = job.config_path();
    config.save(&config_path).map_err(|e| {
        eprintln!("  failed to write {}: {}", config_path.display(), e);
        "NOVOPlasty config could not be written".to_string()
    })
}


/// The exact command line for a stage. Only the split and quality-check stages declare outputs
/// that must exist afterwards; later stages are judged by exit status. Merging needs the read
/// length, so without one it fails with the same reason as a failed extraction.
pub fn stage_command(stage: Stage, job: &SampleJob, settings: &PipelineSettings,
                     read_length: Option<u32>) -> Result<StageCommand, String> {
    let id = &job.sample_id;
    let command = match stage {
        Stage::Fetch => StageCommand::new("prefetch").arg(id),
        Stage::Split => StageCommand::new("fastq-dump").arg("--split-3").arg(id)
            .requires(job.forward_reads())
            .requires(job.reverse_reads()),
        Stage::QualityCheck => StageCommand::new("fastqc").arg("-t").arg(settings.fastqc_threads)
            .path_arg(&job.forward_reads())
            .path_arg(&job.reverse_reads())
            .requires(job.qc_report()),
        Stage::Trim => StageCommand::new("trim_galore").arg("--paired")
            .arg("-q").arg(TRIM_MIN_QUALITY)
            .arg("--length").arg(TRIM_MIN_LENGTH)
            .arg("-j").arg(settings.trim_cores)
            .path_arg(&job.forward_reads())
            .path_arg(&job.reverse_reads()),
        Stage::Merge => {
            let max_overlap = read_length.ok_or_else(|| READ_LENGTH_FAILURE.to_string())?;
            StageCommand::new("flash").arg("-m").arg(MERGE_MIN_OVERLAP)
                .arg("-M").arg(max_overlap)
                .arg("-o").arg(job.flash_prefix())
                .path_arg(&job.forward_trimmed())
                .path_arg(&job.reverse_trimmed())
        }
        Stage::AssembleContigs => {
            let prefix = job.flash_prefix();
            StageCommand::new("spades.py")
                .arg("-1").arg(format!("{}.notCombined_1.fastq", prefix))
                .arg("-2").arg(format!("{}.notCombined_2.fastq", prefix))
                .arg("--merged").arg(format!("{}.extendedFrags.fastq", prefix))
                .arg("-o").arg(job.spades_dir())
        }
        Stage::AssembleTarget => StageCommand::new(&settings.novoplasty).arg("-c")
            .path_arg(&job.config_path()),
    };
    Ok(command)
}
