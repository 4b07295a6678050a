// This file contains the code for the autoassemb run subcommand, which works through the sample
// list one sample at a time.

// Copyright 2026 AutoAssemb contributors

// This file is part of AutoAssemb. AutoAssemb is free software: you can redistribute it and/or
// modify it under the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version. AutoAssemb
// is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
// implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General
// Public License for more details. You should have received a copy of the GNU General Public
// License along with AutoAssemb. If not, see <http://www.gnu.org/licenses/>.

use colored::Colorize;
use std::fs::{self, OpenOptions};
use std::io;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::log::{section_header, explanation, warning};
use crate::metrics::BatchMetrics;
use crate::misc::{check_if_dir_is_not_dir, check_if_file_exists, check_requirements, create_dir,
                  format_duration, quit_with_error};
use crate::pipeline::{run_sample, PipelineSettings, Stage};
use crate::relocate::{clean_working_dir, relocate_artifacts};
use crate::samples::{load_sample_list, SampleJob};
use crate::stage::{SystemRunner, ToolRunner};


static INTERRUPTED: AtomicBool = AtomicBool::new(false);


pub fn run(srr_list: PathBuf, output_dir: PathBuf, work_dir: PathBuf, seed_file: PathBuf,
           refseq_file: PathBuf, log_file: PathBuf, fastqc_threads: usize, trim_cores: usize,
           novoplasty: String, timeout: Option<u64>, clean: bool) {
    check_settings(&srr_list, &output_dir, &work_dir, &seed_file, &refseq_file, fastqc_threads,
                   trim_cores, timeout);
    starting_message();
    print_settings(&srr_list, &output_dir, &work_dir, &seed_file, &refseq_file, &log_file,
                   fastqc_threads, trim_cores, &novoplasty, timeout, clean);
    check_requirements(&["prefetch", "fastq-dump", "fastqc", "trim_galore", "flash", "spades.py",
                         novoplasty.as_str()]);
    create_dir(&output_dir);
    create_dir(&work_dir);

    // Tools run inside each sample's working directory, so every path handed to them (including
    // the ones written into the NOVOPlasty config) has to be absolute.
    let output_dir = absolute_path(&output_dir);
    let work_dir = absolute_path(&work_dir);
    let settings = PipelineSettings { seed_file: absolute_path(&seed_file),
                                      refseq_file: absolute_path(&refseq_file),
                                      fastqc_threads, trim_cores, novoplasty };

    let jobs = load_sample_list(&srr_list, &work_dir, &output_dir);
    eprintln!("Loaded {} sample{} from {}", jobs.len(), if jobs.len() == 1 { "" } else { "s" },
              srr_list.display());
    install_interrupt_handler();

    let mut runner = SystemRunner::new(timeout_duration(timeout)).with_stop_flag(&INTERRUPTED);
    let metrics = run_all(&jobs, &settings, &mut runner, &log_file, clean, &INTERRUPTED);
    let summary_yaml = output_dir.join("autoassemb.yaml");
    if let Err(e) = metrics.save_to_yaml(&summary_yaml) {
        warning(&format!("failed to write {}\n{}", summary_yaml.display(), e));
    }
    finished_message(&metrics, &log_file, &summary_yaml);
}


fn check_settings(srr_list: &Path, output_dir: &Path, work_dir: &Path, seed_file: &Path,
                  refseq_file: &Path, fastqc_threads: usize, trim_cores: usize,
                  timeout: Option<u64>) {
    check_if_file_exists(srr_list);
    check_if_file_exists(seed_file);
    check_if_file_exists(refseq_file);
    check_if_dir_is_not_dir(output_dir);
    check_if_dir_is_not_dir(work_dir);
    if fastqc_threads < 1 {
        quit_with_error("--fastqc_threads must be at least 1");
    }
    if trim_cores < 1 {
        quit_with_error("--trim_cores must be at least 1");
    }
    if timeout == Some(0) {
        quit_with_error("--timeout must be at least 1");
    }
}


fn starting_message() {
    section_header("Starting autoassemb run");
    explanation("This command downloads each accession in the sample list, checks and trims its \
                 reads, merges read pairs, assembles them with SPAdes and then assembles the \
                 mitochondrial genome with NOVOPlasty. Samples are processed one at a time and a \
                 sample that fails at any step is skipped and recorded in the log file.");
}


fn print_settings(srr_list: &Path, output_dir: &Path, work_dir: &Path, seed_file: &Path,
                  refseq_file: &Path, log_file: &Path, fastqc_threads: usize, trim_cores: usize,
                  novoplasty: &str, timeout: Option<u64>, clean: bool) {
    eprintln!("Settings:");
    eprintln!("  --srr_list {}", srr_list.display());
    eprintln!("  --output_dir {}", output_dir.display());
    eprintln!("  --work_dir {}", work_dir.display());
    eprintln!("  --seed_file {}", seed_file.display());
    eprintln!("  --refseq_file {}", refseq_file.display());
    eprintln!("  --log_file {}", log_file.display());
    eprintln!("  --fastqc_threads {}", fastqc_threads);
    eprintln!("  --trim_cores {}", trim_cores);
    eprintln!("  --novoplasty {}", novoplasty);
    if let Some(minutes) = timeout {
        eprintln!("  --timeout {}", minutes);
    }
    if clean {
        eprintln!("  --clean");
    }
    eprintln!();
}


fn finished_message(metrics: &BatchMetrics, log_file: &Path, summary_yaml: &Path) {
    section_header("Finished!");
    eprintln!("Samples completed: {}", metrics.completed_count.to_string().green());
    eprintln!("Samples skipped:   {}", metrics.skipped_count.to_string().red());
    eprintln!("Run time:          {}", metrics.run_time);
    if metrics.skipped_count > 0 {
        eprintln!("Skipped samples are listed in {}", log_file.display());
    }
    eprintln!("Summary: {}", summary_yaml.display());
    eprintln!();
}


/// Very large values just mean no practical limit.
fn timeout_duration(minutes: Option<u64>) -> Option<Duration> {
    minutes.map(|m| Duration::from_secs(m.saturating_mul(60)))
}


fn absolute_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|e| {
        quit_with_error(&format!("failed to resolve path {}\n{}", path.display(), e));
    })
}


fn install_interrupt_handler() {
    // The tools share our process group, so Ctrl-C already stops the running one. The flag stops
    // any further tools from starting and ends the batch without logging the interrupted sample
    // as skipped. A second Ctrl-C quits immediately.
    let result = ctrlc::set_handler(|| {
        if INTERRUPTED.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }
        eprintln!();
        eprintln!("{}", "Interrupted: stopping the batch".red());
    });
    if let Err(e) = result {
        warning(&format!("could not install Ctrl-C handler\n{}", e));
    }
}


/// Runs every sample in order. A failing (or even panicking) sample is logged and skipped, and
/// never stops the samples after it. Only an interrupt ends the batch early.
pub fn run_all(jobs: &[SampleJob], settings: &PipelineSettings, runner: &mut dyn ToolRunner,
               log_file: &Path, clean: bool, interrupted: &AtomicBool) -> BatchMetrics {
    let start = Instant::now();
    let mut metrics = BatchMetrics::new();
    for (i, job) in jobs.iter().enumerate() {
        if interrupted.load(Ordering::SeqCst) {
            warning(&format!("batch interrupted, {} sample(s) not started", jobs.len() - i));
            break;
        }
        section_header(&format!("Sample {}/{}: {} ({})", i + 1, jobs.len(), job.sample_id,
                                job.isolate_label));
        match process_sample(job, settings, runner, clean) {
            Ok(read_length) => {
                eprintln!("{}", format!("Finished {}", job.sample_id).green());
                metrics.add_completed(&job.sample_id, &job.isolate_label, read_length);
            }
            Err(_) if interrupted.load(Ordering::SeqCst) => {
                warning(&format!("{} was interrupted and is not logged as skipped",
                                 job.sample_id));
                break;
            }
            Err(reason) => {
                eprintln!("{}", format!("Skipping {}: {}", job.sample_id, reason).red());
                if let Err(e) = append_skip_log(log_file, &job.sample_id, &reason) {
                    warning(&format!("failed to write to {}\n{}", log_file.display(), e));
                }
                metrics.add_skipped(&job.sample_id, &job.isolate_label, &reason);
            }
        }
    }
    metrics.run_time = format_duration(start.elapsed());
    metrics
}


fn process_sample(job: &SampleJob, settings: &PipelineSettings, runner: &mut dyn ToolRunner,
                  clean: bool) -> Result<Option<u32>, String> {
    prepare_dirs(job).map_err(|e| {
        eprintln!("  {}", e);
        "could not create directories".to_string()
    })?;
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| run_sample(job, settings, runner)));
    let (success, state) = outcome.map_err(|_| "pipeline crashed".to_string())?;
    if !success {
        if let Some(stage) = state.current_stage() {
            eprintln!("  stopped at {} after {} of {} stages", stage,
                      state.completed_stages().len(), Stage::ALL.len());
        }
        return Err(state.abort_reason().unwrap_or("pipeline failed").to_string());
    }
    let relocation = relocate_artifacts(job);
    let moved = relocation.moved.len();
    eprintln!("  moved {} result file{} to {}", moved, if moved == 1 { "" } else { "s" },
              job.output_dir.display());
    if !relocation.failed.is_empty() {
        warning(&format!("{} result file{} could not be moved and remain in {}",
                         relocation.failed.len(),
                         if relocation.failed.len() == 1 { "" } else { "s" },
                         job.working_dir.display()));
    } else if clean {
        clean_working_dir(job);
    }
    Ok(state.read_length())
}


fn prepare_dirs(job: &SampleJob) -> io::Result<()> {
    fs::create_dir_all(&job.working_dir)?;
    fs::create_dir_all(&job.output_dir)?;
    fs::create_dir_all(job.novoplasty_dir())?;
    Ok(())
}


pub fn append_skip_log(log_file: &Path, sample_id: &str, reason: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(log_file)?;
    writeln!(file, "{} skipped: {}", sample_id, reason)
}
