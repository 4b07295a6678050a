// This file contains the code for moving a finished sample's results into its output directory.

// Copyright 2026 AutoAssemb contributors

// This file is part of AutoAssemb. AutoAssemb is free software: you can redistribute it and/or
// modify it under the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version. AutoAssemb
// is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
// implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General
// Public License for more details. You should have received a copy of the GNU General Public
// License along with AutoAssemb. If not, see <http://www.gnu.org/licenses/>.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::log::warning;
use crate::misc::delete_dir_if_exists;
use crate::samples::SampleJob;


pub fn artifact_names(sample_id: &str) -> Vec<String> {
    vec![format!("{}_q30_genome", sample_id),
         format!("{}_1.fastq_trimming_report.txt", sample_id),
         format!("{}_2.fastq_trimming_report.txt", sample_id),
         format!("{}_1_fastqc.html", sample_id),
         format!("{}_2_fastqc.html", sample_id)]
}


#[cfg(unix)]
const CROSS_DEVICE_ERROR: i32 = 18;  // EXDEV
#[cfg(windows)]
const CROSS_DEVICE_ERROR: i32 = 17;  // ERROR_NOT_SAME_DEVICE


/// What happened to a sample's artifacts: where the moved ones now are, and which ones are still
/// in the working directory because they couldn't be moved.
#[derive(Debug, Default, PartialEq)]
pub struct Relocation {
    pub moved: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}


/// Moves each known artifact that exists from the working directory to the output directory. Not
/// every tool version writes every report, so absent ones are skipped.
pub fn relocate_artifacts(job: &SampleJob) -> Relocation {
    let mut relocation = Relocation::default();
    for name in artifact_names(&job.sample_id) {
        let src = job.working_dir.join(&name);
        if !src.exists() { continue; }
        let dst = job.output_dir.join(&name);
        match move_path(&src, &dst) {
            Ok(()) => relocation.moved.push(dst),
            Err(e) => {
                warning(&format!("failed to move {} to {}\n{}", src.display(), dst.display(), e));
                relocation.failed.push(src);
            }
        }
    }
    relocation
}


fn move_path(src: &Path, dst: &Path) -> io::Result<()> {
    // A previous run may have left results behind, and rename can't replace a directory.
    remove_path(dst)?;
    match fs::rename(src, dst) {
        Err(e) if is_cross_device(&e) => copy_then_remove(src, dst),
        result => result,
    }
}


fn is_cross_device(e: &io::Error) -> bool {
    e.raw_os_error() == Some(CROSS_DEVICE_ERROR)
}


/// The slow path for moves between filesystems. The source is only removed once the whole copy
/// has succeeded, and a partial copy is cleared away.
fn copy_then_remove(src: &Path, dst: &Path) -> io::Result<()> {
    let copied = if src.is_dir() { copy_dir_all(src, dst) }
                 else { fs::copy(src, dst).map(|_| ()) };
    if let Err(e) = copied {
        let _ = remove_path(dst);
        return Err(e);
    }
    remove_path(src)
}


fn copy_dir_all(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}


fn remove_path(path: &Path) -> io::Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path)
    } else if path.exists() {
        fs::remove_file(path)
    } else {
        Ok(())
    }
}


pub fn clean_working_dir(job: &SampleJob) {
    if let Err(e) = delete_dir_if_exists(&job.working_dir) {
        warning(&format!("failed to delete {}\n{}", job.working_dir.display(), e));
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    use crate::tests::make_test_file;

    fn job_in(dir: &Path) -> SampleJob {
        let job = SampleJob::new("SRR001", "Iso1", &dir.join("work"), &dir.join("out"));
        fs::create_dir_all(&job.working_dir).unwrap();
        fs::create_dir_all(&job.output_dir).unwrap();
        job
    }

    #[test]
    fn test_artifact_names() {
        assert_eq!(artifact_names("SRR5"),
                   vec!["SRR5_q30_genome", "SRR5_1.fastq_trimming_report.txt",
                        "SRR5_2.fastq_trimming_report.txt", "SRR5_1_fastqc.html",
                        "SRR5_2_fastqc.html"]);
    }

    #[test]
    fn test_relocate_present_and_missing() {
        let temp_dir = tempdir().unwrap();
        let job = job_in(temp_dir.path());
        make_test_file(&job.working_dir.join("SRR001_1_fastqc.html"), "report 1");
        make_test_file(&job.working_dir.join("SRR001_1.fastq_trimming_report.txt"), "trim 1");
        fs::create_dir_all(job.working_dir.join("SRR001_q30_genome")).unwrap();
        make_test_file(&job.working_dir.join("SRR001_q30_genome").join("genome.fasta"), ">x\nA\n");
        make_test_file(&job.working_dir.join("unrelated.txt"), "stays");

        let relocation = relocate_artifacts(&job);
        assert!(relocation.failed.is_empty());
        assert_eq!(relocation.moved, vec![job.output_dir.join("SRR001_q30_genome"),
                               job.output_dir.join("SRR001_1.fastq_trimming_report.txt"),
                               job.output_dir.join("SRR001_1_fastqc.html")]);
        assert!(job.output_dir.join("SRR001_q30_genome").join("genome.fasta").is_file());
        assert_eq!(fs::read_to_string(job.output_dir.join("SRR001_1_fastqc.html")).unwrap(),
                   "report 1");
        assert!(!job.working_dir.join("SRR001_1_fastqc.html").exists());
        assert!(!job.output_dir.join("SRR001_2_fastqc.html").exists());
        assert!(job.working_dir.join("unrelated.txt").exists());
    }

    #[test]
    fn test_relocate_replaces_previous_results() {
        let temp_dir = tempdir().unwrap();
        let job = job_in(temp_dir.path());
        make_test_file(&job.output_dir.join("SRR001_2_fastqc.html"), "old");
        fs::create_dir_all(job.output_dir.join("SRR001_q30_genome").join("stale")).unwrap();
        make_test_file(&job.working_dir.join("SRR001_2_fastqc.html"), "new");
        fs::create_dir_all(job.working_dir.join("SRR001_q30_genome")).unwrap();

        let relocation = relocate_artifacts(&job);
        assert_eq!(relocation.moved.len(), 2);
        assert_eq!(fs::read_to_string(job.output_dir.join("SRR001_2_fastqc.html")).unwrap(),
                   "new");
        assert!(!job.output_dir.join("SRR001_q30_genome").join("stale").exists());
    }

    #[test]
    fn test_relocate_nothing() {
        let temp_dir = tempdir().unwrap();
        let job = job_in(temp_dir.path());
        assert_eq!(relocate_artifacts(&job), Relocation::default());
    }

    #[test]
    fn test_relocate_reports_failures() {
        let temp_dir = tempdir().unwrap();
        let job = job_in(temp_dir.path());
        make_test_file(&job.working_dir.join("SRR001_1_fastqc.html"), "report 1");
        fs::create_dir_all(job.working_dir.join("SRR001_q30_genome")).unwrap();
        fs::remove_dir_all(&job.output_dir).unwrap();
        make_test_file(&job.output_dir, "a file where a directory should be");

        let relocation = relocate_artifacts(&job);
        assert!(relocation.moved.is_empty());
        assert_eq!(relocation.failed, vec![job.working_dir.join("SRR001_q30_genome"),
                                           job.working_dir.join("SRR001_1_fastqc.html")]);
        assert!(job.working_dir.join("SRR001_1_fastqc.html").is_file());
        assert!(job.working_dir.join("SRR001_q30_genome").is_dir());
    }

    #[test]
    fn test_is_cross_device() {
        assert!(is_cross_device(&io::Error::from_raw_os_error(CROSS_DEVICE_ERROR)));
        assert!(!is_cross_device(&io::Error::new(io::ErrorKind::NotFound, "missing")));
    }

    #[test]
    fn test_copy_then_remove() {
        let temp_dir = tempdir().unwrap();
        let src_dir = temp_dir.path().join("SRR001_q30_genome");
        fs::create_dir_all(src_dir.join("contigs")).unwrap();
        make_test_file(&src_dir.join("Circularized_assembly.fasta"), ">mt\nACGT\n");
        make_test_file(&src_dir.join("contigs").join("contigs.txt"), "c1\n");
        let dst_dir = temp_dir.path().join("out_genome");
        copy_then_remove(&src_dir, &dst_dir).unwrap();
        assert!(!src_dir.exists());
        assert_eq!(fs::read_to_string(dst_dir.join("Circularized_assembly.fasta")).unwrap(),
                   ">mt\nACGT\n");
        assert_eq!(fs::read_to_string(dst_dir.join("contigs").join("contigs.txt")).unwrap(),
                   "c1\n");

        let src_file = temp_dir.path().join("SRR001_1_fastqc.html");
        make_test_file(&src_file, "report");
        let dst_file = temp_dir.path().join("moved.html");
        copy_then_remove(&src_file, &dst_file).unwrap();
        assert!(!src_file.exists());
        assert_eq!(fs::read_to_string(&dst_file).unwrap(), "report");
    }

    #[test]
    fn test_copy_then_remove_keeps_source_on_failure() {
        let temp_dir = tempdir().unwrap();
        let src_dir = temp_dir.path().join("SRR001_q30_genome");
        fs::create_dir_all(&src_dir).unwrap();
        make_test_file(&src_dir.join("genome.fasta"), ">mt\nACGT\n");
        let blocker = temp_dir.path().join("blocker");
        make_test_file(&blocker, "not a directory");
        assert!(copy_then_remove(&src_dir, &blocker.join("genome")).is_err());
        assert!(src_dir.join("genome.fasta").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn test_relocate_across_filesystems() {
        use std::os::unix::fs::MetadataExt;

        // Needs a tmpfs that is separate from the default temp directory.
        let shm = Path::new("/dev/shm");
        if !shm.is_dir() { return; }
        let Ok(work_dir) = tempfile::tempdir_in(shm) else { return; };
        let out_dir = tempdir().unwrap();
        let work_dev = fs::metadata(work_dir.path()).unwrap().dev();
        let out_dev = fs::metadata(out_dir.path()).unwrap().dev();
        if work_dev == out_dev { return; }

        let job = SampleJob::new("SRR001", "Iso1", work_dir.path(), out_dir.path());
        fs::create_dir_all(&job.working_dir).unwrap();
        fs::create_dir_all(&job.output_dir).unwrap();
        let genome_dir = job.working_dir.join("SRR001_q30_genome");
        fs::create_dir_all(&genome_dir).unwrap();
        make_test_file(&genome_dir.join("Circularized_assembly.fasta"), ">mt\nACGT\n");
        make_test_file(&job.working_dir.join("SRR001_1_fastqc.html"), "report 1");

        let relocation = relocate_artifacts(&job);
        assert!(relocation.failed.is_empty());
        assert_eq!(relocation.moved.len(), 2);
        assert!(job.output_dir.join("SRR001_q30_genome")
                   .join("Circularized_assembly.fasta").is_file());
        assert!(job.output_dir.join("SRR001_1_fastqc.html").is_file());
        assert!(!genome_dir.exists());
    }

    #[test]
    fn test_clean_working_dir() {
        let temp_dir = tempdir().unwrap();
        let job = job_in(temp_dir.path());
        make_test_file(&job.working_dir.join("SRR001_1.fastq"), "@r\nA\n+\nI\n");
        clean_working_dir(&job);
        assert!(!job.working_dir.exists());
        assert!(job.output_dir.exists());
        clean_working_dir(&job);
    }
}
