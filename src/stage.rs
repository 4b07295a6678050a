// This file contains the code for running one external tool and classifying how it went.

// Copyright 2026 AutoAssemb contributors

// This file is part of AutoAssemb. AutoAssemb is free software: you can redistribute it and/or
// modify it under the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version. AutoAssemb
// is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
// implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General
// Public License for more details. You should have received a copy of the GNU General Public
// License along with AutoAssemb. If not, see <http://www.gnu.org/licenses/>.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::sleep;
use std::time::{Duration, Instant};

use crate::log::warning;
use crate::misc::quote_if_needed;


const POLL_INTERVAL: Duration = Duration::from_millis(500);


/// Anything that can run a program to completion in a directory. The exit code is None when the
/// process did not exit normally (killed by a signal or by a timeout).
pub trait ToolRunner {
    fn run(&mut self, program: &str, args: &[String], working_dir: &Path)
        -> io::Result<Option<i32>>;
}


/// Runs tools as real child processes, inheriting stdout/stderr so their progress is visible.
pub struct SystemRunner {
    timeout: Option<Duration>,
    stop_flag: Option<&'static AtomicBool>,
}

impl SystemRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        SystemRunner { timeout, stop_flag: None }
    }

    /// Once the flag is set, no new tools are started.
    pub fn with_stop_flag(mut self, stop_flag: &'static AtomicBool) -> Self {
        self.stop_flag = Some(stop_flag);
        self
    }
}

impl ToolRunner for SystemRunner {
    fn run(&mut self, program: &str, args: &[String], working_dir: &Path)
            -> io::Result<Option<i32>> {
        if self.stop_flag.is_some_and(|flag| flag.load(Ordering::SeqCst)) {
            return Err(io::Error::new(io::ErrorKind::Interrupted, "run was interrupted"));
        }
        let mut child = Command::new(program).args(args).current_dir(working_dir).spawn()?;
        let Some(timeout) = self.timeout else {
            return Ok(child.wait()?.code());
        };
        let start = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status.code());
            }
            if start.elapsed() >= timeout {
                warning(&format!("{} did not finish within {} min and was stopped", program,
                                 timeout.as_secs() / 60));
                child.kill()?;
                child.wait()?;
                return Ok(None);
            }
            sleep(POLL_INTERVAL);
        }
    }
}


/// A fully resolved tool invocation: what to run and which files it must leave behind.
#[derive(Clone, Debug, PartialEq)]
pub struct StageCommand {
    pub program: String,
    pub args: Vec<String>,
    pub required_outputs: Vec<PathBuf>,
}

impl StageCommand {
    pub fn new(program: &str) -> Self {
        StageCommand { program: program.to_string(), args: Vec::new(),
                       required_outputs: Vec::new() }
    }

    pub fn arg(mut self, arg: impl ToString) -> Self {
        self.args.push(arg.to_string());
        self
    }

    pub fn path_arg(mut self, path: &Path) -> Self {
        self.args.push(path.display().to_string());
        self
    }

    pub fn requires(mut self, path: PathBuf) -> Self {
        self.required_outputs.push(path);
        self
    }

    pub fn command_line(&self) -> String {
        let mut parts = vec![quote_if_needed(&self.program)];
        parts.extend(self.args.iter().map(|a| quote_if_needed(a)));
        parts.join(" ")
    }
}


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Success,
    ProcessFailure,
    MissingOutput,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Success        => write!(f, "success"),
            Classification::ProcessFailure => write!(f, "process failure"),
            Classification::MissingOutput  => write!(f, "missing output"),
        }
    }
}


#[derive(Clone, Debug, PartialEq)]
pub struct StageResult {
    pub exit_status: Option<i32>,
    pub required_outputs_present: bool,
    pub classification: Classification,
}

impl StageResult {
    pub fn is_success(&self) -> bool {
        self.classification == Classification::Success
    }

    pub fn describe(&self) -> String {
        match (self.classification, self.exit_status) {
            (Classification::ProcessFailure, Some(code)) => format!("exit status {}", code),
            (Classification::ProcessFailure, None) => "did not exit normally".to_string(),
            (Classification::MissingOutput, _) => "expected output files are missing".to_string(),
            (Classification::Success, _) => "success".to_string(),
        }
    }
}


/// Runs the command once (no retries) and classifies the outcome. A non-zero exit takes priority
/// over missing files, and a command with no required outputs is judged on exit status alone.
pub fn run_stage(runner: &mut dyn ToolRunner, command: &StageCommand, working_dir: &Path)
        -> StageResult {
    let exit_status = match runner.run(&command.program, &command.args, working_dir) {
        Ok(code) => code,
        Err(e) => {
            warning(&format!("failed to run {}\n{}", command.program, e));
            None
        }
    };
    let required_outputs_present = command.required_outputs.iter().all(|p| p.exists());
    let classification = classify(exit_status, required_outputs_present);
    StageResult { exit_status, required_outputs_present, classification }
}


pub fn classify(exit_status: Option<i32>, required_outputs_present: bool) -> Classification {
    match exit_status {
        Some(0) if required_outputs_present => Classification::Success,
        Some(0) => Classification::MissingOutput,
        _ => Classification::ProcessFailure,
    }
}
