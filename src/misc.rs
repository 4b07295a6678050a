// This file contains miscellaneous functions used by various parts of AutoAssemb.

// Copyright 2026 AutoAssemb contributors

// This file is part of AutoAssemb. AutoAssemb is free software: you can redistribute it and/or
// modify it under the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version. AutoAssemb
// is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
// implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General
// Public License for more details. You should have received a copy of the GNU General Public
// License along with AutoAssemb. If not, see <http://www.gnu.org/licenses/>.

use std::fs::{File, create_dir_all, remove_dir_all};
use std::io::{prelude::*, BufReader};
use std::path::Path;
use which::which;


pub fn create_dir(dir_path: &Path) {
    match create_dir_all(dir_path) {
        Ok(_) => {},
        Err(e) => quit_with_error(&format!("failed to create directory {}\n{}", dir_path.display(), e)),
    }
}


pub fn delete_dir_if_exists(dir_path: &Path) -> std::io::Result<()> {
    if dir_path.exists() && dir_path.is_dir() {
        remove_dir_all(dir_path)?;
    }
    Ok(())
}


pub fn load_file_lines(filename: &Path) -> Vec<String> {
    let file = File::open(filename).unwrap_or_else(|e| {
        quit_with_error(&format!("failed to open file {}\n{}", filename.display(), e));
    });
    let reader = BufReader::new(file);
    reader.lines().map(|line_result| {
        line_result.unwrap_or_else(|e| {
            quit_with_error(&format!("failed to read line\n{}", e));
        })
    }).collect()
}


pub fn check_if_file_exists(filename: &Path) {
    // Quits with an error if the given path is not an existing file.
    if !filename.exists() {
        quit_with_error(&format!("file does not exist: {}", filename.display()));
    }
    if !filename.is_file() {
        quit_with_error(&format!("{} is not a file", filename.display()));
    }
}


pub fn check_if_dir_is_not_dir(dir: &Path) {
    // Quits with an error if the given path exists but is not a directory (not existing is okay).
    if dir.exists() && !dir.is_dir() {
        quit_with_error(&format!("{} exists but is not a directory", dir.display()));
    }
}


pub fn check_requirements(reqs: &[&str]) {
    for cmd in reqs {
        if which(cmd).is_err() {
            quit_with_error(&format!("required program '{cmd}' not found in $PATH"));
        }
    }
}


#[cfg(not(test))]
pub fn quit_with_error(text: &str) -> ! {
    // For friendly error messages, this function normally just prints the error and quits.
    eprintln!();
    eprintln!("Error: {}", text);
    std::process::exit(1);
}
#[cfg(test)]
pub fn quit_with_error(text: &str) -> ! {
    // But when running unit tests, this function instead panics so I can catch it for the test.
    panic!("{}", text);
}


pub fn format_duration(duration: std::time::Duration) -> String {
    let microseconds = duration.as_micros() % 1000000;
    let seconds =      duration.as_micros() / 1000000 % 60;
    let minutes =      duration.as_micros() / 1000000 / 60 % 60;
    let hours =        duration.as_micros() / 1000000 / 60 / 60;
    format!("{}:{:02}:{:02}.{:06}", hours, minutes, seconds, microseconds)
}


pub fn quote_if_needed(arg: &str) -> String {
    // Used when echoing a command line, so arguments with spaces stay readable.
    if arg.is_empty() || arg.contains(char::is_whitespace) {
        format!("'{}'", arg)
    } else {
        arg.to_string()
    }
}
