// This file contains the code for pulling the read length out of a FastQC HTML report.

// Copyright 2026 AutoAssemb contributors

// This file is part of AutoAssemb. AutoAssemb is free software: you can redistribute it and/or
// modify it under the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version. AutoAssemb
// is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
// implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General
// Public License for more details. You should have received a copy of the GNU General Public
// License along with AutoAssemb. If not, see <http://www.gnu.org/licenses/>.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::log::warning;
use crate::misc::{check_if_file_exists, quit_with_error};


pub fn readlen(report: PathBuf) {
    check_if_file_exists(&report);
    match read_length_from_report(&report) {
        Some(length) => println!("{}", length),
        None => quit_with_error(&format!("no sequence length found in {}", report.display())),
    }
}


pub fn read_length_from_report(report: &Path) -> Option<u32> {
    match fs::read_to_string(report) {
        Ok(html) => extract_read_length(&html),
        Err(e) => {
            warning(&format!("could not read {}\n{}", report.display(), e));
            None
        }
    }
}


/// Finds the "Sequence length" row of FastQC's Basic Statistics table and returns its value. When
/// reads vary in length, FastQC gives a range (e.g. 35-151) and the upper bound is used.
pub fn extract_read_length(html: &str) -> Option<u32> {
    let captures = sequence_length_regex().captures(html)?;
    let cell = tag_regex().replace_all(captures.get(1)?.as_str(), "");
    parse_length_value(&cell)
}


/// The label cell and the cell right after it. Only whitespace may separate the two.
fn sequence_length_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<td[^>]*>\s*Sequence length\s*</td>\s*<td[^>]*>(.*?)</td>").unwrap()
    })
}


fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").unwrap())
}


fn parse_length_value(cell: &str) -> Option<u32> {
    let value = match cell.split_once('-') {
        Some((_, max)) => max,
        None => cell,
    };
    value.trim().parse::<u32>().ok()
}
