// This file contains functions for AutoAssemb's stderr output.

// Copyright 2026 AutoAssemb contributors

// This file is part of AutoAssemb. AutoAssemb is free software: you can redistribute it and/or
// modify it under the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version. AutoAssemb
// is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
// implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General
// Public License for more details. You should have received a copy of the GNU General Public
// License along with AutoAssemb. If not, see <http://www.gnu.org/licenses/>.

use chrono::Local;
use colored::Colorize;


const MAX_WIDTH: usize = 100;


pub fn section_header(text: &str) {
    let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let date = format!("({})", now);
    eprintln!();
    eprintln!("{} {}", text.bold().bright_yellow().underline(), date.dimmed());
}


pub fn explanation(text: &str) {
    let wrapped = textwrap::fill(text, terminal_width());
    eprintln!("{}", wrapped.dimmed());
    eprintln!();
}


pub fn stage_header(sample_id: &str, text: &str) {
    // One line per stage transition, prefixed with the sample so interleaved tool output stays
    // easy to follow.
    eprintln!("{} {}", format!("[{}]", sample_id).cyan(), text.bold());
}


pub fn warning(text: &str) {
    eprintln!("{} {}", "Warning:".yellow().bold(), text);
}


fn terminal_width() -> usize {
    match term_size::dimensions() {
        Some((w, _)) if w > 0 => w.min(MAX_WIDTH),
        _ => MAX_WIDTH,
    }
}
