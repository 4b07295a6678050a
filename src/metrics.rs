// This file contains the code for writing AutoAssemb's YAML summary of a batch run.

// Copyright 2026 AutoAssemb contributors

// This file is part of AutoAssemb. AutoAssemb is free software: you can redistribute it and/or
// modify it under the terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version. AutoAssemb
// is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
// implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General
// Public License for more details. You should have received a copy of the GNU General Public
// License along with AutoAssemb. If not, see <http://www.gnu.org/licenses/>.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::io::Write;
use std::path::Path;


#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct BatchMetrics {
    pub sample_count: u32,
    pub completed_count: u32,
    pub skipped_count: u32,
    pub completed_samples: Vec<CompletedSample>,
    pub skipped_samples: Vec<SkippedSample>,
    pub run_time: String,
}

impl BatchMetrics {
    pub fn new() -> Self { Self::default() }

    pub fn add_completed(&mut self, sample_id: &str, isolate: &str, read_length: Option<u32>) {
        self.sample_count += 1;
        self.completed_count += 1;
        self.completed_samples.push(CompletedSample { sample_id: sample_id.to_string(),
                                                      isolate: isolate.to_string(),
                                                      read_length });
    }

    pub fn add_skipped(&mut self, sample_id: &str, isolate: &str, reason: &str) {
        self.sample_count += 1;
        self.skipped_count += 1;
        self.skipped_samples.push(SkippedSample { sample_id: sample_id.to_string(),
                                                  isolate: isolate.to_string(),
                                                  reason: reason.to_string() });
    }

    pub fn save_to_yaml(&self, filename: &Path) -> io::Result<()> { save_yaml(filename, self) }
}


#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct CompletedSample {
    pub sample_id: String,
    pub isolate: String,
    pub read_length: Option<u32>,
}


#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct SkippedSample {
    pub sample_id: String,
    pub isolate: String,
    pub reason: String,
}


fn save_yaml<T: Serialize>(yaml_filename: &Path, data: T) -> io::Result<()> {
    let yaml_string = serde_yaml::to_string(&data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let mut file = File::create(yaml_filename)?;
    file.write_all(yaml_string.as_bytes())?;
    Ok(())
}
