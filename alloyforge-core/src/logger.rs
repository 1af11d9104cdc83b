use crate::{error::AlloyforgeError, optimizer::state::GenerationSummary};
use csv::Writer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationLogEntry {
    pub generation: usize,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub best_so_far_fitness: f64,
    pub best_composition_json: String,
}

/// Writes one CSV row per optimizer generation.
pub struct GenerationLogger {
    writer: Writer<fs::File>,
}

impl GenerationLogger {
    pub fn new(path: &str) -> Result<Self, io::Error> {
        let writer = Writer::from_path(path)?;
        Ok(Self { writer })
    }

    pub fn log_generation(&mut self, summary: &GenerationSummary) -> Result<(), anyhow::Error> {
        let entry = GenerationLogEntry {
            generation: summary.generation,
            best_fitness: summary.best_fitness,
            mean_fitness: summary.mean_fitness,
            best_so_far_fitness: summary.best_so_far_fitness,
            best_composition_json: serde_json::to_string(&summary.best_composition)?,
        };

        self.writer.serialize(entry)?;
        self.writer.flush()?;
        Ok(())
    }
}

pub fn read_generation_log(log_path: &str) -> Result<Vec<GenerationLogEntry>, AlloyforgeError> {
    let mut reader = csv::Reader::from_path(log_path)
        .map_err(|e| AlloyforgeError::CsvError(log_path.to_string(), e))?;

    reader
        .deserialize()
        .map(|record| record.map_err(|e| AlloyforgeError::CsvError(log_path.to_string(), e)))
        .collect()
}
