use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use crate::command::CommandLine;
use crate::config::Config;

/// What `run` would do with a given config, without doing it.
#[derive(Debug, Serialize)]
pub struct Plan<'a> {
    pub source: String,
    pub steps: Vec<&'a CommandLine>,
    pub env: BTreeMap<&'a str, &'a str>,
    pub success: &'a [String; 2],
}

impl<'a> Plan<'a> {
    pub fn new(config: &'a Config) -> Self {
        Plan {
            source: config.source.to_string(),
            steps: config.gate.steps.iter().map(|s| &s.command).collect(),
            env: config
                .gate
                .env
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
            success: &config.gate.success,
        }
    }

    /// Human-readable listing, one numbered line per step.
    pub fn write_text(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(out, "config: {}", self.source)?;
        for (name, value) in &self.env {
            writeln!(out, "env: {name}={value}")?;
        }
        for (index, step) in self.steps.iter().enumerate() {
            writeln!(out, "{}. {step}", index + 1)?;
        }
        Ok(())
    }

    pub fn write_json(&self, out: &mut impl Write) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)
    }
}
