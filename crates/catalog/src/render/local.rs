use std::{fs, path::Path, process::Command};

use log::debug;

use crate::registry::ArtifactRecord;

use super::{RenderError, Renderer};

/// Converts diagrams with a local PlantUML installation.
///
/// The source is written next to the target with a `.puml` extension and
/// the command is run with that file as its last argument. The converter
/// is expected to write the target itself, as `plantuml -tsvg` does.
#[derive(Debug, Clone)]
pub struct LocalRenderer {
    program: String,
    args: Vec<String>,
}

impl LocalRenderer {
    /// Creates a renderer running `command`, program first.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::EmptyCommand`] if `command` is empty.
    pub fn new(command: Vec<String>) -> Result<Self, RenderError> {
        let mut command = command.into_iter();
        let program = command.next().ok_or(RenderError::EmptyCommand)?;

        Ok(Self {
            program,
            args: command.collect(),
        })
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Renderer for LocalRenderer {
    fn render(&self, target: &Path, record: &ArtifactRecord) -> Result<(), RenderError> {
        let source = target.with_extension("puml");
        fs::write(&source, record.source()).map_err(|err| RenderError::write(&source, err))?;

        debug!(command = self.command_line(), source = source.display().to_string(); "Running converter");
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(&source)
            .output()
            .map_err(|err| RenderError::Spawn {
                command: self.command_line(),
                source: err,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(RenderError::Converter {
                command: self.command_line(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
