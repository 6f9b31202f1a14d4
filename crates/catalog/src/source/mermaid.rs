//! Mermaid diagram source.
//!
//! Mermaid is rendered client side, so the text written here is what ends
//! up embedded in (or linked from) the documentation.

use std::fmt::Write as _;

use catalog_core::{diagram::DiagramKind, model::Module, types::TypeKind};

use super::{
    DiagramSource, SourceError, TypeSet, alias,
    flow::{self, Event},
    types::references,
};

/// Writes Mermaid class, sequence and flowchart diagrams.
#[derive(Debug, Clone, Copy, Default)]
pub struct MermaidSource;

fn escape(text: &str) -> String {
    text.replace('"', "#quot;")
}

impl DiagramSource for MermaidSource {
    fn kind(&self) -> DiagramKind {
        DiagramKind::Mermaid
    }

    fn data_model(&self, app: &str, types: &TypeSet) -> Result<String, SourceError> {
        let mut out = String::new();
        writeln!(out, "---")?;
        writeln!(out, "title: {}", escape(app))?;
        writeln!(out, "---")?;
        writeln!(out, "classDiagram")?;

        for (key, ty) in types {
            let id = alias(&[&key.app, &key.name]);
            writeln!(out, "    class {id}[\"{}\"]", escape(&key.name))?;
            match &ty.kind {
                TypeKind::Tuple(fields) => {
                    for (name, field) in fields {
                        writeln!(out, "    {id} : +{name} {}", field.field_label())?;
                    }
                }
                _ => writeln!(out, "    <<{}>> {id}", ty.field_label())?,
            }
        }

        for (key, ty) in types {
            let id = alias(&[&key.app, &key.name]);
            let mut targets = references(&key.app, ty);
            targets.sort();
            targets.dedup();
            for target in targets.iter().filter(|target| types.contains_key(*target)) {
                writeln!(out, "    {id} --> {}", alias(&[&target.app, &target.name]))?;
            }
        }

        Ok(out)
    }

    fn sequence(&self, module: &Module, app: &str, endpoint: &str) -> Result<String, SourceError> {
        let flow = flow::sequence(module, app, endpoint)?;

        let mut out = String::new();
        writeln!(out, "sequenceDiagram")?;
        for participant in &flow.participants {
            writeln!(
                out,
                "    participant {} as {}",
                alias(&[participant]),
                escape(participant)
            )?;
        }
        writeln!(out, "    Note over {}: {}", alias(&[app]), escape(endpoint))?;

        for event in &flow.events {
            match event {
                Event::Call { from, to, endpoint } => writeln!(
                    out,
                    "    {}->>{}: {}",
                    alias(&[from]),
                    alias(&[to]),
                    escape(endpoint)
                )?,
                Event::Return { from, to, label } => writeln!(
                    out,
                    "    {}-->>{}: {}",
                    alias(&[from]),
                    alias(&[to]),
                    escape(label)
                )?,
                Event::Action { app, text } => {
                    let id = alias(&[app]);
                    writeln!(out, "    {id}->>{id}: {}", escape(text))?;
                }
            }
        }

        Ok(out)
    }

    fn integration(
        &self,
        module: &Module,
        project: &str,
        title: &str,
        epa: bool,
    ) -> Result<String, SourceError> {
        let view = flow::integration(module, project, epa)?;

        let mut out = String::new();
        writeln!(out, "---")?;
        writeln!(out, "title: {}", escape(title))?;
        writeln!(out, "---")?;
        writeln!(out, "graph LR")?;
        for (member, label) in &view.members {
            writeln!(out, "    {}[\"{}\"]", alias(&[member]), escape(label))?;
        }
        for edge in &view.edges {
            let from = alias(&[&edge.from]);
            let to = alias(&[&edge.to]);
            match &edge.endpoints {
                Some((caller, callee)) => writeln!(
                    out,
                    "    {from} -->|\"{} -> {}\"| {to}",
                    escape(caller),
                    escape(callee)
                )?,
                None => writeln!(out, "    {from} --> {to}")?,
            }
        }

        Ok(out)
    }
}
