//! PlantUML diagram source.

use std::fmt::Write as _;

use catalog_core::{
    attribute::Attributed,
    diagram::DiagramKind,
    model::Module,
    types::TypeKind,
};

use super::{
    DiagramSource, SourceError, TypeSet, alias,
    flow::{self, Event},
    types::references,
};

/// Writes PlantUML class, sequence and component diagrams.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlantUmlSource;

impl DiagramSource for PlantUmlSource {
    fn kind(&self) -> DiagramKind {
        DiagramKind::PlantUml
    }

    fn data_model(&self, app: &str, types: &TypeSet) -> Result<String, SourceError> {
        let mut out = String::new();
        writeln!(out, "@startuml")?;
        writeln!(out, "title {app}")?;
        writeln!(out, "hide methods")?;
        writeln!(out, "hide empty members")?;
        writeln!(out, "skinparam classAttributeIconSize 0")?;

        for (key, ty) in types {
            let id = alias(&[&key.app, &key.name]);
            match &ty.kind {
                TypeKind::Tuple(fields) => {
                    writeln!(out, "class \"{}\" as {id} {{", key.name)?;
                    for (name, field) in fields {
                        writeln!(out, "  + {name} : {}", field.field_label())?;
                    }
                    writeln!(out, "}}")?;
                }
                _ => {
                    writeln!(out, "class \"{}\" as {id} <<{}>>", key.name, ty.field_label())?;
                }
            }
            if let Some(description) = ty.attribute("description") {
                writeln!(out, "note top of {id} : {}", description.replace('\n', "\\n"))?;
            }
        }

        for (key, ty) in types {
            let id = alias(&[&key.app, &key.name]);
            let mut targets = references(&key.app, ty);
            targets.sort();
            targets.dedup();
            for target in targets.iter().filter(|target| types.contains_key(*target)) {
                writeln!(out, "{id} --> {}", alias(&[&target.app, &target.name]))?;
            }
        }

        writeln!(out, "@enduml")?;
        Ok(out)
    }

    fn sequence(&self, module: &Module, app: &str, endpoint: &str) -> Result<String, SourceError> {
        let flow = flow::sequence(module, app, endpoint)?;

        let mut out = String::new();
        writeln!(out, "@startuml")?;
        writeln!(out, "skinparam maxMessageSize 250")?;
        writeln!(out, "title {app} <- {endpoint}")?;
        for participant in &flow.participants {
            writeln!(out, "control \"{participant}\" as {}", alias(&[participant]))?;
        }

        let entry = alias(&[app]);
        writeln!(out, "[-> {entry} : {endpoint}")?;
        writeln!(out, "activate {entry}")?;
        for event in &flow.events {
            match event {
                Event::Call { from, to, endpoint } => {
                    writeln!(out, "{} -> {} : {endpoint}", alias(&[from]), alias(&[to]))?;
                }
                Event::Return { from, to, label } => {
                    writeln!(out, "{} --> {} : {label}", alias(&[from]), alias(&[to]))?;
                }
                Event::Action { app, text } => {
                    let id = alias(&[app]);
                    writeln!(out, "{id} -> {id} : {text}")?;
                }
            }
        }
        writeln!(out, "deactivate {entry}")?;
        writeln!(out, "@enduml")?;
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
        writeln!(out, "@startuml")?;
        writeln!(out, "title {title}")?;
        writeln!(out, "hide stereotype")?;
        writeln!(out, "scale max 16384 height")?;
        for (member, label) in &view.members {
            writeln!(out, "component \"{label}\" as {}", alias(&[member]))?;
        }
        for edge in &view.edges {
            let from = alias(&[&edge.from]);
            let to = alias(&[&edge.to]);
            match &edge.endpoints {
                Some((caller, callee)) => writeln!(out, "{from} --> {to} : {caller} -> {callee}")?,
                None => writeln!(out, "{from} --> {to}")?,
            }
        }
        writeln!(out, "@enduml")?;
        Ok(out)
    }
}
