//! Call flow extraction for sequence and integration views.

use std::collections::BTreeSet;

use catalog_core::{
    attribute::Attributed,
    model::{Endpoint, Module, Statement},
};

use crate::{source::SourceError, synthetic::APP_FORMAT};

/// A step of a sequence diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `from` calls `endpoint` of `to`.
    Call {
        from: String,
        to: String,
        endpoint: String,
    },
    /// `from` returns to `to`, labeled with the return payload.
    Return {
        from: String,
        to: String,
        label: String,
    },
    /// A free-text step performed by `app`.
    Action { app: String, text: String },
}

/// The flow of a sequence diagram: its participants in order of first
/// appearance and the events between them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    pub participants: Vec<String>,
    pub events: Vec<Event>,
}

impl Sequence {
    fn participant(&mut self, app: &str) {
        if !self.participants.iter().any(|existing| existing == app) {
            self.participants.push(app.to_string());
        }
    }
}

/// Walks the calls made by `endpoint` of `app`, depth first.
///
/// An endpoint already being expanded is not expanded again, so recursive
/// calls terminate. Calls to endpoints missing from the model are drawn
/// without expansion.
///
/// # Errors
///
/// Returns [`SourceError`] if `app` or `endpoint` does not exist.
pub fn sequence(module: &Module, app: &str, endpoint: &str) -> Result<Sequence, SourceError> {
    let application = module
        .app(app)
        .ok_or_else(|| SourceError::MissingApp(app.to_string()))?;
    let entry = application
        .endpoints
        .get(endpoint)
        .ok_or_else(|| SourceError::MissingEndpoint {
            app: app.to_string(),
            endpoint: endpoint.to_string(),
        })?;

    let mut flow = Sequence::default();
    let mut active = BTreeSet::new();
    flow.participant(app);
    walk(module, app, entry, &mut active, &mut flow);
    Ok(flow)
}

fn walk<'m>(
    module: &'m Module,
    app: &str,
    endpoint: &'m Endpoint,
    active: &mut BTreeSet<(String, &'m str)>,
    flow: &mut Sequence,
) {
    active.insert((app.to_string(), endpoint.name.as_str()));

    for stmt in &endpoint.stmts {
        match stmt {
            Statement::Call {
                target,
                endpoint: callee,
            } => {
                let to = target.joined();
                flow.participant(&to);
                flow.events.push(Event::Call {
                    from: app.to_string(),
                    to: to.clone(),
                    endpoint: callee.clone(),
                });

                let Some(called) = module
                    .app(&to)
                    .and_then(|target| target.endpoints.get(callee))
                else {
                    continue;
                };
                if active.contains(&(to.clone(), called.name.as_str())) {
                    continue;
                }
                walk(module, &to, called, active, flow);
                if let Some(label) = called.returns().find_map(Statement::return_payload) {
                    flow.events.push(Event::Return {
                        from: to,
                        to: app.to_string(),
                        label: label.to_string(),
                    });
                }
            }
            Statement::Action { action } => flow.events.push(Event::Action {
                app: app.to_string(),
                text: action.clone(),
            }),
            Statement::Return { .. } => {}
        }
    }

    active.remove(&(app.to_string(), endpoint.name.as_str()));
}

/// A call between two applications of an integration view.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Edge {
    pub from: String,
    pub to: String,
    /// Caller and callee endpoint, set for endpoint-level views.
    pub endpoints: Option<(String, String)>,
}

/// The applications of an integration view with their labels, and the
/// calls between them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Integration {
    /// `(application, label)` pairs in name order.
    pub members: Vec<(String, String)>,
    pub edges: BTreeSet<Edge>,
}

/// Collects the calls between applications listed by the `project`
/// application.
///
/// Every endpoint of `project` lists member applications as bare action
/// statements. Member labels follow the project's `appfmt` template.
///
/// # Errors
///
/// Returns [`SourceError`] if `project` does not exist or lists no
/// application present in `module`.
pub fn integration(module: &Module, project: &str, epa: bool) -> Result<Integration, SourceError> {
    let project_app = module
        .app(project)
        .ok_or_else(|| SourceError::MissingApp(project.to_string()))?;
    let format = project_app.attribute(APP_FORMAT);

    let members: BTreeSet<&str> = project_app
        .endpoints
        .values()
        .flat_map(|endpoint| &endpoint.stmts)
        .filter_map(|stmt| match stmt {
            Statement::Action { action } => Some(action.as_str()),
            _ => None,
        })
        .filter(|name| module.contains_app(name))
        .collect();
    if members.is_empty() {
        return Err(SourceError::EmptyProject(project.to_string()));
    }

    let mut view = Integration::default();
    for &member in &members {
        view.members
            .push((member.to_string(), app_label(format, member)));

        let Some(app) = module.app(member) else {
            continue;
        };
        for endpoint in app.endpoints.values() {
            for stmt in &endpoint.stmts {
                let Statement::Call {
                    target,
                    endpoint: callee,
                } = stmt
                else {
                    continue;
                };
                let to = target.joined();
                if to == member || !members.contains(to.as_str()) {
                    continue;
                }
                view.edges.insert(Edge {
                    from: member.to_string(),
                    to,
                    endpoints: epa.then(|| (endpoint.name.clone(), callee.clone())),
                });
            }
        }
    }

    Ok(view)
}

/// Expands an `appfmt` template for `app`; without a template the label is
/// the name itself.
pub fn app_label(format: Option<&str>, app: &str) -> String {
    match format {
        Some(format) => format.replace("%(appname)", app),
        None => app.to_string(),
    }
}
