//! The documentation driver.
//!
//! A [`Catalog`] owns the model graph and the artifact registry. Each
//! `create_*` operation documents one unit (a type, a parameter, a return
//! statement, an endpoint's call flow or the integration view): it resolves
//! the unit's target, stages synthetic nodes when the diagram needs them,
//! generates diagram source and emits it through the registry. A unit that
//! cannot be documented yields `None`.

use log::{debug, error, info};

use catalog_core::{
    attribute::Attributed,
    model::{Endpoint, Module, Param, Statement},
};

use crate::{
    config::AppConfig,
    path::build_path,
    registry::{Artifact, ArtifactRegistry},
    resolve::{ParamTarget, TypeTarget, resolve_param, resolve_return},
    source::{DiagramSource, SourceError, TypeSet, source_for, types},
    synthetic::{PROJECT_APP, stage_aggregate_application, stage_sequence_return_type},
};

/// Pattern excluding an application or endpoint from documentation.
pub const IGNORE_PATTERN: &str = "ignore";

/// Pattern marking an application as a database, documented with a data
/// model of all its types.
pub const DB_PATTERN: &str = "db";

const DEFAULT_TITLE: &str = "project";

/// What a documented unit is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Integration { epa: bool },
    DataModel,
    Type,
    Sequence,
    Param,
    QueryParam,
    PathParam,
    Return,
}

/// One documented unit and the artifact produced for it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentedUnit {
    /// Owning application, empty for the integration view.
    pub app: String,
    /// Name of the documented type, endpoint, parameter or view.
    pub subject: String,
    pub kind: UnitKind,
    pub artifact: Option<Artifact>,
}

/// Drives diagram generation for a [`Module`].
pub struct Catalog {
    module: Module,
    registry: ArtifactRegistry,
    config: AppConfig,
    source: Box<dyn DiagramSource>,
    title: String,
}

/// The parts of a [`Catalog`] needed to emit artifacts, borrowed apart from
/// the module so a staged node can be held while emitting.
struct Emitter<'a> {
    registry: &'a mut ArtifactRegistry,
    config: &'a AppConfig,
    source: &'a dyn DiagramSource,
}

impl Emitter<'_> {
    fn emit(&mut self, content: String, components: &[&str]) -> Option<Artifact> {
        let kind = self.source.kind();
        let path = build_path(self.config.output().dir(), components);
        self.registry
            .emit(content, kind, &path, self.config.output().mode())
    }

    fn leaf(&self, name: &str) -> String {
        format!("{name}{}", self.config.output().ext_for(self.source.kind()))
    }

    fn data_model(
        &mut self,
        module: &Module,
        app: &str,
        leaf: &str,
        types: &TypeSet,
    ) -> Option<Artifact> {
        let Some(application) = module.app(app) else {
            debug!(app; "Application not found, no data model");
            return None;
        };
        let package = application.package_name();

        let content = generated(app, leaf, self.source.data_model(app, types))?;
        let leaf = self.leaf(leaf);
        self.emit(content, &[package.as_str(), app, leaf.as_str()])
    }

    fn type_diagram(
        &mut self,
        module: &Module,
        app: &str,
        type_name: &str,
        recursive: bool,
    ) -> Option<Artifact> {
        let Some(ty) = module.lookup_type(app, type_name) else {
            debug!(app, type_name; "Type not found, no diagram");
            return None;
        };

        if recursive {
            let types = types::related_types(module, &TypeTarget::new(app, type_name));
            self.data_model(module, app, type_name, &types)
        } else {
            let types = types::single(app, type_name, ty.clone());
            self.data_model(module, app, &format!("{type_name}simple"), &types)
        }
    }
}

/// Logs a generation failure; a missing node is only worth a debug line.
fn generated(app: &str, subject: &str, result: Result<String, SourceError>) -> Option<String> {
    match result {
        Ok(content) => Some(content),
        Err(
            err @ (SourceError::MissingApp(_)
            | SourceError::MissingEndpoint { .. }
            | SourceError::EmptyProject(_)),
        ) => {
            debug!(app, subject, err:%; "Nothing to draw");
            None
        }
        Err(err) => {
            error!(app, subject, err:%; "Failed to generate diagram source");
            None
        }
    }
}

impl Catalog {
    /// Creates a catalog documenting `module` as configured by `config`.
    ///
    /// The integration view is titled after the package of the first
    /// application, or `project` for an empty module.
    pub fn new(module: Module, config: AppConfig) -> Self {
        let registry = ArtifactRegistry::new(config.plantuml().service());
        let source = source_for(config.output().diagram());
        let title = match module.package_name() {
            package if package.is_empty() => DEFAULT_TITLE.to_string(),
            package => package,
        };

        Self {
            module,
            registry,
            config,
            source,
            title,
        }
    }

    /// Overrides the title of the integration view, also its output directory.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn registry(&self) -> &ArtifactRegistry {
        &self.registry
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Consumes the catalog, returning the registered artifacts.
    pub fn into_registry(self) -> ArtifactRegistry {
        self.registry
    }

    fn split(&mut self) -> (&mut Module, Emitter<'_>) {
        (
            &mut self.module,
            Emitter {
                registry: &mut self.registry,
                config: &self.config,
                source: self.source.as_ref(),
            },
        )
    }

    /// Data model of `type_name` in `app`.
    ///
    /// A recursive diagram (leaf `<Type>`) also draws every type reachable
    /// through field references; otherwise (leaf `<Type>simple`) only the
    /// type itself is drawn.
    pub fn create_type_diagram(
        &mut self,
        app: &str,
        type_name: &str,
        recursive: bool,
    ) -> Option<Artifact> {
        let (module, mut emitter) = self.split();
        emitter.type_diagram(module, app, type_name, recursive)
    }

    /// Data model of the type returned by `stmt` of `endpoint`.
    ///
    /// A sequence return is drawn through a synthetic `<Endpoint>ReturnVal`
    /// wrapper staged into the endpoint's source application for the
    /// duration of the call.
    pub fn create_return_data_model(
        &mut self,
        endpoint: &Endpoint,
        stmt: &Statement,
    ) -> Option<Artifact> {
        let ret = resolve_return(endpoint, stmt)?;
        let (module, mut emitter) = self.split();

        if !module.contains_app(ret.target().app()) {
            debug!(app = ret.target().app(); "Returned type's application not found");
            return None;
        }
        if ret.target().lookup(module).is_none() {
            debug!(returned:? = ret.target(); "Returned type not found");
            return None;
        }

        if !ret.is_sequence() {
            let target = ret.target();
            return emitter.type_diagram(module, target.app(), target.type_name(), true);
        }

        let staged = stage_sequence_return_type(module, endpoint, ret.target());
        let wrapper = staged.type_target()?;
        emitter.type_diagram(staged.module(), wrapper.app(), wrapper.type_name(), true)
    }

    /// Data model of the type of `param`, an endpoint parameter of `app`.
    ///
    /// A primitive parameter is drawn as a one-type diagram named after the
    /// parameter.
    pub fn create_param_data_model(&mut self, app: &str, param: &Param) -> Option<Artifact> {
        let target = resolve_param(app, param)?;
        let (module, mut emitter) = self.split();

        match target {
            ParamTarget::Primitive { name, .. } => {
                let types = types::single(app, &name, param.ty.clone());
                emitter.data_model(module, app, &name, &types)
            }
            ParamTarget::Named(target) => {
                emitter.type_diagram(module, target.app(), target.type_name(), true)
            }
        }
    }

    /// Data model of a query parameter; unqualified references are scoped
    /// to `current_app`.
    pub fn create_query_param_data_model(
        &mut self,
        current_app: &str,
        param: &Param,
    ) -> Option<Artifact> {
        self.create_param_data_model(current_app, param)
    }

    /// Data model of a path parameter; unqualified references are scoped
    /// to `current_app`.
    pub fn create_path_param_data_model(
        &mut self,
        current_app: &str,
        param: &Param,
    ) -> Option<Artifact> {
        self.create_param_data_model(current_app, param)
    }

    /// Data model of every type of `app`, leaf `types`.
    pub fn generate_data_model(&mut self, app: &str) -> Option<Artifact> {
        let (module, mut emitter) = self.split();
        let types = types::app_types(module, app);
        emitter.data_model(module, app, "types", &types)
    }

    /// Sequence diagram of the calls made by `endpoint` of `app`, leaf
    /// `<Endpoint>_seq_`.
    pub fn create_sequence_diagram(&mut self, app: &str, endpoint: &str) -> Option<Artifact> {
        let (module, mut emitter) = self.split();
        let package = module.app(app)?.package_name();

        let content = generated(app, endpoint, emitter.source.sequence(module, app, endpoint))?;
        let leaf = emitter.leaf(&format!("{endpoint}_seq_"));
        emitter.emit(content, &[package.as_str(), app, leaf.as_str()])
    }

    /// Integration view of every application, stored under `title`.
    ///
    /// With `epa` set the view is endpoint level, leaf `integrationEPA`;
    /// otherwise the leaf is `integration`.
    pub fn create_integration_diagram(&mut self, title: &str, epa: bool) -> Option<Artifact> {
        let (module, mut emitter) = self.split();
        let staged = stage_aggregate_application(module);

        let content = generated(
            PROJECT_APP,
            title,
            emitter
                .source
                .integration(staged.module(), PROJECT_APP, title, epa),
        )?;
        let leaf = emitter.leaf(if epa { "integrationEPA" } else { "integration" });
        emitter.emit(content, &[title, leaf.as_str()])
    }

    /// Documents every unit of the module, applications, endpoints and types
    /// in name order.
    ///
    /// Applications and endpoints with the `ignore` pattern are skipped.
    pub fn document_module(&mut self) -> Vec<DocumentedUnit> {
        let mut units = Vec::new();
        let title = self.title.clone();

        for epa in [false, true] {
            units.push(DocumentedUnit {
                app: String::new(),
                subject: title.clone(),
                kind: UnitKind::Integration { epa },
                artifact: self.create_integration_diagram(&title, epa),
            });
        }

        let apps: Vec<String> = self
            .module
            .apps
            .iter()
            .filter(|(key, app)| key.as_str() != PROJECT_APP && !app.has_pattern(IGNORE_PATTERN))
            .map(|(key, _)| key.clone())
            .collect();

        for app in &apps {
            self.document_app(app, &mut units);
        }

        let documented = units.iter().filter(|unit| unit.artifact.is_some()).count();
        info!(units = units.len(), documented; "Documented module");
        units
    }

    fn document_app(&mut self, app: &str, units: &mut Vec<DocumentedUnit>) {
        let Some(application) = self.module.app(app) else {
            return;
        };
        let is_db = application.has_pattern(DB_PATTERN);
        let endpoints: Vec<Endpoint> = application
            .endpoints
            .values()
            .filter(|endpoint| !endpoint.has_pattern(IGNORE_PATTERN))
            .cloned()
            .collect();
        let type_names: Vec<String> = application.types.keys().cloned().collect();

        let mut unit = |subject: &str, kind: UnitKind, artifact: Option<Artifact>| {
            units.push(DocumentedUnit {
                app: app.to_string(),
                subject: subject.to_string(),
                kind,
                artifact,
            });
        };

        if is_db {
            let artifact = self.generate_data_model(app);
            unit(app, UnitKind::DataModel, artifact);
        }

        for endpoint in &endpoints {
            let artifact = self.create_sequence_diagram(app, &endpoint.name);
            unit(&endpoint.name, UnitKind::Sequence, artifact);

            for param in &endpoint.params {
                let artifact = self.create_param_data_model(app, param);
                unit(&param.name, UnitKind::Param, artifact);
            }
            if let Some(rest) = &endpoint.rest_params {
                for param in &rest.query_params {
                    let artifact = self.create_query_param_data_model(app, param);
                    unit(&param.name, UnitKind::QueryParam, artifact);
                }
                for param in &rest.url_params {
                    let artifact = self.create_path_param_data_model(app, param);
                    unit(&param.name, UnitKind::PathParam, artifact);
                }
            }
            for stmt in endpoint.returns() {
                let artifact = self.create_return_data_model(endpoint, stmt);
                unit(&endpoint.name, UnitKind::Return, artifact);
            }
        }

        for type_name in &type_names {
            let artifact = self.create_type_diagram(app, type_name, true);
            unit(type_name, UnitKind::Type, artifact);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use catalog_core::{
        diagram::{DiagramKind, EmitMode},
        model::Application,
        types::{Primitive, Type},
    };

    fn catalog(module: Module) -> Catalog {
        Catalog::new(module, AppConfig::default().with_output_dir("docs"))
    }

    fn foo() -> Type {
        Type::tuple([("id", Type::primitive(Primitive::String))])
    }

    #[test]
    fn test_simple_type_diagram_leaf() {
        let mut catalog = catalog(Module::from_apps([Application::new("App").with_type("Foo", foo())]));

        let artifact = catalog.create_type_diagram("App", "Foo", false).unwrap();
        assert_eq!(artifact.link(), "App/App/Foosimple.svg");
    }

    #[test]
    fn test_primitive_param_named_after_param() {
        let mut catalog = catalog(Module::from_apps([Application::new("App")]));
        let param = Param::new("id", Type::primitive(Primitive::Int));

        let artifact = catalog.create_param_data_model("App", &param).unwrap();
        assert_eq!(artifact.link(), "App/App/id.svg");
    }

    #[test]
    fn test_sequence_leaf_and_package() {
        let app = Application::new("App")
            .with_attr("package", "shop")
            .with_endpoint(Endpoint::new("Get", "App").with_stmt(Statement::call("Db", "Query")));
        let mut catalog = catalog(Module::from_apps([app]));

        let artifact = catalog.create_sequence_diagram("App", "Get").unwrap();
        assert_eq!(artifact.link(), "shop/App/Get_seq_.svg");
        assert!(catalog.create_sequence_diagram("App", "Missing").is_none());
    }

    #[test]
    fn test_integration_leaves() {
        let mut catalog = catalog(Module::from_apps([
            Application::new("A").with_endpoint(Endpoint::new("Go", "A").with_stmt(Statement::call("B", "Do"))),
            Application::new("B"),
        ]));

        let plain = catalog.create_integration_diagram("Shop", false).unwrap();
        let epa = catalog.create_integration_diagram("Shop", true).unwrap();

        assert_eq!(plain.link(), "Shop/integration.svg");
        assert_eq!(epa.link(), "Shop/integrationEPA.svg");
        assert!(!catalog.module().contains_app(PROJECT_APP));
    }

    #[test]
    fn test_mermaid_inline_returns_source() {
        let config = AppConfig::default()
            .with_diagram(DiagramKind::Mermaid)
            .with_mode(EmitMode::Inline);
        let mut catalog = Catalog::new(Module::from_apps([Application::new("App").with_type("Foo", foo())]), config);

        let artifact = catalog.create_type_diagram("App", "Foo", true).unwrap();

        assert!(matches!(&artifact, Artifact::Inline(source) if source.contains("classDiagram")));
        assert!(catalog.registry().is_empty());
    }

    #[test]
    fn test_document_module_skips_ignored() {
        let ignored = Application::new("Hidden").with_attr("patterns", "ignore").with_type("X", foo());
        let db = Application::new("Store").with_attr("patterns", "db").with_type("Row", foo());
        let mut catalog = catalog(Module::from_apps([ignored, db]));

        let units = catalog.document_module();

        assert!(units.iter().all(|unit| unit.app != "Hidden"));
        let kinds: Vec<_> = units.iter().filter(|unit| unit.app == "Store").map(|unit| unit.kind).collect();
        assert_eq!(kinds, [UnitKind::DataModel, UnitKind::Type]);
        assert!(catalog.registry().get(std::path::Path::new("docs/Store/Store/types.svg")).is_some());
    }
}
