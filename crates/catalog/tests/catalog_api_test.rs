//! Integration tests for the Catalog API
//!
//! These tests drive whole documentation units through the public API and
//! check the registered artifacts.

use std::{collections::BTreeSet, fs, path::Path};

use tempfile::tempdir;

use catalog::{
    Artifact, Catalog, UnitKind,
    config::AppConfig,
    render::{self, SourceWriter},
};
use catalog_core::{
    diagram::{DiagramKind, EmitMode},
    model::{Application, Endpoint, Module, Param, RestParams, Statement},
    types::{Primitive, Type},
};

fn foo() -> Type {
    Type::tuple([("id", Type::primitive(Primitive::String))])
}

fn app_module() -> Module {
    Module::from_apps([Application::new("App")
        .with_type("Foo", foo())
        .with_endpoint(
            Endpoint::new("Bar", "App").with_stmt(Statement::ret("ok <: sequence of App.Foo")),
        )])
}

fn type_keys(catalog: &Catalog, app: &str) -> BTreeSet<String> {
    catalog.module().apps[app].types.keys().cloned().collect()
}

#[test]
fn test_type_diagram_path_and_content() {
    let mut catalog = Catalog::new(app_module(), AppConfig::default().with_output_dir("out"));

    let artifact = catalog.create_type_diagram("App", "Foo", true);

    assert_eq!(artifact, Some(Artifact::Registered("App/App/Foo.svg".to_string())));
    let record = catalog
        .registry()
        .get(Path::new("out/App/App/Foo.svg"))
        .expect("Foo should be registered");
    assert!(record.source().contains("id"), "Diagram should list field id");
    assert!(record.url().is_some());
}

#[test]
fn test_sequence_return_stages_wrapper_type() {
    let mut catalog = Catalog::new(app_module(), AppConfig::default().with_output_dir("out"));
    let before = type_keys(&catalog, "App");
    let endpoint = catalog.module().apps["App"].endpoints["Bar"].clone();
    let stmt = endpoint.stmts[0].clone();

    let artifact = catalog
        .create_return_data_model(&endpoint, &stmt)
        .expect("Sequence return should be documented");

    assert_eq!(artifact.link(), "App/App/BarReturnVal.svg");
    let record = catalog
        .registry()
        .get(Path::new("out/App/App/BarReturnVal.svg"))
        .unwrap();
    assert!(record.source().contains("sequence of App.Foo"));
    assert!(record.source().contains("\"Foo\""), "Element type should be drawn");

    assert_eq!(type_keys(&catalog, "App"), before);
    assert!(catalog.module().lookup_type("App", "BarReturnVal").is_none());
}

#[test]
fn test_missing_application_registers_nothing() {
    let mut catalog = Catalog::new(app_module(), AppConfig::default());
    let param = Param::new("body", Type::type_ref("Missing", "Foo"));

    assert!(catalog.create_type_diagram("Missing", "Foo", true).is_none());
    assert!(catalog.create_param_data_model("App", &param).is_none());
    assert!(catalog.generate_data_model("Missing").is_none());
    assert!(catalog.create_sequence_diagram("Missing", "Bar").is_none());
    assert!(catalog.registry().is_empty());
}

#[test]
fn test_return_to_missing_application() {
    let mut catalog = Catalog::new(app_module(), AppConfig::default());
    let endpoint = Endpoint::new("Get", "App");

    let artifact =
        catalog.create_return_data_model(&endpoint, &Statement::ret("ok <: sequence of Gone.Foo"));

    assert!(artifact.is_none());
    assert!(catalog.registry().is_empty());
}

#[test]
fn test_sequence_return_to_missing_type() {
    let mut catalog = Catalog::new(app_module(), AppConfig::default());
    let before = type_keys(&catalog, "App");
    let endpoint = Endpoint::new("Bar", "App");

    let artifact =
        catalog.create_return_data_model(&endpoint, &Statement::ret("ok <: sequence of App.Ghost"));

    assert!(artifact.is_none());
    assert!(catalog.registry().is_empty());
    assert_eq!(type_keys(&catalog, "App"), before);
}

#[test]
fn test_empty_module_documents_nothing() {
    let mut catalog = Catalog::new(Module::default(), AppConfig::default());
    assert_eq!(catalog.title(), "project");

    let units = catalog.document_module();

    assert_eq!(units.len(), 2);
    assert!(units.iter().all(|unit| unit.artifact.is_none()));
    assert!(catalog.registry().is_empty());
}

#[test]
fn test_default_title_is_first_package() {
    let module = Module::from_apps([
        Application::new("Orders").with_attr("package", "shop"),
        Application::new("Billing"),
    ]);
    let mut catalog = Catalog::new(module, AppConfig::default());
    assert_eq!(catalog.title(), "Billing");

    let artifact = catalog.create_integration_diagram("Billing", false).unwrap();
    assert_eq!(artifact.link(), "Billing/integration.svg");
}

#[test]
fn test_rest_params_resolve_against_current_app() {
    let mut catalog = Catalog::new(app_module(), AppConfig::default());
    let query = Param::new("filter", Type::type_ref("", "Foo"));
    let path = Param::new("id", Type::primitive(Primitive::Int));

    let query_artifact = catalog.create_query_param_data_model("App", &query).unwrap();
    let path_artifact = catalog.create_path_param_data_model("App", &path).unwrap();

    assert_eq!(query_artifact.link(), "App/App/Foo.svg");
    assert_eq!(path_artifact.link(), "App/App/id.svg");
}

#[test]
fn test_inline_mode_returns_service_url() {
    let config = AppConfig::default()
        .with_mode(EmitMode::Inline)
        .with_plantuml_service("http://localhost:8080");
    let mut catalog = Catalog::new(app_module(), config);

    let artifact = catalog.create_type_diagram("App", "Foo", true).unwrap();

    match artifact {
        Artifact::Inline(url) => assert!(url.starts_with("http://localhost:8080/svg/~1")),
        other => panic!("Expected inline artifact, got {other:?}"),
    }
    assert!(catalog.registry().is_empty());
}

#[test]
fn test_document_module_is_reproducible() {
    let module = Module::from_apps([
        Application::new("Orders")
            .with_attr("package", "shop")
            .with_type("Order", foo())
            .with_endpoint(Endpoint {
                rest_params: Some(RestParams {
                    method: Some("GET".to_string()),
                    path: Some("/orders/{id}".to_string()),
                    url_params: vec![Param::new("id", Type::primitive(Primitive::String))],
                    query_params: Vec::new(),
                }),
                ..Endpoint::new("GetOrder", "Orders")
                    .with_stmt(Statement::call("Billing", "Charge"))
                    .with_stmt(Statement::ret("ok <: Order"))
            }),
        Application::new("Billing")
            .with_attr("package", "shop")
            .with_endpoint(Endpoint::new("Charge", "Billing")),
    ]);

    let paths = |module: Module| {
        let mut catalog = Catalog::new(module, AppConfig::default()).with_title("Shop");
        let units = catalog.document_module();
        let paths: Vec<_> = catalog
            .registry()
            .records()
            .map(|(path, _)| path.to_path_buf())
            .collect();
        (units, paths)
    };

    let (units, first) = paths(module.clone());
    let (_, second) = paths(module);

    assert_eq!(first, second);
    assert_eq!(first[0], Path::new("docs/Shop/integration.svg"));
    assert!(first.contains(&Path::new("docs/shop/Orders/GetOrder_seq_.svg").to_path_buf()));
    assert!(first.contains(&Path::new("docs/shop/Orders/id.svg").to_path_buf()));

    let return_unit = units
        .iter()
        .find(|unit| unit.kind == UnitKind::Return)
        .unwrap();
    assert_eq!(
        return_unit.artifact.as_ref().map(Artifact::link),
        Some("shop/Orders/Order.svg")
    );
}

#[test]
fn test_persist_mermaid_sources() {
    let dir = tempdir().expect("Failed to create temp directory");
    let config = AppConfig::default()
        .with_output_dir(dir.path())
        .with_diagram(DiagramKind::Mermaid);
    let mut catalog = Catalog::new(app_module(), config);

    catalog.document_module();
    let registry = catalog.into_registry();
    let report = render::persist(&registry, &SourceWriter, &SourceWriter);

    assert!(report.is_success());
    assert_eq!(report.written, registry.len());

    let foo = fs::read_to_string(dir.path().join("App/App/Foo.mmd")).unwrap();
    assert!(foo.starts_with("---\ntitle: App\n---\nclassDiagram\n"));
    let sequence = fs::read_to_string(dir.path().join("App/App/Bar_seq_.mmd")).unwrap();
    assert!(sequence.starts_with("sequenceDiagram\n"));
}
