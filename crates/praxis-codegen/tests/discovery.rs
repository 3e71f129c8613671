//! Discovery and generation over a fixture actions directory.

use std::fs;
use std::path::Path;

use praxis_codegen::{Codegen, CodegenError, GENERATED_HEADER};
use praxis_core::HttpMethod;

const FACTORY: &str = "use praxis::prelude::*;\n\npub fn action() -> Action<Value, String> {\n    create_safe_action_client().action(|_args: HandlerArgs<EmptyContext, Value>| async move { Ok(String::new()) })\n}\n";

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for rel in [
        "update-user.put.rs",
        "create-post.rs",
        "auth/login.rs",
        "nested/deep-action.rs",
        "get-user.get.rs",
        "remove-post.DELETE.rs",
    ] {
        write(dir.path(), rel, FACTORY);
    }
    write(dir.path(), "mod.rs", "pub mod helpers;");
    write(dir.path(), "README.md", "# actions");
    dir
}

#[test]
fn discovers_routes_methods_and_identifiers() {
    let dir = fixture();
    let actions = Codegen::new(dir.path()).discover().unwrap();

    let summary: Vec<_> = actions
        .iter()
        .map(|a| (a.name.as_str(), a.method, a.ident.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("auth/login", HttpMethod::Post, "authLogin"),
            ("create-post", HttpMethod::Post, "createPost"),
            ("get-user", HttpMethod::Get, "getUser"),
            ("nested/deep-action", HttpMethod::Post, "nestedDeepAction"),
            ("remove-post", HttpMethod::Delete, "removePost"),
            ("update-user", HttpMethod::Put, "updateUser"),
        ]
    );
}

#[test]
fn discovery_is_deterministic() {
    let dir = fixture();
    let codegen = Codegen::new(dir.path());
    assert_eq!(codegen.generate().unwrap(), codegen.generate().unwrap());
}

#[test]
fn writes_all_artifacts() {
    let dir = fixture();
    let out = tempfile::tempdir().unwrap();

    let entry = Codegen::new(dir.path()).write_to(out.path()).unwrap();
    assert_eq!(entry, out.path().join("praxis").join("mod.rs"));

    for file in ["mod.rs", "actions.rs", "handlers.rs", "references.rs"] {
        let content = fs::read_to_string(out.path().join("praxis").join(file)).unwrap();
        assert!(content.starts_with(GENERATED_HEADER), "{file} lacks header");
    }

    let compact = |file: &str| {
        fs::read_to_string(out.path().join("praxis").join(file))
            .unwrap()
            .split_whitespace()
            .collect::<String>()
    };
    let handlers = compact("handlers.rs");
    assert!(handlers.contains("query_handler(super::actions::get_user::action())"));
    assert!(handlers.contains(".route(\"auth/login\",::praxis::HttpMethod::Post,authLogin())"));
    assert!(handlers.contains("router_with_prefix(\"/api/_actions\")"));

    let references = compact("references.rs");
    assert!(references.contains(
        "SafeActionReference::new(\"nested/deep-action\",::praxis::HttpMethod::Post)"
    ));

    let actions = compact("actions.rs");
    assert!(actions.contains("pubmodupdate_user{"));
    assert!(actions.contains("pubtypeSignature=Action<Value,String>;"));
}

#[test]
fn custom_prefix_and_crate_path() {
    let dir = fixture();
    let sources = Codegen::new(dir.path())
        .route_prefix("/rpc")
        .crate_path(syn::parse_quote!(crate::praxis))
        .generate()
        .unwrap();

    let handlers: String = sources.handlers.split_whitespace().collect();
    assert!(handlers.contains("router_with_prefix(\"/rpc\")"));
    assert!(handlers.contains("crate::praxis::server::ActionRouter"));
}

#[test]
fn missing_directory_generates_empty_router() {
    let dir = tempfile::tempdir().unwrap();
    let sources = Codegen::new(dir.path().join("server/actions"))
        .generate()
        .unwrap();

    assert_eq!(sources.actions.trim(), GENERATED_HEADER.trim());
    assert!(sources.handlers.contains("router"));
    assert_eq!(sources.references.trim(), GENERATED_HEADER.trim());
}

#[test]
fn missing_factory_is_reported() {
    let dir = fixture();
    write(dir.path(), "broken.rs", "pub fn not_action() {}");

    let err = Codegen::new(dir.path()).generate().unwrap_err();
    match err {
        CodegenError::MissingFactory { path } => assert!(path.ends_with("broken.rs")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn custom_extension() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "ping.action", FACTORY);
    write(dir.path(), "pong.rs", FACTORY);

    let actions = Codegen::new(dir.path()).extension("action").discover().unwrap();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].name, "ping");
}

#[test]
fn relative_root_emits_absolute_includes() {
    let cwd = std::env::current_dir().unwrap();
    let dir = tempfile::tempdir_in(&cwd).unwrap();
    write(dir.path(), "greet.rs", FACTORY);
    write(dir.path(), "auth/login.rs", FACTORY);
    let relative = dir.path().strip_prefix(&cwd).unwrap();

    let sources = Codegen::new(relative).generate().unwrap();
    let file = syn::parse_file(&sources.actions).unwrap();
    let mut includes = Vec::new();
    for item in &file.items {
        let syn::Item::Mod(module) = item else { continue };
        let Some((_, items)) = &module.content else { continue };
        for inner in items {
            if let syn::Item::Macro(mac) = inner {
                if mac.mac.path.is_ident("include") {
                    let lit: syn::LitStr = mac.mac.parse_body().unwrap();
                    includes.push(std::path::PathBuf::from(lit.value()));
                }
            }
        }
    }

    assert_eq!(includes.len(), 2);
    assert!(includes.iter().all(|path| path.is_absolute() && path.is_file()));
    assert!(sources.references.contains("greet"));
}
