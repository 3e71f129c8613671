//! Rust source synthesis.
//!
//! Three artifacts are produced from the discovered actions:
//!
//! - `actions.rs` mounts every action file in its own module and records the
//!   declared factory return type as `Signature`
//! - `handlers.rs` wraps each factory in a handler unit and builds a router
//! - `references.rs` declares one logic-free typed reference per action

use std::fs;

use praxis_core::HttpMethod;
use proc_macro2::{Ident, Span, TokenStream};
use quote::{format_ident, quote};
use syn::{Item, ReturnType, Type, Visibility};

use crate::discover::DiscoveredAction;
use crate::error::{CodegenError, CodegenResult};

/// Marker placed at the top of every generated file.
pub const GENERATED_HEADER: &str = "// @generated by praxis-codegen. Do not edit by hand.\n";

/// Generated source text, one field per artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedSources {
    /// Action mounts.
    pub actions: String,
    /// Handler units and the router.
    pub handlers: String,
    /// Typed references.
    pub references: String,
}

/// An action together with its declared factory return type.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedAction {
    pub(crate) action: DiscoveredAction,
    pub(crate) signature: Type,
}

/// Reads an action file and extracts the return type of `pub fn action()`.
pub(crate) fn resolve(action: &DiscoveredAction) -> CodegenResult<ResolvedAction> {
    let path = &action.path;
    let source = fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?;
    let file = syn::parse_file(&source).map_err(|source| CodegenError::Parse {
        path: path.clone(),
        source,
    })?;

    let unsupported = |reason: &str| CodegenError::UnsupportedFactory {
        path: path.clone(),
        reason: reason.to_string(),
    };

    if !file.attrs.is_empty() || file.shebang.is_some() {
        return Err(unsupported(
            "inner attributes and `//!` comments cannot be mounted with include!",
        ));
    }

    let factory = file
        .items
        .iter()
        .find_map(|item| match item {
            Item::Fn(f) if f.sig.ident == "action" => Some(f),
            _ => None,
        })
        .ok_or_else(|| CodegenError::MissingFactory { path: path.clone() })?;

    if !matches!(factory.vis, Visibility::Public(_)) {
        return Err(unsupported("`action` must be `pub`"));
    }
    if factory.sig.asyncness.is_some() {
        return Err(unsupported("`action` must not be async"));
    }
    if !factory.sig.inputs.is_empty() {
        return Err(unsupported("`action` must take no arguments"));
    }
    if !factory.sig.generics.params.is_empty() {
        return Err(unsupported("`action` must not be generic"));
    }

    let signature = match &factory.sig.output {
        ReturnType::Default => return Err(unsupported("`action` must declare its return type")),
        ReturnType::Type(_, ty) => match ty.as_ref() {
            Type::ImplTrait(_) => {
                return Err(unsupported("`action` must name a concrete `Action<..>` type"))
            }
            ty => ty.clone(),
        },
    };

    Ok(ResolvedAction {
        action: action.clone(),
        signature,
    })
}

/// Names the `HttpMethod` variant for `method`.
fn method_variant(method: HttpMethod) -> Ident {
    let variant = match method {
        HttpMethod::Get => "Get",
        HttpMethod::Post => "Post",
        HttpMethod::Put => "Put",
        HttpMethod::Patch => "Patch",
        HttpMethod::Delete => "Delete",
    };
    Ident::new(variant, Span::call_site())
}

fn render(tokens: TokenStream) -> String {
    format!("{GENERATED_HEADER}{tokens}\n")
}

/// Renders all three artifacts.
pub(crate) fn synthesize(
    actions: &[ResolvedAction],
    crate_path: &syn::Path,
    route_prefix: &str,
) -> GeneratedSources {
    GeneratedSources {
        actions: render(actions_module(actions)),
        handlers: render(handlers_module(actions, crate_path, route_prefix)),
        references: render(references_module(actions, crate_path)),
    }
}

fn actions_module(actions: &[ResolvedAction]) -> TokenStream {
    let mounts = actions.iter().map(|resolved| {
        let module = format_ident!("{}", resolved.action.module);
        let file = resolved.action.path.display().to_string();
        let signature = &resolved.signature;
        let doc = format!(" Action mounted from `{}`.", resolved.action.name);
        quote! {
            #[doc = #doc]
            #[allow(missing_docs, dead_code)]
            pub mod #module {
                include!(#file);

                /// Declared return type of this action's factory.
                pub type Signature = #signature;
            }
        }
    });
    quote! { #(#mounts)* }
}

fn handlers_module(
    actions: &[ResolvedAction],
    crate_path: &syn::Path,
    route_prefix: &str,
) -> TokenStream {
    let units = actions.iter().map(|resolved| {
        let action = &resolved.action;
        let ident = format_ident!("{}", action.ident);
        let module = format_ident!("{}", action.module);
        let wrap = if action.method.carries_body() {
            format_ident!("body_handler")
        } else {
            format_ident!("query_handler")
        };
        let doc = format!(" Handler for `{} {}`.", action.method, action.name);
        quote! {
            #[doc = #doc]
            #[allow(non_snake_case)]
            pub fn #ident() -> #crate_path::server::ActionHandler {
                #crate_path::server::#wrap(super::actions::#module::action())
            }
        }
    });

    let routes = actions.iter().map(|resolved| {
        let action = &resolved.action;
        let ident = format_ident!("{}", action.ident);
        let name = &action.name;
        let method = method_variant(action.method);
        quote! {
            .route(#name, #crate_path::HttpMethod::#method, #ident())
        }
    });

    quote! {
        #(#units)*

        /// Builds a router with every discovered action under the configured prefix.
        pub fn router() -> #crate_path::server::ActionRouter {
            router_with_prefix(#route_prefix)
        }

        /// Builds a router with every discovered action under `prefix`.
        pub fn router_with_prefix(prefix: &str) -> #crate_path::server::ActionRouter {
            #crate_path::server::ActionRouter::with_prefix(prefix)
                #(#routes)*
        }
    }
}

fn references_module(actions: &[ResolvedAction], crate_path: &syn::Path) -> TokenStream {
    let references = actions.iter().map(|resolved| {
        let action = &resolved.action;
        let ident = format_ident!("{}", action.ident);
        let module = format_ident!("{}", action.module);
        let name = &action.name;
        let method = method_variant(action.method);
        let doc = format!(" Typed reference to `{} {}`.", action.method, action.name);
        quote! {
            #[doc = #doc]
            #[allow(non_upper_case_globals)]
            pub const #ident: #crate_path::ReferenceOf<super::actions::#module::Signature> =
                #crate_path::SafeActionReference::new(#name, #crate_path::HttpMethod::#method);
        }
    });

    quote! { #(#references)* }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn discovered(dir: &std::path::Path, name: &str, method: HttpMethod, source: &str) -> DiscoveredAction {
        let path = dir.join(format!("{}.rs", name.replace('/', "_")));
        fs::write(&path, source).unwrap();
        DiscoveredAction {
            name: name.to_string(),
            method,
            ident: crate::naming::to_camel_case(name),
            module: crate::naming::module_name(name),
            path,
        }
    }

    #[test]
    fn test_resolve_reads_return_type() {
        let dir = tempfile::tempdir().unwrap();
        let action = discovered(
            dir.path(),
            "get-user",
            HttpMethod::Get,
            "pub fn action() -> Action<UserId, User> { todo!() }",
        );

        let resolved = resolve(&action).unwrap();
        let expected: Type = syn::parse_quote!(Action<UserId, User>);
        assert_eq!(resolved.signature, expected);
    }

    #[test]
    fn test_missing_factory() {
        let dir = tempfile::tempdir().unwrap();
        let action = discovered(dir.path(), "x", HttpMethod::Post, "pub fn other() {}");
        assert!(matches!(
            resolve(&action).unwrap_err(),
            CodegenError::MissingFactory { .. }
        ));
    }

    #[test]
    fn test_private_factory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let action = discovered(
            dir.path(),
            "x",
            HttpMethod::Post,
            "fn action() -> Action<Value, Value> { todo!() }",
        );
        assert!(matches!(
            resolve(&action).unwrap_err(),
            CodegenError::UnsupportedFactory { .. }
        ));
    }

    #[test]
    fn test_impl_trait_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let action = discovered(
            dir.path(),
            "x",
            HttpMethod::Post,
            "pub fn action() -> impl Sized { 1 }",
        );
        assert!(matches!(
            resolve(&action).unwrap_err(),
            CodegenError::UnsupportedFactory { .. }
        ));
    }

    #[test]
    fn test_inner_doc_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let action = discovered(
            dir.path(),
            "x",
            HttpMethod::Post,
            "//! docs\npub fn action() -> Action<Value, Value> { todo!() }",
        );
        assert!(matches!(
            resolve(&action).unwrap_err(),
            CodegenError::UnsupportedFactory { .. }
        ));
    }

    #[test]
    fn test_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let action = discovered(dir.path(), "x", HttpMethod::Post, "pub fn action( {");
        assert!(matches!(
            resolve(&action).unwrap_err(),
            CodegenError::Parse { .. }
        ));
    }

    #[test]
    fn test_method_variant_names() {
        let names: Vec<_> = HttpMethod::ALL
            .iter()
            .map(|m| method_variant(*m).to_string())
            .collect();
        assert_eq!(names, vec!["Get", "Post", "Put", "Patch", "Delete"]);
    }

    #[test]
    fn test_synthesize_picks_wrapper_by_method() {
        let resolved = |name: &str, method| ResolvedAction {
            action: DiscoveredAction {
                name: name.to_string(),
                method,
                ident: crate::naming::to_camel_case(name),
                module: crate::naming::module_name(name),
                path: PathBuf::from(format!("/actions/{name}.rs")),
            },
            signature: syn::parse_quote!(Action<Value, Value>),
        };
        let actions = [
            resolved("get-user", HttpMethod::Get),
            resolved("update-user", HttpMethod::Put),
        ];

        let out = synthesize(&actions, &syn::parse_quote!(::praxis), "/api/_actions");
        assert!(out.handlers.starts_with(GENERATED_HEADER));

        let compact = |s: &str| s.split_whitespace().collect::<String>();
        let handlers = compact(&out.handlers);
        assert!(handlers.contains("pubfngetUser()"));
        assert!(handlers.contains("query_handler(super::actions::get_user::action())"));
        assert!(handlers.contains("body_handler(super::actions::update_user::action())"));
        assert!(handlers.contains(".route(\"update-user\",::praxis::HttpMethod::Put,updateUser())"));
        assert!(compact(&out.references).contains("pubconstupdateUser:::praxis::ReferenceOf<"));
        assert!(compact(&out.actions).contains("include!(\"/actions/get-user.rs\");"));
    }
}
