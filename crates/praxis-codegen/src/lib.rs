//! # Praxis Codegen
//!
//! Build-time discovery and synthesis for praxis actions.
//!
//! Every Rust file below the actions directory defines one action through a
//! `pub fn action() -> Action<I, O, E>` factory. The route name is the file's
//! path relative to that directory, and an optional last dot-segment picks the
//! HTTP method:
//!
//! | File                         | Route                       | Method |
//! |------------------------------|-----------------------------|--------|
//! | `create-post.rs`             | `/api/_actions/create-post` | POST   |
//! | `get-user.get.rs`            | `/api/_actions/get-user`    | GET    |
//! | `auth/login.rs`              | `/api/_actions/auth/login`  | POST   |
//!
//! Typical `build.rs`:
//!
//! ```no_run
//! fn main() {
//!     let out_dir = std::env::var("OUT_DIR").unwrap();
//!     let codegen = praxis_codegen::Codegen::new("server/actions");
//!     codegen.emit_rerun_directives();
//!     codegen.write_to(out_dir).unwrap();
//! }
//! ```
//!
//! and in the crate:
//!
//! ```ignore
//! include!(concat!(env!("OUT_DIR"), "/praxis/mod.rs"));
//!
//! let router = handlers::router();
//! let reference = references::createPost;
//! ```

#![doc(html_root_url = "https://docs.rs/praxis-codegen/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod discover;
mod error;
mod generate;
mod naming;

use std::fs;
use std::path::{Path, PathBuf};

use praxis_core::DEFAULT_ROUTE_PREFIX;
use quote::quote;

pub use discover::{discover, DiscoveredAction};
pub use error::{CodegenError, CodegenResult};
pub use generate::{GeneratedSources, GENERATED_HEADER};
pub use naming::{is_identifier, module_name, parse_method_suffix, to_camel_case};

/// Default actions directory, relative to the crate root.
pub const DEFAULT_ACTIONS_DIR: &str = "server/actions";

/// Default action file extension.
pub const DEFAULT_EXTENSION: &str = "rs";

/// Subdirectory of the output directory holding generated files.
pub const OUTPUT_SUBDIR: &str = "praxis";

/// Discovery and synthesis entry point.
#[derive(Debug, Clone)]
pub struct Codegen {
    actions_dir: PathBuf,
    extension: String,
    route_prefix: String,
    crate_path: syn::Path,
}

impl Default for Codegen {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIONS_DIR)
    }
}

impl Codegen {
    /// Creates a generator over `actions_dir`.
    pub fn new(actions_dir: impl Into<PathBuf>) -> Self {
        Self {
            actions_dir: actions_dir.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            route_prefix: DEFAULT_ROUTE_PREFIX.to_string(),
            crate_path: syn::parse_quote!(::praxis),
        }
    }

    /// Sets the action file extension (without the dot).
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// Sets the prefix used by the generated `router()`.
    pub fn route_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.route_prefix = prefix.into();
        self
    }

    /// Sets the path generated code uses to reach the praxis facade.
    ///
    /// Defaults to `::praxis`; useful when the facade is re-exported or
    /// renamed in `Cargo.toml`.
    pub fn crate_path(mut self, path: syn::Path) -> Self {
        self.crate_path = path;
        self
    }

    /// Returns the actions directory.
    pub fn actions_dir(&self) -> &Path {
        &self.actions_dir
    }

    /// Scans the actions directory.
    pub fn discover(&self) -> CodegenResult<Vec<DiscoveredAction>> {
        discover(&self.actions_dir, &self.extension)
    }

    /// Discovers actions and renders the generated sources.
    pub fn generate(&self) -> CodegenResult<GeneratedSources> {
        let resolved = self
            .discover()?
            .iter()
            .map(generate::resolve)
            .collect::<CodegenResult<Vec<_>>>()?;
        Ok(generate::synthesize(
            &resolved,
            &self.crate_path,
            &self.route_prefix,
        ))
    }

    /// Generates sources and writes them under `<out_dir>/praxis/`.
    ///
    /// Returns the path of the generated `mod.rs`, which mounts `actions`,
    /// `handlers` and `references` as sibling modules. Files whose content
    /// is unchanged are not rewritten.
    pub fn write_to(&self, out_dir: impl AsRef<Path>) -> CodegenResult<PathBuf> {
        let sources = self.generate()?;
        let dir = out_dir.as_ref().join(OUTPUT_SUBDIR);
        fs::create_dir_all(&dir).map_err(|e| CodegenError::io(&dir, e))?;

        let files = [
            ("actions.rs", sources.actions),
            ("handlers.rs", sources.handlers),
            ("references.rs", sources.references),
        ];
        for (name, content) in &files {
            write_if_changed(&dir.join(name), content)?;
        }

        let mount = |module: &str, file: &str| {
            let module = quote::format_ident!("{}", module);
            let path = dir.join(file).display().to_string();
            quote! {
                #[allow(missing_docs, clippy::all)]
                pub mod #module {
                    include!(#path);
                }
            }
        };
        let actions = mount("actions", "actions.rs");
        let handlers = mount("handlers", "handlers.rs");
        let references = mount("references", "references.rs");
        let entry = format!("{GENERATED_HEADER}{}\n", quote! { #actions #handlers #references });

        let entry_path = dir.join("mod.rs");
        write_if_changed(&entry_path, &entry)?;
        tracing::debug!(path = %entry_path.display(), "Wrote generated action sources");
        Ok(entry_path)
    }

    /// Prints `cargo:rerun-if-changed` for the actions directory.
    ///
    /// Only meaningful when called from a build script.
    pub fn emit_rerun_directives(&self) {
        println!("cargo:rerun-if-changed={}", self.actions_dir.display());
    }
}

fn write_if_changed(path: &Path, content: &str) -> CodegenResult<()> {
    if fs::read_to_string(path).is_ok_and(|existing| existing == content) {
        return Ok(());
    }
    fs::write(path, content).map_err(|e| CodegenError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_strips_dot() {
        let codegen = Codegen::new("x").extension(".rsx");
        assert_eq!(codegen.extension, "rsx");
    }

    #[test]
    fn test_write_if_changed_keeps_identical_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.rs");
        write_if_changed(&path, "one").unwrap();
        let before = fs::metadata(&path).unwrap().modified().unwrap();

        write_if_changed(&path, "one").unwrap();
        assert_eq!(fs::metadata(&path).unwrap().modified().unwrap(), before);

        write_if_changed(&path, "two").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "two");
    }
}
