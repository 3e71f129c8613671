//! Action file discovery.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use praxis_core::HttpMethod;
use walkdir::{DirEntry, WalkDir};

use crate::error::{CodegenError, CodegenResult};
use crate::naming::{is_identifier, module_name, parse_method_suffix, to_camel_case};

/// File names that never define an action.
const RESERVED_FILES: [&str; 3] = ["mod", "lib", "main"];

/// One action file found below the actions directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredAction {
    /// Route name relative to the actions directory, e.g. `auth/login`.
    pub name: String,
    /// Method inferred from the file name suffix.
    pub method: HttpMethod,
    /// camelCase identifier for handler units and references.
    pub ident: String,
    /// Module name of the generated action mount.
    pub module: String,
    /// Path to the source file.
    pub path: PathBuf,
}

/// Files starting with `.` or `_` are helpers, not actions. Directories are
/// always traversed.
fn is_excluded_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.') || name.starts_with('_'))
}

/// Scans `root` for action files with the given extension.
///
/// Results follow file-name order at every level. A missing directory
/// yields no actions. `root` is canonicalized first, so every
/// [`DiscoveredAction::path`] is absolute and can be `include!`d from any
/// output directory.
pub fn discover(root: &Path, extension: &str) -> CodegenResult<Vec<DiscoveredAction>> {
    if !root.is_dir() {
        tracing::info!(
            dir = %root.display(),
            "No actions directory found, skipping action route generation"
        );
        return Ok(Vec::new());
    }
    let root = &root.canonicalize().map_err(|e| CodegenError::io(root, e))?;

    let mut actions = Vec::new();
    let mut seen = Registry::default();

    let walker = WalkDir::new(root).sort_by_file_name();

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || is_excluded_file(&entry) {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(extension) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            tracing::warn!(path = %path.display(), "Skipping action file with a non UTF-8 name");
            continue;
        };
        if RESERVED_FILES.contains(&stem) {
            continue;
        }

        let (parsed, method) = parse_method_suffix(stem);
        let name = match route_prefix(root, path) {
            Some(prefix) => format!("{prefix}/{parsed}"),
            None => parsed,
        };

        let ident = to_camel_case(&name);
        if !is_identifier(&ident) {
            return Err(CodegenError::InvalidIdentifier { name, ident });
        }
        let module = module_name(&name);

        seen.claim(Claim::Name, &name, path)?;
        seen.claim(Claim::Ident, &ident, path)?;
        seen.claim(Claim::Module, &module, path)?;

        tracing::debug!(action = %name, method = %method, "Discovered action");
        actions.push(DiscoveredAction {
            name,
            method,
            ident,
            module,
            path: path.to_path_buf(),
        });
    }

    if actions.is_empty() {
        tracing::info!("No action files found");
    } else {
        tracing::info!(
            count = actions.len(),
            actions = %actions
                .iter()
                .map(|a| format!("{} {}", a.method, a.name))
                .collect::<Vec<_>>()
                .join(", "),
            "Found action files"
        );
    }

    Ok(actions)
}

/// Joins the directories between `root` and `path` with `/`.
fn route_prefix(root: &Path, path: &Path) -> Option<String> {
    let parent = path.parent()?.strip_prefix(root).ok()?;
    let segments: Vec<_> = parent
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    (!segments.is_empty()).then(|| segments.join("/"))
}

/// Namespaces an action occupies in the generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Claim {
    Name,
    Ident,
    Module,
}

#[derive(Default)]
struct Registry {
    claimed: HashMap<(Claim, String), PathBuf>,
}

impl Registry {
    fn claim(&mut self, kind: Claim, key: &str, path: &Path) -> CodegenResult<()> {
        let slot = (kind, key.to_string());
        if let Some(first) = self.claimed.get(&slot) {
            return Err(CodegenError::DuplicateAction {
                name: key.to_string(),
                first: first.clone(),
                second: path.to_path_buf(),
            });
        }
        self.claimed.insert(slot, path.to_path_buf());
        Ok(())
    }
}
