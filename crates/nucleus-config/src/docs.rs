use std::env;
use std::path::PathBuf;

/// Locations of the OpenAPI root document and the per-module fragments.
///
/// # Environment Variables
///
/// - `OPENAPI_ROOT`: root document (default: `<manifest dir>/docs/main.yaml`)
/// - `OPENAPI_MODULES_DIR`: directory scanned for `<module>/<module>.yaml`
///   (default: `<manifest dir>/src/modules`)
#[derive(Clone, Debug)]
pub struct DocsConfig {
    pub root_document: PathBuf,
    pub modules_dir: PathBuf,
}

impl DocsConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            root_document: env::var("OPENAPI_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.root_document),
            modules_dir: env::var("OPENAPI_MODULES_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.modules_dir),
        }
    }
}

impl Default for DocsConfig {
    fn default() -> Self {
        // The config crate lives two levels below the workspace root.
        let workspace = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..");
        Self {
            root_document: workspace.join("docs/main.yaml"),
            modules_dir: workspace.join("src/modules"),
        }
    }
}
