//! OpenAPI document aggregation.
//!
//! The API description is split into a root document plus one fragment per
//! feature module, stored next to the module as `<module>/<module>.yaml`.
//! [`DocsAggregator`] discovers the fragments, merges their `paths`,
//! `components.schemas` and `components.securitySchemes` into the root and
//! serves the result as JSON or YAML.
//!
//! Module directories are visited in lexicographic order. When two fragments
//! define the same key the later module wins and the collision is logged.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Number, Value};
use thiserror::Error;
use tokio::sync::RwLock;

use nucleus_config::{AppEnv, DocsConfig};

#[derive(Debug, Error)]
pub enum DocsError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Root document {path} is not a mapping")]
    InvalidRoot { path: PathBuf },

    #[error("Failed to serialize OpenAPI document: {0}")]
    Serialize(String),
}

/// A parsed module fragment.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub module: String,
    pub document: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    Path,
    Schema,
    SecurityScheme,
}

impl fmt::Display for CollisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CollisionKind::Path => "path",
            CollisionKind::Schema => "schema",
            CollisionKind::SecurityScheme => "security scheme",
        })
    }
}

/// A key defined by more than one source. `module` is the module whose
/// definition was kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub kind: CollisionKind,
    pub name: String,
    pub module: String,
}

/// Builds and caches the merged OpenAPI document.
///
/// The cache is only consulted in production, other environments rebuild on
/// every access so fragment edits show up immediately.
pub struct DocsAggregator {
    config: DocsConfig,
    env: AppEnv,
    cache: RwLock<Option<Arc<Value>>>,
}

impl DocsAggregator {
    pub fn new(config: DocsConfig, env: AppEnv) -> Self {
        Self {
            config,
            env,
            cache: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &DocsConfig {
        &self.config
    }

    /// Returns the merged document.
    pub async fn document(&self) -> Result<Arc<Value>, DocsError> {
        if self.env.is_production() {
            if let Some(document) = self.cache.read().await.as_ref() {
                return Ok(Arc::clone(document));
            }
        }

        let document = Arc::new(self.build().await?);
        *self.cache.write().await = Some(Arc::clone(&document));
        Ok(document)
    }

    pub async fn to_json(&self) -> Result<String, DocsError> {
        let document = self.document().await?;
        serde_json::to_string(document.as_ref()).map_err(|e| DocsError::Serialize(e.to_string()))
    }

    pub async fn to_yaml(&self) -> Result<String, DocsError> {
        let document = self.document().await?;
        serde_yaml::to_string(document.as_ref()).map_err(|e| DocsError::Serialize(e.to_string()))
    }

    /// Drops the cached document. The next access rebuilds it.
    pub async fn invalidate(&self) {
        self.cache.write().await.take();
    }

    async fn build(&self) -> Result<Value, DocsError> {
        let root_path = &self.config.root_document;
        let Value::Object(root) = load_yaml(root_path).await? else {
            return Err(DocsError::InvalidRoot {
                path: root_path.clone(),
            });
        };

        let fragments = discover_fragments(&self.config.modules_dir).await?;
        let (merged, collisions) = merge_fragments(root, &fragments);

        tracing::debug!(
            fragments = fragments.len(),
            collisions = collisions.len(),
            "Built OpenAPI document"
        );
        Ok(Value::Object(merged))
    }
}

/// Loads `<dir>/<module>/<module>.yaml` for every module directory in `dir`.
///
/// A fragment that cannot be read or parsed, or that is not a mapping, is
/// skipped with a warning. Failing to list `dir` itself is an error.
pub async fn discover_fragments(dir: &Path) -> Result<Vec<Fragment>, DocsError> {
    let read_error = |source| DocsError::Read {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_error)?;
    let mut modules = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_error)? {
        let is_dir = tokio::fs::metadata(entry.path())
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);
        if !is_dir {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            modules.push(name.to_string());
        }
    }
    modules.sort();

    let mut fragments = Vec::new();
    for module in modules {
        let path = dir.join(&module).join(format!("{module}.yaml"));
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            continue;
        }

        match load_yaml(&path).await {
            Ok(Value::Object(document)) => {
                tracing::info!(module = %module, "Loaded OpenAPI spec from module");
                fragments.push(Fragment { module, document });
            }
            Ok(_) => {
                tracing::warn!(module = %module, "OpenAPI fragment is not a mapping, skipping");
            }
            Err(err) => {
                tracing::warn!(module = %module, error = %err, "Could not load OpenAPI fragment");
            }
        }
    }

    Ok(fragments)
}

/// Merges `fragments` into `root` in order. Returns the merged document and
/// every collision encountered.
pub fn merge_fragments(
    mut root: Map<String, Value>,
    fragments: &[Fragment],
) -> (Map<String, Value>, Vec<Collision>) {
    let mut collisions = Vec::new();

    for fragment in fragments {
        if let Some(paths) = fragment.document.get("paths").and_then(Value::as_object) {
            let target = object_entry(&mut root, "paths");
            merge_section(target, paths, CollisionKind::Path, &fragment.module, &mut collisions);
        }
    }

    for (key, kind) in [
        ("schemas", CollisionKind::Schema),
        ("securitySchemes", CollisionKind::SecurityScheme),
    ] {
        for fragment in fragments {
            let Some(section) = fragment
                .document
                .get("components")
                .and_then(|components| components.get(key))
                .and_then(Value::as_object)
            else {
                continue;
            };

            let components = object_entry(&mut root, "components");
            let target = object_entry(components, key);
            merge_section(target, section, kind, &fragment.module, &mut collisions);
        }
    }

    (root, collisions)
}

fn merge_section(
    target: &mut Map<String, Value>,
    source: &Map<String, Value>,
    kind: CollisionKind,
    module: &str,
    collisions: &mut Vec<Collision>,
) {
    for (name, definition) in source {
        if target.contains_key(name) {
            tracing::warn!(
                kind = %kind,
                name = %name,
                module = %module,
                "Duplicate definition detected in OpenAPI, overwriting"
            );
            collisions.push(Collision {
                kind,
                name: name.clone(),
                module: module.to_string(),
            });
        }
        target.insert(name.clone(), definition.clone());
    }
}

/// The object stored under `key`, created (or replacing a non-object) in
/// place so the key keeps its position.
fn object_entry<'a>(map: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let slot = map
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    let Value::Object(object) = slot else {
        unreachable!("slot holds an object");
    };
    object
}

async fn load_yaml(path: &Path) -> Result<Value, DocsError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DocsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|source| DocsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(yaml_to_json(yaml))
}

/// OpenAPI documents commonly use unquoted status codes as keys, so mapping
/// keys are stringified instead of rejected.
fn yaml_to_json(yaml: serde_yaml::Value) -> Value {
    match yaml {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(Number::from(i))
            } else if let Some(u) = n.as_u64() {
                Value::Number(Number::from(u))
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => Value::Array(seq.into_iter().map(yaml_to_json).collect()),
        serde_yaml::Value::Mapping(mapping) => {
            let mut object = Map::new();
            for (key, value) in mapping {
                let key = match key {
                    serde_yaml::Value::String(s) => s,
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    serde_yaml::Value::Null => "null".to_string(),
                    other => format!("{other:?}"),
                };
                object.insert(key, yaml_to_json(value));
            }
            Value::Object(object)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fragment(module: &str, document: Value) -> Fragment {
        let Value::Object(document) = document else {
            panic!("fragment must be an object");
        };
        Fragment {
            module: module.to_string(),
            document,
        }
    }

    fn root(document: Value) -> Map<String, Value> {
        document.as_object().cloned().unwrap()
    }

    #[test]
    fn later_fragment_wins_path_collisions() {
        let fragments = [
            fragment("alpha", json!({"paths": {"/x": {"get": {"summary": "alpha"}}}})),
            fragment("beta", json!({"paths": {"/x": {"get": {"summary": "beta"}}}})),
        ];

        let (merged, collisions) = merge_fragments(root(json!({"openapi": "3.0.0"})), &fragments);

        assert_eq!(merged["paths"].as_object().unwrap().len(), 1);
        assert_eq!(merged["paths"]["/x"]["get"]["summary"], "beta");
        assert_eq!(
            collisions,
            vec![Collision {
                kind: CollisionKind::Path,
                name: "/x".into(),
                module: "beta".into(),
            }]
        );
    }

    #[test]
    fn root_paths_can_be_overwritten() {
        let fragments = [fragment("auth", json!({"paths": {"/": {"get": {}}}}))];
        let (_, collisions) =
            merge_fragments(root(json!({"paths": {"/": {"post": {}}}})), &fragments);
        assert_eq!(collisions.len(), 1);
    }

    #[test]
    fn components_are_created_when_absent() {
        let fragments = [fragment(
            "auth",
            json!({
                "components": {
                    "schemas": {"User": {"type": "object"}},
                    "securitySchemes": {"bearerAuth": {"type": "http", "scheme": "bearer"}}
                }
            }),
        )];

        let (merged, collisions) = merge_fragments(root(json!({"openapi": "3.0.0"})), &fragments);

        assert!(collisions.is_empty());
        assert_eq!(merged["components"]["schemas"]["User"]["type"], "object");
        assert_eq!(
            merged["components"]["securitySchemes"]["bearerAuth"]["scheme"],
            "bearer"
        );
        assert!(merged.get("paths").is_none());
    }

    #[test]
    fn schema_and_scheme_collisions_are_reported_separately() {
        let fragments = [
            fragment(
                "a",
                json!({"components": {"schemas": {"Error": {"title": "a"}}}}),
            ),
            fragment(
                "b",
                json!({"components": {
                    "schemas": {"Error": {"title": "b"}},
                    "securitySchemes": {"bearerAuth": {"type": "http"}}
                }}),
            ),
        ];
        let base = root(json!({"components": {"securitySchemes": {"bearerAuth": {}}}}));

        let (merged, collisions) = merge_fragments(base, &fragments);

        assert_eq!(merged["components"]["schemas"]["Error"]["title"], "b");
        assert_eq!(merged["components"]["securitySchemes"]["bearerAuth"]["type"], "http");
        let kinds: Vec<_> = collisions.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![CollisionKind::Schema, CollisionKind::SecurityScheme]);
    }

    #[test]
    fn non_object_containers_are_replaced() {
        let fragments = [fragment("a", json!({"paths": {"/a": {}}}))];
        let (merged, _) = merge_fragments(root(json!({"paths": null, "info": {}})), &fragments);
        assert_eq!(merged["paths"], json!({"/a": {}}));
        let keys: Vec<_> = merged.keys().cloned().collect();
        assert_eq!(keys, vec!["paths", "info"]);
    }

    #[test]
    fn numeric_yaml_keys_become_strings() {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str("responses:\n  200:\n    description: OK\n").unwrap();
        let value = yaml_to_json(yaml);
        assert_eq!(value["responses"]["200"]["description"], "OK");
    }
}
