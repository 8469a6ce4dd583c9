//! Indexing and loading of model documents from a data root.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use log::debug;
use serde_json::Value;

use crate::errors::{ModelError, Result};
use crate::merge::apply_extras;
use crate::providers::{FileSystemProvider, JsonProvider};

/// The primary service model type. Extras documents are merged only into
/// models of this type.
pub const SERVICE_MODEL_TYPE: &str = "service-2";

/// Extras kinds shipped with the store. Each kind `k` makes the store look for
/// a sibling `<model-type>.<k>-extras.json` next to the primary model.
const BUILTIN_EXTRAS_KINDS: &[&str] = &["sdk"];

/// Per-version map from model type (file stem, e.g. `service-2`) to file path.
type VersionEntry = BTreeMap<String, PathBuf>;

/// Per-service map from API version to its model files.
type ServiceEntry = BTreeMap<String, VersionEntry>;

/// Finds and loads model documents from a directory tree.
///
/// The tree is indexed once at construction: each service directory is scanned
/// for API-version sub directories, and each of those for `*.json` model
/// files. The index lives for the lifetime of the store; [`ModelStore::rebuild`]
/// is the only way to pick up files added after construction.
///
/// Parsed files are cached per path. Documents handed out are immutable
/// (`load` clones before merging extras), so the store is safe to share across
/// concurrent readers; a racing first parse of the same path is redundant but
/// harmless.
#[derive(Debug)]
pub struct ModelStore {
    data_root: PathBuf,
    extras_kinds: Vec<String>,
    index: BTreeMap<String, ServiceEntry>,
    cache: RwLock<HashMap<PathBuf, Arc<Value>>>,
}

impl ModelStore {
    /// Open a store over `data_root`, scanning the tree to build the index.
    pub async fn open(data_root: impl Into<PathBuf>) -> Result<Self> {
        let data_root = data_root.into();
        let index = Self::build_index(&data_root).await?;
        Ok(Self {
            data_root,
            extras_kinds: BUILTIN_EXTRAS_KINDS.iter().map(ToString::to_string).collect(),
            index,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// The extras kinds applied to primary service models, in merge order.
    pub fn extras_kinds(&self) -> &[String] {
        &self.extras_kinds
    }

    /// Rescan the data root, replacing the index and dropping the parse cache.
    pub async fn rebuild(&mut self) -> Result<()> {
        self.index = Self::build_index(&self.data_root).await?;
        self.cache.write().expect("cache lock poisoned").clear();
        Ok(())
    }

    /// List all services that have at least one API version containing
    /// `model_type`. The list is sorted.
    pub fn list_services(&self, model_type: &str) -> Vec<String> {
        self.index
            .iter()
            .filter(|(_, versions)| {
                versions.values().any(|entry| entry.contains_key(model_type))
            })
            .map(|(service, _)| service.clone())
            .collect()
    }

    /// List all API versions of `service` that contain `model_type`, sorted.
    ///
    /// Fails with `DataNotFound` when no version carries that model type.
    pub fn list_api_versions(&self, service_name: &str, model_type: &str) -> Result<Vec<String>> {
        let versions: Vec<String> = self
            .index
            .get(service_name)
            .map(|versions| {
                versions
                    .iter()
                    .filter(|(_, entry)| entry.contains_key(model_type))
                    .map(|(version, _)| version.clone())
                    .collect()
            })
            .unwrap_or_default();

        if versions.is_empty() {
            return Err(ModelError::data_not_found(service_name));
        }
        Ok(versions)
    }

    /// The latest API version of `service` containing `model_type`: the
    /// lexicographically maximal version directory present on disk.
    pub fn resolve_version(&self, service_name: &str, model_type: &str) -> Result<String> {
        let versions = self.list_api_versions(service_name, model_type)?;
        // list_api_versions is sorted and non-empty
        Ok(versions.last().cloned().expect("non-empty version list"))
    }

    /// Load a model document for `service_name`.
    ///
    /// `model_type` names the document within the version directory, e.g.
    /// `service-2`, `waiters-2`, `paginators-1`. When `api_version` is `None`
    /// the latest version is used. For the primary service model every
    /// configured extras document found next to it is deep-merged into the
    /// result, in extras-kind order; missing extras are skipped silently.
    ///
    /// The returned document is an independent copy; mutating it does not
    /// affect the store's cache.
    pub async fn load(
        &self,
        service_name: &str,
        model_type: &str,
        api_version: Option<&str>,
    ) -> Result<Value> {
        let known_services = self.list_services(model_type);
        if !known_services.iter().any(|s| s == service_name) {
            return Err(ModelError::unknown_service(service_name, &known_services));
        }

        let api_version = match api_version {
            Some(version) => version.to_string(),
            None => self.resolve_version(service_name, model_type)?,
        };

        let entry = self
            .index
            .get(service_name)
            .and_then(|versions| versions.get(&api_version))
            .ok_or_else(|| {
                ModelError::data_not_found(format!("{service_name}/{api_version}/{model_type}"))
            })?;
        let path = entry.get(model_type).ok_or_else(|| {
            ModelError::data_not_found(format!("{service_name}/{api_version}/{model_type}"))
        })?;

        let mut model = (*self.load_file(path).await?).clone();

        if model_type == SERVICE_MODEL_TYPE {
            for kind in &self.extras_kinds {
                let extras_stem = format!("{model_type}.{kind}-extras");
                if let Some(extras_path) = entry.get(&extras_stem) {
                    let extras = self.load_file(extras_path).await?;
                    apply_extras(&mut model, &extras);
                    debug!(
                        "applied {} extras to {}/{}/{}",
                        kind, service_name, api_version, model_type
                    );
                }
            }
        }

        Ok(model)
    }

    /// Load a singleton document addressed by a fixed path relative to the
    /// data root, without service/version resolution.
    ///
    /// `name` omits the `.json` extension, e.g. `endpoints` or `_retry`.
    /// Used for non-versioned config such as endpoint partitions and retry
    /// definitions.
    pub async fn load_data(&self, name: &str) -> Result<Arc<Value>> {
        let path = self.data_root.join(format!("{name}.json"));
        if !FileSystemProvider::file_exists(&path).await? {
            return Err(ModelError::data_not_found(name));
        }
        self.load_file(&path).await
    }

    /// Read and parse one file, through the per-path cache.
    async fn load_file(&self, path: &Path) -> Result<Arc<Value>> {
        if let Some(cached) = self.cache.read().expect("cache lock poisoned").get(path) {
            return Ok(Arc::clone(cached));
        }

        debug!("loading JSON file: {}", path.display());
        let payload = FileSystemProvider::read_file(path).await?;
        let parsed = Arc::new(JsonProvider::parse_to_value(&payload, path)?);

        // A concurrent loader may have gotten here first; either Arc holds an
        // equivalent immutable document, so last-write-wins is fine.
        self.cache
            .write()
            .expect("cache lock poisoned")
            .insert(path.to_path_buf(), Arc::clone(&parsed));

        Ok(parsed)
    }

    async fn build_index(data_root: &Path) -> Result<BTreeMap<String, ServiceEntry>> {
        let mut index = BTreeMap::new();

        for service_dir in FileSystemProvider::list_directories(data_root).await? {
            let Some(service_name) = file_name_string(&service_dir) else {
                continue;
            };

            let mut versions: ServiceEntry = BTreeMap::new();
            for version_dir in FileSystemProvider::list_directories(&service_dir).await? {
                let Some(version) = file_name_string(&version_dir) else {
                    continue;
                };

                let mut entry: VersionEntry = BTreeMap::new();
                for file in FileSystemProvider::list_json_files(&version_dir).await? {
                    if let Some(stem) = model_type_stem(&file) {
                        entry.insert(stem, file);
                    }
                }
                if !entry.is_empty() {
                    versions.insert(version, entry);
                }
            }

            if !versions.is_empty() {
                index.insert(service_name, versions);
            }
        }

        debug!("indexed {} services", index.len());
        Ok(index)
    }
}

fn file_name_string(path: &Path) -> Option<String> {
    path.file_name().and_then(|n| n.to_str()).map(ToString::to_string)
}

/// The model-type key for a file: its name without the `.json` extension.
/// `service-2.json` -> `service-2`, `service-2.sdk-extras.json` ->
/// `service-2.sdk-extras`.
fn model_type_stem(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_suffix(".json"))
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_type_stem_keeps_extras_suffix() {
        assert_eq!(
            model_type_stem(Path::new("/data/ec2/2015-03-01/service-2.json")),
            Some("service-2".to_string())
        );
        assert_eq!(
            model_type_stem(Path::new("/data/ec2/2015-03-01/service-2.sdk-extras.json")),
            Some("service-2.sdk-extras".to_string())
        );
        assert_eq!(model_type_stem(Path::new("/data/ec2/2015-03-01/readme.txt")), None);
    }
}
