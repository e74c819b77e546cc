//! Coordination of parsing, version lookups and annotation rendering
//!
//! One [`Orchestrator`] serves every open document. Lookups for a scan run
//! concurrently, at most [`MAX_CONCURRENT_LOOKUPS`] at a time, and each result
//! is stored as soon as it arrives; results from a scan that has been
//! superseded are dropped by the annotation store.

use std::sync::{Arc, RwLock};

use dashmap::DashMap;
use futures::StreamExt;
use futures::stream;
use tower_lsp::lsp_types::{TextDocumentContentChangeEvent, Url};
use tracing::{debug, info, warn};

use crate::annotation::{
    Annotation, Generation, build_annotation, build_new_dependency_annotation,
};
use crate::config::{FileMatchConfig, LspConfig, MAX_CONCURRENT_LOOKUPS};
use crate::lsp::classifier::{ChangeClassification, EditClassifier};
use crate::lsp::document::DocumentState;
use crate::lsp::host::Host;
use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::is_manifest;
use crate::version::error::RegistryError;
use crate::version::registry::Registry;

pub const NO_ACTIVE_EDITOR_MESSAGE: &str = "No active editor found";
pub const NOT_A_MANIFEST_MESSAGE: &str = "Please open a Cargo.toml file first";

/// Failures contained within a single scan
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Failed to parse manifest: {0}")]
    Parse(#[from] ParseError),

    #[error("Failed to resolve {name}: {source}")]
    Resolution {
        name: String,
        #[source]
        source: RegistryError,
    },

    #[error("Dependency {name} is no longer on its line")]
    NoMatchFound { name: String },
}

pub struct Orchestrator {
    host: Arc<dyn Host>,
    parser: Arc<dyn Parser>,
    registry: Arc<dyn Registry>,
    classifier: EditClassifier,
    config: RwLock<LspConfig>,
    documents: DashMap<Url, DocumentState>,
}

impl Orchestrator {
    pub fn new(host: Arc<dyn Host>, parser: Arc<dyn Parser>, registry: Arc<dyn Registry>) -> Self {
        Self {
            host,
            parser,
            registry,
            classifier: EditClassifier::new(),
            config: RwLock::new(LspConfig::default()),
            documents: DashMap::new(),
        }
    }

    pub fn set_config(&self, config: LspConfig) {
        if let Ok(mut current) = self.config.write() {
            *current = config;
        }
    }

    fn file_match(&self) -> FileMatchConfig {
        self.config
            .read()
            .map(|config| config.file_match.clone())
            .unwrap_or_default()
    }

    /// Track a newly opened document and annotate it if it is a manifest
    pub async fn open(&self, uri: Url, text: String) {
        self.documents.insert(uri.clone(), DocumentState::new(text));

        if !is_manifest(uri.as_str(), self.file_match().open) {
            debug!("Not a manifest, skipping {}", uri);
            return;
        }

        self.scan_and_log(&uri).await;
    }

    /// Apply the changes of one `didChange` event and react to them
    pub async fn change(&self, uri: &Url, changes: &[TextDocumentContentChangeEvent]) {
        let manifest = is_manifest(uri.as_str(), self.file_match().edit);
        let mut new_dependencies = Vec::new();
        let mut rescan = false;

        {
            let Some(mut document) = self.documents.get_mut(uri) else {
                debug!("Change for unknown document {}", uri);
                return;
            };

            for change in changes {
                let Some(line) = document.apply_change(change) else {
                    rescan = true;
                    continue;
                };
                if !manifest {
                    continue;
                }

                let line_text = document.line(line).unwrap_or_default();
                match self.classifier.classify(&change.text, line_text) {
                    ChangeClassification::NewDependencyLine { name } => {
                        new_dependencies.push((name, line))
                    }
                    ChangeClassification::VersionEdit => rescan = true,
                    ChangeClassification::Irrelevant => {}
                }
            }
        }

        if !manifest {
            return;
        }

        if rescan {
            self.scan_and_log(uri).await;
        }

        for (name, line) in new_dependencies {
            if let Err(e) = self.suggest_new_dependency(uri, &name, line).await {
                warn!("{}", e);
            }
        }
    }

    /// Re-annotate after a save, replacing the text when the client sent it
    pub async fn save(&self, uri: &Url, text: Option<String>) {
        if let Some(text) = text {
            self.documents
                .entry(uri.clone())
                .or_default()
                .set_text(text);
        }

        if !is_manifest(uri.as_str(), self.file_match().save) {
            return;
        }

        self.scan_and_log(uri).await;
    }

    /// Manual command: annotate the given manifest on demand
    pub async fn show_latest_versions(&self, uri: Option<&Url>) {
        let Some(uri) = uri.filter(|uri| self.documents.contains_key(*uri)) else {
            self.host.warn(NO_ACTIVE_EDITOR_MESSAGE).await;
            return;
        };

        if !is_manifest(uri.as_str(), self.file_match().edit) {
            self.host.warn(NOT_A_MANIFEST_MESSAGE).await;
            return;
        }

        self.scan_and_log(uri).await;
    }

    /// Track `text` under `uri` and scan it regardless of the file name rules
    pub async fn scan_text(&self, uri: Url, text: String) -> Result<usize, ScanError> {
        self.documents.insert(uri.clone(), DocumentState::new(text));
        self.full_scan(&uri).await
    }

    pub fn close(&self, uri: &Url) {
        self.documents.remove(uri);
    }

    /// Current annotations of a document, anchored at their live line ends
    pub fn annotations(&self, uri: &Url) -> Vec<Annotation> {
        self.documents
            .get(uri)
            .map(|document| document.snapshot())
            .unwrap_or_default()
    }

    pub fn shutdown(&self) {
        self.documents.clear();
    }

    /// Parse the document, look up every dependency and render the results
    ///
    /// A parse failure leaves the current annotations untouched. Returns the
    /// number of annotations written by this scan.
    pub async fn full_scan(&self, uri: &Url) -> Result<usize, ScanError> {
        let Some(text) = self
            .documents
            .get(uri)
            .map(|document| document.text().to_string())
        else {
            return Ok(0);
        };

        let entries = self.parser.parse(&text)?;

        let Some(generation) = self.documents.get_mut(uri).map(|mut document| {
            let generation = document.store.begin_generation();
            for entry in &entries {
                document.store.reserve_anchor(&entry.name, entry.line);
            }
            generation
        }) else {
            return Ok(0);
        };
        info!(
            "Looking up {} dependencies of {} (generation {})",
            entries.len(),
            uri,
            generation
        );

        let registry = self.registry.as_ref();
        let mut lookups = stream::iter(entries)
            .map(move |entry| async move {
                let result = registry.fetch_latest_version(&entry.name).await;
                (entry, result)
            })
            .buffer_unordered(MAX_CONCURRENT_LOOKUPS);

        let mut written = 0;
        while let Some((entry, result)) = lookups.next().await {
            let outcome = match result {
                Ok(latest) => self.write_annotation(
                    uri,
                    generation,
                    build_annotation(&entry, &latest),
                    &[&entry.name, &entry.declared_version_raw],
                ),
                Err(source) => {
                    self.release_anchor(uri, &entry.name, entry.line);
                    Err(ScanError::Resolution {
                        name: entry.name.clone(),
                        source,
                    })
                }
            };

            match outcome {
                Ok(true) => written += 1,
                Ok(false) => {}
                Err(e) => warn!("{}", e),
            }
        }

        self.flush(uri).await;
        Ok(written)
    }

    async fn scan_and_log(&self, uri: &Url) {
        match self.full_scan(uri).await {
            Ok(written) => info!("Annotated {} dependencies in {}", written, uri),
            Err(e) => warn!("Scan of {} stopped: {}", uri, e),
        }
    }

    async fn suggest_new_dependency(
        &self,
        uri: &Url,
        name: &str,
        line: usize,
    ) -> Result<(), ScanError> {
        let Some(generation) = self.documents.get_mut(uri).map(|mut document| {
            document.store.remove(name);
            document.store.reserve_anchor(name, line);
            document.store.generation()
        }) else {
            return Ok(());
        };

        let latest = match self.registry.fetch_latest_version(name).await {
            Ok(latest) => latest,
            Err(source) => {
                self.release_anchor(uri, name, line);
                return Err(ScanError::Resolution {
                    name: name.to_string(),
                    source,
                });
            }
        };

        let annotation = build_new_dependency_annotation(name, line, 0, &latest);
        if self.write_annotation(uri, generation, annotation, &[name])? {
            self.flush(uri).await;
        }
        Ok(())
    }

    /// Store the result of a lookup that started at `annotation.anchor_line`
    ///
    /// The annotation is moved to where that line is now and kept only if the
    /// line still mentions one of `needles`. Returns false when the document
    /// is gone or the generation is stale.
    fn write_annotation(
        &self,
        uri: &Url,
        generation: Generation,
        mut annotation: Annotation,
        needles: &[&str],
    ) -> Result<bool, ScanError> {
        let Some(mut document) = self.documents.get_mut(uri) else {
            return Ok(false);
        };

        if generation < document.store.generation() {
            debug!(
                "Dropping {} from superseded generation {}",
                annotation.dependency_name, generation
            );
            return Ok(false);
        }

        let Some(line) = document
            .store
            .take_anchor(&annotation.dependency_name, annotation.anchor_line)
        else {
            return Err(ScanError::NoMatchFound {
                name: annotation.dependency_name,
            });
        };
        annotation.anchor_line = line;

        let on_line = document.line(annotation.anchor_line).is_some_and(|text| {
            needles
                .iter()
                .any(|needle| !needle.is_empty() && text.contains(needle))
        });
        if !on_line {
            return Err(ScanError::NoMatchFound {
                name: annotation.dependency_name,
            });
        }

        Ok(document.store.set_for_generation(generation, annotation))
    }

    fn release_anchor(&self, uri: &Url, name: &str, line: usize) {
        if let Some(mut document) = self.documents.get_mut(uri) {
            document.store.take_anchor(name, line);
        }
    }

    async fn flush(&self, uri: &Url) {
        let Some(annotations) = self.documents.get(uri).map(|document| document.snapshot()) else {
            return;
        };
        self.host.render(uri, annotations).await;
    }
}
