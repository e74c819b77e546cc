//! One-shot annotation of a manifest file from the command line

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use async_trait::async_trait;
use tower_lsp::lsp_types::Url;
use tracing::{debug, warn};

use crate::annotation::Annotation;
use crate::lsp::host::Host;
use crate::lsp::orchestrator::Orchestrator;
use crate::parser::cargo_toml::CargoTomlParser;
use crate::parser::traits::Parser;
use crate::version::registry::Registry;

/// Host that only logs; the caller prints the final annotations
struct ConsoleHost;

#[async_trait]
impl Host for ConsoleHost {
    async fn render(&self, uri: &Url, annotations: Vec<Annotation>) {
        debug!("{} annotations for {}", annotations.len(), uri);
    }

    async fn warn(&self, message: &str) {
        warn!("{}", message);
    }
}

/// Scan one manifest and return its annotations ordered by line
pub async fn check_manifest(
    path: &Path,
    registry: Arc<dyn Registry>,
) -> anyhow::Result<Vec<Annotation>> {
    let parser = Arc::new(CargoTomlParser::new());
    if !parser.can_parse(&path.to_string_lossy()) {
        bail!("{} is not a Cargo.toml file", path.display());
    }

    let path = std::fs::canonicalize(path)
        .with_context(|| format!("Failed to resolve {}", path.display()))?;
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let uri = Url::from_file_path(&path)
        .map_err(|_| anyhow::anyhow!("Invalid file path {}", path.display()))?;

    let orchestrator = Orchestrator::new(Arc::new(ConsoleHost), parser, registry);
    orchestrator.scan_text(uri.clone(), text).await?;

    Ok(orchestrator.annotations(&uri))
}

/// One output line per annotation, e.g. `3: tokio ⟶ 1.49.0`
pub fn format_annotation(annotation: &Annotation) -> String {
    format!(
        "{}: {}{}",
        annotation.anchor_line + 1,
        annotation.dependency_name,
        annotation.text
    )
}
