//! Generation pipeline: validate, index, build, render, write.

use crate::builder::TypeModelBuilder;
use crate::config::GeneratorConfig;
use crate::introspect::platform::PlatformTypes;
use crate::introspect::source::SourceIndex;
use crate::introspect::{Introspectors, TypeIntrospector};
use crate::model::TypeOrigin;
use crate::render::{self, ExampleRoots, Page, Site};
use crate::xref::CrossReferenceResolver;
use anyhow::{Context, Result};
use std::fs;

/// Run one full generation. Configuration errors abort before any output
/// is written; the index page is written last.
pub fn run(config: &GeneratorConfig) -> Result<Vec<String>> {
    config.validate()?;

    let (index, local_names) = index_sources(config)?;
    let introspector = Introspectors::new(vec![Box::new(index), Box::new(PlatformTypes::new())]);
    let pages = render_pages(config, &introspector, &local_names);

    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("failed to create output directory: {}", config.output_dir.display())
    })?;

    let mut written = Vec::with_capacity(pages.len());
    for page in pages {
        let path = config.output_dir.join(&page.file_name);
        fs::write(&path, &page.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        written.push(page.file_name);
    }
    tracing::info!("wrote {} pages to {}", written.len(), config.output_dir.display());
    Ok(written)
}

fn index_sources(config: &GeneratorConfig) -> Result<(SourceIndex, Vec<String>)> {
    let mut index = SourceIndex::new();
    let mut files = 0;
    for root in config.source_dirs() {
        files += index.index_root(&root, &config.project_dir, TypeOrigin::Local)?;
    }
    for root in config.library_dirs() {
        files += index.index_root(&root, &config.project_dir, TypeOrigin::Library)?;
    }
    let local_names = index.local_names();
    tracing::info!(
        "indexed {} files: {} types, {} documented",
        files,
        index.len(),
        local_names.len()
    );
    Ok((index, local_names))
}

/// Build descriptors for every local, non-internal type and render them.
pub fn render_pages(
    config: &GeneratorConfig,
    introspector: &dyn TypeIntrospector,
    local_names: &[String],
) -> Vec<Page> {
    let builder = TypeModelBuilder::new(introspector);
    let renderer = render::create_renderer(config.format);
    let resolver = CrossReferenceResolver::new(&builder, config.visibility, renderer.file_extension());
    let examples = ExampleRoots::new(config.example_dirs(), &config.project_dir);

    let types: Vec<_> = local_names
        .iter()
        .filter_map(|name| builder.describe(name))
        .filter(|desc| {
            if desc.is_internal {
                tracing::debug!("skipping internal type {}", desc.name);
            }
            !desc.is_internal
        })
        .collect();

    Site::new(renderer.as_ref(), &resolver, &examples).pages(&types)
}
