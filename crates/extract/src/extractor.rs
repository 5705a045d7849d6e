//! The extractor contract and the frontier-aware driver loop.

use crate::context::ExtractionContext;
use crate::error::Result;
use jlsprep_modgraph::Module;
use std::path::{Path, PathBuf};

/// Modules and warnings produced from one descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Modules described by the descriptor, possibly including sub-projects.
    pub modules: Vec<Module>,
    /// Non-fatal problems to surface to the operator.
    pub warnings: Vec<String>,
}

/// Turns build descriptors into [`Module`] records.
///
/// Implementations understand one build system. They never consult the
/// frontier themselves: [`run_extractor`] decides which descriptors are
/// still worth extracting.
pub trait Extractor {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Descriptors to extract, in processing order.
    ///
    /// Descriptors that may describe others (e.g. a root build file) should
    /// come first so the nested ones can be skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the workspace cannot be scanned.
    fn descriptors(&self, ctx: &ExtractionContext) -> Result<Vec<PathBuf>>;

    /// Extracts the modules described by one descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor cannot be processed. The caller
    /// treats this as "no modules" for that descriptor.
    fn extract(&self, ctx: &ExtractionContext, descriptor: &Path) -> Result<Extraction>;
}

/// Runs `extractor` over every descriptor not yet accounted for.
///
/// Failures are logged and localized to their descriptor.
pub fn run_extractor(extractor: &dyn Extractor, ctx: &mut ExtractionContext) -> Vec<Module> {
    let name = extractor.name();
    tracing::info!(extractor = name, root = %ctx.root().display(), "Scanning for project descriptors");

    let descriptors = match extractor.descriptors(ctx) {
        Ok(descriptors) => descriptors,
        Err(e) => {
            ctx.warn(format!("{name}: failed to scan for project descriptors: {e}"));
            return Vec::new();
        }
    };

    let mut modules = Vec::new();
    for descriptor in descriptors {
        if !ctx.frontier.claim(&descriptor) {
            ctx.skipped_descriptors += 1;
            tracing::debug!(
                extractor = name,
                descriptor = %descriptor.display(),
                "Descriptor already accounted for, skipping"
            );
            continue;
        }

        tracing::info!(extractor = name, descriptor = %descriptor.display(), "Processing");
        match extractor.extract(ctx, &descriptor) {
            Ok(extraction) => {
                ctx.frontier.record_extraction(&descriptor, &extraction.modules);
                for warning in extraction.warnings {
                    ctx.warn(warning);
                }
                tracing::debug!(
                    extractor = name,
                    descriptor = %descriptor.display(),
                    modules = extraction.modules.len(),
                    "Extracted modules"
                );
                modules.extend(extraction.modules);
            }
            Err(e) => {
                tracing::error!(
                    extractor = name,
                    descriptor = %descriptor.display(),
                    error = %e,
                    "Failed to process descriptor"
                );
            }
        }
    }
    modules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ExtractSettings;
    use crate::error::Error;
    use jlsprep_modgraph::ModuleDependency;
    use std::cell::RefCell;

    /// Extractor backed by a fixed table of descriptor outcomes.
    struct TableExtractor {
        table: Vec<(&'static str, Option<Extraction>)>,
        extracted: RefCell<Vec<PathBuf>>,
    }

    impl Extractor for TableExtractor {
        fn name(&self) -> &'static str {
            "table"
        }

        fn descriptors(&self, ctx: &ExtractionContext) -> Result<Vec<PathBuf>> {
            Ok(self.table.iter().map(|(path, _)| ctx.root().join(path)).collect())
        }

        fn extract(&self, ctx: &ExtractionContext, descriptor: &Path) -> Result<Extraction> {
            self.extracted.borrow_mut().push(descriptor.to_path_buf());
            let rel = descriptor.strip_prefix(ctx.root()).unwrap_or(descriptor);
            self.table
                .iter()
                .find(|(path, _)| Path::new(path) == rel)
                .and_then(|(_, outcome)| outcome.clone())
                .ok_or_else(|| Error::BuildFailed {
                    descriptor: descriptor.to_path_buf(),
                    output: String::new(),
                })
        }
    }

    #[test]
    fn test_child_descriptor_reported_by_root_is_skipped() {
        let root_extraction = Extraction {
            modules: vec![
                Module::new("g", "root").with_module_dependency(
                    ModuleDependency::new("g", "child").with_source_descriptor("/ws/child/build.gradle"),
                ),
                Module::new("g", "child"),
            ],
            warnings: vec!["deprecated configuration".to_string()],
        };
        let extractor = TableExtractor {
            table: vec![
                ("build.gradle", Some(root_extraction)),
                ("child/build.gradle", Some(Extraction::default())),
            ],
            extracted: RefCell::new(Vec::new()),
        };
        let mut ctx = ExtractionContext::new(Path::new("/ws"), ExtractSettings::default());

        let modules = run_extractor(&extractor, &mut ctx);

        assert_eq!(modules.len(), 2);
        assert_eq!(extractor.extracted.borrow().as_slice(), [PathBuf::from("/ws/build.gradle")]);
        assert_eq!(ctx.skipped_descriptors(), 1);
        assert_eq!(ctx.warnings(), ["deprecated configuration".to_string()]);
    }

    #[test]
    fn test_failed_descriptor_yields_no_modules_and_run_continues() {
        let extractor = TableExtractor {
            table: vec![
                ("a/build.gradle", None),
                (
                    "b/build.gradle",
                    Some(Extraction {
                        modules: vec![Module::new("g", "b")],
                        warnings: vec![],
                    }),
                ),
            ],
            extracted: RefCell::new(Vec::new()),
        };
        let mut ctx = ExtractionContext::new(Path::new("/ws"), ExtractSettings::default());

        let modules = run_extractor(&extractor, &mut ctx);
        assert_eq!(modules, vec![Module::new("g", "b")]);
        assert_eq!(extractor.extracted.borrow().len(), 2);
    }
}
