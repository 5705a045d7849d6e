//! Build descriptor discovery and module extraction for jlsprep.
//!
//! Extractors implement [`Extractor`]: they list the descriptors of one
//! build system and turn each into [`Module`](jlsprep_modgraph::Module)
//! records. [`run_extractor`] drives one extractor through the shared
//! [`DescriptorFrontier`](jlsprep_modgraph::DescriptorFrontier) held by the
//! per-run [`ExtractionContext`], so descriptors already reported by a parent
//! are not processed twice.
//!
//! [`prepare_workspace`] runs a whole preparation: Maven extraction, then
//! Gradle, then the source-directory fallback when nothing was found,
//! followed by resolution and emission.

pub mod context;
pub mod error;
pub mod extractor;
pub mod fallback;
pub mod gradle;
pub mod maven;
pub mod pipeline;
pub mod scan;

pub use context::{DEFAULT_SKIP_DIRS, ExtractSettings, ExtractionContext};
pub use error::{Error, Result};
pub use extractor::{Extraction, Extractor, run_extractor};
pub use fallback::SourceFallbackExtractor;
pub use gradle::GradleExtractor;
pub use maven::MavenExtractor;
pub use pipeline::{PrepareOptions, PrepareReport, default_extractors, prepare_with, prepare_workspace};
