//! Parser for the metadata lines printed by the bundled init script.
//!
//! Each metadata line is `PREFIX PAYLOAD`. `SRCLIB-ARTIFACT` opens a new
//! module and every other module-scoped prefix applies to the most recently
//! opened one. Any other line is ordinary Gradle output.

use crate::error::{Error, Result};
use crate::extractor::Extraction;
use jlsprep_modgraph::{ExternalDependency, Module, ModuleDependency, SourceDir, normalize_group};
use std::io::BufRead;
use std::path::{Path, PathBuf};

const ARTIFACT: &str = "SRCLIB-ARTIFACT";
const GROUP: &str = "SRCLIB-GROUP";
const CLASSPATH: &str = "SRCLIB-CLASSPATH";
const SOURCEDIR: &str = "SRCLIB-SOURCEDIR";
const PROJECTDIR: &str = "SRCLIB-PROJECTDIR";
const PROJECTDEPENDENCY: &str = "SRCLIB-PROJECTDEPENDENCY";
const DEPENDENCY: &str = "SRCLIB-DEPENDENCY";
const OUTPUTDIR: &str = "SRCLIB-OUTPUTDIR";
const WARNING: &str = "SRCLIB-WARNING";

/// Marker Gradle prints when the build fails.
const BUILD_FAILED: &str = "BUILD FAILED";

/// Splits a line into its prefix and trimmed payload.
fn parse_meta(line: &str) -> Option<(&str, &str)> {
    let (prefix, payload) = line.split_once(' ')?;
    Some((prefix, payload.trim()))
}

fn is_build_failure(line: &str) -> bool {
    let line = line.trim_end();
    line == BUILD_FAILED || line.starts_with("BUILD FAILED ")
}

/// Incremental parser over Gradle's output.
#[derive(Debug, Default)]
pub struct MetaParser {
    modules: Vec<Module>,
    warnings: Vec<String>,
    output: String,
    failed: bool,
}

impl MetaParser {
    /// Creates an empty parser.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one output line.
    ///
    /// Returns `false` once the build has failed; later lines are ignored.
    pub fn feed(&mut self, line: &str) -> bool {
        if self.failed {
            return false;
        }
        if is_build_failure(line) {
            self.failed = true;
            self.modules.clear();
            return false;
        }

        let Some((prefix, payload)) = parse_meta(line) else {
            self.plain(line);
            return true;
        };

        if prefix == WARNING {
            tracing::warn!(warning = payload, "gradle");
            self.warnings.push(payload.to_string());
            return true;
        }
        if prefix == ARTIFACT {
            self.modules.push(Module::new("", payload));
            return true;
        }

        let known = matches!(
            prefix,
            GROUP | CLASSPATH | SOURCEDIR | PROJECTDIR | PROJECTDEPENDENCY | DEPENDENCY | OUTPUTDIR
        );
        if !known {
            self.plain(line);
            return true;
        }

        let Some(module) = self.modules.last_mut() else {
            tracing::trace!(line, "Metadata before first artifact, ignoring");
            return true;
        };
        if !apply(module, prefix, payload) {
            tracing::debug!(line, "Malformed metadata line, skipping");
        }
        true
    }

    /// Feeds every line from `reader`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails. Bytes that are not valid UTF-8
    /// are replaced, never rejected.
    pub fn feed_reader<R: BufRead>(&mut self, reader: R) -> std::io::Result<()> {
        for line in reader.split(b'\n') {
            let line = line?;
            let line = line.strip_suffix(b"\r").unwrap_or(&line);
            if !self.feed(&String::from_utf8_lossy(line)) {
                break;
            }
        }
        Ok(())
    }

    /// Whether a build failure was seen.
    #[must_use]
    pub const fn failed(&self) -> bool {
        self.failed
    }

    /// Finishes parsing output produced for `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BuildFailed`] with the collected non-metadata output
    /// when the build failed; nothing parsed from that descriptor is kept.
    pub fn finish(self, descriptor: &Path) -> Result<Extraction> {
        if self.failed {
            return Err(Error::BuildFailed {
                descriptor: descriptor.to_path_buf(),
                output: self.output,
            });
        }
        Ok(Extraction {
            modules: self.modules,
            warnings: self.warnings,
        })
    }

    fn plain(&mut self, line: &str) {
        tracing::debug!("gradle: {}", line);
        self.output.push_str(line);
        self.output.push('\n');
    }
}

/// Applies one module-scoped metadata line. Returns `false` if the payload
/// is malformed.
fn apply(module: &mut Module, prefix: &str, payload: &str) -> bool {
    match prefix {
        GROUP => module.group = normalize_group(payload).to_string(),
        CLASSPATH => {
            module.class_path.extend(
                std::env::split_paths(payload).filter(|entry| !entry.as_os_str().is_empty()),
            );
        }
        SOURCEDIR => {
            let mut tokens = payload.splitn(3, ':');
            let (Some(group), Some(unit), Some(path)) = (tokens.next(), tokens.next(), tokens.next()) else {
                return false;
            };
            module.source_dirs.push(SourceDir {
                unit: format!("{}/{unit}", normalize_group(group)),
                path: PathBuf::from(path),
            });
        }
        PROJECTDIR => module.project_dir = PathBuf::from(payload),
        PROJECTDEPENDENCY => {
            let mut tokens = payload.splitn(3, ':');
            let (Some(group), Some(artifact)) = (tokens.next(), tokens.next()) else {
                return false;
            };
            let mut dependency = ModuleDependency::new(group, artifact);
            if let Some(build_file) = tokens.next().filter(|f| !f.is_empty()) {
                dependency = dependency.with_source_descriptor(build_file);
            }
            module.module_dependencies.insert(dependency);
        }
        DEPENDENCY => {
            let mut tokens = payload.splitn(5, ':');
            let (Some(scope), Some(group), Some(artifact), Some(version)) =
                (tokens.next(), tokens.next(), tokens.next(), tokens.next())
            else {
                return false;
            };
            let mut dependency = ExternalDependency::new(group, artifact, version, scope);
            if let Some(file) = tokens.next().filter(|f| !f.is_empty()) {
                dependency = dependency.with_resolved_file(file);
            }
            module.external_dependencies.insert(dependency);
        }
        OUTPUTDIR => module.output_dir = Some(PathBuf::from(payload)),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use jlsprep_modgraph::ModuleId;

    fn parse(output: &str) -> Result<Extraction> {
        let mut parser = MetaParser::new();
        parser.feed_reader(output.as_bytes()).unwrap();
        parser.finish(Path::new("/ws/build.gradle"))
    }

    #[test]
    fn test_full_project() {
        let output = "\
> Task :srclibCollectMetaInformation
SRCLIB-ARTIFACT core
SRCLIB-GROUP org.example
SRCLIB-PROJECTDIR /ws/core
SRCLIB-SOURCEDIR org.example:main:/ws/core/src/main/java
SRCLIB-SOURCEDIR :test:/ws/core/src/test/java
SRCLIB-OUTPUTDIR /ws/core/build/classes
SRCLIB-PROJECTDEPENDENCY org.example:util:/ws/util/build.gradle
SRCLIB-DEPENDENCY compile:junit:junit:4.12:/m2/junit-4.12.jar
SRCLIB-DEPENDENCY runtime:org.slf4j:slf4j-api:1.7.0
SRCLIB-ARTIFACT util
SRCLIB-GROUP org.example
BUILD SUCCESSFUL
";
        let extraction = parse(output).unwrap();
        assert_eq!(extraction.modules.len(), 2);

        let core = &extraction.modules[0];
        assert_eq!(core.id(), ModuleId::new("org.example", "core"));
        assert_eq!(core.project_dir, PathBuf::from("/ws/core"));
        assert_eq!(core.output_dir, Some(PathBuf::from("/ws/core/build/classes")));
        assert_eq!(core.source_dirs.len(), 2);
        assert_eq!(core.source_dirs[0].unit, "org.example/main");
        assert_eq!(core.source_dirs[1].unit, "default-group/test");
        assert_eq!(core.source_dirs[1].path, PathBuf::from("/ws/core/src/test/java"));

        let dependency = core.module_dependencies.first().unwrap();
        assert_eq!(dependency.id().as_str(), "org.example/util");
        assert_eq!(dependency.source_descriptor, Some(PathBuf::from("/ws/util/build.gradle")));

        let externals: Vec<_> = core.external_dependencies.iter().collect();
        assert_eq!(externals[0].scope, "compile");
        assert_eq!(externals[0].resolved_file, Some(PathBuf::from("/m2/junit-4.12.jar")));
        assert_eq!(externals[1].id().as_str(), "org.slf4j/slf4j-api");
        assert_eq!(externals[1].resolved_file, None);

        assert_eq!(extraction.modules[1].id().as_str(), "org.example/util");
    }

    #[cfg(unix)]
    #[test]
    fn test_class_path_split_on_path_separator() {
        let extraction = parse("SRCLIB-ARTIFACT a\nSRCLIB-CLASSPATH /x.jar::/ws/b/build:\n").unwrap();
        let entries: Vec<&Path> = extraction.modules[0].class_path.iter().map(PathBuf::as_path).collect();
        assert_eq!(entries, vec![Path::new("/x.jar"), Path::new("/ws/b/build")]);
    }

    #[test]
    fn test_missing_group_uses_default() {
        let extraction = parse("SRCLIB-ARTIFACT app\nSRCLIB-GROUP \n").unwrap();
        assert_eq!(extraction.modules[0].id().as_str(), "default-group/app");
    }

    #[test]
    fn test_lines_before_first_artifact_are_ignored() {
        let extraction = parse("SRCLIB-GROUP g\nSRCLIB-CLASSPATH /x.jar\nSRCLIB-ARTIFACT a\n").unwrap();
        assert_eq!(extraction.modules.len(), 1);
        assert_eq!(extraction.modules[0].group, "default-group");
        assert!(extraction.modules[0].class_path.is_empty());
    }

    #[test]
    fn test_malformed_payloads_are_skipped() {
        let output = "\
SRCLIB-ARTIFACT a
SRCLIB-SOURCEDIR only-one-token
SRCLIB-DEPENDENCY compile:g:a
SRCLIB-PROJECTDEPENDENCY lonely
SRCLIB-PROJECTDEPENDENCY g:b
";
        let extraction = parse(output).unwrap();
        let module = &extraction.modules[0];
        assert!(module.source_dirs.is_empty());
        assert!(module.external_dependencies.is_empty());
        assert_eq!(module.module_dependencies.len(), 1);
        assert_eq!(module.module_dependencies.first().unwrap().source_descriptor, None);
    }

    #[test]
    fn test_warnings_are_collected() {
        let extraction = parse("SRCLIB-WARNING unable to resolve configuration\nSRCLIB-ARTIFACT a\n").unwrap();
        assert_eq!(extraction.warnings, vec!["unable to resolve configuration".to_string()]);
    }

    #[test]
    fn test_build_failure_discards_everything() {
        let output = "\
SRCLIB-ARTIFACT a
SRCLIB-GROUP g
FAILURE: Build failed with an exception.
BUILD FAILED
SRCLIB-ARTIFACT b
";
        let err = parse(output).unwrap_err();
        match err {
            Error::BuildFailed { descriptor, output } => {
                assert_eq!(descriptor, PathBuf::from("/ws/build.gradle"));
                assert!(output.contains("Build failed with an exception"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_utf8_output_line_is_tolerated() {
        let mut parser = MetaParser::new();
        let output: &[u8] = b"SRCLIB-ARTIFACT a\nSRCLIB-GROUP g\nT\xe9l\xe9chargement termin\xe9\r\nSRCLIB-ARTIFACT b\n";
        parser.feed_reader(output).unwrap();

        let extraction = parser.finish(Path::new("/ws/build.gradle")).unwrap();
        let ids: Vec<_> = extraction.modules.iter().map(|m| m.id().to_string()).collect();
        assert_eq!(ids, vec!["g/a".to_string(), "default-group/b".to_string()]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let extraction = parse("SRCLIB-ARTIFACT a\r\nSRCLIB-GROUP g\r\n").unwrap();
        assert_eq!(extraction.modules[0].id(), ModuleId::new("g", "a"));
    }

    #[test]
    fn test_build_failure_with_timing_suffix() {
        let mut parser = MetaParser::new();
        parser.feed("SRCLIB-ARTIFACT a");
        assert!(!parser.feed("BUILD FAILED in 3s"));
        assert!(parser.failed());
    }

    #[test]
    fn test_plain_output_is_not_metadata() {
        let extraction = parse("Downloading https://services.gradle.org/x.zip\nSRCLIB-ARTIFACT a\n").unwrap();
        assert_eq!(extraction.modules.len(), 1);
    }
}
