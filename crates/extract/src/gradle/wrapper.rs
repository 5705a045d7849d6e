//! Gradle wrapper discovery and command line assembly.

use std::path::{Path, PathBuf};

/// Name of the wrapper script on this platform.
#[must_use]
pub const fn wrapper_name() -> &'static str {
    if cfg!(windows) { "gradlew.bat" } else { "gradlew" }
}

/// Finds the wrapper closest to `descriptor`.
///
/// Looks in the descriptor's directory, then in each parent up to and
/// including `root`. Directories named like the wrapper are ignored.
#[must_use]
pub fn find_wrapper(root: &Path, descriptor: &Path) -> Option<PathBuf> {
    let mut current = descriptor.parent()?;
    loop {
        let candidate = current.join(wrapper_name());
        if candidate.is_file() {
            return Some(candidate);
        }
        if current == root || !current.starts_with(root) {
            return None;
        }
        current = current.parent()?;
    }
}

/// Program and arguments for one metadata collection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradleInvocation {
    /// Program to execute.
    pub program: String,
    /// Arguments, in order.
    pub args: Vec<String>,
}

impl GradleInvocation {
    /// Assembles the invocation.
    ///
    /// With a wrapper the wrapper is run (through `bash` outside Windows);
    /// otherwise `gradle_command` is.
    #[must_use]
    pub fn new(wrapper: Option<&Path>, gradle_command: &str, init_script: &Path, extra_args: &[String]) -> Self {
        let mut args = Vec::new();
        let program = match wrapper {
            Some(wrapper) if cfg!(windows) => wrapper.display().to_string(),
            Some(wrapper) => {
                args.push(wrapper.display().to_string());
                "bash".to_string()
            }
            None => gradle_command.to_string(),
        };

        args.extend([
            "-I".to_string(),
            init_script.display().to_string(),
            // parallel builds interleave metadata lines of different projects
            "-Dorg.gradle.parallel=false".to_string(),
            "-Dcom.android.build.gradle.overrideVersionCheck=true".to_string(),
            super::TASK_NAME.to_string(),
        ]);
        args.extend(extra_args.iter().cloned());

        Self { program, args }
    }

    /// The full command line, for logging.
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
