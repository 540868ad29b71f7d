//! Filesystem-backed declaration loading.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use crate::io::command::CommandSuite;
use crate::io::config::SuiteConfig;
use crate::io::declaration::{
    CollectionDecl, DECLARATION_FILE, Declaration, DeclarationFile, DeclarationSource, SubdirDecl,
    TestDecl,
};
use crate::suite::{SuiteFactory, SuiteHandle};

/// Limits applied to every command-backed suite built by [`TomlSource`].
#[derive(Debug, Clone)]
pub struct CommandSettings {
    pub timeout: Duration,
    pub output_limit_bytes: usize,
}

impl CommandSettings {
    pub fn from_config(config: &SuiteConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs),
            output_limit_bytes: config.output_limit_bytes,
        }
    }
}

/// Declaration source reading `suite.toml` files from the catalog tree.
///
/// Each test's `command` becomes a factory for a suite that runs in the
/// declaration directory under the configured limits.
#[derive(Debug)]
pub struct TomlSource {
    settings: CommandSettings,
}

impl TomlSource {
    pub fn new(settings: CommandSettings) -> Self {
        Self { settings }
    }

    fn with_factories(&self, dir: &Path, file: DeclarationFile) -> Declaration {
        let tests = file
            .tests
            .into_iter()
            .map(|entry| {
                let factory = entry.command.map(|command| {
                    let dir = dir.to_path_buf();
                    let settings = self.settings.clone();
                    Box::new(move || {
                        SuiteHandle::new(CommandSuite::new(
                            dir.clone(),
                            command.clone(),
                            settings.clone(),
                        ))
                    }) as SuiteFactory
                });
                TestDecl {
                    id: entry.id,
                    description: entry.description,
                    factory,
                }
            })
            .collect();
        let collections = file
            .collections
            .into_iter()
            .map(|entry| CollectionDecl {
                id: entry.id,
                description: entry.description,
                members: entry.members,
            })
            .collect();
        let subdirs = file
            .subdirs
            .into_iter()
            .map(|entry| SubdirDecl {
                name: entry.name,
                description: entry.description,
            })
            .collect();
        Declaration {
            tests,
            collections,
            subdirs,
        }
    }
}

impl DeclarationSource for TomlSource {
    fn load(&self, dir: &Path) -> Result<Declaration> {
        purge_stale_artifacts(dir)?;
        let path = dir.join(DECLARATION_FILE);
        let contents =
            fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        let file = DeclarationFile::parse(&contents)
            .with_context(|| format!("parse {}", path.display()))?;
        debug!(
            dir = %dir.display(),
            tests = file.tests.len(),
            collections = file.collections.len(),
            subdirs = file.subdirs.len(),
            "declaration unit loaded"
        );
        Ok(self.with_factories(dir, file))
    }
}

/// Remove leftover atomic-write temp files so the unit is read fresh.
///
/// Interrupted runs can leave `*.tmp` siblings next to the declaration file;
/// they are never valid inputs.
fn purge_stale_artifacts(dir: &Path) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("read directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read directory {}", dir.display()))?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "tmp") && path.is_file() {
            fs::remove_file(&path)
                .with_context(|| format!("remove stale artifact {}", path.display()))?;
            debug!(path = %path.display(), "removed stale artifact");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn source() -> TomlSource {
        TomlSource::new(CommandSettings {
            timeout: Duration::from_secs(5),
            output_limit_bytes: 4096,
        })
    }

    #[test]
    fn load_attaches_factories_to_commanded_tests() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(
            temp.path().join(DECLARATION_FILE),
            r#"
            [[tests]]
            id = "ok"
            description = "always passes"
            command = ["true"]

            [[tests]]
            id = "pending"
            description = "declared only"
            "#,
        )
        .expect("write declaration");

        let declaration = source().load(temp.path()).expect("load");
        assert!(declaration.tests[0].factory.is_some());
        assert!(declaration.tests[1].factory.is_none());
    }

    #[test]
    fn load_purges_stale_temp_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join(DECLARATION_FILE), "").expect("write declaration");
        let stale = temp.path().join("suite.toml.tmp");
        fs::write(&stale, "partial").expect("write stale");

        source().load(temp.path()).expect("load");
        assert!(!stale.exists());
    }

    #[test]
    fn missing_declaration_file_is_fatal() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = source().load(temp.path()).unwrap_err();
        assert!(err.to_string().contains("read"));
    }

    #[test]
    fn malformed_declaration_file_is_fatal() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join(DECLARATION_FILE), "tests = 3").expect("write declaration");
        let err = source().load(temp.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parse"));
    }
}
