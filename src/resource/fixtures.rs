//! YAML fixture loading.
//!
//! Fixtures live in one directory with a file per resource type, named
//! `<type>.yml` or `<type>.yaml`. Each file holds a mapping from identifier
//! to the data for that resource:
//!
//! ```yaml
//! homepage-search:
//!   q: shoes
//!   page: 2
//! ```
//!
//! The directory is opened through `cap-std`, so type names cannot reach
//! files outside it.

use super::ResourceLoader;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_json::Value;
use serde_saphyr::{Error as YamlError, Location};
use std::io;
use thiserror::Error;

const EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Errors raised while loading fixtures.
#[derive(Debug, Error, Diagnostic)]
pub enum FixtureError {
    /// The fixture directory could not be opened.
    #[error("failed to open fixture directory {dir}")]
    #[diagnostic(code(hexavel::fixtures::open))]
    Open {
        /// Directory that was requested.
        dir: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// No fixture file exists for the type.
    #[error("no fixtures for resource type \"{resource_type}\" in {dir}")]
    #[diagnostic(
        code(hexavel::fixtures::unknown_type),
        help("create {dir}/{resource_type}.yml mapping identifiers to data")
    )]
    UnknownType {
        /// Requested resource type.
        resource_type: String,
        /// Fixture directory searched.
        dir: Utf8PathBuf,
    },

    /// The fixture file has no entry for the identifier.
    #[error("resource type \"{resource_type}\" has no fixture called \"{identifier}\"")]
    #[diagnostic(code(hexavel::fixtures::unknown_identifier))]
    UnknownIdentifier {
        /// Requested resource type.
        resource_type: String,
        /// Requested identifier.
        identifier: String,
    },

    /// The fixture file could not be read.
    #[error("failed to read fixture file {file}")]
    #[diagnostic(code(hexavel::fixtures::read))]
    Read {
        /// File that failed.
        file: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The fixture file is not valid YAML.
    #[error("fixture parse error")]
    #[diagnostic(code(hexavel::fixtures::parse))]
    Parse {
        /// Diagnostic pointing at the offending location.
        #[source]
        #[diagnostic_source]
        source: Box<dyn Diagnostic + Send + Sync + 'static>,
    },

    /// The fixture file is valid YAML but not a mapping of identifiers.
    #[error("fixture file {file} must map identifiers to data")]
    #[diagnostic(code(hexavel::fixtures::not_mapping))]
    NotMapping {
        /// File that failed.
        file: Utf8PathBuf,
    },
}

/// Loads fixture data from a directory of YAML files.
#[derive(Debug)]
pub struct FixtureLoader {
    dir: Dir,
    path: Utf8PathBuf,
}

impl FixtureLoader {
    /// Open the fixture directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Open`] if the directory cannot be opened.
    pub fn open(path: impl AsRef<Utf8Path>) -> Result<Self, FixtureError> {
        let dir_path = path.as_ref().to_path_buf();
        let dir = Dir::open_ambient_dir(&dir_path, ambient_authority()).map_err(|source| {
            FixtureError::Open {
                dir: dir_path.clone(),
                source,
            }
        })?;
        Ok(Self {
            dir,
            path: dir_path,
        })
    }

    /// Borrow the directory path the loader was opened with.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn candidates(resource_type: &str) -> Vec<Utf8PathBuf> {
        let normalised = resource_type.trim().to_lowercase().replace(' ', "_");
        let mut stems = vec![resource_type.to_owned()];
        if normalised != resource_type {
            stems.push(normalised);
        }
        stems
            .iter()
            .flat_map(|stem| {
                EXTENSIONS
                    .iter()
                    .map(move |ext| Utf8PathBuf::from(format!("{stem}.{ext}")))
            })
            .collect()
    }

    fn read_type(&self, resource_type: &str) -> Result<(Utf8PathBuf, String), FixtureError> {
        for file in Self::candidates(resource_type) {
            match self.dir.read_to_string(&file) {
                Ok(text) => return Ok((file, text)),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(FixtureError::Read {
                        file: self.path.join(&file),
                        source,
                    });
                }
            }
        }
        Err(FixtureError::UnknownType {
            resource_type: resource_type.to_owned(),
            dir: self.path.clone(),
        })
    }

    /// Load every fixture for `resource_type` as a JSON object.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if no file exists for the type, it cannot
    /// be parsed, or it is not a mapping.
    pub fn load_all(
        &self,
        resource_type: &str,
    ) -> Result<serde_json::Map<String, Value>, FixtureError> {
        let (file, text) = self.read_type(resource_type)?;
        tracing::debug!(resource_type, %file, "loading fixtures");
        let doc: Value = serde_saphyr::from_str(&text).map_err(|err| FixtureError::Parse {
            source: map_yaml_error(err, &text, file.as_str()),
        })?;
        match doc {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(serde_json::Map::new()),
            _ => Err(FixtureError::NotMapping {
                file: self.path.join(file),
            }),
        }
    }

    /// Load the fixture `identifier` of `resource_type`.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::UnknownIdentifier`] when the file has no such
    /// entry, along with the errors of [`Self::load_all`].
    pub fn load_fixture(
        &self,
        resource_type: &str,
        identifier: &str,
    ) -> Result<Value, FixtureError> {
        let mut all = self.load_all(resource_type)?;
        all.remove(identifier)
            .ok_or_else(|| FixtureError::UnknownIdentifier {
                resource_type: resource_type.to_owned(),
                identifier: identifier.to_owned(),
            })
    }
}

impl ResourceLoader for FixtureLoader {
    fn load(&self, resource_type: &str, identifier: &str) -> anyhow::Result<Value> {
        Ok(self.load_fixture(resource_type, identifier)?)
    }
}

fn saturating_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

fn location_to_index(src: &str, loc: Location) -> usize {
    let target_line = saturating_usize(loc.line().saturating_sub(1));
    let target_column = saturating_usize(loc.column().saturating_sub(1));
    let mut offset = 0usize;
    for (idx, segment) in src.split_inclusive('\n').enumerate() {
        if idx == target_line {
            let line = segment.strip_suffix('\n').unwrap_or(segment);
            let byte_index = line
                .char_indices()
                .nth(target_column)
                .map_or(line.len(), |(byte_idx, _)| byte_idx);
            return offset + byte_index;
        }
        offset += segment.len();
    }
    src.len()
}

fn to_span(src: &str, loc: Location) -> SourceSpan {
    let at = location_to_index(src, loc);
    let len = usize::from(src.as_bytes().get(at).is_some_and(|b| *b != b'\n'));
    SourceSpan::new(at.into(), len)
}

#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(hexavel::yaml::parse))]
struct YamlDiagnostic {
    #[source_code]
    src: NamedSource<String>,
    #[label("parse error here")]
    span: Option<SourceSpan>,
    #[help]
    help: Option<String>,
    #[source]
    source: YamlError,
    message: String,
}

fn hint_for(src: &str, loc: Option<Location>) -> Option<String> {
    let location = loc?;
    let line = src
        .lines()
        .nth(saturating_usize(location.line().saturating_sub(1)))?;
    line.chars()
        .take_while(|c| c.is_whitespace())
        .any(|c| c == '\t')
        .then(|| "Use spaces for indentation; tabs are invalid in YAML.".to_owned())
}

fn map_yaml_error(
    err: YamlError,
    src: &str,
    name: &str,
) -> Box<dyn Diagnostic + Send + Sync + 'static> {
    let loc = err.location();
    let (line, col, span) = loc.map_or((1, 1, None), |l| {
        (l.line(), l.column(), Some(to_span(src, l)))
    });
    let message = format!("YAML parse error in {name} at line {line}, column {col}: {err}");
    Box::new(YamlDiagnostic {
        src: NamedSource::new(name, src.to_owned()),
        span,
        help: hint_for(src, loc),
        source: err,
        message,
    })
}
