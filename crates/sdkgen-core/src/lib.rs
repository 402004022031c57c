pub mod config;
pub mod error;
pub mod ir;
pub mod mapping;
pub mod parse;
pub mod pipeline;
pub mod render;
pub mod transform;
pub mod typemap;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use error::{GeneratorError, LoadError, MappingError};
pub use render::{ArtifactKind, GenerationModel, GeneratorOptions, Layout};

/// A generated file with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// Languages with a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    Typescript,
    Python,
}

impl TargetLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetLanguage::Typescript => "typescript",
            TargetLanguage::Python => "python",
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A per-language renderer. Rendering is pure: no I/O and no formatting.
pub trait CodeGenerator {
    fn target(&self) -> TargetLanguage;

    /// File name for an artifact, relative to the target's output directory.
    fn file_name(&self, kind: ArtifactKind) -> &'static str;

    fn render(
        &self,
        kind: ArtifactKind,
        model: &GenerationModel,
        options: &GeneratorOptions,
    ) -> Result<String, GeneratorError>;

    /// Render every planned artifact in memory.
    fn generate(
        &self,
        model: &GenerationModel,
        options: &GeneratorOptions,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        ArtifactKind::plan(model, options)
            .into_iter()
            .map(|kind| {
                Ok(GeneratedFile {
                    path: self.file_name(kind).to_string(),
                    content: self.render(kind, model, options)?,
                })
            })
            .collect()
    }
}
