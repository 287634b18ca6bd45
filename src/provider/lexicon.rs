//! File-backed lexicon models.
//!
//! Each model lives in `<model_dir>/<model_id>/lexicon.tsv`: one
//! `source<TAB>target` entry per line, `#` comments and blank lines ignored.
//! Translation is word-by-word; unknown words pass through unchanged.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::provider::error::ModelError;
use crate::provider::model::{GenerationLimits, ModelLoader, TranslationModel};
use crate::provider::pair::LanguagePair;

pub const LEXICON_FILE: &str = "lexicon.tsv";

/// A word-level lexicon for a single language pair.
#[derive(Debug, Default)]
pub struct LexiconModel {
    entries: HashMap<String, String>,
}

impl LexiconModel {
    /// Parse lexicon content. `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ModelError> {
        let mut entries = HashMap::new();
        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let malformed = |reason: &str| ModelError::Malformed {
                path: path.to_path_buf(),
                line: idx + 1,
                reason: reason.to_string(),
            };
            let (source, target) = line
                .split_once('\t')
                .ok_or_else(|| malformed("expected `source<TAB>target`"))?;
            let (source, target) = (source.trim(), target.trim());
            if source.is_empty() || target.is_empty() {
                return Err(malformed("empty entry"));
            }
            if source.split_whitespace().nth(1).is_some() {
                return Err(malformed("source entry must be a single word"));
            }
            entries.insert(source.to_lowercase(), target.to_string());
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn translate_token(&self, token: &str) -> String {
        let Some(start) = token.find(char::is_alphanumeric) else {
            return token.to_string();
        };
        let end = token
            .char_indices()
            .filter(|(_, c)| c.is_alphanumeric())
            .map(|(i, c)| i + c.len_utf8())
            .last()
            .unwrap_or(token.len());
        let (prefix, core, suffix) = (&token[..start], &token[start..end], &token[end..]);

        match self.entries.get(&core.to_lowercase()) {
            Some(target) => {
                let target = if core.starts_with(char::is_uppercase) {
                    capitalize(target)
                } else {
                    target.clone()
                };
                format!("{prefix}{target}{suffix}")
            }
            None => token.to_string(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl TranslationModel for LexiconModel {
    fn generate(&self, text: &str, limits: &GenerationLimits) -> Result<String, ModelError> {
        let mut output: Vec<String> = Vec::new();
        'tokens: for token in text.split_whitespace().take(limits.max_input_tokens) {
            let rendered = self.translate_token(token);
            for word in rendered.split_whitespace() {
                if output.len() >= limits.max_new_tokens {
                    break 'tokens;
                }
                output.push(word.to_string());
            }
        }
        Ok(output.join(" "))
    }
}

/// Loads lexicon models from a directory tree keyed by model id.
#[derive(Debug, Clone)]
pub struct LexiconLoader {
    model_dir: PathBuf,
}

impl LexiconLoader {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
        }
    }

    /// Location of the lexicon file for a model id.
    pub fn lexicon_path(&self, model_id: &str) -> PathBuf {
        self.model_dir.join(model_id).join(LEXICON_FILE)
    }
}

impl ModelLoader for LexiconLoader {
    fn load(
        &self,
        model_id: &str,
        pair: &LanguagePair,
    ) -> Result<Arc<dyn TranslationModel>, ModelError> {
        let path = self.lexicon_path(model_id);
        if !path.is_file() {
            return Err(ModelError::NotFound {
                model_id: model_id.to_string(),
                path,
            });
        }
        let content = fs::read_to_string(&path).map_err(|source| ModelError::Io {
            path: path.clone(),
            source,
        })?;
        let model = LexiconModel::parse(&content, &path)?;

        tracing::info!(
            model_id,
            pair = %pair,
            entries = model.len(),
            path = %path.display(),
            "Lexicon model loaded"
        );
        Ok(Arc::new(model))
    }
}
