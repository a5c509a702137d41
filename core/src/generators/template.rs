//! generators/template.rs
//! Template generator: regex-driven variable substitution over source text.
//!
//! Design notes:
//! - Each variable key is a regular expression; every non-overlapping,
//!   leftmost-first match is replaced with the literal value (no `$` expansion).
//! - Variables are applied one after another in lexicographic key order, so a
//!   later pattern sees the output of earlier substitutions.
//! - Patterns are compiled when configured; an invalid pattern rejects the
//!   whole update and leaves state untouched.

use std::collections::BTreeMap;

use regex::{NoExpand, Regex};

use crate::constants::{pressio_keys, template_keys, STABILITY_EXPERIMENTAL};
use crate::generators::Generator;
use crate::options::{Options, ThreadSafety};
use crate::plugin::{Configurable, Versionable};
use crate::types::{JitError, JitResult};

#[derive(Clone, Debug)]
struct Substitution {
    pattern: Regex,
    replacement: String,
}

#[derive(Clone, Debug, Default)]
pub struct TemplateGenerator {
    name: String,
    source: String,
    variables: BTreeMap<String, Substitution>,
}

impl TemplateGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Current variable mapping (pattern → replacement), in application order.
    pub fn variables(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables
            .iter()
            .map(|(k, s)| (k.as_str(), s.replacement.as_str()))
    }

    fn build_variables(keys: &[String], values: &[String]) -> JitResult<BTreeMap<String, Substitution>> {
        if keys.len() != values.len() {
            return Err(JitError::Validation(format!(
                "keys and values must have the same size ({} keys, {} values)",
                keys.len(),
                values.len()
            )));
        }
        let mut out = BTreeMap::new();
        for (key, value) in keys.iter().zip(values) {
            let pattern = Regex::new(key).map_err(|e| {
                JitError::Validation(format!("invalid template pattern {:?}: {}", key, e))
            })?;
            out.insert(key.clone(), Substitution { pattern, replacement: value.clone() });
        }
        Ok(out)
    }
}

impl Versionable for TemplateGenerator {
    fn patch_version(&self) -> u32 {
        1
    }
}

impl Configurable for TemplateGenerator {
    fn prefix(&self) -> &str {
        "template"
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn set_options(&mut self, options: &Options) -> JitResult<()> {
        let source = options
            .get_str(template_keys::SOURCE)
            .require(template_keys::SOURCE, "string")?
            .map(str::to_string);

        let keys = options
            .get_strings(template_keys::KEYS)
            .require(template_keys::KEYS, "strings")?;
        let values = options
            .get_strings(template_keys::VALUES)
            .require(template_keys::VALUES, "strings")?;

        // Only a complete pair replaces the mapping.
        let variables = match (keys, values) {
            (Some(keys), Some(values)) => Some(Self::build_variables(keys, values)?),
            _ => None,
        };

        if let Some(source) = source {
            self.source = source;
        }
        if let Some(variables) = variables {
            tracing::trace!(count = variables.len(), "template variables replaced");
            self.variables = variables;
        }
        Ok(())
    }

    fn get_options(&self) -> Options {
        let (keys, values): (Vec<String>, Vec<String>) = self
            .variables
            .iter()
            .map(|(k, s)| (k.clone(), s.replacement.clone()))
            .unzip();
        Options::new()
            .with(template_keys::SOURCE, self.source.clone())
            .with(template_keys::KEYS, keys)
            .with(template_keys::VALUES, values)
    }

    fn get_documentation(&self) -> Options {
        Options::new()
            .with(pressio_keys::DESCRIPTION, "generates source code from a template")
            .with(template_keys::SOURCE, "source code to compile")
            .with(template_keys::KEYS, "regular expressions to substitute in the source")
            .with(template_keys::VALUES, "replacement text for the matching key")
    }

    fn get_configuration(&self) -> Options {
        Options::new()
            .with(pressio_keys::THREAD_SAFE, ThreadSafety::Multiple)
            .with(pressio_keys::STABILITY, STABILITY_EXPERIMENTAL)
            .with(
                pressio_keys::HIGHLEVEL,
                vec![template_keys::SOURCE, template_keys::KEYS, template_keys::VALUES],
            )
    }
}

impl Generator for TemplateGenerator {
    fn generate(&self) -> JitResult<String> {
        let mut out = self.source.clone();
        for sub in self.variables.values() {
            out = sub
                .pattern
                .replace_all(&out, NoExpand(&sub.replacement))
                .into_owned();
        }
        Ok(out)
    }

    fn clone_box(&self) -> Box<dyn Generator> {
        Box::new(self.clone())
    }
}
