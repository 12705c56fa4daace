//! Type mentions inside `/** ... */` comments.

use regex::{Captures, Regex};

use crate::config::Overrides;
use crate::resolve::Classname;

struct Substitution {
    pattern: Regex,
    replacement: String,
}

/// Rewrites `@param Bar $x` style mentions of the candidate classnames to
/// their flattened names. A mention counts only when bounded on the left by
/// whitespace or `|` and on the right by whitespace, `|` or `[`; the
/// delimiters are kept as they were.
pub struct DocblockRewriter {
    substitutions: Vec<Substitution>,
}

impl DocblockRewriter {
    /// Compile the substitutions for `candidates`, in order. Each candidate is
    /// tried by its qualified name, then by its simple name.
    pub fn new(candidates: &[Classname], overrides: &Overrides) -> Self {
        let mut substitutions = Vec::with_capacity(candidates.len() * 2);
        for classname in candidates {
            let replacement = overrides.apply(&classname.flattened());
            let mut spellings = vec![classname.qualified()];
            if classname.simple() != classname.qualified() {
                spellings.push(classname.simple());
            }
            for spelling in spellings {
                let source = format!(r"([\s|]+)(\\?{})([\s|\[])", regex::escape(spelling));
                match Regex::new(&source) {
                    Ok(pattern) => substitutions.push(Substitution { pattern, replacement: replacement.clone() }),
                    Err(e) => tracing::warn!("skipping docblock pattern for {classname}: {e}"),
                }
            }
        }
        Self { substitutions }
    }

    pub fn rewrite(&self, comment: &str) -> String {
        let mut text = comment.to_string();
        for sub in &self.substitutions {
            let replaced = sub
                .pattern
                .replace_all(&text, |caps: &Captures<'_>| format!("{}{}{}", &caps[1], sub.replacement, &caps[3]));
            if let std::borrow::Cow::Owned(changed) = replaced {
                text = changed;
            }
        }
        text
    }

    pub fn len(&self) -> usize {
        self.substitutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.substitutions.is_empty()
    }
}
