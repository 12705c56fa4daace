use std::fmt;

pub const SEPARATOR: char = '\\';

/// An absolute, fully-qualified type name such as `\Foo\Bar\Baz`.
///
/// Any number of leading separators is normalized to exactly one, so two
/// classnames are equal iff their qualified forms are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Classname {
    absolute: String,
}

impl Classname {
    pub fn new(name: &str) -> Self {
        let trimmed = name.trim_start_matches(SEPARATOR);
        Self { absolute: format!("{SEPARATOR}{trimmed}") }
    }

    /// `name` qualified under `namespace` (which may be empty for the global namespace).
    pub fn build(namespace: &str, name: &str) -> Self {
        let namespace = namespace.trim_matches(SEPARATOR);
        if namespace.is_empty() {
            Self::new(name)
        } else {
            Self::new(&format!("{namespace}{SEPARATOR}{name}"))
        }
    }

    /// `\Foo\Bar\Baz`
    pub fn absolute(&self) -> &str {
        &self.absolute
    }

    /// `Foo\Bar\Baz`
    pub fn qualified(&self) -> &str {
        &self.absolute[1..]
    }

    /// `Baz`
    pub fn simple(&self) -> &str {
        self.absolute.rsplit(SEPARATOR).next().unwrap_or_default()
    }

    /// Last underscore-delimited segment of the simple name: `Zend_Http_Client` -> `Client`.
    pub fn short(&self) -> &str {
        self.simple().rsplit('_').next().unwrap_or_default()
    }

    /// `Foo\Bar`, or the empty string for a global name.
    pub fn namespace(&self) -> &str {
        let qualified = self.qualified();
        match qualified.rfind(SEPARATOR) {
            Some(at) => &qualified[..at],
            None => "",
        }
    }

    /// `Foo_Bar_Baz`: every separator replaced by `_`, leading underscores trimmed.
    pub fn flattened(&self) -> String {
        self.qualified().replace(SEPARATOR, "_").trim_start_matches('_').to_string()
    }

    /// Append further segments: `\Foo` + `Bar\Baz` = `\Foo\Bar\Baz`.
    pub fn join(&self, rest: &str) -> Self {
        Self::new(&format!("{}{SEPARATOR}{}", self.absolute, rest.trim_start_matches(SEPARATOR)))
    }
}

impl fmt::Display for Classname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qualified())
    }
}
