//! Name resolution: turning a type name as written into the classname it means.

pub mod classname;
pub mod imports;

pub use classname::{Classname, SEPARATOR};
pub use imports::{ImportEntry, ImportTable};

/// Resolve `raw`, written in a file whose namespace is `namespace`.
///
/// 1. A leading separator means the name is already absolute.
/// 2. A qualified name resolves its first segment through the imports and
///    reattaches the rest.
/// 3. A simple name that is an import alias is that import.
/// 4. Anything else lives in the file's own namespace.
pub fn resolve(raw: &str, namespace: &str, imports: &ImportTable) -> Classname {
    if raw.starts_with(SEPARATOR) {
        return Classname::new(raw);
    }

    match raw.split_once(SEPARATOR) {
        Some((first, rest)) => {
            if let Some(imported) = imports.get(first) {
                return imported.join(rest);
            }
        }
        None => {
            if let Some(imported) = imports.get(raw) {
                return imported.clone();
            }
        }
    }

    Classname::build(namespace, raw)
}
