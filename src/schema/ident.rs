//! Identifier rendering for diagram titles and DDL.
//!
//! Catalog names made only of uppercase letters, digits and underscores are
//! "regular" and follow the requested case mode. Anything else must be
//! emitted verbatim, quoted when the target is SQL.

use once_cell::sync::Lazy;
use regex::Regex;

/// Regex for names that can be emitted without quotes
static REGULAR_IDENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z_0-9]*$").unwrap());

/// Check if a catalog name is regular (safe to re-case and leave unquoted)
pub fn is_regular(name: &str) -> bool {
    REGULAR_IDENT_RE.is_match(name)
}

/// Render a catalog name.
///
/// Regular names are upper- or lower-cased according to `upper_case` and are
/// never quoted. Irregular names keep their original casing and are wrapped
/// in double quotes when `with_quotes` is set.
pub fn format_identifier(name: &str, upper_case: bool, with_quotes: bool) -> String {
    if !is_regular(name) {
        return if with_quotes {
            format!("\"{}\"", name)
        } else {
            name.to_string()
        };
    }

    if upper_case {
        name.to_uppercase()
    } else {
        name.to_lowercase()
    }
}

/// Quote a name for a catalog statement unless it is already all-uppercase.
///
/// Catalog commands fold unquoted names to uppercase, so anything else has to
/// be quoted to be found.
pub fn catalog_name(name: &str) -> String {
    if name.to_uppercase() == name {
        name.to_string()
    } else {
        format!("\"{}\"", name)
    }
}
