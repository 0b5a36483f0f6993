//! SQL construction helpers.
//!
//! Every value reaches `SQLite` as a numbered bound parameter. Clauses that
//! depend on optional input are assembled with [`QueryParts`].

use rusqlite::types::Value;

/// Escapes SQL LIKE wildcards in a string to make them literal.
///
/// Patterns built from the result must be used with `ESCAPE '\'`.
///
/// # Examples
///
/// ```
/// use muslim_api::storage::sqlite::escape_like_wildcards;
///
/// assert_eq!(escape_like_wildcards("100%"), "100\\%");
/// assert_eq!(escape_like_wildcards("user_name"), "user\\_name");
/// assert_eq!(escape_like_wildcards("path\\file"), "path\\\\file");
/// ```
#[must_use]
pub fn escape_like_wildcards(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' | '_' | '\\' => {
                result.push('\\');
                result.push(c);
            },
            _ => result.push(c),
        }
    }
    result
}

/// Builds a `%...%` substring pattern with the needle's wildcards escaped.
#[must_use]
pub fn contains_pattern(needle: &str) -> String {
    format!("%{}%", escape_like_wildcards(needle))
}

/// Incrementally built SQL fragments with their bound parameters.
///
/// Binding a value returns its `?N` placeholder, so a clause and the
/// parameter it references are always added together.
///
/// ```
/// use muslim_api::storage::sqlite::QueryParts;
///
/// let mut parts = QueryParts::new();
/// parts.filter("Masjid".to_string(), |p| format!("jenis = {p}"));
/// parts.filter("Agung".to_string(), |p| format!("tipologi = {p}"));
/// assert_eq!(parts.where_clause(), " WHERE jenis = ?1 AND tipologi = ?2");
/// assert_eq!(parts.into_params().len(), 2);
/// ```
#[derive(Debug, Default, Clone)]
pub struct QueryParts {
    params: Vec<Value>,
    conditions: Vec<String>,
    assignments: Vec<String>,
}

impl QueryParts {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a value and returns its placeholder.
    pub fn bind(&mut self, value: impl Into<Value>) -> String {
        self.params.push(value.into());
        format!("?{}", self.params.len())
    }

    /// Binds a value and adds the condition built from its placeholder.
    pub fn filter(&mut self, value: impl Into<Value>, clause: impl FnOnce(&str) -> String) {
        let placeholder = self.bind(value);
        self.conditions.push(clause(&placeholder));
    }

    /// Binds a value and adds `column = ?N` to the SET list.
    pub fn assign(&mut self, column: &'static str, value: impl Into<Value>) {
        let placeholder = self.bind(value);
        self.assignments.push(format!("{column} = {placeholder}"));
    }

    /// Returns true when at least one condition was added.
    #[must_use]
    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }

    /// Returns true when at least one assignment was added.
    #[must_use]
    pub fn has_assignments(&self) -> bool {
        !self.assignments.is_empty()
    }

    /// Returns ` WHERE a AND b`, or an empty string without conditions.
    #[must_use]
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Returns the comma-joined SET list.
    #[must_use]
    pub fn set_clause(&self) -> String {
        self.assignments.join(", ")
    }

    /// Consumes the builder, returning the parameters in placeholder order.
    #[must_use]
    pub fn into_params(self) -> Vec<Value> {
        self.params
    }
}
