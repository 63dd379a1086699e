//! Per-declaration accumulator of generated validator clauses.
//!
//! Each declaration transpiler resets the buffer before walking its members and
//! drains it before composing output. Type translation only ever appends.

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConstraintBuffer {
    clauses: Vec<String>,
}

impl ConstraintBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears any leftover clauses before a declaration starts collecting.
    pub fn reset(&mut self) {
        self.clauses.clear();
    }

    /// Appends a validator clause.
    pub fn push(&mut self, clause: impl Into<String>) {
        self.clauses.push(clause.into());
    }

    /// Takes every collected clause in insertion order, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.clauses)
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }
}

/// Formats a pattern validator clause for `name`.
pub fn pattern_clause(regex: &str, name: &str) -> String {
    format!("{regex}.accepts(${name});")
}

#[cfg(test)]
mod tests {
    use super::{pattern_clause, ConstraintBuffer};

    #[test]
    fn drain_returns_in_order_and_empties() {
        let mut buffer = ConstraintBuffer::new();
        buffer.push("a;");
        buffer.push("b;");
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.drain(), vec!["a;".to_string(), "b;".to_string()]);
        assert!(buffer.is_empty());
        assert!(buffer.drain().is_empty());
    }

    #[test]
    fn reset_discards_leftovers() {
        let mut buffer = ConstraintBuffer::new();
        buffer.push("stale;");
        buffer.reset();
        assert!(buffer.is_empty());
    }

    #[test]
    fn formats_pattern_clause() {
        assert_eq!(
            pattern_clause("/^[0-9]+$/", "code"),
            "/^[0-9]+$/.accepts($code);"
        );
    }
}
