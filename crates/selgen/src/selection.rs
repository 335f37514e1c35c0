//! Selection-set semantics shared by the generated `isSelective` / `selective` methods.
//!
//! Rust hosts that evaluate mapper templates themselves can embed a [`SelectionSet`] in
//! their parameter objects and answer `isSelective(...)` calls with it.

use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    columns: HashMap<String, bool>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// With `None`: whether any column is selected. With a column: whether that column
    /// is selected. Unknown columns are simply not selected.
    pub fn is_selective(&self, column: Option<&str>) -> bool {
        match column {
            None => !self.columns.is_empty(),
            Some(c) => self.columns.get(c).copied().unwrap_or(false),
        }
    }

    /// Replaces the selection. `None` or an empty list clears it.
    pub fn selective<I, S>(&mut self, columns: Option<I>) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.clear();
        if let Some(columns) = columns {
            for c in columns {
                self.columns.insert(c.into(), true);
            }
        }
        self
    }

    pub fn clear(&mut self) {
        self.columns.clear();
    }

    /// Selected columns, sorted.
    pub fn columns(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.columns.keys().map(String::as_str).collect();
        out.sort_unstable();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_selected_iff_non_empty() {
        let mut s = SelectionSet::new();
        assert!(!s.is_selective(None));

        s.selective(Some(["name", "email"]));
        assert!(s.is_selective(None));

        s.selective(Some(Vec::<String>::new()));
        assert!(!s.is_selective(None));
    }

    #[test]
    fn column_selected_iff_member() {
        let mut s = SelectionSet::new();
        s.selective(Some(vec!["name".to_string(), "email".to_string()]));

        assert!(s.is_selective(Some("name")));
        assert!(s.is_selective(Some("email")));
        assert!(!s.is_selective(Some("id")));
        assert!(!s.is_selective(Some("no_such_column")));
    }

    #[test]
    fn omitted_argument_clears_and_chains() {
        let mut s = SelectionSet::new();
        s.selective(Some(["a", "b"]))
            .selective(None::<Vec<&str>>);
        assert!(!s.is_selective(None));
        assert!(!s.is_selective(Some("a")));
    }

    #[test]
    fn replaces_rather_than_extends() {
        let mut s = SelectionSet::new();
        s.selective(Some(["a", "b"]));
        s.selective(Some(["c", "c"]));
        assert_eq!(s.columns(), vec!["c"]);
    }
}
