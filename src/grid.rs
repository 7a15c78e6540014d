//! The Grid model (spec §3.2): a metadata Dict, an ordered sequence of
//! typed columns, and an ordered sequence of row Dicts.

use crate::value::{Dict, TagName, Value};
use std::convert::TryFrom;

/// A Haystack Grid. Rows are appended once and not mutated in place by the
/// core APIs post-construction (spec §3.3) — building a modified grid means
/// building a new one, e.g. via the grid algebra in [`crate::algebra`].
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    meta: Dict,
    cols: Vec<Column>,
    rows: Vec<Dict>,
}

/// One column definition: a unique name plus column-level metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    name: TagName,
    meta: Dict,
}

impl Column {
    pub fn new(name: TagName, meta: Dict) -> Self {
        Self { name, meta }
    }

    pub fn name(&self) -> &TagName {
        &self.name
    }

    pub fn meta(&self) -> &Dict {
        &self.meta
    }
}

impl Grid {
    /// Build a Grid, enforcing that column names are unique (spec §3.2).
    /// A column with no rows referencing it is kept in the schema.
    pub fn new(
        meta: Dict,
        cols: Vec<Column>,
        rows: Vec<Dict>,
    ) -> Result<Self, SchemaError> {
        let mut seen = std::collections::HashSet::new();
        for col in &cols {
            if !seen.insert(col.name.as_str().to_owned()) {
                return Err(SchemaError::DuplicateColumn {
                    name: col.name.as_str().to_owned(),
                });
            }
        }
        Ok(Grid { meta, cols, rows })
    }

    /// Build a Grid by inferring its column list from the union of keys
    /// present across `rows`, sorted alphabetically. Mirrors the teacher
    /// crate's JSON-grid constructor, generalised to the Dict model.
    pub fn from_rows(rows: Vec<Dict>) -> Result<Self, SchemaError> {
        let mut names = std::collections::BTreeSet::new();
        for row in &rows {
            for key in row.keys() {
                names.insert(key.to_owned());
            }
        }

        let mut cols = Vec::with_capacity(names.len());
        for name in names {
            let tag = TagName::new(name.clone())
                .map_err(|_| SchemaError::InvalidColumnName { name })?;
            cols.push(Column::new(tag, Dict::new()));
        }

        Grid::new(Dict::new().with("ver", Value::Str("3.0".to_owned())), cols, rows)
    }

    pub fn meta(&self) -> &Dict {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut Dict {
        &mut self.meta
    }

    pub fn cols(&self) -> &[Column] {
        &self.cols
    }

    pub fn col_names(&self) -> impl Iterator<Item = &TagName> {
        self.cols.iter().map(|c| c.name())
    }

    pub fn col(&self, name: &str) -> Option<&Column> {
        self.cols.iter().find(|c| c.name.as_str() == name)
    }

    pub fn rows(&self) -> &[Dict] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut Vec<Dict> {
        &mut self.rows
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Add a new column (or overwrite an existing one's metadata), mapping
    /// each row to a new cell value.
    pub fn add_col<F>(&mut self, col_name: TagName, meta: Dict, f: F)
    where
        F: Fn(&Dict) -> Value,
    {
        for row in &mut self.rows {
            let value = f(row);
            row.insert(col_name.as_str(), value);
        }

        if let Some(existing) = self.cols.iter_mut().find(|c| c.name == col_name) {
            existing.meta = meta;
        } else {
            self.cols.push(Column::new(col_name, meta));
        }
    }

    /// Returns the values present in `col_name` across every row, in row
    /// order; a row that omits the column (or has no such row) yields
    /// `None`.
    pub fn col_to_vec(&self, col_name: &str) -> Vec<Option<&Value>> {
        self.rows.iter().map(|row| row.get(col_name)).collect()
    }

    pub fn sort_rows<F>(&mut self, compare: F)
    where
        F: FnMut(&Dict, &Dict) -> std::cmp::Ordering,
    {
        self.rows.sort_by(compare);
    }

    /// Returns true if this grid's meta carries the `err` marker, the
    /// Haystack convention for an error grid.
    pub fn is_error(&self) -> bool {
        matches!(self.meta.get("err"), Some(Value::Marker))
    }

    pub fn error_trace(&self) -> Option<&str> {
        match self.meta.get("errTrace") {
            Some(Value::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Build an index from `id` tag to row, for O(1) ref resolution during
    /// filter evaluation (spec §4.F / §9).
    pub fn ref_index(&self) -> RefIndex<'_> {
        RefIndex::build(self)
    }
}

/// `Ref -> Dict` index, built once per grid before evaluating a batch of
/// filters (spec §9). Invalidated by any grid mutation made after it was
/// built — it borrows the grid for its lifetime, so the borrow checker
/// enforces this for us.
pub struct RefIndex<'g> {
    by_name: std::collections::HashMap<String, &'g Dict>,
}

impl<'g> RefIndex<'g> {
    fn build(grid: &'g Grid) -> Self {
        let mut by_name = std::collections::HashMap::new();
        for row in &grid.rows {
            if let Some(Value::Ref(r)) = row.get("id") {
                by_name.insert(r.name().to_owned(), row);
            }
        }
        RefIndex { by_name }
    }

    pub fn resolve(&self, r: &crate::value::Ref) -> Option<&'g Dict> {
        self.by_name.get(r.name()).copied()
    }
}

/// Errors arising from building or validating a Grid's schema (spec §7
/// `SchemaError`).
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("duplicate column '{name}'")]
    DuplicateColumn { name: String },
    #[error("'{name}' is not a valid column name")]
    InvalidColumnName { name: String },
}

impl TryFrom<Vec<Dict>> for Grid {
    type Error = SchemaError;

    fn try_from(rows: Vec<Dict>) -> Result<Self, Self::Error> {
        Grid::from_rows(rows)
    }
}
