use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A row type that can be shown in a [`super::DataTable`].
pub trait TableRecord {
    /// Stable identifier used for selection and row ids.
    type Key: Clone + Eq + Hash + Debug + Display;

    fn row_key(&self) -> Self::Key;

    /// Text of the field named by a column key.
    ///
    /// `None` renders a blank cell.
    fn field_text(&self, key: &str) -> Option<String>;
}
