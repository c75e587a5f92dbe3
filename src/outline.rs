use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// A decoded node of the outline document.
///
/// Every YAML mapping becomes [`Value::Pairs`], every sequence becomes
/// [`Value::List`] and every scalar keeps its raw text in [`Value::Scalar`].
#[derive(Debug, PartialEq, Clone)]
pub enum Value {
    /// The raw text of a scalar. Plain YAML nulls decode to the empty string.
    Scalar(String),
    /// A plain sequence of values.
    List(Vec<Value>),
    /// An ordered mapping whose keys may repeat.
    Pairs(Pairs),
}

impl Value {
    /// Creates a scalar value.
    pub fn scalar(text: &str) -> Self {
        Value::Scalar(text.to_string())
    }

    /// Returns the scalar text, if this value is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the pairs node, if this value is one.
    pub fn as_pairs(&self) -> Option<&Pairs> {
        match self {
            Value::Pairs(p) => Some(p),
            _ => None,
        }
    }

    /// Checks if the value carries no content: an empty scalar, list or pairs node.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Scalar(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Pairs(pairs) => pairs.is_empty(),
        }
    }

    /// A short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::List(_) => "list",
            Value::Pairs(_) => "mapping",
        }
    }
}

/// An ordered sequence of `(key, value)` entries.
///
/// Entry order is the order in which keys appeared in the source and duplicate
/// keys are kept as separate entries. Clones share the same underlying entries,
/// so a node referenced through a YAML alias is the very node its anchor names.
/// `Debug` and `PartialEq` walk the entries and do not terminate on cyclic aliases.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Pairs(Rc<RefCell<Vec<(String, Value)>>>);

impl Pairs {
    /// Creates a new, empty pairs node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, keeping any earlier entry with the same key.
    ///
    /// # Arguments
    ///
    /// * `key` - The entry key.
    /// * `value` - The entry value.
    pub fn push(&self, key: &str, value: Value) {
        self.0.borrow_mut().push((key.to_string(), value));
    }

    /// Borrows the entries in source order.
    pub fn entries(&self) -> Ref<'_, Vec<(String, Value)>> {
        self.0.borrow()
    }

    /// Returns the number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Checks if the node has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Returns the keys in source order.
    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().iter().map(|(k, _)| k.clone()).collect()
    }

    /// Checks if any entry uses `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.borrow().iter().any(|(k, _)| k == key)
    }

    /// Returns the value of the last entry with `key`, the way a flat mapping
    /// built from these entries would see it.
    pub fn get_last(&self, key: &str) -> Option<Value> {
        self.0
            .borrow()
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    /// Checks if both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Pairs) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// An address identifying the node, stable while any handle is alive.
    pub(crate) fn id(&self) -> *const RefCell<Vec<(String, Value)>> {
        Rc::as_ptr(&self.0)
    }
}

impl FromIterator<(String, Value)> for Pairs {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Pairs(Rc::new(RefCell::new(iter.into_iter().collect())))
    }
}
