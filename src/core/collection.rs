//! Order-preserving, name-indexed state registry.

use std::collections::HashMap;
use std::ops::{Index, IndexMut};

use super::node::{State, StateNode};

/// Name of the synthetic leaf inserted into otherwise empty collections.
pub const DEFAULT_STATE_NAME: &str = "state";

/// States in insertion order with `O(1)` lookup by name.
///
/// Names are unique: [`StateCollection::set`] replaces an existing state
/// in place and appends new ones. The collection is never empty.
///
/// # Example
///
/// ```rust
/// use statechart::core::{State, StateCollection};
///
/// let mut states: StateCollection<()> = StateCollection::new([
///     State::leaf("Idle"),
///     State::leaf("Running"),
/// ]);
///
/// states.set(State::leaf("Idle"));
/// states.set(State::leaf("Done"));
///
/// assert_eq!(states.names(), vec!["Idle", "Running", "Done"]);
/// assert_eq!(states.position("Running"), Some(1));
/// ```
pub struct StateCollection<C> {
    values: Vec<State<C>>,
    indices: HashMap<String, usize>,
}

impl<C: 'static> StateCollection<C> {
    /// Build a collection, inserting each state with [`set`](Self::set)
    /// semantics. An empty input yields a single leaf named `"state"`.
    pub fn new(states: impl IntoIterator<Item = State<C>>) -> Self {
        let mut collection = Self {
            values: Vec::new(),
            indices: HashMap::new(),
        };
        for state in states {
            collection.set(state);
        }
        if collection.values.is_empty() {
            collection.set(State::leaf(DEFAULT_STATE_NAME));
        }
        collection
    }

    /// Replace the state with the same name, keeping its position, or append.
    ///
    /// Returns the replaced state.
    pub fn set(&mut self, state: State<C>) -> Option<State<C>> {
        let existing = self.indices.get(state.name()).copied();
        match existing {
            Some(index) => Some(std::mem::replace(&mut self.values[index], state)),
            None => {
                self.indices
                    .insert(state.name().to_string(), self.values.len());
                self.values.push(state);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&State<C>> {
        let index = self.position(name)?;
        self.values.get(index)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut State<C>> {
        let index = self.position(name)?;
        self.values.get_mut(index)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }

    /// Insertion position of `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first(&self) -> Option<&State<C>> {
        self.values.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, State<C>> {
        self.values.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, State<C>> {
        self.values.iter_mut()
    }

    /// Names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.values.iter().map(|state| state.name()).collect()
    }
}

impl<C> Index<usize> for StateCollection<C> {
    type Output = State<C>;

    fn index(&self, position: usize) -> &State<C> {
        &self.values[position]
    }
}

impl<C> IndexMut<usize> for StateCollection<C> {
    fn index_mut(&mut self, position: usize) -> &mut State<C> {
        &mut self.values[position]
    }
}

impl<'a, C> IntoIterator for &'a StateCollection<C> {
    type Item = &'a State<C>;
    type IntoIter = std::slice::Iter<'a, State<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<C: 'static> Default for StateCollection<C> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
