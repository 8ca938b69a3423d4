//! Type-erased, read-only view of a machine.

use crate::graph::MachineGraph;

/// Introspection surface of a machine, independent of its context type.
///
/// Rendering consumers use this to walk a tree of nested machines, including
/// machines reached through context adapters.
pub trait MachineView {
    fn name(&self) -> &str;

    fn entry_id(&self) -> &str;

    /// Name of the active state, `None` before `enter` and after `exit`.
    fn active_id(&self) -> Option<&str>;

    /// State names in insertion order.
    fn state_names(&self) -> Vec<&str>;

    /// `(source, target)` pairs of every declared transition.
    fn edges(&self) -> Vec<(&str, &str)>;

    /// The machine nested in the state called `name`, if any.
    fn submachine(&self, name: &str) -> Option<&dyn MachineView>;

    /// Serializable snapshot of this machine and everything nested in it.
    fn graph(&self) -> MachineGraph;
}
