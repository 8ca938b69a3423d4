//! Builder API for declarative machine construction.
//!
//! A machine is described as a tree of [`StateBuilder`] nodes. Nodes with
//! children lower into nested machines, nodes without children into leaves,
//! and transitions declared on a node leave from that node's name. The
//! builders only produce states and transitions; they do nothing at run time.

pub mod error;
pub mod machine;
pub mod state;

pub use error::BuildError;
pub use machine::MachineBuilder;
pub use state::StateBuilder;
