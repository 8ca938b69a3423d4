//! Serializable snapshots of machine topology.
//!
//! A [`MachineGraph`] captures the names, kinds and edges of a machine tree
//! together with the active state of every machine at the time of the
//! snapshot. Callbacks and guards are not part of it.

use serde::{Deserialize, Serialize};

use crate::core::{StateKind, StateNode};
use crate::machine::StateMachine;

pub mod error;

pub use error::GraphError;

/// Version identifier for the snapshot format
pub const GRAPH_VERSION: u32 = 1;

/// One state of a machine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDescriptor {
    pub name: String,
    pub kind: StateKind,

    /// Snapshot of the machine nested in this state, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submachine: Option<MachineGraph>,
}

/// One declared transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDescriptor {
    pub source: String,
    pub target: String,
}

/// Point-in-time view of a machine and everything nested in it.
///
/// # Example
///
/// ```rust
/// use statechart::core::{State, StateNode, Transition};
/// use statechart::graph::MachineGraph;
/// use statechart::machine::StateMachine;
///
/// let mut machine = StateMachine::new(
///     "Light",
///     [State::leaf("Off"), State::leaf("On")],
///     [Transition::constant("Off", "On", true)],
///     "Off",
/// );
/// machine.enter(&mut ());
///
/// let json = machine.graph().to_json().unwrap();
/// let graph = MachineGraph::from_json(&json).unwrap();
///
/// assert_eq!(graph.active_id.as_deref(), Some("Off"));
/// assert_eq!(graph.transitions.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineGraph {
    /// Snapshot format version
    pub version: u32,
    pub name: String,
    pub entry_id: String,
    pub active_id: Option<String>,
    pub states: Vec<StateDescriptor>,
    pub transitions: Vec<EdgeDescriptor>,
}

impl MachineGraph {
    pub fn state(&self, name: &str) -> Option<&StateDescriptor> {
        self.states.iter().find(|state| state.name == name)
    }

    /// Follow nested machines by state name, starting at this graph.
    ///
    /// An empty path returns `self`.
    pub fn find(&self, path: &[&str]) -> Option<&MachineGraph> {
        match path.split_first() {
            None => Some(self),
            Some((head, rest)) => self.state(head)?.submachine.as_ref()?.find(rest),
        }
    }

    /// Active state names from this machine down through active nested machines.
    pub fn active_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = Some(self);
        while let Some(graph) = current {
            let Some(active) = graph.active_id.as_deref() else {
                break;
            };
            path.push(active);
            current = graph
                .state(active)
                .and_then(|state| state.submachine.as_ref());
        }
        path
    }

    pub fn to_json(&self) -> Result<String, GraphError> {
        serde_json::to_string(self).map_err(|e| GraphError::SerializationFailed(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, GraphError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GraphError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let graph: MachineGraph = serde_json::from_str(json)
            .map_err(|e| GraphError::DeserializationFailed(e.to_string()))?;
        if graph.version != GRAPH_VERSION {
            return Err(GraphError::UnsupportedVersion {
                found: graph.version,
                supported: GRAPH_VERSION,
            });
        }
        Ok(graph)
    }
}

pub(crate) fn snapshot<C: 'static>(machine: &StateMachine<C>) -> MachineGraph {
    let states = machine
        .states()
        .iter()
        .map(|state| StateDescriptor {
            name: state.name().to_string(),
            kind: state.kind(),
            submachine: state.as_state_machine().map(|nested| nested.graph()),
        })
        .collect();

    let transitions = machine
        .edges()
        .into_iter()
        .map(|(source, target)| EdgeDescriptor {
            source: source.to_string(),
            target: target.to_string(),
        })
        .collect();

    MachineGraph {
        version: GRAPH_VERSION,
        name: machine.name().to_string(),
        entry_id: machine.entry_id().to_string(),
        active_id: machine.active_id().map(str::to_string),
        states,
        transitions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{State, Transition};

    fn nested() -> StateMachine<()> {
        let walking = StateMachine::new(
            "Walking",
            [State::leaf("Slow"), State::leaf("Fast")],
            [Transition::constant("Slow", "Fast", false)],
            "Slow",
        );
        StateMachine::new(
            "Player",
            [State::from(walking), State::leaf("Idle")],
            [Transition::constant("Walking", "Idle", false)],
            "Walking",
        )
    }

    #[test]
    fn snapshot_describes_tree() {
        let graph = nested().graph();

        assert_eq!(graph.version, GRAPH_VERSION);
        assert_eq!(graph.name, "Player");
        assert_eq!(graph.active_id, None);
        assert_eq!(graph.states.len(), 2);
        assert_eq!(graph.states[0].kind, StateKind::Machine);
        assert_eq!(graph.states[1].kind, StateKind::Leaf);
        assert!(graph.states[1].submachine.is_none());
        assert_eq!(
            graph.transitions,
            vec![EdgeDescriptor {
                source: "Walking".into(),
                target: "Idle".into()
            }]
        );

        let walking = graph.find(&["Walking"]).expect("nested graph");
        assert_eq!(walking.entry_id, "Slow");
    }

    #[test]
    fn active_path_follows_nested_machines() {
        let mut machine = nested();
        machine.enter(&mut ());

        let graph = machine.graph();

        assert_eq!(graph.active_path(), vec!["Walking", "Slow"]);
    }

    #[test]
    fn json_roundtrip_preserves_snapshot() {
        let mut machine = nested();
        machine.enter(&mut ());
        let graph = machine.graph();

        let json = graph.to_json_pretty().unwrap();
        let decoded = MachineGraph::from_json(&json).unwrap();

        assert_eq!(decoded, graph);
        assert!(json.contains("\"kind\": \"machine\""));
    }

    #[test]
    fn rejects_unknown_version() {
        let mut graph = nested().graph();
        graph.version = 99;
        let json = graph.to_json().unwrap();

        let result = MachineGraph::from_json(&json);

        assert!(matches!(
            result,
            Err(GraphError::UnsupportedVersion {
                found: 99,
                supported: GRAPH_VERSION
            })
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            MachineGraph::from_json("{\"name\":"),
            Err(GraphError::DeserializationFailed(_))
        ));
    }
}
