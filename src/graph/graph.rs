use crate::error::{Ignored, NetworkError, Result};
use crate::graph::edge::{Edge, EdgeId};
use crate::graph::node::{Node, NodeId};
use std::collections::HashMap;
use std::mem;

/// Arena-backed water network.
///
/// Nodes and edges live in slots addressed by [`NodeId`] and [`EdgeId`]. A removed
/// node or edge leaves an empty slot behind, so ids stay stable across
/// detach/reattach cycles. Each node's outgoing edges are kept in insertion order,
/// which pins the traversal order of every search.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Option<Node>>,
    edges: Vec<Option<Edge>>,
    adj: Vec<Vec<EdgeId>>,
    codes: HashMap<String, NodeId>,
}

/// Edges created by a single [`Graph::add_edge`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub forward: EdgeId,
    pub backward: Option<EdgeId>,
}

#[derive(Debug)]
struct DetachedEdge {
    owner: NodeId,
    /// slot in the owner's adjacency list, `None` when the whole list was taken
    position: Option<usize>,
    id: EdgeId,
    edge: Edge,
}

/// Everything taken out of the graph by a detach call, in removal order.
#[derive(Debug)]
pub(crate) struct Detached {
    node: Option<(NodeId, Node, Vec<EdgeId>)>,
    edges: Vec<DetachedEdge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Node) -> std::result::Result<NodeId, Ignored> {
        if self.codes.contains_key(node.code()) {
            return Err(Ignored::DuplicateCode);
        }
        let id = NodeId(self.nodes.len());
        self.codes.insert(node.code().to_string(), id);
        self.nodes.push(Some(node));
        self.adj.push(Vec::new());
        Ok(id)
    }

    /// Adds a pipe. An undirected pipe becomes two opposite edges of equal capacity.
    pub fn add_edge(
        &mut self,
        origin: &str,
        dest: &str,
        capacity: u32,
        directed: bool,
    ) -> std::result::Result<Link, Ignored> {
        let (Some(&from), Some(&to)) = (self.codes.get(origin), self.codes.get(dest)) else {
            return Err(Ignored::UnknownEndpoint);
        };
        if from == to {
            return Err(Ignored::SelfLoop);
        }
        let forward = self.push_edge(from, Edge::new(origin, dest, capacity));
        let backward = if directed {
            None
        } else {
            Some(self.push_edge(to, Edge::new(dest, origin, capacity)))
        };
        Ok(Link { forward, backward })
    }

    fn push_edge(&mut self, owner: NodeId, edge: Edge) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.edges.push(Some(edge));
        self.adj[owner.index()].push(id);
        id
    }

    /// Deletes the node, its outgoing edges and every edge that targets it.
    pub fn remove_node(&mut self, code: &str) -> Result<Node> {
        let detached = self.detach_node(code)?;
        let (_, node, _) = detached
            .node
            .ok_or_else(|| NetworkError::NodeNotFound(code.to_string()))?;
        Ok(node)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains_key(code)
    }

    pub fn lookup(&self, code: &str) -> Result<NodeId> {
        self.codes
            .get(code)
            .copied()
            .ok_or_else(|| NetworkError::NodeNotFound(code.to_string()))
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    pub fn node_by_code(&self, code: &str) -> Result<&Node> {
        let id = self.lookup(code)?;
        self.node(id)
            .ok_or_else(|| NetworkError::NodeNotFound(code.to_string()))
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index()).and_then(Option::as_ref)
    }

    pub(crate) fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Number of node slots, including emptied ones.
    pub fn slot_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edge slots, including emptied ones.
    pub fn edge_slot_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_count(&self) -> usize {
        self.codes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adj.iter().map(Vec::len).sum()
    }

    /// Active nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|n| (NodeId(i), n)))
    }

    pub fn reservoirs(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes().filter(|(_, n)| n.is_reservoir())
    }

    pub fn stations(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes().filter(|(_, n)| n.is_station())
    }

    pub fn cities(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes().filter(|(_, n)| n.is_city())
    }

    /// Active edges, node by node in insertion order, each node's edges in adjacency order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.adj.iter().flatten().filter_map(|id| self.edge(*id).map(|e| (*id, e)))
    }

    pub fn outgoing(&self, id: NodeId) -> &[EdgeId] {
        self.adj.get(id.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edges_of(&self, code: &str) -> Result<Vec<&Edge>> {
        let id = self.lookup(code)?;
        Ok(self
            .outgoing(id)
            .iter()
            .filter_map(|e| self.edge(*e))
            .collect())
    }

    /// Edges whose destination is `code`. Scans every edge in the graph.
    pub fn incoming(&self, code: &str) -> Vec<EdgeId> {
        self.edges()
            .filter(|(_, e)| e.dest() == code)
            .map(|(id, _)| id)
            .collect()
    }

    /// Total flow on the edges entering `code`.
    pub fn inflow(&self, code: &str) -> u64 {
        self.edges()
            .filter(|(_, e)| e.dest() == code)
            .map(|(_, e)| e.flow() as u64)
            .sum()
    }

    pub fn outflow(&self, code: &str) -> u64 {
        self.edges_of(code)
            .map(|edges| edges.iter().map(|e| e.flow() as u64).sum())
            .unwrap_or(0)
    }

    pub fn reset_flows(&mut self) {
        self.edges.iter_mut().flatten().for_each(|e| e.set_flow(0));
    }

    /// Flow of every edge slot, 0 for empty slots.
    pub(crate) fn flows(&self) -> Vec<u32> {
        self.edges
            .iter()
            .map(|e| e.as_ref().map(Edge::flow).unwrap_or(0))
            .collect()
    }

    pub(crate) fn restore_flows(&mut self, flows: &[u32]) {
        self.edges
            .iter_mut()
            .zip(flows)
            .for_each(|(e, f)| {
                if let Some(e) = e {
                    e.set_flow(*f);
                }
            });
    }

    /// Takes the node out of the graph together with its outgoing and incoming edges.
    pub(crate) fn detach_node(&mut self, code: &str) -> Result<Detached> {
        let id = self.lookup(code)?;
        let incoming = self.incoming(code);
        let mut edges = Vec::with_capacity(incoming.len());
        for edge_id in incoming {
            edges.push(self.take_edge(edge_id)?);
        }
        let outgoing = mem::take(&mut self.adj[id.index()]);
        for edge_id in &outgoing {
            if let Some(edge) = self.edges[edge_id.index()].take() {
                edges.push(DetachedEdge {
                    owner: id,
                    position: None,
                    id: *edge_id,
                    edge,
                });
            }
        }
        let node = self.nodes[id.index()]
            .take()
            .ok_or_else(|| NetworkError::NodeNotFound(code.to_string()))?;
        self.codes.remove(code);
        Ok(Detached {
            node: Some((id, node, outgoing)),
            edges,
        })
    }

    pub(crate) fn detach_edge(&mut self, id: EdgeId) -> Result<Detached> {
        let edge = self.take_edge(id)?;
        Ok(Detached {
            node: None,
            edges: vec![edge],
        })
    }

    fn take_edge(&mut self, id: EdgeId) -> Result<DetachedEdge> {
        let (owner, position) = self
            .adj
            .iter()
            .enumerate()
            .find_map(|(n, list)| list.iter().position(|e| *e == id).map(|p| (NodeId(n), p)))
            .ok_or(NetworkError::EdgeNotFound(id.index()))?;
        self.adj[owner.index()].remove(position);
        let edge = self.edges[id.index()]
            .take()
            .ok_or(NetworkError::EdgeNotFound(id.index()))?;
        Ok(DetachedEdge {
            owner,
            position: Some(position),
            id,
            edge,
        })
    }

    /// Puts back everything a detach call removed, restoring ids and adjacency order.
    pub(crate) fn reattach(&mut self, detached: Detached) {
        let Detached { node, edges } = detached;
        if let Some((id, node, outgoing)) = node {
            self.codes.insert(node.code().to_string(), id);
            self.nodes[id.index()] = Some(node);
            self.adj[id.index()] = outgoing;
        }
        for d in edges.into_iter().rev() {
            if let Some(position) = d.position {
                self.adj[d.owner.index()].insert(position, d.id);
            }
            self.edges[d.id.index()] = Some(d.edge);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Graph {
        let mut graph = Graph::new();
        graph.add_node(Node::reservoir(1, "R_1", "Castelo", "Viseu", 50)).unwrap();
        graph.add_node(Node::station(1, "PS_1")).unwrap();
        graph.add_node(Node::city(1, "C_1", "Porto", 30.0, 1000)).unwrap();
        graph.add_node(Node::city(2, "C_2", "Braga", 20.0, 800)).unwrap();
        graph.add_edge("R_1", "PS_1", 40, true).unwrap();
        graph.add_edge("PS_1", "C_1", 30, true).unwrap();
        graph.add_edge("PS_1", "C_2", 20, false).unwrap();
        graph
    }

    fn structure(graph: &Graph) -> Vec<(EdgeId, String, String, u32)> {
        graph
            .edges()
            .map(|(id, e)| (id, e.origin().to_string(), e.dest().to_string(), e.capacity()))
            .collect()
    }

    #[test]
    fn test_duplicate_code_is_ignored() {
        let mut graph = sample();
        let result = graph.add_node(Node::station(9, "C_1"));
        assert_eq!(Err(Ignored::DuplicateCode), result);
        assert!(graph.node_by_code("C_1").unwrap().is_city());
        assert_eq!(4, graph.node_count());
    }

    #[test]
    fn test_invalid_edges_are_ignored() {
        let mut graph = sample();
        assert_eq!(
            Err(Ignored::UnknownEndpoint),
            graph.add_edge("R_1", "C_404", 5, true)
        );
        assert_eq!(Err(Ignored::SelfLoop), graph.add_edge("R_1", "R_1", 5, true));
        assert_eq!(4, graph.edge_count());
    }

    #[test]
    fn test_undirected_edge_creates_both_directions() {
        let graph = sample();
        let back = graph.edges_of("C_2").unwrap();
        assert_eq!(1, back.len());
        assert_eq!("PS_1", back[0].dest());
        assert_eq!(20, back[0].capacity());
    }

    #[test]
    fn test_incoming_scans_all_nodes() {
        let graph = sample();
        let incoming = graph.incoming("PS_1");
        let origins: Vec<&str> = incoming
            .iter()
            .map(|id| graph.edge(*id).unwrap().origin())
            .collect();
        assert_eq!(vec!["R_1", "C_2"], origins);
    }

    #[test]
    fn test_remove_node_drops_incident_edges() {
        let mut graph = sample();
        let removed = graph.remove_node("PS_1").unwrap();
        assert_eq!("PS_1", removed.code());
        assert!(!graph.contains("PS_1"));
        assert_eq!(0, graph.edge_count());
        assert!(graph.edges_of("R_1").unwrap().is_empty());
    }

    #[test]
    fn test_remove_unknown_node_fails() {
        let mut graph = sample();
        assert!(matches!(
            graph.remove_node("PS_9"),
            Err(NetworkError::NodeNotFound(code)) if code == "PS_9"
        ));
    }

    #[test]
    fn test_detach_and_reattach_node_restores_structure() {
        let mut graph = sample();
        let before = structure(&graph);
        let detached = graph.detach_node("PS_1").unwrap();
        assert_eq!(3, graph.node_count());
        graph.reattach(detached);
        assert_eq!(before, structure(&graph));
        assert_eq!(NodeId(1), graph.lookup("PS_1").unwrap());
    }

    #[test]
    fn test_detach_and_reattach_edge_keeps_position() {
        let mut graph = sample();
        let before = structure(&graph);
        let (id, _) = graph.edges().nth(1).unwrap();
        let detached = graph.detach_edge(id).unwrap();
        assert!(graph.edge(id).is_none());
        graph.reattach(detached);
        assert_eq!(before, structure(&graph));
    }
}
