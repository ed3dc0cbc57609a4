use crate::graph::edge::EdgeId;
use crate::graph::graph::Graph;
use crate::graph::node::NodeId;
use std::collections::VecDeque;

/// An edge of the residual network: either a real pipe or one of the synthetic
/// source/sink edges that only exist for the duration of a max-flow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Arc {
    Real(EdgeId),
    /// synthetic source -> reservoir, index into `supply`
    Supply(usize),
    /// city -> synthetic sink, index into `drain`
    Drain(usize),
}

#[derive(Debug, Clone)]
pub(crate) struct SyntheticEdge {
    pub node: NodeId,
    pub capacity: u32,
    pub flow: u32,
}

/// Per-search traversal marks. Cleared before every breadth-first search so the
/// graph itself carries no traversal state.
#[derive(Debug)]
pub(crate) struct PathMarks {
    visited: Vec<bool>,
    path: Vec<Option<Arc>>,
}

impl PathMarks {
    fn new(len: usize) -> Self {
        Self {
            visited: vec![false; len],
            path: vec![None; len],
        }
    }

    pub fn clear(&mut self) {
        self.visited.iter_mut().for_each(|v| *v = false);
        self.path.iter_mut().for_each(|p| *p = None);
    }
}

/// The graph extended with a synthetic source and sink.
///
/// Vertices `0..slots` are the graph's node slots, `slots` is the synthetic source
/// and `slots + 1` the synthetic sink. Both adjacency tables are built once per run,
/// in graph iteration order, so every search visits arcs in the same order.
pub(crate) struct FlowNetwork<'g> {
    graph: &'g mut Graph,
    source: usize,
    sink: usize,
    supply: Vec<SyntheticEdge>,
    drain: Vec<SyntheticEdge>,
    /// (tail, head) vertex of every real edge slot
    ends: Vec<(usize, usize)>,
    out: Vec<Vec<Arc>>,
    inc: Vec<Vec<Arc>>,
    marks: PathMarks,
}

impl<'g> FlowNetwork<'g> {
    pub fn new(graph: &'g mut Graph) -> Self {
        let slots = graph.slot_count();
        let source = slots;
        let sink = slots + 1;
        let mut out: Vec<Vec<Arc>> = vec![Vec::new(); slots + 2];
        let mut inc: Vec<Vec<Arc>> = vec![Vec::new(); slots + 2];
        let mut supply = Vec::new();
        let mut drain = Vec::new();

        for (id, node) in graph.nodes() {
            if let Some(max_delivery) = node.max_delivery() {
                supply.push(SyntheticEdge {
                    node: id,
                    capacity: max_delivery,
                    flow: 0,
                });
            }
            if let Some(demand) = node.demand() {
                drain.push(SyntheticEdge {
                    node: id,
                    capacity: demand as u32,
                    flow: 0,
                });
            }
        }

        for (id, _) in graph.nodes() {
            out[id.index()].extend(graph.outgoing(id).iter().map(|e| Arc::Real(*e)));
        }
        let mut ends = vec![(source, source); graph.edge_slot_count()];
        for (edge_id, edge) in graph.edges() {
            let ends_of = (graph.lookup(edge.origin()), graph.lookup(edge.dest()));
            if let (Ok(origin), Ok(dest)) = ends_of {
                ends[edge_id.index()] = (origin.index(), dest.index());
                inc[dest.index()].push(Arc::Real(edge_id));
            }
        }
        for (i, s) in supply.iter().enumerate() {
            out[source].push(Arc::Supply(i));
            inc[s.node.index()].push(Arc::Supply(i));
        }
        for (i, d) in drain.iter().enumerate() {
            out[d.node.index()].push(Arc::Drain(i));
            inc[sink].push(Arc::Drain(i));
        }

        Self {
            graph,
            source,
            sink,
            supply,
            drain,
            ends,
            out,
            inc,
            marks: PathMarks::new(slots + 2),
        }
    }

    pub fn supply(&self) -> &[SyntheticEdge] {
        &self.supply
    }

    pub fn drain(&self) -> &[SyntheticEdge] {
        &self.drain
    }

    pub fn reset_flows(&mut self) {
        self.graph.reset_flows();
        self.supply.iter_mut().for_each(|s| s.flow = 0);
        self.drain.iter_mut().for_each(|d| d.flow = 0);
    }

    fn tail(&self, arc: Arc) -> usize {
        match arc {
            Arc::Real(id) => self.ends[id.index()].0,
            Arc::Supply(_) => self.source,
            Arc::Drain(i) => self.drain[i].node.index(),
        }
    }

    fn head(&self, arc: Arc) -> usize {
        match arc {
            Arc::Real(id) => self.ends[id.index()].1,
            Arc::Supply(i) => self.supply[i].node.index(),
            Arc::Drain(_) => self.sink,
        }
    }

    fn capacity_and_flow(&self, arc: Arc) -> (u32, u32) {
        match arc {
            Arc::Real(id) => self
                .graph
                .edge(id)
                .map(|e| (e.capacity(), e.flow()))
                .unwrap_or((0, 0)),
            Arc::Supply(i) => (self.supply[i].capacity, self.supply[i].flow),
            Arc::Drain(i) => (self.drain[i].capacity, self.drain[i].flow),
        }
    }

    fn set_flow(&mut self, arc: Arc, flow: u32) {
        match arc {
            Arc::Real(id) => {
                if let Some(edge) = self.graph.edge_mut(id) {
                    edge.set_flow(flow);
                }
            }
            Arc::Supply(i) => {
                assert!(flow <= self.supply[i].capacity);
                self.supply[i].flow = flow;
            }
            Arc::Drain(i) => {
                assert!(flow <= self.drain[i].capacity);
                self.drain[i].flow = flow;
            }
        }
    }

    fn test_and_visit(&mut self, queue: &mut VecDeque<usize>, arc: Arc, v: usize, residual: u32) {
        if !self.marks.visited[v] && residual > 0 {
            self.marks.visited[v] = true;
            self.marks.path[v] = Some(arc);
            queue.push_back(v);
        }
    }

    /// Breadth-first search for an augmenting path from source to sink.
    ///
    /// From each vertex the outgoing arcs are tried first (forward residual), then
    /// the arcs entering it (reverse residual, i.e. their current flow).
    pub fn find_augmenting_path(&mut self) -> bool {
        self.marks.clear();
        self.marks.visited[self.source] = true;
        let mut queue = VecDeque::from([self.source]);

        while let Some(u) = queue.pop_front() {
            if self.marks.visited[self.sink] {
                break;
            }
            for i in 0..self.out[u].len() {
                let arc = self.out[u][i];
                let (capacity, flow) = self.capacity_and_flow(arc);
                let head = self.head(arc);
                self.test_and_visit(&mut queue, arc, head, capacity - flow);
            }
            for i in 0..self.inc[u].len() {
                let arc = self.inc[u][i];
                let (_, flow) = self.capacity_and_flow(arc);
                let tail = self.tail(arc);
                self.test_and_visit(&mut queue, arc, tail, flow);
            }
        }
        self.marks.visited[self.sink]
    }

    /// Walks the path marks back from the sink. Yields `(arc, forward)` pairs.
    fn path_arcs(&self) -> Vec<(Arc, bool)> {
        let mut arcs = Vec::new();
        let mut v = self.sink;
        while v != self.source {
            let Some(arc) = self.marks.path[v] else {
                break;
            };
            if self.head(arc) == v {
                arcs.push((arc, true));
                v = self.tail(arc);
            } else {
                arcs.push((arc, false));
                v = self.head(arc);
            }
        }
        arcs
    }

    pub fn min_residual_along_path(&self) -> u32 {
        self.path_arcs()
            .into_iter()
            .map(|(arc, forward)| {
                let (capacity, flow) = self.capacity_and_flow(arc);
                if forward { capacity - flow } else { flow }
            })
            .min()
            .unwrap_or(0)
    }

    pub fn augment_along_path(&mut self, f: u32) {
        for (arc, forward) in self.path_arcs() {
            let (_, flow) = self.capacity_and_flow(arc);
            let next = if forward { flow + f } else { flow - f };
            self.set_flow(arc, next);
        }
    }
}
