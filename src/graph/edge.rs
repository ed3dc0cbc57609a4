#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(pub usize);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    origin: String,
    dest: String,
    capacity: u32,
    /// 0 <= flow <= capacity
    flow: u32,
}

impl Edge {
    pub fn new(origin: impl Into<String>, dest: impl Into<String>, capacity: u32) -> Self {
        Self {
            origin: origin.into(),
            dest: dest.into(),
            capacity,
            flow: 0,
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn dest(&self) -> &str {
        &self.dest
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn flow(&self) -> u32 {
        self.flow
    }

    pub fn residual(&self) -> u32 {
        self.capacity - self.flow
    }

    pub fn set_flow(&mut self, flow: u32) {
        assert!(
            flow <= self.capacity,
            "flow {} exceeds capacity {} on {} -> {}",
            flow,
            self.capacity,
            self.origin,
            self.dest
        );
        self.flow = flow;
    }

    /// A copy of this edge with the flow cleared.
    pub fn detached_copy(&self) -> Self {
        Self::new(self.origin.clone(), self.dest.clone(), self.capacity)
    }
}
