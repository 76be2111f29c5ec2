/// Inclusive node-count bounds used to exclude degenerate or oversized
/// inputs from a corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionBounds {
    pub min_nodes: usize,
    pub max_nodes: usize,
}

impl Default for AdmissionBounds {
    fn default() -> Self {
        Self {
            min_nodes: 20,
            max_nodes: 30_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Accept,
    TooFew,
    TooMany,
}

/// Pure admission predicate: accepts exactly when
/// `min_nodes <= node_count <= max_nodes`.
pub fn admit(node_count: usize, bounds: &AdmissionBounds) -> Admission {
    if node_count < bounds.min_nodes {
        Admission::TooFew
    } else if node_count > bounds.max_nodes {
        Admission::TooMany
    } else {
        Admission::Accept
    }
}
