use crate::csr::Csr;
use crate::minimum_cost_flow::graph::Graph;
use num_traits::{NumAssign, Zero};
use std::ops::{Neg, Sub};

#[derive(Debug)]
pub(crate) struct InsideEdge<Flow> {
    pub to: usize,
    pub flow: Flow,
    pub upper: Flow,
    pub cost: Flow,
    pub rev: usize,
}

// placeholder for the builder's scatter pass
impl<Flow: Zero> Default for InsideEdge<Flow> {
    fn default() -> Self {
        InsideEdge { to: 0, flow: Flow::zero(), upper: Flow::zero(), cost: Flow::zero(), rev: 0 }
    }
}

impl<Flow> InsideEdge<Flow>
where
    Flow: Sub<Output = Flow> + Copy,
{
    #[inline]
    pub fn residual_capacity(&self) -> Flow {
        self.upper - self.flow
    }
}

/// Residual network snapshot plus vertex potentials, rebuilt from the flat
/// edge list at the start of every solve. Each original edge contributes a
/// forward arc at `from` and a backward arc at `to` with negated cost; the
/// `rev` back-pointers are patched from the builder's position map.
pub(crate) struct Residual<Flow> {
    pub csr: Csr<InsideEdge<Flow>>,
    pub potentials: Vec<Flow>,
    pub edge_index_to_inside_edge_index: Vec<usize>,
}

impl<Flow> Residual<Flow>
where
    Flow: NumAssign + Neg<Output = Flow> + Ord + Copy,
{
    pub fn build(graph: &Graph<Flow>) -> Self {
        let mut entries = Vec::with_capacity(2 * graph.num_edges());
        for edge in graph.edges.iter() {
            entries.push((edge.from, InsideEdge { to: edge.to, flow: edge.flow, upper: edge.upper, cost: edge.cost, rev: 0 }));
            entries.push((edge.to, InsideEdge { to: edge.from, flow: edge.upper - edge.flow, upper: edge.upper, cost: -edge.cost, rev: 0 }));
        }

        let (mut csr, positions) = Csr::new(graph.num_nodes(), entries);

        let mut edge_index_to_inside_edge_index = vec![0; graph.num_edges()];
        for edge_id in 0..graph.num_edges() {
            let (forward, backward) = (positions[2 * edge_id], positions[2 * edge_id + 1]);
            debug_assert_ne!(forward, backward);
            csr.elist[forward].rev = backward;
            csr.elist[backward].rev = forward;
            edge_index_to_inside_edge_index[edge_id] = forward;
        }

        Residual { csr, potentials: vec![Flow::zero(); graph.num_nodes()], edge_index_to_inside_edge_index }
    }

    pub fn set_flow(&self, graph: &mut Graph<Flow>) {
        for edge_id in 0..graph.num_edges() {
            let i = self.edge_index_to_inside_edge_index[edge_id];
            graph.edges[edge_id].flow = self.csr.elist[i].flow;
        }
    }

    #[inline]
    pub fn push_flow(&mut self, inside_edge_index: usize, flow: Flow) {
        let rev = self.csr.elist[inside_edge_index].rev;
        self.csr.elist[inside_edge_index].flow += flow;
        self.csr.elist[rev].flow -= flow;
    }

    #[inline]
    pub fn reduced_cost(&self, u: usize, edge: &InsideEdge<Flow>) -> Flow {
        edge.cost - self.potentials[edge.to] + self.potentials[u]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twinned_arcs_split_capacity_by_carried_flow() {
        let mut graph = Graph::new(3);
        let a = graph.add_directed_edge(0, 1, 5, 2);
        graph.add_directed_edge(1, 2, 3, 1);
        graph.edges[a].flow = 4;

        let residual = Residual::build(&graph);
        let forward = &residual.csr.elist[residual.edge_index_to_inside_edge_index[a]];
        let backward = &residual.csr.elist[forward.rev];

        assert_eq!(forward.residual_capacity(), 1);
        assert_eq!(backward.residual_capacity(), 4);
        assert_eq!(backward.cost, -forward.cost);
        assert_eq!(backward.rev, residual.edge_index_to_inside_edge_index[a]);
        assert_eq!(forward.residual_capacity() + backward.residual_capacity(), 5);
    }

    #[test]
    fn set_flow_reads_back_forward_arcs() {
        let mut graph = Graph::new(2);
        let a = graph.add_directed_edge(0, 1, 5, 2);

        let mut residual = Residual::build(&graph);
        residual.push_flow(residual.edge_index_to_inside_edge_index[a], 3);
        residual.set_flow(&mut graph);

        assert_eq!(graph.get_edge(a).flow, 3);
    }
}
