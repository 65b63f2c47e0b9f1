use num_traits::NumAssign;
use std::ops::Neg;

#[derive(PartialEq, Debug, Clone)]
pub struct Edge<Flow> {
    pub from: usize,
    pub to: usize,
    pub flow: Flow,
    pub upper: Flow,
    pub cost: Flow,
}

/// Edge list for minimum-cost flow, kept in insertion order.
///
/// `flow` is the only field mutated after insertion; the solver rebuilds its
/// residual network from this list, so the list itself is the durable state.
#[derive(Default)]
pub struct Graph<Flow> {
    num_nodes: usize,
    pub(crate) edges: Vec<Edge<Flow>>,
    pub(crate) solved: bool,
}

impl<Flow> Graph<Flow>
where
    Flow: NumAssign + Neg<Output = Flow> + Ord + Copy,
{
    pub fn new(num_nodes: usize) -> Self {
        Graph { num_nodes, edges: Vec::new(), solved: false }
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn add_node(&mut self) -> usize {
        self.num_nodes += 1;
        self.num_nodes - 1
    }

    pub fn add_nodes(&mut self, num_nodes: usize) -> Vec<usize> {
        self.num_nodes += num_nodes;
        ((self.num_nodes - num_nodes)..self.num_nodes).collect()
    }

    // return edge index
    pub fn add_directed_edge(&mut self, from: usize, to: usize, upper: Flow, cost: Flow) -> usize {
        assert!(from < self.num_nodes && to < self.num_nodes);
        assert_ne!(from, to);
        assert!(upper >= Flow::zero());
        assert!(cost >= Flow::zero());

        self.edges.push(Edge { from, to, flow: Flow::zero(), upper, cost });
        self.edges.len() - 1
    }

    pub fn get_edge(&self, edge_id: usize) -> Edge<Flow> {
        assert!(edge_id < self.edges.len());
        self.edges[edge_id].clone()
    }

    pub fn edges(&self) -> Vec<Edge<Flow>> {
        self.edges.clone()
    }

    pub fn minimum_cost(&self) -> Flow {
        self.edges.iter().fold(Flow::zero(), |cost, edge| cost + edge.cost * edge.flow)
    }
}
