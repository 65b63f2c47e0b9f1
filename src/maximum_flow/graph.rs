use crate::queue::FifoQueue;
use num_traits::NumAssign;
use std::ops::Sub;

#[derive(PartialEq, Debug, Clone)]
pub struct Edge<Flow> {
    pub from: usize,
    pub to: usize,
    pub flow: Flow,
    pub upper: Flow,
}

#[derive(Default, PartialEq, Debug, Clone)]
pub(crate) struct InsideEdge<Flow> {
    pub to: usize,
    pub flow: Flow,
    pub upper: Flow,
    pub rev: usize,
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

/// Residual network for maximum flow.
///
/// Arcs live in per-vertex growable lists and are mutated in place, so the
/// flow state persists across solve calls and `add_directed_edge` stays O(1)
/// amortized. Parallel edges and self-loops are allowed.
#[derive(Default)]
pub struct Graph<Flow> {
    num_nodes: usize,
    pub(crate) inside_edge_lists: Vec<Vec<InsideEdge<Flow>>>,
    // edge index -> (from, index in from's arc list) of the forward arc
    pub(crate) positions: Vec<(usize, usize)>,
}

impl<Flow> Graph<Flow>
where
    Flow: NumAssign + Ord + Copy,
{
    pub fn new(num_nodes: usize) -> Self {
        Graph { num_nodes, inside_edge_lists: vec![Vec::new(); num_nodes], positions: Vec::new() }
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.positions.len()
    }

    pub fn add_node(&mut self) -> usize {
        self.inside_edge_lists.push(Vec::new());
        self.num_nodes += 1;
        self.num_nodes - 1
    }

    pub fn add_nodes(&mut self, num_nodes: usize) -> Vec<usize> {
        self.inside_edge_lists.extend((0..num_nodes).map(|_| Vec::new()));
        self.num_nodes += num_nodes;
        ((self.num_nodes - num_nodes)..self.num_nodes).collect()
    }

    // return edge index
    pub fn add_directed_edge(&mut self, from: usize, to: usize, upper: Flow) -> usize {
        assert!(from < self.num_nodes && to < self.num_nodes);
        assert!(upper >= Flow::zero());

        let from_index = self.inside_edge_lists[from].len();
        // a self-loop stores both arcs in the same list; offset the twin index
        let to_index = self.inside_edge_lists[to].len() + usize::from(from == to);

        self.inside_edge_lists[from].push(InsideEdge { to, flow: Flow::zero(), upper, rev: to_index });
        self.inside_edge_lists[to].push(InsideEdge { to: from, flow: upper, upper, rev: from_index });

        self.positions.push((from, from_index));
        self.positions.len() - 1
    }

    pub fn get_edge(&self, edge_id: usize) -> Edge<Flow> {
        assert!(edge_id < self.positions.len());
        let (from, index) = self.positions[edge_id];
        let edge = &self.inside_edge_lists[from][index];
        Edge { from, to: edge.to, flow: edge.flow, upper: edge.upper }
    }

    pub fn edges(&self) -> Vec<Edge<Flow>> {
        (0..self.num_edges()).map(|edge_id| self.get_edge(edge_id)).collect()
    }

    /// Overwrites one edge's capacity and flow. Only the twinned arcs of
    /// `edge_id` are touched; overall feasibility is the caller's problem.
    pub fn change_edge(&mut self, edge_id: usize, upper: Flow, flow: Flow) {
        assert!(edge_id < self.positions.len());
        assert!(Flow::zero() <= flow && flow <= upper);

        let (from, index) = self.positions[edge_id];
        let (to, rev) = {
            let edge = &self.inside_edge_lists[from][index];
            (edge.to, edge.rev)
        };
        self.inside_edge_lists[from][index].upper = upper;
        self.inside_edge_lists[from][index].flow = flow;
        self.inside_edge_lists[to][rev].upper = upper;
        self.inside_edge_lists[to][rev].flow = upper - flow;
    }

    pub fn maximum_flow(&self, source: usize) -> Flow {
        (0..self.num_edges()).fold(Flow::zero(), |mut flow, edge_id| {
            let edge = self.get_edge(edge_id);
            if edge.from == source {
                flow += edge.flow;
            } else if edge.to == source {
                flow -= edge.flow;
            }
            flow
        })
    }

    /// Vertices reachable from `source` in the residual network. Valid as an
    /// s-t minimum cut only immediately after a completed solve.
    pub fn minimum_cut(&self, source: usize) -> Vec<bool> {
        assert!(source < self.num_nodes);

        let mut visited = vec![false; self.num_nodes];
        let mut que = FifoQueue::new();
        visited[source] = true;
        que.push(source);

        while let Some(u) = que.pop() {
            for edge in self.inside_edge_lists[u].iter() {
                if edge.residual_capacity() > Flow::zero() && !visited[edge.to] {
                    visited[edge.to] = true;
                    que.push(edge.to);
                }
            }
        }

        visited
    }

    #[inline]
    pub(crate) fn push_flow(&mut self, u: usize, index: usize, flow: Flow) {
        let (to, rev) = {
            let edge = &self.inside_edge_lists[u][index];
            (edge.to, edge.rev)
        };
        self.inside_edge_lists[u][index].flow += flow;
        self.inside_edge_lists[to][rev].flow -= flow;
    }
}
