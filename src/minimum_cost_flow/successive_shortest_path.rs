use crate::minimum_cost_flow::graph::Graph;
use crate::minimum_cost_flow::residual::Residual;
use crate::queue::FifoQueue;
use num_traits::NumAssign;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::ops::Neg;

// per-solve scratch; dropped when the solve call returns
struct Context<Flow> {
    dist: Vec<Option<Flow>>,
    visited: Vec<bool>,
    prev_edge: Vec<Option<usize>>, // arc of the shortest-path tree entering v
    heap: BinaryHeap<(Reverse<Flow>, usize)>,
    que_min: FifoQueue<usize>,
}

#[derive(Default)]
pub struct SuccessiveShortestPath;

impl SuccessiveShortestPath {
    pub fn flow<Flow>(&mut self, source: usize, sink: usize, graph: &mut Graph<Flow>) -> (Flow, Flow)
    where
        Flow: NumAssign + Neg<Output = Flow> + Ord + Copy,
    {
        *self.slope(source, sink, graph).last().unwrap()
    }

    pub fn flow_with_limit<Flow>(&mut self, source: usize, sink: usize, graph: &mut Graph<Flow>, limit: Flow) -> (Flow, Flow)
    where
        Flow: NumAssign + Neg<Output = Flow> + Ord + Copy,
    {
        *self.slope_with_limit(source, sink, graph, limit).last().unwrap()
    }

    pub fn slope<Flow>(&mut self, source: usize, sink: usize, graph: &mut Graph<Flow>) -> Vec<(Flow, Flow)>
    where
        Flow: NumAssign + Neg<Output = Flow> + Ord + Copy,
    {
        let limit = graph.edges.iter().filter(|edge| edge.from == source).fold(Flow::zero(), |sum, edge| sum + edge.upper);
        self.slope_with_limit(source, sink, graph, limit)
    }

    /// Breakpoints of the piecewise-linear flow/cost curve, starting at
    /// `(0, 0)`; the last entry is the (possibly limited) minimum-cost
    /// maximum flow. The flat edge list's `flow` fields are refreshed from
    /// the final residual before returning.
    ///
    /// A graph instance supports a single solve; repeats fail fast.
    pub fn slope_with_limit<Flow>(&mut self, source: usize, sink: usize, graph: &mut Graph<Flow>, limit: Flow) -> Vec<(Flow, Flow)>
    where
        Flow: NumAssign + Neg<Output = Flow> + Ord + Copy,
    {
        assert!(source < graph.num_nodes() && sink < graph.num_nodes());
        assert_ne!(source, sink);
        assert!(limit >= Flow::zero());
        assert!(!graph.solved, "re-solving a minimum-cost flow instance is unsupported");
        graph.solved = true;

        let num_nodes = graph.num_nodes();
        let mut residual = Residual::build(graph);
        let mut context = Context {
            dist: vec![None; num_nodes],
            visited: vec![false; num_nodes],
            prev_edge: vec![None; num_nodes],
            heap: BinaryHeap::new(),
            que_min: FifoQueue::new(),
        };

        let mut flow = Flow::zero();
        let mut cost = Flow::zero();
        let mut prev_cost_per_flow: Option<Flow> = None;
        let mut result = vec![(flow, cost)];

        while flow < limit {
            if !self.dual_ref(source, sink, &mut residual, &mut context) {
                break;
            }

            let mut delta = limit - flow;
            let mut v = sink;
            while v != source {
                let edge_index = context.prev_edge[v].unwrap();
                delta = delta.min(residual.csr.elist[edge_index].residual_capacity());
                v = residual.csr.elist[residual.csr.elist[edge_index].rev].to;
            }

            let mut v = sink;
            while v != source {
                let edge_index = context.prev_edge[v].unwrap();
                residual.push_flow(edge_index, delta);
                v = residual.csr.elist[residual.csr.elist[edge_index].rev].to;
            }

            // -potentials[source] is the true cost of this phase's path
            let cost_per_flow = -residual.potentials[source];
            flow += delta;
            cost += delta * cost_per_flow;
            if prev_cost_per_flow == Some(cost_per_flow) {
                result.pop();
            }
            result.push((flow, cost));
            prev_cost_per_flow = Some(cost_per_flow);
        }

        residual.set_flow(graph);
        result
    }

    // Dijkstra over reduced costs; updates the potentials so reduced costs
    // stay non-negative for the next phase. Returns false once the sink is
    // unreachable in the residual network.
    fn dual_ref<Flow>(&self, source: usize, sink: usize, residual: &mut Residual<Flow>, context: &mut Context<Flow>) -> bool
    where
        Flow: NumAssign + Neg<Output = Flow> + Ord + Copy,
    {
        context.dist.fill(None);
        context.visited.fill(false);
        context.prev_edge.fill(None);
        context.heap.clear();
        context.que_min.clear();

        context.dist[source] = Some(Flow::zero());
        context.que_min.push(source);

        while !context.que_min.is_empty() || !context.heap.is_empty() {
            // vertices tied with the current minimum distance bypass the heap
            let u = match context.que_min.pop() {
                Some(u) => u,
                None => context.heap.pop().unwrap().1,
            };
            if context.visited[u] {
                continue;
            }
            context.visited[u] = true;
            if u == sink {
                break;
            }

            let dist_u = context.dist[u].unwrap();
            for edge_index in residual.csr.start[u]..residual.csr.start[u + 1] {
                let edge = &residual.csr.elist[edge_index];
                if edge.residual_capacity() == Flow::zero() {
                    continue;
                }

                let new_dist = dist_u + residual.reduced_cost(u, edge);
                if context.dist[edge.to].is_none() || context.dist[edge.to].unwrap() > new_dist {
                    context.dist[edge.to] = Some(new_dist);
                    context.prev_edge[edge.to] = Some(edge_index);
                    if new_dist == dist_u {
                        context.que_min.push(edge.to);
                    } else {
                        context.heap.push((Reverse(new_dist), edge.to));
                    }
                }
            }
        }

        if !context.visited[sink] {
            return false;
        }

        let dist_sink = context.dist[sink].unwrap();
        for u in 0..residual.csr.num_nodes() {
            if context.visited[u] {
                residual.potentials[u] -= dist_sink - context.dist[u].unwrap();
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maximum_flow;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rstest::rstest;

    fn assert_flow_conservation(graph: &Graph<i64>, source: usize, sink: usize) {
        let mut net = vec![0i64; graph.num_nodes()];
        for edge in graph.edges() {
            assert!(0 <= edge.flow && edge.flow <= edge.upper);
            net[edge.from] -= edge.flow;
            net[edge.to] += edge.flow;
        }
        for (u, &balance) in net.iter().enumerate() {
            if u != source && u != sink {
                assert_eq!(balance, 0, "vertex {} is unbalanced", u);
            }
        }
    }

    fn assert_slope_shape(slope: &[(i64, i64)]) {
        assert_eq!(slope[0], (0, 0));
        for window in slope.windows(2) {
            assert!(window[0].0 < window[1].0, "flow must strictly increase");
            assert!(window[0].1 < window[1].1, "cost must strictly increase");
        }
        // no three consecutive collinear points: marginal costs strictly increase
        for window in slope.windows(3) {
            let first = (window[1].1 - window[0].1) * (window[2].0 - window[1].0);
            let second = (window[2].1 - window[1].1) * (window[1].0 - window[0].0);
            assert!(first < second, "consecutive segments must have distinct slopes");
        }
    }

    #[test]
    fn four_vertex_limited_flow() {
        let mut graph = Graph::new(4);
        graph.add_directed_edge(0, 1, 2, 1);
        graph.add_directed_edge(0, 2, 1, 2);
        graph.add_directed_edge(1, 2, 1, 1);
        graph.add_directed_edge(1, 3, 1, 3);
        graph.add_directed_edge(2, 3, 2, 1);

        assert_eq!(SuccessiveShortestPath::default().flow_with_limit(0, 3, &mut graph, 2), (2, 6));
        assert_flow_conservation(&graph, 0, 3);
        assert_eq!(graph.minimum_cost(), 6);
    }

    #[test]
    fn equal_marginal_costs_collapse_to_one_segment() {
        let mut graph = Graph::new(3);
        graph.add_directed_edge(0, 1, 1, 1);
        graph.add_directed_edge(1, 2, 1, 0);
        graph.add_directed_edge(0, 2, 2, 1);

        assert_eq!(SuccessiveShortestPath::default().slope(0, 2, &mut graph), vec![(0, 0), (3, 3)]);
        assert_flow_conservation(&graph, 0, 2);
    }

    #[rstest]
    #[case(5, vec![(0, 0), (5, 10)])]
    #[case(0, vec![(0, 0)])]
    fn single_edge(#[case] upper: i64, #[case] expected: Vec<(i64, i64)>) {
        let mut graph = Graph::new(2);
        graph.add_directed_edge(0, 1, upper, 2);
        assert_eq!(SuccessiveShortestPath::default().slope(0, 1, &mut graph), expected);
    }

    #[test]
    fn parallel_edges_break_at_each_marginal_cost() {
        let mut graph = Graph::new(2);
        graph.add_directed_edge(0, 1, 1, 1);
        graph.add_directed_edge(0, 1, 1, 2);

        let slope = SuccessiveShortestPath::default().slope(0, 1, &mut graph);
        assert_eq!(slope, vec![(0, 0), (1, 1), (2, 3)]);
        assert_slope_shape(&slope);
    }

    #[test]
    fn cheap_detour_is_preferred() {
        let mut graph = Graph::new(4);
        let direct = graph.add_directed_edge(0, 3, 1, 10);
        graph.add_directed_edge(0, 1, 1, 1);
        graph.add_directed_edge(1, 2, 1, 1);
        graph.add_directed_edge(2, 3, 1, 1);

        assert_eq!(SuccessiveShortestPath::default().flow(0, 3, &mut graph), (2, 13));
        assert_eq!(graph.get_edge(direct).flow, 1);
    }

    #[test]
    fn unreachable_sink_yields_singleton_breakpoint() {
        let mut graph = Graph::new(3);
        graph.add_directed_edge(0, 1, 4, 1);
        assert_eq!(SuccessiveShortestPath::default().slope(0, 2, &mut graph), vec![(0, 0)]);
    }

    #[test]
    fn agrees_with_dinic_on_random_graphs() {
        let mut rng = StdRng::seed_from_u64(92);
        for _ in 0..50 {
            let num_nodes = rng.random_range(2..10);
            let num_edges = rng.random_range(0..30);
            let mut graph = Graph::new(num_nodes);
            let mut capacitated = maximum_flow::graph::Graph::new(num_nodes);
            for _ in 0..num_edges {
                let from = rng.random_range(0..num_nodes);
                let mut to = rng.random_range(0..num_nodes);
                if from == to {
                    to = (to + 1) % num_nodes;
                }
                let upper = rng.random_range(0..15);
                graph.add_directed_edge(from, to, upper, rng.random_range(1..8));
                capacitated.add_directed_edge(from, to, upper);
            }

            let (source, sink) = (0, num_nodes - 1);
            let slope = SuccessiveShortestPath::default().slope(source, sink, &mut graph);
            assert_slope_shape(&slope);
            assert_flow_conservation(&graph, source, sink);

            let &(flow, cost) = slope.last().unwrap();
            assert_eq!(flow, maximum_flow::dinic::Dinic::default().solve(source, sink, &mut capacitated));
            assert_eq!(cost, graph.minimum_cost());
        }
    }

    #[test]
    #[should_panic]
    fn rejects_equal_source_and_sink() {
        let mut graph = Graph::<i64>::new(2);
        SuccessiveShortestPath::default().flow(1, 1, &mut graph);
    }

    #[test]
    #[should_panic(expected = "re-solving")]
    fn rejects_second_solve() {
        let mut graph = Graph::new(2);
        graph.add_directed_edge(0, 1, 1, 1);
        let mut solver = SuccessiveShortestPath::default();
        solver.flow(0, 1, &mut graph);
        solver.flow(0, 1, &mut graph);
    }
}
