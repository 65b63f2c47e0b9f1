use crate::maximum_flow::graph::Graph;
use crate::queue::FifoQueue;
use num_traits::NumAssign;

// per-solve scratch; dropped when the solve call returns
struct Context {
    distances: Vec<usize>, // BFS level from the source, num_nodes if unreached
    current_edge: Vec<usize>,
    que: FifoQueue<usize>,
    path: Vec<(usize, usize)>, // (vertex, arc index) steps of the sink-to-source walk
}

#[derive(Default)]
pub struct Dinic;

impl Dinic {
    /// Augments as much flow as the residual network allows and returns the
    /// amount pushed by this call. Repeat calls continue from the current
    /// flow state.
    pub fn solve<Flow>(&mut self, source: usize, sink: usize, graph: &mut Graph<Flow>) -> Flow
    where
        Flow: NumAssign + Ord + Copy,
    {
        assert!(source < graph.num_nodes());
        let limit = graph.inside_edge_lists[source].iter().fold(Flow::zero(), |sum, e| sum + e.residual_capacity());
        self.solve_with_limit(source, sink, graph, limit)
    }

    pub fn solve_with_limit<Flow>(&mut self, source: usize, sink: usize, graph: &mut Graph<Flow>, limit: Flow) -> Flow
    where
        Flow: NumAssign + Ord + Copy,
    {
        assert!(source < graph.num_nodes() && sink < graph.num_nodes());
        assert_ne!(source, sink);
        assert!(limit >= Flow::zero());

        let num_nodes = graph.num_nodes();
        let mut context = Context {
            distances: vec![num_nodes; num_nodes],
            current_edge: vec![0; num_nodes],
            que: FifoQueue::new(),
            path: Vec::new(),
        };

        let mut flow = Flow::zero();
        while flow < limit {
            self.bfs(source, sink, graph, &mut context);

            // no s-t path
            if context.distances[sink] == num_nodes {
                break;
            }

            context.current_edge.fill(0);
            let delta = self.blocking_flow(source, sink, graph, &mut context, limit - flow);
            if delta == Flow::zero() {
                break;
            }
            flow += delta;
        }

        flow
    }

    // O(n + m)
    // level of u = distance from source to u in the residual network; stops
    // as soon as the sink is leveled, leaving deeper vertices unreached
    fn bfs<Flow>(&self, source: usize, sink: usize, graph: &Graph<Flow>, context: &mut Context)
    where
        Flow: NumAssign + Ord + Copy,
    {
        let num_nodes = graph.num_nodes();
        context.que.clear();
        context.distances.fill(num_nodes);
        context.distances[source] = 0;
        context.que.push(source);

        while let Some(u) = context.que.pop() {
            for edge in graph.inside_edge_lists[u].iter() {
                if edge.residual_capacity() > Flow::zero() && context.distances[edge.to] == num_nodes {
                    context.distances[edge.to] = context.distances[u] + 1;
                    if edge.to == sink {
                        return;
                    }
                    context.que.push(edge.to);
                }
            }
        }
    }

    // One phase of augmentation inside the level graph, walked from the sink
    // toward the source with an explicit stack. A step over arc (u, i) pushes
    // flow along the twin of that arc, so admissibility checks the twin's
    // residual capacity and a strictly smaller level at the far endpoint.
    // current_edge[u] resumes the arc scan where the previous probe stopped,
    // bounding each vertex's total scan work per phase by its degree.
    fn blocking_flow<Flow>(&self, source: usize, sink: usize, graph: &mut Graph<Flow>, context: &mut Context, limit: Flow) -> Flow
    where
        Flow: NumAssign + Ord + Copy,
    {
        let num_nodes = graph.num_nodes();
        let mut flow = Flow::zero();
        let mut u = sink;
        context.path.clear();

        loop {
            if u == source {
                // bottleneck over the twins of the walked arcs
                let mut delta = limit - flow;
                for &(v, i) in context.path.iter() {
                    let edge = &graph.inside_edge_lists[v][i];
                    delta = delta.min(graph.inside_edge_lists[edge.to][edge.rev].residual_capacity());
                }
                for &(v, i) in context.path.iter() {
                    let (to, rev) = {
                        let edge = &graph.inside_edge_lists[v][i];
                        (edge.to, edge.rev)
                    };
                    graph.push_flow(to, rev, delta);
                }
                flow += delta;
                if flow == limit {
                    return flow;
                }

                // resume from the sink side of the first saturated step
                let keep = context
                    .path
                    .iter()
                    .position(|&(v, i)| {
                        let edge = &graph.inside_edge_lists[v][i];
                        graph.inside_edge_lists[edge.to][edge.rev].residual_capacity() == Flow::zero()
                    })
                    .unwrap();
                u = context.path[keep].0;
                context.path.truncate(keep);
            } else {
                let mut advanced = false;
                while context.current_edge[u] < graph.inside_edge_lists[u].len() {
                    let (to, rev) = {
                        let edge = &graph.inside_edge_lists[u][context.current_edge[u]];
                        (edge.to, edge.rev)
                    };
                    if context.distances[to] < context.distances[u]
                        && graph.inside_edge_lists[to][rev].residual_capacity() > Flow::zero()
                    {
                        context.path.push((u, context.current_edge[u]));
                        u = to;
                        advanced = true;
                        break;
                    }
                    context.current_edge[u] += 1;
                }

                if !advanced {
                    // dead end: prune u from the level graph and step back
                    context.distances[u] = num_nodes;
                    if u == sink {
                        return flow;
                    }
                    let (v, i) = context.path.pop().unwrap();
                    context.current_edge[v] = i + 1;
                    u = v;
                }
            }
        }
    }
}
