use flow_networks::maximum_flow::dinic::Dinic;
use flow_networks::maximum_flow::graph::Graph;
use std::io::Read;

// input: n m s t, then m lines of "from to capacity"
fn main() {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input).unwrap();
    let mut tokens = input.split_whitespace().map(|token| token.parse::<i64>().unwrap());
    let mut next = || tokens.next().expect("truncated input");

    let num_nodes = next() as usize;
    let num_edges = next() as usize;
    let (source, sink) = (next() as usize, next() as usize);

    let mut graph = Graph::new(num_nodes);
    for _ in 0..num_edges {
        let (from, to) = (next() as usize, next() as usize);
        let upper = next();
        graph.add_directed_edge(from, to, upper);
    }

    println!("maximum flow: {}", Dinic::default().solve(source, sink, &mut graph));

    let cut = graph.minimum_cut(source);
    let side: Vec<usize> = (0..num_nodes).filter(|&u| cut[u]).collect();
    println!("source side of the minimum cut: {:?}", side);

    for edge in graph.edges() {
        println!("{:?}", edge);
    }
}
