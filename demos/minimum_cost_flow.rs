use flow_networks::minimum_cost_flow::graph::Graph;
use flow_networks::minimum_cost_flow::successive_shortest_path::SuccessiveShortestPath;
use std::io::Read;

// input: n m s t, then m lines of "from to capacity cost"
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
        let (upper, cost) = (next(), next());
        graph.add_directed_edge(from, to, upper, cost);
    }

    let slope = SuccessiveShortestPath::default().slope(source, sink, &mut graph);
    let &(flow, cost) = slope.last().unwrap();
    println!("maximum flow: {}  minimum cost: {}", flow, cost);
    println!("flow/cost breakpoints: {:?}", slope);

    for edge in graph.edges() {
        println!("{:?}", edge);
    }
}
