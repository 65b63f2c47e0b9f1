pub mod graph;
mod residual;
pub mod successive_shortest_path;
