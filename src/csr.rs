/// Compressed-sparse-row adjacency built from a `(from, payload)` edge list
/// with a two-pass counting sort: count out-degrees, prefix-sum them into
/// `start`, then scatter payloads through a scratch cursor array.
///
/// Insertion order is preserved within each `from` group. The returned
/// position map records the slot in `elist` where each input entry landed;
/// callers that store twinned arcs use it to patch `rev` back-pointers.
pub(crate) struct Csr<E> {
    pub start: Vec<usize>,
    pub elist: Vec<E>,
}

impl<E: Default> Csr<E> {
    pub fn new(num_nodes: usize, edges: Vec<(usize, E)>) -> (Self, Vec<usize>) {
        let mut start = vec![0; num_nodes + 1];
        for (from, _) in edges.iter() {
            start[from + 1] += 1;
        }
        for i in 1..=num_nodes {
            start[i] += start[i - 1];
        }

        let mut counter = start[..num_nodes].to_vec();
        let mut elist: Vec<E> = (0..edges.len()).map(|_| E::default()).collect();
        let mut positions = vec![0; edges.len()];
        for (index, (from, payload)) in edges.into_iter().enumerate() {
            let slot = counter[from];
            counter[from] += 1;
            elist[slot] = payload;
            positions[index] = slot;
        }

        (Csr { start, elist }, positions)
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.start.len() - 1
    }
}
