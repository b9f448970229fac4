#![no_main]

use hypercent_core::graph::read_hypergraph;
use libfuzzer_sys::fuzz_target;

const OFFSET: hypercent_core::ExternalId = 1_000_000;

fuzz_target!(|data: &[u8]| {
    let Ok(g) = read_hypergraph(data, OFFSET) else {
        return;
    };
    assert_eq!(
        g.node_count(),
        g.real_node_count() + g.hyperedge_count(),
        "one synthetic node per hyperedge"
    );
    for v in 0..g.node_count() {
        // The expansion is bipartite.
        let real = g.is_real(v);
        assert!(g.neighbors(v).iter().all(|&w| g.is_real(w) != real));
    }
});
