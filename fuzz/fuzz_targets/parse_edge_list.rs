#![no_main]

use hypercent_core::graph::read_edge_list;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(g) = read_edge_list(data) {
        assert_eq!(g.real_node_count(), g.node_count());
        for v in 0..g.node_count() {
            assert!(g.neighbors(v).iter().all(|&w| w < g.node_count()));
        }
    }
});
