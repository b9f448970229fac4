//! Property tests for the shortest-path engine.
//!
//! Brandes' accumulation is checked against a brute-force all-pairs count,
//! the bipartite distance correction against the clique expansion, and the
//! parallel reduction against itself across worker counts.

use std::collections::{BTreeSet, VecDeque};

use proptest::prelude::*;

use hypercent_core::graph::GraphBuilder;
use hypercent_core::{ExternalId, Graph, NodeIndex};
use hypercent_metrics::betweenness::betweenness_centrality;
use hypercent_metrics::distance::distance_centrality;
use hypercent_metrics::exec::ExecutionConfig;

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn arb_edges() -> impl Strategy<Value = Vec<(ExternalId, ExternalId)>> {
    proptest::collection::vec((0_i64..9, 0_i64..9), 0..20)
}

/// Hyperedges with duplicate members and the occasional empty line.
fn arb_hyperedges() -> impl Strategy<Value = Vec<Vec<ExternalId>>> {
    proptest::collection::vec(proptest::collection::vec(0_i64..9, 0..5), 0..8)
}

/// Hyperedges with at least two distinct members each.
fn arb_proper_hyperedges() -> impl Strategy<Value = Vec<BTreeSet<ExternalId>>> {
    proptest::collection::vec(proptest::collection::btree_set(0_i64..10, 2..5), 1..8)
}

/// Random labelled tree: node `i` hangs off a node in `0..i`.
#[allow(clippy::cast_possible_wrap)]
fn arb_tree() -> impl Strategy<Value = Vec<(ExternalId, ExternalId)>> {
    (2_usize..14).prop_flat_map(|n| {
        let parents: Vec<_> = (1..n).map(|i| 0..i).collect();
        parents.prop_map(|ps| {
            ps.into_iter()
                .enumerate()
                .map(|(i, p)| (p as ExternalId, (i + 1) as ExternalId))
                .collect()
        })
    })
}

// ---------------------------------------------------------------------------
// Reference implementations
// ---------------------------------------------------------------------------

fn plain(edges: &[(ExternalId, ExternalId)]) -> Graph {
    let mut b = GraphBuilder::plain();
    for &(u, v) in edges {
        b.edge(u, v);
    }
    b.finish()
}

fn hyper(edges: &[Vec<ExternalId>]) -> Graph {
    let mut b = GraphBuilder::hypergraph(1_000);
    for members in edges {
        b.hyperedge(members).expect("hyperedge id");
    }
    b.finish()
}

/// Distances and shortest-path counts from `s`, counting parallel edges.
fn bfs_counts(g: &Graph, s: NodeIndex) -> (Vec<Option<usize>>, Vec<f64>) {
    let n = g.node_count();
    let mut dist = vec![None; n];
    let mut sigma = vec![0.0; n];
    dist[s] = Some(0);
    sigma[s] = 1.0;
    let mut queue = VecDeque::from([s]);
    while let Some(v) = queue.pop_front() {
        let dv = dist[v].expect("queued nodes have a distance");
        for &w in g.neighbors(v) {
            if dist[w].is_none() {
                dist[w] = Some(dv + 1);
                queue.push_back(w);
            }
            if dist[w] == Some(dv + 1) {
                sigma[w] += sigma[v];
            }
        }
    }
    (dist, sigma)
}

/// Sum over unordered real pairs {s, t} of sigma_st(v) / sigma_st.
fn brute_force_betweenness(g: &Graph) -> Vec<f64> {
    let n = g.node_count();
    let real: Vec<_> = g.real_nodes().collect();
    let runs: Vec<_> = (0..n).map(|s| bfs_counts(g, s)).collect();
    let mut bc = vec![0.0; n];

    for (i, &s) in real.iter().enumerate() {
        for &t in &real[i + 1..] {
            let (ds, ss) = &runs[s];
            let (dt, st) = &runs[t];
            let Some(d_st) = ds[t] else { continue };
            for v in 0..n {
                if v == s || v == t {
                    continue;
                }
                if let (Some(a), Some(b)) = (ds[v], dt[v]) {
                    if a + b == d_st {
                        bc[v] += ss[v] * st[v] / ss[t];
                    }
                }
            }
        }
    }
    bc
}

/// Pairs whose tree path passes through each node.
#[allow(clippy::cast_precision_loss)]
fn tree_pair_counts(g: &Graph) -> Vec<f64> {
    let n = g.node_count();
    (0..n)
        .map(|v| {
            let mut seen = vec![false; n];
            seen[v] = true;
            let mut sizes = Vec::new();
            for &start in g.neighbors(v) {
                if seen[start] {
                    continue;
                }
                seen[start] = true;
                let mut size = 0_usize;
                let mut stack = vec![start];
                while let Some(u) = stack.pop() {
                    size += 1;
                    for &w in g.neighbors(u) {
                        if !seen[w] {
                            seen[w] = true;
                            stack.push(w);
                        }
                    }
                }
                sizes.push(size);
            }
            let total: usize = sizes.iter().sum();
            let squares: usize = sizes.iter().map(|c| c * c).sum();
            ((total * total - squares) / 2) as f64
        })
        .collect()
}

fn assert_vectors_close(a: &[f64], b: &[f64]) -> Result<(), TestCaseError> {
    prop_assert_eq!(a.len(), b.len());
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        prop_assert!((x - y).abs() < 1e-9, "index {}: {} vs {}", i, x, y);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn tree_betweenness_counts_pairs(edges in arb_tree()) {
        let g = plain(&edges);
        let bc = betweenness_centrality(&g, &ExecutionConfig::sequential());
        assert_vectors_close(&bc, &tree_pair_counts(&g))?;
    }

    #[test]
    fn brandes_matches_brute_force_on_graphs(edges in arb_edges()) {
        let g = plain(&edges);
        let bc = betweenness_centrality(&g, &ExecutionConfig::sequential());
        assert_vectors_close(&bc, &brute_force_betweenness(&g))?;
    }

    #[test]
    fn brandes_matches_brute_force_on_hypergraphs(edges in arb_hyperedges()) {
        let g = hyper(&edges);
        let bc = betweenness_centrality(&g, &ExecutionConfig::sequential());
        assert_vectors_close(&bc, &brute_force_betweenness(&g))?;
    }

    #[test]
    fn hypergraph_distances_match_clique_expansion(edges in arb_proper_hyperedges()) {
        let members: Vec<Vec<ExternalId>> =
            edges.iter().map(|e| e.iter().copied().collect()).collect();
        let h = hyper(&members);

        let mut clique = Vec::new();
        for e in &members {
            for (i, &u) in e.iter().enumerate() {
                for &v in &e[i + 1..] {
                    clique.push((u, v));
                }
            }
        }
        let g = plain(&clique);

        let exec = ExecutionConfig::sequential();
        let dh = distance_centrality(&h, &exec);
        let dg = distance_centrality(&g, &exec);
        prop_assert_eq!(h.real_node_count(), g.node_count());

        for v in g.real_nodes() {
            let id = g.external_id(v);
            let hv = h.mapper().index_of(id).expect("same members");
            prop_assert!((dh.farness[hv] - dg.farness[v]).abs() < 1e-9);
            prop_assert!((dh.closeness[hv] - dg.closeness[v]).abs() < 1e-9);
            prop_assert!((dh.harmonic[hv] - dg.harmonic[v]).abs() < 1e-9);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn results_do_not_depend_on_worker_count(
        edges in proptest::collection::vec((0_i64..40, 0_i64..40), 10..120),
        chunk_size in 1_usize..9,
    ) {
        let g = plain(&edges);
        let run = |threads: usize| {
            let exec = ExecutionConfig::default()
                .with_threads(threads)
                .with_chunk_size(chunk_size);
            exec.install(|| {
                (
                    betweenness_centrality(&g, &exec),
                    distance_centrality(&g, &exec),
                )
            })
            .expect("pool")
        };

        let (bc1, dc1) = run(1);
        let (bc3, dc3) = run(3);
        let (bc4, dc4) = run(4);
        prop_assert_eq!(&bc1, &bc3);
        prop_assert_eq!(&bc1, &bc4);
        prop_assert_eq!(&dc1, &dc3);
        prop_assert_eq!(&dc1, &dc4);

        let (again, _) = run(3);
        prop_assert_eq!(bc1, again);
    }
}
