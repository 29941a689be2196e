// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Size;
use understory_scene::RetainedScene;
use understory_tree_view::{TreeNode, TreeView, TreeViewConfig};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

/// Tree of `count` nodes where each node hangs under a random earlier one.
/// Depth maps to `y`, breadth is random.
fn gen_tree(count: usize, seed: u64) -> TreeNode {
    let mut rng = Rng::new(seed);
    let mut parent = vec![0usize; count];
    let mut depth = vec![0usize; count];
    for i in 1..count {
        parent[i] = rng.below(i);
        depth[i] = depth[parent[i]] + 1;
    }
    let mut kids = vec![Vec::new(); count];
    for i in 1..count {
        kids[parent[i]].push(i);
    }
    fn make(i: usize, kids: &[Vec<usize>], depth: &[usize], rng: &mut Rng) -> TreeNode {
        let x = (rng.next_f64() - 0.5) * 2000.0;
        let mut node = TreeNode::new(i as u64, 20.0, 40.0).at(x, depth[i] as f64 * 60.0);
        for &c in &kids[i] {
            node.push_child(make(c, kids, depth, rng));
        }
        node
    }
    make(0, &kids, depth.as_slice(), &mut rng)
}

/// Copy of `tree` with roughly `fraction` of the nodes shifted along the breadth axis.
fn jitter(tree: &TreeNode, fraction: f64, seed: u64) -> TreeNode {
    let mut out = tree.clone();
    let mut rng = Rng::new(seed);
    for id in 0..tree.node_count() as u64 {
        if rng.next_f64() < fraction
            && let Some(n) = out.find_mut(id)
        {
            n.geometry.x += 25.0;
        }
    }
    out
}

fn mounted(tree: &TreeNode) -> TreeView<RetainedScene> {
    let mut view = TreeView::new(
        RetainedScene::new(Size::new(1280.0, 720.0)),
        TreeViewConfig::default(),
    );
    view.mount(tree);
    view
}

fn bench_mount(c: &mut Criterion) {
    let mut group = c.benchmark_group("mount");
    for &n in &[256usize, 1024, 4096] {
        let tree = gen_tree(n, 0xCAFE_F00D_DEAD_BEEF);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("mount_n{}", n), |b| {
            b.iter_batched(
                || {
                    TreeView::new(
                        RetainedScene::new(Size::new(1280.0, 720.0)),
                        TreeViewConfig::default(),
                    )
                },
                |mut view| {
                    view.mount(&tree);
                    black_box(view.edge_count());
                    view
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_sync(c: &mut Criterion) {
    let mut group = c.benchmark_group("sync");
    for &n in &[256usize, 1024, 4096] {
        let tree = gen_tree(n, 0x1234_5678_9ABC_DEF0);
        let moved = jitter(&tree, 0.1, 7);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("noop_n{}", n), |b| {
            b.iter_batched(
                || mounted(&tree),
                |mut view| {
                    black_box(view.sync(&tree));
                    view
                },
                BatchSize::LargeInput,
            )
        });
        group.bench_function(format!("move_10pct_n{}", n), |b| {
            b.iter_batched(
                || mounted(&tree),
                |mut view| {
                    black_box(view.sync(&moved));
                    view
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    for &n in &[1024usize, 4096] {
        // Same identity space, different shape: every node may appear,
        // vanish, move or change parent.
        let before = gen_tree(n, 0xDEAD_BEEF);
        let after = gen_tree(n / 2, 0xFEED_FACE);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("reshape_n{}", n), |b| {
            b.iter_batched(
                || mounted(&before),
                |mut view| {
                    black_box(view.sync(&after));
                    view
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    let tree = gen_tree(1024, 0xABCD);
    let moved = jitter(&tree, 0.5, 11);
    group.bench_function("frame_during_transition_n1024", |b| {
        b.iter_batched(
            || {
                let mut view = mounted(&tree);
                let _ = view.sync(&moved);
                view
            },
            |mut view| {
                let damage = view.tick(std::time::Duration::from_millis(16));
                black_box(damage.dirty_rects.len());
                view
            },
            BatchSize::LargeInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_mount, bench_sync, bench_churn, bench_tick);
criterion_main!(benches);
