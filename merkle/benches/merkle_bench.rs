use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gatepass_merkle::MerkleTree;
use gatepass_types::TreeHash;

fn full_tree() -> MerkleTree {
    let leaves: Vec<TreeHash> = (0..=255u8).map(|b| TreeHash::new([b; 32])).collect();
    MerkleTree::from_leaves(&leaves).unwrap()
}

fn build_full_tree_bench(c: &mut Criterion) {
    let leaves: Vec<TreeHash> = (0..=255u8).map(|b| TreeHash::new([b; 32])).collect();

    c.bench_function("merkle_from_256_leaves", |b| {
        b.iter(|| MerkleTree::from_leaves(black_box(&leaves)).unwrap())
    });
}

fn set_leaf_bench(c: &mut Criterion) {
    let mut tree = full_tree();
    let value = TreeHash::new([0xEE; 32]);

    c.bench_function("merkle_set_leaf", |b| {
        b.iter(|| tree.set_leaf(black_box(128), value).unwrap())
    });
}

fn witness_verify_bench(c: &mut Criterion) {
    let tree = full_tree();
    let witness = tree.witness(77).unwrap();
    let root = tree.root();
    let leaf = tree.leaf(77).unwrap();

    c.bench_function("merkle_witness_verify", |b| {
        b.iter(|| witness.verify(black_box(&root), black_box(&leaf)))
    });
}

criterion_group!(benches, build_full_tree_bench, set_leaf_bench, witness_verify_bench);
criterion_main!(benches);
