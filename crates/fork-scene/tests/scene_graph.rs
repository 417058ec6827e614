// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use fork_core::math::{Mat4, Quaternion, Vec3};
use fork_core::Transform;
use fork_scene::{NodeId, NodeKind, SceneGraph, SortMethod};
use proptest::prelude::*;

fn assert_matrix_approx_eq(a: Mat4, b: Mat4) {
    for i in 0..4 {
        for j in 0..4 {
            assert!(
                (a.cols[i][j] - b.cols[i][j]).abs() < 1e-4,
                "Matrix mismatch at col {}, row {}: {} != {}",
                i,
                j,
                a.cols[i][j],
                b.cols[i][j]
            );
        }
    }
}

/// Checks that parent links and child lists describe the same tree.
fn assert_tree_consistent(graph: &SceneGraph, nodes: &[NodeId]) {
    for &node in nodes {
        let listed_under: Vec<NodeId> = nodes
            .iter()
            .copied()
            .filter(|&p| graph.children(p).contains(&node))
            .collect();
        assert!(listed_under.len() <= 1, "{node} listed under {listed_under:?}");
        assert_eq!(graph.parent(node), listed_under.first().copied());

        let children = graph.children(node);
        for (i, c) in children.iter().enumerate() {
            assert!(!children[i + 1..].contains(c), "{c} listed twice under {node}");
        }
    }
}

const NODE_COUNT: usize = 12;

#[derive(Debug, Clone)]
enum Edit {
    Attach(usize, usize),
    Detach(usize, usize),
    Release(usize),
    Destroy(usize),
}

fn edit() -> impl Strategy<Value = Edit> {
    let node = 0..NODE_COUNT;
    prop_oneof![
        4 => (node.clone(), node.clone()).prop_map(|(p, c)| Edit::Attach(p, c)),
        2 => (node.clone(), node.clone()).prop_map(|(p, c)| Edit::Detach(p, c)),
        1 => node.clone().prop_map(Edit::Release),
        1 => node.prop_map(Edit::Destroy),
    ]
}

proptest! {
    #[test]
    fn tree_invariant_holds_for_random_edit_sequences(
        edits in prop::collection::vec(edit(), 1..200)
    ) {
        let mut graph = SceneGraph::new();
        let nodes: Vec<NodeId> = (0..NODE_COUNT).map(|_| graph.create(NodeKind::Empty)).collect();

        for edit in edits {
            match edit {
                Edit::Attach(p, c) => graph.add_child(nodes[p], nodes[c]),
                Edit::Detach(p, c) => {
                    graph.remove_child(nodes[p], nodes[c]);
                }
                Edit::Release(p) => {
                    graph.release_children(nodes[p]);
                }
                Edit::Destroy(n) => {
                    graph.destroy(nodes[n]);
                }
            }
            assert_tree_consistent(&graph, &nodes);

            // Every parent chain ends at a root.
            for &node in &nodes {
                let mut current = graph.parent(node);
                let mut steps = 0;
                while let Some(ancestor) = current {
                    steps += 1;
                    prop_assert!(steps <= NODE_COUNT, "cycle through {node}");
                    current = graph.parent(ancestor);
                }
            }
        }
        let alive = nodes.iter().filter(|&&n| graph.is_alive(n)).count();
        prop_assert_eq!(graph.len(), alive);
    }
}

#[test]
fn scenario_child_of_child_global_position() {
    // --- 1. ARRANGE ---
    let mut graph = SceneGraph::new();
    let r = graph.create_named(NodeKind::Empty, "R");
    let a = graph.create_named(
        NodeKind::Dynamic(Transform::from_position(Vec3::new(1.0, 0.0, 0.0))),
        "A",
    );
    let b = graph.create_named(
        NodeKind::Dynamic(Transform::from_position(Vec3::new(0.0, 2.0, 0.0))),
        "B",
    );

    // --- 2. ACT ---
    graph.add_child(r, a);
    graph.add_child(a, b);

    // --- 3. ASSERT ---
    let p = graph.global_transform(b).translation();
    assert!((p - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5);
}

#[test]
fn global_transform_is_product_of_chain() {
    let mut graph = SceneGraph::new();
    let locals = [
        Transform::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quaternion::from_axis_angle(Vec3::Z, 0.3),
            Vec3::ONE,
        ),
        Transform::new(
            Vec3::new(-4.0, 0.0, 1.0),
            Quaternion::from_axis_angle(Vec3::X, 1.2),
            Vec3::new(2.0, 2.0, 2.0),
        ),
        Transform::new(
            Vec3::new(0.5, 0.5, 0.5),
            Quaternion::IDENTITY,
            Vec3::new(1.0, 3.0, 1.0),
        ),
        Transform::new(
            Vec3::new(0.0, -1.0, 0.0),
            Quaternion::from_axis_angle(Vec3::new(1.0, 1.0, 1.0), -0.7),
            Vec3::ONE,
        ),
    ];
    let ids: Vec<NodeId> = locals
        .iter()
        .map(|t| graph.create(NodeKind::Dynamic(*t)))
        .collect();
    for pair in ids.windows(2) {
        graph.add_child(pair[0], pair[1]);
    }

    let expected = locals[0].matrix() * locals[1].matrix() * locals[2].matrix() * locals[3].matrix();
    assert_matrix_approx_eq(graph.global_transform(ids[3]), expected);
}

#[test]
fn sort_children_reorders_in_place() {
    let mut graph = SceneGraph::new();
    let root = graph.create(NodeKind::Empty);
    let far = graph.create(NodeKind::Dynamic(Transform::from_position(Vec3::new(0.0, 0.0, -20.0))));
    let near = graph.create(NodeKind::Dynamic(Transform::from_position(Vec3::new(0.0, 0.0, -2.0))));
    graph.add_child(root, far);
    graph.add_child(root, near);

    graph.sort_children(root, &Transform::IDENTITY, SortMethod::NearToFar, true);

    assert_eq!(graph.children(root), &[near, far]);
    assert_eq!(graph.parent(near), Some(root));
}
