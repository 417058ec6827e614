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


use fork_core::math::{Aabb, Quaternion, Vec2, Vec3, FRAC_PI_2};
use fork_core::{Camera, ContractViolation, Projection, RecordingRenderer, Transform, Viewport};
use fork_scene::{NodeId, NodeKind, SceneGraph};
use fork_selector::{
    MouseButton, MouseEventHandler, SelectionHost, SelectionState, Selector, SelectorError,
};

fn assert_vec3_approx_eq(actual: Vec3, expected: Vec3) {
    assert!(
        (actual - expected).length() < 1e-3,
        "expected {expected:?}, got {actual:?}"
    );
}

/// A parent at (4,0,0) scaled by 2 with a box child at its origin.
fn offset_family() -> (SceneGraph, NodeId, NodeId) {
    let mut graph = SceneGraph::new();
    let parent = graph.create_named(
        NodeKind::Dynamic(Transform::new(
            Vec3::new(4.0, 0.0, 0.0),
            Quaternion::IDENTITY,
            Vec3::splat(2.0),
        )),
        "parent",
    );
    let child = graph.create_named(
        NodeKind::Geometry {
            transform: Transform::IDENTITY,
            bounds: Aabb::from_min_max(Vec3::splat(-0.5), Vec3::splat(0.5)),
        },
        "box",
    );
    graph.add_child(parent, child);
    (graph, parent, child)
}

/// A selector holding `key`, seen from 10 units in front of (4,0,0).
fn selector_on(graph: &SceneGraph, key: NodeId) -> Selector<NodeId> {
    let mut selector = Selector::builder()
        .with_renderer(RecordingRenderer::new())
        .build()
        .unwrap();
    selector.model_mut().add_node(key);
    let camera = Camera::new(
        Transform::from_position(Vec3::new(4.0, 0.0, 10.0)),
        Projection::perspective(FRAC_PI_2, 0.1, 100.0, Viewport::default()),
    );
    selector.setup_view(&camera, graph).unwrap();
    selector
}

/// Grabs the X axis and drags it 80 px to the right, which is 2 world units.
fn drag_x(selector: &mut Selector<NodeId>, graph: &mut SceneGraph) {
    let mut mouse = MouseEventHandler::new();
    mouse
        .on_local_motion(selector, graph, Vec2::new(500.0, 300.0))
        .unwrap();
    assert_eq!(selector.model().selection_state(), SelectionState::XAxis);
    mouse
        .on_button_down(selector, graph, MouseButton::Left)
        .unwrap();
    mouse
        .on_global_motion(selector, graph, Vec2::new(80.0, 0.0))
        .unwrap();
    mouse
        .on_button_up(selector, graph, MouseButton::Left)
        .unwrap();
}

#[test]
fn dragging_a_child_moves_it_in_parent_space() {
    // --- 1. ARRANGE ---
    let (mut graph, parent, child) = offset_family();
    let mut selector = selector_on(&graph, child);
    assert_vec3_approx_eq(selector.model().transform().position, Vec3::new(4.0, 0.0, 0.0));

    // --- 2. ACT ---
    drag_x(&mut selector, &mut graph);

    // --- 3. ASSERT ---
    // Two world units are one unit in the parent's doubled space.
    let local = graph.get(child).unwrap().kind.transform().unwrap().position;
    assert_vec3_approx_eq(local, Vec3::new(1.0, 0.0, 0.0));
    assert_vec3_approx_eq(graph.global_transform(child).translation(), Vec3::new(6.0, 0.0, 0.0));
    assert_vec3_approx_eq(graph.global_transform(parent).translation(), Vec3::new(4.0, 0.0, 0.0));
    assert_vec3_approx_eq(selector.model().transform().position, Vec3::new(6.0, 0.0, 0.0));
}

#[test]
fn dragging_a_parent_carries_its_child() {
    // --- 1. ARRANGE ---
    let (mut graph, parent, child) = offset_family();
    let mut selector = selector_on(&graph, parent);

    // --- 2. ACT ---
    drag_x(&mut selector, &mut graph);
    graph.refresh_world_cache();

    // --- 3. ASSERT ---
    let carried = graph.selectable(child).unwrap();
    assert_vec3_approx_eq(carried.global_transform().translation(), Vec3::new(6.0, 0.0, 0.0));
    assert_vec3_approx_eq(carried.local_transform().position, Vec3::ZERO);
    let bounds = carried.bounding_box().unwrap();
    assert_vec3_approx_eq(bounds.min, Vec3::new(5.0, -1.0, -1.0));
}

#[test]
fn destroyed_node_surfaces_as_dangling_selection() {
    // --- 1. ARRANGE ---
    let (mut graph, parent, child) = offset_family();
    let mut selector = selector_on(&graph, child);

    // --- 2. ACT ---
    graph.destroy(parent);
    let result = selector.translate_selected_nodes(Vec3::X, &mut graph);

    // --- 3. ASSERT ---
    assert!(matches!(
        result,
        Err(SelectorError::Contract(ContractViolation::DanglingSelection(_)))
    ));
}
