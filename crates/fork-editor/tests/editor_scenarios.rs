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


use fork_core::math::{Vec2, Vec3, FRAC_PI_2};
use fork_core::{Camera, Projection, RecordingRenderer, Transform, Viewport};
use fork_editor::{Entity, EntityId, EntitySelector, EntityStore, Modifiers};
use fork_selector::{MouseButton, Selectable};

fn assert_vec3_approx_eq(actual: Vec3, expected: Vec3) {
    assert!(
        (actual - expected).length() < 1e-3,
        "expected {expected:?}, got {actual:?}"
    );
}

fn front_camera() -> Camera {
    Camera::new(
        Transform::from_position(Vec3::new(0.0, 0.0, 10.0)),
        Projection::perspective(FRAC_PI_2, 0.1, 100.0, Viewport::default()),
    )
}

/// A parent scaled by two at the origin with a child sitting on it.
fn scaled_family() -> (EntitySelector, EntityStore, EntityId, EntityId) {
    let mut store = EntityStore::new();
    let parent = store.spawn(Entity::new(
        "parent",
        Transform::new(Vec3::ZERO, Default::default(), Vec3::splat(2.0)),
    ));
    let child = store.spawn(Entity::new("child", Transform::IDENTITY).with_parent(parent));
    let mut editor = EntitySelector::new(RecordingRenderer::new()).unwrap();
    editor.setup_view(&front_camera(), &store).unwrap();
    (editor, store, parent, child)
}

/// Hovers the X handle, drags it 40px right, and releases.
fn drag_x(editor: &mut EntitySelector, store: &mut EntityStore) {
    editor.setup_view(&front_camera(), store).unwrap();
    assert!(editor
        .on_local_motion(store, Vec2::new(500.0, 300.0))
        .unwrap());
    assert!(editor.on_button_down(store, MouseButton::Left).unwrap());
    editor.on_global_motion(store, Vec2::new(40.0, 0.0)).unwrap();
    assert!(editor.on_button_up(store, MouseButton::Left).unwrap());
}

#[test]
fn child_drag_is_converted_into_parent_space() {
    // ARRANGE
    let (mut editor, mut store, _parent, child) = scaled_family();
    editor
        .select_with_modifier(&mut store, Some(child), Modifiers::NONE)
        .unwrap();

    // ACT
    drag_x(&mut editor, &mut store);

    // ASSERT
    let child = store.get(child).unwrap();
    assert_vec3_approx_eq(child.transform.position, Vec3::new(0.5, 0.0, 0.0));
    assert_vec3_approx_eq(
        child.global_transform().translation(),
        Vec3::new(1.0, 0.0, 0.0),
    );
}

#[test]
fn dragging_a_parent_carries_its_children() {
    // ARRANGE
    let (mut editor, mut store, parent, child) = scaled_family();
    editor.select_entity(&mut store, parent, true).unwrap();

    // ACT
    drag_x(&mut editor, &mut store);

    // ASSERT
    assert_vec3_approx_eq(
        store.get(parent).unwrap().transform.position,
        Vec3::new(1.0, 0.0, 0.0),
    );
    let child = store.get(child).unwrap();
    assert_vec3_approx_eq(child.transform.position, Vec3::ZERO);
    assert_vec3_approx_eq(
        child.global_transform().translation(),
        Vec3::new(1.0, 0.0, 0.0),
    );
    assert!(child.revision() == 0);
}

#[test]
fn right_click_cancels_a_running_drag() {
    // ARRANGE
    let (mut editor, mut store, parent, _child) = scaled_family();
    editor.select_entity(&mut store, parent, true).unwrap();
    editor
        .on_local_motion(&mut store, Vec2::new(500.0, 300.0))
        .unwrap();
    editor
        .on_button_down(&mut store, MouseButton::Left)
        .unwrap();
    editor
        .on_global_motion(&mut store, Vec2::new(80.0, 0.0))
        .unwrap();
    assert!(store.get(parent).unwrap().transform.position.x > 1.0);

    // ACT
    let consumed = editor
        .on_button_down(&mut store, MouseButton::Right)
        .unwrap();

    // ASSERT
    assert!(consumed);
    assert!(!editor.selector().model().is_active());
    assert_vec3_approx_eq(store.get(parent).unwrap().transform.position, Vec3::ZERO);
}

#[test]
fn destroying_a_selected_parent_keeps_the_child_selected_in_place() {
    // ARRANGE
    let (mut editor, mut store, parent, child) = scaled_family();
    store.get_mut(child).unwrap().transform.position = Vec3::new(1.0, 0.0, 0.0);
    store.refresh_hierarchy();
    editor.select_all(&mut store).unwrap();

    // ACT
    let removed = editor.destroy_entity(&mut store, parent).unwrap();

    // ASSERT
    assert!(removed.is_some());
    assert_eq!(editor.selected_entities(), &[child]);
    assert_vec3_approx_eq(
        store.get(child).unwrap().transform.position,
        Vec3::new(2.0, 0.0, 0.0),
    );
    assert_vec3_approx_eq(
        editor.selector().model().transform().position,
        Vec3::new(2.0, 0.0, 0.0),
    );
}
