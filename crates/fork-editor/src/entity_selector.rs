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


//! The editor-side selector: entity selection, clipboard, picking, and gizmo input.

use fork_core::math::{Ray, Vec2};
use fork_core::{Camera, ContractViolation, PrimitiveRenderer};
use fork_selector::{
    DrawFlags, MouseButton, MouseEventHandler, OrientationAlignment, PivotAlignment, RasterMode,
    Selector, SelectorModel, SelectorSettings, TransformMode, RASTER_PRESETS,
};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId, EntityStore};
use crate::error::EditorError;
use crate::picker::{BoundingSpherePicker, RayPicker};

/// Keyboard modifiers held while clicking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Adds to the selection.
    pub shift: bool,
    /// Toggles membership in the selection.
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
    };
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
    };

    /// Returns `true` if no modifier is held.
    pub fn is_empty(&self) -> bool {
        !self.shift && !self.ctrl
    }
}

/// User-facing gizmo drawing options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntitySelectorConfig {
    pub draw_selected_axes_only: bool,
    pub draw_prev_transform: bool,
    pub draw_axes_labels: bool,
}

impl EntitySelectorConfig {
    /// The selector draw flags these options map onto.
    pub fn draw_flags(&self) -> DrawFlags {
        let mut flags = DrawFlags::NONE;
        if self.draw_selected_axes_only {
            flags |= DrawFlags::SELECTED_AXES_ONLY;
        }
        if self.draw_prev_transform {
            flags |= DrawFlags::PREV_TRANSFORM;
        }
        if self.draw_axes_labels {
            flags |= DrawFlags::AXES_LABELS;
        }
        flags
    }
}

/// Selects editor entities and manipulates them through a transform gizmo.
///
/// The selector never owns entities. Operations that read or move them take the
/// [`EntityStore`] explicitly, and every operation that destroys entities goes through
/// [`destroy_entity`](Self::destroy_entity) so the selection never holds a dead handle.
#[derive(Debug)]
pub struct EntitySelector {
    selector: Selector<EntityId>,
    mouse: MouseEventHandler,
    clipboard: Vec<Entity>,
    camera: Option<Camera>,
}

impl EntitySelector {
    /// Creates a selector drawing through `renderer` with default settings.
    pub fn new(renderer: impl PrimitiveRenderer + 'static) -> Result<Self, EditorError> {
        Self::with_settings(renderer, SelectorSettings::default())
    }

    pub fn with_settings(
        renderer: impl PrimitiveRenderer + 'static,
        settings: SelectorSettings,
    ) -> Result<Self, EditorError> {
        let selector = Selector::builder()
            .with_renderer(renderer)
            .with_model(SelectorModel::new(settings))
            .build()?;
        Ok(Self {
            selector,
            mouse: MouseEventHandler::new(),
            clipboard: Vec::new(),
            camera: None,
        })
    }

    /// The wrapped gizmo.
    pub fn selector(&self) -> &Selector<EntityId> {
        &self.selector
    }

    pub fn selector_mut(&mut self) -> &mut Selector<EntityId> {
        &mut self.selector
    }

    // --- Modes ---

    pub fn setup_transform_mode(&mut self, mode: TransformMode) {
        self.selector.model_mut().setup_transform_mode(mode);
    }

    pub fn setup_orientation_alignment(&mut self, orientation: OrientationAlignment) {
        self.selector.model_mut().setup_orientation_alignment(orientation);
    }

    pub fn setup_pivot_alignment(&mut self, pivot: PivotAlignment) {
        self.selector.model_mut().setup_pivot_alignment(pivot);
    }

    pub fn setup_raster(&mut self, mode: RasterMode) {
        self.selector.model_mut().raster.mode = mode;
    }

    /// Cycles None, Relative, Absolute. Returns the new mode.
    pub fn switch_raster(&mut self) -> RasterMode {
        let raster = &mut self.selector.model_mut().raster;
        raster.mode = raster.mode.next();
        log::info!("Raster mode: {:?}", raster.mode);
        raster.mode
    }

    /// Applies one of the [`RASTER_PRESETS`].
    pub fn setup_raster_size(&mut self, preset_index: usize) -> Result<(), ContractViolation> {
        if self.selector.model_mut().raster.apply_preset(preset_index) {
            Ok(())
        } else {
            Err(ContractViolation::InvalidArgument {
                name: "preset_index",
                reason: format!(
                    "{preset_index} is out of range, {} presets exist",
                    RASTER_PRESETS.len()
                ),
            })
        }
    }

    // --- Selection ---

    /// Adds `id` to or removes it from the selection.
    pub fn select_entity(
        &mut self,
        store: &mut EntityStore,
        id: EntityId,
        select: bool,
    ) -> Result<(), EditorError> {
        let entity = store.get_mut(id).ok_or(EditorError::UnknownEntity(id))?;
        entity.set_selected(select);
        let model = self.selector.model_mut();
        if select {
            model.add_node(id);
        } else {
            model.remove_node(id);
        }
        self.refresh_gizmo(store)
    }

    /// Click selection: shift adds, ctrl toggles, otherwise the selection is replaced.
    /// `None` clears the selection.
    pub fn select_with_modifier(
        &mut self,
        store: &mut EntityStore,
        id: Option<EntityId>,
        modifiers: Modifiers,
    ) -> Result<(), EditorError> {
        let Some(id) = id else {
            return self.deselect_all(store);
        };
        if modifiers.ctrl {
            let selected = self.selector.model().has_node(id);
            self.select_entity(store, id, !selected)
        } else if modifiers.shift {
            self.select_entity(store, id, true)
        } else {
            self.deselect_all(store)?;
            self.select_entity(store, id, true)
        }
    }

    /// Selects every live entity.
    pub fn select_all(&mut self, store: &mut EntityStore) -> Result<(), EditorError> {
        for id in store.ids() {
            if let Some(entity) = store.get_mut(id) {
                entity.set_selected(true);
            }
            self.selector.model_mut().add_node(id);
        }
        self.refresh_gizmo(store)
    }

    /// Clears the selection.
    pub fn deselect_all(&mut self, store: &mut EntityStore) -> Result<(), EditorError> {
        for &id in self.selector.model().selected_nodes() {
            if let Some(entity) = store.get_mut(id) {
                entity.set_selected(false);
            }
        }
        self.selector.model_mut().remove_all_nodes();
        Ok(())
    }

    /// Selected entities, oldest first.
    pub fn selected_entities(&self) -> &[EntityId] {
        self.selector.model().selected_nodes()
    }

    /// The most recently selected entity.
    pub fn active_entity(&self) -> Option<EntityId> {
        self.selector.model().active_node()
    }

    /// The gizmo is shown while anything is selected.
    pub fn is_visible(&self) -> bool {
        self.selector.model().any_nodes_selected()
    }

    // --- Clipboard ---

    /// Snapshots the selected entities. Returns how many were copied.
    pub fn copy(&mut self, store: &EntityStore) -> usize {
        self.clipboard = self
            .selected_entities()
            .iter()
            .filter_map(|&id| store.get(id).cloned())
            .collect();
        log::debug!("Copied {} entities", self.clipboard.len());
        self.clipboard.len()
    }

    /// Copies, then deletes the selection.
    pub fn cut(&mut self, store: &mut EntityStore) -> Result<usize, EditorError> {
        let copied = self.copy(store);
        self.delete_selected(store)?;
        Ok(copied)
    }

    /// Re-creates the clipboard entities under fresh handles and selects them.
    pub fn paste(&mut self, store: &mut EntityStore) -> Result<Vec<EntityId>, EditorError> {
        if self.clipboard.is_empty() {
            return Ok(Vec::new());
        }
        self.deselect_all(store)?;
        let pasted: Vec<EntityId> = self
            .clipboard
            .iter()
            .map(|entity| store.spawn(entity.clone()))
            .collect();
        for &id in &pasted {
            self.select_entity(store, id, true)?;
        }
        log::debug!("Pasted {} entities", pasted.len());
        Ok(pasted)
    }

    /// Entities held by the clipboard.
    pub fn clipboard(&self) -> &[Entity] {
        &self.clipboard
    }

    /// Destroys every selected entity. Returns how many were destroyed.
    pub fn delete_selected(&mut self, store: &mut EntityStore) -> Result<usize, EditorError> {
        let selected = self.selected_entities().to_vec();
        let mut deleted = 0;
        for id in selected {
            if self.destroy_entity(store, id)?.is_some() {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    /// Removes `id` from the selection, then from the store.
    pub fn destroy_entity(
        &mut self,
        store: &mut EntityStore,
        id: EntityId,
    ) -> Result<Option<Entity>, EditorError> {
        self.selector.model_mut().remove_node(id);
        let removed = store.despawn(id);
        store.refresh_hierarchy();
        self.refresh_gizmo(store)?;
        Ok(removed)
    }

    // --- View and picking ---

    /// Stores the camera and lays the gizmo out for it.
    pub fn setup_view(&mut self, camera: &Camera, store: &EntityStore) -> Result<(), EditorError> {
        self.camera = Some(*camera);
        self.selector.setup_view(camera, store)?;
        Ok(())
    }

    /// Draws the gizmo if anything is selected.
    pub fn draw(&mut self, config: &EntitySelectorConfig) -> Result<(), EditorError> {
        if self.is_visible() {
            self.selector.draw(config.draw_flags())?;
        }
        Ok(())
    }

    /// The world-space ray under `pointer`, once a view has been set up.
    pub fn pick_ray(&self, pointer: Vec2) -> Option<Ray> {
        self.camera.as_ref().and_then(|camera| camera.view_ray(pointer))
    }

    /// Selects the entity under `pointer` using bounding spheres.
    ///
    /// A miss without modifiers clears the selection.
    pub fn pick_at(
        &mut self,
        store: &mut EntityStore,
        pointer: Vec2,
        modifiers: Modifiers,
    ) -> Result<Option<EntityId>, EditorError> {
        let hit = self
            .pick_ray(pointer)
            .and_then(|ray| BoundingSpherePicker::new(store).pick(&ray));
        self.apply_pick(store, hit, modifiers)?;
        Ok(hit)
    }

    /// Applies the result of a custom [`RayPicker`].
    pub fn apply_pick(
        &mut self,
        store: &mut EntityStore,
        hit: Option<EntityId>,
        modifiers: Modifiers,
    ) -> Result<(), EditorError> {
        match hit {
            Some(id) => self.select_with_modifier(store, Some(id), modifiers),
            None if modifiers.is_empty() => self.deselect_all(store),
            None => Ok(()),
        }
    }

    // --- Input ---

    pub fn on_button_down(
        &mut self,
        store: &mut EntityStore,
        button: MouseButton,
    ) -> Result<bool, EditorError> {
        let consumed = self.mouse.on_button_down(&mut self.selector, store, button)?;
        store.refresh_hierarchy();
        Ok(consumed)
    }

    pub fn on_button_up(
        &mut self,
        store: &mut EntityStore,
        button: MouseButton,
    ) -> Result<bool, EditorError> {
        let consumed = self.mouse.on_button_up(&mut self.selector, store, button)?;
        store.refresh_hierarchy();
        Ok(consumed)
    }

    pub fn on_local_motion(
        &mut self,
        store: &mut EntityStore,
        position: Vec2,
    ) -> Result<bool, EditorError> {
        let consumed = self.mouse.on_local_motion(&mut self.selector, store, position)?;
        store.refresh_hierarchy();
        Ok(consumed)
    }

    pub fn on_global_motion(
        &mut self,
        store: &mut EntityStore,
        motion: Vec2,
    ) -> Result<bool, EditorError> {
        let consumed = self.mouse.on_global_motion(&mut self.selector, store, motion)?;
        store.refresh_hierarchy();
        Ok(consumed)
    }

    pub fn on_lost_focus(&mut self, store: &mut EntityStore) -> Result<(), EditorError> {
        self.mouse.on_lost_focus(&mut self.selector, store)?;
        store.refresh_hierarchy();
        Ok(())
    }

    fn refresh_gizmo(&mut self, store: &EntityStore) -> Result<(), EditorError> {
        match self.camera {
            Some(camera) => self.selector.setup_view(&camera, store)?,
            None => self.selector.model_mut().update_transform(store)?,
        }
        Ok(())
    }
}
