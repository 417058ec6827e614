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


//! The controller tying a [`SelectorModel`] and a [`SelectorView`] to a renderer.

use fork_core::math::{Quaternion, Vec2, Vec3, EPSILON};
use fork_core::{ContractViolation, PrimitiveRenderer, ProjectionKind, RenderError};

use crate::model::{AxisState, SelectionState, SelectorModel, TransformMode};
use crate::raster::RasterMode;
use crate::selectable::{
    dangling, transform_selectable, ParentSpace, Selectable, SelectionHost, SelectionKey,
    TransformFlags,
};
use crate::view::{DrawFlags, SelectorView};
use fork_core::Camera;

/// Errors surfaced by [`Selector`] operations.
#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    /// A caller broke an API contract, e.g. destroyed a selected object.
    #[error(transparent)]
    Contract(#[from] ContractViolation),
    /// The renderer failed while drawing the gizmo.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// A builder for [`Selector`] instances.
///
/// The renderer is required. Model and view fall back to their defaults.
pub struct SelectorBuilder<K: SelectionKey> {
    renderer: Option<Box<dyn PrimitiveRenderer>>,
    model: Option<SelectorModel<K>>,
    view: Option<SelectorView>,
}

impl<K: SelectionKey> SelectorBuilder<K> {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            renderer: None,
            model: None,
            view: None,
        }
    }

    /// Sets the surface the gizmo is drawn on.
    pub fn with_renderer(mut self, renderer: impl PrimitiveRenderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Injects a pre-configured model.
    pub fn with_model(mut self, model: SelectorModel<K>) -> Self {
        self.model = Some(model);
        self
    }

    /// Injects a pre-configured view.
    pub fn with_view(mut self, view: SelectorView) -> Self {
        self.view = Some(view);
        self
    }

    /// Builds the selector.
    ///
    /// # Errors
    /// Returns [`ContractViolation::MissingDependency`] if no renderer was supplied.
    pub fn build(self) -> Result<Selector<K>, ContractViolation> {
        let renderer = self
            .renderer
            .ok_or(ContractViolation::MissingDependency("renderer"))?;
        log::debug!("Selector created");
        Ok(Selector {
            renderer,
            model: self.model.unwrap_or_default(),
            view: self.view.unwrap_or_default(),
        })
    }
}

impl<K: SelectionKey> Default for SelectorBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// A 3D transform gizmo.
///
/// The selector turns pointer input into translations, rotations and scales of the
/// selected objects. Objects are addressed by key and resolved through the
/// [`SelectionHost`] passed to each operation.
pub struct Selector<K: SelectionKey> {
    renderer: Box<dyn PrimitiveRenderer>,
    model: SelectorModel<K>,
    view: SelectorView,
}

impl<K: SelectionKey> Selector<K> {
    /// Starts building a selector.
    pub fn builder() -> SelectorBuilder<K> {
        SelectorBuilder::new()
    }

    /// The selection state.
    pub fn model(&self) -> &SelectorModel<K> {
        &self.model
    }

    /// Mutable access to the selection state.
    pub fn model_mut(&mut self) -> &mut SelectorModel<K> {
        &mut self.model
    }

    /// The gizmo view.
    pub fn view(&self) -> &SelectorView {
        &self.view
    }

    /// Mutable access to the gizmo view.
    pub fn view_mut(&mut self) -> &mut SelectorView {
        &mut self.view
    }

    /// Updates the model for `camera`. Must precede pointer processing for that view.
    pub fn setup_view<H>(&mut self, camera: &Camera, host: &H) -> Result<(), SelectorError>
    where
        H: SelectionHost<K> + ?Sized,
    {
        self.model.setup_view(camera, host)?;
        Ok(())
    }

    /// Draws the gizmo, plus a ghost at the drag start with [`DrawFlags::PREV_TRANSFORM`].
    pub fn draw(&mut self, flags: DrawFlags) -> Result<(), SelectorError> {
        self.model.update_axis_visibility();
        self.view.draw(self.renderer.as_mut(), &self.model, flags)?;

        if self.model.is_active() && flags.contains(DrawFlags::PREV_TRANSFORM) {
            let ghost = self.model.axes_state().map(|axis| AxisState {
                active: axis.active,
                ..AxisState::default()
            });
            self.view.draw_at(
                self.renderer.as_mut(),
                &self.model,
                self.model.prev_transform(),
                &ghost,
                flags,
            )?;
        }
        Ok(())
    }

    /// Follows the pointer while a plane (or, with picking, an axis) is dragged.
    pub fn process_absolute_transform<H>(
        &mut self,
        pointer: Vec2,
        host: &mut H,
    ) -> Result<(), SelectorError>
    where
        H: SelectionHost<K> + ?Sized,
    {
        let model = &self.model;
        if !(model.is_enabled && model.is_active()) {
            return Ok(());
        }
        let picked = model.is_plane_selection()
            || (model.is_axis_selection() && model.is_picking_active());
        if picked && model.transform_mode() == TransformMode::Translate {
            let offset = model.pick_offset(pointer);
            self.translate_selected_nodes(offset, host)?;
        }
        Ok(())
    }

    /// Applies relative pointer motion to a dragged axis or the uniform handle.
    pub fn process_relative_transform<H>(
        &mut self,
        motion: Vec2,
        host: &mut H,
    ) -> Result<(), SelectorError>
    where
        H: SelectionHost<K> + ?Sized,
    {
        if !(self.model.is_enabled && self.model.is_active()) {
            return Ok(());
        }
        if self.model.selection_state() == SelectionState::Uniform {
            self.process_transform_uniform(motion, host)
        } else if self.model.is_axis_selection() && !self.model.is_picking_active() {
            self.process_transform_axis(motion, host)
        } else {
            Ok(())
        }
    }

    fn arrow_motion_speed_by_direction(&self, motion: Vec2) -> f32 {
        self.model.arrow_direction().dot(motion) * self.model.settings.motion_speed
    }

    fn arrow_motion_speed_by_inv_direction(&self, motion: Vec2) -> f32 {
        self.model.arrow_direction().flip_cw().dot(motion) * self.model.settings.motion_speed
    }

    /// Scales motion so that on-screen speed stays constant regardless of zoom.
    fn arrow_motion_speed_by_distance(&self) -> f32 {
        let distance = match self.model.camera() {
            Some(camera) => match camera.projection.kind {
                ProjectionKind::Orthographic { height } => height,
                ProjectionKind::Perspective { .. } => camera
                    .position()
                    .distance(self.model.transform().position),
            },
            None => 1.0,
        };
        distance * self.model.settings.distance_factor
    }

    fn process_transform_axis<H>(&mut self, motion: Vec2, host: &mut H) -> Result<(), SelectorError>
    where
        H: SelectionHost<K> + ?Sized,
    {
        let Some(axis) = self.model.selection_state().axis_index() else {
            return Ok(());
        };
        let local_axis = Vec3::AXES[axis];
        let world_axis = self.model.transform().rotation * local_axis;

        match self.model.transform_mode() {
            TransformMode::Translate => {
                let speed = self.arrow_motion_speed_by_direction(motion)
                    * self.arrow_motion_speed_by_distance();
                self.translate_selected_nodes(world_axis * speed, host)
            }
            TransformMode::Rotate => {
                let angle = self.arrow_motion_speed_by_inv_direction(motion)
                    * self.model.settings.rotation_speed;
                self.rotate_by_angle(world_axis, angle, host)
            }
            TransformMode::Scale => {
                let speed = self.arrow_motion_speed_by_direction(motion)
                    * self.arrow_motion_speed_by_distance();
                let step = self.model.step_scale(local_axis * speed);
                self.scale_selected_nodes(step, host)
            }
        }
    }

    fn process_transform_uniform<H>(
        &mut self,
        motion: Vec2,
        host: &mut H,
    ) -> Result<(), SelectorError>
    where
        H: SelectionHost<K> + ?Sized,
    {
        // Right and up grow, left and down shrink.
        let amount =
            (motion.x - motion.y) * self.model.settings.motion_speed * self.model.settings.uniform_speed;
        match self.model.transform_mode() {
            TransformMode::Rotate => {
                let view_axis = self
                    .model
                    .camera()
                    .map_or(Vec3::Z, |camera| camera.rotation() * Vec3::Z);
                self.rotate_by_angle(view_axis, amount, host)
            }
            TransformMode::Scale => {
                let step = self.model.step_scale(Vec3::splat(amount));
                self.scale_selected_nodes(step, host)
            }
            TransformMode::Translate => Ok(()),
        }
    }

    fn rotate_by_angle<H>(&mut self, axis: Vec3, angle: f32, host: &mut H) -> Result<(), SelectorError>
    where
        H: SelectionHost<K> + ?Sized,
    {
        self.model.validate_selection(&*host)?;
        let base = if self.model.raster.mode == RasterMode::Absolute {
            self.reference_angle(axis, &*host)
        } else {
            0.0
        };
        let step = self.model.step_angle(angle, base);
        if step.abs() <= f32::EPSILON {
            return Ok(());
        }
        self.rotate_selected_nodes(Quaternion::from_axis_angle(axis, step), host)
    }

    /// The angle of the active object about `axis` in world space, measured on its
    /// drag snapshot while a drag runs.
    fn reference_angle<H>(&self, axis: Vec3, host: &H) -> f32
    where
        H: SelectionHost<K> + ?Sized,
    {
        let reference = self
            .model
            .active_node()
            .or_else(|| self.model.selected_nodes().first().copied());
        let Some((key, object)) = reference.and_then(|key| Some((key, host.selectable(key)?)))
        else {
            return 0.0;
        };
        let local = self
            .model
            .drag()
            .and_then(|drag| drag.snapshot(key))
            .unwrap_or(object.local_transform())
            .rotation;
        ParentSpace::of(object)
            .world_rotation(local)
            .twist_angle(axis)
    }

    /// Moves every selected object by a world-space translation.
    ///
    /// With a relative raster only whole grid steps are applied and the rest is kept
    /// for later calls. With an absolute raster the moved components of each resulting
    /// position are snapped to the grid.
    pub fn translate_selected_nodes<H>(
        &mut self,
        translation: Vec3,
        host: &mut H,
    ) -> Result<(), SelectorError>
    where
        H: SelectionHost<K> + ?Sized,
    {
        self.model.validate_selection(&*host)?;
        let applied = self.model.step_translation(translation);
        let absolute = self.model.raster.mode == RasterMode::Absolute;

        for &key in self.model.selected_nodes() {
            let object = host.selectable_mut(key).ok_or_else(|| dangling(key))?;
            if !object.transform_flags().contains(TransformFlags::TRANSLATE) {
                continue;
            }
            let space = ParentSpace::of(object);

            if absolute {
                let current = object.global_transform().translation();
                let (start, total) = match self.model.drag() {
                    Some(drag) => (
                        drag.snapshot(key)
                            .map_or(current, |t| space.to_world(t.position)),
                        drag.translation,
                    ),
                    None => (current, translation),
                };
                let mut target = start + total;
                for i in 0..3 {
                    if total[i].abs() > EPSILON {
                        target[i] = self.model.raster.snap(target[i]);
                    }
                }
                let local = space.point(target);
                transform_selectable(object, false, |t| t.position = local);
            } else if applied != Vec3::ZERO {
                let delta = space.vector(applied);
                transform_selectable(object, false, |t| t.move_global(delta));
            }
        }

        self.model.update_transform(&*host)?;
        Ok(())
    }

    /// Rotates every selected object by a world-space rotation.
    ///
    /// A shared pivot turns positions about the gizmo origin; individual origins rotate
    /// each object in place.
    pub fn rotate_selected_nodes<H>(
        &mut self,
        rotation: Quaternion,
        host: &mut H,
    ) -> Result<(), SelectorError>
    where
        H: SelectionHost<K> + ?Sized,
    {
        self.model.validate_selection(&*host)?;
        let distributed = self.model.is_pivot_distributed();
        let pivot = self.model.transform().position;

        for &key in self.model.selected_nodes() {
            let object = host.selectable_mut(key).ok_or_else(|| dangling(key))?;
            if !object.transform_flags().contains(TransformFlags::ROTATE) {
                continue;
            }
            let space = ParentSpace::of(object);
            let local_rotation = space.rotation(rotation);
            if distributed {
                let local_pivot = space.point(pivot);
                transform_selectable(object, false, |t| t.turn_about(local_rotation, local_pivot));
            } else {
                transform_selectable(object, false, |t| t.turn_global(local_rotation));
            }
        }

        self.model.update_transform(&*host)?;
        Ok(())
    }

    /// Adds `scale` to the scale of every selected object.
    ///
    /// With a shared pivot each object receives `scale * own_scale / max_scale` and
    /// keeps the pivot fixed, so the group scales proportionally. With an absolute
    /// raster the changed components of each resulting scale are snapped to the grid,
    /// measured from the drag snapshot while a drag runs.
    pub fn scale_selected_nodes<H>(&mut self, scale: Vec3, host: &mut H) -> Result<(), SelectorError>
    where
        H: SelectionHost<K> + ?Sized,
    {
        self.model.validate_selection(&*host)?;
        if scale == Vec3::ZERO {
            return Ok(());
        }
        let uniform = scale.x == scale.y && scale.y == scale.z;
        let accepts = |object: &dyn Selectable| {
            let flags = object.transform_flags();
            flags.contains(TransformFlags::FREE_SCALE)
                || (uniform && flags.contains(TransformFlags::UNIFORM_SCALE))
        };

        let distributed = self.model.is_pivot_distributed();
        let pivot = self.model.transform().position;
        let absolute = self.model.raster.mode == RasterMode::Absolute;
        let drag = self.model.drag();
        let total = drag.map_or(scale, |drag| drag.scale);
        let start_scale = |key: K, object: &dyn Selectable| {
            drag.and_then(|drag| drag.snapshot(key))
                .unwrap_or(object.local_transform())
                .scale
        };

        let mut max_scale = Vec3::splat(f32::MIN_POSITIVE);
        if distributed {
            for &key in self.model.selected_nodes() {
                let object = host.selectable(key).ok_or_else(|| dangling(key))?;
                if accepts(object) {
                    let own = if absolute {
                        start_scale(key, object)
                    } else {
                        object.local_transform().scale
                    };
                    max_scale = max_scale.max(own);
                }
            }
        }

        for &key in self.model.selected_nodes() {
            let object = host.selectable_mut(key).ok_or_else(|| dangling(key))?;
            if !accepts(&*object) {
                continue;
            }
            let current = object.local_transform().scale;
            let delta = if absolute {
                let start = start_scale(key, &*object);
                let moved = if distributed {
                    total * start / max_scale
                } else {
                    total
                };
                let mut target = start + moved;
                for i in 0..3 {
                    if moved[i].abs() > EPSILON {
                        target[i] = self.model.raster.snap(target[i]);
                    }
                }
                target - current
            } else if distributed {
                scale * current / max_scale
            } else {
                scale
            };
            if distributed {
                let local_pivot = ParentSpace::of(object).point(pivot);
                transform_selectable(object, false, |t| t.scale_about(delta, local_pivot));
            } else {
                transform_selectable(object, false, |t| t.scale_by(delta));
            }
        }

        self.model.update_transform(&*host)?;
        Ok(())
    }

    /// Calls [`Selectable::on_transform_begin`] on every selected object.
    pub fn on_transform_begin<H>(&self, host: &mut H) -> Result<(), ContractViolation>
    where
        H: SelectionHost<K> + ?Sized,
    {
        self.model.validate_selection(&*host)?;
        for &key in self.model.selected_nodes() {
            host.selectable_mut(key)
                .ok_or_else(|| dangling(key))?
                .on_transform_begin();
        }
        Ok(())
    }

    /// Calls [`Selectable::on_transform_end`] on every selected object.
    pub fn on_transform_end<H>(&self, host: &mut H) -> Result<(), ContractViolation>
    where
        H: SelectionHost<K> + ?Sized,
    {
        self.model.validate_selection(&*host)?;
        for &key in self.model.selected_nodes() {
            host.selectable_mut(key)
                .ok_or_else(|| dangling(key))?
                .on_transform_end();
        }
        Ok(())
    }
}

impl<K: SelectionKey> std::fmt::Debug for Selector<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selector")
            .field("model", &self.model)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PivotAlignment;
    use crate::test_util::{front_camera, nodes_at};
    use approx::assert_relative_eq;
    use fork_core::math::{degrees_to_radians, FRAC_PI_2};
    use fork_core::{DrawCommand, RecordingRenderer};

    fn selector() -> (Selector<u32>, RecordingRenderer) {
        let renderer = RecordingRenderer::new();
        let selector = Selector::builder()
            .with_renderer(renderer.clone())
            .build()
            .unwrap();
        (selector, renderer)
    }

    #[test]
    fn test_build_without_renderer_fails() {
        let result = Selector::<u32>::builder().build();
        assert_eq!(
            result.err(),
            Some(ContractViolation::MissingDependency("renderer"))
        );
    }

    #[test]
    fn test_relative_raster_translation() {
        let mut host = nodes_at(&[Vec3::ZERO]);
        let (mut selector, _) = selector();
        selector.model_mut().add_node(0);
        selector.model_mut().raster.mode = RasterMode::Relative;
        selector.model_mut().raster.size = 1.0;

        selector
            .translate_selected_nodes(Vec3::new(0.4, 0.0, 0.0), &mut host)
            .unwrap();
        assert_eq!(host[&0].transform.position, Vec3::ZERO);
        selector
            .translate_selected_nodes(Vec3::new(0.3, 0.0, 0.0), &mut host)
            .unwrap();
        assert_relative_eq!(host[&0].transform.position.x, 1.0);
    }

    #[test]
    fn test_absolute_raster_translation() {
        let mut host = nodes_at(&[Vec3::new(0.0, 0.3, 0.0)]);
        let (mut selector, _) = selector();
        selector.model_mut().add_node(0);
        selector.model_mut().raster.mode = RasterMode::Absolute;
        selector.model_mut().raster.size = 0.5;

        selector
            .translate_selected_nodes(Vec3::new(1.23, 0.0, 0.0), &mut host)
            .unwrap();
        let p = host[&0].transform.position;
        assert_relative_eq!(p.x, 1.0);
        // Untouched components keep their off-grid value.
        assert_relative_eq!(p.y, 0.3);
    }

    #[test]
    fn test_translation_respects_flags() {
        let mut host = nodes_at(&[Vec3::ZERO, Vec3::X]);
        host.get_mut(&1).unwrap().flags = Some(TransformFlags::ROTATE);
        let (mut selector, _) = selector();
        selector.model_mut().add_node(0);
        selector.model_mut().add_node(1);
        selector
            .translate_selected_nodes(Vec3::Y, &mut host)
            .unwrap();
        assert_eq!(host[&0].transform.position, Vec3::Y);
        assert_eq!(host[&1].transform.position, Vec3::X);
    }

    #[test]
    fn test_rotate_about_shared_pivot() {
        let mut host = nodes_at(&[Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)]);
        let (mut selector, _) = selector();
        selector.model_mut().add_node(0);
        selector.model_mut().add_node(1);
        selector.setup_view(&front_camera(), &host).unwrap();

        let quarter = Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2);
        selector.rotate_selected_nodes(quarter, &mut host).unwrap();

        let p = host[&1].transform.position;
        assert!((p - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5);
        assert!(host[&1].transform.rotation.same_rotation(quarter, 1e-5));
    }

    #[test]
    fn test_rotate_individual_origins() {
        let mut host = nodes_at(&[Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)]);
        let (mut selector, _) = selector();
        selector
            .model_mut()
            .setup_pivot_alignment(PivotAlignment::IndividualOrigins);
        selector.model_mut().add_node(0);
        selector.model_mut().add_node(1);

        let quarter = Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2);
        selector.rotate_selected_nodes(quarter, &mut host).unwrap();
        assert_eq!(host[&1].transform.position, Vec3::new(1.0, 0.0, 0.0));
        assert!(host[&1].transform.rotation.same_rotation(quarter, 1e-5));
    }

    #[test]
    fn test_scale_about_shared_pivot() {
        let mut host = nodes_at(&[Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)]);
        let (mut selector, _) = selector();
        selector.model_mut().add_node(0);
        selector.model_mut().add_node(1);
        selector.setup_view(&front_camera(), &host).unwrap();

        selector.scale_selected_nodes(Vec3::ONE, &mut host).unwrap();
        for (key, x) in [(0, -2.0), (1, 2.0)] {
            let t = host[&key].transform;
            assert!((t.scale - Vec3::splat(2.0)).length() < 1e-5);
            assert!((t.position - Vec3::new(x, 0.0, 0.0)).length() < 1e-4);
        }
    }

    #[test]
    fn test_draw_ghost_while_dragging() {
        let host = nodes_at(&[Vec3::ZERO]);
        let (mut selector, renderer) = selector();
        selector.model_mut().add_node(0);
        selector.setup_view(&front_camera(), &host).unwrap();

        selector.draw(DrawFlags::NONE).unwrap();
        let idle = renderer.commands().len();
        assert!(idle > 0);

        renderer.clear();
        selector.model_mut().process_selection(Vec2::new(500.0, 300.0));
        selector
            .model_mut()
            .process_activation(Vec2::new(500.0, 300.0), true, &host)
            .unwrap();
        selector.draw(DrawFlags::PREV_TRANSFORM).unwrap();
        let begins = renderer
            .commands()
            .iter()
            .filter(|c| **c == DrawCommand::Begin3d)
            .count();
        assert_eq!(begins, 2);
    }

    #[test]
    fn test_dangling_selection_surfaces() {
        let mut host = nodes_at(&[Vec3::ZERO]);
        let (mut selector, _) = selector();
        selector.model_mut().add_node(0);
        host.remove(&0);
        let err = selector
            .translate_selected_nodes(Vec3::X, &mut host)
            .unwrap_err();
        assert!(matches!(
            err,
            SelectorError::Contract(ContractViolation::DanglingSelection(_))
        ));
    }

    #[test]
    fn test_dangling_key_leaves_selection_untouched() {
        // ARRANGE
        let mut host = nodes_at(&[Vec3::ZERO]);
        let (mut selector, _) = selector();
        selector.model_mut().add_node(0);
        selector.model_mut().add_node(5);

        // ACT
        let translated = selector.translate_selected_nodes(Vec3::X, &mut host);
        let turned = selector.rotate_selected_nodes(
            Quaternion::from_axis_angle(Vec3::Z, FRAC_PI_2),
            &mut host,
        );
        let scaled = selector.scale_selected_nodes(Vec3::ONE, &mut host);
        let begun = selector.on_transform_begin(&mut host);

        // ASSERT
        assert!(translated.is_err());
        assert!(turned.is_err());
        assert!(scaled.is_err());
        assert_eq!(begun, Err(ContractViolation::DanglingSelection("5".to_string())));
        let node = &host[&0];
        assert_eq!(node.transform, fork_core::Transform::IDENTITY);
        assert!(node.events.is_empty());
    }

    #[test]
    fn test_absolute_raster_scale_snaps_result() {
        // ARRANGE
        let mut host = nodes_at(&[Vec3::ZERO]);
        host.get_mut(&0).unwrap().transform.scale = Vec3::splat(1.3);
        let (mut selector, _) = selector();
        selector.model_mut().add_node(0);
        selector.model_mut().raster.mode = RasterMode::Absolute;
        selector.model_mut().raster.size = 0.5;

        // ACT
        let step = selector.model_mut().step_scale(Vec3::new(0.6, 0.0, 0.0));
        selector.scale_selected_nodes(step, &mut host).unwrap();

        // ASSERT
        let scale = host[&0].transform.scale;
        assert_relative_eq!(scale.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(scale.y, 1.3, epsilon = 1e-5);
        assert_relative_eq!(scale.z, 1.3, epsilon = 1e-5);
    }

    #[test]
    fn test_absolute_raster_rotation_snaps_angle() {
        // ARRANGE
        let mut host = nodes_at(&[Vec3::ZERO]);
        host.get_mut(&0).unwrap().transform.rotation =
            Quaternion::from_axis_angle(Vec3::Z, degrees_to_radians(10.0));
        let (mut selector, _) = selector();
        selector.model_mut().add_node(0);
        selector.model_mut().raster.mode = RasterMode::Absolute;
        selector.model_mut().raster.angle = 30.0;

        // ACT
        selector
            .rotate_by_angle(Vec3::Z, degrees_to_radians(25.0), &mut host)
            .unwrap();

        // ASSERT
        // 10 + 25 degrees lands on the 30 degree step, not on 10 + 30.
        let angle = host[&0].transform.rotation.twist_angle(Vec3::Z);
        assert_relative_eq!(angle, degrees_to_radians(30.0), epsilon = 1e-4);
    }
}
