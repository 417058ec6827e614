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


//! Selection state, pivot and orientation math, hit testing and drag bookkeeping.
//!
//! The model holds no reference to the selected objects. It stores their keys and
//! receives a [`SelectionHost`] whenever it has to read or write them.

use fork_core::math::{
    distance_to_segment_2d, lerp, saturate, Aabb, Mat4, Plane, Quaternion, Ray, Vec2, Vec3,
    EPSILON,
};
use fork_core::{Camera, ContractViolation, Transform};
use serde::{Deserialize, Serialize};

use crate::raster::{Raster, RasterMode};
use crate::selectable::{dangling, SelectionHost, SelectionKey};
use crate::settings::SelectorSettings;

/// The kind of transformation the gizmo applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransformMode {
    /// Move along axes or planes.
    #[default]
    Translate,
    /// Rotate around an axis.
    Rotate,
    /// Scale along an axis or uniformly.
    Scale,
}

/// How the gizmo axes are oriented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrientationAlignment {
    /// World axes.
    #[default]
    Global,
    /// The axes of the active object. Falls back to `Global` unless exactly one object
    /// is selected.
    Local,
    /// The camera's axes.
    View,
}

/// Where the gizmo sits and what rotations and scales pivot around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PivotAlignment {
    /// The mean of all selected positions.
    #[default]
    MedianPoint,
    /// Each object transforms about its own origin. The gizmo sits at the mean.
    IndividualOrigins,
    /// The position of the most recently selected object.
    ActiveElement,
    /// The center of the box enclosing all selected objects.
    BoundingBox,
    /// The minimum corner of that box.
    Minimum,
    /// The maximum corner of that box.
    Maximum,
    /// An externally supplied cursor position.
    GlobalCursor,
}

/// Which part of the gizmo is under the pointer (or locked by a drag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionState {
    /// Nothing.
    #[default]
    None,
    /// The X axis.
    XAxis,
    /// The Y axis.
    YAxis,
    /// The Z axis.
    ZAxis,
    /// The XY plane handle.
    XyPlane,
    /// The YZ plane handle.
    YzPlane,
    /// The XZ plane handle.
    XzPlane,
    /// The uniform handle around the origin.
    Uniform,
}

impl SelectionState {
    /// The axis index of a single-axis state.
    pub fn axis_index(self) -> Option<usize> {
        match self {
            SelectionState::XAxis => Some(0),
            SelectionState::YAxis => Some(1),
            SelectionState::ZAxis => Some(2),
            _ => None,
        }
    }
}

/// Per-axis interaction state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisState {
    /// The axis takes part in hit testing and drawing.
    pub enabled: bool,
    /// The pointer is over the axis (or a handle that includes it).
    pub selected: bool,
    /// The axis is locked by a running drag.
    pub active: bool,
    /// Fade factor in `[0, 1]`.
    pub visibility: f32,
}

impl Default for AxisState {
    fn default() -> Self {
        Self {
            enabled: true,
            selected: false,
            active: false,
            visibility: 1.0,
        }
    }
}

impl AxisState {
    /// The axis is drawn prominently enough to be picked.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visibility > 0.5
    }

    /// The axis can be hit by the pointer.
    #[inline]
    pub fn is_selectable(&self) -> bool {
        self.enabled && self.is_visible()
    }
}

/// Receives notifications about selection changes.
pub trait SelectionListener<K> {
    /// A key joined the selection.
    fn on_add_node(&mut self, _key: K) {}
    /// A key left the selection.
    fn on_remove_node(&mut self, _key: K) {}
    /// The whole selection is about to be cleared.
    fn on_remove_all_nodes(&mut self) {}
    /// A key became the active element.
    fn on_activate_node(&mut self, _key: K) {}
    /// A key stopped being the active element.
    fn on_deactivate_node(&mut self, _key: K) {}
}

/// Bookkeeping for a running drag.
#[derive(Debug, Clone)]
pub(crate) struct DragState<K> {
    pub(crate) mode: TransformMode,
    pub(crate) orientation: OrientationAlignment,
    pub(crate) pivot: PivotAlignment,
    pub(crate) snapshots: Vec<(K, Transform)>,
    pub(crate) pick_displacement: Vec3,
    pub(crate) start_pivot: Vec3,
    /// Raw world translation fed in so far, before snapping.
    pub(crate) translation: Vec3,
    pub(crate) angle: f32,
    pub(crate) applied_angle: f32,
    pub(crate) scale: Vec3,
    pub(crate) applied_scale: Vec3,
}

impl<K: SelectionKey> DragState<K> {
    pub(crate) fn snapshot(&self, key: K) -> Option<&Transform> {
        self.snapshots
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, t)| t)
    }
}

/// Selection set, gizmo transform, and interaction state of a selector.
pub struct SelectorModel<K: SelectionKey> {
    /// Tunables.
    pub settings: SelectorSettings,
    /// Grid snapping.
    pub raster: Raster,
    /// Pivot position used by [`PivotAlignment::GlobalCursor`].
    pub global_cursor: Vec3,
    /// A disabled model ignores hit tests and drags.
    pub is_enabled: bool,

    transform_mode: TransformMode,
    orientation_alignment: OrientationAlignment,
    pivot_alignment: PivotAlignment,
    axes: [AxisState; 3],
    selection_state: SelectionState,
    arrow_direction: Vec2,
    axes_plane_size: f32,

    selected: Vec<K>,
    active: Option<K>,

    camera: Option<Camera>,
    transform: Transform,
    prev_transform: Transform,
    drag: Option<DragState<K>>,

    listener: Option<Box<dyn SelectionListener<K>>>,
}

impl<K: SelectionKey> Default for SelectorModel<K> {
    fn default() -> Self {
        Self::new(SelectorSettings::default())
    }
}

impl<K: SelectionKey> std::fmt::Debug for SelectorModel<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectorModel")
            .field("transform_mode", &self.transform_mode)
            .field("selection_state", &self.selection_state)
            .field("selected", &self.selected)
            .field("active", &self.active)
            .field("is_active", &self.is_active())
            .finish_non_exhaustive()
    }
}

impl<K: SelectionKey> SelectorModel<K> {
    /// Creates an empty model.
    pub fn new(settings: SelectorSettings) -> Self {
        let axes_plane_size = saturate(settings.axes_plane_size);
        Self {
            settings,
            raster: Raster::default(),
            global_cursor: Vec3::ZERO,
            is_enabled: true,
            transform_mode: TransformMode::default(),
            orientation_alignment: OrientationAlignment::default(),
            pivot_alignment: PivotAlignment::default(),
            axes: [AxisState::default(); 3],
            selection_state: SelectionState::None,
            arrow_direction: Vec2::ZERO,
            axes_plane_size,
            selected: Vec::new(),
            active: None,
            camera: None,
            transform: Transform::IDENTITY,
            prev_transform: Transform::IDENTITY,
            drag: None,
            listener: None,
        }
    }

    /// Installs the selection listener, replacing any previous one.
    pub fn set_listener(&mut self, listener: Box<dyn SelectionListener<K>>) {
        self.listener = Some(listener);
    }

    // --- Selection set ---

    /// Adds a key to the selection and makes it the active element.
    ///
    /// Re-adding a selected key moves it to the back of the list without duplicating it.
    pub fn add_node(&mut self, key: K) {
        if let Some(index) = self.selected.iter().position(|k| *k == key) {
            let k = self.selected.remove(index);
            self.selected.push(k);
        } else {
            if let Some(listener) = self.listener.as_mut() {
                listener.on_add_node(key);
            }
            self.selected.push(key);
            log::trace!("Selected {key:?}");
        }
        self.setup_active_node(Some(key));
    }

    /// Removes a key from the selection. Returns `false` if it was not selected.
    pub fn remove_node(&mut self, key: K) -> bool {
        let Some(index) = self.selected.iter().position(|k| *k == key) else {
            return false;
        };
        if let Some(listener) = self.listener.as_mut() {
            listener.on_remove_node(key);
        }
        self.selected.remove(index);
        if let Some(drag) = self.drag.as_mut() {
            drag.snapshots.retain(|(k, _)| *k != key);
        }
        if self.active == Some(key) {
            let next = self.selected.last().copied();
            self.setup_active_node(next);
        }
        true
    }

    /// Clears the selection.
    pub fn remove_all_nodes(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_remove_all_nodes();
        }
        self.selected.clear();
        if let Some(drag) = self.drag.as_mut() {
            drag.snapshots.clear();
        }
        self.setup_active_node(None);
    }

    /// Returns `true` if `key` is selected.
    pub fn has_node(&self, key: K) -> bool {
        self.selected.contains(&key)
    }

    /// The selected keys, oldest first.
    pub fn selected_nodes(&self) -> &[K] {
        &self.selected
    }

    /// Returns `true` if at least one key is selected.
    pub fn any_nodes_selected(&self) -> bool {
        !self.selected.is_empty()
    }

    /// The most recently selected key.
    pub fn active_node(&self) -> Option<K> {
        self.active
    }

    fn setup_active_node(&mut self, key: Option<K>) {
        if self.active == key {
            return;
        }
        if let (Some(old), Some(listener)) = (self.active, self.listener.as_mut()) {
            listener.on_deactivate_node(old);
        }
        self.active = key;
        if let (Some(new), Some(listener)) = (key, self.listener.as_mut()) {
            listener.on_activate_node(new);
        }
    }

    // --- Modes ---

    /// Sets the transform mode used by the next drag.
    pub fn setup_transform_mode(&mut self, mode: TransformMode) {
        self.transform_mode = mode;
    }

    /// Sets the orientation used by the next drag.
    pub fn setup_orientation_alignment(&mut self, orientation: OrientationAlignment) {
        self.orientation_alignment = orientation;
    }

    /// Sets the pivot used by the next drag.
    pub fn setup_pivot_alignment(&mut self, pivot: PivotAlignment) {
        self.pivot_alignment = pivot;
    }

    /// The transform mode in force: the one captured by a running drag, otherwise the
    /// configured one.
    pub fn transform_mode(&self) -> TransformMode {
        self.drag.as_ref().map_or(self.transform_mode, |d| d.mode)
    }

    /// The orientation alignment in force.
    pub fn orientation_alignment(&self) -> OrientationAlignment {
        self.drag
            .as_ref()
            .map_or(self.orientation_alignment, |d| d.orientation)
    }

    /// The pivot alignment in force.
    pub fn pivot_alignment(&self) -> PivotAlignment {
        self.drag.as_ref().map_or(self.pivot_alignment, |d| d.pivot)
    }

    /// Resolves `Local` to `Global` unless exactly one key is selected.
    pub fn active_orientation_alignment(&self) -> OrientationAlignment {
        match self.orientation_alignment() {
            OrientationAlignment::Local if self.selected.len() != 1 => OrientationAlignment::Global,
            other => other,
        }
    }

    /// Returns `true` when objects transform about a shared pivot.
    pub fn is_pivot_distributed(&self) -> bool {
        let pivot = self.pivot_alignment();
        (self.selected.len() > 1 && pivot != PivotAlignment::IndividualOrigins)
            || pivot == PivotAlignment::GlobalCursor
    }

    // --- Axes ---

    /// Enables or disables an axis. Indices outside `0..3` are ignored.
    pub fn enable_axis(&mut self, index: usize, enabled: bool) {
        if let Some(axis) = self.axes.get_mut(index) {
            axis.enabled = enabled;
        }
    }

    /// The three axis states.
    pub fn axes_state(&self) -> &[AxisState; 3] {
        &self.axes
    }

    /// Sets the plane handle size, clamped to `[0, 1]`.
    pub fn setup_axes_plane_size(&mut self, size: f32) {
        self.axes_plane_size = saturate(size);
    }

    /// The plane handle size relative to the axis length.
    pub fn axes_plane_size(&self) -> f32 {
        self.axes_plane_size
    }

    // --- Gizmo transform ---

    /// Stores the camera and recomputes the gizmo transform and its on-screen size.
    pub fn setup_view<H>(&mut self, camera: &Camera, host: &H) -> Result<(), ContractViolation>
    where
        H: SelectionHost<K> + ?Sized,
    {
        self.camera = Some(*camera);
        self.update_transform(host)?;

        let proj = camera.projection.matrix();
        let mut size = self.settings.scale_factor / proj.cols[1].y;
        // cols[3].w is 1 for orthographic and 0 for perspective projections.
        size *= lerp(
            self.transform.position.distance(camera.position()),
            1.0,
            proj.cols[3].w,
        );
        self.resize(size);
        Ok(())
    }

    /// Re-derives the gizmo position and rotation from the selection.
    pub fn update_transform<H>(&mut self, host: &H) -> Result<(), ContractViolation>
    where
        H: SelectionHost<K> + ?Sized,
    {
        let pivot = self.compute_pivot_center(host, self.pivot_alignment())?;
        self.transform.position = match &self.drag {
            Some(drag) if self.raster.is_enabled() && self.raster.move_free_in_raster => {
                drag.start_pivot + drag.translation
            }
            _ => pivot,
        };
        self.transform.rotation = self.compute_orientation(host, self.orientation_alignment())?;
        Ok(())
    }

    /// Sets the gizmo's uniform scale.
    pub fn resize(&mut self, scale: f32) {
        self.transform.scale = Vec3::splat(scale);
    }

    /// The gizmo's uniform scale.
    pub fn size(&self) -> f32 {
        self.transform.scale.x
    }

    /// The gizmo transform.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// The gizmo transform when the running (or last) drag started.
    pub fn prev_transform(&self) -> &Transform {
        &self.prev_transform
    }

    /// The camera given to the last [`setup_view`](Self::setup_view).
    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    /// Screen direction of the hovered axis, pointing away from the origin.
    pub fn arrow_direction(&self) -> Vec2 {
        self.arrow_direction
    }

    /// Computes the pivot for `pivot`.
    ///
    /// The global cursor does not depend on the selection. Every other alignment
    /// yields zero for an empty selection.
    pub fn compute_pivot_center<H>(
        &self,
        host: &H,
        pivot: PivotAlignment,
    ) -> Result<Vec3, ContractViolation>
    where
        H: SelectionHost<K> + ?Sized,
    {
        if pivot == PivotAlignment::GlobalCursor {
            return Ok(self.global_cursor);
        }
        if self.selected.is_empty() {
            return Ok(Vec3::ZERO);
        }
        let center = match pivot {
            PivotAlignment::MedianPoint | PivotAlignment::IndividualOrigins => {
                let mut sum = Vec3::ZERO;
                for &key in &self.selected {
                    sum += self.global_position(host, key)?;
                }
                sum / self.selected.len() as f32
            }
            PivotAlignment::ActiveElement => match self.active {
                Some(key) => self.global_position(host, key)?,
                None => Vec3::ZERO,
            },
            PivotAlignment::BoundingBox => self.selection_bounds(host)?.center(),
            PivotAlignment::Minimum => self.selection_bounds(host)?.min,
            PivotAlignment::Maximum => self.selection_bounds(host)?.max,
            PivotAlignment::GlobalCursor => self.global_cursor,
        };
        Ok(center)
    }

    /// Computes the gizmo rotation for `orientation`.
    pub fn compute_orientation<H>(
        &self,
        host: &H,
        orientation: OrientationAlignment,
    ) -> Result<Quaternion, ContractViolation>
    where
        H: SelectionHost<K> + ?Sized,
    {
        let orientation = match orientation {
            OrientationAlignment::Local if self.selected.len() != 1 => OrientationAlignment::Global,
            other => other,
        };
        Ok(match orientation {
            OrientationAlignment::Global => Quaternion::IDENTITY,
            OrientationAlignment::Local => match self.active {
                Some(key) => {
                    let object = host.selectable(key).ok_or_else(|| dangling(key))?;
                    Quaternion::from_rotation_matrix(&object.global_transform())
                }
                None => Quaternion::IDENTITY,
            },
            OrientationAlignment::View => self
                .camera
                .as_ref()
                .map_or(Quaternion::IDENTITY, Camera::rotation),
        })
    }

    fn global_position<H>(&self, host: &H, key: K) -> Result<Vec3, ContractViolation>
    where
        H: SelectionHost<K> + ?Sized,
    {
        host.selectable(key)
            .map(|object| object.global_transform().translation())
            .ok_or_else(|| dangling(key))
    }

    fn selection_bounds<H>(&self, host: &H) -> Result<Aabb, ContractViolation>
    where
        H: SelectionHost<K> + ?Sized,
    {
        let mut bounds = Aabb::INVALID;
        for &key in &self.selected {
            let object = host.selectable(key).ok_or_else(|| dangling(key))?;
            bounds = bounds.merged_with_point(object.global_transform().translation());
            if let Some(geometry) = object.bounding_box() {
                bounds = bounds.merge(&geometry);
            }
        }
        Ok(bounds)
    }

    // --- Hit testing ---

    fn world_view_matrix(&self, camera: &Camera) -> Mat4 {
        camera.view_matrix() * self.transform.matrix()
    }

    fn project(camera: &Camera, world_view: &Mat4, local: Vec3) -> Option<Vec2> {
        camera
            .projection
            .project_point(world_view.transform_point3(local))
            .map(|p| Vec2::new(p.x, p.y))
    }

    /// Recomputes the fade factor of every axis from its projected length.
    pub fn update_axis_visibility(&mut self) {
        let camera = match (&self.camera, self.settings.use_visibility) {
            (Some(camera), true) => *camera,
            _ => {
                self.axes.iter_mut().for_each(|a| a.visibility = 1.0);
                return;
            }
        };
        let world_view = self.world_view_matrix(&camera);
        let origin = Self::project(&camera, &world_view, Vec3::ZERO);
        let range = (self.settings.visibility_max - self.settings.visibility_min).max(EPSILON);
        for (i, axis) in self.axes.iter_mut().enumerate() {
            let end = Self::project(&camera, &world_view, Vec3::AXES[i]);
            axis.visibility = match (origin, end) {
                (Some(o), Some(e)) => saturate((o.distance(e) - self.settings.visibility_min) / range),
                _ => 0.0,
            };
        }
    }

    /// Clears hover state. Also drops the drag lock without restoring anything.
    pub fn reset_selection(&mut self) {
        self.drag = None;
        for axis in &mut self.axes {
            axis.selected = false;
            axis.active = false;
        }
        self.selection_state = SelectionState::None;
    }

    fn is_line_selected(&self, start: Vec2, end: Vec2, pointer: Vec2) -> bool {
        distance_to_segment_2d(start, end, pointer) < self.settings.selection_radius
    }

    /// Hit-tests the pointer against the gizmo and updates the hover state.
    ///
    /// Plane handles are tested first, then the uniform handle, then the axes. Returns
    /// `true` if anything was hit. Does nothing while a drag is running.
    pub fn process_selection(&mut self, pointer: Vec2) -> bool {
        if self.is_active() {
            return false;
        }
        self.reset_selection();
        if !self.is_enabled || self.selected.is_empty() {
            return false;
        }
        let Some(camera) = self.camera else {
            log::trace!("Selector hit test without a view");
            return false;
        };

        self.update_axis_visibility();

        let world_view = self.world_view_matrix(&camera);
        let Some(origin) = Self::project(&camera, &world_view, Vec3::ZERO) else {
            return false;
        };
        let s = self.axes_plane_size;
        let points = Vec3::AXES.map(|axis| Self::project(&camera, &world_view, axis));
        let half_points = Vec3::AXES.map(|axis| Self::project(&camera, &world_view, axis * s));
        let plane_points = [
            Vec3::new(s, s, 0.0),
            Vec3::new(0.0, s, s),
            Vec3::new(s, 0.0, s),
        ]
        .map(|corner| Self::project(&camera, &world_view, corner));

        let mut hit = false;

        if self.are_axes_planes_enabled() {
            for i in 0..3 {
                let (a, b) = (i, (i + 1) % 3);
                if !(self.axes[a].is_selectable() && self.axes[b].is_selectable()) {
                    continue;
                }
                let Some(corner) = plane_points[i] else {
                    continue;
                };
                let on_edge = |half: Option<Vec2>| {
                    half.is_some_and(|h| self.is_line_selected(h, corner, pointer))
                };
                if on_edge(half_points[a]) || on_edge(half_points[b]) {
                    self.axes[a].selected = true;
                    self.axes[b].selected = true;
                    hit = true;
                    break;
                }
            }
        }

        if !hit
            && self.is_uniform_transform_enabled()
            && self.axes.iter().all(AxisState::is_selectable)
            && origin.distance(pointer) < self.settings.uniform_radius
        {
            self.axes.iter_mut().for_each(|a| a.selected = true);
            self.arrow_direction = Vec2::new(1.0, -1.0).normalize();
            hit = true;
        }

        if !hit {
            for i in 0..3 {
                let Some(end) = points[i] else {
                    continue;
                };
                if self.axes[i].is_selectable() && self.is_line_selected(origin, end, pointer) {
                    self.axes[i].selected = true;
                    self.arrow_direction = (end - origin).normalize();
                    hit = true;
                    break;
                }
            }
        }

        self.update_selection_state();
        hit
    }

    fn update_selection_state(&mut self) {
        let [x, y, z] = self.axes.map(|a| a.selected);
        self.selection_state = match (x, y, z) {
            (true, true, true) => SelectionState::Uniform,
            (true, true, false) => SelectionState::XyPlane,
            (false, true, true) => SelectionState::YzPlane,
            (true, false, true) => SelectionState::XzPlane,
            (true, false, false) => SelectionState::XAxis,
            (false, true, false) => SelectionState::YAxis,
            (false, false, true) => SelectionState::ZAxis,
            (false, false, false) => SelectionState::None,
        };
    }

    // --- Drag ---

    /// Starts (`activate = true`) or ends a drag on the hovered handle.
    ///
    /// The first activation snapshots every selected object's local transform, the
    /// gizmo transform, and the mode, orientation and pivot in force. Does nothing
    /// unless the model is enabled and a handle is hovered.
    pub fn process_activation<H>(
        &mut self,
        pointer: Vec2,
        activate: bool,
        host: &H,
    ) -> Result<(), ContractViolation>
    where
        H: SelectionHost<K> + ?Sized,
    {
        if !self.is_enabled || !self.is_any_selected() {
            return Ok(());
        }
        for axis in &mut self.axes {
            axis.active = activate && axis.selected;
        }

        if !activate {
            if self.drag.take().is_some() {
                self.raster.reset_vector();
                log::debug!("Selector drag finished");
            }
            return Ok(());
        }
        if self.drag.is_some() {
            return Ok(());
        }

        let snapshots = self
            .selected
            .iter()
            .map(|&key| {
                host.selectable(key)
                    .map(|object| (key, *object.local_transform()))
                    .ok_or_else(|| dangling(key))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.prev_transform = self.transform;
        self.raster.reset_vector();

        let pick_displacement = self
            .pick_position(pointer)
            .map_or(Vec3::ZERO, |p| p - self.transform.position);

        self.drag = Some(DragState {
            mode: self.transform_mode,
            orientation: self.orientation_alignment,
            pivot: self.pivot_alignment,
            snapshots,
            pick_displacement,
            start_pivot: self.transform.position,
            translation: Vec3::ZERO,
            angle: 0.0,
            applied_angle: 0.0,
            scale: Vec3::ZERO,
            applied_scale: Vec3::ZERO,
        });
        log::debug!(
            "Selector drag started on {:?} ({:?})",
            self.selection_state,
            self.transform_mode
        );
        Ok(())
    }

    /// Aborts a running drag and restores every snapshot. Returns `false` if no drag
    /// was running.
    ///
    /// A snapshot whose object is gone fails the call before anything is restored,
    /// and the drag keeps running.
    pub fn cancel_activation<H>(&mut self, host: &mut H) -> Result<bool, ContractViolation>
    where
        H: SelectionHost<K> + ?Sized,
    {
        if !self.is_enabled {
            return Ok(false);
        }
        let Some(drag) = self.drag.as_ref() else {
            return Ok(false);
        };
        if let Some(&(key, _)) = drag
            .snapshots
            .iter()
            .find(|(key, _)| host.selectable(*key).is_none())
        {
            return Err(dangling(key));
        }
        let Some(drag) = self.drag.take() else {
            return Ok(false);
        };
        for axis in &mut self.axes {
            axis.active = false;
        }
        self.raster.reset_vector();
        for (key, snapshot) in drag.snapshots {
            let object = host.selectable_mut(key).ok_or_else(|| dangling(key))?;
            *object.local_transform_mut() = snapshot;
            object.on_transform();
        }
        self.update_transform(&*host)?;
        log::debug!("Selector drag cancelled");
        Ok(true)
    }

    fn drag_origin(&self) -> Vec3 {
        match &self.drag {
            Some(drag) => drag.start_pivot + drag.translation,
            None => self.transform.position,
        }
    }

    /// Projects the pointer onto the active plane or axis, in world space.
    ///
    /// For a plane the view ray is intersected with it. For an axis the point of the
    /// axis line closest to the view ray is returned. `None` without a view, without an
    /// active handle, or when the ray runs parallel to it.
    pub fn pick_position(&self, pointer: Vec2) -> Option<Vec3> {
        let camera = self.camera.as_ref()?;
        let ray = camera.view_ray(pointer)?;
        let origin = self.drag_origin();
        let rotation = self.transform.rotation;

        let [x, y, z] = self.axes.map(|a| a.active);
        let normal = if z && y {
            Vec3::X
        } else if y && x {
            Vec3::Z
        } else if x && z {
            Vec3::Y
        } else {
            let axis = (0..3).find(|&i| self.axes[i].active)?;
            let line = Ray::new(origin, rotation * Vec3::AXES[axis]);
            return ray.closest_point_on_line(&line);
        };
        Plane::from_point_normal(origin, rotation * normal).intersect_ray(&ray)
    }

    /// The translation that keeps the picked point under the pointer.
    pub fn pick_offset(&self, pointer: Vec2) -> Vec3 {
        let displacement = self.drag.as_ref().map_or(Vec3::ZERO, |d| d.pick_displacement);
        self.pick_position(pointer)
            .map_or(Vec3::ZERO, |p| p - self.drag_origin() - displacement)
    }

    /// Records a raw translation and returns the part to apply now.
    ///
    /// Relative rasters hold back everything but whole grid steps.
    pub(crate) fn step_translation(&mut self, raw: Vec3) -> Vec3 {
        if let Some(drag) = self.drag.as_mut() {
            drag.translation += raw;
        }
        match self.raster.mode {
            RasterMode::Relative => {
                self.raster.accumulate(raw);
                self.raster.flush_vector()
            }
            RasterMode::None | RasterMode::Absolute => raw,
        }
    }

    /// Records a raw rotation angle and returns the angle to apply now.
    ///
    /// `base` is the reference object's current angle about the rotation axis. An
    /// absolute raster snaps `base` plus the accumulated angle, so the object lands
    /// on a whole angle step. The other modes snap the accumulated angle alone.
    pub(crate) fn step_angle(&mut self, raw: f32, base: f32) -> f32 {
        let absolute = self.raster.mode == RasterMode::Absolute;
        let raster = &self.raster;
        let snap = |total: f32| {
            if absolute {
                raster.snap_angle(base + total) - base
            } else {
                raster.snap_angle(total)
            }
        };
        match self.drag.as_mut() {
            Some(drag) => {
                drag.angle += raw;
                let target = snap(drag.angle);
                let step = target - drag.applied_angle;
                drag.applied_angle = target;
                step
            }
            None => snap(raw),
        }
    }

    /// Records a raw scale delta and returns the delta to apply now.
    ///
    /// An absolute raster hands the raw delta through. The resulting scale of each
    /// object is snapped when it is applied.
    pub(crate) fn step_scale(&mut self, raw: Vec3) -> Vec3 {
        let absolute = self.raster.mode == RasterMode::Absolute;
        match self.drag.as_mut() {
            Some(drag) => {
                drag.scale += raw;
                if absolute {
                    return raw;
                }
                let target = Vec3::new(
                    self.raster.snap(drag.scale.x),
                    self.raster.snap(drag.scale.y),
                    self.raster.snap(drag.scale.z),
                );
                let step = target - drag.applied_scale;
                drag.applied_scale = target;
                step
            }
            None if absolute => raw,
            None => Vec3::new(
                self.raster.snap(raw.x),
                self.raster.snap(raw.y),
                self.raster.snap(raw.z),
            ),
        }
    }

    /// Fails on the first selected key the host cannot resolve.
    ///
    /// Operations that write to several objects call this first, so a dangling key
    /// never leaves the selection half transformed.
    pub fn validate_selection<H>(&self, host: &H) -> Result<(), ContractViolation>
    where
        H: SelectionHost<K> + ?Sized,
    {
        match self.selected.iter().find(|&&key| host.selectable(key).is_none()) {
            Some(&key) => Err(dangling(key)),
            None => Ok(()),
        }
    }

    pub(crate) fn drag(&self) -> Option<&DragState<K>> {
        self.drag.as_ref()
    }

    // --- Queries ---

    /// The hovered or locked handle.
    pub fn selection_state(&self) -> SelectionState {
        self.selection_state
    }

    /// A drag is running.
    pub fn is_active(&self) -> bool {
        self.drag.is_some()
    }

    /// At least one axis is hovered.
    pub fn is_any_selected(&self) -> bool {
        self.axes.iter().any(|a| a.selected)
    }

    /// A single axis is hovered.
    pub fn is_axis_selection(&self) -> bool {
        self.selection_state.axis_index().is_some()
    }

    /// A plane handle is hovered.
    pub fn is_plane_selection(&self) -> bool {
        matches!(
            self.selection_state,
            SelectionState::XyPlane | SelectionState::YzPlane | SelectionState::XzPlane
        )
    }

    /// No axis is disabled.
    pub fn are_all_axes_enabled(&self) -> bool {
        self.axes.iter().all(|a| a.enabled)
    }

    /// Plane handles exist in translate mode only.
    pub fn are_axes_planes_enabled(&self) -> bool {
        self.transform_mode() == TransformMode::Translate
    }

    /// The uniform handle exists in rotate and scale mode with every axis enabled.
    pub fn is_uniform_transform_enabled(&self) -> bool {
        self.are_all_axes_enabled()
            && matches!(
                self.transform_mode(),
                TransformMode::Rotate | TransformMode::Scale
            )
    }

    /// Translation follows the picked point instead of relative pointer motion.
    pub fn is_picking_active(&self) -> bool {
        self.settings.picking_only_translation
            && self.transform_mode() == TransformMode::Translate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{camera_at, front_camera, nodes_at};
    use fork_core::math::FRAC_PI_2;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_add_node_is_idempotent_and_reorders() {
        let mut model = SelectorModel::<u32>::default();
        model.add_node(1);
        model.add_node(2);
        model.add_node(1);
        assert_eq!(model.selected_nodes(), &[2, 1]);
        assert_eq!(model.active_node(), Some(1));
    }

    #[test]
    fn test_remove_node() {
        let mut model = SelectorModel::<u32>::default();
        model.add_node(1);
        model.add_node(2);
        assert!(!model.remove_node(7));
        assert_eq!(model.selected_nodes(), &[1, 2]);

        assert!(model.remove_node(2));
        assert_eq!(model.active_node(), Some(1));
        model.remove_all_nodes();
        assert!(!model.any_nodes_selected());
        assert_eq!(model.active_node(), None);
    }

    #[test]
    fn test_listener_sees_changes() {
        #[derive(Default)]
        struct Log(Rc<RefCell<Vec<String>>>);
        impl SelectionListener<u32> for Log {
            fn on_add_node(&mut self, key: u32) {
                self.0.borrow_mut().push(format!("add {key}"));
            }
            fn on_remove_node(&mut self, key: u32) {
                self.0.borrow_mut().push(format!("remove {key}"));
            }
            fn on_activate_node(&mut self, key: u32) {
                self.0.borrow_mut().push(format!("activate {key}"));
            }
            fn on_deactivate_node(&mut self, key: u32) {
                self.0.borrow_mut().push(format!("deactivate {key}"));
            }
        }

        let events = Rc::new(RefCell::new(Vec::new()));
        let mut model = SelectorModel::<u32>::default();
        model.set_listener(Box::new(Log(events.clone())));
        model.add_node(1);
        model.add_node(2);
        model.remove_node(2);

        assert_eq!(
            *events.borrow(),
            vec![
                "add 1",
                "activate 1",
                "add 2",
                "deactivate 1",
                "activate 2",
                "remove 2",
                "deactivate 2",
                "activate 1"
            ]
        );
    }

    #[test]
    fn test_pivot_alignments() {
        let host = nodes_at(&[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(4.0, 2.0, 0.0),
            Vec3::new(2.0, -2.0, 6.0),
        ]);
        let mut model = SelectorModel::<u32>::default();
        for key in 0..3 {
            model.add_node(key);
        }

        let median = model
            .compute_pivot_center(&host, PivotAlignment::MedianPoint)
            .unwrap();
        assert_eq!(median, Vec3::new(2.0, 0.0, 2.0));

        let min = model.compute_pivot_center(&host, PivotAlignment::Minimum).unwrap();
        let max = model.compute_pivot_center(&host, PivotAlignment::Maximum).unwrap();
        assert_eq!(min, Vec3::new(0.0, -2.0, 0.0));
        assert_eq!(max, Vec3::new(4.0, 2.0, 6.0));

        let center = model
            .compute_pivot_center(&host, PivotAlignment::BoundingBox)
            .unwrap();
        assert_eq!(center, Vec3::new(2.0, 0.0, 3.0));

        let active = model
            .compute_pivot_center(&host, PivotAlignment::ActiveElement)
            .unwrap();
        assert_eq!(active, Vec3::new(2.0, -2.0, 6.0));

        model.global_cursor = Vec3::new(9.0, 9.0, 9.0);
        let cursor = model
            .compute_pivot_center(&host, PivotAlignment::GlobalCursor)
            .unwrap();
        assert_eq!(cursor, Vec3::new(9.0, 9.0, 9.0));
    }

    #[test]
    fn test_bounds_extend_pivot_box() {
        let mut host = nodes_at(&[Vec3::ZERO]);
        host.get_mut(&0).unwrap().bounds = Some(Aabb::from_min_max(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(3.0, 1.0, 1.0),
        ));
        let mut model = SelectorModel::<u32>::default();
        model.add_node(0);
        let center = model
            .compute_pivot_center(&host, PivotAlignment::BoundingBox)
            .unwrap();
        assert_eq!(center, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_empty_selection_pivot_is_zero() {
        let model = SelectorModel::<u32>::default();
        let host = nodes_at(&[]);
        assert_eq!(
            model.compute_pivot_center(&host, PivotAlignment::MedianPoint),
            Ok(Vec3::ZERO)
        );
    }

    #[test]
    fn test_global_cursor_pivot_ignores_empty_selection() {
        // ARRANGE
        let mut model = SelectorModel::<u32>::default();
        model.global_cursor = Vec3::new(1.0, 2.0, 3.0);
        let host = nodes_at(&[]);

        // ACT
        let pivot = model.compute_pivot_center(&host, PivotAlignment::GlobalCursor);

        // ASSERT
        assert_eq!(pivot, Ok(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_dangling_key_is_a_contract_violation() {
        let host = nodes_at(&[Vec3::ZERO]);
        let mut model = SelectorModel::<u32>::default();
        model.add_node(5);
        let err = model.update_transform(&host).unwrap_err();
        assert_eq!(err, ContractViolation::DanglingSelection("5".to_string()));
    }

    #[test]
    fn test_local_orientation_needs_single_selection() {
        let mut host = nodes_at(&[Vec3::ZERO, Vec3::X]);
        let turned = Quaternion::from_axis_angle(Vec3::Y, FRAC_PI_2);
        host.get_mut(&0).unwrap().transform.rotation = turned;

        let mut model = SelectorModel::<u32>::default();
        model.setup_orientation_alignment(OrientationAlignment::Local);
        model.add_node(0);
        let q = model
            .compute_orientation(&host, OrientationAlignment::Local)
            .unwrap();
        assert!(q.same_rotation(turned, 1e-4));

        model.add_node(1);
        assert_eq!(
            model.active_orientation_alignment(),
            OrientationAlignment::Global
        );
        let q = model
            .compute_orientation(&host, OrientationAlignment::Local)
            .unwrap();
        assert_eq!(q, Quaternion::IDENTITY);
    }

    #[test]
    fn test_gizmo_size_follows_distance() {
        let host = nodes_at(&[Vec3::ZERO]);
        let mut model = SelectorModel::<u32>::default();
        model.add_node(0);
        model.setup_view(&front_camera(), &host).unwrap();
        // 90 degree fov: proj[1][1] = 1.
        assert!((model.size() - 5.0).abs() < 1e-4);

        model.setup_view(&camera_at(Vec3::new(0.0, 0.0, 20.0)), &host).unwrap();
        assert!((model.size() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_hover_x_axis() {
        let host = nodes_at(&[Vec3::ZERO]);
        let mut model = SelectorModel::<u32>::default();
        model.add_node(0);
        model.setup_view(&front_camera(), &host).unwrap();

        // The X axis spans (400, 300) to (550, 300) on screen.
        assert!(model.process_selection(Vec2::new(500.0, 302.0)));
        assert_eq!(model.selection_state(), SelectionState::XAxis);
        assert_eq!(model.arrow_direction(), Vec2::X);

        assert!(!model.process_selection(Vec2::new(500.0, 320.0)));
        assert_eq!(model.selection_state(), SelectionState::None);
    }

    #[test]
    fn test_axis_facing_viewer_is_faded() {
        let host = nodes_at(&[Vec3::ZERO]);
        let mut model = SelectorModel::<u32>::default();
        model.add_node(0);
        model.setup_view(&front_camera(), &host).unwrap();
        model.update_axis_visibility();

        let axes = model.axes_state();
        assert_eq!(axes[0].visibility, 1.0);
        assert_eq!(axes[2].visibility, 0.0);
        assert!(!axes[2].is_selectable());
    }

    #[test]
    fn test_hover_plane_handle() {
        let host = nodes_at(&[Vec3::ZERO]);
        let mut model = SelectorModel::<u32>::default();
        model.add_node(0);
        model.setup_view(&front_camera(), &host).unwrap();

        // Half point of X is (437.5, 300), the XY corner is (437.5, 262.5).
        assert!(model.process_selection(Vec2::new(438.0, 280.0)));
        assert_eq!(model.selection_state(), SelectionState::XyPlane);
        assert!(model.is_plane_selection());
    }

    #[test]
    fn test_uniform_handle_in_scale_mode() {
        let host = nodes_at(&[Vec3::ZERO]);
        let mut model = SelectorModel::<u32>::default();
        model.settings.use_visibility = false;
        model.setup_transform_mode(TransformMode::Scale);
        model.add_node(0);
        model.setup_view(&front_camera(), &host).unwrap();

        assert!(model.process_selection(Vec2::new(403.0, 298.0)));
        assert_eq!(model.selection_state(), SelectionState::Uniform);

        model.enable_axis(2, false);
        model.process_selection(Vec2::new(403.0, 298.0));
        assert_ne!(model.selection_state(), SelectionState::Uniform);
    }

    #[test]
    fn test_drag_locks_selection_and_captures_mode() {
        let mut host = nodes_at(&[Vec3::ZERO]);
        let mut model = SelectorModel::<u32>::default();
        model.add_node(0);
        model.setup_view(&front_camera(), &host).unwrap();
        model.process_selection(Vec2::new(500.0, 300.0));
        model
            .process_activation(Vec2::new(500.0, 300.0), true, &host)
            .unwrap();
        assert!(model.is_active());
        assert!(model.axes_state()[0].active);

        // Pointer over nothing: the lock holds.
        assert!(!model.process_selection(Vec2::new(10.0, 10.0)));
        assert_eq!(model.selection_state(), SelectionState::XAxis);

        model.setup_transform_mode(TransformMode::Rotate);
        assert_eq!(model.transform_mode(), TransformMode::Translate);

        host.get_mut(&0).unwrap().transform.position = Vec3::new(3.0, 0.0, 0.0);
        assert!(model.cancel_activation(&mut host).unwrap());
        assert_eq!(host[&0].transform.position, Vec3::ZERO);
        assert!(!model.is_active());
        assert_eq!(model.transform_mode(), TransformMode::Rotate);
    }

    #[test]
    fn test_cancel_with_missing_object_keeps_drag() {
        // ARRANGE
        let mut host = nodes_at(&[Vec3::ZERO, Vec3::X]);
        let mut model = SelectorModel::<u32>::default();
        model.add_node(0);
        model.add_node(1);
        model.setup_view(&front_camera(), &host).unwrap();
        model.process_selection(Vec2::new(500.0, 300.0));
        model
            .process_activation(Vec2::new(500.0, 300.0), true, &host)
            .unwrap();
        host.get_mut(&0).unwrap().transform.position = Vec3::new(3.0, 0.0, 0.0);
        host.remove(&1);

        // ACT
        let result = model.cancel_activation(&mut host);

        // ASSERT
        assert_eq!(result, Err(ContractViolation::DanglingSelection("1".to_string())));
        assert_eq!(host[&0].transform.position, Vec3::new(3.0, 0.0, 0.0));
        assert!(model.is_active());
        assert_eq!(model.validate_selection(&host), Err(dangling(1u32)));
    }

    #[test]
    fn test_pick_on_axis_and_plane() {
        let host = nodes_at(&[Vec3::ZERO]);
        let mut model = SelectorModel::<u32>::default();
        model.add_node(0);
        model.setup_view(&front_camera(), &host).unwrap();

        model.process_selection(Vec2::new(500.0, 300.0));
        model
            .process_activation(Vec2::new(500.0, 300.0), true, &host)
            .unwrap();
        // x = 100 px / 400 px * tan(45) * aspect * 10 = 10/3.
        let picked = model.pick_position(Vec2::new(500.0, 300.0)).unwrap();
        assert!((picked - Vec3::new(10.0 / 3.0, 0.0, 0.0)).length() < 1e-3);
        assert!(model.pick_offset(Vec2::new(500.0, 300.0)).length() < 1e-3);

        let moved = model.pick_offset(Vec2::new(560.0, 300.0));
        assert!((moved - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-3);
        model.process_activation(Vec2::ZERO, false, &host).unwrap();

        model.process_selection(Vec2::new(438.0, 280.0));
        model
            .process_activation(Vec2::new(438.0, 280.0), true, &host)
            .unwrap();
        let picked = model.pick_position(Vec2::new(400.0, 240.0)).unwrap();
        assert!((picked - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-3);
    }
}
