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


//! Headless editor session: builds a small scene, picks an entity, and replays a
//! scripted gizmo drag while logging every primitive the gizmo draws.
//!
//! Usage: `fork-editor [settings.ron]`

use anyhow::{Context, Result};
use fork_core::math::{Aabb, Mat4, Vec2, Vec3, FRAC_PI_2};
use fork_core::{
    Camera, LinearRgba, PrimitiveRenderer, Projection, RenderError, Transform, Viewport,
};
use fork_editor::{Entity, EntitySelector, EntitySelectorConfig, EntityStore, Modifiers};
use fork_selector::{MouseButton, RasterMode, SelectorSettings, TransformMode};

/// Writes every primitive to the log instead of a surface.
#[derive(Debug, Default)]
struct LogRenderer {
    primitives: usize,
}

impl PrimitiveRenderer for LogRenderer {
    fn begin_3d(&mut self, _view_projection: &Mat4) -> Result<(), RenderError> {
        log::trace!("begin 3d");
        Ok(())
    }

    fn draw_line(
        &mut self,
        start: Vec3,
        end: Vec3,
        color: LinearRgba,
        width: f32,
    ) -> Result<(), RenderError> {
        self.primitives += 1;
        log::debug!("line {start:?} -> {end:?} {color:?} width {width}");
        Ok(())
    }

    fn draw_quad(&mut self, corners: [Vec3; 4], color: LinearRgba) -> Result<(), RenderError> {
        self.primitives += 1;
        log::debug!("quad {corners:?} {color:?}");
        Ok(())
    }

    fn end_3d(&mut self) -> Result<(), RenderError> {
        log::trace!("end 3d ({} primitives so far)", self.primitives);
        Ok(())
    }

    fn begin_2d(&mut self) -> Result<(), RenderError> {
        log::trace!("begin 2d");
        Ok(())
    }

    fn draw_text(
        &mut self,
        position: Vec2,
        text: &str,
        color: LinearRgba,
    ) -> Result<(), RenderError> {
        self.primitives += 1;
        log::debug!("text '{text}' at {position:?} {color:?}");
        Ok(())
    }

    fn end_2d(&mut self) -> Result<(), RenderError> {
        log::trace!("end 2d");
        Ok(())
    }
}

fn load_settings() -> Result<SelectorSettings> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read selector settings from '{path}'"))?;
            let settings = SelectorSettings::from_ron(&text)
                .with_context(|| format!("Failed to parse '{path}'"))?;
            log::info!("Loaded selector settings from '{path}'");
            Ok(settings)
        }
        None => Ok(SelectorSettings::default()),
    }
}

fn build_scene(store: &mut EntityStore) {
    let unit_box = Aabb::from_min_max(Vec3::splat(-0.5), Vec3::splat(0.5));
    store.spawn(
        Entity::new("ground", Transform::from_position(Vec3::new(0.0, -3.0, 0.0)))
            .with_bounds(Aabb::from_min_max(
                Vec3::new(-10.0, -0.1, -10.0),
                Vec3::new(10.0, 0.1, 10.0),
            )),
    );
    let crate_id = store.spawn(Entity::new("crate", Transform::IDENTITY).with_bounds(unit_box));
    store.spawn(
        Entity::new("lamp", Transform::from_position(Vec3::new(0.0, 1.0, 0.0)))
            .with_bounds(unit_box)
            .with_parent(crate_id),
    );
}

fn log_scene(store: &EntityStore) {
    for (id, entity) in store.iter() {
        let world = store
            .global_matrix(id)
            .map(|m| m.translation())
            .unwrap_or(Vec3::ZERO);
        log::info!(
            "{id} '{}' local {:?} world {:?} ({} edits)",
            entity.name,
            entity.transform.position,
            world,
            entity.revision()
        );
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = load_settings()?;
    let mut store = EntityStore::new();
    build_scene(&mut store);

    let camera = Camera::new(
        Transform::from_position(Vec3::new(0.0, 0.0, 10.0)),
        Projection::perspective(FRAC_PI_2, 0.1, 100.0, Viewport::default()),
    );
    let config = EntitySelectorConfig {
        draw_axes_labels: true,
        draw_prev_transform: true,
        ..Default::default()
    };

    let mut editor = EntitySelector::with_settings(LogRenderer::default(), settings)?;
    editor.setup_view(&camera, &store)?;

    let center = Vec2::new(400.0, 300.0);
    let picked = editor
        .pick_at(&mut store, center, Modifiers::NONE)?
        .context("Nothing under the cursor")?;
    log::info!("Picked {picked}");

    // Drag the X handle 120px to the right.
    editor.setup_view(&camera, &store)?;
    editor.on_local_motion(&mut store, Vec2::new(500.0, 300.0))?;
    editor.on_button_down(&mut store, MouseButton::Left)?;
    for _ in 0..3 {
        editor.on_global_motion(&mut store, Vec2::new(40.0, 0.0))?;
        editor.draw(&config)?;
    }
    editor.on_button_up(&mut store, MouseButton::Left)?;
    log_scene(&store);

    // Same drag with relative snapping: only whole grid steps reach the crate.
    editor.setup_raster(RasterMode::Relative);
    editor.setup_raster_size(3)?;
    editor.setup_view(&camera, &store)?;
    let handle = camera
        .project_world(editor.selector().model().transform().position + Vec3::X)
        .map(|p| Vec2::new(p.x, p.y))
        .context("Gizmo is behind the camera")?;
    editor.on_local_motion(&mut store, handle)?;
    editor.on_button_down(&mut store, MouseButton::Left)?;
    editor.on_global_motion(&mut store, Vec2::new(30.0, 0.0))?;
    editor.on_button_up(&mut store, MouseButton::Left)?;
    editor.setup_raster(RasterMode::None);
    log_scene(&store);

    // Duplicate the lamp and rotate both copies.
    let lamp = store
        .iter()
        .find(|(_, e)| e.name == "lamp")
        .map(|(id, _)| id)
        .context("Scene has no lamp")?;
    editor.select_with_modifier(&mut store, Some(lamp), Modifiers::NONE)?;
    editor.copy(&store);
    editor.paste(&mut store)?;
    editor.select_with_modifier(&mut store, Some(lamp), Modifiers::SHIFT)?;
    editor.setup_transform_mode(TransformMode::Rotate);
    editor.setup_view(&camera, &store)?;
    editor.draw(&config)?;
    log::info!(
        "{} entities selected, active {:?}",
        editor.selected_entities().len(),
        editor.active_entity()
    );

    let deleted = editor.delete_selected(&mut store)?;
    log::info!("Deleted {deleted} entities, {} remain", store.len());
    log_scene(&store);
    Ok(())
}
