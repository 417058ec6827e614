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


//! Pointer input routing for a [`Selector`].

use fork_core::math::Vec2;

use crate::selectable::{SelectionHost, SelectionKey};
use crate::selector::{Selector, SelectorError};

/// A mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button. Starts and ends drags.
    Left,
    /// Secondary button. Cancels a running drag.
    Right,
    /// Middle button. Ignored by the gizmo.
    Middle,
}

/// Translates mouse events into selector operations.
///
/// Every handler returns `true` when the gizmo consumed the event, that is while a
/// handle is hovered or a drag is running. Unconsumed events should reach the rest of
/// the application (camera controls, object picking).
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseEventHandler {
    pointer: Vec2,
}

impl MouseEventHandler {
    /// Creates a handler with the pointer at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// The last pointer position seen by [`on_local_motion`](Self::on_local_motion).
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Left starts a drag on the hovered handle; right cancels a running drag.
    pub fn on_button_down<K, H>(
        &mut self,
        selector: &mut Selector<K>,
        host: &mut H,
        button: MouseButton,
    ) -> Result<bool, SelectorError>
    where
        K: SelectionKey,
        H: SelectionHost<K> + ?Sized,
    {
        match button {
            MouseButton::Left => {
                let model = selector.model();
                if model.any_nodes_selected() && model.is_any_selected() {
                    selector.on_transform_begin(host)?;
                    selector
                        .model_mut()
                        .process_activation(self.pointer, true, &*host)?;
                    return Ok(true);
                }
            }
            MouseButton::Right => {
                if selector.model().is_active() {
                    selector.model_mut().cancel_activation(host)?;
                    selector.model_mut().process_selection(self.pointer);
                    selector.on_transform_end(host)?;
                    return Ok(true);
                }
            }
            MouseButton::Middle => {}
        }
        Ok(self.is_consuming(selector))
    }

    /// Left release ends a running drag.
    pub fn on_button_up<K, H>(
        &mut self,
        selector: &mut Selector<K>,
        host: &mut H,
        button: MouseButton,
    ) -> Result<bool, SelectorError>
    where
        K: SelectionKey,
        H: SelectionHost<K> + ?Sized,
    {
        if button == MouseButton::Left && selector.model().is_active() {
            selector
                .model_mut()
                .process_activation(self.pointer, false, &*host)?;
            selector.model_mut().process_selection(self.pointer);
            selector.on_transform_end(host)?;
            return Ok(true);
        }
        Ok(self.is_consuming(selector))
    }

    /// Pointer moved within the view: updates hover and drives picked translation.
    pub fn on_local_motion<K, H>(
        &mut self,
        selector: &mut Selector<K>,
        host: &mut H,
        position: Vec2,
    ) -> Result<bool, SelectorError>
    where
        K: SelectionKey,
        H: SelectionHost<K> + ?Sized,
    {
        self.pointer = position;
        if selector.model().any_nodes_selected() {
            selector.model_mut().process_selection(position);
            selector.process_absolute_transform(position, host)?;
        }
        Ok(self.is_consuming(selector))
    }

    /// Raw pointer motion: drives relative transforms.
    pub fn on_global_motion<K, H>(
        &mut self,
        selector: &mut Selector<K>,
        host: &mut H,
        motion: Vec2,
    ) -> Result<bool, SelectorError>
    where
        K: SelectionKey,
        H: SelectionHost<K> + ?Sized,
    {
        selector.process_relative_transform(motion, host)?;
        Ok(selector.model().is_active())
    }

    /// The view lost focus: a running drag is cancelled and hover state cleared.
    pub fn on_lost_focus<K, H>(
        &mut self,
        selector: &mut Selector<K>,
        host: &mut H,
    ) -> Result<(), SelectorError>
    where
        K: SelectionKey,
        H: SelectionHost<K> + ?Sized,
    {
        if selector.model_mut().cancel_activation(host)? {
            selector.on_transform_end(host)?;
        }
        selector.model_mut().reset_selection();
        Ok(())
    }

    fn is_consuming<K: SelectionKey>(&self, selector: &Selector<K>) -> bool {
        let model = selector.model();
        model.is_active() || model.is_any_selected()
    }
}
