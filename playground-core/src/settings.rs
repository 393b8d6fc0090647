//! Player-facing settings and the key-to-action table.
//!
//! `SettingsState` is owned by whoever runs a game session; nothing here is global.

use serde::{Deserialize, Serialize};

pub const MIN_SENSITIVITY: f32 = 0.001;
pub const MAX_SENSITIVITY: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputAction {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
    Pickup,
    Throw,
    ToggleCamera,
}

impl InputAction {
    pub const ALL: [InputAction; 8] = [
        InputAction::Forward,
        InputAction::Backward,
        InputAction::Left,
        InputAction::Right,
        InputAction::Jump,
        InputAction::Pickup,
        InputAction::Throw,
        InputAction::ToggleCamera,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keybinds {
    pub forward: String,
    pub backward: String,
    pub left: String,
    pub right: String,
    pub jump: String,
    pub pickup: String,
    pub throw: String,
    pub toggle_camera: String,
}

impl Keybinds {
    pub fn get(&self, action: InputAction) -> &str {
        match action {
            InputAction::Forward => &self.forward,
            InputAction::Backward => &self.backward,
            InputAction::Left => &self.left,
            InputAction::Right => &self.right,
            InputAction::Jump => &self.jump,
            InputAction::Pickup => &self.pickup,
            InputAction::Throw => &self.throw,
            InputAction::ToggleCamera => &self.toggle_camera,
        }
    }

    fn slot_mut(&mut self, action: InputAction) -> &mut String {
        match action {
            InputAction::Forward => &mut self.forward,
            InputAction::Backward => &mut self.backward,
            InputAction::Left => &mut self.left,
            InputAction::Right => &mut self.right,
            InputAction::Jump => &mut self.jump,
            InputAction::Pickup => &mut self.pickup,
            InputAction::Throw => &mut self.throw,
            InputAction::ToggleCamera => &mut self.toggle_camera,
        }
    }
}

impl Default for Keybinds {
    fn default() -> Self {
        Self {
            forward: "KeyW".into(),
            backward: "KeyS".into(),
            left: "KeyA".into(),
            right: "KeyD".into(),
            jump: "Space".into(),
            pickup: "KeyE".into(),
            throw: "KeyF".into(),
            toggle_camera: "KeyC".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub sensitivity: f32,
    pub keybinds: Keybinds,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            sensitivity: 0.002,
            keybinds: Keybinds::default(),
        }
    }
}

/// Editable settings plus the defaults they reset to.
#[derive(Debug, Clone)]
pub struct SettingsState {
    defaults: GameSettings,
    current: GameSettings,
}

impl SettingsState {
    pub fn new(defaults: GameSettings) -> Self {
        Self {
            current: defaults.clone(),
            defaults,
        }
    }

    pub fn current(&self) -> &GameSettings {
        &self.current
    }

    pub fn set_sensitivity(&mut self, value: f32) {
        self.current.sensitivity = value.clamp(MIN_SENSITIVITY, MAX_SENSITIVITY);
    }

    /// `key` is either a physical key code (`KeyW`) or a logical key name.
    /// Arrow keys keep their logical name; anything else is stored as given.
    pub fn rebind(&mut self, action: InputAction, key: &str, code: &str) {
        let stored = match key {
            "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" => key,
            _ => code,
        };
        *self.current.keybinds.slot_mut(action) = stored.to_owned();
    }

    pub fn reset(&mut self) {
        self.current = self.defaults.clone();
    }

    /// First action bound to `code`, in `InputAction::ALL` order.
    pub fn action_for(&self, code: &str) -> Option<InputAction> {
        InputAction::ALL
            .into_iter()
            .find(|action| self.current.keybinds.get(*action) == code)
    }
}

impl Default for SettingsState {
    fn default() -> Self {
        Self::new(GameSettings::default())
    }
}
