//! Keyboard notifications as delivered by the host's character source.

/// Stage of keyboard processing a notification comes from. Only `Keysym`
/// notifications carry a decoded character.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum KeyAction {
    Keycode,
    UnboundKeycode,
    Keysym,
    PostKeysym,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct KeyEvent {
    pub action: KeyAction,
    /// Press (`true`) or release.
    pub down: bool,
    pub value: u8,
}

impl KeyEvent {
    /// A key press carrying a decoded character.
    pub fn press(value: u8) -> Self {
        Self {
            action: KeyAction::Keysym,
            down: true,
            value,
        }
    }

    pub fn release(value: u8) -> Self {
        Self {
            action: KeyAction::Keysym,
            down: false,
            value,
        }
    }
}

/// Reply to the notifier chain.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Notify {
    /// Not interested in this notification.
    Done,
    /// Notification consumed.
    Ok,
}
