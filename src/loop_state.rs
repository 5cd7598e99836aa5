//! Shared frame loop state
//!
//! Used by both the browser and the native frame drivers.

/// Frame loop lifecycle. `Stopped` is terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopState {
    #[default]
    Idle,
    Running,
    Stopped,
}

impl LoopState {
    pub fn is_running(&self) -> bool {
        matches!(self, LoopState::Running)
    }
}
