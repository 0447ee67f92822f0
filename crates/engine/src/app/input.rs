#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    RequestPath,
    ToggleDebug,
    Quit,
}

const ACTION_COUNT: usize = 7;

impl InputAction {
    pub const ALL: [InputAction; ACTION_COUNT] = [
        InputAction::MoveUp,
        InputAction::MoveDown,
        InputAction::MoveLeft,
        InputAction::MoveRight,
        InputAction::RequestPath,
        InputAction::ToggleDebug,
        InputAction::Quit,
    ];

    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::RequestPath => 4,
            InputAction::ToggleDebug => 5,
            InputAction::Quit => 6,
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "up" => Some(Self::MoveUp),
            "down" => Some(Self::MoveDown),
            "left" => Some(Self::MoveLeft),
            "right" => Some(Self::MoveRight),
            "path" => Some(Self::RequestPath),
            "debug" => Some(Self::ToggleDebug),
            "quit" => Some(Self::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

/// Per-tick view of the input collaborator.
///
/// The simulation never owns keyboard state; whoever drives the frames builds
/// one of these each tick. `RequestPath` and `ToggleDebug` are treated as
/// one-shot commands, so the driver should report them only on the tick the
/// key went down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn from_actions(actions: &[InputAction]) -> Self {
        actions.iter().fold(Self::empty(), |snapshot, action| {
            snapshot.with_action_down(*action, true)
        })
    }

    pub fn quit_requested(&self) -> bool {
        self.is_down(InputAction::Quit)
    }
}
