//! Tool-call loop state machine

use serde::{Deserialize, Serialize};

/// State of a tool-call loop
///
/// ```text
///                 tool call
/// AwaitingModel ───────────▶ DispatchingTool
///      ▲  │                        │
///      │  └──── final ──▶ Done      │
///      └──────── result sent ──────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolLoopState {
    #[default]
    AwaitingModel,
    DispatchingTool,
    Done,
}

/// Event driving a [`ToolLoopState`] transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolLoopEvent {
    /// The model responded with a tool call
    ToolCallReceived,
    /// The tool result was submitted back to the model
    ToolResultSent,
    /// The model responded with a final answer
    FinalReceived,
    /// A new prompt is submitted after a previous run finished
    PromptSubmitted,
}

impl ToolLoopState {
    /// Apply an event, returning the next state or `None` if the
    /// transition is not allowed.
    pub fn next(self, event: ToolLoopEvent) -> Option<ToolLoopState> {
        use ToolLoopEvent::*;
        use ToolLoopState::*;
        match (self, event) {
            (AwaitingModel, ToolCallReceived) => Some(DispatchingTool),
            (AwaitingModel, FinalReceived) => Some(Done),
            (DispatchingTool, ToolResultSent) => Some(AwaitingModel),
            (Done, PromptSubmitted) | (AwaitingModel, PromptSubmitted) => Some(AwaitingModel),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ToolLoopState::Done)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ToolLoopState::AwaitingModel => "awaiting_model",
            ToolLoopState::DispatchingTool => "dispatching_tool",
            ToolLoopState::Done => "done",
        }
    }
}

impl std::fmt::Display for ToolLoopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        assert_eq!(ToolLoopState::default(), ToolLoopState::AwaitingModel);
    }

    #[test]
    fn test_valid_transitions() {
        let s = ToolLoopState::AwaitingModel;
        let s = s.next(ToolLoopEvent::ToolCallReceived).unwrap();
        assert_eq!(s, ToolLoopState::DispatchingTool);
        let s = s.next(ToolLoopEvent::ToolResultSent).unwrap();
        assert_eq!(s, ToolLoopState::AwaitingModel);
        let s = s.next(ToolLoopEvent::FinalReceived).unwrap();
        assert!(s.is_terminal());
        let s = s.next(ToolLoopEvent::PromptSubmitted).unwrap();
        assert_eq!(s, ToolLoopState::AwaitingModel);
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(ToolLoopState::Done.next(ToolLoopEvent::ToolCallReceived).is_none());
        assert!(ToolLoopState::DispatchingTool.next(ToolLoopEvent::FinalReceived).is_none());
        assert!(ToolLoopState::AwaitingModel.next(ToolLoopEvent::ToolResultSent).is_none());
    }
}
