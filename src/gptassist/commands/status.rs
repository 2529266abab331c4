use crate::commands::CmdResult;
use crate::model::ProjectState;

pub fn run(state: &ProjectState) -> CmdResult {
    CmdResult::default().with_state(state.snapshot())
}
