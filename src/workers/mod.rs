//! Worker pieces and the movement/build/win rule engine.

pub mod rules;
pub mod worker;

pub use rules::{
    is_selectable, is_winning_move, plan_build, plan_move, select_moves, BuildPlan, MovePlan,
    MoveRecord,
};
pub use worker::{Worker, WorkerId};
