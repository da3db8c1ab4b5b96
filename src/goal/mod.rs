//! Savings goals: the goal table, progress arithmetic and the goal pages.

mod core;
mod create_endpoint;
mod create_page;
mod detail_page;
mod goals_page;
mod progress;

pub use core::{
    GoalWithHistory, SavingsGoal, create_goal, create_goal_table, get_goal,
    list_goals_with_history,
};
pub use create_endpoint::{CreateGoalEndpointState, create_goal_endpoint};
pub use create_page::get_new_goal_page;
pub use detail_page::{GoalDetailPageState, get_goal_detail_page};
pub use goals_page::{GoalsPageState, get_goals_page};
pub use progress::GoalSummary;
