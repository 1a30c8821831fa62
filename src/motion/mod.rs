//! Cursor motion: trajectory planning, step cadence, execution and clicks

pub mod clicker;
pub mod easing;
pub mod executor;
pub mod trajectory;

pub use clicker::{ClickOptions, Clicker};
pub use easing::{easing_factor, StepTiming};
pub use executor::{Motion, MotionExecutor, MotionKind, MotionOptions};
pub use trajectory::{plan, plan_with, Trajectory, TrajectoryPoint};
