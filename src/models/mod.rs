pub mod task;
pub mod user;

pub use task::{
    CreateTask, StatusUpdate, TaskDetail, TaskListQuery, TaskPage, TaskPriority, TaskStatus,
    UpdateTask,
};
pub use user::{NewUser, Role, User, UserSummary};
