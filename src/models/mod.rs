mod user;
mod forms;
mod task;

pub use user::{User, Role, SimulatedUser, UserRecord};
pub use forms::{LoginRequest, RegisterRequest, AuthResponse};
pub use task::{
    Task, TaskStatus, Priority, NewTask, TaskPatch, TaskFilter, DashboardStats, kanban_columns,
};
