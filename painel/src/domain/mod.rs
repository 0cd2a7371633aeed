mod activity;
mod assignees;
mod person;
mod project;
mod status;
mod subtask;

pub use activity::*;
pub use assignees::*;
pub use person::*;
pub use project::*;
pub use status::*;
pub use subtask::*;
