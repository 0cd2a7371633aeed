mod activities;
mod projects;

pub use activities::ActivityService;
pub use projects::ProjectService;
