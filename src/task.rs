//! Task selection and the prompt each task produces.

use serde::Serialize;
use std::str::FromStr;

/// What kind of content to ask the model for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    #[default]
    Titles,
    FullBlog,
    Topics,
}

impl Task {
    pub const ALL: [Task; 3] = [Task::Titles, Task::FullBlog, Task::Topics];

    /// Form value sent by the task select.
    pub fn slug(self) -> &'static str {
        match self {
            Task::Titles => "titles",
            Task::FullBlog => "full_blog",
            Task::Topics => "topics",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Task::Titles => "Generate Blog Titles",
            Task::FullBlog => "Generate Full Blog",
            Task::Topics => "Get Blog Topics",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task {0:?}")]
pub struct UnknownTask(pub String);

impl FromStr for Task {
    type Err = UnknownTask;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Task::ALL
            .into_iter()
            .find(|task| task.slug() == s || task.label() == s)
            .ok_or_else(|| UnknownTask(s.to_string()))
    }
}

/// Turns a task and a topic into the instruction sent to the model.
///
/// The topic is substituted verbatim, empty or not.
pub fn build_prompt(task: Task, topic: &str) -> String {
    match task {
        Task::Titles => format!("Suggest 5 creative and engaging blog titles about: {topic}"),
        Task::FullBlog => format!("Write a 300-word blog article on: {topic}"),
        Task::Topics => format!("Give 5 blog topic ideas related to: {topic}"),
    }
}
