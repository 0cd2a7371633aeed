use serde::{Deserialize, Serialize};

/// Lifecycle label of an activity, derived from its progress percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ActivityStatus {
    #[default]
    #[serde(alias = "Não Iniciado")]
    NotStarted,
    #[serde(alias = "Em Andamento")]
    InProgress,
    #[serde(alias = "Concluído", alias = "Concluída")]
    Completed,
    #[serde(alias = "Cancelado")]
    Cancelled,
}

impl ActivityStatus {
    pub const ALL: [ActivityStatus; 4] = [
        ActivityStatus::NotStarted,
        ActivityStatus::InProgress,
        ActivityStatus::Completed,
        ActivityStatus::Cancelled,
    ];

    /// `-1` cancelled, `0` not started, `1..=99` in progress, `100` completed.
    /// Any other value falls back to [`ActivityStatus::NotStarted`].
    pub fn from_progress(progress: i32) -> Self {
        match progress {
            -1 => ActivityStatus::Cancelled,
            0 => ActivityStatus::NotStarted,
            1..=99 => ActivityStatus::InProgress,
            100 => ActivityStatus::Completed,
            _ => ActivityStatus::NotStarted,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::NotStarted => "NotStarted",
            ActivityStatus::InProgress => "InProgress",
            ActivityStatus::Completed => "Completed",
            ActivityStatus::Cancelled => "Cancelled",
        }
    }

    /// Label stored by the legacy panel.
    pub fn legacy_label(&self) -> &'static str {
        match self {
            ActivityStatus::NotStarted => "Não Iniciado",
            ActivityStatus::InProgress => "Em Andamento",
            ActivityStatus::Completed => "Concluído",
            ActivityStatus::Cancelled => "Cancelado",
        }
    }
}

impl std::fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActivityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "notstarted" | "não iniciado" => Ok(ActivityStatus::NotStarted),
            "inprogress" | "em andamento" => Ok(ActivityStatus::InProgress),
            "completed" | "concluído" | "concluída" => Ok(ActivityStatus::Completed),
            "cancelled" | "cancelado" => Ok(ActivityStatus::Cancelled),
            _ => Err(format!("Unknown activity status: {}", s)),
        }
    }
}

/// Whether an activity's due date has already passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScheduleState {
    #[default]
    #[serde(alias = "Dentro do Prazo")]
    OnTime,
    #[serde(alias = "Fora do Prazo")]
    Late,
}

impl ScheduleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleState::OnTime => "OnTime",
            ScheduleState::Late => "Late",
        }
    }

    pub fn legacy_label(&self) -> &'static str {
        match self {
            ScheduleState::OnTime => "Dentro do Prazo",
            ScheduleState::Late => "Fora do Prazo",
        }
    }
}

impl std::fmt::Display for ScheduleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ScheduleState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ontime" | "dentro do prazo" => Ok(ScheduleState::OnTime),
            "late" | "fora do prazo" => Ok(ScheduleState::Late),
            _ => Err(format!("Unknown schedule state: {}", s)),
        }
    }
}
