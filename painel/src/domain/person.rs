use serde::{Deserialize, Serialize};

fn default_person_status() -> String {
    "Ativo".to_string()
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub department: String,
    #[serde(default = "default_person_status")]
    pub status: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub notes: String,
}

impl Person {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            email: String::new(),
            phone: String::new(),
            role: String::new(),
            department: String::new(),
            status: default_person_status(),
            active: true,
            notes: String::new(),
        }
    }
}
