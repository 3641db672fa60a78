use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Frame colors handed out to new subjects, in order
pub const SUBJECT_COLORS: [&str; 6] = [
    "#ff5555", "#55ff55", "#5555ff", "#ffaa00", "#aa00aa", "#00aaaa",
];

/// Item shown on a subject's bookshelf frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectIcon {
    #[default]
    Book,
    Sword,
    Pickaxe,
    Potion,
    Redstone,
}

impl FromStr for SubjectIcon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "book" => Ok(SubjectIcon::Book),
            "sword" => Ok(SubjectIcon::Sword),
            "pickaxe" => Ok(SubjectIcon::Pickaxe),
            "potion" => Ok(SubjectIcon::Potion),
            "redstone" => Ok(SubjectIcon::Redstone),
            _ => Err(format!(
                "Invalid icon '{}'. Valid options are: book, sword, pickaxe, potion, redstone",
                s
            )),
        }
    }
}

impl fmt::Display for SubjectIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubjectIcon::Book => "book",
            SubjectIcon::Sword => "sword",
            SubjectIcon::Pickaxe => "pickaxe",
            SubjectIcon::Potion => "potion",
            SubjectIcon::Redstone => "redstone",
        };
        f.write_str(name)
    }
}

/// A book on the bookshelf; tasks point at it through `subject_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub icon: SubjectIcon,
}

/// Insert request for a new subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSubject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub name: String,
    pub color: String,
    pub icon: SubjectIcon,
}

impl NewSubject {
    /// Color for the `n`th subject of a player, cycling through [`SUBJECT_COLORS`]
    pub fn palette_color(n: usize) -> String {
        SUBJECT_COLORS[n % SUBJECT_COLORS.len()].to_string()
    }
}

impl Subject {
    pub fn from_new(new: NewSubject, id: String) -> Self {
        Self {
            id,
            user_id: new.user_id,
            name: new.name,
            color: new.color,
            icon: new.icon,
        }
    }
}
