use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of business categories, addressed by a short numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Restaurantes,
    Clinicas,
    Barberias,
    Hoteles,
}

impl Category {
    pub const ALL: [Category; 4] =
        [Category::Restaurantes, Category::Clinicas, Category::Barberias, Category::Hoteles];

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.display_name() == name)
    }

    pub const fn code(self) -> &'static str {
        match self {
            Category::Restaurantes => "1",
            Category::Clinicas => "2",
            Category::Barberias => "3",
            Category::Hoteles => "4",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Category::Restaurantes => "Restaurantes",
            Category::Clinicas => "Clinicas",
            Category::Barberias => "Barberias",
            Category::Hoteles => "Hoteles",
        }
    }

    /// `1=Restaurantes, 2=Clinicas, ...`, used in error details.
    pub fn valid_options() -> String {
        Self::ALL
            .iter()
            .map(|c| format!("{}={}", c.code(), c.display_name()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Document of the category reference collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: String,
    pub nombre: String,
}

impl From<Category> for CategoryRef {
    fn from(c: Category) -> Self {
        Self { id: c.code().to_string(), nombre: c.display_name().to_string() }
    }
}
