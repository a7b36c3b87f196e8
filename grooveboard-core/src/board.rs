use serde::{Deserialize, Serialize};

/// A board size preset. `capacity` is the groove width every row shares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSize {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub board_width: u32,
    pub capacity: u32,
    #[serde(default)]
    pub price: String,
    #[serde(default = "in_stock_default")]
    pub in_stock: bool,
}

fn in_stock_default() -> bool {
    true
}

struct BoardPreset {
    key: &'static str,
    name: &'static str,
    label: &'static str,
    description: &'static str,
    board_width: u32,
    capacity: u32,
    price: &'static str,
}

pub const DEFAULT_BOARD_KEY: &str = "medium";

const BOARD_PRESETS: &[BoardPreset] = &[
    BoardPreset {
        key: "small",
        name: "Small",
        label: "Small (10 inch)",
        description: "Our smallest board, suitable for small spaces.",
        board_width: 254,
        capacity: 224,
        price: "$19.99",
    },
    BoardPreset {
        key: "medium",
        name: "Medium",
        label: "Medium (14 inch)",
        description: "A medium-sized board, perfect for most uses.",
        board_width: 355,
        capacity: 325,
        price: "$29.99",
    },
    BoardPreset {
        key: "large",
        name: "Large",
        label: "Large (18 inch)",
        description: "A large board for bigger projects.",
        board_width: 457,
        capacity: 427,
        price: "$39.99",
    },
];

impl From<&BoardPreset> for BoardSize {
    fn from(preset: &BoardPreset) -> Self {
        BoardSize {
            key: preset.key.to_string(),
            name: preset.name.to_string(),
            label: preset.label.to_string(),
            description: preset.description.to_string(),
            board_width: preset.board_width,
            capacity: preset.capacity,
            price: preset.price.to_string(),
            in_stock: true,
        }
    }
}

/// Ordered lookup of board presets.
#[derive(Debug, Clone)]
pub struct BoardCatalog {
    boards: Vec<BoardSize>,
}

impl BoardCatalog {
    /// Catalog holding the built-in presets.
    pub fn builtin() -> Self {
        BoardCatalog {
            boards: BOARD_PRESETS.iter().map(BoardSize::from).collect(),
        }
    }

    pub fn all(&self) -> &[BoardSize] {
        &self.boards
    }

    pub fn by_key(&self, key: &str) -> Option<&BoardSize> {
        let trimmed = key.trim();
        self.boards
            .iter()
            .find(|board| board.key.eq_ignore_ascii_case(trimmed))
    }

    /// The preset a fresh session starts with.
    ///
    /// Falls back to the first preset when `medium` was configured away.
    pub fn default_board(&self) -> Option<&BoardSize> {
        self.by_key(DEFAULT_BOARD_KEY).or_else(|| self.boards.first())
    }

    /// Adds presets; one sharing a key with an existing preset replaces it in place.
    pub fn extend(&mut self, boards: impl IntoIterator<Item = BoardSize>) {
        for board in boards {
            match self
                .boards
                .iter_mut()
                .find(|existing| existing.key.eq_ignore_ascii_case(&board.key))
            {
                Some(existing) => *existing = board,
                None => self.boards.push(board),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }
}

impl Default for BoardCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_presets_in_order() {
        let catalog = BoardCatalog::builtin();
        let keys: Vec<&str> = catalog.all().iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, ["small", "medium", "large"]);
        assert_eq!(catalog.by_key("small").unwrap().capacity, 224);
        assert_eq!(catalog.by_key("large").unwrap().capacity, 427);
    }

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        let catalog = BoardCatalog::builtin();
        assert_eq!(catalog.by_key("  Medium ").unwrap().capacity, 325);
        assert!(catalog.by_key("x-large").is_none());
    }

    #[test]
    fn default_is_medium() {
        let catalog = BoardCatalog::builtin();
        assert_eq!(catalog.default_board().unwrap().name, "Medium");
    }

    #[test]
    fn extend_replaces_matching_key() {
        let mut catalog = BoardCatalog::builtin();
        let mut bigger_small = catalog.by_key("small").unwrap().clone();
        bigger_small.capacity = 230;
        let xl = BoardSize {
            key: "x-large".to_string(),
            name: "X-Large".to_string(),
            label: String::new(),
            description: String::new(),
            board_width: 600,
            capacity: 570,
            price: String::new(),
            in_stock: false,
        };

        catalog.extend([bigger_small, xl]);

        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.all()[0].capacity, 230);
        assert_eq!(catalog.all()[3].key, "x-large");
    }
}
