use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Blueprint for new pieces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTemplate {
    pub text: String,
    pub width: NonZeroU32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_ref: Option<String>,
}

impl ItemTemplate {
    /// Returns `None` for a zero width.
    pub fn new(text: impl Into<String>, width: u32) -> Option<Self> {
        Some(ItemTemplate {
            text: text.into(),
            width: NonZeroU32::new(width)?,
            visual_ref: None,
        })
    }

    pub fn with_visual(mut self, visual_ref: impl Into<String>) -> Self {
        self.visual_ref = Some(visual_ref.into());
        self
    }
}

const PIECE_VISUAL: &str = "assets/45123202_9121422.svg";

// (text, width, has visual)
const TEMPLATE_PRESETS: &[(&str, u32, bool)] = &[
    ("Tiny", 10, false),
    ("Small", 20, true),
    ("Medium", 40, false),
    ("Large", 60, false),
    ("Big", 800, false),
    ("Huge", 100, true),
];

const STARTER_PIECES: &[(&str, u32)] = &[
    ("Small", 20),
    ("Medium", 40),
    ("Large", 60),
    ("Tiny", 10),
    ("Big", 80),
];

fn preset_template(text: &str, width: u32) -> ItemTemplate {
    ItemTemplate {
        text: text.to_string(),
        width: NonZeroU32::new(width).unwrap_or(NonZeroU32::MIN),
        visual_ref: None,
    }
}

/// Pieces a new editing session starts with in the available pool.
pub fn starter_templates() -> Vec<ItemTemplate> {
    STARTER_PIECES
        .iter()
        .map(|&(text, width)| preset_template(text, width))
        .collect()
}

/// Ordered, user-extensible list of templates.
#[derive(Debug, Clone)]
pub struct ItemTemplateCatalog {
    templates: Vec<ItemTemplate>,
}

impl ItemTemplateCatalog {
    pub fn builtin() -> Self {
        let templates = TEMPLATE_PRESETS
            .iter()
            .map(|&(text, width, visual)| {
                let template = preset_template(text, width);
                if visual {
                    template.with_visual(PIECE_VISUAL)
                } else {
                    template
                }
            })
            .collect();
        ItemTemplateCatalog { templates }
    }

    pub fn empty() -> Self {
        ItemTemplateCatalog {
            templates: Vec::new(),
        }
    }

    pub fn all(&self) -> &[ItemTemplate] {
        &self.templates
    }

    pub fn get(&self, index: usize) -> Option<&ItemTemplate> {
        self.templates.get(index)
    }

    pub fn add(&mut self, template: ItemTemplate) {
        self.templates.push(template);
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for ItemTemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Extend<ItemTemplate> for ItemTemplateCatalog {
    fn extend<I: IntoIterator<Item = ItemTemplate>>(&mut self, iter: I) {
        self.templates.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_width_template_is_rejected() {
        assert!(ItemTemplate::new("Nothing", 0).is_none());
        assert_eq!(ItemTemplate::new("Tiny", 10).unwrap().width.get(), 10);
    }

    #[test]
    fn builtin_templates_keep_order_and_visuals() {
        let catalog = ItemTemplateCatalog::builtin();
        let widths: Vec<u32> = catalog.all().iter().map(|t| t.width.get()).collect();
        assert_eq!(widths, [10, 20, 40, 60, 800, 100]);
        assert!(catalog.get(1).unwrap().visual_ref.is_some());
        assert!(catalog.get(0).unwrap().visual_ref.is_none());
        assert!(catalog.get(6).is_none());
    }

    #[test]
    fn catalog_accepts_user_templates() {
        let mut catalog = ItemTemplateCatalog::empty();
        catalog.add(ItemTemplate::new("Bus", 75).unwrap().with_visual("bus.svg"));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().text, "Bus");
    }

    #[test]
    fn template_deserializes_from_toml_like_shape() {
        let template: ItemTemplate =
            serde_json::from_str(r#"{"text":"Gate","width":35}"#).unwrap();
        assert_eq!(template.width.get(), 35);

        let zero = serde_json::from_str::<ItemTemplate>(r#"{"text":"Gate","width":0}"#);
        assert!(zero.is_err());
    }
}
