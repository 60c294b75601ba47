use indexmap::{IndexMap, IndexSet};
use schemeconv_plist::{NodeKind, TreeNode};
use tracing::debug;

use crate::OrderedDict;

/// A hexadecimal color string found in the theme.
///
/// Alpha-bearing literals (`#RRGGBBAA`) are kept apart from their opaque base even
/// when the first six digits match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColorLiteral {
    Opaque(String),
    Alpha(String),
}

impl ColorLiteral {
    /// Classifies `text` as `#RRGGBB` or `#RRGGBBAA`; anything else is plain text.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let hex = text.strip_prefix('#')?;
        if !hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            6 => Some(ColorLiteral::Opaque(text.to_string())),
            8 => Some(ColorLiteral::Alpha(text.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ColorLiteral::Opaque(text) | ColorLiteral::Alpha(text) => text,
        }
    }

    pub fn is_alpha(&self) -> bool {
        matches!(self, ColorLiteral::Alpha(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    pub id: String,
    pub literal: ColorLiteral,
    pub definition: String,
}

/// Deduplicated colors of one theme, in first-seen document order.
/// 主題中去重後的色彩表，依首次出現順序排列。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    entries: IndexMap<ColorLiteral, PaletteEntry>,
    references: IndexMap<String, String>,
}

impl Palette {
    /// Scans every string under `root` and builds the palette in two passes:
    /// discovery assigns ids, then alpha literals are composed against their base.
    pub fn build(root: &TreeNode) -> Self {
        let mut discovered = IndexSet::new();
        collect_literals(root, &mut discovered);

        let mut palette = Palette::default();
        for (index, literal) in discovered.iter().enumerate() {
            let id = color_id(index);
            let definition = match literal {
                ColorLiteral::Opaque(text) => text.clone(),
                ColorLiteral::Alpha(text) => {
                    let (base, alpha) = split_alpha(text);
                    let base_index =
                        discovered.get_index_of(&ColorLiteral::Opaque(base.to_string()));
                    palette.references.insert(text.clone(), id.clone());
                    match base_index {
                        Some(base_index) => {
                            format!("color(var({}) alpha({alpha:.2}))", color_id(base_index))
                        }
                        None => format!("color({base} alpha({alpha:.2}))"),
                    }
                }
            };
            palette.entries.insert(
                literal.clone(),
                PaletteEntry {
                    id,
                    literal: literal.clone(),
                    definition,
                },
            );
        }

        debug!(
            colors = palette.entries.len(),
            alpha = palette.references.len(),
            "built color palette"
        );
        palette
    }

    /// Returns the palette id a value should reference, if it is a known color.
    pub fn resolve(&self, text: &str) -> Option<&str> {
        match ColorLiteral::parse(text)? {
            ColorLiteral::Alpha(text) => self.references.get(&text).map(String::as_str),
            literal => self.entries.get(&literal).map(|entry| entry.id.as_str()),
        }
    }

    pub fn get(&self, literal: &ColorLiteral) -> Option<&PaletteEntry> {
        self.entries.get(literal)
    }

    pub fn entries(&self) -> impl Iterator<Item = &PaletteEntry> {
        self.entries.values()
    }

    /// Alpha-bearing literal → id. Working state only; never serialized.
    pub fn references(&self) -> &IndexMap<String, String> {
        &self.references
    }

    /// The `variables` section: id → definition.
    pub fn variables(&self) -> OrderedDict {
        self.entries
            .values()
            .map(|entry| (entry.id.clone(), entry.definition.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn collect_literals(node: &TreeNode, discovered: &mut IndexSet<ColorLiteral>) {
    if node.kind() == &NodeKind::String {
        if let Some(literal) = node.text().and_then(ColorLiteral::parse) {
            discovered.insert(literal);
        }
    }
    for child in node.children() {
        collect_literals(child, discovered);
    }
}

fn color_id(index: usize) -> String {
    format!("color{index:02}")
}

/// Splits a parsed `#RRGGBBAA` literal into its `#RRGGBB` base and the alpha as a
/// fraction of 255.
fn split_alpha(text: &str) -> (&str, f64) {
    let (base, alpha_hex) = text.split_at(7);
    let alpha = u8::from_str_radix(alpha_hex, 16).map_or(0.0, |alpha| f64::from(alpha) / 255.0);
    (base, alpha)
}
