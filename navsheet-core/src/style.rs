//! Visual presets for each kind of tracker row.
//!
//! A [`StyleSheet`] maps every [`StyleTier`] to a plain [`StyleDescriptor`].
//! The planner only ever names tiers; the renderer turns descriptors into
//! `rust_xlsxwriter` formats at write time.

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder};
use std::collections::BTreeMap;

pub const FONT_NAME: &str = "Arial";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StyleTier {
    Title,
    Header,
    MainCategory,
    SubCategory,
    SubSubCategory,
    LeafLabel,
    LeafLink,
    Status,
    Separator,
}

impl StyleTier {
    pub const ALL: [StyleTier; 9] = [
        StyleTier::Title,
        StyleTier::Header,
        StyleTier::MainCategory,
        StyleTier::SubCategory,
        StyleTier::SubSubCategory,
        StyleTier::LeafLabel,
        StyleTier::LeafLink,
        StyleTier::Status,
        StyleTier::Separator,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Backend-neutral description of a cell style.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDescriptor {
    /// Solid background fill, `0xRRGGBB`.
    pub fill: Option<u32>,
    pub font_color: u32,
    pub font_size: f64,
    pub bold: bool,
    /// Thin border on all four sides.
    pub border: bool,
    pub align: TextAlign,
}

impl Default for StyleDescriptor {
    fn default() -> Self {
        Self {
            fill: None,
            font_color: 0x000000,
            font_size: 12.0,
            bold: false,
            border: false,
            align: TextAlign::Left,
        }
    }
}

impl StyleDescriptor {
    fn band(fill: u32, font_size: f64) -> Self {
        Self {
            fill: Some(fill),
            font_size,
            border: true,
            align: TextAlign::Center,
            ..Default::default()
        }
    }

    /// Build the `rust_xlsxwriter` format for this descriptor. `indent` is
    /// only meaningful for left-aligned text.
    pub fn to_format(&self, indent: u8) -> Format {
        let mut format = Format::new()
            .set_font_name(FONT_NAME)
            .set_font_size(self.font_size)
            .set_font_color(Color::RGB(self.font_color))
            .set_align(FormatAlign::VerticalCenter);

        if self.bold {
            format = format.set_bold();
        }
        if let Some(fill) = self.fill {
            format = format.set_background_color(Color::RGB(fill));
        }
        if self.border {
            format = format
                .set_border(FormatBorder::Thin)
                .set_border_color(Color::Black);
        }
        format = match self.align {
            TextAlign::Center => format.set_align(FormatAlign::Center),
            TextAlign::Left => {
                let format = format.set_align(FormatAlign::Left);
                if indent > 0 {
                    format.set_indent(indent)
                } else {
                    format
                }
            }
        };

        format
    }
}

/// Style tier → descriptor table. Built once and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    styles: BTreeMap<StyleTier, StyleDescriptor>,
}

impl StyleSheet {
    /// Presets for the documentation tracker.
    pub fn standard() -> Self {
        let mut styles = BTreeMap::new();
        styles.insert(
            StyleTier::Title,
            StyleDescriptor {
                fill: Some(0x000000),
                font_color: 0xFFFFFF,
                font_size: 18.0,
                bold: true,
                border: true,
                align: TextAlign::Center,
            },
        );
        styles.insert(
            StyleTier::Header,
            StyleDescriptor {
                bold: true,
                border: true,
                align: TextAlign::Center,
                ..Default::default()
            },
        );
        styles.insert(StyleTier::MainCategory, StyleDescriptor::band(0x9FC5E8, 12.0));
        styles.insert(StyleTier::SubCategory, StyleDescriptor::band(0xFFE599, 10.0));
        styles.insert(StyleTier::SubSubCategory, StyleDescriptor::band(0xDDE599, 8.0));
        styles.insert(StyleTier::LeafLabel, StyleDescriptor::default());
        styles.insert(
            StyleTier::LeafLink,
            StyleDescriptor {
                font_color: 0x0563C1,
                font_size: 10.0,
                ..Default::default()
            },
        );
        styles.insert(
            StyleTier::Status,
            StyleDescriptor {
                font_size: 10.0,
                align: TextAlign::Center,
                ..Default::default()
            },
        );
        styles.insert(
            StyleTier::Separator,
            StyleDescriptor {
                font_size: 8.0,
                ..Default::default()
            },
        );

        Self { styles }
    }

    /// Return a copy with `tier` replaced.
    pub fn with(mut self, tier: StyleTier, descriptor: StyleDescriptor) -> Self {
        self.styles.insert(tier, descriptor);
        self
    }

    pub fn get(&self, tier: StyleTier) -> &StyleDescriptor {
        // every tier is inserted by `standard` and `with` never removes one
        &self.styles[&tier]
    }

    pub fn format(&self, tier: StyleTier) -> Format {
        self.get(tier).to_format(0)
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::standard()
    }
}
