//! Background themes.
//!
//! Themes are a closed set. Each variant maps to a static [`ThemeSpec`]
//! describing its backdrop and decoration layers, so adding or removing a
//! theme only touches [`Theme::ALL`] and [`Theme::spec`].

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Background theme behind the billboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Day,
    Night,
    Rain,
    Snowy,
}

/// A static body drawn in the sky regardless of the animation setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Celestial {
    Sun,
    Moon,
}

/// An animated decoration element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decoration {
    Cloud,
    Bird,
    Star,
    ShootingStar,
    Raindrop,
    Snowflake,
}

/// One animated decoration layer: `count` copies of `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Layer {
    pub kind: Decoration,
    pub count: u16,
}

/// Everything the host needs to paint a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeSpec {
    /// Backdrop color token understood by the host stylesheet.
    pub background: &'static str,
    pub celestial: Option<Celestial>,
    /// Animated layers, drawn back to front.
    pub layers: &'static [Layer],
}

const DAY: ThemeSpec = ThemeSpec {
    background: "sky-400",
    celestial: Some(Celestial::Sun),
    layers: &[Layer { kind: Decoration::Cloud, count: 7 }, Layer { kind: Decoration::Bird, count: 3 }],
};

const NIGHT: ThemeSpec = ThemeSpec {
    background: "slate-900",
    celestial: Some(Celestial::Moon),
    layers: &[Layer { kind: Decoration::Star, count: 80 }, Layer { kind: Decoration::ShootingStar, count: 2 }],
};

const RAIN: ThemeSpec = ThemeSpec {
    background: "slate-800",
    celestial: None,
    layers: &[Layer { kind: Decoration::Raindrop, count: 150 }],
};

const SNOWY: ThemeSpec = ThemeSpec {
    background: "slate-500",
    celestial: None,
    layers: &[Layer { kind: Decoration::Snowflake, count: 70 }],
};

impl Theme {
    /// Cycle order.
    pub const ALL: [Theme; 4] = [Theme::Day, Theme::Night, Theme::Rain, Theme::Snowy];

    /// The theme after this one, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|&t| t == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    #[must_use]
    pub fn spec(self) -> &'static ThemeSpec {
        match self {
            Self::Day => &DAY,
            Self::Night => &NIGHT,
            Self::Rain => &RAIN,
            Self::Snowy => &SNOWY,
        }
    }

    /// Layers to animate given the user's animation setting.
    #[must_use]
    pub fn active_layers(self, animations_enabled: bool) -> &'static [Layer] {
        if animations_enabled { self.spec().layers } else { &[] }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Night => "night",
            Self::Rain => "rain",
            Self::Snowy => "snowy",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized theme name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme: {0}")]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTheme(s.to_owned()))
    }
}
