use serde::{Deserialize, Serialize};

use crate::foundation::error::MemoireError;

/// The fixed theme catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeKey {
    Coquette,
    #[default]
    Valentines,
    SummerFruits,
    CherryGirl,
    BossBabe,
}

/// Which of a theme's two backgrounds is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundVariant {
    #[default]
    Main,
    Alt,
}

/// A theme: two background variants, a sticker set and display metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub key: ThemeKey,
    pub name: String,
    pub ui_card_url: String,
    pub background_main_url: String,
    pub background_alt_url: String,
    pub stickers: Vec<String>,
    pub class_name: String,
}

impl ThemeConfig {
    pub fn background_url(&self, variant: BackgroundVariant) -> &str {
        match variant {
            BackgroundVariant::Main => &self.background_main_url,
            BackgroundVariant::Alt => &self.background_alt_url,
        }
    }
}

impl ThemeKey {
    pub const ALL: [ThemeKey; 5] = [
        ThemeKey::Coquette,
        ThemeKey::Valentines,
        ThemeKey::SummerFruits,
        ThemeKey::CherryGirl,
        ThemeKey::BossBabe,
    ];

    /// Directory and file-name slug for this theme.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Coquette => "coquette",
            Self::Valentines => "valentines",
            Self::SummerFruits => "summerfruits",
            Self::CherryGirl => "cherrygirl",
            Self::BossBabe => "bossbabe",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Coquette => "coquette",
            Self::Valentines => "valentines",
            Self::SummerFruits => "summer-fruits",
            Self::CherryGirl => "cherry-girl",
            Self::BossBabe => "boss-babe",
        }
    }

    pub fn config(self) -> ThemeConfig {
        let (name, class_name, stickers): (&str, &str, &[&str]) = match self {
            Self::Coquette => (
                "Coquette",
                "theme-coquette",
                &["bow.png", "bow2.png", "bunny.png", "cuteflower.png"],
            ),
            Self::Valentines => (
                "Valentines",
                "theme-valentines",
                &["cupid.png", "flower.png", "heart.png", "valday.png"],
            ),
            Self::SummerFruits => (
                "Summer Fruits",
                "theme-summer",
                &["flowerblue.png", "lemon.png", "lemonsunnies.png", "seashell.png"],
            ),
            Self::CherryGirl => (
                "Cherry Girl",
                "theme-cherry",
                &["cherry.png", "cherrysunnies.png", "pixelcherry.png"],
            ),
            Self::BossBabe => (
                "Boss Babe",
                "theme-boss",
                &["advise.png", "butterfly.png", "disco.png", "star.png"],
            ),
        };

        let root = format!("assets/themes/{}", self.slug());
        ThemeConfig {
            key: self,
            name: name.to_string(),
            ui_card_url: format!("{root}/ui/theme-card-1080x1080.png"),
            background_main_url: format!("{root}/backgrounds/main-1080x1920.png"),
            background_alt_url: format!("{root}/backgrounds/alt-1080x1920.png"),
            stickers: stickers
                .iter()
                .map(|file| format!("{root}/stickers/{file}"))
                .collect(),
            class_name: class_name.to_string(),
        }
    }
}

impl std::str::FromStr for ThemeKey {
    type Err = MemoireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s || k.slug() == s)
            .ok_or_else(|| MemoireError::validation(format!("unknown theme '{s}'")))
    }
}
