//! Supported catalog sources and their page layouts.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use suite_core::Market;

use crate::{Error, Result};

/// A listing website the catalog is scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumIter, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScrapeSource {
    Dxboffplan,
    Propertyfinder,
}

/// Where a source lives and how its project cards are laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceProfile {
    /// Listing page URL.
    pub url: &'static str,
    /// Selector of one project card.
    pub card: &'static str,
    pub name: &'static str,
    pub developer: &'static str,
    pub area: &'static str,
    pub price: &'static str,
    /// Selector of the thumbnail `<img>`.
    pub thumbnail: &'static str,
}

static DXBOFFPLAN: SourceProfile = SourceProfile {
    url: "https://dxboffplan.com/off-plan-projects/",
    card: ".project-card",
    name: ".project-card__title",
    developer: ".project-card__developer",
    area: ".project-card__location",
    price: ".project-card__price",
    thumbnail: ".project-card__image img",
};

static PROPERTYFINDER: SourceProfile = SourceProfile {
    url: "https://www.propertyfinder.ae/en/new-projects/dubai",
    card: "[data-testid='project-card']",
    name: "[data-testid='project-card-title']",
    developer: "[data-testid='project-card-developer']",
    area: "[data-testid='project-card-location']",
    price: "[data-testid='project-card-price']",
    thumbnail: "img",
};

impl ScrapeSource {
    /// Parses a `source` query value.
    pub fn parse(value: &str) -> Result<Self> {
        value
            .trim()
            .parse()
            .map_err(|_| Error::UnknownSource(value.to_owned()))
    }

    /// Returns the page layout of this source.
    pub fn profile(self) -> &'static SourceProfile {
        match self {
            Self::Dxboffplan => &DXBOFFPLAN,
            Self::Propertyfinder => &PROPERTYFINDER,
        }
    }

    /// Market the listed projects belong to.
    pub fn market(self) -> Market {
        Market::default()
    }
}
