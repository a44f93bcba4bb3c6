//! Extraction of catalog entries from a listing page.

use scraper::{ElementRef, Html, Selector};
use suite_store::CatalogEntry;
use url::Url;

use crate::{Error, Result, ScrapeSource, SourceProfile, TRACING_TARGET};

/// Entries extracted from one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPage {
    /// Accepted entries, in page order, one per catalog id.
    pub entries: Vec<CatalogEntry>,
    /// Cards rejected for a blank name or developer.
    pub skipped: usize,
}

struct Selectors {
    card: Selector,
    name: Selector,
    developer: Selector,
    area: Selector,
    price: Selector,
    thumbnail: Selector,
}

impl Selectors {
    fn compile(profile: &SourceProfile) -> Result<Self> {
        let parse = |selector: &str| {
            Selector::parse(selector).map_err(|e| Error::Selector {
                selector: selector.to_owned(),
                message: e.to_string(),
            })
        };

        Ok(Self {
            card: parse(profile.card)?,
            name: parse(profile.name)?,
            developer: parse(profile.developer)?,
            area: parse(profile.area)?,
            price: parse(profile.price)?,
            thumbnail: parse(profile.thumbnail)?,
        })
    }
}

/// Parses the project cards of `html`, fetched from `source`.
///
/// A card is kept only if its name and developer are non-empty after
/// trimming. Cards repeating an earlier catalog id are dropped.
pub fn parse_listing_page(source: ScrapeSource, html: &str) -> Result<ParsedPage> {
    let profile = source.profile();
    let selectors = Selectors::compile(profile)?;
    let base = Url::parse(profile.url).ok();
    let market = source.market();
    let document = Html::parse_document(html);

    let mut page = ParsedPage::default();
    for (index, card) in document.select(&selectors.card).enumerate() {
        let name = first_text(card, &selectors.name);
        let developer = first_text(card, &selectors.developer);

        let (Some(name), Some(developer)) = (name, developer) else {
            tracing::debug!(
                target: TRACING_TARGET,
                source = %source,
                card = index,
                "skipping card without name or developer"
            );
            page.skipped += 1;
            continue;
        };

        let mut entry = CatalogEntry::new(source.as_ref(), name, developer, &market);
        entry.area = first_text(card, &selectors.area);
        entry.price_from = first_text(card, &selectors.price).and_then(|raw| {
            let price = parse_price(&raw);
            if price.is_none() {
                tracing::warn!(
                    target: TRACING_TARGET,
                    source = %source,
                    card = index,
                    raw = %raw,
                    "unparsable starting price"
                );
            }
            price
        });
        entry.thumbnail_url = thumbnail(card, &selectors.thumbnail, base.as_ref());

        if page.entries.iter().any(|e| e.id == entry.id) {
            tracing::debug!(target: TRACING_TARGET, id = %entry.id, "duplicate card on page");
            continue;
        }
        page.entries.push(entry);
    }

    tracing::debug!(
        target: TRACING_TARGET,
        source = %source,
        accepted = page.entries.len(),
        skipped = page.skipped,
        "listing page parsed"
    );

    Ok(page)
}

/// Trimmed, whitespace-collapsed text of the first match, if non-empty.
fn first_text(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    let element = card.select(selector).next()?;
    let text = element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then_some(text)
}

/// Reads `src` (or a lazy-loading `data-src`) and resolves it against `base`.
fn thumbnail(card: ElementRef<'_>, selector: &Selector, base: Option<&Url>) -> Option<String> {
    let img = card.select(selector).next()?.value();
    let src = img
        .attr("data-src")
        .or_else(|| img.attr("src"))
        .map(str::trim)
        .filter(|s| !s.is_empty())?;

    match base {
        Some(base) => base.join(src).ok().map(String::from),
        None => Url::parse(src).ok().map(String::from),
    }
}

/// Reads the first number in a price label such as `AED 1,250,000`.
///
/// `1.2M` and `850K` style suffixes are expanded.
fn parse_price(raw: &str) -> Option<f64> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let rest = &raw[start..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == ',' || c == '.'))
        .unwrap_or(rest.len());

    let digits: String = rest[..end].chars().filter(|c| *c != ',').collect();
    let value: f64 = digits.trim_end_matches('.').parse().ok()?;

    let multiplier = match rest[end..].trim_start().chars().next() {
        Some('M' | 'm') => 1_000_000.0,
        Some('K' | 'k') => 1_000.0,
        _ => 1.0,
    };

    Some(value * multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DXBOFFPLAN_PAGE: &str = r#"
        <html><body>
          <div class="project-card">
            <div class="project-card__image"><img data-src="/uploads/creek.jpg"></div>
            <h3 class="project-card__title">  Creek   Vista Heights </h3>
            <span class="project-card__developer">Sobha Realty</span>
            <span class="project-card__location">MBR City</span>
            <span class="project-card__price">From AED 1,250,000</span>
          </div>
          <div class="project-card">
            <h3 class="project-card__title">Nameless Developer Tower</h3>
            <span class="project-card__developer">   </span>
          </div>
          <div class="project-card">
            <h3 class="project-card__title">Palm Views</h3>
            <span class="project-card__developer">Nakheel</span>
            <span class="project-card__price">Price on request</span>
          </div>
        </body></html>
    "#;

    const PROPERTYFINDER_PAGE: &str = r#"
        <ul>
          <li data-testid="project-card">
            <img src="https://static.propertyfinder.ae/p/1.webp">
            <h2 data-testid="project-card-title">Golf Grove</h2>
            <p data-testid="project-card-developer">Emaar Properties</p>
            <p data-testid="project-card-location">Dubai Hills Estate</p>
            <p data-testid="project-card-price">AED 2.4M</p>
          </li>
        </ul>
    "#;

    #[test]
    fn dxboffplan_cards_are_extracted() {
        let page = parse_listing_page(ScrapeSource::Dxboffplan, DXBOFFPLAN_PAGE).unwrap();
        assert_eq!(page.entries.len(), 2);
        assert_eq!(page.skipped, 1);

        let creek = &page.entries[0];
        assert_eq!(creek.id, "dxboffplan-creek-vista-heights");
        assert_eq!(creek.name, "Creek Vista Heights");
        assert_eq!(creek.developer, "Sobha Realty");
        assert_eq!(creek.area.as_deref(), Some("MBR City"));
        assert_eq!(creek.price_from, Some(1_250_000.0));
        assert_eq!(
            creek.thumbnail_url.as_deref(),
            Some("https://dxboffplan.com/uploads/creek.jpg")
        );
        assert_eq!((creek.country.as_str(), creek.city.as_str()), ("AE", "Dubai"));
        assert_eq!(creek.source.as_deref(), Some("dxboffplan"));

        assert_eq!(page.entries[1].price_from, None);
    }

    #[test]
    fn propertyfinder_cards_are_extracted() {
        let page = parse_listing_page(ScrapeSource::Propertyfinder, PROPERTYFINDER_PAGE).unwrap();
        assert_eq!(page.entries.len(), 1);

        let entry = &page.entries[0];
        assert_eq!(entry.id, "propertyfinder-golf-grove");
        assert_eq!(entry.price_from, Some(2_400_000.0));
        assert_eq!(
            entry.thumbnail_url.as_deref(),
            Some("https://static.propertyfinder.ae/p/1.webp")
        );
    }

    #[test]
    fn pages_without_cards_yield_nothing() {
        let page = parse_listing_page(ScrapeSource::Dxboffplan, "<html></html>").unwrap();
        assert_eq!(page, ParsedPage::default());
    }

    #[test]
    fn prices_are_read_from_labels() {
        assert_eq!(parse_price("AED 1,250,000"), Some(1_250_000.0));
        assert_eq!(parse_price("from 850K"), Some(850_000.0));
        assert_eq!(parse_price("AED 1.2 M"), Some(1_200_000.0));
        assert_eq!(parse_price("on request"), None);
    }
}
