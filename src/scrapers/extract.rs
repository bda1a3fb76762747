//! Selectors and field extraction for CoinAfrique index and detail pages.
//!
//! Both entry points take the raw body and parse it themselves so that the
//! (non-`Send`) document tree never lives across an `.await` in the crawler.

use crate::models::{RawListing, SkipReason};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

static LISTING_CARD: Lazy<Selector> = Lazy::new(|| selector("div.col.s6.m4.l3"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| selector("a"));
static TITLE: Lazy<Selector> = Lazy::new(|| selector("h1.title.title-ad.hide-on-large-and-down"));
static PRICE: Lazy<Selector> = Lazy::new(|| selector("p.price"));
static LABEL_WRAPPER: Lazy<Selector> = Lazy::new(|| selector("span.valign-wrapper"));
static CHARACTERISTICS: Lazy<Selector> = Lazy::new(|| selector("div.details-characteristics"));
static QUANTITY: Lazy<Selector> = Lazy::new(|| selector("span.qt"));
static CAROUSEL_SLIDE: Lazy<Selector> = Lazy::new(|| selector("div.swiper-slide.slide-clickable"));

/// Currency marker trailing every price
const CURRENCY_MARKER: &str = "CFA";

/// Position of the address among the label wrappers of a detail page
const ADDRESS_LABEL_INDEX: usize = 1;

/// Collect absolute listing URLs from an index page, in card order.
///
/// Cards without an anchor or `href`, or whose `href` cannot be resolved,
/// are skipped one by one.
pub fn extract_listing_links(html: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    for (idx, card) in document.select(&LISTING_CARD).enumerate() {
        let Some(href) = card
            .select(&ANCHOR)
            .next()
            .and_then(|anchor| anchor.value().attr("href"))
        else {
            debug!("Card {} has no link, skipping", idx);
            continue;
        };

        match base.join(href) {
            Ok(url) => links.push(url.to_string()),
            Err(e) => debug!("Card {} has unusable href '{}': {}", idx, href, e),
        }
    }

    links
}

/// Extract one listing from its detail page.
///
/// Title, price and address are mandatory; the first one missing decides the
/// skip reason. Room count and image link degrade to `None`.
pub fn extract_listing(html: &str) -> Result<RawListing, SkipReason> {
    let document = Html::parse_document(html);

    let details = document
        .select(&TITLE)
        .next()
        .map(element_text)
        .ok_or(SkipReason::MissingTitle)?;

    let price = document
        .select(&PRICE)
        .next()
        .map(|node| normalize_price(&element_text(node)))
        .ok_or(SkipReason::MissingPrice)?;

    let address = document
        .select(&LABEL_WRAPPER)
        .nth(ADDRESS_LABEL_INDEX)
        .map(element_text)
        .ok_or(SkipReason::MissingAddress)?;

    Ok(RawListing {
        details,
        price,
        address,
        number_of_rooms: extract_rooms(&document),
        image_link: extract_image_link(&document),
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// "150 000 CFA" -> "150000"
fn normalize_price(text: &str) -> String {
    text.split_whitespace()
        .collect::<String>()
        .replace(CURRENCY_MARKER, "")
}

fn extract_rooms(document: &Html) -> Option<String> {
    let block = document.select(&CHARACTERISTICS).next()?;
    block.select(&QUANTITY).next().map(element_text)
}

fn extract_image_link(document: &Html) -> Option<String> {
    let slide = document.select(&CAROUSEL_SLIDE).next()?;
    slide.value().attr("style").and_then(url_from_style)
}

/// Pull the target out of `background-image: url("...")`
fn url_from_style(style: &str) -> Option<String> {
    let (_, rest) = style.split_once("url(")?;
    let (inner, _) = rest.split_once(')')?;
    let link = inner.trim().trim_matches(|c| c == '"' || c == '\'');

    if link.is_empty() {
        None
    } else {
        Some(link.to_string())
    }
}
