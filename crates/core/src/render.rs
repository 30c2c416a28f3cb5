//! Pure projection of a [`PredictionResult`] onto display regions.
//!
//! Nothing here touches I/O. Every region degrades to a neutral placeholder
//! when its source data is missing, so a partial backend response still
//! renders.

use crate::prediction::{OutfitCombination, PredictionResult, ProductRecommendation};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const UNKNOWN_STYLE: &str = "Unknown style";
pub const NO_DESCRIPTION: &str = "No description available.";
pub const NO_STYLE_TAGS: &str = "No style tags available.";
pub const NO_STYLING_TIPS: &str = "No styling tips available.";
pub const NO_OUTFITS: &str = "No outfit combinations available.";
pub const NO_PRODUCTS: &str = "No product recommendations available.";
pub const UNTITLED_PRODUCT: &str = "Untitled product";
pub const PRICE_UNAVAILABLE: &str = "Price unavailable";

/// Image shown when a product has neither an image nor a fallback.
pub const PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.jpg";

pub const DEFAULT_CURRENCY: &str = "$";

pub const MAX_STARS: u8 = 5;

// ---------------------------------------------------------------------------
// View-model types
// ---------------------------------------------------------------------------

/// A list region that shows either its items or a placeholder line.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRegion<T> {
    pub items: Vec<T>,
    pub placeholder: Option<&'static str>,
}

impl<T> ListRegion<T> {
    fn new(items: Vec<T>, placeholder: &'static str) -> Self {
        let placeholder = items.is_empty().then_some(placeholder);
        Self { items, placeholder }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Everything shown in the results card for one prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub prediction_id: Option<String>,
    pub style_label: String,
    pub tags: ListRegion<String>,
    pub description: String,
    pub styling_tips: ListRegion<String>,
    /// `None` keeps the attributes section hidden.
    pub attributes: Option<AttributesView>,
    pub outfits: ListRegion<OutfitView>,
    pub products: ListRegion<ProductCardView>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributesView {
    pub groups: Vec<AttributeGroup>,
    pub confidence_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeGroup {
    pub category: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutfitView {
    pub title: String,
    pub description: String,
    pub components: Vec<String>,
    pub occasion: Option<String>,
    pub statement_piece: Option<String>,
    pub styling_tip: Option<String>,
    /// Only the first outfit starts expanded.
    pub expanded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductCardView {
    pub title: String,
    pub price_text: String,
    pub image_url: String,
    pub fallback_image_url: String,
    pub rating: Option<RatingView>,
    pub seller_text: Option<String>,
    pub shipping_text: Option<String>,
    pub shipping_time: Option<String>,
    pub action: ListingAction,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingView {
    pub stars: StarRating,
    pub reviews_count: u64,
}

/// The call-to-action at the bottom of a product card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingAction {
    Link { url: String, label: &'static str },
    Disabled { label: &'static str },
}

/// Star counts for a rating out of five.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarRating {
    pub full: u8,
    pub half: u8,
    pub empty: u8,
}

impl StarRating {
    /// Clamp to `[0, 5]`, then: `floor(r)` full stars, one half star if the
    /// fractional part is at least 0.5, and empty stars up to five.
    pub fn from_rating(rating: f64) -> Self {
        let rating = if rating.is_nan() {
            0.0
        } else {
            rating.clamp(0.0, f64::from(MAX_STARS))
        };
        let whole = rating.floor();
        let full = whole as u8;
        let half = u8::from(rating - whole >= 0.5);
        Self {
            full,
            half,
            empty: MAX_STARS - full - half,
        }
    }

    pub fn to_symbols(&self) -> String {
        let mut out = String::with_capacity(usize::from(MAX_STARS) * 3);
        out.extend(std::iter::repeat('★').take(usize::from(self.full)));
        out.extend(std::iter::repeat('⯪').take(usize::from(self.half)));
        out.extend(std::iter::repeat('☆').take(usize::from(self.empty)));
        out
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Format an amount with its currency.
///
/// Symbols attach directly (`$19.99`); alphabetic codes are separated by a
/// space (`USD 19.99`).
pub fn format_price(amount: f64, currency: Option<&str>) -> String {
    let currency = currency
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CURRENCY);

    if currency.chars().all(char::is_alphabetic) {
        format!("{currency} {amount:.2}")
    } else {
        format!("{currency}{amount:.2}")
    }
}

pub fn format_confidence(score: Option<f64>) -> String {
    let score = score.filter(|s| s.is_finite()).unwrap_or(0.0).clamp(0.0, 100.0);
    format!("{score:.0}% confidence")
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

pub fn render_results(result: &PredictionResult) -> ResultsView {
    let tags: Vec<String> = result
        .style_tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    let tips = result
        .styling_tips
        .as_ref()
        .map(|t| t.to_vec())
        .unwrap_or_default();

    ResultsView {
        prediction_id: non_blank(&result.prediction_id),
        style_label: non_blank(&result.primary_style).unwrap_or_else(|| UNKNOWN_STYLE.to_string()),
        tags: ListRegion::new(tags, NO_STYLE_TAGS),
        description: non_blank(&result.description)
            .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        styling_tips: ListRegion::new(tips, NO_STYLING_TIPS),
        attributes: render_attributes(result),
        outfits: render_outfits(&result.outfit_combinations),
        products: render_products(&result.recommendations),
        image_url: non_blank(&result.image_url),
    }
}

/// Group attributes by category; `None` when there is nothing to show.
pub fn render_attributes(result: &PredictionResult) -> Option<AttributesView> {
    let groups: Vec<AttributeGroup> = result
        .attributes
        .as_ref()?
        .iter()
        .filter_map(|(category, value)| {
            let values = value.to_vec();
            (!values.is_empty()).then(|| AttributeGroup {
                category: category.clone(),
                values,
            })
        })
        .collect();

    if groups.is_empty() {
        return None;
    }

    Some(AttributesView {
        groups,
        confidence_text: format_confidence(result.confidence_score),
    })
}

pub fn render_outfits(outfits: &[OutfitCombination]) -> ListRegion<OutfitView> {
    let items = outfits
        .iter()
        .enumerate()
        .map(|(index, outfit)| OutfitView {
            title: non_blank(&outfit.name)
                .unwrap_or_else(|| format!("Outfit Combination {}", index + 1)),
            description: non_blank(&outfit.description).unwrap_or_default(),
            components: outfit.components.iter().map(|c| c.label()).collect(),
            occasion: non_blank(&outfit.occasion),
            statement_piece: non_blank(&outfit.statement_piece),
            styling_tip: non_blank(&outfit.styling_tip),
            expanded: index == 0,
        })
        .collect();

    ListRegion::new(items, NO_OUTFITS)
}

pub fn render_products(products: &[ProductRecommendation]) -> ListRegion<ProductCardView> {
    ListRegion::new(products.iter().map(render_product).collect(), NO_PRODUCTS)
}

pub fn render_product(product: &ProductRecommendation) -> ProductCardView {
    let currency = product.currency.as_deref();

    let fallback_image_url =
        non_blank(&product.fallback_image).unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());
    let image_url = non_blank(&product.image_url).unwrap_or_else(|| fallback_image_url.clone());

    let rating = product
        .rating
        .filter(|r| *r > 0.0)
        .map(|r| RatingView {
            stars: StarRating::from_rating(r),
            reviews_count: product.reviews_count.map(|c| c.max(0.0) as u64).unwrap_or(0),
        });

    let shipping_text = product.shipping_cost.map(|cost| {
        if cost > 0.0 {
            format!("+ {} shipping", format_price(cost, currency))
        } else {
            "Free shipping".to_string()
        }
    });

    let action = if product.is_sample {
        ListingAction::Disabled {
            label: "Sample Product",
        }
    } else if product.is_error {
        ListingAction::Disabled {
            label: "Unavailable",
        }
    } else {
        match non_blank(&product.listing_url) {
            Some(url) => ListingAction::Link {
                url,
                label: "View on eBay",
            },
            None => ListingAction::Disabled {
                label: "No listing available",
            },
        }
    };

    ProductCardView {
        title: non_blank(&product.title).unwrap_or_else(|| UNTITLED_PRODUCT.to_string()),
        price_text: product
            .price
            .map(|p| format_price(p, currency))
            .unwrap_or_else(|| PRICE_UNAVAILABLE.to_string()),
        image_url,
        fallback_image_url,
        rating,
        seller_text: non_blank(&product.seller_name).map(|s| format!("Seller: {s}")),
        shipping_text,
        shipping_time: non_blank(&product.shipping_time),
        action,
    }
}
