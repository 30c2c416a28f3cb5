//! Wire types exchanged with the style-prediction backend.
//!
//! The backend is loose about optionality: any field may be missing or
//! `null`, numbers sometimes arrive as strings, and outfit components are
//! either plain strings or `{item, type}` objects. Deserialization here is
//! deliberately forgiving so that partial data degrades into placeholders
//! at render time instead of failing the whole prediction.

use indexmap::IndexMap;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::PredictionId;

// ---------------------------------------------------------------------------
// Prediction result
// ---------------------------------------------------------------------------

/// Decoded body of a successful `POST /predict`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(default)]
    pub prediction_id: Option<PredictionId>,
    #[serde(default)]
    pub primary_style: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub style_tags: Vec<String>,
    /// Category name to one or more values, in backend order.
    #[serde(default, deserialize_with = "lenient_attributes")]
    pub attributes: Option<IndexMap<String, OneOrMany>>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub styling_tips: Option<OneOrMany>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub outfit_combinations: Vec<OutfitCombination>,
    #[serde(default, alias = "products", deserialize_with = "lenient_list")]
    pub recommendations: Vec<ProductRecommendation>,
    /// Where the backend stored the uploaded image, when it did.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A value that the backend sends either as a single string or a list.
///
/// Numbers and booleans are kept in their text form; `null`, objects and
/// other unusable entries decode as nothing rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for OneOrMany {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match LooseValue::deserialize(deserializer)? {
            LooseValue::Many(items) => {
                OneOrMany::Many(items.into_iter().filter_map(LooseScalar::into_text).collect())
            }
            LooseValue::One(item) => match item.into_text() {
                Some(text) => OneOrMany::One(text),
                None => OneOrMany::Many(Vec::new()),
            },
        })
    }
}

impl OneOrMany {
    /// Flatten into a list, dropping blank entries.
    pub fn to_vec(&self) -> Vec<String> {
        let items: Vec<&String> = match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v.iter().collect(),
        };
        items
            .into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutfitCombination {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub components: Vec<OutfitComponent>,
    #[serde(default)]
    pub occasion: Option<String>,
    #[serde(default)]
    pub statement_piece: Option<String>,
    #[serde(default)]
    pub styling_tip: Option<String>,
}

/// One garment in an outfit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutfitComponent {
    Text(String),
    Item {
        item: String,
        #[serde(rename = "type", default)]
        kind: Option<String>,
    },
}

impl OutfitComponent {
    pub fn label(&self) -> String {
        match self {
            OutfitComponent::Text(text) => text.clone(),
            OutfitComponent::Item {
                item,
                kind: Some(kind),
            } if !kind.trim().is_empty() => format!("{item} ({kind})"),
            OutfitComponent::Item { item, .. } => item.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecommendation {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    /// Either a symbol (`$`) or an ISO code (`USD`).
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub reviews_count: Option<f64>,
    #[serde(default)]
    pub seller_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub seller_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub shipping_cost: Option<f64>,
    #[serde(default)]
    pub shipping_time: Option<String>,
    #[serde(default)]
    pub listing_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub fallback_image: Option<String>,
    /// Placeholder product generated when the catalog had no results.
    #[serde(default)]
    pub is_sample: bool,
    /// Placeholder product generated because the catalog call failed.
    #[serde(default)]
    pub is_error: bool,
}

impl ProductRecommendation {
    pub fn is_placeholder(&self) -> bool {
        self.is_sample || self.is_error
    }
}

/// Return the application-level error carried by a response body, if any.
///
/// Only a non-empty `error` field counts; `null`, `false` and `""` do not.
pub fn application_error(body: &serde_json::Value) -> Option<String> {
    body.get("error").and_then(error_text)
}

fn error_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null | serde_json::Value::Bool(false) => None,
        serde_json::Value::String(s) if s.trim().is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Secondary actions
// ---------------------------------------------------------------------------

/// Body of the feedback request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub prediction_id: PredictionId,
    pub style: String,
    pub is_accurate: bool,
}

/// Response of the favorite endpoints.
///
/// Older backends answer `{success: bool}`, newer ones
/// `{status: "success" | "error"}`; both are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl FavoriteResponse {
    pub fn is_success(&self) -> bool {
        match (self.success, self.status.as_deref()) {
            (Some(flag), _) => flag,
            (None, Some(status)) => status.eq_ignore_ascii_case("success"),
            (None, None) => false,
        }
    }
}

/// Aggregate feedback statistics served by `GET /stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackStats {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_predictions: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_feedback: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub accuracy_rate: Option<f64>,
    /// Rows without a usable style name are skipped.
    #[serde(default, deserialize_with = "lenient_list")]
    pub popular_styles: Vec<StyleCount>,
    /// Any further counters the backend reports, including a partial
    /// failure's `error`.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FeedbackStats {
    /// Whether any of the known counters came back.
    pub fn has_counters(&self) -> bool {
        self.total_predictions.is_some()
            || self.total_feedback.is_some()
            || self.accuracy_rate.is_some()
            || !self.popular_styles.is_empty()
    }

    /// The error reported alongside otherwise usable statistics.
    pub fn backend_error(&self) -> Option<String> {
        self.extra.get("error").and_then(error_text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleCount {
    /// Aggregation rows keyed by `_id` are accepted as well.
    #[serde(alias = "_id")]
    pub style: String,
    #[serde(default)]
    pub count: u64,
}

// ---------------------------------------------------------------------------
// Lenient deserializers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum MaybeValid<T> {
    Valid(T),
    Invalid(IgnoredAny),
}

/// A list where `null` means empty and elements of the wrong shape are
/// dropped instead of failing the whole body.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items = match Option::<MaybeValid<Vec<MaybeValid<T>>>>::deserialize(deserializer)? {
        Some(MaybeValid::Valid(items)) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            MaybeValid::Valid(value) => Some(value),
            MaybeValid::Invalid(_) => None,
        })
        .collect())
}

/// An attribute map, or `None` when the backend sent something else.
fn lenient_attributes<'de, D>(
    deserializer: D,
) -> Result<Option<IndexMap<String, OneOrMany>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        match Option::<MaybeValid<IndexMap<String, OneOrMany>>>::deserialize(deserializer)? {
            Some(MaybeValid::Valid(map)) => Some(map),
            _ => None,
        },
    )
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseScalar {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
    Other(IgnoredAny),
}

impl LooseScalar {
    fn into_text(self) -> Option<String> {
        match self {
            LooseScalar::Text(text) => Some(text),
            LooseScalar::Number(n) => Some(n.to_string()),
            LooseScalar::Flag(flag) => Some(flag.to_string()),
            LooseScalar::Other(_) => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseValue {
    Many(Vec<LooseScalar>),
    One(LooseScalar),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Accept a number, a numeric string, or anything else as `None`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(n)) if n.is_finite() => Some(n),
        Some(NumberOrText::Text(s)) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_body_parses() {
        let result: PredictionResult = serde_json::from_value(json!({
            "primary_style": "Minimalist",
            "recommendations": [{"title": "Tee", "price": 19.99, "currency": "$"}]
        }))
        .unwrap();

        assert_eq!(result.primary_style.as_deref(), Some("Minimalist"));
        assert!(result.attributes.is_none());
        assert!(result.outfit_combinations.is_empty());
        assert_eq!(result.recommendations.len(), 1);
        assert_eq!(result.recommendations[0].price, Some(19.99));
    }

    #[test]
    fn products_alias_and_nulls() {
        let result: PredictionResult = serde_json::from_value(json!({
            "prediction_id": "p-1",
            "style_tags": null,
            "outfit_combinations": null,
            "products": [{"title": "Boots", "price": "49.5", "is_sample": true}]
        }))
        .unwrap();

        assert!(result.style_tags.is_empty());
        assert_eq!(result.recommendations[0].price, Some(49.5));
        assert!(result.recommendations[0].is_placeholder());
    }

    #[test]
    fn attributes_keep_backend_order_and_shapes() {
        let result: PredictionResult = serde_json::from_value(json!({
            "attributes": {"Silhouette": "Relaxed", "Colors": ["Black", "", "White"]}
        }))
        .unwrap();

        let attrs = result.attributes.unwrap();
        let keys: Vec<&String> = attrs.keys().collect();
        assert_eq!(keys, ["Silhouette", "Colors"]);
        assert_eq!(attrs["Colors"].to_vec(), vec!["Black", "White"]);
        assert_eq!(attrs["Silhouette"].to_vec(), vec!["Relaxed"]);
    }

    #[test]
    fn partial_attributes_still_decode() {
        let result: PredictionResult = serde_json::from_value(json!({
            "primary_style": "Minimalist",
            "attributes": {
                "garment_type": "dress",
                "neckline": null,
                "formality": 3,
                "layered": false,
                "colors": ["navy", 2, null, {"hex": "#000"}],
                "fit": {"top": "slim"}
            },
            "styling_tips": ["Roll the sleeves", null, 7]
        }))
        .unwrap();

        let attrs = result.attributes.unwrap();
        assert_eq!(attrs["garment_type"].to_vec(), vec!["dress"]);
        assert!(attrs["neckline"].to_vec().is_empty());
        assert_eq!(attrs["formality"].to_vec(), vec!["3"]);
        assert_eq!(attrs["layered"].to_vec(), vec!["false"]);
        assert_eq!(attrs["colors"].to_vec(), vec!["navy", "2"]);
        assert!(attrs["fit"].to_vec().is_empty());
        assert_eq!(result.styling_tips.unwrap().to_vec(), vec!["Roll the sleeves", "7"]);
    }

    #[test]
    fn malformed_list_entries_are_skipped() {
        let result: PredictionResult = serde_json::from_value(json!({
            "attributes": "not a map",
            "style_tags": ["boho", 4, null],
            "outfit_combinations": [
                "just a string",
                {"name": "Weekend", "components": ["Jeans", null, {"type": "shoes"}, {"item": "Loafers", "type": "shoes"}]}
            ],
            "recommendations": [null, {"title": "Tee"}]
        }))
        .unwrap();

        assert!(result.attributes.is_none());
        assert_eq!(result.style_tags, vec!["boho"]);
        assert_eq!(result.outfit_combinations.len(), 1);
        let labels: Vec<String> = result.outfit_combinations[0]
            .components
            .iter()
            .map(OutfitComponent::label)
            .collect();
        assert_eq!(labels, vec!["Jeans", "Loafers (shoes)"]);
        assert_eq!(result.recommendations.len(), 1);
    }

    #[test]
    fn outfit_components_accept_both_shapes() {
        let outfit: OutfitCombination = serde_json::from_value(json!({
            "components": ["White tee", {"item": "Loafers", "type": "shoes"}, {"item": "Belt"}]
        }))
        .unwrap();

        let labels: Vec<String> = outfit.components.iter().map(OutfitComponent::label).collect();
        assert_eq!(labels, vec!["White tee", "Loafers (shoes)", "Belt"]);
    }

    #[test]
    fn non_numeric_price_becomes_none() {
        let product: ProductRecommendation =
            serde_json::from_value(json!({"price": "call us", "rating": null})).unwrap();
        assert_eq!(product.price, None);
        assert_eq!(product.rating, None);
    }

    #[test]
    fn application_error_detection() {
        assert_eq!(application_error(&json!({"error": "X"})).as_deref(), Some("X"));
        assert_eq!(application_error(&json!({"error": ""})), None);
        assert_eq!(application_error(&json!({"error": null})), None);
        assert_eq!(application_error(&json!({"primary_style": "Boho"})), None);
    }

    #[test]
    fn favorite_response_shapes() {
        let legacy: FavoriteResponse = serde_json::from_value(json!({"success": true})).unwrap();
        let modern: FavoriteResponse =
            serde_json::from_value(json!({"status": "success", "message": "Added"})).unwrap();
        let failed: FavoriteResponse =
            serde_json::from_value(json!({"status": "error", "message": "Already in favorites"}))
                .unwrap();

        assert!(legacy.is_success());
        assert!(modern.is_success());
        assert!(!failed.is_success());
        assert!(!FavoriteResponse::default().is_success());
    }

    #[test]
    fn stats_keep_unknown_counters() {
        let stats: FeedbackStats = serde_json::from_value(json!({
            "accuracy_rate": 82.5,
            "total_feedback": 40,
            "popular_styles": [{"style": "Streetwear", "count": 12}],
            "mongo_total": 7
        }))
        .unwrap();

        assert_eq!(stats.accuracy_rate, Some(82.5));
        assert_eq!(stats.popular_styles[0].style, "Streetwear");
        assert_eq!(stats.extra["mongo_total"], 7);
        assert_eq!(stats.backend_error(), None);
    }

    #[test]
    fn stats_tolerate_bad_style_rows_and_partial_errors() {
        let stats: FeedbackStats = serde_json::from_value(json!({
            "error": "Database connection not available",
            "accuracy_rate": 80.0,
            "popular_styles": [
                {"style": null, "count": 3},
                {"_id": "Bohemian", "count": 5},
                {"style": "Classic"},
                "Streetwear"
            ]
        }))
        .unwrap();

        assert_eq!(stats.accuracy_rate, Some(80.0));
        assert_eq!(
            stats.popular_styles,
            vec![
                StyleCount { style: "Bohemian".into(), count: 5 },
                StyleCount { style: "Classic".into(), count: 0 },
            ]
        );
        assert_eq!(
            stats.backend_error().as_deref(),
            Some("Database connection not available")
        );
    }
}
