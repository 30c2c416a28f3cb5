//! Plain-text rendering of the controller's view-model.

use stylescope_controller::view::{FeedbackPanel, NoticeKind, PageView};
use stylescope_core::prediction::FeedbackStats;
use stylescope_core::render::{
    AttributesView, ListRegion, ListingAction, OutfitView, ProductCardView, ResultsView,
};
use stylescope_core::status::{ServiceHealth, ServiceStatus};

pub fn print_page(view: &PageView) {
    if let Some(message) = view.upload.message.as_deref() {
        println!("⚠️  {message}");
    }
    if let Some(status) = view.service_status.as_ref() {
        print_service_status(status);
    }
    if let Some(banner) = view.error_banner.as_deref() {
        println!("❌ {banner}");
    }
    if let Some(results) = view.results.as_ref() {
        print_results(results);
    }
}

pub fn print_results(results: &ResultsView) {
    println!("\n✨ {}", results.style_label);
    if let Some(id) = results.prediction_id.as_deref() {
        println!("   prediction: {id}");
    }
    println!("\n{}", results.description);

    print_list("Style tags", &results.tags, |tag| tag.clone());
    if let Some(attributes) = results.attributes.as_ref() {
        print_attributes(attributes);
    }
    print_list("Styling tips", &results.styling_tips, |tip| format!("• {tip}"));
    print_region("Outfit combinations", &results.outfits, print_outfit);
    print_region("Recommended products", &results.products, print_product);
}

fn print_attributes(attributes: &AttributesView) {
    println!("\nAttributes ({})", attributes.confidence_text);
    for group in &attributes.groups {
        println!("  {}: {}", group.category, group.values.join(", "));
    }
}

fn print_list<T>(heading: &str, region: &ListRegion<T>, line: impl Fn(&T) -> String) {
    println!("\n{heading}");
    match region.placeholder {
        Some(placeholder) => println!("  {placeholder}"),
        None => {
            for item in &region.items {
                println!("  {}", line(item));
            }
        }
    }
}

fn print_region<T>(heading: &str, region: &ListRegion<T>, print: impl Fn(&T)) {
    println!("\n{heading}");
    match region.placeholder {
        Some(placeholder) => println!("  {placeholder}"),
        None => region.items.iter().for_each(print),
    }
}

fn print_outfit(outfit: &OutfitView) {
    let marker = if outfit.expanded { "▾" } else { "▸" };
    println!("  {marker} {}", outfit.title);
    if !outfit.expanded {
        return;
    }
    if !outfit.description.is_empty() {
        println!("    {}", outfit.description);
    }
    for component in &outfit.components {
        println!("    - {component}");
    }
    if let Some(occasion) = outfit.occasion.as_deref() {
        println!("    Occasion: {occasion}");
    }
    if let Some(piece) = outfit.statement_piece.as_deref() {
        println!("    Statement piece: {piece}");
    }
    if let Some(tip) = outfit.styling_tip.as_deref() {
        println!("    Tip: {tip}");
    }
}

fn print_product(card: &ProductCardView) {
    println!("  {} - {}", card.title, card.price_text);
    if let Some(rating) = card.rating.as_ref() {
        println!(
            "    {} ({} reviews)",
            rating.stars.to_symbols(),
            rating.reviews_count
        );
    }
    if let Some(seller) = card.seller_text.as_deref() {
        println!("    {seller}");
    }
    match (card.shipping_text.as_deref(), card.shipping_time.as_deref()) {
        (Some(cost), Some(time)) => println!("    {cost}, {time}"),
        (Some(cost), None) => println!("    {cost}"),
        (None, Some(time)) => println!("    {time}"),
        (None, None) => {}
    }
    match &card.action {
        ListingAction::Link { url, label } => println!("    {label}: {url}"),
        ListingAction::Disabled { label } => println!("    [{label}]"),
    }
}

pub fn print_service_status(status: &ServiceStatus) {
    let icon = match status.health {
        ServiceHealth::Operational => "🟢",
        ServiceHealth::Degraded => "🟠",
        ServiceHealth::Unreachable => "🔴",
    };
    println!("{icon} {}", status.message);
}

pub fn print_notice(view: &PageView) {
    if let Some(notice) = view.notice.as_ref() {
        let icon = match notice.kind {
            NoticeKind::Success => "✅",
            NoticeKind::Error => "❌",
        };
        println!("{icon} {}", notice.text);
    }
}

pub fn print_feedback(view: &PageView) {
    let FeedbackPanel {
        selected,
        thanks_visible,
        ..
    } = view.feedback;
    if thanks_visible {
        let choice = match selected {
            Some(true) => "accurate",
            _ => "inaccurate",
        };
        println!("🙏 Thanks for your feedback ({choice})");
    } else {
        print_notice(view);
    }
}

pub fn print_stats(stats: &FeedbackStats) {
    println!("📊 Feedback statistics");
    if let Some(error) = stats.backend_error() {
        println!("⚠️  Partial statistics: {error}");
    }
    if let Some(total) = stats.total_predictions {
        println!("  Predictions: {total:.0}");
    }
    if let Some(total) = stats.total_feedback {
        println!("  Feedback:    {total:.0}");
    }
    if let Some(rate) = stats.accuracy_rate {
        println!("  Accuracy:    {rate:.1}%");
    }
    if !stats.popular_styles.is_empty() {
        println!("  Popular styles:");
        for style in &stats.popular_styles {
            println!("    {} ({})", style.style, style.count);
        }
    }
}
