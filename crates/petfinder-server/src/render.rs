//! HTML rendering of the page and the pet card list.

use petfinder_breeds::PetSource;

use crate::controller::{PetCard, PetListing};

pub const EMPTY_MESSAGE: &str = "No pets found in your area.";

const FILTER_OPTIONS: &[(&str, &str)] = &[("", "All pets"), ("dog", "Dogs"), ("cat", "Cats")];

/// Escapes text for element content and quoted attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// The card list fragment, also used to replace `#pets` when the filter changes.
#[must_use]
pub fn render_cards(cards: &[PetCard]) -> String {
    if cards.is_empty() {
        return format!("<div class=\"pet-card\"><p>{EMPTY_MESSAGE}</p></div>");
    }
    cards.iter().map(render_card).collect()
}

fn render_card(card: &PetCard) -> String {
    let pet = &card.pet;
    let name = escape_html(&pet.name);
    let paw = if pet.is_from_api { " 🐾" } else { "" };
    let temperament = pet
        .temperament_summary()
        .map(|t| format!("<p class=\"pet-info\">🎭 {}</p>", escape_html(&t)))
        .unwrap_or_default();
    let live = if pet.is_from_api {
        "<p class=\"pet-info live-data\">⭐ Live data</p>"
    } else {
        ""
    };

    format!(
        "<div class=\"pet-card\">\
         <img src=\"{image}\" alt=\"{name}\" data-fallback=\"{fallback}\" \
         onerror=\"this.onerror=null;this.src=this.dataset.fallback\" \
         style=\"height: 200px; object-fit: cover; border-radius: 10px;\">\
         <h3>{name}{paw}</h3>\
         <p class=\"pet-info\"><span class=\"pet-breed\">{breed}</span> - {age}</p>\
         {temperament}\
         <p class=\"pet-info\">📍 {location}</p>\
         <p class=\"pet-info\">📏 {distance} away</p>\
         {live}\
         <button class=\"adopt-btn\" data-pet=\"{name}\">🏠 Adopt me</button>\
         </div>",
        image = escape_html(&card.image),
        fallback = escape_html(&card.fallback_image),
        breed = escape_html(&pet.breed),
        age = escape_html(&pet.age),
        location = escape_html(&pet.location),
        distance = escape_html(&pet.distance),
    )
}

fn render_filter(selected: &str) -> String {
    let options: String = FILTER_OPTIONS
        .iter()
        .map(|(value, label)| {
            let selected_attr = if *value == selected { " selected" } else { "" };
            format!("<option value=\"{value}\"{selected_attr}>{label}</option>")
        })
        .collect();
    format!("<select id=\"petType\" name=\"type\">{options}</select>")
}

/// The full page: filter, optional inline notice, and cards.
#[must_use]
pub fn render_page(listing: &PetListing) -> String {
    let notice = listing
        .notice
        .as_deref()
        .map(|n| format!("<div id=\"error\" class=\"error\">{}</div>", escape_html(n)))
        .unwrap_or_default();
    let source = match listing.source {
        PetSource::Api => "api",
        PetSource::LocalFallback => "local",
    };

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>PetFinder</title>\n\
         <link rel=\"manifest\" href=\"manifest.json\">\n\
         <link rel=\"stylesheet\" href=\"style.css\">\n\
         </head>\n\
         <body>\n\
         <header><h1>PetFinder</h1><form action=\"./\" method=\"get\">{filter}</form></header>\n\
         {notice}\n\
         <main id=\"pets\" data-source=\"{source}\">{cards}</main>\n\
         <script src=\"app.js\" defer></script>\n\
         </body>\n\
         </html>\n",
        filter = render_filter(listing.filter),
        cards = render_cards(&listing.pets),
    )
}
