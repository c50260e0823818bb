//! Listing summary reports.
//!
//! Renders a one-page, human-readable PDF for a listing: attributes,
//! description, the owner's contact details, and how many documents and
//! images are on file. Streamed back as an attachment by the
//! `/bikes/{id}/pdf` handler.

use anyhow::{anyhow, Result};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};

use crate::domain::{Listing, User};

/// A4 page with a simple top-down line cursor.
pub fn render_listing_summary(listing: &Listing, owner: Option<&User>) -> Result<Vec<u8>> {
    // ---
    let (doc, page, layer) = PdfDocument::new(
        format!("{} {} summary", listing.brand, listing.model),
        Mm(210.0),
        Mm(297.0),
        "summary",
    );
    let body = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow!("failed to load report body font: {e}"))?;
    let heading = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| anyhow!("failed to load report heading font: {e}"))?;
    let layer = doc.get_page(page).get_layer(layer);

    let mut y = 280.0;
    let mut line = |text: &str, size, font: &IndirectFontRef, gap| {
        // ---
        layer.use_text(text, size, Mm(20.0), Mm(y), font);
        y -= gap;
    };

    line("Bike Details Report", 20.0, &heading, 14.0);

    line("Basic Information", 14.0, &heading, 8.0);
    line(&format!("Brand: {}", listing.brand), 11.0, &body, 6.0);
    line(&format!("Model: {}", listing.model), 11.0, &body, 6.0);
    line(&format!("Price: Rs. {}", listing.price), 11.0, &body, 6.0);
    line(&format!("Location: {}", listing.location), 11.0, &body, 6.0);
    line(&format!("Color: {}", listing.color), 11.0, &body, 6.0);
    line(
        &format!("Number of Owners: {}", listing.owners_count),
        11.0,
        &body,
        6.0,
    );
    line(
        &format!("Kilometres Run: {}", listing.kilometres_run),
        11.0,
        &body,
        6.0,
    );
    line(
        &format!("Model Year: {}", listing.model_year),
        11.0,
        &body,
        6.0,
    );
    line(
        &format!("Posted On: {}", listing.posted_on.format("%d %b %Y %H:%M UTC")),
        11.0,
        &body,
        10.0,
    );

    line("Description", 14.0, &heading, 8.0);
    line(&listing.description, 11.0, &body, 10.0);

    line("Owner Information", 14.0, &heading, 8.0);
    match owner {
        Some(owner) => {
            line(&format!("Name: {}", owner.username), 11.0, &body, 6.0);
            line(&format!("Phone: {}", owner.phone), 11.0, &body, 6.0);
            line(&format!("Location: {}", owner.location), 11.0, &body, 10.0);
        }
        None => {
            line("Name: N/A", 11.0, &body, 10.0);
        }
    }

    line("Documents", 14.0, &heading, 8.0);
    line(
        &format!("RC Documents: {}", file_count(&listing.rc)),
        11.0,
        &body,
        6.0,
    );
    line(
        &format!("Insurance Documents: {}", file_count(&listing.insurance)),
        11.0,
        &body,
        10.0,
    );

    line("Images", 14.0, &heading, 8.0);
    line(
        &format!("{} image(s) on file", listing.images.len()),
        11.0,
        &body,
        10.0,
    );

    line(
        &format!(
            "Generated on: {}",
            chrono::Utc::now().format("%d %b %Y %H:%M UTC")
        ),
        9.0,
        &body,
        6.0,
    );

    doc.save_to_bytes()
        .map_err(|e| anyhow!("failed to render listing PDF: {e}"))
}

fn file_count(files: &[String]) -> String {
    // ---
    if files.is_empty() {
        "Not available".to_string()
    } else {
        format!("{} file(s)", files.len())
    }
}
