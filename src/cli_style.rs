/*!
 * HarvestX CLI Style System
 *
 * Styling utilities for terminal output: themed text, section headers and
 * the tables the dashboards are rendered into.
 */

use comfy_table::{presets, Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::{style, StyledObject};
use harvest_connect::{PlatformStats, UserProfile};

use crate::dashboard::{FarmerListings, OfferRow, Panel};

/// Wrap width for free-form messages
const WRAP_WIDTH: usize = 72;

// ============================================================================
// THEME COLORS
// ============================================================================

/// Brand colors for consistent styling
pub struct Theme;

impl Theme {
    /// Primary accent color (green)
    pub fn primary<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).green()
    }

    pub fn success<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).green()
    }

    pub fn warning<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).yellow()
    }

    pub fn error<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).red()
    }

    /// Muted/secondary text (dim)
    pub fn muted<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).dim()
    }

    /// Header style (bold green)
    pub fn header<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).green().bold()
    }

    /// Value/number highlight (bold white)
    pub fn value<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).white().bold()
    }
}

// ============================================================================
// ICONS
// ============================================================================

/// Unicode icons for visual feedback
pub struct Icons;

impl Icons {
    pub const SUCCESS: &'static str = "✓";
    pub const ERROR: &'static str = "✗";
    pub const WARNING: &'static str = "⚠";
    pub const INFO: &'static str = "ℹ";
    pub const PENDING: &'static str = "○";

    pub const HARVEST: &'static str = "🌾";
    pub const STATS: &'static str = "📊";
    pub const USER: &'static str = "👤";
    pub const ARROW_RIGHT: &'static str = "→";
}

// ============================================================================
// HEADERS
// ============================================================================

/// Draw a section header with a line
pub fn section_header(title: &str) {
    let line_len = 50 - title.len().min(40);
    println!(
        "\n{} {}",
        Theme::header(title),
        Theme::muted("─".repeat(line_len))
    );
}

/// Print a panel that is not ready yet. Returns the value when it is.
pub fn panel_ready<'a, T>(panel: &'a Panel<T>, what: &str) -> Option<&'a T> {
    match panel {
        Panel::Loading => {
            println!(
                "{} {}",
                Theme::muted(Icons::PENDING),
                Theme::muted(format!("Loading {}...", what))
            );
            None
        }
        Panel::Failed(message) => {
            println!(
                "{} {}",
                Theme::error(Icons::ERROR),
                Theme::error(format!("Error loading {}: {}", what, message))
            );
            None
        }
        Panel::Ready(value) => Some(value),
    }
}

// ============================================================================
// TABLES
// ============================================================================

/// Create a styled data table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Create a minimal table (no outer borders)
pub fn create_minimal_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_NO_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Green)
        .add_attribute(Attribute::Bold)
}

/// Create a key-value table
pub fn stats_table(items: &[(&str, String)]) -> Table {
    let mut table = create_minimal_table();

    for (key, value) in items {
        table.add_row(vec![
            Cell::new(key).fg(Color::Green),
            Cell::new(value)
                .fg(Color::White)
                .add_attribute(Attribute::Bold),
        ]);
    }

    table
}

/// Platform counters as a key-value table
pub fn platform_stats_table(stats: &PlatformStats) -> Table {
    stats_table(&[
        ("Total users", format_count(stats.total_users)),
        ("Total offers", format_count(stats.total_offers)),
        ("Active offers", format_count(stats.active_offers)),
        ("Investment requests", format_count(stats.total_requests)),
        ("Transactions", format_count(stats.total_transactions)),
    ])
}

/// A user profile as a key-value table
pub fn profile_table(user: &UserProfile) -> Table {
    stats_table(&[
        ("Name", user.display_name.clone()),
        ("Email", user.email.clone()),
        ("Role", user.role.label()),
        ("Principal", user.principal.clone()),
    ])
}

fn status_cell(status: &str) -> Cell {
    let color = match status {
        "Active" => Color::Green,
        "Completed" => Color::Blue,
        "Cancelled" => Color::Red,
        _ => Color::DarkGrey,
    };
    Cell::new(status).fg(color)
}

/// Offer listing table
pub fn offer_table(rows: &[OfferRow]) -> Table {
    let mut table = create_table();
    table.set_header(vec![
        header_cell("Product"),
        header_cell("Type"),
        header_cell("Grade"),
        header_cell("Status"),
        header_cell("Location"),
        header_cell("Price/kg"),
        header_cell("Available"),
        header_cell("Min. investment"),
        header_cell("Harvest"),
        header_cell("Listed"),
        header_cell("Farmer"),
    ]);

    for row in rows {
        table.add_row(vec![
            Cell::new(&row.product).add_attribute(Attribute::Bold),
            Cell::new(&row.product_type),
            Cell::new(&row.quality),
            status_cell(&row.status),
            Cell::new(&row.location),
            Cell::new(format_price(row.price_per_kg)).set_alignment(CellAlignment::Right),
            Cell::new(format!(
                "{} / {}",
                format_kg(row.available_quantity),
                format_kg(row.total_quantity)
            ))
            .set_alignment(CellAlignment::Right),
            Cell::new(format_price(row.minimum_investment as f64))
                .set_alignment(CellAlignment::Right),
            Cell::new(&row.harvest_date),
            Cell::new(&row.listed_on),
            Cell::new(&row.farmer).fg(Color::DarkGrey),
        ]);
    }

    table
}

/// Totals line for a farmer's own listings
pub fn listings_summary_table(listings: &FarmerListings) -> Table {
    stats_table(&[
        ("Listed offers", listings.rows.len().to_string()),
        ("Active offers", listings.active_offers.to_string()),
        ("Total quantity", format_kg(listings.total_quantity)),
        ("Available", format_kg(listings.available_quantity)),
    ])
}

// ============================================================================
// FORMATTING
// ============================================================================

/// Thousands-separated count: `12,345`
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn format_kg(kg: u64) -> String {
    format!("{} kg", format_count(kg))
}

pub fn format_price(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Print a styled error message with optional suggestion
pub fn print_error(message: &str, suggestion: Option<&str>) {
    let mut lines = textwrap::wrap(message, WRAP_WIDTH).into_iter();
    eprintln!(
        "\n{} {}",
        Theme::error(format!("{} Error:", Icons::ERROR)),
        lines.next().unwrap_or_default()
    );
    for line in lines {
        eprintln!("  {}", line);
    }

    if let Some(hint) = suggestion {
        eprintln!(
            "  {} {}",
            Theme::muted(Icons::ARROW_RIGHT),
            Theme::muted(hint)
        );
    }
    eprintln!();
}

/// Print a styled warning message
pub fn print_warning(message: &str) {
    eprintln!(
        "{} {}",
        Theme::warning(Icons::WARNING.to_string()),
        Theme::warning(message)
    );
}

/// Print a styled success message
pub fn print_success(message: &str) {
    println!(
        "{} {}",
        Theme::success(Icons::SUCCESS.to_string()),
        Theme::success(message)
    );
}

/// Print a styled info message
pub fn print_info(message: &str) {
    println!("{} {}", Theme::primary(Icons::INFO.to_string()), message);
}

/// Print the health indicator
pub fn print_health(healthy: bool) {
    if healthy {
        print_success("Canister is healthy");
    } else {
        println!(
            "{} {}",
            Theme::error(Icons::ERROR),
            Theme::error("Canister is unreachable or unhealthy")
        );
    }
}

// ============================================================================
// BANNER
// ============================================================================

pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  {} {}  {}\n",
        Icons::HARVEST,
        Theme::header("HarvestX"),
        Theme::muted(format!("v{}", version))
    );
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_format_kg_and_price() {
        assert_eq!(format_kg(2500), "2,500 kg");
        assert_eq!(format_price(3.2), "$3.20");
    }

    #[test]
    fn test_offer_table_has_one_row_per_offer() {
        let row = OfferRow {
            id: "o-1".to_string(),
            product: "Sorghum".to_string(),
            product_type: "Grains".to_string(),
            quality: "Standard".to_string(),
            status: "Active".to_string(),
            location: "Dodoma".to_string(),
            farmer: "aaaaa-aa".to_string(),
            price_per_kg: 0.8,
            available_quantity: 5000,
            total_quantity: 8000,
            minimum_investment: 200,
            harvest_date: "2026-08-01".to_string(),
            listed_on: "2026-05-01".to_string(),
        };
        let table = offer_table(&[row.clone(), row]);
        assert_eq!(table.row_iter().count(), 2);

        let rendered = table.to_string();
        assert!(rendered.contains("Sorghum"));
        assert!(rendered.contains("5,000 kg / 8,000 kg"));
        assert!(rendered.contains("Listed"));
        assert!(rendered.contains("2026-05-01"));
    }

    #[test]
    fn test_stats_table_rows() {
        let table = platform_stats_table(&PlatformStats {
            total_users: 1200,
            ..Default::default()
        });
        assert_eq!(table.row_iter().count(), 5);
        assert!(table.to_string().contains("1,200"));
    }
}
