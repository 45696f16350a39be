use crate::core::view::{FormView, View};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Label,
    Result,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Label => style(text).bold(),
        StyleType::Result => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn rate_cell(rate: f64) -> Cell {
    Cell::new(format!("{rate:.4}")).set_alignment(CellAlignment::Right)
}

/// Creates a spinner shown while a request is outstanding.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn render_form(form: &FormView) -> String {
    let result = form.result.as_deref().unwrap_or("N/A");
    let result_style = if form.result.is_some() {
        StyleType::Result
    } else {
        StyleType::Error
    };

    let mut output = format!("{}\n\n", style_text("Currency Converter", StyleType::Title));
    output.push_str(&format!(
        "{} {}\n",
        style_text("Amount:", StyleType::Label),
        form.amount
    ));
    output.push_str(&format!(
        "{} {}\n",
        style_text("From:", StyleType::Label),
        form.from
    ));
    output.push_str(&format!(
        "{} {}\n\n",
        style_text("To:", StyleType::Label),
        form.to
    ));
    output.push_str(&format!("{} {} =\n", form.amount, form.from));
    output.push_str(&format!(
        "{} {}\n",
        style_text(result, result_style),
        form.to
    ));
    output.push_str(&style_text(
        &format!("\nCurrencies: {}", form.currencies.join(", ")),
        StyleType::Subtle,
    ));
    output
}

/// Renders one view branch as terminal text.
pub fn render_view(view: &View) -> String {
    match view {
        View::Empty => String::new(),
        View::Loading => style_text("Loading exchange rates...", StyleType::Subtle),
        View::Failed { message } => style_text(message, StyleType::Error),
        View::Form(form) => render_form(form),
    }
}
