//! Terminal rendering of accumulated results.

use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::accumulator::ResultAccumulator;
use crate::output::{self, format_date_only, status_colored, truncate};
use crate::types::{Character, PageInfo};

#[derive(Tabled)]
struct CardRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Species")]
    species: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "Image")]
    image: String,
}

impl From<&Character> for CardRow {
    fn from(character: &Character) -> Self {
        Self {
            id: character.id,
            name: truncate(&character.name, 40),
            status: character.status().map(status_colored).unwrap_or_default(),
            species: character.species().unwrap_or_default().to_string(),
            created: character.created().map(format_date_only).unwrap_or_default(),
            image: character.image.clone(),
        }
    }
}

/// JSON shape: the upstream body, with `results` holding everything accumulated.
#[derive(Serialize)]
struct Snapshot<'a> {
    current: &'a str,
    info: Option<&'a PageInfo>,
    results: &'a [Character],
}

/// One row per record, keyed by id, in accumulation order.
pub fn cards_table(results: &[Character]) -> String {
    let rows: Vec<CardRow> = results.iter().map(CardRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Summary line: records shown, page position, and whether more can be loaded.
pub fn footer(acc: &ResultAccumulator) -> String {
    let cursor = acc.cursor();
    let total = cursor
        .count()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "?".to_string());
    let mut line = format!("Showing {} of {total}", acc.len());

    if let Some(pages) = cursor.pages() {
        line.push_str(&format!(" (page {} of {pages})", current_page(acc, pages)));
    }

    if acc.is_loading() {
        line.push_str(&format!(" | {}", "loading...".yellow()));
    } else if acc.can_load_more() {
        line.push_str(&format!(" | {}", "more available".green()));
    } else {
        line.push_str(&format!(" | {}", "end of results".bright_black()));
    }
    line
}

/// Page number of the last applied page, derived from its neighbours' links.
fn current_page(acc: &ResultAccumulator, pages: u64) -> u64 {
    let cursor = acc.cursor();
    if let Some(n) = cursor.next().and_then(page_param) {
        return n.saturating_sub(1).max(1);
    }
    if let Some(n) = cursor.prev().and_then(page_param) {
        return n.saturating_add(1).min(pages);
    }
    if cursor.prev().is_none() {
        1
    } else {
        pages
    }
}

fn page_param(link: &str) -> Option<u64> {
    let url = url::Url::parse(link).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}

/// Print the whole view: cards plus footer, or a JSON snapshot.
pub fn print_results(acc: &ResultAccumulator) {
    let snapshot = Snapshot {
        current: acc.current(),
        info: acc.cursor().info.as_ref(),
        results: acc.results(),
    };

    output::print_item(&snapshot, |s| {
        if s.results.is_empty() {
            println!("No characters found.");
        } else {
            println!("{}", cards_table(s.results));
        }
        println!("{}", footer(acc));
        if let Some(error) = acc.last_error() {
            output::print_warning(&format!("last action failed: {error}"));
        }
    });
}
