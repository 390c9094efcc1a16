//! Terminal rendering of core view descriptions.

use animehub_api::traits::{CatalogSummary, SeasonEntry};
use animehub_core::catalog::DetailView;
use animehub_core::library::StatusFilter;
use animehub_core::lookup::PanelState;
use animehub_core::quotes::Quote;
use animehub_core::view::{
    self, Avatar, BingoCell, EntryCard, ProfileView, StatTiles,
};

const BAR_WIDTH: usize = 20;

pub fn progress_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

pub fn profile(view: &ProfileView) {
    let avatar = match &view.avatar {
        Avatar::Image(url) => url.clone(),
        Avatar::Initials(initials) => format!("({initials})"),
    };
    println!("{} {avatar}", view.name);
    println!("{}", view.mode_label);
}

pub fn library(cards: &[EntryCard], filter: StatusFilter) {
    if cards.is_empty() {
        println!("No anime here yet (filter: {filter}).");
        return;
    }
    for card in cards {
        println!("{}  [{}]", card.title, card.status_pill);
        println!("  id: {}", card.local_id);
        println!("  {}", card.meta_line);
        println!(
            "  {} {}",
            card.episodes_line,
            progress_bar(card.progress, BAR_WIDTH)
        );
        if !card.tags.is_empty() {
            println!("  tags: {}", card.tags.join(", "));
        }
        if let Some(url) = &card.image_url {
            println!("  image: {url}");
        }
    }
    if !cards[0].actions_enabled {
        println!();
        println!("Read-only: unlock edit mode to change entries.");
    }
}

pub fn stats(tiles: &StatTiles) {
    println!("Total:      {}", tiles.total);
    println!("Completed:  {}", tiles.completed);
    println!("Episodes:   {}", tiles.episodes);
    println!("Watch time: {}", tiles.time);
    println!("Top genre:  {}", tiles.top_genre);
}

pub fn recommendations(lines: &[String]) {
    println!("Recommended for you:");
    for line in lines {
        println!("  - {line}");
    }
}

pub fn bingo(cells: &[BingoCell]) {
    for row in cells.chunks(3) {
        let line: Vec<String> = row
            .iter()
            .map(|c| {
                format!(
                    "{} {} {:<26}",
                    c.index,
                    if c.done { "[x]" } else { "[ ]" },
                    c.text
                )
            })
            .collect();
        println!("{}", line.join(" "));
    }
    let done = cells.iter().filter(|c| c.done).count();
    println!("{done}/{} done", cells.len());
}

pub fn search(state: &PanelState<Vec<CatalogSummary>>) {
    match state {
        PanelState::Idle => {}
        PanelState::Loading => println!("Searching..."),
        PanelState::Failed(_) => println!("Search failed."),
        PanelState::Loaded(hits) if hits.is_empty() => println!("No results."),
        PanelState::Loaded(hits) => {
            for hit in hits {
                println!("{:>7}  {}", hit.external_id, view::search_line(hit));
            }
            println!();
            println!("Run `details <id>` for more.");
        }
    }
}

pub fn details(state: &PanelState<DetailView>) {
    match state {
        PanelState::Idle => {}
        PanelState::Loading => println!("Loading details..."),
        PanelState::Failed(_) => println!("Failed to load details."),
        PanelState::Loaded(details) => {
            println!("{}", details.detail.title);
            println!("{}", view::detail_summary(details));
            if !details.detail.genres.is_empty() {
                println!("Genres: {}", details.detail.genres.join(", "));
            }
            if let Some(url) = &details.detail.image_url {
                println!("Poster: {url}");
            }

            println!();
            println!("Watch order (basic):");
            let order = details.watch_order();
            if order.is_empty() {
                println!("  No related anime info found.");
            }
            for line in order {
                println!("  - {line}");
            }

            println!();
            println!("Manga info:");
            println!("  {}", view::manga_line(details.manga.as_ref()));
        }
    }
}

pub fn season(state: &PanelState<Vec<SeasonEntry>>) {
    match state {
        PanelState::Idle => {}
        PanelState::Loading => println!("Loading..."),
        PanelState::Failed(_) => println!("Failed to load season."),
        PanelState::Loaded(items) if items.is_empty() => println!("No data."),
        PanelState::Loaded(items) => {
            for item in items {
                println!("{}", view::season_line(item));
            }
        }
    }
}

pub fn quote(quote: &Quote) {
    println!("\"{}\"", quote.text);
    println!("  – {}", quote.source);
}
