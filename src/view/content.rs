//! Main content area rendering (feed rows, search results)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Padding, Paragraph, Wrap},
    Frame,
};

use crate::model::{
    ActiveSection, ContentLayout, FeedLoadState, FeedPageState, MediaItem, SearchHit, UiState,
    ViewOptions,
};
use crate::settings::LayoutDensity;
use super::utils::{border_style, calculate_num_width, render_scrollable_list, scroll_offset, truncate_string};

const ITEM_WIDTH: u16 = 24;
const ARTISTS_ROW_TITLE: &str = "Artists you listen to";

pub fn render_main_content(
    frame: &mut Frame,
    area: Rect,
    feed: &FeedPageState,
    ui_state: &UiState,
    options: ViewOptions,
) {
    if ui_state.active_section == ActiveSection::Search {
        if let Some(hits) = &ui_state.search_results {
            render_search_results(frame, area, hits, ui_state.search_selected, ui_state.search.query());
            return;
        }
    }

    let is_focused = ui_state.active_section == ActiveSection::Feed;

    if !feed.has_content() {
        render_feed_placeholder(frame, area, feed, is_focused);
        return;
    }

    let title = match (feed.load_state, feed.selected_chip()) {
        (FeedLoadState::Loading, _) => " Feed (reloading...) ".to_string(),
        (_, Some(chip)) => format!(" Feed: {} ", chip.text),
        _ => " Feed ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style(is_focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = feed.visible_rows(options.show_artists_row);
    let artists_shown = feed.shows_artists_row(options.show_artists_row);
    let row_height = row_height(options.density);
    let visible_rows = (inner.height / row_height).max(1) as usize;
    let first_row = scroll_offset(ui_state.feed_row, visible_rows);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(row_height); visible_rows])
        .split(inner);

    for (slot, (index, layout)) in rows.iter().enumerate().skip(first_row).take(visible_rows).enumerate() {
        let selected_column = (is_focused && index == ui_state.feed_row).then_some(ui_state.feed_column);
        let is_artists_row = artists_shown && index == 0;
        render_feed_row(frame, row_areas[slot], layout, is_artists_row, selected_column, options.density);
    }
}

fn row_height(density: LayoutDensity) -> u16 {
    match density {
        LayoutDensity::Comfortable => 4,
        LayoutDensity::Compact => 3,
    }
}

fn render_feed_placeholder(frame: &mut Frame, area: Rect, feed: &FeedPageState, is_focused: bool) {
    let (text, color) = match (&feed.load_error, feed.load_state) {
        (_, FeedLoadState::PreInit | FeedLoadState::Loading) => ("Loading feed...".to_string(), Color::Yellow),
        (Some(error), _) => {
            let hint = if error.is_recoverable() { "\n\nPress r to retry" } else { "" };
            (format!("{}{}", error.user_message(), hint), Color::Red)
        }
        _ => ("The feed is empty. Press r to reload.".to_string(), Color::DarkGray),
    };

    let placeholder = Paragraph::new(text)
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Feed ")
                .padding(Padding::horizontal(1))
                .border_style(border_style(is_focused)),
        );
    frame.render_widget(placeholder, area);
}

fn render_feed_row(
    frame: &mut Frame,
    area: Rect,
    layout: &ContentLayout,
    is_artists_row: bool,
    selected_column: Option<usize>,
    density: LayoutDensity,
) {
    let title = if is_artists_row {
        ARTISTS_ROW_TITLE.to_string()
    } else {
        match (&layout.title, &layout.subtitle) {
            (Some(title), Some(subtitle)) => format!("{} · {}", title, subtitle),
            (Some(title), None) => title.clone(),
            (None, _) => String::new(),
        }
    };

    let title_style = if selected_column.is_some() {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let block = Block::default()
        .borders(Borders::TOP)
        .title(Span::styled(format!(" {} ", title), title_style));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let item_width = ITEM_WIDTH as usize;
    let visible_items = ((inner.width / ITEM_WIDTH).max(1)) as usize;
    let first_item = scroll_offset(selected_column.unwrap_or(0), visible_items);
    let items = layout.items.iter().enumerate().skip(first_item).take(visible_items);

    let mut titles = Vec::new();
    let mut artists = Vec::new();
    for (i, item) in items {
        let style = if selected_column == Some(i) {
            Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        titles.push(Span::styled(
            truncate_string(&format!("{} {}", item_icon(item), item.title()), item_width - 1),
            style,
        ));
        titles.push(Span::raw(" "));

        let artist = item.artist_label().unwrap_or("");
        artists.push(Span::styled(
            truncate_string(artist, item_width - 1),
            Style::default().fg(Color::DarkGray),
        ));
        artists.push(Span::raw(" "));
    }

    let mut lines = vec![Line::from(titles)];
    if density == LayoutDensity::Comfortable {
        lines.push(Line::from(artists));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn item_icon(item: &MediaItem) -> &'static str {
    match item {
        MediaItem::Song { .. } => "♪",
        MediaItem::Playlist { .. } => "≡",
        MediaItem::Artist(_) => "☺",
    }
}

fn render_search_results(frame: &mut Frame, area: Rect, hits: &[SearchHit], selected: usize, query: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Results for \"{}\" ({}) (→ to open) ", query, hits.len()))
        .padding(Padding::horizontal(1))
        .border_style(border_style(true));

    if hits.is_empty() {
        let empty = Paragraph::new("  No matching items in the feed")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let content_width = area.width.saturating_sub(4) as usize;
    let num_width = calculate_num_width(hits.len());
    let kind_width = 9;
    let remaining = content_width.saturating_sub(1 + num_width + 3 + kind_width + 3 + 3);
    let title_width = (remaining * 55) / 100;
    let artist_width = remaining.saturating_sub(title_width);

    let items: Vec<ListItem> = hits
        .iter()
        .enumerate()
        .map(|(i, hit)| {
            let style = if i == selected {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(format!(
                " {:<num_width$}   {:<kind_width$}   {}   {}",
                i + 1,
                hit.item.kind(),
                truncate_string(hit.item.title(), title_width),
                truncate_string(hit.item.artist_label().unwrap_or("-"), artist_width),
                num_width = num_width,
                kind_width = kind_width,
            ))
            .style(style)
        })
        .collect();

    render_scrollable_list(frame, area, items, selected, block);
}
