use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;
use roster_core::UserRecord;

use crate::app::{App, PageView, SelectedView};
use crate::prefetch::PageStatus;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_page(frame, app, chunks[0]);
    draw_selected(frame, app, chunks[1]);
    draw_prefetch(frame, app, chunks[2]);

    let help = Paragraph::new(Line::from(Span::styled(
        "Press \"j\" for next page, \"k\" for previous page, \"r\" to reshuffle, \"q\" to quit.",
        Style::default().fg(Color::Gray),
    )));
    frame.render_widget(help, chunks[3]);
}

fn draw_page(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Users - Page {} ", app.page()));

    match app.page_view() {
        PageView::Loading => {
            frame.render_widget(Paragraph::new("Loading...").block(block), area);
        }
        PageView::Failed(message) => {
            let error = Paragraph::new(Span::styled(
                format!("Error: {message}"),
                Style::default().fg(Color::Red),
            ))
            .block(block);
            frame.render_widget(error, area);
        }
        PageView::Ready(records) => {
            let header = Row::new(["Username", "Email", "Timestamp", "Spammy"])
                .style(Style::default().add_modifier(Modifier::BOLD));
            let rows: Vec<Row> = records.iter().map(record_row).collect();
            let table = Table::new(
                rows,
                [
                    Constraint::Length(12),
                    Constraint::Length(28),
                    Constraint::Length(20),
                    Constraint::Length(8),
                ],
            )
            .header(header)
            .block(block);
            frame.render_widget(table, area);
        }
    }
}

fn record_row(record: &UserRecord) -> Row<'static> {
    let spammy_style = if record.spammy {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };
    Row::new(vec![
        Cell::from(record.username.clone()),
        Cell::from(record.email.clone()),
        Cell::from(record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
        Cell::from(Span::styled(
            if record.spammy { "Yes" } else { "No" },
            spammy_style,
        )),
    ])
}

fn draw_selected(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Random user ");
    let line = match app.selected_view() {
        SelectedView::Loading => Line::from(format!("Loading {}...", app.selected_key())),
        SelectedView::Absent => Line::from(format!("No record for {}", app.selected_key())),
        SelectedView::Failed(message) => Line::from(Span::styled(
            format!("Error: {message}"),
            Style::default().fg(Color::Red),
        )),
        SelectedView::Ready(record) => Line::from(vec![
            Span::styled(
                record.username.clone(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" <{}> spammy: ", record.email)),
            Span::styled(
                if record.spammy { "Yes" } else { "No" },
                Style::default().fg(if record.spammy { Color::Red } else { Color::Green }),
            ),
        ]),
    };
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_prefetch(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Prefetch ");
    let pages = app.prefetch_pages();
    let line = if pages.is_empty() {
        Line::from(Span::styled("done", Style::default().fg(Color::Gray)))
    } else {
        let mut spans = Vec::with_capacity(pages.len() * 2);
        for (page, status) in pages {
            let (marker, color) = match status {
                PageStatus::Pending => ("...", Color::Yellow),
                PageStatus::Complete => ("ok", Color::Green),
            };
            spans.push(Span::styled(
                format!("p{page} {marker}"),
                Style::default().fg(color),
            ));
            spans.push(Span::raw("  "));
        }
        Line::from(spans)
    };
    frame.render_widget(Paragraph::new(line).block(block), area);
}
