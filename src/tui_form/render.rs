use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use super::app::{EditTarget, FormApp, StatusKind};
use super::fields::FieldRow;

pub(super) fn draw(frame: &mut ratatui::Frame, app: &FormApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(4),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_fields(frame, app, chunks[1]);
    draw_details(frame, app, chunks[2]);
    draw_status(frame, app, chunks[3]);
}

fn draw_header(frame: &mut ratatui::Frame, app: &FormApp, area: Rect) {
    let spans = vec![
        Span::styled(
            "repoconf",
            Style::default().fg(Color::Black).bg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(
            app.form.repository_id().to_string(),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw("  "),
        Span::styled(
            format!("fetched {}", app.fetched_at),
            Style::default().fg(Color::Gray),
        ),
    ];
    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM)),
        area,
    );
}

fn check(v: bool) -> &'static str {
    if v { "[x]" } else { "[ ]" }
}

pub(super) fn row_text(app: &FormApp, row: FieldRow) -> String {
    let draft = app.form.draft();
    let mark = if app.form.changed_fields().contains(&row.field()) {
        "*"
    } else {
        " "
    };
    match row {
        FieldRow::NeedsApproval => {
            format!("{} needs approval: {}", mark, check(draft.needs_approval))
        }
        FieldRow::DecryptEnvironmentVariables => format!(
            "{} decrypt env vars for: < {} >",
            mark,
            draft.decrypt_environment_variables.label()
        ),
        FieldRow::ConfigResolutionStrategy => format!(
            "{} config resolution: < {} >",
            mark,
            draft.config_resolution_strategy.label()
        ),
        FieldRow::OidcClaimKeys => {
            format!("{} oidc sub claim keys: {}", mark, app.form.claim_keys_text())
        }
        FieldRow::EnvironmentLine(i) => format!(
            "{}   {}",
            mark,
            draft
                .additional_environment
                .get(i)
                .map(String::as_str)
                .unwrap_or_default()
        ),
        FieldRow::NewEnvironmentLine => {
            let pending = app.form.pending_env_line();
            if pending.is_empty() {
                format!("{}   + (new line)", mark)
            } else {
                format!("{}   + {}", mark, pending)
            }
        }
        FieldRow::ClearCaches => {
            let checked = app.form.clear_caches_checked();
            if checked {
                format!(
                    "{} clear caches: {} (cache version {} -> {})",
                    mark,
                    check(true),
                    app.form.saved().cache_version,
                    draft.cache_version
                )
            } else {
                format!(
                    "{} clear caches: {} (cache version {})",
                    mark,
                    check(false),
                    draft.cache_version
                )
            }
        }
    }
}

fn draw_fields(frame: &mut ratatui::Frame, app: &FormApp, area: Rect) {
    let rows = app.rows();
    let mut items = Vec::with_capacity(rows.len() + 1);
    let mut selected = None;
    for (i, row) in rows.iter().enumerate() {
        if *row == FieldRow::NewEnvironmentLine || matches!(row, FieldRow::EnvironmentLine(0)) {
            // Section label, not selectable.
            if i == 0 || !matches!(rows[i - 1], FieldRow::EnvironmentLine(_)) {
                items.push(ListItem::new(Line::from(Span::styled(
                    "  environment:",
                    Style::default().fg(Color::Gray),
                ))));
            }
        }
        if i == app.selected {
            selected = Some(items.len());
        }
        items.push(ListItem::new(row_text(app, *row)));
    }

    let mut state = ListState::default();
    state.select(selected);

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled("Settings", Style::default().fg(Color::Yellow))),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));
    frame.render_stateful_widget(list, area, &mut state);
}

fn detail_lines(app: &FormApp) -> Vec<Line<'static>> {
    match app.selected_row() {
        FieldRow::NeedsApproval => vec![
            Line::from("Require approval before running builds from outside contributors"),
            Line::from("Enter/Space: toggle"),
        ],
        FieldRow::DecryptEnvironmentVariables => vec![
            Line::from("Who may decrypt secret environment variables"),
            Line::from("Left/Right: change"),
        ],
        FieldRow::ConfigResolutionStrategy => vec![
            Line::from("Which revision the CI configuration is read from"),
            Line::from("Left/Right: change"),
        ],
        FieldRow::OidcClaimKeys => vec![
            Line::from("Comma-separated claim keys added to the OIDC subject"),
            Line::from("Enter: edit"),
        ],
        FieldRow::EnvironmentLine(_) => vec![
            Line::from("Additional environment variable (KEY=VALUE)"),
            Line::from("d/Delete: remove (removes every identical line)"),
        ],
        FieldRow::NewEnvironmentLine => vec![
            Line::from("Append a KEY=VALUE line"),
            Line::from("Enter: edit; Enter again adds the line"),
        ],
        FieldRow::ClearCaches => vec![
            Line::from("Invalidate build caches on save by bumping the cache version"),
            Line::from("Enter/Space: toggle"),
        ],
    }
}

fn draw_details(frame: &mut ratatui::Frame, app: &FormApp, area: Rect) {
    let Some(editing) = &app.editing else {
        frame.render_widget(
            Paragraph::new(detail_lines(app))
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::BOTTOM)),
            area,
        );
        return;
    };

    let title = match editing.target {
        EditTarget::ClaimKeys => "OIDC sub claim keys (Enter/Esc: done)",
        EditTarget::PendingEnvironmentLine => "New line (Enter: add; Esc: keep pending)",
    };
    frame.render_widget(
        Paragraph::new(editing.input.buf.as_str())
            .block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
    let x = editing.input.cursor as u16;
    frame.set_cursor_position((area.x + 1 + x, area.y + 1));
}

fn draw_status(frame: &mut ratatui::Frame, app: &FormApp, area: Rect) {
    let changed = app.form.changed_fields();
    let mut spans = Vec::new();
    if changed.is_empty() {
        spans.push(Span::styled("saved", Style::default().fg(Color::Green)));
    } else {
        spans.push(Span::styled(
            format!("unsaved changes ({})", changed.len()),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(status) = &app.status {
        let style = match status.kind {
            StatusKind::Info => Style::default().fg(Color::White),
            StatusKind::Error => Style::default().fg(Color::Red),
        };
        spans.push(Span::raw("  "));
        spans.push(Span::styled(status.text.clone(), style));
    }

    let hint = if app.form.can_save() {
        "Ctrl-S save  u revert  Ctrl-R refetch  q quit"
    } else {
        "Ctrl-R refetch  q quit"
    };
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(spans),
            Line::from(Span::styled(hint, Style::default().fg(Color::Gray))),
        ])
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::TOP).title("Status")),
        area,
    );
}
