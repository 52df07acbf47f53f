use std::cmp::max;

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Margin, Position, Rect};
use ratatui::style::{Style, Stylize as _};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Cell, Clear, HighlightSpacing, Paragraph, Row, Table, TableState, Wrap,
};
use unicode_width::UnicodeWidthStr;

use crate::VERSION;
use crate::app::{App, Notice, count_names, display_name};

const KEY_GAP: &str = "  ";
const GROUP_GAP: &str = " │ ";

type KeyGroup = &'static [(&'static str, &'static str)];

fn key_groups(app: &App) -> &'static [KeyGroup] {
    if app.notice().is_some() {
        &[&[("any key", "dismiss")]]
    } else if app.prompt().is_some() {
        &[&[("enter", "load"), ("esc", "cancel")], &[("ctrl-c", "quit")]]
    } else if app.is_running() {
        &[&[("space/x", "stop")], &[("q", "quit")]]
    } else {
        &[
            &[("s/enter", "start"), ("o", "open list")],
            &[("↑/k", "scroll up"), ("↓/j", "scroll down")],
            &[("q", "quit")],
        ]
    }
}

fn binding(key: &'static str, action: &'static str) -> [Span<'static>; 3] {
    [key.bold().light_cyan(), " ".into(), action.dim()]
}

/// Lay out key bindings so that no line is wider than `width`.
///
/// Groups are separated by a bar, a binding that does not fit starts the next line.
fn footer_lines(groups: &[KeyGroup], width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut current = Line::default();

    for group in groups {
        for (position, &(key, action)) in group.iter().enumerate() {
            let spans = binding(key, action);
            let binding_width: usize = spans.iter().map(Span::width).sum();
            let gap = if position == 0 { GROUP_GAP } else { KEY_GAP };

            if current.width() > 0 {
                if current.width() + gap.width() + binding_width > width {
                    lines.push(std::mem::take(&mut current));
                } else {
                    current.push_span(gap.dim());
                }
            }
            for span in spans {
                current.push_span(span);
            }
        }
    }
    lines.push(current);

    lines
}

#[derive(Default)]
pub struct Renderer {
    state: TableState,
}

impl Renderer {
    pub fn render(&mut self, frame: &mut Frame, app: &App) {
        let area = frame.area().inner(Margin {
            horizontal: 1,
            vertical: 0,
        });

        let footer = footer_lines(key_groups(app), area.width.saturating_sub(2) as usize);
        let footer_height = footer.len() as u16 + 2;

        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(footer_height),
        ]);
        let [title, current, table, footer_area] = layout.areas(area);

        self.render_title(frame, app, title);

        self.render_current(frame, app, current);
        self.render_table(frame, app, table);
        frame.render_widget(
            Paragraph::new(footer).centered().block(Block::bordered()),
            footer_area,
        );

        if let Some(input) = app.prompt() {
            self.render_prompt(frame, input, area);
        } else if let Some(notice) = app.notice() {
            self.render_notice(frame, notice, area);
        }
    }

    fn render_title(&self, frame: &mut Frame, app: &App, rect: Rect) {
        let name = Line::from(vec![
            std::env!("CARGO_PKG_NAME").bold(),
            " ".into(),
            VERSION.dim(),
        ]);

        let status = if app.is_running() {
            "picking".yellow()
        } else {
            count_names(app.names().len()).dim()
        };

        frame.render_widget(name.left_aligned(), rect);
        frame.render_widget(Line::from(status).right_aligned(), rect);
    }

    fn render_current(&self, frame: &mut Frame, app: &App, rect: Rect) {
        let title = Line::from(" Current ").centered();
        let block = Block::bordered().title(title);

        // Hidden until the first tick of a run
        let name = match app.current() {
            Some(highlight) if app.is_running() => display_name(&highlight.name).bold().yellow(),
            _ => "".into(),
        };

        frame.render_widget(Paragraph::new(Line::from(name)).centered().block(block), rect);
    }

    fn render_table(&mut self, frame: &mut Frame, app: &App, rect: Rect) {
        let highlight_style = Style::default().bold().reversed();
        let header_style = Style::default().bold().reversed();
        let highlight_symbol = Line::from("> ");
        let column_spacing = 2;

        let names = app.names();
        let number_width = names.len().to_string().width() as u16;

        let rows = names.iter().enumerate().map(|(index, name)| {
            let name = if name.is_empty() {
                display_name(name).dim()
            } else {
                name.as_str().into()
            };
            Row::new([Cell::from((index + 1).to_string()), Cell::from(name)]).height(1)
        });

        let header = Row::new([Cell::from("#"), Cell::from(format!("Names ({})", names.len()))])
            .style(header_style)
            .height(1);

        let selected = app
            .current()
            .filter(|_| app.is_running())
            .map(|highlight| highlight.index)
            .filter(|index| *index < names.len());
        self.state.select(selected);
        if selected.is_none() {
            *self.state.offset_mut() = app.scroll();
        }

        let t = Table::default()
            .header(header)
            .rows(rows)
            .flex(Flex::Start)
            .column_spacing(column_spacing)
            .widths([Constraint::Length(max(number_width, 1)), Constraint::Min(4)])
            .row_highlight_style(highlight_style)
            .highlight_symbol(highlight_symbol)
            .highlight_spacing(HighlightSpacing::Always);

        frame.render_stateful_widget(t, rect, &mut self.state);
    }

    fn render_notice(&self, frame: &mut Frame, notice: &Notice, area: Rect) {
        let (title, text) = match notice {
            Notice::Picked(name) => (" Picked ".green(), display_name(name).bold()),
            Notice::Info(message) => (" Info ".into(), message.as_str().into()),
            Notice::Error(message) => (" Error ".red(), message.as_str().into()),
        };

        let width = max(20, text.width() as u16 + 4).min(area.width);
        let vertical = Layout::vertical([Constraint::Length(3)]).flex(Flex::Center);
        let horizontal = Layout::horizontal([Constraint::Max(width)]).flex(Flex::Center);
        let [area] = vertical.areas(area);
        let [area] = horizontal.areas(area);

        let block = Block::bordered().title(Line::from(title).centered());
        let text = Paragraph::new(Line::from(text).centered())
            .wrap(Wrap { trim: true })
            .block(block);

        frame.render_widget(Clear, area);
        frame.render_widget(text, area);
    }

    fn render_prompt(&self, frame: &mut Frame, input: &str, area: Rect) {
        let vertical = Layout::vertical([Constraint::Length(3)]).flex(Flex::Center);
        let horizontal = Layout::horizontal([Constraint::Max(max(40, input.width() as u16 + 4))])
            .flex(Flex::Center);
        let [area] = vertical.areas(area);
        let [area] = horizontal.areas(area);

        let title = Line::from("Open list").centered();
        let block = Block::bordered().title(title);
        let text = Paragraph::new(format!(" {input}")).block(block);

        frame.render_widget(Clear, area);

        frame.render_widget(text, area);

        frame.set_cursor_position(Position::new(area.x + input.width() as u16 + 2, area.y + 1));
    }
}
