//! ratatui-based UI.

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Context as _;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{event, terminal};
use galerie_application::{LightboxState, NavDirection, View, ViewController};
use galerie_core::{Catalog, Settings, Theme};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{
    Block, Borders, Clear, HighlightSpacing, List, ListItem, ListState, Paragraph, Wrap,
};
use unicode_width::UnicodeWidthStr;

const SETTINGS_MENU_PAGE_SIZE: usize = 0;
const SETTINGS_MENU_THEME: usize = 1;
const SETTINGS_MENU_ITEM_COUNT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiExit {
    Quit,
    /// Settings changed in a way that needs a fresh browsing session.
    Reload,
}

#[derive(Debug, Clone)]
pub struct UiOutcome {
    pub settings: Settings,
    pub exit: UiExit,
}

pub struct Ui {
    controller: ViewController,
    settings: Settings,
    settings_panel: SettingsPanel,
    cursor: usize,
}

impl Ui {
    pub fn new(controller: ViewController, mut settings: Settings) -> Self {
        settings.normalize();
        Self {
            controller,
            settings,
            settings_panel: SettingsPanel::default(),
            cursor: 0,
        }
    }

    pub fn run(&mut self) -> anyhow::Result<UiOutcome> {
        let mut terminal = setup_terminal()?;
        terminal.clear().ok();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.event_loop(&mut terminal)
        }));
        let restore_result = restore_terminal(&mut terminal);

        match (result, restore_result) {
            (Ok(Ok(outcome)), Ok(())) => Ok(outcome),
            (Ok(Ok(_)), Err(err)) => Err(err),
            (Ok(Err(err)), Ok(())) => Err(err),
            (Ok(_), Err(err)) => Err(err),
            (Err(panic), Ok(())) => Err(anyhow::anyhow!(panic_to_string(panic))),
            (Err(panic), Err(err)) => Err(anyhow::anyhow!(
                "{}\n(additionally failed to restore terminal: {err})",
                panic_to_string(panic)
            )),
        }
    }

    fn accent_color(&self) -> Color {
        match self.settings.theme {
            Theme::Light => Color::Blue,
            Theme::Dark => Color::Yellow,
        }
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> anyhow::Result<UiOutcome> {
        let tick_rate = Duration::from_millis(250);
        let mut needs_redraw = true;

        loop {
            if needs_redraw {
                terminal.draw(|frame| self.draw(frame.area(), frame))?;
                needs_redraw = false;
            }

            if !event::poll(tick_rate)? {
                continue;
            }

            match event::read()? {
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        continue;
                    }

                    needs_redraw = true;

                    if let Some(exit) = self.handle_key(key)? {
                        log::debug!("leaving ui: {exit:?}");
                        return Ok(UiOutcome {
                            settings: self.settings.clone(),
                            exit,
                        });
                    }
                }
                _ => {}
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<Option<UiExit>> {
        if self.settings_panel.open {
            self.handle_settings_panel_key(key)
        } else if self.controller.state().lightbox.state().is_open() {
            self.handle_lightbox_key(key)
        } else {
            self.handle_main_key(key)
        }
    }

    fn handle_main_key(&mut self, key: KeyEvent) -> anyhow::Result<Option<UiExit>> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Ok(Some(UiExit::Quit)),
            KeyCode::Tab | KeyCode::Right => {
                self.cycle_category(true);
                Ok(None)
            }
            KeyCode::BackTab | KeyCode::Left => {
                self.cycle_category(false);
                Ok(None)
            }
            KeyCode::PageDown | KeyCode::Char(']') => {
                self.controller.next_page();
                self.cursor = 0;
                Ok(None)
            }
            KeyCode::PageUp | KeyCode::Char('[') => {
                self.controller.prev_page();
                self.cursor = 0;
                Ok(None)
            }
            KeyCode::Home => {
                self.controller.set_page(1);
                self.cursor = 0;
                Ok(None)
            }
            KeyCode::End => {
                self.controller.set_page(usize::MAX);
                self.cursor = 0;
                Ok(None)
            }
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                let page = c.to_digit(10).map(|d| d as usize).unwrap_or(1);
                self.controller.set_page(page);
                self.cursor = 0;
                Ok(None)
            }
            KeyCode::Down => {
                let len = self.controller.current_view().page_items.len();
                self.cursor = (self.cursor + 1).min(len.saturating_sub(1));
                Ok(None)
            }
            KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                Ok(None)
            }
            KeyCode::Enter => {
                let id = self
                    .controller
                    .current_view()
                    .page_items
                    .get(self.cursor)
                    .map(|item| item.id);
                if let Some(id) = id {
                    self.controller.select_item(id);
                }
                Ok(None)
            }
            KeyCode::Char('s') => {
                self.settings_panel.open = true;
                self.settings_panel.selected = 0;
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn handle_lightbox_key(&mut self, key: KeyEvent) -> anyhow::Result<Option<UiExit>> {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                self.controller.close_lightbox();
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.controller.navigate_lightbox(NavDirection::Prev);
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
                self.controller.navigate_lightbox(NavDirection::Next);
            }
            _ => {}
        }
        Ok(None)
    }

    fn handle_settings_panel_key(&mut self, key: KeyEvent) -> anyhow::Result<Option<UiExit>> {
        match key.code {
            KeyCode::Esc => {
                self.settings_panel.open = false;
                if self.settings.page_size != self.controller.page_size() {
                    return Ok(Some(UiExit::Reload));
                }
                Ok(None)
            }
            KeyCode::Up => {
                self.settings_panel.selected = self.settings_panel.selected.saturating_sub(1);
                Ok(None)
            }
            KeyCode::Down => {
                self.settings_panel.selected = (self.settings_panel.selected + 1)
                    .min(SETTINGS_MENU_ITEM_COUNT.saturating_sub(1));
                Ok(None)
            }
            KeyCode::Left => {
                match self.settings_panel.selected {
                    SETTINGS_MENU_PAGE_SIZE => self.settings.decrease_page_size(),
                    SETTINGS_MENU_THEME => self.settings.cycle_theme(),
                    _ => {}
                }
                Ok(None)
            }
            KeyCode::Right => {
                match self.settings_panel.selected {
                    SETTINGS_MENU_PAGE_SIZE => self.settings.increase_page_size(),
                    SETTINGS_MENU_THEME => self.settings.cycle_theme(),
                    _ => {}
                }
                Ok(None)
            }
            KeyCode::Enter => {
                if self.settings_panel.selected == SETTINGS_MENU_THEME {
                    self.settings.cycle_theme();
                }
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn cycle_category(&mut self, forward: bool) {
        let categories = self.controller.catalog().categories();
        if categories.is_empty() {
            return;
        }
        let active = &self.controller.state().active_filter;
        let current = categories
            .iter()
            .position(|c| c.id == *active)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % categories.len()
        } else {
            (current + categories.len() - 1) % categories.len()
        };
        let id = categories[next].id.clone();
        self.controller.set_filter(id);
        self.cursor = 0;
    }

    fn draw(&mut self, area: Rect, frame: &mut ratatui::Frame) {
        frame.render_widget(Clear, area);

        let accent = self.accent_color();
        let view = self.controller.current_view();
        let catalog = self.controller.catalog();
        let cursor = self.cursor.min(view.page_items.len().saturating_sub(1));

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(area);

        let header = Paragraph::new(Text::from(header_lines(catalog, &view, accent)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(header, layout[0]);

        draw_page(frame, layout[1], catalog, &view, cursor, accent);

        let mut status = Vec::new();
        if view.total_pages > 1 {
            status.push(pager_line(view.effective_page, view.total_pages, accent));
        }
        status.push(Line::raw(results_text(view.page_items.len(), view.filtered_count)));
        let status = Paragraph::new(Text::from(status)).alignment(Alignment::Center);
        frame.render_widget(status, layout[2]);

        let footer = Paragraph::new(Text::from(footer_lines(view.lightbox)))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP));
        frame.render_widget(footer, layout[3]);

        if view.lightbox.is_open() {
            draw_lightbox(frame, area, catalog, &view, accent);
        }

        if self.settings_panel.open {
            draw_settings_panel(frame, area, &self.settings, self.settings_panel.selected);
        }

        self.cursor = cursor;
    }
}

#[derive(Debug, Default)]
struct SettingsPanel {
    open: bool,
    selected: usize,
}

fn header_lines(catalog: &Catalog, view: &View<'_>, accent: Color) -> Vec<Line<'static>> {
    let title = Line::from(vec![
        Span::styled("Galerie & Portfolio", Style::default().add_modifier(Modifier::BOLD)),
    ]);

    let mut chips = Vec::new();
    for category in catalog.categories() {
        if !chips.is_empty() {
            chips.push(Span::raw(" "));
        }
        let selected = category.id == *view.active_filter;
        chips.push(option_chip(&format!(" {} ", category.label), selected, accent));
    }

    vec![title, Line::raw(""), Line::from(chips)]
}

fn draw_page(
    frame: &mut ratatui::Frame,
    area: Rect,
    catalog: &Catalog,
    view: &View<'_>,
    cursor: usize,
    accent: Color,
) {
    let label = catalog
        .category_label(view.active_filter)
        .unwrap_or(view.active_filter.as_str());
    let title = format!("{label} — page {}/{}", view.effective_page, view.total_pages);
    let block = Block::default().borders(Borders::ALL).title(title);

    if view.page_items.is_empty() {
        let paragraph = Paragraph::new(Text::from(vec![Line::raw("Aucun projet dans cette catégorie.")]))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
        return;
    }

    let max_width = area.width.saturating_sub(6) as usize;
    let items: Vec<ListItem> = view
        .page_items
        .iter()
        .map(|item| {
            let category = catalog
                .category_label(&item.category)
                .unwrap_or(item.category.as_str());
            ListItem::new(Line::from(vec![
                Span::raw(truncate_to_width(&item.title, max_width.saturating_sub(16).max(8))),
                Span::styled(
                    format!("  {category}"),
                    Style::default().fg(Color::Gray),
                ),
            ]))
        })
        .collect();

    let highlight_style = Style::default()
        .fg(Color::Black)
        .bg(accent)
        .add_modifier(Modifier::BOLD);

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style)
        .highlight_symbol("> ")
        .highlight_spacing(HighlightSpacing::Always);

    let mut state = ListState::default();
    state.select(Some(cursor));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_lightbox(
    frame: &mut ratatui::Frame,
    area: Rect,
    catalog: &Catalog,
    view: &View<'_>,
    accent: Color,
) {
    let popup_area = centered_rect(70, 50, area);
    frame.render_widget(Clear, popup_area);

    let Some(item) = view.selected else {
        return;
    };

    let position = match view.selected_position {
        Some(pos) => format!("{pos} / {}", view.filtered_count),
        None => format!("– / {}", view.filtered_count),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(Span::styled(
            position,
            Style::default().add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(block.clone(), popup_area);

    let category = catalog
        .category_label(&item.category)
        .unwrap_or(item.category.as_str());
    let lines = vec![
        Line::raw(""),
        Line::from(Span::styled(
            item.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            category.to_string(),
            Style::default().fg(Color::Gray),
        )),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Source : ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(item.source.clone()),
        ]),
        Line::raw(""),
        Line::raw("←/→ précédent/suivant, Échap ferme."),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, block.inner(popup_area));
}

fn draw_settings_panel(frame: &mut ratatui::Frame, area: Rect, settings: &Settings, selected: usize) {
    let popup_area = centered_rect(45, 30, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default().borders(Borders::ALL).title(Span::styled(
        "Réglages",
        Style::default().add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(block.clone(), popup_area);

    let rows = [
        ("Projets par page", settings.page_size.to_string()),
        ("Thème", theme_label(settings.theme).to_string()),
    ];
    let mut lines = Vec::new();
    for (idx, (label, value)) in rows.iter().enumerate() {
        let marker = if idx == selected { "> " } else { "  " };
        let style = if idx == selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{label}: ‹ {value} ›"), style),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::raw("←/→ modifier, Échap ferme."));
    lines.push(Line::raw("Changer la taille de page relance la navigation."));

    let paragraph = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, block.inner(popup_area));
}

fn footer_lines(lightbox: LightboxState) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    if lightbox.is_open() {
        return vec![Line::from(vec![
            Span::styled("Échap", bold),
            Span::raw(" fermer  "),
            Span::styled("←/→", bold),
            Span::raw(" précédent/suivant"),
        ])];
    }

    vec![Line::from(vec![
        Span::styled("Échap", bold),
        Span::raw(" quitter  "),
        Span::styled("Tab", bold),
        Span::raw(" catégorie  "),
        Span::styled("↑/↓", bold),
        Span::raw(" déplacer  "),
        Span::styled("[/]", bold),
        Span::raw(" page  "),
        Span::styled("Entrée", bold),
        Span::raw(" voir  "),
        Span::styled("s", bold),
        Span::raw(" réglages"),
    ])]
}

fn pager_line(effective_page: usize, total_pages: usize, accent: Color) -> Line<'static> {
    let mut spans = vec![Span::raw("‹ ")];
    for page in 1..=total_pages {
        spans.push(option_chip(&format!(" {page} "), page == effective_page, accent));
    }
    spans.push(Span::raw(" ›"));
    Line::from(spans)
}

fn results_text(shown: usize, total: usize) -> String {
    let noun = if total == 1 { "projet" } else { "projets" };
    format!("Affichage de {shown} sur {total} {noun}")
}

fn theme_label(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "clair",
        Theme::Dark => "sombre",
    }
}

fn option_chip(label: &str, selected: bool, accent: Color) -> Span<'static> {
    let style = if selected {
        Style::default()
            .fg(Color::Black)
            .bg(accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    Span::styled(label.to_string(), style)
}

fn truncate_to_width(text: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut width = 0usize;
    for ch in text.chars() {
        let mut buf = [0u8; 4];
        let w = UnicodeWidthStr::width(&*ch.encode_utf8(&mut buf));
        if width + w + 1 > max_width {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push('…');
    out
}

fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    terminal::enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen).context("enter alt screen")?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("create terminal")
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    terminal::disable_raw_mode().context("disable raw mode")?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("leave alt screen")?;
    Ok(())
}

fn panic_to_string(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panic: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panic: {s}")
    } else {
        "panic: (unknown payload)".to_string()
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::KeyModifiers;

    use super::*;

    fn ui() -> Ui {
        let controller = ViewController::new(Arc::new(Catalog::builtin()), 9);
        Ui::new(controller, Settings::default())
    }

    fn press(ui: &mut Ui, code: KeyCode) -> Option<UiExit> {
        ui.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    #[test]
    fn tab_cycles_categories_in_catalog_order() {
        let mut ui = ui();
        press(&mut ui, KeyCode::Tab);
        assert_eq!(ui.controller.state().active_filter.as_str(), "gardiennage");
        press(&mut ui, KeyCode::BackTab);
        press(&mut ui, KeyCode::BackTab);
        assert_eq!(ui.controller.state().active_filter.as_str(), "evenements");
        press(&mut ui, KeyCode::Tab);
        assert!(ui.controller.state().active_filter.is_all());
    }

    #[test]
    fn enter_opens_item_under_cursor() {
        let mut ui = ui();
        press(&mut ui, KeyCode::Char(']'));
        press(&mut ui, KeyCode::Down);
        press(&mut ui, KeyCode::Enter);
        assert_eq!(
            ui.controller.current_view().lightbox,
            LightboxState::Open(11)
        );

        press(&mut ui, KeyCode::Right);
        assert_eq!(
            ui.controller.current_view().lightbox,
            LightboxState::Open(12)
        );

        assert_eq!(press(&mut ui, KeyCode::Esc), None);
        assert_eq!(ui.controller.current_view().lightbox, LightboxState::Closed);
        assert_eq!(press(&mut ui, KeyCode::Esc), Some(UiExit::Quit));
    }

    #[test]
    fn digit_jumps_to_page() {
        let mut ui = ui();
        press(&mut ui, KeyCode::Char('2'));
        assert_eq!(ui.controller.current_view().effective_page, 2);
        press(&mut ui, KeyCode::Char('9'));
        assert_eq!(ui.controller.current_view().effective_page, 2);
        press(&mut ui, KeyCode::Home);
        assert_eq!(ui.controller.current_view().effective_page, 1);
    }

    #[test]
    fn page_size_change_requests_reload() {
        let mut ui = ui();
        press(&mut ui, KeyCode::Char('s'));
        press(&mut ui, KeyCode::Right);
        assert_eq!(ui.settings.page_size, 10);
        assert_eq!(press(&mut ui, KeyCode::Esc), Some(UiExit::Reload));
    }

    #[test]
    fn theme_change_keeps_session() {
        let mut ui = ui();
        press(&mut ui, KeyCode::Char('s'));
        press(&mut ui, KeyCode::Down);
        press(&mut ui, KeyCode::Enter);
        assert_eq!(ui.settings.theme, Theme::Light);
        assert_eq!(press(&mut ui, KeyCode::Esc), None);
        assert!(!ui.settings_panel.open);
    }

    #[test]
    fn cursor_stays_on_page() {
        let mut ui = ui();
        for _ in 0..20 {
            press(&mut ui, KeyCode::Down);
        }
        assert_eq!(ui.cursor, 8);
        press(&mut ui, KeyCode::Tab);
        assert_eq!(ui.cursor, 0);
    }

    #[test]
    fn results_text_pluralizes() {
        assert_eq!(results_text(9, 18), "Affichage de 9 sur 18 projets");
        assert_eq!(results_text(1, 1), "Affichage de 1 sur 1 projet");
        assert_eq!(results_text(0, 0), "Affichage de 0 sur 0 projets");
    }

    #[test]
    fn theme_labels_are_french() {
        assert_eq!(theme_label(Theme::Light), "clair");
        assert_eq!(theme_label(Theme::Dark), "sombre");
    }

    #[test]
    fn truncate_respects_display_width() {
        assert_eq!(truncate_to_width("Station Hygiène", 40), "Station Hygiène");
        assert_eq!(truncate_to_width("Désinfection", 5), "Dési…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn pager_highlights_effective_page() {
        let line = pager_line(2, 3, Color::Yellow);
        assert_eq!(line.spans.len(), 5);
        assert_eq!(line.spans[2].content, " 2 ");
        assert_eq!(line.spans[2].style.bg, Some(Color::Yellow));
        assert_eq!(line.spans[1].style.bg, None);
    }
}
