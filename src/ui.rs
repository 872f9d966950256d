use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};
use tui_dispatch::{
    Component, EventContext, EventKind, EventRoutingState, HandlerResponse, RenderContext,
};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle,
    SelectionStyle, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use crate::action::Action;
use crate::detail::{DetailView, ItemLine, StatLine};
use crate::state::{AppState, DetailTab, FocusArea, Language, Settings};

/// Interval of the `Tick` subscription.
pub const TICK_MS: u64 = 100;
/// Ticks each loading quip stays on screen.
const QUIP_TICKS: u64 = 12;

const BG_BASE: Color = Color::Rgb(12, 18, 28);
const BG_PANEL: Color = Color::Rgb(20, 32, 46);
const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);

const QUIPS_EN: [&str; 6] = [
    "Waking up Snorlax...",
    "Counting Magikarp splashes...",
    "Polishing Poké Balls...",
    "Asking Professor Oak...",
    "Herding Tauros...",
    "Untangling Tangela...",
];

const QUIPS_DE: [&str; 6] = [
    "Relaxo wird geweckt...",
    "Karpador-Platscher werden gezählt...",
    "Pokébälle werden poliert...",
    "Professor Eich wird gefragt...",
    "Tauros werden zusammengetrieben...",
    "Tangela wird entwirrt...",
];

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DexComponentId {
    List,
    Detail,
    Search,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DexContext {
    List,
    Detail,
    Search,
}

impl EventRoutingState<DexComponentId, DexContext> for AppState {
    fn focused(&self) -> Option<DexComponentId> {
        if self.search.editing {
            return Some(DexComponentId::Search);
        }
        match self.focus {
            FocusArea::List => Some(DexComponentId::List),
            FocusArea::Detail => Some(DexComponentId::Detail),
        }
    }

    fn modal(&self) -> Option<DexComponentId> {
        if self.search.editing {
            Some(DexComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: DexComponentId) -> DexContext {
        match id {
            DexComponentId::List => DexContext::List,
            DexComponentId::Detail => DexContext::Detail,
            DexComponentId::Search => DexContext::Search,
        }
    }

    fn default_context(&self) -> DexContext {
        DexContext::List
    }
}

/// Quip shown while a list is loading. Languages without their own set use English.
pub fn loading_quip(language: Language, tick: u64) -> &'static str {
    let quips: &[&'static str] = match language {
        Language::De => &QUIPS_DE,
        _ => &QUIPS_EN,
    };
    quips[((tick / QUIP_TICKS) % quips.len() as u64) as usize]
}

pub struct DexUi {
    list: SelectList,
    status_bar: StatusBar,
}

impl Default for DexUi {
    fn default() -> Self {
        Self::new()
    }
}

impl DexUi {
    pub fn new() -> Self {
        Self {
            list: SelectList::new(),
            status_bar: StatusBar::new(),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        _render_ctx: RenderContext,
        event_ctx: &mut EventContext<DexComponentId>,
    ) {
        let base = Block::default().style(Style::default().bg(BG_BASE));
        frame.render_widget(base, area);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(area);

        render_header(frame, layout[0], state, event_ctx);
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(36), Constraint::Percentage(64)])
            .split(layout[1]);
        render_list(frame, body[0], state, event_ctx, &mut self.list);
        render_detail(frame, body[1], state, event_ctx);
        render_footer(frame, layout[2], state, &mut self.status_bar);
    }

    pub fn handle_list_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let actions = match event {
            EventKind::Key(key) => match key.code {
                crossterm::event::KeyCode::Enter => vec![Action::ListOpen],
                crossterm::event::KeyCode::Esc if state.detail.visible => {
                    vec![Action::DetailClose]
                }
                crossterm::event::KeyCode::PageDown => vec![Action::ListPage(1)],
                crossterm::event::KeyCode::PageUp => vec![Action::ListPage(-1)],
                crossterm::event::KeyCode::Home | crossterm::event::KeyCode::Char('g') => {
                    vec![Action::ListJumpTop]
                }
                crossterm::event::KeyCode::End | crossterm::event::KeyCode::Char('G') => {
                    vec![Action::ListJumpBottom]
                }
                _ => {
                    let items = list_items(state);
                    let props = SelectListProps {
                        items: &items,
                        count: items.len(),
                        selected: state.list.cursor.min(items.len().saturating_sub(1)),
                        is_focused: true,
                        style: list_style(),
                        behavior: SelectListBehavior {
                            show_scrollbar: true,
                            wrap_navigation: false,
                        },
                        on_select: Action::ListSelect,
                        render_item: &|item| item.clone(),
                    };
                    let actions: Vec<_> = self.list.handle_event(event, props).into_iter().collect();
                    return handler_response(actions);
                }
            },
            EventKind::Scroll { delta, .. } => vec![Action::ListMove((*delta * 3) as i16)],
            _ => vec![],
        };
        handler_response(actions)
    }

    pub fn handle_detail_event(
        &mut self,
        event: &EventKind,
        _state: &AppState,
    ) -> HandlerResponse<Action> {
        let actions = match event {
            EventKind::Key(key) => match key.code {
                crossterm::event::KeyCode::Left | crossterm::event::KeyCode::Char('h') => {
                    vec![Action::DetailTabPrev]
                }
                crossterm::event::KeyCode::Right | crossterm::event::KeyCode::Char('l') => {
                    vec![Action::DetailTabNext]
                }
                crossterm::event::KeyCode::Up | crossterm::event::KeyCode::Char('k') => {
                    vec![Action::SelectPrev]
                }
                crossterm::event::KeyCode::Down | crossterm::event::KeyCode::Char('j') => {
                    vec![Action::SelectNext]
                }
                crossterm::event::KeyCode::Char('1') => vec![Action::DetailTabOpen(DetailTab::About)],
                crossterm::event::KeyCode::Char('2') => vec![Action::DetailTabOpen(DetailTab::Stats)],
                crossterm::event::KeyCode::Char('3') => vec![Action::DetailTabOpen(DetailTab::Items)],
                crossterm::event::KeyCode::Esc => vec![Action::DetailClose],
                _ => vec![],
            },
            _ => vec![],
        };
        handler_response(actions)
    }

    pub fn handle_search_event(
        &mut self,
        event: &EventKind,
        _state: &AppState,
    ) -> HandlerResponse<Action> {
        let actions = match event {
            EventKind::Key(key) => match key.code {
                crossterm::event::KeyCode::Esc => vec![Action::SearchCancel],
                crossterm::event::KeyCode::Enter => vec![Action::SearchSubmit],
                crossterm::event::KeyCode::Backspace => vec![Action::SearchBackspace],
                crossterm::event::KeyCode::Char(ch) => vec![Action::SearchInput(ch)],
                _ => vec![],
            },
            _ => vec![],
        };
        handler_response(actions)
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn render_header(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    event_ctx: &mut EventContext<DexComponentId>,
) {
    if state.search.editing {
        event_ctx.set_component_area(DexComponentId::Search, area);
    }
    let search = if state.search.editing {
        format!("/{}_", state.search.term)
    } else if state.search.term.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", state.search.term)
    };
    let volume = (state.settings.audio_volume * 100.0).round() as u16;
    let mut spans = tier_strip(&state.settings);
    spans.extend([
        Span::styled(
            format!(" ({})", state.settings.tier.limit),
            Style::default().fg(TEXT_DIM),
        ),
        Span::raw("  |  Lang: "),
        Span::styled(
            state.settings.language.code().to_ascii_uppercase(),
            Style::default().fg(ACCENT_GOLD),
        ),
        Span::raw("  |  Vol: "),
        Span::styled(format!("{volume}%"), Style::default().fg(ACCENT_GOLD)),
        Span::raw("  |  Search: "),
        Span::styled(search, Style::default().fg(ACCENT_TEAL)),
    ]);
    let line = Line::from(spans);

    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(TEXT_DIM))
        .title("DEXVIEW");
    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Generation picker: every tier, the selected one highlighted.
fn tier_strip(settings: &Settings) -> Vec<Span<'static>> {
    let mut spans = vec![Span::raw("GEN ")];
    for (tier, selected) in settings.tiers() {
        if selected {
            spans.push(Span::styled(
                format!("[{}]", tier.generation),
                Style::default().fg(ACCENT_TEAL).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(
                format!(" {} ", tier.generation),
                Style::default().fg(TEXT_DIM),
            ));
        }
    }
    spans
}

fn render_list(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    event_ctx: &mut EventContext<DexComponentId>,
    list: &mut SelectList,
) {
    event_ctx.set_component_area(DexComponentId::List, area);
    let title = format!(
        "DEX {}/{}",
        state.list.displayed.len(),
        state.list.all.len()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(focus_border(state, FocusArea::List));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.list.all.is_empty() && state.list.loading {
        let text = Paragraph::new(loading_quip(state.settings.language, state.tick))
            .style(Style::default().fg(TEXT_DIM))
            .alignment(Alignment::Center);
        frame.render_widget(text, inner);
        return;
    }

    let items = list_items(state);
    let props = SelectListProps {
        items: &items,
        count: items.len(),
        selected: state.list.cursor.min(items.len().saturating_sub(1)),
        is_focused: state.focus == FocusArea::List,
        style: list_style(),
        behavior: SelectListBehavior {
            show_scrollbar: true,
            wrap_navigation: false,
        },
        on_select: Action::ListSelect,
        render_item: &|item| item.clone(),
    };
    list.render(frame, inner, props);
}

fn list_items(state: &AppState) -> Vec<Line<'static>> {
    let language = state.settings.language;
    state
        .displayed_entities()
        .map(|entity| {
            let marker = if state.list.selected == Some(entity.id) {
                ">"
            } else {
                " "
            };
            Line::from(format!(
                "{marker} #{:03} {}",
                entity.id,
                format_name(entity.localized_name(language))
            ))
        })
        .collect()
}

fn list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: None,
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(TEXT_MAIN)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}

fn render_detail(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    event_ctx: &mut EventContext<DexComponentId>,
) {
    let Some(view) = state.detail_view() else {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("DATA")
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
            .border_style(Style::default().fg(TEXT_DIM));
        let hint = Paragraph::new("Enter opens the highlighted entry, x reveals a random one.")
            .block(block)
            .style(Style::default().fg(TEXT_DIM))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(hint, area);
        return;
    };

    event_ctx.set_component_area(DexComponentId::Detail, area);
    let accent = view
        .primary_type
        .as_deref()
        .map(type_color)
        .unwrap_or(ACCENT_TEAL);
    let border = if state.focus == FocusArea::Detail {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(accent)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("#{:03} {}", view.id, format_name(&view.display_name)))
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(border);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(4),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(summary_text(&view, state, accent)).style(Style::default().fg(TEXT_MAIN)),
        layout[0],
    );

    let titles: Vec<&str> = DetailTab::ALL.iter().map(|tab| tab.label()).collect();
    let tabs = Tabs::new(titles)
        .select(state.detail.active_tab.index())
        .style(Style::default().fg(TEXT_DIM))
        .highlight_style(Style::default().fg(accent).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, layout[1]);

    let content = match state.detail.active_tab {
        DetailTab::About => about_text(&view),
        DetailTab::Stats => stats_text(&view, accent),
        DetailTab::Items => items_text(&view),
    };
    frame.render_widget(
        Paragraph::new(content)
            .style(Style::default().fg(TEXT_MAIN))
            .wrap(Wrap { trim: true }),
        layout[2],
    );
}

fn summary_text(view: &DetailView, state: &AppState, accent: Color) -> Text<'static> {
    let mut types = Vec::new();
    for (idx, name) in view.types.iter().enumerate() {
        if idx > 0 {
            types.push(Span::raw(" / "));
        }
        types.push(Span::styled(
            name.to_ascii_uppercase(),
            Style::default().fg(type_color(name)).add_modifier(Modifier::BOLD),
        ));
    }
    let cry = match (&view.cry_url, state.cry.is_playing()) {
        (None, _) => "no cry",
        (Some(_), true) => "cry playing",
        (Some(_), false) => "p: cry",
    };
    types.push(Span::styled(format!("   {cry}"), Style::default().fg(TEXT_DIM)));
    let genus = view.genus.clone().unwrap_or_default();
    Text::from(vec![
        Line::from(types),
        Line::from(Span::styled(genus, Style::default().fg(accent))),
    ])
}

fn about_text(view: &DetailView) -> Text<'static> {
    let description_style = if view.translated {
        Style::default().fg(TEXT_MAIN)
    } else {
        Style::default().fg(TEXT_DIM).add_modifier(Modifier::ITALIC)
    };
    let mut lines = vec![
        Line::from(Span::styled(view.description.clone(), description_style)),
        Line::from(""),
        Line::from(format!(
            "Height: {:.1} m   Weight: {:.1} kg",
            view.height_m, view.weight_kg
        )),
    ];
    if !view.abilities.is_empty() {
        lines.push(Line::from(format!("Abilities: {}", view.abilities.join(", "))));
    }
    if let Some(sprite) = &view.sprite_url {
        lines.push(Line::from(Span::styled(
            format!("Artwork: {sprite}"),
            Style::default().fg(TEXT_DIM),
        )));
    }
    Text::from(lines)
}

fn stats_text(view: &DetailView, accent: Color) -> Text<'static> {
    let mut lines: Vec<Line> = view
        .stats
        .iter()
        .map(|stat| {
            Line::from(vec![
                Span::raw(format!("{:>7} {:>3} ", stat.label, stat.value)),
                Span::styled(stat_bar(stat), Style::default().fg(accent)),
            ])
        })
        .collect();
    lines.push(Line::from(Span::styled(
        format!("{:>7} {:>3}", "Total", view.stat_total()),
        Style::default().fg(ACCENT_GOLD),
    )));
    Text::from(lines)
}

fn stat_bar(stat: &StatLine) -> String {
    let bar_len = (stat.value as usize / 10).clamp(1, 20);
    "#".repeat(bar_len)
}

fn items_text(view: &DetailView) -> Text<'static> {
    if view.items.is_empty() {
        return Text::from(Line::from(Span::styled(
            "No held items.",
            Style::default().fg(TEXT_DIM),
        )));
    }
    let lines = view
        .items
        .iter()
        .flat_map(|item| {
            let mut lines = vec![Line::from(vec![
                Span::styled(format_name(&item.name), Style::default().fg(TEXT_MAIN)),
                Span::styled(
                    format!("  up to {}% in {} versions", item.rarity, item.versions),
                    Style::default().fg(TEXT_DIM),
                ),
            ])];
            if let Some(cost) = item.cost {
                lines.push(Line::from(Span::styled(
                    format!("  Cost: {cost}"),
                    Style::default().fg(ACCENT_GOLD),
                )));
            }
            if let Some(sprite) = &item.sprite {
                lines.push(Line::from(Span::styled(
                    format!("  Sprite: {sprite}"),
                    Style::default().fg(TEXT_DIM),
                )));
            }
            lines
        })
        .collect::<Vec<_>>();
    Text::from(lines)
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let status = state.message.clone().unwrap_or_else(|| {
        if state.list.loading {
            loading_quip(state.settings.language, state.tick).to_string()
        } else {
            String::new()
        }
    });
    let (left_hints, center_hints) = status_hints(state);
    let status_span = Span::styled(status.as_str(), Style::default().fg(ACCENT_GOLD));
    let status_items = [StatusBarItem::span(status_span)];

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(ACCENT_TEAL)),
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&left_hints).with_separator("  "),
        center: StatusBarSection::hints(&center_hints).with_separator("  "),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}

fn status_hints(state: &AppState) -> (Vec<StatusBarHint<'static>>, Vec<StatusBarHint<'static>>) {
    if state.search.editing {
        let left = vec![
            StatusBarHint::new("Enter", "Apply"),
            StatusBarHint::new("Esc", "Clear"),
            StatusBarHint::new("Bksp", "Delete"),
        ];
        return (left, Vec::new());
    }

    let left = match state.focus {
        FocusArea::List => vec![
            StatusBarHint::new("j/k", "Move"),
            StatusBarHint::new("Enter", "Open"),
            StatusBarHint::new("PgUp/PgDn", "Page"),
        ],
        FocusArea::Detail => vec![
            StatusBarHint::new("h/l", "Tabs"),
            StatusBarHint::new("j/k", "Prev/Next"),
            StatusBarHint::new("Esc", "Close"),
        ],
    };
    let center = vec![
        StatusBarHint::new("/", "Search"),
        StatusBarHint::new("x", "Random"),
        StatusBarHint::new("p", "Cry"),
        StatusBarHint::new("[ ]", "Gen"),
        StatusBarHint::new("L", "Lang"),
        StatusBarHint::new("+/-", "Vol"),
        StatusBarHint::new("q", "Quit"),
    ];
    (left, center)
}

fn focus_border(state: &AppState, area: FocusArea) -> Style {
    if state.focus == area {
        Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_DIM)
    }
}

fn format_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Panel accent for a type name.
pub fn type_color(name: &str) -> Color {
    match name {
        "normal" => Color::Rgb(168, 168, 120),
        "fire" => Color::Rgb(240, 128, 48),
        "water" => Color::Rgb(104, 144, 240),
        "electric" => Color::Rgb(248, 208, 48),
        "grass" => Color::Rgb(120, 200, 80),
        "ice" => Color::Rgb(152, 216, 216),
        "fighting" => Color::Rgb(192, 48, 40),
        "poison" => Color::Rgb(160, 64, 160),
        "ground" => Color::Rgb(224, 192, 104),
        "flying" => Color::Rgb(168, 144, 240),
        "psychic" => Color::Rgb(248, 88, 136),
        "bug" => Color::Rgb(168, 184, 32),
        "rock" => Color::Rgb(184, 160, 56),
        "ghost" => Color::Rgb(112, 88, 152),
        "dragon" => Color::Rgb(112, 56, 248),
        "dark" => Color::Rgb(112, 88, 72),
        "steel" => Color::Rgb(184, 184, 208),
        "fairy" => Color::Rgb(238, 153, 172),
        _ => ACCENT_TEAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LimitTier;

    #[test]
    fn quips_rotate_and_fall_back_to_english() {
        assert_eq!(loading_quip(Language::En, 0), QUIPS_EN[0]);
        assert_eq!(loading_quip(Language::En, QUIP_TICKS), QUIPS_EN[1]);
        assert_eq!(loading_quip(Language::De, 0), QUIPS_DE[0]);
        assert_eq!(loading_quip(Language::Ko, 0), QUIPS_EN[0]);
        assert_eq!(
            loading_quip(Language::En, QUIP_TICKS * QUIPS_EN.len() as u64),
            QUIPS_EN[0]
        );
    }

    fn plain(text: &Text) -> Vec<String> {
        text.lines
            .iter()
            .map(|line| line.spans.iter().map(|span| span.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn items_show_cost_and_sprite() {
        let mut view = DetailView::derive(&Default::default(), Language::En, 0);
        view.items = vec![
            ItemLine {
                name: "light-ball".to_string(),
                rarity: 5,
                versions: 2,
                sprite: Some("light-ball.png".to_string()),
                cost: Some(1000),
            },
            ItemLine {
                name: "oran-berry".to_string(),
                rarity: 50,
                versions: 1,
                sprite: None,
                cost: None,
            },
        ];

        let lines = plain(&items_text(&view));
        assert_eq!(
            lines,
            vec![
                "Light Ball  up to 5% in 2 versions",
                "  Cost: 1000",
                "  Sprite: light-ball.png",
                "Oran Berry  up to 50% in 1 versions",
            ]
        );
    }

    #[test]
    fn tier_strip_marks_selected_generation() {
        let mut settings = Settings::default();
        settings.tier = LimitTier::for_generation(3).unwrap();

        let strip: String = tier_strip(&settings)
            .iter()
            .map(|span| span.content.as_ref())
            .collect();
        assert_eq!(strip, "GEN  1  2 [3] 4  5  6  7  8  9 ");
    }

    #[test]
    fn names_are_title_cased_per_segment() {
        assert_eq!(format_name("mr-mime"), "Mr Mime");
        assert_eq!(format_name("Bisasam"), "Bisasam");
    }
}
