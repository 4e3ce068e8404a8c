//! Terminal layout and rendering of the portfolio page.
//!
//! The page is a single centered column: a hero with the typed line, a few
//! text sections, a grid of language cards and a footer. Positions are in
//! content rows; the view scrolls them against the terminal.

use glyphfall_config::Config;
use glyphfall_core::{Dom, ElementId, PageDocument, Rect as PxRect};
use glyphfall_page::{
    BOOT_SCREEN_ID, BOOT_STATUS_CLASS, CARD_CLASS, OBSERVE_CLASS, PageAnimator, TYPED_ID, YEAR_ID,
};
use glyphfall_rain::{CELL_HEIGHT_PX, CELL_WIDTH_PX};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
};

const MAX_CONTENT_WIDTH: u16 = 72;
const HERO_HEIGHT: u16 = 7;
const SECTION_GAP: u16 = 2;
const HEADER_HEIGHT: u16 = 2;
const CARD_WIDTH: u16 = 22;
const CARD_HEIGHT: u16 = 4;
const CARD_GAP: u16 = 2;
const BOOT_WIDTH: u16 = 46;
const BOOT_HEIGHT: u16 = 7;
/// Opacity of blocks that have not scrolled into view yet.
const UNREVEALED_OPACITY: f32 = 0.35;

const ACCENT: (u8, u8, u8) = (0x21, 0xff, 0x6a);
const INK: (u8, u8, u8) = (0xd8, 0xe6, 0xdc);
const SHADOW: (u8, u8, u8) = (0x06, 0x11, 0x0b);
const MUTED: (u8, u8, u8) = (0x80, 0x80, 0x80);

#[derive(Debug)]
struct SectionSpec {
    title: &'static str,
    body: &'static [&'static str],
    /// The language cards follow this section.
    cards: bool,
}

static ABOUT: SectionSpec = SectionSpec {
    title: "about",
    body: &[
        "I build compilers, runtimes and the tools around them.",
        "Most days that means parsers, allocators and profilers;",
        "on good days it means deleting code nobody needs.",
    ],
    cards: false,
};

static LANGUAGES: SectionSpec = SectionSpec {
    title: "languages",
    body: &[],
    cards: true,
};

static PROJECTS: SectionSpec = SectionSpec {
    title: "projects",
    body: &[
        "tinyc      a C subset compiler emitting x86-64",
        "rope.rs    persistent ropes for editors",
        "tracefold  flamegraph folding for huge traces",
    ],
    cards: false,
};

static CONTACT: SectionSpec = SectionSpec {
    title: "contact",
    body: &["mail  hello@glyphfall.dev", "code  github.com/glyphfall"],
    cards: false,
};

const CARDS: &[(&str, &str)] = &[
    ("Rust", "ownership, no GC"),
    ("C++", "RAII and templates"),
    ("C", "pointers all the way"),
    ("Go", "channels and tooling"),
    ("Python", "glue and prototypes"),
    ("TypeScript", "types for the web"),
];

/// What a placed block shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Hero,
    Section(usize),
    Card(usize),
    Footer,
}

/// A block positioned in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placed {
    pub kind: BlockKind,
    pub el: Option<ElementId>,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// Scroll state and the element handles of the page.
#[derive(Debug)]
pub struct PageView {
    scroll: u16,
    reveal_class: String,
    hover_class: String,
    sections: Vec<(ElementId, &'static SectionSpec)>,
    cards: Vec<ElementId>,
}

impl PageView {
    /// Build the page document and the view over it.
    pub fn build(config: &Config) -> (PageDocument, PageView) {
        let mut doc = PageDocument::new();
        doc.insert(Some(BOOT_SCREEN_ID), &[]);
        doc.insert_text(None, &[BOOT_STATUS_CLASS], "booting");
        doc.insert(Some(TYPED_ID), &[]);

        let mut sections = Vec::new();
        for spec in [&ABOUT, &LANGUAGES, &PROJECTS, &CONTACT] {
            sections.push((doc.insert(None, &[OBSERVE_CLASS]), spec));
        }
        let cards = CARDS
            .iter()
            .map(|_| doc.insert(None, &[OBSERVE_CLASS, CARD_CLASS]))
            .collect();
        doc.insert(Some(YEAR_ID), &[]);

        let view = PageView {
            scroll: 0,
            reveal_class: config.reveal.class.clone(),
            hover_class: config.hover.class.clone(),
            sections,
            cards,
        };
        (doc, view)
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    /// Scroll by `delta` rows, clamped to the content.
    pub fn scroll_by(&mut self, delta: i32, width: u16, height: u16) {
        let max = self.content_height(width).saturating_sub(height) as i32;
        self.scroll = (self.scroll as i32 + delta).clamp(0, max.max(0)) as u16;
    }

    pub fn scroll_to_end(&mut self, width: u16, height: u16) {
        self.scroll = self.content_height(width).saturating_sub(height);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    /// Keep the scroll position valid after a resize.
    pub fn clamp_scroll(&mut self, width: u16, height: u16) {
        self.scroll_by(0, width, height);
    }

    pub fn content_height(&self, width: u16) -> u16 {
        self.layout(width)
            .iter()
            .map(|p| p.y + p.height)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Place every block for a terminal `width` columns wide.
    pub fn layout(&self, width: u16) -> Vec<Placed> {
        let content_width = width.saturating_sub(4).clamp(1, MAX_CONTENT_WIDTH);
        let left = (width.saturating_sub(content_width)) / 2;
        let mut placed = Vec::new();
        let mut y = 1;

        placed.push(Placed {
            kind: BlockKind::Hero,
            el: None,
            x: left,
            y,
            width: content_width,
            height: HERO_HEIGHT,
        });
        y += HERO_HEIGHT + SECTION_GAP;

        for (index, (el, spec)) in self.sections.iter().enumerate() {
            let height = HEADER_HEIGHT + spec.body.len() as u16;
            placed.push(Placed {
                kind: BlockKind::Section(index),
                el: Some(*el),
                x: left,
                y,
                width: content_width,
                height,
            });
            y += height;

            if spec.cards {
                let per_row = ((content_width + CARD_GAP) / (CARD_WIDTH + CARD_GAP)).max(1);
                for (i, card) in self.cards.iter().enumerate() {
                    let i = i as u16;
                    placed.push(Placed {
                        kind: BlockKind::Card(i as usize),
                        el: Some(*card),
                        x: left + (i % per_row) * (CARD_WIDTH + CARD_GAP),
                        y: y + (i / per_row) * (CARD_HEIGHT + 1),
                        width: CARD_WIDTH.min(content_width),
                        height: CARD_HEIGHT,
                    });
                }
                let rows = (self.cards.len() as u16).div_ceil(per_row);
                y += rows * (CARD_HEIGHT + 1);
            }
            y += SECTION_GAP;
        }

        placed.push(Placed {
            kind: BlockKind::Footer,
            el: None,
            x: left,
            y,
            width: content_width,
            height: 1,
        });
        placed
    }

    /// Pixel rectangle of a block on screen, in viewport coordinates.
    fn screen_px(&self, p: &Placed) -> PxRect {
        PxRect::new(
            (p.x as u32 * CELL_WIDTH_PX) as f32,
            (p.y as f32 - self.scroll as f32) * CELL_HEIGHT_PX as f32,
            (p.width as u32 * CELL_WIDTH_PX) as f32,
            (p.height as u32 * CELL_HEIGHT_PX) as f32,
        )
    }

    /// Screen rectangles of every element that can be revealed.
    pub fn observed_rects(&self, width: u16) -> Vec<(ElementId, PxRect)> {
        self.layout(width)
            .iter()
            .filter_map(|p| p.el.map(|el| (el, self.screen_px(p))))
            .collect()
    }

    /// Screen rectangles of the hoverable cards.
    pub fn card_rects(&self, width: u16) -> Vec<(ElementId, PxRect)> {
        self.layout(width)
            .iter()
            .filter(|p| matches!(p.kind, BlockKind::Card(_)))
            .filter_map(|p| p.el.map(|el| (el, self.screen_px(p))))
            .collect()
    }

    /// Visible part of a block: the on-screen rect and the rows cut off at
    /// the top.
    fn visible(&self, p: &Placed, area: Rect) -> Option<(Rect, u16)> {
        let top = p.y as i32 - self.scroll as i32;
        let bottom = top + p.height as i32;
        if bottom <= 0 || top >= area.height as i32 {
            return None;
        }
        let skip = (-top).max(0) as u16;
        let y = top.max(0) as u16;
        let height = (bottom.min(area.height as i32) - y as i32) as u16;
        let rect = Rect::new(area.x + p.x, area.y + y, p.width, height).intersection(area);
        (!rect.is_empty()).then_some((rect, skip))
    }

    /// Opacity a block renders at: dim until it has been revealed.
    fn block_opacity(&self, p: &Placed, dom: &PageDocument) -> f32 {
        match p.el {
            Some(el) if !dom.has_class(el, &self.reveal_class) => UNREVEALED_OPACITY,
            _ => 1.0,
        }
    }

    /// Draw the page over the background.
    pub fn render(&self, frame: &mut Frame, animator: &PageAnimator<PageDocument>, now: u64) {
        let area = frame.area();
        let dom = animator.dom();

        for p in self.layout(area.width) {
            let Some((rect, skip)) = self.visible(&p, area) else {
                continue;
            };
            let opacity = self.block_opacity(&p, dom);
            match p.kind {
                BlockKind::Hero => render_hero(frame, rect, skip, dom, now),
                BlockKind::Section(i) => {
                    render_section(frame, rect, skip, self.sections[i].1, opacity)
                }
                BlockKind::Card(i) => {
                    let alive = p.el.is_some_and(|el| dom.has_class(el, &self.hover_class));
                    render_card(frame, rect, skip, CARDS[i], alive, opacity);
                }
                BlockKind::Footer => render_footer(frame, rect, dom),
            }
        }

        if dom.element_by_id(BOOT_SCREEN_ID).is_some() {
            let boot = animator.boot();
            render_boot(frame, area, dom, boot.progress(now), boot.overlay_opacity(now));
        }
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

/// Fade `color` into the page background by `opacity`.
fn faded(color: (u8, u8, u8), opacity: f32) -> Color {
    let t = opacity.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Color::Rgb(
        mix(SHADOW.0, color.0),
        mix(SHADOW.1, color.1),
        mix(SHADOW.2, color.2),
    )
}

fn render_hero(frame: &mut Frame, rect: Rect, skip: u16, dom: &PageDocument, now: u64) {
    let typed = dom
        .element_by_id(TYPED_ID)
        .and_then(|el| dom.text(el))
        .unwrap_or_default();
    let cursor = if (now / 530) % 2 == 0 { "▌" } else { " " };

    let lines = vec![
        Line::default(),
        Line::from("~/glyphfall".bold().fg(rgb(ACCENT))),
        Line::default(),
        Line::from("systems programmer · compilers · runtimes").fg(rgb(INK)),
        Line::default(),
        Line::from(vec![
            Span::styled("$ ", Style::new().fg(rgb(ACCENT))),
            Span::styled(typed.to_string(), Style::new().fg(rgb(INK))),
            Span::styled(cursor, Style::new().fg(rgb(ACCENT))),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).scroll((skip, 0)), rect);
}

fn render_section(frame: &mut Frame, rect: Rect, skip: u16, spec: &SectionSpec, opacity: f32) {
    let accent = faded(ACCENT, opacity);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("## ", Style::new().fg(accent)),
            Span::styled(
                spec.title,
                Style::new().fg(accent).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::default(),
    ];
    lines.extend(
        spec.body
            .iter()
            .map(|l| Line::from(*l).style(Style::new().fg(faded(INK, opacity)))),
    );
    frame.render_widget(Paragraph::new(lines).scroll((skip, 0)), rect);
}

fn render_card(
    frame: &mut Frame,
    rect: Rect,
    skip: u16,
    (name, blurb): (&str, &str),
    alive: bool,
    opacity: f32,
) {
    let accent = faded(ACCENT, opacity);
    let (border, title) = if alive {
        (
            Style::new().fg(accent).add_modifier(Modifier::BOLD),
            format!(" ▸ {name} "),
        )
    } else {
        (Style::new().fg(faded(MUTED, opacity)), format!(" {name} "))
    };
    let body = Paragraph::new(vec![
        Line::from(blurb).fg(faded(if alive { INK } else { MUTED }, opacity)),
        Line::from(if alive { "▮▮▮▮▮▮▮▮" } else { "▯▯▯▯▯▯▯▯" }).fg(accent),
    ]);

    // Clipped cards lose their border; show the body alone.
    if skip > 0 || rect.height < CARD_HEIGHT {
        frame.render_widget(body.scroll((skip.saturating_sub(1), 0)), rect);
        return;
    }
    let block = Block::bordered().border_style(border).title(title);
    frame.render_widget(Clear, rect);
    frame.render_widget(body.block(block), rect);
}

fn render_footer(frame: &mut Frame, rect: Rect, dom: &PageDocument) {
    let year = dom
        .element_by_id(YEAR_ID)
        .and_then(|el| dom.text(el))
        .unwrap_or_default();
    let footer = Paragraph::new(format!("© {year} glyphfall · q to quit"))
        .style(Style::new().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, rect);
}

fn render_boot(frame: &mut Frame, area: Rect, dom: &PageDocument, progress: f32, opacity: f32) {
    if opacity >= 0.5 {
        frame.render_widget(Clear, area);
    }

    let status = dom
        .elements_with_class(BOOT_STATUS_CLASS)
        .first()
        .and_then(|el| dom.text(*el))
        .unwrap_or_default();

    let bar_width = BOOT_WIDTH.saturating_sub(6) as usize;
    let filled = ((bar_width as f32) * progress.clamp(0.0, 1.0)).round() as usize;
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(bar_width - filled));

    let accent = faded(ACCENT, opacity);
    let ink = faded(INK, opacity);
    let lines = vec![
        Line::from("glyphfall bios v0.1").fg(ink),
        Line::default(),
        Line::from(bar).fg(accent),
        Line::from(format!("> {status}")).fg(accent),
    ];

    let width = BOOT_WIDTH.min(area.width);
    let height = BOOT_HEIGHT.min(area.height);
    let rect = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    let block = Block::bordered()
        .border_style(Style::new().fg(accent))
        .title(" boot ");
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center),
        rect,
    );
}
