use std::{collections::HashMap, f32::consts::PI, sync::Mutex};

use liquid_sort::{FluidColor, FluidContainer, PuzzleEvent, PuzzleState, Transition};
use macroquad::prelude::*;
use macroquad::rand::gen_range;

const FLUID_PALETTE: [(u8, u8, u8); 12] = [
    (0xe7, 0x4c, 0x3c), //RED
    (0x34, 0x98, 0xdb), //BLUE
    (0x27, 0xae, 0x60), //GREEN
    (0xf3, 0x9c, 0x12), //ORANGE
    (0x9b, 0x59, 0xb6), //PURPLE
    (0xf1, 0xc4, 0x0f), //YELLOW
    (0x1a, 0xbc, 0x9c), //TURQUOISE
    (0xe8, 0x43, 0x93), //PINK
    (0x79, 0x55, 0x48), //BROWN
    (0x00, 0xce, 0xc9), //CYAN
    (0x2c, 0x3e, 0x50), //NAVY
    (0xbd, 0xc3, 0xc7), //SILVER
];

const CONFETTI_COUNT: usize = 30;
const CONFETTI_LIFETIME: f64 = 1.5;

pub fn fluid_color(packet: FluidColor) -> Color {
    let (r, g, b) = FLUID_PALETTE[packet.get_color_id() % FLUID_PALETTE.len()];
    Color::from_rgba(r, g, b, 255)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ControlAction {
    NewPuzzle,
    CopyLayout,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HitItem {
    Button { action: ControlAction },
    Container { index: usize },
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HitRecord {
    pub rect: Rect,
    pub item: HitItem,
}

#[derive(Default)]
pub struct HitTestRegistry {
    items: Vec<HitRecord>,
}

impl HitTestRegistry {
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn push(&mut self, rect: Rect, item: HitItem) {
        self.items.push(HitRecord { rect, item });
    }

    /// Returns the topmost item under the point (last drawn wins).
    pub fn hit_test(&self, x: f32, y: f32) -> Option<&HitRecord> {
        self.items
            .iter()
            .rev()
            .find(|r| r.rect.contains(vec2(x, y)))
    }

    pub fn container_rect(&self, index: usize) -> Option<Rect> {
        self.items.iter().find_map(|r| match r.item {
            HitItem::Container { index: i } if i == index => Some(r.rect),
            _ => None,
        })
    }
}

/// Fits text into a rectangle, caching the unscaled measurement per string.
#[derive(Default)]
pub struct CachedTextSizer {
    unscaled_size_cache: Mutex<HashMap<String, (f32, f32)>>,
}

impl CachedTextSizer {
    /// Returns font size and the baseline origin inside the rect.
    pub fn fit(&self, text: &str, rect: Rect) -> (f32, f32, f32) {
        let reference_size = 100u16;
        let (size_x, size_y) = if let Ok(cache) = self.unscaled_size_cache.lock()
            && let Some(dimensions) = cache.get(text)
        {
            *dimensions
        } else {
            let dimensions = measure_text(text, None, reference_size, 1.0);
            let size = (dimensions.width.max(1.0), dimensions.height.max(1.0));
            if let Ok(mut cache) = self.unscaled_size_cache.lock() {
                cache.insert(text.to_string(), size);
            }
            size
        };
        let scale = (rect.w / size_x).min(rect.h / size_y);
        let final_width = size_x * scale;
        let final_height = size_y * scale;
        let x = rect.x + (rect.w - final_width) / 2.0;
        let y = rect.y + (rect.h + final_height) / 2.0;
        (reference_size as f32 * scale, x, y)
    }
}

/// What the host is currently animating, with progress in `0.0..=1.0`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AnimationFrame {
    pub transition: Transition,
    pub progress: f32,
}

struct Confetti {
    position: Vec2,
    velocity: Vec2,
    color: Color,
    born_at: f64,
}

/// Draws engine state and keeps the purely visual leftovers of engine events
/// (confetti, victory banner).
#[derive(Default)]
pub struct Renderer {
    text_sizer: CachedTextSizer,
    hit_test: HitTestRegistry,
    confetti: Vec<Confetti>,
    show_victory: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_hit_test_registry(&self) -> &HitTestRegistry {
        &self.hit_test
    }

    pub fn on_event(&mut self, event: &PuzzleEvent, now: f64) {
        match event {
            PuzzleEvent::ContainerCompleted(index) => {
                if let Some(rect) = self.hit_test.container_rect(*index) {
                    self.spawn_confetti(rect, now);
                }
            }
            PuzzleEvent::PuzzleWon => self.show_victory = true,
            PuzzleEvent::PuzzleStarted => {
                self.show_victory = false;
                self.confetti.clear();
            }
            _ => {}
        }
    }

    fn spawn_confetti(&mut self, rect: Rect, now: f64) {
        for _ in 0..CONFETTI_COUNT {
            let (r, g, b) = FLUID_PALETTE[gen_range(0, FLUID_PALETTE.len())];
            self.confetti.push(Confetti {
                position: vec2(gen_range(rect.x, rect.x + rect.w), rect.y),
                velocity: vec2(gen_range(-60.0, 60.0), gen_range(-160.0, -40.0)),
                color: Color::from_rgba(r, g, b, 255),
                born_at: now,
            });
        }
    }

    pub fn render_game(&mut self, state: &PuzzleState, animation: Option<AnimationFrame>, now: f64) {
        // New frame: reset hit-test registry.
        self.hit_test.clear();
        clear_background(Color::from_rgba(0x1e, 0x1e, 0x2e, 255));

        let (width, height) = (screen_width(), screen_height());
        let padding = 10.0;
        let button_area_height = height * 0.1;
        let banner_height = height * 0.1;
        let container_area = Rect::new(
            padding,
            button_area_height + 2.0 * padding,
            width - 2.0 * padding,
            height - button_area_height - banner_height - 4.0 * padding,
        );

        self.render_button_lineup(Rect::new(padding, padding, width - 2.0 * padding, button_area_height));
        self.render_container_grid(state, animation, 4, container_area);
        self.render_confetti(now);
        if self.show_victory {
            let banner = Rect::new(
                width * 0.2,
                height - banner_height - padding,
                width * 0.6,
                banner_height,
            );
            draw_rectangle(banner.x, banner.y, banner.w, banner.h, Color::new(0.0, 0.0, 0.0, 0.7));
            self.render_text("Congratulations! You won!", banner, GOLD);
        }
    }

    fn render_text(&self, text: &str, rect: Rect, color: Color) {
        let (font_size, x, y) = self.text_sizer.fit(text, rect);
        draw_text(text, x, y, font_size, color);
    }

    fn render_button_lineup(&mut self, rect: Rect) {
        let buttons = [
            ("New puzzle", ControlAction::NewPuzzle, fluid_color(FluidColor::new(2))),
            ("Copy layout", ControlAction::CopyLayout, fluid_color(FluidColor::new(1))),
        ];
        let spacing = 10.0;
        let button_width = (rect.w - spacing * (buttons.len() as f32 - 1.0)) / buttons.len() as f32;
        for (i, (label, action, color)) in buttons.into_iter().enumerate() {
            let button = Rect::new(rect.x + i as f32 * (button_width + spacing), rect.y, button_width, rect.h);
            self.hit_test.push(button, HitItem::Button { action });
            draw_rectangle(button.x, button.y, button.w, button.h, color);
            draw_rectangle_lines(button.x, button.y, button.w, button.h, 2.0, BLACK);
            self.render_text(label, button, WHITE);
        }
    }

    fn render_container_grid(
        &mut self,
        state: &PuzzleState,
        animation: Option<AnimationFrame>,
        max_columns: usize,
        rect: Rect,
    ) {
        let containers = state.containers();
        let rows = containers.len().div_ceil(max_columns).max(1);
        let spacing = 20.0;
        let container_height = (rect.h - spacing * (rows as f32 - 1.0)) / rows as f32;
        let container_width = ((rect.w - spacing * (max_columns as f32 - 1.0)) / max_columns as f32)
            .min(container_height * 0.4);
        let slot = |index: usize| {
            let (row, column) = (index / max_columns, index % max_columns);
            let in_row = (containers.len() - row * max_columns).min(max_columns) as f32;
            let row_width = in_row * container_width + (in_row - 1.0) * spacing;
            Rect::new(
                rect.x + (rect.w - row_width) / 2.0 + column as f32 * (container_width + spacing),
                rect.y + row as f32 * (container_height + spacing),
                container_width,
                container_height,
            )
        };

        for (index, container) in containers.iter().enumerate() {
            let home = slot(index);
            self.hit_test.push(home, HitItem::Container { index });

            let drawn = match animation.map(|a| (a.transition, a.progress)) {
                Some((Transition::Pour { from, to }, progress)) if from == index => {
                    // lift and lean toward the receiving container
                    let target = slot(to);
                    let direction = if target.x > home.x { 1.0 } else { -1.0 };
                    let lift = (progress * PI).sin();
                    home.offset(vec2(direction * lift * spacing * 1.5, -lift * home.h * 0.2))
                }
                Some((Transition::Rejection { index: shaking }, progress)) if shaking == index => {
                    home.offset(vec2((progress * PI * 6.0).sin() * 8.0, 0.0))
                }
                _ => home,
            };
            let receiving = matches!(
                animation.map(|a| a.transition),
                Some(Transition::Pour { to, .. }) if to == index
            );
            self.render_container(container, state.selected() == Some(index), receiving, drawn);
        }
    }

    fn render_container(&self, container: &FluidContainer, selected: bool, receiving: bool, rect: Rect) {
        let packet_height = rect.h / container.get_capacity().max(1) as f32;
        for (i, packet) in container.get_packets().iter().enumerate() {
            let packet_y = rect.y + rect.h - (i as f32 + 1.0) * packet_height;
            draw_rectangle(rect.x, packet_y, rect.w, packet_height, fluid_color(*packet));
        }
        let outline = if container.is_complete() {
            GOLD
        } else if selected {
            WHITE
        } else if receiving {
            SKYBLUE
        } else {
            GRAY
        };
        let thickness = if selected || container.is_complete() { 4.0 } else { 2.0 };
        draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, thickness, outline);
    }

    fn render_confetti(&mut self, now: f64) {
        self.confetti.retain(|c| now - c.born_at < CONFETTI_LIFETIME);
        for piece in &self.confetti {
            let age = (now - piece.born_at) as f32;
            let gravity = vec2(0.0, 300.0);
            let position = piece.position + piece.velocity * age + gravity * age * age * 0.5;
            draw_rectangle(position.x, position.y, 6.0, 6.0, piece.color);
        }
    }
}
