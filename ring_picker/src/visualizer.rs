//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    ▯ ▯ ▯ ▯ back of the ring ▯ ▯ ▯            │
//! │          ▯ ▯                                      ▯ ▯        │
//! │        ▯            ┌────────────┐                   ▯       │
//! │        ▯            │  floating  │         ○ cursor  ▯       │
//! │          ▯ ▯        │    card    │              ▯ ▯          │
//! │                ▯ ▯ ▯└────────────┘▯ ▯ ▯ ▯                    │
//! │                    front of the ring                         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Status text goes to the window title.

use std::sync::mpsc::Sender;
use std::time::Duration;

use hand_intent::classifier::poses::Pose;
use hand_intent::{GestureLevels, PointerState};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::hexagram::Hexagram;
use crate::perception::SimInput;
use crate::ring::{Card, RingView};

// ════════════════════════════════════════════════════════════════════════════
// Palette
// ════════════════════════════════════════════════════════════════════════════

const BG_COLOR:     u32 = 0xFF0B0B14;
const PAPER_COLOR:  u32 = 0xFFF4F1EA;
const INK_COLOR:    u32 = 0xFF1A1A1A;
const GOLD_COLOR:   u32 = 0xFFD4AF37;
const CURSOR_MOUSE: u32 = 0xFFCCCCCC;

/// Floating card half-size in NDC.
const FLOAT_HALF_W: f32 = 0.14;
const FLOAT_HALF_H: f32 = 0.32;
const PARTICLES:    usize = 100;

// ════════════════════════════════════════════════════════════════════════════
// WindowInput — what the app needs from one poll
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WindowInput {
    /// Mouse position in window pixels, when it is over the window.
    pub mouse:   Option<(f32, f32)>,
    /// Left button went down this frame.
    pub pressed: bool,
    /// New window size, when it changed.
    pub resized: Option<(usize, usize)>,
    pub quit:    bool,
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:     Window,
    buf:        Vec<u32>,
    width:      usize,
    height:     usize,
    /// `None` when a hardware source owns perception.
    sim_tx:     Option<Sender<SimInput>>,
    sim_hand:   bool,
    mouse_down: bool,
    title:      String,
}

impl Visualizer {
    pub fn new(width: usize, height: usize, sim_tx: Option<Sender<SimInput>>) -> Result<Self, String> {
        let mut window = Window::new(
            "Ring Picker",
            width, height,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        ).map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; width * height],
            width,
            height,
            sim_tx,
            sim_hand:   false,
            mouse_down: false,
            title:      String::new(),
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll mouse and keyboard.  Simulated-hand keys are forwarded to the
    /// perception thread; everything else is returned.
    pub fn poll_input(&mut self) -> WindowInput {
        let mut input = WindowInput::default();

        let (w, h) = self.window.get_size();
        if (w, h) != (self.width, self.height) && w > 0 && h > 0 {
            self.width = w;
            self.height = h;
            self.buf = vec![BG_COLOR; w * h];
            input.resized = Some((w, h));
        }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        input.quit = !self.window.is_open() || one_shot(Key::Q) || one_shot(Key::Escape);
        let toggle_hand = one_shot(Key::H);
        let camera_fail = one_shot(Key::C);

        input.mouse = self.window.get_mouse_pos(MouseMode::Discard);
        let down = self.window.get_mouse_down(MouseButton::Left);
        input.pressed = down && !self.mouse_down;
        self.mouse_down = down;

        if input.quit {
            self.send(SimInput::Quit);
            return input;
        }
        if camera_fail {
            self.send(SimInput::CameraFailed);
        }
        if toggle_hand {
            self.sim_hand = !self.sim_hand;
            if !self.sim_hand {
                self.send(SimInput::HandLost);
            }
        }
        if self.sim_hand {
            if let Some((x, y)) = input.mouse {
                let pose = if self.window.is_key_down(Key::P) {
                    Pose::Pinch
                } else if self.window.is_key_down(Key::O) {
                    Pose::OpenPalm
                } else {
                    Pose::Relaxed
                };
                let (u, v) = (x / self.width as f32, y / self.height as f32);
                self.send(SimInput::HandAt { u, v, pose });
            } else {
                self.send(SimInput::HandLost);
            }
        }

        input
    }

    fn send(&self, input: SimInput) {
        if let Some(tx) = &self.sim_tx {
            let _ = tx.send(input);
        }
    }

    /// Render one frame.
    pub fn render(
        &mut self,
        view:    &RingView,
        pointer: &PointerState,
        levels:  GestureLevels,
        status:  &str,
    ) {
        self.buf.fill(BG_COLOR);

        let presenter = &view.presenter;
        let dissolving = presenter.dissolve().map(|d| d.item);

        // ── Ring, back to front ───────────────────────────────────────────
        for card in view.layout.cards() {
            if Some(card.id) == dissolving || Some(card.id) == presenter.floating() {
                continue;
            }
            let hex = view.hexagram(card.id);
            let lit = presenter.highlighted() == Some(card.id);
            self.draw_ring_card(card, hex, lit);
        }

        // ── Dissolve particles ────────────────────────────────────────────
        if let Some(anim) = presenter.dissolve() {
            if let Some(card) = view.layout.card(anim.item) {
                self.draw_particles(card, anim.progress());
            }
        }

        // ── Floating card ─────────────────────────────────────────────────
        if let Some(id) = presenter.floating() {
            let color = view.layout.card(id).map(|c| c.color).unwrap_or(GOLD_COLOR);
            self.draw_card(&CardFace::floating(color), view.hexagram(id));
        }

        // ── Cursor ────────────────────────────────────────────────────────
        self.draw_cursor(pointer, levels);

        // ── Title bar status ──────────────────────────────────────────────
        if self.title != status {
            self.title = status.to_string();
            self.window.set_title(&format!("Ring Picker | {}", status));
        }

        self.window.update_with_buffer(&self.buf, self.width, self.height).ok();
    }

    // ── Cards ─────────────────────────────────────────────────────────────

    fn draw_ring_card(&mut self, card: &Card, hex: Option<&Hexagram>, lit: bool) {
        self.draw_card(&CardFace::on_ring(card, lit), hex);
    }

    fn draw_card(&mut self, face: &CardFace, hex: Option<&Hexagram>) {
        let (x0, y0, w, h) = face.rect(self.width, self.height);
        let (tint, lit) = (face.tint, face.lit);

        self.fill_rect(x0, y0, w, h, blend(PAPER_COLOR, tint, 0.6));
        self.draw_border(x0, y0, w, h, if lit { GOLD_COLOR } else { tint });

        if let Some(hex) = hex {
            // Six lines bottom to top across the middle of the card.
            let line_w = w * 0.6;
            let line_h = (h * 0.05).max(1.0);
            let gap    = h * 0.1;
            let lx     = x0 + (w - line_w) / 2.0;
            let base   = y0 + h * 0.78;
            for (j, &yang) in hex.lines.iter().enumerate() {
                let y = base - j as f32 * gap;
                if yang {
                    self.fill_rect(lx, y, line_w, line_h, INK_COLOR);
                } else {
                    self.fill_rect(lx, y, line_w * 0.4, line_h, INK_COLOR);
                    self.fill_rect(lx + line_w * 0.6, y, line_w * 0.4, line_h, INK_COLOR);
                }
            }
        }
    }

    // ── Dissolve ──────────────────────────────────────────────────────────

    fn draw_particles(&mut self, card: &Card, progress: f32) {
        let (cx, cy) = ndc_to_px(card.cx, card.cy, self.width, self.height);
        let reach = self.width.min(self.height) as f32 * 0.35;
        let color = blend(GOLD_COLOR, BG_COLOR, progress);
        for (dx, dy) in particle_offsets(PARTICLES) {
            let x = cx + dx * reach * progress;
            let y = cy + dy * reach * progress;
            self.fill_rect(x - 1.0, y - 1.0, 3.0, 3.0, color);
        }
    }

    // ── Cursor ────────────────────────────────────────────────────────────

    fn draw_cursor(&mut self, pointer: &PointerState, levels: GestureLevels) {
        let color = if pointer.hand_detected { GOLD_COLOR } else { CURSOR_MOUSE };
        if levels.pinching {
            self.fill_disc(pointer.x, pointer.y, 7.0, color);
        } else {
            self.draw_circle(pointer.x, pointer.y, 10.0, color);
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn set_pixel(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.buf[y as usize * self.width + x as usize] = color;
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: u32) {
        let c0 = x.max(0.0) as usize;
        let r0 = y.max(0.0) as usize;
        let c1 = ((x + w).max(0.0) as usize).min(self.width);
        let r1 = ((y + h).max(0.0) as usize).min(self.height);
        for row in r0..r1 {
            for col in c0..c1 {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: f32, y: f32, w: f32, h: f32, color: u32) {
        let (x0, y0) = (x as isize, y as isize);
        let (x1, y1) = ((x + w) as isize - 1, (y + h) as isize - 1);
        for col in x0..=x1 {
            self.set_pixel(col, y0, color);
            self.set_pixel(col, y1, color);
        }
        for row in y0..=y1 {
            self.set_pixel(x0, row, color);
            self.set_pixel(x1, row, color);
        }
    }

    fn draw_circle(&mut self, cx: f32, cy: f32, r: f32, color: u32) {
        let steps = (r * 8.0) as usize;
        for i in 0..steps {
            let a = i as f32 / steps as f32 * std::f32::consts::TAU;
            self.set_pixel((cx + r * a.cos()) as isize, (cy + r * a.sin()) as isize, color);
        }
    }

    fn fill_disc(&mut self, cx: f32, cy: f32, r: f32, color: u32) {
        let ri = r as isize;
        for dy in -ri..=ri {
            for dx in -ri..=ri {
                if dx * dx + dy * dy <= ri * ri {
                    self.set_pixel(cx as isize + dx, cy as isize + dy, color);
                }
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pure helpers
// ────────────────────────────────────────────────────────────────────────────

/// NDC → window pixels; the inverse of `Viewport::ndc`.
pub fn ndc_to_px(ndc_x: f32, ndc_y: f32, width: usize, height: usize) -> (f32, f32) {
    ((ndc_x + 1.0) / 2.0 * width as f32, (1.0 - ndc_y) / 2.0 * height as f32)
}

/// Unit-ish burst directions, spread on a golden-angle spiral.
pub fn particle_offsets(count: usize) -> impl Iterator<Item = (f32, f32)> {
    const GOLDEN: f32 = 2.399_963;
    (0..count).map(|i| {
        let a = i as f32 * GOLDEN;
        let speed = 0.4 + (i * 37 % 60) as f32 / 100.0;
        (a.cos() * speed, a.sin() * speed)
    })
}

/// Where and how one card face is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardFace {
    pub cx:     f32,
    pub cy:     f32,
    pub half_w: f32,
    pub half_h: f32,
    pub tint:   u32,
    pub lit:    bool,
}

impl CardFace {
    /// A card in its ring slot.  Cards toward the back fade into the
    /// background; the highlighted one grows and brightens.
    pub fn on_ring(card: &Card, lit: bool) -> Self {
        let near = (card.depth + 1.0) / 2.0;
        let tint = blend(BG_COLOR, card.color, 0.25 + 0.75 * near);
        let (grow, tint) = if lit { (1.15, blend(tint, 0xFFFFFFFF, 0.35)) } else { (1.0, tint) };
        CardFace {
            cx:     card.cx,
            cy:     card.cy,
            half_w: card.half_w * grow,
            half_h: card.half_h * grow,
            tint,
            lit,
        }
    }

    /// The selected card, enlarged at the centre of the window.
    pub fn floating(tint: u32) -> Self {
        CardFace { cx: 0.0, cy: 0.0, half_w: FLOAT_HALF_W, half_h: FLOAT_HALF_H, tint, lit: true }
    }

    /// Pixel rectangle `(x, y, w, h)` in a `width` × `height` window.
    pub fn rect(&self, width: usize, height: usize) -> (f32, f32, f32, f32) {
        let (x0, y0) = ndc_to_px(self.cx - self.half_w, self.cy + self.half_h, width, height);
        let (x1, y1) = ndc_to_px(self.cx + self.half_w, self.cy - self.half_h, width, height);
        (x0, y0, x1 - x0, y1 - y0)
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
pub fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0-t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar,br) << 16) | (lerp(ag,bg) << 8) | lerp(ab,bb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hand_intent::Viewport;

    #[test]
    fn ndc_to_px_inverts_viewport_ndc() {
        let vp = Viewport::new(1200.0, 720.0);
        for (x, y) in [(0.0, 0.0), (600.0, 360.0), (1200.0, 720.0), (300.0, 500.0)] {
            let (nx, ny) = vp.ndc(x, y);
            let (px, py) = ndc_to_px(nx, ny, 1200, 720);
            assert!((px - x).abs() < 1e-3 && (py - y).abs() < 1e-3, "{} {}", px, py);
        }
    }

    #[test]
    fn highlighted_card_grows_and_brightens() {
        let card = Card {
            id: hand_intent::ItemId(1), cx: 0.0, cy: -0.2, half_w: 0.05, half_h: 0.1,
            depth: 1.0, color: 0xFF204080,
        };
        let plain = CardFace::on_ring(&card, false);
        let lit = CardFace::on_ring(&card, true);
        assert_eq!((plain.half_w, plain.half_h), (0.05, 0.1));
        assert!(lit.half_w > plain.half_w && lit.half_h > plain.half_h);
        assert!(lit.lit && !plain.lit);
        assert_ne!(lit.tint, plain.tint);
    }

    #[test]
    fn floating_card_is_centred() {
        let (x, y, w, h) = CardFace::floating(GOLD_COLOR).rect(1000, 500);
        assert!((x + w / 2.0 - 500.0).abs() < 1e-3);
        assert!((y + h / 2.0 - 250.0).abs() < 1e-3);
        assert!(w > 0.0 && h > 0.0);
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 0.0), 0xFF000000);
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 1.0), 0xFFFFFFFF);
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 7.0), 0xFFFFFFFF);
    }

    #[test]
    fn particles_stay_in_a_bounded_burst() {
        let offsets: Vec<_> = particle_offsets(PARTICLES).collect();
        assert_eq!(offsets.len(), PARTICLES);
        for (dx, dy) in offsets {
            assert!((dx * dx + dy * dy).sqrt() <= 1.0 + 1e-6);
        }
    }
}
