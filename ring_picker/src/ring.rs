//! Ring view state.
//!
//! The cards sit on an ellipse in NDC space, the front of the ring at the
//! bottom of the screen.  [`RingLayout`] answers pick queries and
//! [`RingPresenter`] applies the machine's commands; they live side by side
//! in [`RingView`] so a tick can borrow both at once.

use std::collections::BTreeMap;

use hand_intent::{Command, IntentError, ItemId, ItemRing, PickProvider, PresentationSink};
use tracing::debug;

use crate::hexagram::Hexagram;

// ════════════════════════════════════════════════════════════════════════════
// Color palette — item → ARGB
// ════════════════════════════════════════════════════════════════════════════

/// Map an item index to an ARGB color on an evenly spaced hue wheel.
pub fn item_color(index: usize, count: usize) -> u32 {
    let hue = (index as f32 / count.max(1) as f32) * 360.0;
    hsv_to_argb(hue, 0.55, 0.95)
}

/// Convert HSV → packed ARGB (0xAARRGGBB, A=0xFF).
pub fn hsv_to_argb(h: f32, s: f32, v: f32) -> u32 {
    let h  = h.rem_euclid(360.0);
    let hi = (h / 60.0) as u32;
    let f  = h / 60.0 - hi as f32;
    let p  = v * (1.0 - s);
    let q  = v * (1.0 - s * f);
    let t  = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match hi {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    let ri = (r * 255.0) as u32;
    let gi = (g * 255.0) as u32;
    let bi = (b * 255.0) as u32;
    0xFF000000 | (ri << 16) | (gi << 8) | bi
}

// ════════════════════════════════════════════════════════════════════════════
// Card — one item placed on the ring
// ════════════════════════════════════════════════════════════════════════════

const RING_RX:     f32 = 0.78;
const RING_RY:     f32 = 0.32;
const RING_CY:     f32 = 0.08;
const CARD_HALF_W: f32 = 0.045;
const CARD_HALF_H: f32 = 0.10;

#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub id:     ItemId,
    /// Centre in NDC.
    pub cx:     f32,
    pub cy:     f32,
    pub half_w: f32,
    pub half_h: f32,
    /// 1.0 at the front of the ring, -1.0 at the back.
    pub depth:  f32,
    pub color:  u32,
}

impl Card {
    fn place(id: ItemId, angle: f32, color: u32) -> Self {
        let depth = angle.cos();
        let scale = 0.55 + 0.45 * (depth + 1.0) / 2.0;
        Card {
            id,
            cx:     angle.sin() * RING_RX,
            cy:     RING_CY - depth * RING_RY,
            half_w: CARD_HALF_W * scale,
            half_h: CARD_HALF_H * scale,
            depth,
            color,
        }
    }

    pub fn contains(&self, ndc_x: f32, ndc_y: f32) -> bool {
        (ndc_x - self.cx).abs() <= self.half_w && (ndc_y - self.cy).abs() <= self.half_h
    }
}

// ════════════════════════════════════════════════════════════════════════════
// RingLayout — the pick provider
// ════════════════════════════════════════════════════════════════════════════

/// Cards ordered back to front.
#[derive(Debug)]
pub struct RingLayout {
    cards: Vec<Card>,
}

impl RingLayout {
    pub fn new<P>(ring: &ItemRing<P>) -> Self {
        let n = ring.len();
        let mut cards: Vec<Card> = ring
            .iter()
            .enumerate()
            .map(|(i, item)| Card::place(item.id, item.angle, item_color(i, n)))
            .collect();
        cards.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        RingLayout { cards }
    }

    /// Back to front, ready for painting.
    pub fn cards(&self) -> &[Card] { &self.cards }

    pub fn card(&self, id: ItemId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// The front-most card under the point.
    pub fn hit(&self, ndc_x: f32, ndc_y: f32) -> Option<ItemId> {
        self.cards.iter().rev().find(|c| c.contains(ndc_x, ndc_y)).map(|c| c.id)
    }
}

impl PickProvider for RingLayout {
    fn pick(&mut self, ndc_x: f32, ndc_y: f32) -> hand_intent::Result<Option<ItemId>> {
        if !(ndc_x.is_finite() && ndc_y.is_finite()) {
            return Err(IntentError::Pick(format!("pointer at ({}, {})", ndc_x, ndc_y)));
        }
        Ok(self.hit(ndc_x, ndc_y))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// DissolveAnimation
// ════════════════════════════════════════════════════════════════════════════

/// Seconds from `Dissolve` until the card is back on the ring.
pub const DISSOLVE_SECS: f32 = 1.5;

#[derive(Clone, Debug, PartialEq)]
pub struct DissolveAnimation {
    pub item:    ItemId,
    pub elapsed: f32,
}

impl DissolveAnimation {
    pub fn new(item: ItemId) -> Self {
        DissolveAnimation { item, elapsed: 0.0 }
    }
    pub fn tick(&mut self, dt: f32) { self.elapsed += dt.max(0.0); }
    pub fn progress(&self) -> f32 { (self.elapsed / DISSOLVE_SECS).min(1.0) }
    pub fn done(&self) -> bool { self.elapsed >= DISSOLVE_SECS }
}

// ════════════════════════════════════════════════════════════════════════════
// RingPresenter — the presentation sink
// ════════════════════════════════════════════════════════════════════════════

pub const VOID_STATUS: &str = "Void Manifested";

#[derive(Debug)]
pub struct RingPresenter {
    names:       BTreeMap<ItemId, String>,
    highlighted: Option<ItemId>,
    floating:    Option<ItemId>,
    dissolve:    Option<DissolveAnimation>,
    status:      String,
}

impl RingPresenter {
    pub fn new(ring: &ItemRing<Hexagram>) -> Self {
        RingPresenter {
            names:       ring.iter().map(|it| (it.id, it.payload.name.clone())).collect(),
            highlighted: None,
            floating:    None,
            dissolve:    None,
            status:      String::from("Point at a card"),
        }
    }

    /// Advance the dissolve; returns the item once it has finished.
    pub fn tick(&mut self, dt: f32) -> Option<ItemId> {
        let anim = self.dissolve.as_mut()?;
        anim.tick(dt);
        if anim.done() {
            let item = anim.item;
            self.dissolve = None;
            debug!(%item, "dissolve finished");
            Some(item)
        } else {
            None
        }
    }

    pub fn highlighted(&self) -> Option<ItemId>            { self.highlighted }
    pub fn floating(&self)    -> Option<ItemId>            { self.floating }
    pub fn dissolve(&self)    -> Option<&DissolveAnimation> { self.dissolve.as_ref() }
    pub fn status(&self)      -> &str                      { &self.status }

    fn name_of(&self, command: &Command, id: ItemId) -> hand_intent::Result<&str> {
        self.names.get(&id).map(String::as_str).ok_or_else(|| IntentError::Presentation {
            command: command.to_string(),
            reason:  "no such card".into(),
        })
    }
}

impl PresentationSink for RingPresenter {
    fn present(&mut self, command: &Command) -> hand_intent::Result<()> {
        match *command {
            Command::Highlight(id) => {
                self.name_of(command, id)?;
                self.highlighted = Some(id);
                self.floating = None;
            }
            Command::Float(id) => {
                self.status = self.name_of(command, id)?.to_string();
                self.highlighted = Some(id);
                self.floating = Some(id);
            }
            Command::Dissolve(id) => {
                self.name_of(command, id)?;
                self.highlighted = None;
                self.floating = None;
                self.dissolve = Some(DissolveAnimation::new(id));
                self.status = VOID_STATUS.to_string();
            }
            Command::Clear => {
                self.highlighted = None;
                self.floating = None;
                self.dissolve = None;
            }
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// RingView
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct RingView {
    pub ring:      ItemRing<Hexagram>,
    pub layout:    RingLayout,
    pub presenter: RingPresenter,
}

impl RingView {
    pub fn new(hexagrams: Vec<Hexagram>) -> Self {
        let ring = ItemRing::evenly_spaced(hexagrams);
        let layout = RingLayout::new(&ring);
        let presenter = RingPresenter::new(&ring);
        RingView { ring, layout, presenter }
    }

    pub fn hexagram(&self, id: ItemId) -> Option<&Hexagram> {
        self.ring.get(id).map(|it| &it.payload)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hexagram::hexagrams;

    fn view() -> RingView { RingView::new(hexagrams(64)) }

    #[test]
    fn item_color_opaque_and_distinct() {
        for i in 0..64 {
            assert_eq!(item_color(i, 64) >> 24, 0xFF);
        }
        assert_ne!(item_color(0, 64), item_color(32, 64));
    }

    #[test]
    fn first_card_is_front_and_centre() {
        let v = view();
        let front = v.layout.cards().last().unwrap();
        assert_eq!(front.id, ItemId(1));
        assert_eq!(front.depth, 1.0);
        assert!(front.cx.abs() < 1e-6);
    }

    #[test]
    fn pick_hits_front_card_centre() {
        let mut v = view();
        let c = v.layout.card(ItemId(1)).unwrap().clone();
        assert_eq!(v.layout.pick(c.cx, c.cy).unwrap(), Some(ItemId(1)));
    }

    #[test]
    fn pick_prefers_the_nearer_card() {
        let mut v = view();
        // Every visible point belongs to the deepest card containing it.
        for card in v.layout.cards().to_vec() {
            if let Some(id) = v.layout.pick(card.cx, card.cy).unwrap() {
                let hit = v.layout.card(id).unwrap();
                assert!(hit.depth >= card.depth);
            }
        }
    }

    #[test]
    fn pick_empty_space_is_none() {
        let mut v = view();
        assert_eq!(v.layout.pick(0.0, 0.95).unwrap(), None);
        assert!(v.layout.pick(f32::NAN, 0.0).is_err());
    }

    #[test]
    fn float_then_dissolve_updates_status() {
        let mut v = view();
        v.presenter.present(&Command::Highlight(ItemId(2))).unwrap();
        v.presenter.present(&Command::Float(ItemId(2))).unwrap();
        assert_eq!(v.presenter.status(), "The Receptive");
        assert_eq!(v.presenter.floating(), Some(ItemId(2)));

        v.presenter.present(&Command::Dissolve(ItemId(2))).unwrap();
        assert_eq!(v.presenter.status(), VOID_STATUS);
        assert_eq!(v.presenter.floating(), None);
        assert!(v.presenter.dissolve().is_some());
    }

    #[test]
    fn dissolve_finishes_after_a_second_and_a_half() {
        let mut v = view();
        v.presenter.present(&Command::Dissolve(ItemId(3))).unwrap();
        let mut finished = None;
        let mut frames = 0;
        while finished.is_none() && frames < 1000 {
            finished = v.presenter.tick(1.0 / 60.0);
            frames += 1;
        }
        assert_eq!(finished, Some(ItemId(3)));
        assert!((89..=91).contains(&frames), "{} frames", frames);
        assert_eq!(v.presenter.tick(1.0), None);
    }

    #[test]
    fn unknown_card_is_rejected() {
        let mut v = view();
        let err = v.presenter.present(&Command::Float(ItemId(99))).unwrap_err();
        assert!(matches!(err, IntentError::Presentation { .. }));
        assert_eq!(v.presenter.floating(), None);
    }

    #[test]
    fn clear_drops_everything() {
        let mut v = view();
        v.presenter.present(&Command::Float(ItemId(1))).unwrap();
        v.presenter.present(&Command::Clear).unwrap();
        assert_eq!(v.presenter.highlighted(), None);
        assert_eq!(v.presenter.floating(), None);
        assert_eq!(v.presenter.status(), "The Creative");
    }
}
