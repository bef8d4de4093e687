//! egui HUD: text labels and the mode icon. Nothing here takes input, so
//! clicks fall through to the session.

use egui::{Align2, Color32, FontId, Id, LayerId, Order, Pos2, Rect, Rounding, Stroke};
use mapwalk::{Mode, Session};

const HUD_FONT: f32 = 18.0;
const HUD_LEFT: f32 = 25.0;

/// Yellow, as the walked-distance readout has always been.
pub const WALKED_COLOR: Color32 = Color32::from_rgb(255, 255, 0);

/// Icon fill and glyph for each mode.
pub fn icon_style(mode: Mode) -> (Color32, &'static str) {
    match mode {
        Mode::Walking => (Color32::from_rgb(60, 140, 70), "W"),
        Mode::Measuring => (Color32::from_rgb(200, 80, 50), "M"),
    }
}

/// Physical pixels to egui points.
fn to_points(px: glam::Vec2, pixels_per_point: f32) -> Pos2 {
    Pos2::new(px.x / pixels_per_point, px.y / pixels_per_point)
}

pub fn draw_hud(ctx: &egui::Context, session: &Session, fps: f32) {
    let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("hud")));
    let font = FontId::proportional(HUD_FONT);
    let ppp = ctx.pixels_per_point();

    let mut y = 10.0;
    let mut line = |text: String, color: Color32| {
        painter.text(Pos2::new(HUD_LEFT, y), Align2::LEFT_TOP, text, font.clone(), color);
        y += HUD_FONT + 2.0;
    };

    line(session.mode_label(), Color32::WHITE);
    line(session.walked_label(), WALKED_COLOR);
    if session.mode() == Mode::Measuring {
        line(session.measured_label(), Color32::LIGHT_GRAY);
    }

    // Mode icon, at the same rect the session hit-tests in pixels.
    let icon = session.icon();
    let rect = Rect::from_min_max(to_points(icon.min, ppp), to_points(icon.max(), ppp));
    let (fill, glyph) = icon_style(session.mode());
    painter.rect(rect, Rounding::same(8.0), fill, Stroke::new(2.0, Color32::WHITE));
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        glyph,
        FontId::proportional(rect.height() * 0.6),
        Color32::WHITE,
    );

    // Segment lengths next to each pin.
    if session.mode() == Mode::Measuring {
        let points = session.markers().points();
        for (pair, len) in points.windows(2).zip(session.markers().segment_lengths()) {
            let mid = (pair[0] + pair[1]) * 0.5;
            if let Some(px) = session.world_to_pixel(mid) {
                painter.text(
                    to_points(px, ppp),
                    Align2::CENTER_BOTTOM,
                    format!("{len:.2}"),
                    FontId::proportional(14.0),
                    Color32::WHITE,
                );
            }
        }
    }

    let screen = ctx.screen_rect();
    painter.text(
        Pos2::new(screen.right() - 10.0, 10.0),
        Align2::RIGHT_TOP,
        format!("{fps:.0} fps"),
        FontId::monospace(14.0),
        Color32::GRAY,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_differs_per_mode() {
        assert_ne!(icon_style(Mode::Walking), icon_style(Mode::Measuring));
    }

    #[test]
    fn pixel_to_point_divides_by_scale() {
        let p = to_points(glam::Vec2::new(50.0, 140.0), 2.0);
        assert_eq!(p, Pos2::new(25.0, 70.0));
    }

    #[test]
    fn hud_runs_headless() {
        let session = Session::new(mapwalk::SessionConfig::default()).unwrap();
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| draw_hud(ctx, &session, 75.0));
    }
}
