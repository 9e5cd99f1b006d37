//! Per-frame overlay composition

use dms::{Color, DmsAnalysis, DrowsinessStatus};

use crate::render::Renderer;

pub const WELCOME_TEXT: &str = "Welcome! Face detected!";
pub const ALERT_BANNER: &str = "****************ALERT!****************";

/// Issue the draw commands for one analyzed frame
pub fn compose_overlay(renderer: &mut dyn Renderer, analysis: &DmsAnalysis, timestamp: &str) {
    if analysis.welcome {
        renderer.draw_text(WELCOME_TEXT, (150, 50), Color::GREEN);
    }

    for face in &analysis.faces {
        renderer.draw_contour(face.left_eye.points(), Color::GREEN);
        renderer.draw_contour(face.right_eye.points(), Color::GREEN);

        let Some(annotation) = &face.annotation else {
            continue;
        };

        if annotation.status == DrowsinessStatus::Alert {
            renderer.draw_text(ALERT_BANNER, (50, 50), Color::RED);
        }
        renderer.draw_text(&annotation.ear_text(), (10, 30), Color::WHITE);
        renderer.draw_text(&annotation.blink_text(), (10, 60), Color::YELLOW);
        renderer.draw_text(&annotation.status_text(), (10, 90), annotation.color);
    }

    renderer.draw_text(timestamp, (400, 460), Color::GRAY);
}
