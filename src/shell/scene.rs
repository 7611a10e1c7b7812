//! Software model of the inspection screen
//!
//! Backends keep a `Scene`, route the render/icon/notification capabilities
//! into it and draw whatever `render` returns each frame.

use std::time::{Duration, Instant};

use tracing::debug;

use super::assets::{IconAsset, OverlayIcon};
use super::glyphs;
use super::layout::OverlayLayout;
use super::primitives::{colors, Color, Fade, Rect, Rgb};
use super::text;
use crate::system::{IconSurface, Notifier, RenderSurface};

/// Margin between the toast box and the bottom edge / its text, in dp
const TOAST_MARGIN_DP: f64 = 24.0;
const TOAST_PADDING_DP: f64 = 12.0;
/// Font pixel size in dp
const TOAST_TEXT_SCALE_DP: f64 = 2.0;

#[derive(Debug, Clone)]
pub struct IconLayer {
    pub icon: OverlayIcon,
    pub asset: Option<IconAsset>,
    pub fade: Fade,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub text: String,
    pub until: Instant,
}

pub struct Scene {
    background: Rgb,
    layers: Vec<IconLayer>,
    toast: Option<Toast>,
    layout: OverlayLayout,
}

impl Scene {
    pub fn new(layout: OverlayLayout, icons: &[OverlayIcon]) -> Self {
        let now = Instant::now();
        Self {
            background: Rgb(0, 0, 0),
            layers: icons
                .iter()
                .map(|&icon| IconLayer {
                    icon,
                    asset: None,
                    fade: Fade::new(0.0, now),
                })
                .collect(),
            toast: None,
            layout,
        }
    }

    pub fn set_layout(&mut self, layout: OverlayLayout) {
        self.layout = layout;
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn icon_asset(&self, icon: OverlayIcon) -> Option<IconAsset> {
        self.layer(icon).and_then(|l| l.asset)
    }

    /// Opacity the icon is heading to
    pub fn icon_target(&self, icon: OverlayIcon) -> f32 {
        self.layer(icon).map(|l| l.fade.target()).unwrap_or(0.0)
    }

    pub fn toast_text(&self, now: Instant) -> Option<&str> {
        self.toast
            .as_ref()
            .filter(|t| now < t.until)
            .map(|t| t.text.as_str())
    }

    /// Whether anything on screen is still changing
    pub fn is_animating(&self, now: Instant) -> bool {
        self.layers.iter().any(|l| l.fade.is_animating(now)) || self.toast_text(now).is_some()
    }

    /// Drop the toast once expired
    pub fn tick(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| now >= t.until) {
            debug!("Toast expired");
            self.toast = None;
        }
    }

    /// Full frame, back to front
    pub fn render(&self, now: Instant) -> Vec<(Rect, Color)> {
        let screen = self.layout.screen();
        let mut rects = vec![(
            Rect::new(0.0, 0.0, screen.w as f64, screen.h as f64),
            self.background.with_alpha(1.0),
        )];

        for layer in &self.layers {
            if let Some(asset) = layer.asset {
                let bounds = self.layout.icon_rect(layer.icon);
                rects.extend(glyphs::render_icon(asset, bounds, layer.fade.value(now)));
            }
        }

        if let Some(message) = self.toast_text(now) {
            rects.extend(self.render_toast(message));
        }

        rects
    }

    fn render_toast(&self, message: &str) -> Vec<(Rect, Color)> {
        let screen = self.layout.screen();
        let density = self.layout.density();
        let margin = TOAST_MARGIN_DP * density;
        let padding = TOAST_PADDING_DP * density;
        let scale = (TOAST_TEXT_SCALE_DP * density).round().max(1.0);
        let line_height = (text::CHAR_HEIGHT + 3.0) * scale;

        let box_width = (screen.w as f64 - 2.0 * margin).max(0.0);
        let lines = text::wrap_text(message, box_width - 2.0 * padding, scale);
        let box_height = lines.len() as f64 * line_height + 2.0 * padding;
        let box_y = screen.h as f64 - margin - box_height;

        let mut rects = vec![(Rect::new(margin, box_y, box_width, box_height), colors::TOAST)];
        let center_x = screen.w as f64 / 2.0;
        for (i, line) in lines.iter().enumerate() {
            let y = box_y + padding + i as f64 * line_height;
            rects.extend(text::render_text_centered(line, center_x, y, scale, colors::TOAST_TEXT));
        }
        rects
    }

    fn layer(&self, icon: OverlayIcon) -> Option<&IconLayer> {
        self.layers.iter().find(|l| l.icon == icon)
    }

    fn layer_mut(&mut self, icon: OverlayIcon) -> Option<&mut IconLayer> {
        self.layers.iter_mut().find(|l| l.icon == icon)
    }
}

impl RenderSurface for Scene {
    fn set_background(&mut self, color: Rgb) {
        self.background = color;
    }
}

impl IconSurface for Scene {
    fn set_image(&mut self, icon: OverlayIcon, asset: IconAsset) {
        if let Some(layer) = self.layer_mut(icon) {
            layer.asset = Some(asset);
        }
    }

    fn set_opacity(&mut self, icon: OverlayIcon, alpha: f32) {
        if let Some(layer) = self.layer_mut(icon) {
            layer.fade.set_immediate(alpha, Instant::now());
        }
    }

    fn animate_opacity(&mut self, icon: OverlayIcon, target: f32, duration: Duration) {
        if let Some(layer) = self.layer_mut(icon) {
            layer.fade.animate_to(target, duration, Instant::now());
        }
    }
}

impl Notifier for Scene {
    /// A newer message replaces the one on screen
    fn show_message(&mut self, text: &str, duration: Duration) {
        self.toast = Some(Toast {
            text: text.to_string(),
            until: Instant::now() + duration,
        });
    }
}
