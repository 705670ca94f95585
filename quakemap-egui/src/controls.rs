//! Windows drawn over the map: layer control, depth legend and attributions.

use egui::{Align2, Color32, Context, Id, Sense, Vec2};
use quakemap::control::{EARTHQUAKES_OVERLAY, PLATES_OVERLAY};
use quakemap::layer::Attribution;
use quakemap::legend::Corner;
use quakemap::{Legend, Map};

const MARGIN: f32 = 10.0;
const SWATCH_SIZE: f32 = 14.0;

/// Base layer radio buttons and overlay checkboxes in the top right corner.
pub fn layer_control(ctx: &Context, map: &mut Map) {
    let base_names: Vec<String> = map
        .control()
        .base_names()
        .into_iter()
        .map(str::to_owned)
        .collect();
    let overlay_names: Vec<String> = map
        .control()
        .overlay_names()
        .into_iter()
        .map(str::to_owned)
        .collect();
    let pending: Vec<bool> = overlay_names
        .iter()
        .map(|name| match name.as_str() {
            EARTHQUAKES_OVERLAY => !map.earthquakes().is_attached(),
            PLATES_OVERLAY => !map.plates().is_attached(),
            _ => false,
        })
        .collect();

    let mut changed = false;
    egui::Window::new("Layers")
        .anchor(Align2::RIGHT_TOP, [-MARGIN, MARGIN])
        .collapsible(true)
        .resizable(false)
        .show(ctx, |ui| {
            let selected = map.control().selected_base();
            for (index, name) in base_names.iter().enumerate() {
                if ui.radio(selected == Some(index), name).clicked() {
                    changed |= map.control_mut().select_base(index);
                }
            }

            if !overlay_names.is_empty() {
                ui.separator();
            }

            for (index, name) in overlay_names.iter().enumerate() {
                let mut visible = map.control().is_overlay_visible(index);
                let label = if pending.get(index).copied().unwrap_or(false) {
                    format!("{name} (loading)")
                } else {
                    name.clone()
                };
                if ui.checkbox(&mut visible, label).changed() {
                    changed |= map.control_mut().set_overlay_visible(index, visible);
                }
            }
        });

    if changed {
        map.redraw();
    }
}

/// Depth legend anchored to its corner.
pub fn legend(ctx: &Context, legend: &Legend) {
    let (align, offset) = anchor(legend.position());
    egui::Area::new(Id::new("depth_legend"))
        .anchor(align, offset)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.strong("Depth");
                for row in legend.rows() {
                    ui.horizontal(|ui| {
                        let (rect, _) =
                            ui.allocate_exact_size(Vec2::splat(SWATCH_SIZE), Sense::hover());
                        let color = row.color;
                        ui.painter().rect_filled(
                            rect,
                            0.0,
                            Color32::from_rgb(color.r(), color.g(), color.b()),
                        );
                        ui.label(&row.label);
                    });
                }
            });
        });
}

/// Attributions of the visible layers in the bottom left corner.
pub fn attributions(ctx: &Context, attributions: &[Attribution]) {
    if attributions.is_empty() {
        return;
    }

    egui::Area::new(Id::new("attributions"))
        .anchor(Align2::LEFT_BOTTOM, [MARGIN, -MARGIN])
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for (index, attribution) in attributions.iter().enumerate() {
                        if index > 0 {
                            ui.label("|");
                        }
                        match attribution.url() {
                            Some(url) => ui.hyperlink_to(attribution.text(), url),
                            None => ui.label(attribution.text()),
                        };
                    }
                });
            });
        });
}

fn anchor(corner: Corner) -> (Align2, [f32; 2]) {
    match corner {
        Corner::TopLeft => (Align2::LEFT_TOP, [MARGIN, MARGIN]),
        Corner::TopRight => (Align2::RIGHT_TOP, [-MARGIN, MARGIN]),
        Corner::BottomLeft => (Align2::LEFT_BOTTOM, [MARGIN, -MARGIN]),
        Corner::BottomRight => (Align2::RIGHT_BOTTOM, [-MARGIN, -MARGIN]),
    }
}
