use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use egui::{
    pos2, Color32, ColorImage, Pos2, Rect as EguiRect, Sense, Shape, Stroke, TextureHandle,
    TextureOptions, Ui, Vec2,
};
use quakemap::decoded_image::DecodedImage;
use quakemap::render::{Canvas, CirclePaint, LinePaint};
use quakemap::{Color, Map, Messenger, Popup};
use quakemap_types::{Point2, Rect, Size};

use crate::controls;

/// Scroll distance in points that changes the zoom by one level.
const SCROLL_PER_ZOOM_LEVEL: f64 = 100.0;

/// Map widget state: the map, uploaded tile textures and the open popup.
pub struct EguiMapState {
    map: Map,
    textures: TextureCache,
    requires_redraw: Arc<AtomicBool>,
    popup: Option<OpenPopup>,
}

struct OpenPopup {
    position: Pos2,
    popups: Vec<Popup>,
}

impl EguiMapState {
    /// Wraps the map and connects its redraw requests to the egui context.
    pub fn new(mut map: Map, ctx: egui::Context) -> Self {
        let requires_redraw = Arc::new(AtomicBool::new(true));
        let messenger = MapStateMessenger {
            context: ctx,
            requires_redraw: requires_redraw.clone(),
        };
        map.set_messenger(Arc::new(messenger));

        Self {
            map,
            textures: TextureCache::default(),
            requires_redraw,
            popup: None,
        }
    }

    /// The map shown by the widget.
    pub fn map(&self) -> &Map {
        &self.map
    }

    /// Mutable access to the map.
    pub fn map_mut(&mut self) -> &mut Map {
        &mut self.map
    }

    /// Handles user input, draws the map into the available space and shows the controls.
    pub fn render(&mut self, ui: &mut Ui) {
        let available_size = ui.available_size().floor();
        let (rect, response) = ui.allocate_exact_size(available_size, Sense::click_and_drag());

        let size = Size::new(available_size.x as f64, available_size.y as f64);
        self.map.set_size(size);

        self.handle_input(ui, rect, &response);

        if self.requires_redraw.swap(false, Ordering::Relaxed) {
            log::trace!("Loading layers for the new view");
            self.map.load_layers();
        }

        let mut canvas = EguiCanvas::new(ui.painter_at(rect), size, &mut self.textures);
        self.map.render(&mut canvas);
        self.textures.finish_frame();

        let ctx = ui.ctx().clone();
        controls::layer_control(&ctx, &mut self.map);
        controls::legend(&ctx, self.map.legend());
        controls::attributions(&ctx, &self.map.control().attributions());
        self.show_popup(&ctx);
    }

    fn handle_input(&mut self, ui: &Ui, rect: EguiRect, response: &egui::Response) {
        if response.dragged() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let to = to_map_point(rect.min, pointer);
                let delta = response.drag_delta();
                let from = Point2::new(to.x - delta.x as f64, to.y - delta.y as f64);
                self.map
                    .set_view(self.map.view().translate_by_pixels(from, to));
            }
        }

        if let Some(hover) = response.hover_pos() {
            let scroll = ui.input(|input| input.smooth_scroll_delta.y);
            if scroll.abs() > 0.0001 {
                let base_point = to_map_point(rect.min, hover);
                self.map.set_view(
                    self.map
                        .view()
                        .zoom_by(scroll_zoom_factor(scroll), base_point),
                );
            }
        }

        if response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let popups = self.map.popups_at(to_map_point(rect.min, pointer));
                self.popup = (!popups.is_empty()).then_some(OpenPopup {
                    position: pointer,
                    popups,
                });
            }
        }
    }

    fn show_popup(&mut self, ctx: &egui::Context) {
        let Some(popup) = &self.popup else {
            return;
        };

        let mut open = true;
        egui::Window::new("Earthquake")
            .fixed_pos(popup.position)
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                for (index, popup) in popup.popups.iter().enumerate() {
                    if index > 0 {
                        ui.separator();
                    }
                    for row in popup.rows() {
                        ui.label(format!("{}: {}", row.label, row.value));
                    }
                    if let Some(link) = popup.link() {
                        ui.hyperlink_to("Details", link);
                    }
                }
            });

        if !open {
            self.popup = None;
        }
    }
}

/// Textures of the tile images, kept while the images are drawn.
#[derive(Default)]
struct TextureCache {
    textures: HashMap<String, TextureHandle>,
    used: HashSet<String>,
}

impl TextureCache {
    fn get_or_load(&mut self, ctx: &egui::Context, key: &str, image: &DecodedImage) -> &TextureHandle {
        self.used.insert(key.to_owned());
        self.textures.entry(key.to_owned()).or_insert_with(|| {
            let size = image.size();
            let color_image = ColorImage::from_rgba_unmultiplied(
                [size.width() as usize, size.height() as usize],
                image.bytes(),
            );
            ctx.load_texture(key, color_image, TextureOptions::LINEAR)
        })
    }

    /// Drops textures that were not drawn since the previous call.
    fn finish_frame(&mut self) {
        let used = std::mem::take(&mut self.used);
        self.textures.retain(|key, _| used.contains(key));
    }
}

/// [`Canvas`] drawing with an egui painter. Screen coordinates are relative to the painter's
/// clip rectangle.
pub struct EguiCanvas<'a> {
    painter: egui::Painter,
    size: Size,
    textures: &'a mut TextureCache,
}

impl<'a> EguiCanvas<'a> {
    fn new(painter: egui::Painter, size: Size, textures: &'a mut TextureCache) -> Self {
        Self {
            painter,
            size,
            textures,
        }
    }

    fn to_screen(&self, point: Point2) -> Pos2 {
        to_screen_pos(self.painter.clip_rect().min, point)
    }
}

impl Canvas for EguiCanvas<'_> {
    fn size(&self) -> Size {
        self.size
    }

    fn draw_image(&mut self, key: &str, image: &DecodedImage, bbox: Rect) {
        let rect = EguiRect::from_min_max(
            self.to_screen(Point2::new(bbox.x_min(), bbox.y_min())),
            self.to_screen(Point2::new(bbox.x_max(), bbox.y_max())),
        );
        let texture = self
            .textures
            .get_or_load(self.painter.ctx(), key, image)
            .id();
        self.painter.image(
            texture,
            rect,
            EguiRect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
            Color32::WHITE,
        );
    }

    fn draw_circle(&mut self, center: Point2, paint: &CirclePaint) {
        self.painter.circle(
            self.to_screen(center),
            paint.radius as f32,
            to_color32(paint.fill),
            Stroke::new(paint.stroke_width as f32, to_color32(paint.stroke_color)),
        );
    }

    fn draw_polyline(&mut self, points: &[Point2], paint: &LinePaint) {
        let points = points.iter().map(|p| self.to_screen(*p)).collect();
        self.painter.add(Shape::line(
            points,
            Stroke::new(paint.width as f32, to_color32(paint.color)),
        ));
    }
}

/// Redraw requests of the map, forwarded to egui.
#[derive(Debug, Clone)]
pub struct MapStateMessenger {
    /// Set when the map must reload its layers.
    pub requires_redraw: Arc<AtomicBool>,
    /// Context to repaint.
    pub context: egui::Context,
}

impl Messenger for MapStateMessenger {
    fn request_redraw(&self) {
        log::trace!("Redraw requested");
        self.requires_redraw.store(true, Ordering::Relaxed);
        self.context.request_repaint();
    }
}

fn to_color32(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), color.a())
}

fn to_screen_pos(origin: Pos2, point: Point2) -> Pos2 {
    origin + Vec2::new(point.x as f32, point.y as f32)
}

fn to_map_point(origin: Pos2, pos: Pos2) -> Point2 {
    let local = pos - origin;
    Point2::new(local.x as f64, local.y as f64)
}

/// Resolution multiplier for a scroll distance. Scrolling up zooms in.
fn scroll_zoom_factor(scroll: f32) -> f64 {
    2f64.powf(-(scroll as f64) / SCROLL_PER_ZOOM_LEVEL)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn screen_conversions() {
        let origin = pos2(10.0, 20.0);
        let point = to_map_point(origin, pos2(110.0, 70.0));
        assert_eq!(point, Point2::new(100.0, 50.0));
        assert_eq!(to_screen_pos(origin, point), pos2(110.0, 70.0));
    }

    #[test]
    fn scroll_direction() {
        assert_relative_eq!(scroll_zoom_factor(100.0), 0.5);
        assert_relative_eq!(scroll_zoom_factor(-100.0), 2.0);
        assert_relative_eq!(scroll_zoom_factor(0.0), 1.0);
    }

    #[test]
    fn marker_colors_keep_alpha() {
        let fill = Color::from_hex("#00FF00").with_opacity(0.75);
        assert_eq!(
            to_color32(fill),
            Color32::from_rgba_unmultiplied(0, 255, 0, 191)
        );
    }
}
