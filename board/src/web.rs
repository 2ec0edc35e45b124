//! Browser bindings: canvas surfaces, DOM image loading, and the mounted host.
//!
//! Everything here talks to `web_sys`. The pure board lives in
//! [`crate::engine`]; this module only adapts it to two stacked
//! `<canvas>` elements inside a host container, wires up resize and click
//! events, and paints on animation frames.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::Once;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, HtmlImageElement, MouseEvent, ResizeObserver};

use crate::engine::Board;
use crate::images::{ImageLoader, LoadDone, PieceImageCache};
use crate::layout::{BoardLayout, Point, Rect};
use crate::render::Surface;

/// A board painted onto DOM canvases.
pub type WebBoard = Board<CanvasSurface, HtmlImageLoader>;

// =============================================================
// CanvasSurface
// =============================================================

/// [`Surface`] backed by a 2D canvas context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Wrap `canvas`, acquiring its 2D context.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;
        Ok(Self { canvas, ctx })
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Surface for CanvasSurface {
    type Image = HtmlImageElement;
    type Error = JsValue;

    fn resize(&mut self, layout: &BoardLayout) -> Result<(), JsValue> {
        let backing = layout.backing_size();
        self.canvas.set_width(backing);
        self.canvas.set_height(backing);

        let css = format!("{}px", layout.side);
        let style = self.canvas.style();
        style.set_property("width", &css)?;
        style.set_property("height", &css)?;

        // Setting the size resets the context; draw in CSS pixels from here on.
        self.ctx.set_transform(layout.dpr, 0.0, 0.0, layout.dpr, 0.0, 0.0)
    }

    fn clear(&mut self, layout: &BoardLayout) {
        self.ctx.clear_rect(0.0, 0.0, layout.side, layout.side);
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(rect.x, rect.y, rect.w, rect.h);
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width);
        self.ctx.stroke_rect(rect.x, rect.y, rect.w, rect.h);
    }

    fn draw_image(&mut self, image: &HtmlImageElement, rect: Rect) -> Result<(), JsValue> {
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(image, rect.x, rect.y, rect.w, rect.h)
    }
}

// =============================================================
// HtmlImageLoader
// =============================================================

/// Loads piece artwork through `<img>` elements.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlImageLoader;

impl ImageLoader for HtmlImageLoader {
    type Image = HtmlImageElement;

    fn begin_load(&self, src: &str, done: LoadDone) -> HtmlImageElement {
        let image = match HtmlImageElement::new() {
            Ok(image) => image,
            Err(err) => {
                tracing::warn!(?err, %src, "could not create image element");
                done(false);
                // Never drawn: the entry is already marked failed.
                return JsValue::NULL.unchecked_into();
            }
        };

        // onload and onerror race for the one completion.
        let slot: Rc<RefCell<Option<LoadDone>>> = Rc::new(RefCell::new(Some(done)));
        let settle = |ok: bool| {
            let slot = Rc::clone(&slot);
            Closure::once_into_js(move || {
                if let Some(done) = slot.borrow_mut().take() {
                    done(ok);
                }
            })
        };
        image.set_onload(Some(settle(true).unchecked_ref()));
        image.set_onerror(Some(settle(false).unchecked_ref()));
        image.set_src(src);
        image
    }
}

thread_local! {
    static PIECE_IMAGES: Rc<PieceImageCache<HtmlImageLoader>> =
        Rc::new(PieceImageCache::new(HtmlImageLoader));
}

/// The process-wide piece image cache shared by every mounted board.
#[must_use]
pub fn shared_images() -> Rc<PieceImageCache<HtmlImageLoader>> {
    PIECE_IMAGES.with(Rc::clone)
}

// =============================================================
// BoardHost
// =============================================================

/// A board mounted into a DOM container.
///
/// Owns two stacked canvases (squares below, pieces above), a resize
/// observer on the container, and a click listener. Dropping the host
/// detaches all of them.
pub struct BoardHost {
    board: Rc<RefCell<WebBoard>>,
    container: HtmlElement,
    frame_pending: Rc<Cell<bool>>,
    observer: ResizeObserver,
    _on_resize: Closure<dyn FnMut(js_sys::Array)>,
    on_click: Closure<dyn FnMut(MouseEvent)>,
}

impl BoardHost {
    /// Mount a board showing `position` into `container`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the document, canvases, or observer cannot be created.
    pub fn mount<F>(container: &HtmlElement, position: &str, moves: F) -> Result<Self, JsValue>
    where
        F: Fn(usize, usize) -> Vec<(i32, i32)> + 'static,
    {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;

        container.style().set_property("position", "relative")?;
        let squares = stacked_canvas(&document, container)?;
        let pieces = stacked_canvas(&document, container)?;

        let board = Rc::new(RefCell::new(Board::new(
            position,
            moves,
            shared_images(),
            CanvasSurface::new(squares)?,
            CanvasSurface::new(pieces.clone())?,
        )));
        let frame_pending = Rc::new(Cell::new(false));

        {
            let weak = Rc::downgrade(&board);
            let pending = Rc::clone(&frame_pending);
            board
                .borrow()
                .set_redraw_hook(move || schedule_frame(&weak, &pending));
        }

        let on_resize = {
            let weak = Rc::downgrade(&board);
            let pending = Rc::clone(&frame_pending);
            let container = container.clone();
            Closure::<dyn FnMut(js_sys::Array)>::new(move |_entries: js_sys::Array| {
                sync_size(&container, &weak, &pending);
            })
        };
        let observer = ResizeObserver::new(on_resize.as_ref().unchecked_ref())?;
        observer.observe(container);

        let on_click = {
            let weak = Rc::downgrade(&board);
            let pending = Rc::clone(&frame_pending);
            Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
                let point = Point::new(f64::from(event.offset_x()), f64::from(event.offset_y()));
                handle_click(&weak, &pending, point);
            })
        };
        pieces.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;

        let host = Self { board, container: container.clone(), frame_pending, observer, _on_resize: on_resize, on_click };
        sync_size(&host.container, &Rc::downgrade(&host.board), &host.frame_pending);
        Ok(host)
    }

    /// Show a new position. Only the pieces layer is repainted.
    pub fn set_position(&self, position: &str) {
        let changed = match self.board.try_borrow_mut() {
            Ok(mut board) => board.set_position(position),
            Err(_) => false,
        };
        if changed {
            schedule_frame(&Rc::downgrade(&self.board), &self.frame_pending);
        }
    }

    #[must_use]
    pub fn board(&self) -> &Rc<RefCell<WebBoard>> {
        &self.board
    }
}

impl Drop for BoardHost {
    fn drop(&mut self) {
        self.observer.disconnect();
        if let Ok(board) = self.board.try_borrow() {
            let pieces = board.pieces_surface().canvas();
            if let Err(err) = pieces.remove_event_listener_with_callback("click", self.on_click.as_ref().unchecked_ref()) {
                tracing::debug!(?err, "click listener already detached");
            }
            pieces.remove();
            board.squares_surface().canvas().remove();
        }
        tracing::debug!("board unmounted");
    }
}

fn stacked_canvas(document: &web_sys::Document, container: &HtmlElement) -> Result<HtmlCanvasElement, JsValue> {
    let canvas = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(JsValue::from)?;
    let style = canvas.style();
    style.set_property("position", "absolute")?;
    style.set_property("left", "0")?;
    style.set_property("top", "0")?;
    container.append_child(&canvas)?;
    Ok(canvas)
}

fn sync_size(container: &HtmlElement, board: &Weak<RefCell<WebBoard>>, pending: &Rc<Cell<bool>>) {
    let Some(board_rc) = board.upgrade() else {
        return;
    };
    let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
    let width = f64::from(container.client_width());
    let height = f64::from(container.client_height());

    let resized = match board_rc.try_borrow_mut() {
        Ok(mut b) => b.resize(width, height, dpr),
        Err(_) => return,
    };
    match resized {
        Ok(true) => schedule_frame(board, pending),
        Ok(false) => {}
        Err(err) => tracing::warn!(?err, "board resize failed"),
    }
}

fn handle_click(board: &Weak<RefCell<WebBoard>>, pending: &Rc<Cell<bool>>, point: Point) {
    let Some(board_rc) = board.upgrade() else {
        return;
    };
    let outcome = match board_rc.try_borrow_mut() {
        Ok(mut b) => b.click(point),
        Err(_) => return,
    };
    tracing::debug!(?outcome, "board click");
    schedule_frame(board, pending);
}

/// Request one animation frame for all pending invalidations.
fn schedule_frame(board: &Weak<RefCell<WebBoard>>, pending: &Rc<Cell<bool>>) {
    if pending.replace(true) {
        return;
    }
    let Some(window) = web_sys::window() else {
        pending.set(false);
        paint_now(board);
        return;
    };

    let board_cb = Weak::clone(board);
    let pending_cb = Rc::clone(pending);
    let callback = Closure::once_into_js(move |_ts: f64| {
        pending_cb.set(false);
        paint_now(&board_cb);
    });
    if let Err(err) = window.request_animation_frame(callback.unchecked_ref()) {
        tracing::warn!(?err, "animation frame unavailable; painting immediately");
        pending.set(false);
        paint_now(board);
    }
}

fn paint_now(board: &Weak<RefCell<WebBoard>>) {
    let Some(board) = board.upgrade() else {
        return;
    };
    let Ok(mut board) = board.try_borrow_mut() else {
        return;
    };
    if let Err(err) = board.render() {
        tracing::warn!(?err, "board render failed");
    }
}

// =============================================================
// JS export
// =============================================================

/// Board handle exported to JavaScript hosts.
///
/// `moves` is called as `moves(file, rank)` and should return an array of
/// `[rank, file]` pairs.
/// Send log output to the browser console and panics to `console.error`.
///
/// With no `tracing` subscriber installed, events fall through to `log`,
/// which `console_log` forwards. Safe to call more than once; hosts that
/// mount [`BoardHost`] directly should call it at startup.
pub fn install_console_logging() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        console_error_panic_hook::set_once();
        if let Err(err) = console_log::init_with_level(log::Level::Info) {
            tracing::debug!(%err, "host already installed a logger");
        }
    });
}

#[wasm_bindgen]
pub struct BoardElement {
    host: BoardHost,
}

#[wasm_bindgen]
impl BoardElement {
    /// # Errors
    ///
    /// Returns `Err` if the board cannot be mounted into `container`.
    #[wasm_bindgen(constructor)]
    pub fn new(container: &HtmlElement, position: &str, moves: js_sys::Function) -> Result<BoardElement, JsValue> {
        install_console_logging();
        let host = BoardHost::mount(container, position, move |file, rank| call_moves(&moves, file, rank))?;
        Ok(Self { host })
    }

    #[wasm_bindgen(js_name = setPosition)]
    pub fn set_position(&self, position: &str) {
        self.host.set_position(position);
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn call_moves(moves: &js_sys::Function, file: usize, rank: usize) -> Vec<(i32, i32)> {
    let result = match moves.call2(&JsValue::NULL, &JsValue::from_f64(file as f64), &JsValue::from_f64(rank as f64)) {
        Ok(result) => result,
        Err(err) => {
            tracing::warn!(?err, file, rank, "move function threw");
            return Vec::new();
        }
    };
    if !js_sys::Array::is_array(&result) {
        return Vec::new();
    }

    js_sys::Array::from(&result)
        .iter()
        .filter_map(|pair| {
            let pair = js_sys::Array::from(&pair);
            let rank = pair.get(0).as_f64().filter(|v| v.is_finite())?;
            let file = pair.get(1).as_f64().filter(|v| v.is_finite())?;
            Some((rank as i32, file as i32))
        })
        .collect()
}
