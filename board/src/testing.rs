//! Test doubles shared by the unit test modules.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use crate::images::{ImageLoader, LoadDone};
use crate::layout::{BoardLayout, Rect};
use crate::render::Surface;

/// Loader that parks completions until the test settles them.
#[derive(Default)]
pub struct ParkedLoader {
    pub started: RefCell<Vec<String>>,
    pub pending: RefCell<Vec<LoadDone>>,
}

impl ParkedLoader {
    pub fn settle_all(&self, ok: bool) {
        let pending: Vec<LoadDone> = self.pending.borrow_mut().drain(..).collect();
        for done in pending {
            done(ok);
        }
    }
}

impl ImageLoader for Rc<ParkedLoader> {
    type Image = String;

    fn begin_load(&self, src: &str, done: LoadDone) -> String {
        self.started.borrow_mut().push(src.to_owned());
        self.pending.borrow_mut().push(done);
        src.to_owned()
    }
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Resize { side: f64, dpr: f64, backing: u32 },
    Clear,
    Fill(Rect, String),
    Stroke(Rect, String),
    Image(String, Rect),
}

/// Surface that records every call for later inspection.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<Op>,
}

impl RecordingSurface {
    pub fn fills(&self) -> Vec<(Rect, String)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Fill(rect, color) => Some((*rect, color.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn strokes(&self) -> Vec<Rect> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Stroke(rect, _) => Some(*rect),
                _ => None,
            })
            .collect()
    }

    pub fn images(&self) -> Vec<(String, Rect)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Image(src, rect) => Some((src.clone(), *rect)),
                _ => None,
            })
            .collect()
    }

    pub fn last_resize(&self) -> Option<Op> {
        self.ops
            .iter()
            .rev()
            .find(|op| matches!(op, Op::Resize { .. }))
            .cloned()
    }
}

impl Surface for RecordingSurface {
    type Image = String;
    type Error = Infallible;

    fn resize(&mut self, layout: &BoardLayout) -> Result<(), Infallible> {
        self.ops.push(Op::Resize { side: layout.side, dpr: layout.dpr, backing: layout.backing_size() });
        Ok(())
    }

    fn clear(&mut self, _layout: &BoardLayout) {
        self.ops.push(Op::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ops.push(Op::Fill(rect, color.to_owned()));
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, _line_width: f64) {
        self.ops.push(Op::Stroke(rect, color.to_owned()));
    }

    fn draw_image(&mut self, image: &String, rect: Rect) -> Result<(), Infallible> {
        self.ops.push(Op::Image(image.clone(), rect));
        Ok(())
    }
}
