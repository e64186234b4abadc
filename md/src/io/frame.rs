//! Per-frame emission of circles for an external plotter
//!
//! Each entity becomes the parametric fragment `" , x+r*cos(t),y+r*sin(t)"`,
//! in ensemble order, so that a frame can be appended to a gnuplot `plot`
//! command.

use crate::body::Body;
use crate::metropolis::MetropolisSampler;
use color_eyre::eyre::Result;
use std::io::Write;

/// A circle of radius `r` centred on `(x, y)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

/// Anything that can be drawn as a sequence of circles.
pub trait Renderable {
    fn circles(&self) -> Vec<Circle>;
}

impl Renderable for [Body] {
    fn circles(&self) -> Vec<Circle> {
        self.iter()
            .map(|b| Circle {
                x: b.position().x,
                y: b.position().y,
                r: b.radius(),
            })
            .collect()
    }
}

/// Monte Carlo particles have no size; `marker` sets the drawn radius.
pub struct Marked<'a> {
    pub sampler: &'a MetropolisSampler,
    pub marker: f64,
}

impl Renderable for Marked<'_> {
    fn circles(&self) -> Vec<Circle> {
        self.sampler
            .positions()
            .iter()
            .map(|p| Circle {
                x: p.x,
                y: p.y,
                r: self.marker,
            })
            .collect()
    }
}

/// Write one frame, without a trailing newline.
pub fn write_frame<W: Write, R: Renderable + ?Sized>(writer: &mut W, scene: &R) -> Result<()> {
    for c in scene.circles() {
        write!(writer, " , {}+{}*cos(t),{}+{}*sin(t)", c.x, c.r, c.y, c.r)?;
    }
    Ok(())
}
