//! Editable glyph outlines.
//!
//! Composite components refer to their base glyph by name so that glyphs can
//! be appended or rebuilt without renumbering anything.

use read_fonts::tables::glyf::{Anchor as ReadAnchor, CurvePoint, Glyph as ReadGlyph};
use write_fonts::tables::glyf::{Anchor, Bbox, ComponentFlags, Contour, SimpleGlyph, Transform};

#[derive(Debug, Clone)]
pub(crate) enum Outline {
    Empty,
    Simple(SimpleGlyph),
    Composite(Vec<Part>),
}

/// One component of a composite glyph.
#[derive(Debug, Clone)]
pub(crate) struct Part {
    pub base: String,
    pub anchor: Anchor,
    pub transform: Transform,
    pub flags: ComponentFlags,
}

impl Part {
    /// An untransformed component shifted right by `x`.
    pub fn offset(base: impl Into<String>, x: i16) -> Self {
        Self {
            base: base.into(),
            anchor: Anchor::Offset { x, y: 0 },
            transform: Transform {
                xx: font_types::F2Dot14::from_f32(1.0),
                yx: font_types::F2Dot14::from_f32(0.0),
                xy: font_types::F2Dot14::from_f32(0.0),
                yy: font_types::F2Dot14::from_f32(1.0),
            },
            flags: ComponentFlags {
                round_xy_to_grid: true,
                use_my_metrics: false,
                scaled_component_offset: false,
                unscaled_component_offset: false,
                overlap_compound: false,
            },
        }
    }

    fn shift(&self) -> (i32, i32) {
        match self.anchor {
            Anchor::Offset { x, y } => (i32::from(x), i32::from(y)),
            Anchor::Point { .. } => (0, 0),
        }
    }
}

/// Convert a source glyph, naming component bases through `name_of`.
pub(crate) fn convert_glyph(glyph: &ReadGlyph, name_of: impl Fn(u32) -> Option<String>) -> Outline {
    match glyph {
        ReadGlyph::Simple(simple) => {
            let mut contours: Vec<Contour> = Vec::new();
            let mut points = simple.points();
            let mut current = 0usize;
            for end in simple.end_pts_of_contours() {
                let end = end.get() as usize;
                let mut contour = Vec::new();
                while current <= end {
                    if let Some(point) = points.next() {
                        contour.push(CurvePoint { x: point.x, y: point.y, on_curve: point.on_curve });
                    }
                    current += 1;
                }
                contours.push(contour.into());
            }
            let bbox = Bbox {
                x_min: simple.x_min(),
                y_min: simple.y_min(),
                x_max: simple.x_max(),
                y_max: simple.y_max(),
            };
            Outline::Simple(SimpleGlyph { bbox, contours, instructions: simple.instructions().to_vec() })
        }
        ReadGlyph::Composite(composite) => {
            let parts = composite
                .components()
                .filter_map(|component| {
                    let base = name_of(component.glyph.to_u32())?;
                    let anchor = match component.anchor {
                        ReadAnchor::Offset { x, y } => Anchor::Offset { x, y },
                        ReadAnchor::Point { base, component } => Anchor::Point { base, component },
                    };
                    let transform = Transform {
                        xx: component.transform.xx,
                        yx: component.transform.yx,
                        xy: component.transform.xy,
                        yy: component.transform.yy,
                    };
                    Some(Part { base, anchor, transform, flags: component.flags.into() })
                })
                .collect();
            Outline::Composite(parts)
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Pending,
    Visiting,
    Done(Option<Bbox>),
}

/// Bounding boxes of every glyph; `None` marks a glyph that draws nothing.
///
/// Composite boxes are the union of their shifted components. A component
/// that draws nothing, names a missing glyph or closes a cycle is ignored.
pub(crate) fn bounds(
    outlines: &[&Outline],
    index_of: impl Fn(&str) -> Option<usize>,
) -> Vec<Option<Bbox>> {
    let mut states = vec![State::Pending; outlines.len()];
    for index in 0..outlines.len() {
        resolve(index, outlines, &index_of, &mut states);
    }
    states
        .into_iter()
        .map(|state| match state {
            State::Done(bbox) => bbox,
            State::Pending | State::Visiting => None,
        })
        .collect()
}

fn resolve(
    index: usize,
    outlines: &[&Outline],
    index_of: &impl Fn(&str) -> Option<usize>,
    states: &mut [State],
) -> Option<Bbox> {
    match states[index] {
        State::Done(bbox) => return bbox,
        State::Visiting => return None,
        State::Pending => {}
    }
    states[index] = State::Visiting;
    let bbox = match outlines[index] {
        Outline::Empty => None,
        Outline::Simple(simple) if simple.contours.is_empty() => None,
        Outline::Simple(simple) => Some(simple.bbox),
        Outline::Composite(parts) => {
            let mut union: Option<[i32; 4]> = None;
            for part in parts {
                let Some(base) = index_of(&part.base) else {
                    continue;
                };
                let Some(b) = resolve(base, outlines, index_of, states) else {
                    continue;
                };
                let (dx, dy) = part.shift();
                let shifted = [
                    i32::from(b.x_min) + dx,
                    i32::from(b.y_min) + dy,
                    i32::from(b.x_max) + dx,
                    i32::from(b.y_max) + dy,
                ];
                union = Some(match union {
                    None => shifted,
                    Some(u) => [
                        u[0].min(shifted[0]),
                        u[1].min(shifted[1]),
                        u[2].max(shifted[2]),
                        u[3].max(shifted[3]),
                    ],
                });
            }
            union.map(|[x_min, y_min, x_max, y_max]| Bbox {
                x_min: clamp(x_min),
                y_min: clamp(y_min),
                x_max: clamp(x_max),
                y_max: clamp(y_max),
            })
        }
    };
    states[index] = State::Done(bbox);
    bbox
}

pub(crate) fn clamp(value: i32) -> i16 {
    value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}
