//! Bulk topology generators.
//!
//! Each generator enumerates ordered element pairs and applies a positional
//! adjacency predicate over stored coordinates, skipping pairs where both
//! elements are stream ports. Stream-port insertion populates whole border
//! rows/columns, re-origining the grid first when the zero boundary is
//! already occupied, and prunes double-covered corners afterward.

use crate::aggregate::{Aggregate, Position};
use crate::directive::{Directive, PatternKind, WrapSide};
use crate::element::{Element, StreamPort};
use crate::error::ArchError;
use crate::ids::ElementId;
use std::ops::BitOr;
use std::str::FromStr;

/// A selection of fabric borders for stream-port insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PortSides {
    /// Populate the left border column.
    pub left: bool,
    /// Populate the right border column.
    pub right: bool,
    /// Populate the top border row.
    pub top: bool,
    /// Populate the bottom border row.
    pub bottom: bool,
}

impl PortSides {
    /// The left border only.
    pub const LEFT: PortSides = PortSides { left: true, right: false, top: false, bottom: false };
    /// The right border only.
    pub const RIGHT: PortSides = PortSides { left: false, right: true, top: false, bottom: false };
    /// The top border only.
    pub const TOP: PortSides = PortSides { left: false, right: false, top: true, bottom: false };
    /// The bottom border only.
    pub const BOTTOM: PortSides = PortSides { left: false, right: false, top: false, bottom: true };
    /// Both horizontal borders (left and right).
    pub const HORIZONTAL: PortSides = PortSides { left: true, right: true, top: false, bottom: false };
    /// Both vertical borders (top and bottom).
    pub const VERTICAL: PortSides = PortSides { left: false, right: false, top: true, bottom: true };
    /// All four borders.
    pub const ALL: PortSides = PortSides { left: true, right: true, top: true, bottom: true };

    /// Returns `true` if both horizontal borders are selected, which flips
    /// the directionality of the right-border ports.
    pub fn horizontal_pair(self) -> bool {
        self.left && self.right
    }

    /// Returns `true` if both vertical borders are selected, which flips
    /// the directionality of the bottom-border ports.
    pub fn vertical_pair(self) -> bool {
        self.top && self.bottom
    }
}

impl BitOr for PortSides {
    type Output = PortSides;

    fn bitor(self, rhs: PortSides) -> PortSides {
        PortSides {
            left: self.left || rhs.left,
            right: self.right || rhs.right,
            top: self.top || rhs.top,
            bottom: self.bottom || rhs.bottom,
        }
    }
}

impl FromStr for PortSides {
    type Err = ArchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(PortSides::LEFT),
            "right" => Ok(PortSides::RIGHT),
            "top" => Ok(PortSides::TOP),
            "bottom" => Ok(PortSides::BOTTOM),
            "horizontal" => Ok(PortSides::HORIZONTAL),
            "vertical" => Ok(PortSides::VERTICAL),
            "all" => Ok(PortSides::ALL),
            other => Err(ArchError::UnknownPortSide(other.to_string())),
        }
    }
}

/// Running tally of stream-engine port capacity created by one
/// [`Aggregate::add_stream_ports`] call: ports able to load data into the
/// fabric and ports able to store data out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamPortCounts {
    /// Input-capable ports added (minus pruned).
    pub loads: u32,
    /// Output-capable ports added (minus pruned).
    pub stores: u32,
}

impl Aggregate {
    fn connect_where(
        &mut self,
        latency: u32,
        bidirectional: bool,
        pred: impl Fn(Position, Position) -> bool,
    ) {
        let placed: Vec<(ElementId, Position, bool)> = self
            .elements()
            .filter_map(|(id, e)| {
                self.stored_position(id).map(|pos| (id, pos, e.is_stream()))
            })
            .collect();
        for &(a, pa, a_stream) in &placed {
            for &(b, pb, b_stream) in &placed {
                // Stream ports never connect directly to each other.
                if a == b || (a_stream && b_stream) {
                    continue;
                }
                if pred(pa, pb) {
                    self.insert_edge(a, b, latency);
                    if bidirectional {
                        self.insert_edge(b, a, latency);
                    }
                }
            }
        }
    }

    fn log_patterns(&mut self, kinds: &[PatternKind], latency: u32) {
        for &kind in kinds {
            self.push_directive(Directive::Pattern { kind, latency });
        }
    }

    /// Connects every element to its right and down neighbors.
    pub fn connect_grid_standard(&mut self, latency: u32, bidirectional: bool) {
        self.connect_where(latency, bidirectional, |a, b| {
            (b.x == a.x + 1 && b.y == a.y) || (b.x == a.x && b.y == a.y - 1)
        });
        if bidirectional {
            self.log_patterns(
                &[
                    PatternKind::LeftToRight,
                    PatternKind::RightToLeft,
                    PatternKind::UpToDown,
                    PatternKind::DownToUp,
                ],
                latency,
            );
        } else {
            self.log_patterns(&[PatternKind::LeftToRight, PatternKind::UpToDown], latency);
        }
    }

    /// Connects every element to its right, down, and down-right neighbors.
    pub fn connect_grid_diagonals(&mut self, latency: u32, bidirectional: bool) {
        self.connect_where(latency, bidirectional, |a, b| {
            (b.x == a.x + 1 && b.y == a.y)
                || (b.x == a.x && b.y == a.y - 1)
                || (b.x == a.x + 1 && b.y == a.y - 1)
        });
        if bidirectional {
            self.log_patterns(
                &[
                    PatternKind::LeftToRight,
                    PatternKind::RightToLeft,
                    PatternKind::UpToDown,
                    PatternKind::DownToUp,
                    PatternKind::DiagonalNw,
                    PatternKind::DiagonalSw,
                    PatternKind::DiagonalNe,
                    PatternKind::DiagonalSe,
                ],
                latency,
            );
        } else {
            self.log_patterns(
                &[PatternKind::LeftToRight, PatternKind::UpToDown, PatternKind::DiagonalNw],
                latency,
            );
        }
    }

    /// Connects every element to all eight neighbors, always bidirectional.
    pub fn connect_grid_full(&mut self, latency: u32) {
        self.connect_where(latency, true, |a, b| {
            (b.x == a.x + 1 && b.y == a.y)
                || (b.x == a.x && b.y == a.y - 1)
                || (b.x == a.x + 1 && b.y == a.y - 1)
                || (b.x == a.x - 1 && b.y == a.y - 1)
        });
        self.log_patterns(
            &[
                PatternKind::LeftToRight,
                PatternKind::RightToLeft,
                PatternKind::UpToDown,
                PatternKind::DownToUp,
                PatternKind::DiagonalNw,
                PatternKind::DiagonalSw,
                PatternKind::DiagonalNe,
                PatternKind::DiagonalSe,
            ],
            latency,
        );
    }

    /// Connects every element to its right neighbor only. Both horizontal
    /// pattern directives are logged; edges are mirrored only when
    /// `bidirectional` is set.
    pub fn connect_horizontal(&mut self, latency: u32, bidirectional: bool) {
        self.connect_where(latency, bidirectional, |a, b| b.x == a.x + 1 && b.y == a.y);
        self.log_patterns(&[PatternKind::LeftToRight, PatternKind::RightToLeft], latency);
    }

    /// Connects every element to its down neighbor only. Both vertical
    /// pattern directives are logged; edges are mirrored only when
    /// `bidirectional` is set.
    pub fn connect_vertical(&mut self, latency: u32, bidirectional: bool) {
        self.connect_where(latency, bidirectional, |a, b| b.x == a.x && b.y == a.y - 1);
        self.log_patterns(&[PatternKind::UpToDown, PatternKind::DownToUp], latency);
    }

    /// Records wraparound markers for the given directions. Markers only
    /// append directives; no edges are created.
    pub fn add_wraparound_markers(&mut self, latency: u32, sides: &[WrapSide]) {
        for &side in sides {
            self.push_directive(Directive::WrapAround { side, latency });
        }
    }

    /// Inserts a full row or column of stream ports along each selected
    /// border, wiring each port to its adjacent interior element.
    ///
    /// If a zero boundary is already occupied, every existing element is
    /// first shifted one unit away from it. `merge_ios` makes every
    /// inserted port both input- and output-capable; otherwise ports on
    /// opposite borders of a pair selected in the same call face opposite
    /// directions. Ports that would double-cover a grid corner are pruned
    /// afterward. Appends a single stream-connectivity directive.
    ///
    /// Returns the net load/store port capacity created by this call.
    pub fn add_stream_ports(
        &mut self,
        sides: PortSides,
        latency: u32,
        is_input: bool,
        bidirectional: bool,
        merge_ios: bool,
    ) -> Result<StreamPortCounts, ArchError> {
        let Some((mut min_y, mut max_x)) = self.stored_bounds() else {
            return Ok(StreamPortCounts::default());
        };
        let mut counts = StreamPortCounts::default();
        // Reverse port-to-interior wiring only applies to merged ports.
        let wire_bidir = bidirectional && merge_ios;
        let direction = |flip: bool| -> (bool, bool) {
            if merge_ios {
                (true, true)
            } else {
                let input = if flip { !is_input } else { is_input };
                (input, !input)
            }
        };

        if sides.left {
            if self.occupied_in_col_stored(0) {
                self.shift_all(1, 0);
                max_x += 1;
            }
            let (input, output) = direction(false);
            for y in min_y..=0 {
                self.insert_port(
                    Position { x: 0, y },
                    Position { x: 1, y },
                    input,
                    output,
                    latency,
                    wire_bidir,
                    &mut counts,
                )?;
            }
        }

        if sides.right {
            let (input, output) = direction(sides.horizontal_pair());
            for y in min_y..=0 {
                self.insert_port(
                    Position { x: max_x + 1, y },
                    Position { x: max_x, y },
                    input,
                    output,
                    latency,
                    wire_bidir,
                    &mut counts,
                )?;
            }
        }

        if sides.top {
            if self.occupied_in_row_stored(0) {
                self.shift_all(0, 1);
                min_y -= 1;
            }
            let (input, output) = direction(false);
            for x in 0..=max_x {
                self.insert_port(
                    Position { x, y: 0 },
                    Position { x, y: -1 },
                    input,
                    output,
                    latency,
                    wire_bidir,
                    &mut counts,
                )?;
            }
        }

        if sides.bottom {
            let (input, output) = direction(sides.vertical_pair());
            for x in 0..=max_x {
                self.insert_port(
                    Position { x, y: min_y - 1 },
                    Position { x, y: min_y },
                    input,
                    output,
                    latency,
                    wire_bidir,
                    &mut counts,
                )?;
            }
        }

        self.prune_corner_ports(&mut counts);
        self.push_directive(Directive::StreamConn);
        Ok(counts)
    }

    #[allow(clippy::too_many_arguments)]
    fn insert_port(
        &mut self,
        at: Position,
        interior: Position,
        input: bool,
        output: bool,
        latency: u32,
        wire_bidir: bool,
        counts: &mut StreamPortCounts,
    ) -> Result<(), ArchError> {
        let port = self.add_element_stored(Element::Stream(StreamPort::new(input, output)), at)?;
        let neighbor = self.id_at_stored(interior).ok_or_else(|| {
            ArchError::UnknownElement(format!(
                "position (col {}, row {})",
                interior.col(),
                interior.row()
            ))
        })?;
        if input {
            self.insert_edge(port, neighbor, latency);
            if wire_bidir {
                self.insert_edge(neighbor, port, latency);
            }
        } else {
            self.insert_edge(neighbor, port, latency);
            if wire_bidir {
                self.insert_edge(port, neighbor, latency);
            }
        }
        if input {
            counts.loads += 1;
        }
        if output {
            counts.stores += 1;
        }
        Ok(())
    }

    /// Removes each bounding-box corner stream port whose two inward
    /// neighbors are also stream ports, decrementing the running counts by
    /// the removed port's capabilities.
    fn prune_corner_ports(&mut self, counts: &mut StreamPortCounts) {
        let Some((min_x, max_x, min_y, max_y)) = self.stored_bounding_box() else {
            return;
        };
        let corners = [
            // (corner, inward horizontal, inward vertical)
            (Position { x: min_x, y: max_y }, Position { x: min_x + 1, y: max_y }, Position { x: min_x, y: max_y - 1 }),
            (Position { x: max_x, y: max_y }, Position { x: max_x - 1, y: max_y }, Position { x: max_x, y: max_y - 1 }),
            (Position { x: min_x, y: min_y }, Position { x: min_x + 1, y: min_y }, Position { x: min_x, y: min_y + 1 }),
            (Position { x: max_x, y: min_y }, Position { x: max_x - 1, y: min_y }, Position { x: max_x, y: min_y + 1 }),
        ];
        for (corner, inward_h, inward_v) in corners {
            let is_stream = |pos: Position| {
                self.id_at_stored(pos)
                    .and_then(|id| self.element(id))
                    .is_some_and(Element::is_stream)
            };
            if !is_stream(corner) || !is_stream(inward_h) || !is_stream(inward_v) {
                continue;
            }
            let Some(id) = self.id_at_stored(corner) else {
                continue;
            };
            if let Some(Element::Stream(sp)) = self.remove_element_by_id(id) {
                if sp.is_input {
                    counts.loads = counts.loads.saturating_sub(1);
                }
                if sp.is_output {
                    counts.stores = counts.stores.saturating_sub(1);
                }
            }
        }
    }
}
