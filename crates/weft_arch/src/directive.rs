//! Structured topology directives.
//!
//! The directive log records the bulk interconnect patterns applied to an
//! aggregate so that the downstream mapper can reconstruct them. Entries
//! are structured records with native set-membership deduplication; they
//! are rendered to their literal text forms only at export time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A bulk interconnect direction applied uniformly across the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternKind {
    /// Every element drives its right neighbor.
    LeftToRight,
    /// Every element drives its left neighbor.
    RightToLeft,
    /// Every element drives the neighbor one row down.
    UpToDown,
    /// Every element drives the neighbor one row up.
    DownToUp,
    /// North-west diagonal.
    DiagonalNw,
    /// South-west diagonal.
    DiagonalSw,
    /// North-east diagonal.
    DiagonalNe,
    /// South-east diagonal.
    DiagonalSe,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PatternKind::LeftToRight => "LEFT_TO_RIGHT",
            PatternKind::RightToLeft => "RIGHT_TO_LEFT",
            PatternKind::UpToDown => "UP_TO_DOWN",
            PatternKind::DownToUp => "DOWN_TO_UP",
            PatternKind::DiagonalNw => "DIAGONAL_NW",
            PatternKind::DiagonalSw => "DIAGONAL_SW",
            PatternKind::DiagonalNe => "DIAGONAL_NE",
            PatternKind::DiagonalSe => "DIAGONAL_SE",
        };
        write!(f, "{name}")
    }
}

/// A wraparound direction marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WrapSide {
    /// Rightmost column wraps to the leftmost.
    LeftRight,
    /// Leftmost column wraps to the rightmost.
    RightLeft,
    /// Bottom row wraps to the top.
    UpDown,
    /// Top row wraps to the bottom.
    DownUp,
}

impl WrapSide {
    /// All four wraparound directions.
    pub const ALL: [WrapSide; 4] = [
        WrapSide::LeftRight,
        WrapSide::RightLeft,
        WrapSide::UpDown,
        WrapSide::DownUp,
    ];
}

impl fmt::Display for WrapSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WrapSide::LeftRight => "LR",
            WrapSide::RightLeft => "RL",
            WrapSide::UpDown => "UD",
            WrapSide::DownUp => "DU",
        };
        write!(f, "{name}")
    }
}

/// One entry of the aggregate's directive log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Directive {
    /// An explicit connection between absolute grid coordinates.
    ///
    /// A latency of `-1` is the removal sentinel: the connection was
    /// removed after the bulk patterns were applied.
    Conn {
        /// Source row (absolute).
        from_row: u32,
        /// Source column.
        from_col: i32,
        /// Target row (absolute).
        to_row: u32,
        /// Target column.
        to_col: i32,
        /// Latency in cycles, or `-1` for "connection removed".
        latency: i32,
    },
    /// A bulk interconnect pattern at a given latency.
    Pattern {
        /// The pattern direction.
        kind: PatternKind,
        /// Latency in cycles.
        latency: u32,
    },
    /// A wraparound marker for one direction at a given latency.
    WrapAround {
        /// The wraparound direction.
        side: WrapSide,
        /// Latency in cycles.
        latency: u32,
    },
    /// Stream connectivity exists somewhere in the fabric.
    StreamConn,
}

impl Directive {
    /// Returns `true` if `other` is a duplicate of this directive under the
    /// (directive family, latency) deduplication rule.
    ///
    /// Explicit `Conn` entries are never considered duplicates: each one
    /// records a distinct caller action.
    pub fn duplicates(&self, other: &Directive) -> bool {
        match (self, other) {
            (
                Directive::Pattern { kind: a, latency: la },
                Directive::Pattern { kind: b, latency: lb },
            ) => a == b && la == lb,
            (
                Directive::WrapAround { side: a, latency: la },
                Directive::WrapAround { side: b, latency: lb },
            ) => a == b && la == lb,
            (Directive::StreamConn, Directive::StreamConn) => true,
            _ => false,
        }
    }

    /// Renders this directive in the literal architecture-artifact form.
    pub fn render(&self) -> String {
        match self {
            Directive::Conn {
                from_row,
                from_col,
                to_row,
                to_col,
                latency,
            } => format!("CONN {from_row} {from_col} {to_row} {to_col} {latency}"),
            Directive::Pattern { kind, latency } => format!("{kind} {latency}"),
            Directive::WrapAround { side, latency } => {
                format!("WRAP_AROUND_{side} {latency}")
            }
            Directive::StreamConn => "STREAM_CONN 0".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_pattern() {
        let d = Directive::Pattern {
            kind: PatternKind::LeftToRight,
            latency: 1,
        };
        assert_eq!(d.render(), "LEFT_TO_RIGHT 1");
    }

    #[test]
    fn render_conn_and_removal_sentinel() {
        let d = Directive::Conn {
            from_row: 1,
            from_col: 1,
            to_row: 2,
            to_col: 2,
            latency: 1,
        };
        assert_eq!(d.render(), "CONN 1 1 2 2 1");
        let removed = Directive::Conn {
            from_row: 1,
            from_col: 1,
            to_row: 2,
            to_col: 2,
            latency: -1,
        };
        assert_eq!(removed.render(), "CONN 1 1 2 2 -1");
    }

    #[test]
    fn render_wraparound() {
        let d = Directive::WrapAround {
            side: WrapSide::UpDown,
            latency: 0,
        };
        assert_eq!(d.render(), "WRAP_AROUND_UD 0");
    }

    #[test]
    fn render_stream_conn() {
        assert_eq!(Directive::StreamConn.render(), "STREAM_CONN 0");
    }

    #[test]
    fn pattern_dedup_keyed_by_kind_and_latency() {
        let a = Directive::Pattern {
            kind: PatternKind::UpToDown,
            latency: 1,
        };
        let b = Directive::Pattern {
            kind: PatternKind::UpToDown,
            latency: 1,
        };
        let c = Directive::Pattern {
            kind: PatternKind::UpToDown,
            latency: 2,
        };
        let d = Directive::Pattern {
            kind: PatternKind::DownToUp,
            latency: 1,
        };
        assert!(a.duplicates(&b));
        assert!(!a.duplicates(&c));
        assert!(!a.duplicates(&d));
    }

    #[test]
    fn conn_never_deduplicates() {
        let a = Directive::Conn {
            from_row: 0,
            from_col: 0,
            to_row: 0,
            to_col: 1,
            latency: 1,
        };
        assert!(!a.duplicates(&a.clone()));
    }
}
