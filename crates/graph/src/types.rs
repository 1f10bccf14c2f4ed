use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Default node radius in layout units.
pub const DEFAULT_NODE_RADIUS: f64 = 12.0;

/// Permanent internal node identity.
///
/// Allocated monotonically from 1 and never reused within a graph's
/// lifetime, independent of the floating display name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Per-node layout record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeLayout {
    pub position: Point,
    pub radius: f64,
    pub visible: bool,
    pub highlighted: bool,
    pub marked_first: bool,
    pub marked_second: bool,
}

impl Default for NodeLayout {
    fn default() -> Self {
        Self {
            position: Point::default(),
            radius: DEFAULT_NODE_RADIUS,
            visible: true,
            highlighted: false,
            marked_first: false,
            marked_second: false,
        }
    }
}

/// Per-edge flag set; each direction of a reciprocal pair keeps its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeFlags {
    pub visible: bool,
    pub highlighted: bool,
    pub marked_first: bool,
    pub marked_second: bool,
}

impl Default for EdgeFlags {
    fn default() -> Self {
        Self {
            visible: true,
            highlighted: false,
            marked_first: false,
            marked_second: false,
        }
    }
}

/// State owned jointly by a reciprocal edge pair.
///
/// Both directions of a two-way connection render against the same record;
/// it lives as long as either edge does.
#[derive(Debug, Clone, Default)]
pub struct EdgeShared {
    /// True while both directions of the connection exist.
    pub two_way: bool,
}

/// Shared handle to a pair's joint state.
pub type SharedBlock = Rc<RefCell<EdgeShared>>;

/// Which of the two mark flags an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkKind {
    First,
    Second,
}

/// A graph node: permanent ID, floating display name, layout.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) display_name: String,
    pub(crate) selected: bool,
    pub(crate) layout: NodeLayout,
}

impl Node {
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// User-visible name, typically a decimal number starting at 1.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[must_use]
    pub fn selected(&self) -> bool {
        self.selected
    }

    #[must_use]
    pub fn layout(&self) -> &NodeLayout {
        &self.layout
    }
}

/// A directed edge between two nodes of the same graph.
///
/// When both `(u, v)` and `(v, u)` exist they reference one [`SharedBlock`]
/// and each other through `way_back`; deleting one clears the survivor's
/// `way_back` but leaves the block alive for it.
#[derive(Debug)]
pub struct Edge {
    pub(crate) from: NodeId,
    pub(crate) to: NodeId,
    pub(crate) way_back: Option<(NodeId, NodeId)>,
    pub(crate) shared: SharedBlock,
    pub(crate) flags: EdgeFlags,
    pub(crate) path: Vec<Point>,
}

impl Edge {
    #[must_use]
    pub fn from(&self) -> NodeId {
        self.from
    }

    #[must_use]
    pub fn to(&self) -> NodeId {
        self.to
    }

    /// Key of the reciprocal edge, when it exists.
    #[must_use]
    pub fn way_back(&self) -> Option<(NodeId, NodeId)> {
        self.way_back
    }

    #[must_use]
    pub fn shared(&self) -> &SharedBlock {
        &self.shared
    }

    #[must_use]
    pub fn flags(&self) -> EdgeFlags {
        self.flags
    }

    /// Intermediate layout points for bent rendering; empty means simple.
    #[must_use]
    pub fn path(&self) -> &[Point] {
        &self.path
    }
}

/// Observer record for a graph; every slot optional.
pub struct GraphObserver {
    /// Fired after any structural mutation, coalesced across blocks.
    pub changed: Option<Box<dyn FnMut()>>,
    /// Fired after layout state changed, coalesced across blocks.
    pub layout_changed: Option<Box<dyn FnMut()>>,
    /// Fired for each node just before it leaves the graph.
    pub on_delete_node: Option<Box<dyn FnMut(NodeId)>>,
    /// Fired for each edge just before it leaves the graph.
    pub on_delete_edge: Option<Box<dyn FnMut(NodeId, NodeId)>>,
    /// Fired once when the graph itself is destroyed.
    pub on_delete: Option<Box<dyn FnMut()>>,
}

impl GraphObserver {
    /// Observer with only the `changed` slot filled.
    pub fn changed(f: impl FnMut() + 'static) -> Self {
        Self {
            changed: Some(Box::new(f)),
            ..Self::default()
        }
    }

    /// Observer with only the `layout_changed` slot filled.
    pub fn layout_changed(f: impl FnMut() + 'static) -> Self {
        Self {
            layout_changed: Some(Box::new(f)),
            ..Self::default()
        }
    }
}

impl Default for GraphObserver {
    fn default() -> Self {
        Self {
            changed: None,
            layout_changed: None,
            on_delete_node: None,
            on_delete_edge: None,
            on_delete: None,
        }
    }
}
