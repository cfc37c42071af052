#![forbid(unsafe_code)]

//! Menu item tree.
//!
//! [`MenuItem`] is the owned builder shape: a nested value tree assembled
//! with chaining setters. [`MenuTree`] flattens it into arena storage where
//! every node is addressed by a stable [`NodeId`] and the parent link is an
//! index, not a pointer — rebuilding a subtree can never leave a dangling
//! back-reference.
//!
//! # Invariants
//!
//! 1. `NodeId`s are dense indices into the arena and stay valid for the
//!    tree's lifetime.
//! 2. A node's parent id is always smaller than its own (parents are
//!    interned first), so traversal towards the root terminates.
//! 3. A node with a child list is a submenu: activating it navigates, it is
//!    never directly triggerable.

use std::rc::Rc;

/// Action invoked when a leaf item is triggered. Dispatch is deferred to
/// the host loop, hence the shared ownership.
pub type Action = Rc<dyn Fn()>;

/// Host-supplied visual payload for an item rendered by a custom component.
pub trait CustomVisual {
    /// Ideal row height for this visual, if it wants to override the
    /// menu's default row height.
    fn preferred_height(&self) -> Option<u32> {
        None
    }
}

/// A menu item under construction.
///
/// Build a tree by nesting items, then hand the root to
/// [`MenuTree::build`].
#[derive(Clone, Default)]
pub struct MenuItem {
    /// The item's display text.
    pub text: String,
    /// Stable id reported when the item is triggered. Items created with
    /// [`MenuItem::new`] default to `-1`, suitable for purely
    /// action-driven items.
    pub id: i32,
    /// Invoked (deferred) when the item is triggered.
    pub action: Option<Action>,
    /// Child list; `Some` makes this a submenu, even when empty.
    pub children: Option<Vec<MenuItem>>,
    /// Shortcut hint shown at the trailing edge. Display only.
    pub shortcut_text: Option<String>,
    pub enabled: bool,
    pub ticked: bool,
    pub separator: bool,
    pub section_header: bool,
    /// Custom visual payload, recycled through the row pool.
    pub custom: Option<Rc<dyn CustomVisual>>,
}

impl MenuItem {
    /// Create an item with the given text and id `-1`.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            id: -1,
            enabled: true,
            ..Self::default()
        }
    }

    /// A separator line.
    #[must_use]
    pub fn separator() -> Self {
        Self {
            separator: true,
            ..Self::default()
        }
    }

    /// A section header with the given text.
    #[must_use]
    pub fn section(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            section_header: true,
            ..Self::default()
        }
    }

    /// Set the item id.
    #[must_use]
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }

    /// Set the action callback.
    #[must_use]
    pub fn with_action(mut self, action: impl Fn() + 'static) -> Self {
        self.action = Some(Rc::new(action));
        self
    }

    /// Attach a child list, making this item a submenu.
    #[must_use]
    pub fn with_children(mut self, children: Vec<MenuItem>) -> Self {
        self.children = Some(children);
        self
    }

    /// Set the enabled flag.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the ticked flag.
    #[must_use]
    pub fn with_ticked(mut self, ticked: bool) -> Self {
        self.ticked = ticked;
        self
    }

    /// Set the shortcut hint text.
    #[must_use]
    pub fn with_shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut_text = Some(shortcut.into());
        self
    }

    /// Attach a custom visual payload.
    #[must_use]
    pub fn with_custom(mut self, custom: Rc<dyn CustomVisual>) -> Self {
        self.custom = Some(custom);
        self
    }
}

impl std::fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuItem")
            .field("text", &self.text)
            .field("id", &self.id)
            .field("children", &self.children.as_ref().map(Vec::len))
            .field("separator", &self.separator)
            .field("section_header", &self.section_header)
            .finish()
    }
}

/// Stable handle to a node in a [`MenuTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Raw arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One interned menu node.
pub struct MenuNode {
    text: String,
    id: i32,
    action: Option<Action>,
    parent: Option<NodeId>,
    children: Option<Vec<NodeId>>,
    shortcut_text: Option<String>,
    enabled: bool,
    ticked: bool,
    separator: bool,
    section_header: bool,
    custom: Option<Rc<dyn CustomVisual>>,
}

impl MenuNode {
    /// Display text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Item id.
    #[must_use]
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Action callback, if any.
    #[must_use]
    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    /// Parent handle; `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child handles; empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// True if this node is a submenu (has a child list, even if empty).
    #[must_use]
    pub fn is_submenu(&self) -> bool {
        self.children.is_some()
    }

    /// Shortcut hint text.
    #[must_use]
    pub fn shortcut_text(&self) -> Option<&str> {
        self.shortcut_text.as_deref()
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn is_ticked(&self) -> bool {
        self.ticked
    }

    #[must_use]
    pub fn is_separator(&self) -> bool {
        self.separator
    }

    #[must_use]
    pub fn is_section_header(&self) -> bool {
        self.section_header
    }

    /// Custom visual payload.
    #[must_use]
    pub fn custom(&self) -> Option<&Rc<dyn CustomVisual>> {
        self.custom.as_ref()
    }

    /// Update the ticked flag (menus commonly retick on state changes).
    pub fn set_ticked(&mut self, ticked: bool) {
        self.ticked = ticked;
    }

    /// Update the enabled flag.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Update the display text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl std::fmt::Debug for MenuNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuNode")
            .field("text", &self.text)
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("children", &self.children.as_ref().map(Vec::len))
            .finish()
    }
}

/// Arena-backed menu tree. Owns every node for its lifetime; navigation
/// state elsewhere refers into it by [`NodeId`].
#[derive(Debug, Default)]
pub struct MenuTree {
    nodes: Vec<MenuNode>,
}

impl MenuTree {
    /// Intern a builder tree. The returned tree's root is
    /// [`MenuTree::root`].
    #[must_use]
    pub fn build(root: MenuItem) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.intern(root, None);
        tree
    }

    fn intern(&mut self, item: MenuItem, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(MenuNode {
            text: item.text,
            id: item.id,
            action: item.action,
            parent,
            children: None,
            shortcut_text: item.shortcut_text,
            enabled: item.enabled,
            ticked: item.ticked,
            separator: item.separator,
            section_header: item.section_header,
            custom: item.custom,
        });
        if let Some(children) = item.children {
            // An empty child list still marks a submenu.
            let child_ids: Vec<NodeId> = children
                .into_iter()
                .map(|child| self.intern(child, Some(id)))
                .collect();
            self.nodes[id.index()].children = Some(child_ids);
        }
        id
    }

    /// The root node handle.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of interned nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True for a tree with no nodes (only possible via `Default`).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrow a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &MenuNode {
        &self.nodes[id.index()]
    }

    /// Mutably borrow a node.
    pub fn node_mut(&mut self, id: NodeId) -> &mut MenuNode {
        &mut self.nodes[id.index()]
    }

    /// The `row`th child of `id`, if present.
    #[must_use]
    pub fn child(&self, id: NodeId, row: usize) -> Option<NodeId> {
        self.node(id).children().get(row).copied()
    }

    /// Depth-first search for the first node with item id `item_id`.
    #[must_use]
    pub fn find_by_item_id(&self, item_id: i32) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.id == item_id)
            .map(|i| NodeId(i as u32))
    }
}
