#![forbid(unsafe_code)]

//! Drill-down menu engine.
//!
//! [`MenuView`] presents one level of a [`MenuTree`] at a time through a
//! single-selection [`ListView`], the way mobile navigation menus page
//! through a hierarchy: activating a submenu item makes it the current
//! root, the back affordance pops to the parent, and an optional slide
//! transition animates the swap.
//!
//! # State machine
//!
//! The current root is a [`NodeId`] into the tree. Transitions:
//! - `enter(child)` when a submenu row is activated;
//! - `back()` pops to the parent, or defers to a registered root-back
//!   handler at the top, or reports `false` when neither applies.
//!
//! Leaf activation never changes the root: separator and section-header
//! rows restore the previous selection, disabled rows are inert, and
//! ordinary leaves report their item id and post their action to the
//! host's [`ActionQueue`] — actions run on the next loop turn, never
//! inside the click call stack.
//!
//! Transition completion arrives from the host via
//! [`MenuView::transition_finished`]; stale handles are ignored and the
//! completion effects (re-enabling the back affordance, dropping the
//! snapshot) are idempotent.

pub mod item;

use rowkit_core::animation::{AnimationHandle, AnimationScheduler, SlideDirection, TransitionSpec};
use rowkit_core::event::{EventOutcome, KeyEvent, PointerEvent};
use rowkit_core::shared::Shared;
use rowkit_core::task::ActionQueue;

use crate::listbox::{ListConfig, ListView, RowModel};

pub use item::{Action, CustomVisual, MenuItem, MenuNode, MenuTree, NodeId};

use std::rc::Rc;

// ---------------------------------------------------------------------------
// MenuConfig
// ---------------------------------------------------------------------------

/// Static configuration for a [`MenuView`].
#[derive(Debug, Clone)]
pub struct MenuConfig {
    /// Default row height (and header height while visible).
    pub row_height: u32,
    /// Hide the header entirely while the true root is current.
    pub hide_header_at_root: bool,
    /// Show the header even where `hide_header_at_root` would hide it.
    pub always_show_header: bool,
    /// Whether the back button renders the parent's title next to the arrow.
    pub back_button_shows_text: bool,
    /// Dismiss the whole menu after a leaf is activated.
    pub close_on_activate: bool,
    /// Animate root swaps when a scheduler is installed.
    pub animate_transitions: bool,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            row_height: 30,
            hide_header_at_root: false,
            always_show_header: false,
            back_button_shows_text: true,
            close_on_activate: false,
            animate_transitions: true,
        }
    }
}

impl MenuConfig {
    /// Set the row height.
    #[must_use]
    pub fn with_row_height(mut self, height: u32) -> Self {
        self.row_height = height.max(1);
        self
    }

    /// Hide the header at the true root.
    #[must_use]
    pub fn with_hide_header_at_root(mut self, hide: bool) -> Self {
        self.hide_header_at_root = hide;
        self
    }

    /// Force the header visible everywhere.
    #[must_use]
    pub fn with_always_show_header(mut self, always: bool) -> Self {
        self.always_show_header = always;
        self
    }

    /// Dismiss after leaf activation.
    #[must_use]
    pub fn with_close_on_activate(mut self, close: bool) -> Self {
        self.close_on_activate = close;
        self
    }

    /// Enable or disable slide transitions.
    #[must_use]
    pub fn with_animate_transitions(mut self, animate: bool) -> Self {
        self.animate_transitions = animate;
        self
    }
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// What the host should paint above the list: current level title and the
/// back affordance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderState {
    pub visible: bool,
    /// Header height in pixels; 0 while hidden.
    pub height: u32,
    /// Current root's display text.
    pub title: String,
    /// Parent's display text, shown beside the back arrow.
    pub back_label: Option<String>,
    /// Whether the back label text is rendered at all.
    pub back_shows_text: bool,
    pub back_visible: bool,
    pub back_enabled: bool,
}

// ---------------------------------------------------------------------------
// MenuModel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowCommand {
    Activate { row: usize, secondary: bool },
    NavigateBack,
}

/// List model mapping rows onto the current root's children.
///
/// Sink callbacks only record what happened; [`MenuView`] drains the
/// recorded command after list dispatch returns, so the menu never mutates
/// the tree or the list from inside a model callback.
pub struct MenuModel {
    tree: Option<MenuTree>,
    current: Option<NodeId>,
    pending: Option<RowCommand>,
}

impl MenuModel {
    fn new() -> Self {
        Self {
            tree: None,
            current: None,
            pending: None,
        }
    }

    fn current_children(&self) -> &[NodeId] {
        match (&self.tree, self.current) {
            (Some(tree), Some(current)) => tree.node(current).children(),
            _ => &[],
        }
    }
}

impl RowModel for MenuModel {
    type Visual = Rc<dyn CustomVisual>;

    fn row_count(&self) -> usize {
        debug_assert!(
            self.tree.is_none() || self.current.is_some(),
            "menu queried without a current root"
        );
        self.current_children().len()
    }

    fn row_height(&self, row: usize) -> Option<u32> {
        let child = *self.current_children().get(row)?;
        let tree = self.tree.as_ref()?;
        tree.node(child).custom().and_then(|c| c.preferred_height())
    }

    fn refresh_visual(
        &mut self,
        row: usize,
        _selected: bool,
        _existing: Option<Self::Visual>,
    ) -> Option<Self::Visual> {
        let child = *self.current_children().get(row)?;
        let tree = self.tree.as_ref()?;
        tree.node(child).custom().cloned()
    }

    fn display_name(&self, row: usize) -> Option<String> {
        let child = *self.current_children().get(row)?;
        let tree = self.tree.as_ref()?;
        Some(tree.node(child).text().to_string())
    }

    fn row_clicked(&mut self, row: usize, ev: &PointerEvent) {
        self.pending = Some(RowCommand::Activate {
            row,
            secondary: ev.is_secondary(),
        });
    }

    fn return_activated(&mut self, row: usize) {
        self.pending = Some(RowCommand::Activate {
            row,
            secondary: false,
        });
    }

    fn delete_requested(&mut self, _row: usize) {
        self.pending = Some(RowCommand::NavigateBack);
    }
}

// ---------------------------------------------------------------------------
// MenuView
// ---------------------------------------------------------------------------

/// The drill-down menu engine.
pub struct MenuView {
    config: MenuConfig,
    model: Shared<MenuModel>,
    list: ListView<MenuModel>,
    header: HeaderState,
    queue: ActionQueue,
    scheduler: Option<Box<dyn AnimationScheduler>>,
    active_transition: Option<AnimationHandle>,
    on_root_back: Option<Box<dyn FnMut()>>,
    on_secondary_click: Option<Box<dyn FnMut(&mut MenuTree, NodeId)>>,
    on_item_triggered: Option<Box<dyn FnMut(i32)>>,
    on_dismiss: Option<Box<dyn FnMut()>>,
    last_activated_row: Option<usize>,
    visible: bool,
    closing: bool,
}

impl MenuView {
    /// Create a menu posting its item actions to `queue`.
    #[must_use]
    pub fn new(config: MenuConfig, queue: ActionQueue) -> Self {
        let model = Shared::new(MenuModel::new());
        let list_config = ListConfig::default()
            .with_default_row_height(config.row_height)
            .with_select_on_pointer_down(false);
        let list = ListView::with_model(list_config, model.downgrade());
        let mut menu = Self {
            header: HeaderState {
                back_shows_text: config.back_button_shows_text,
                ..HeaderState::default()
            },
            config,
            model,
            list,
            queue,
            scheduler: None,
            active_transition: None,
            on_root_back: None,
            on_secondary_click: None,
            on_item_triggered: None,
            on_dismiss: None,
            last_activated_row: None,
            visible: true,
            closing: false,
        };
        menu.refresh_header();
        menu
    }

    /// Install the host's transition driver.
    pub fn set_scheduler(&mut self, scheduler: Box<dyn AnimationScheduler>) {
        self.scheduler = Some(scheduler);
    }

    /// Register the handler invoked by `back()` at the true root.
    pub fn set_on_root_back(&mut self, handler: impl FnMut() + 'static) {
        self.on_root_back = Some(Box::new(handler));
        self.refresh_header();
    }

    /// Register a secondary-click (context) handler. When present it fires
    /// instead of normal activation for secondary clicks on leaves.
    pub fn set_on_secondary_click(&mut self, handler: impl FnMut(&mut MenuTree, NodeId) + 'static) {
        self.on_secondary_click = Some(Box::new(handler));
    }

    /// Register the item-id listener fired on every leaf activation.
    pub fn set_on_item_triggered(&mut self, handler: impl FnMut(i32) + 'static) {
        self.on_item_triggered = Some(Box::new(handler));
    }

    /// Register the dismissal callback used by close-on-activate and
    /// [`MenuView::request_close`].
    pub fn set_on_dismiss(&mut self, handler: impl FnMut() + 'static) {
        self.on_dismiss = Some(Box::new(handler));
    }

    /// Whether the menu is on screen; hidden menus swap roots without
    /// animating.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    // -- tree & navigation -------------------------------------------------

    /// Install a new menu tree and make its root current.
    pub fn set_menu(&mut self, root: MenuItem) {
        let tree = MenuTree::build(root);
        let root_id = tree.root();
        self.model.borrow_mut().tree = Some(tree);
        self.closing = false;
        self.set_current_root(root_id, SlideDirection::FromRight, false);
    }

    /// The current root, if a tree is installed.
    #[must_use]
    pub fn current_root(&self) -> Option<NodeId> {
        self.model.borrow().current
    }

    /// True when the current root has a parent to pop to.
    #[must_use]
    pub fn current_root_has_parent(&self) -> bool {
        let model = self.model.borrow();
        match (&model.tree, model.current) {
            (Some(tree), Some(current)) => tree.node(current).parent().is_some(),
            _ => false,
        }
    }

    /// Rows shown for the current root.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.model.borrow().current_children().len()
    }

    /// Inspect the tree.
    pub fn with_tree<R>(&self, f: impl FnOnce(&MenuTree) -> R) -> Option<R> {
        self.model.borrow().tree.as_ref().map(f)
    }

    /// Mutate the tree (tick/enable updates), then refresh the list.
    pub fn with_tree_mut<R>(&mut self, f: impl FnOnce(&mut MenuTree) -> R) -> Option<R> {
        let result = self.model.borrow_mut().tree.as_mut().map(f);
        if result.is_some() {
            self.list.update_content();
        }
        result
    }

    /// Navigate into `node`, animating like a drill-down.
    pub fn navigate_to(&mut self, node: NodeId) {
        self.set_current_root(node, SlideDirection::FromRight, true);
    }

    /// Pop to the parent, or invoke the root-back handler at the top.
    /// Returns false when already at an unhandled root.
    pub fn back_to_parent(&mut self) -> bool {
        let parent = {
            let model = self.model.borrow();
            match (&model.tree, model.current) {
                (Some(tree), Some(current)) => tree.node(current).parent(),
                _ => None,
            }
        };
        if let Some(parent) = parent {
            self.set_current_root(parent, SlideDirection::FromLeft, true);
            true
        } else if let Some(mut handler) = self.on_root_back.take() {
            handler();
            self.on_root_back = Some(handler);
            true
        } else {
            false
        }
    }

    /// Begin the slide-out dismissal and notify the host.
    pub fn request_close(&mut self) {
        if self.closing {
            return;
        }
        self.closing = true;
        if self.visible
            && self.config.animate_transitions
            && let Some(scheduler) = self.scheduler.as_mut()
        {
            let spec = TransitionSpec::slide(SlideDirection::OutToLeft).with_snapshot(false);
            self.active_transition = Some(scheduler.begin(spec));
        }
        if let Some(mut handler) = self.on_dismiss.take() {
            handler();
            self.on_dismiss = Some(handler);
        }
    }

    /// Host callback when a transition completes. Stale handles are
    /// ignored; the effects are idempotent either way.
    pub fn transition_finished(&mut self, handle: AnimationHandle) {
        match self.active_transition {
            Some(active) if active == handle => {
                self.active_transition = None;
            }
            Some(_) => return, // a newer transition is still in flight
            None => {}
        }
        let nested = self.current_root_has_parent();
        let show_back = self.on_root_back.is_some() || nested;
        self.header.back_enabled = show_back;
        self.header.back_visible = show_back;
    }

    /// True while a transition snapshot should still be composited.
    #[must_use]
    pub fn transition_in_flight(&self) -> bool {
        self.active_transition.is_some()
    }

    fn set_current_root(&mut self, new_root: NodeId, direction: SlideDirection, snapshot: bool) {
        self.last_activated_row = None;

        let animate = self.visible
            && self.config.animate_transitions
            && self.scheduler.is_some();
        if animate {
            // Back affordance stays hidden until the slide completes.
            self.header.back_visible = false;
            self.header.back_enabled = false;
            let spec = TransitionSpec::slide(direction).with_snapshot(snapshot);
            if let Some(scheduler) = self.scheduler.as_mut() {
                self.active_transition = Some(scheduler.begin(spec));
            }
        } else {
            self.active_transition = None;
        }

        // Selection refers to the old child list; clear it before the swap.
        self.list.deselect_all();
        self.model.borrow_mut().current = Some(new_root);

        let labels = {
            let model = self.model.borrow();
            model.tree.as_ref().map(|tree| {
                let node = tree.node(new_root);
                let back = node.parent().map(|p| tree.node(p).text().to_string());
                (node.text().to_string(), back)
            })
        };
        debug_assert!(labels.is_some(), "root set without a tree");
        if let Some((title, back_label)) = labels {
            self.header.title = title;
            self.header.back_label = back_label;
        }

        if !animate {
            let show_back = self.on_root_back.is_some() || self.current_root_has_parent();
            self.header.back_enabled = show_back;
            self.header.back_visible = show_back;
        }
        self.refresh_header();
        self.list.update_content();
    }

    fn refresh_header(&mut self) {
        let at_root = !self.current_root_has_parent();
        let visible = self.config.always_show_header
            || !(at_root && self.config.hide_header_at_root);
        self.header.visible = visible;
        self.header.height = if visible { self.config.row_height } else { 0 };
        self.header.back_shows_text = self.config.back_button_shows_text;
    }

    // -- configuration passthrough -----------------------------------------

    /// Change the row height (and the header height with it).
    pub fn set_row_height(&mut self, height: u32) {
        self.config.row_height = height.max(1);
        self.list.set_default_row_height(height);
        self.refresh_header();
    }

    /// Hide or show the header at the true root.
    pub fn set_hide_header_at_root(&mut self, hide: bool) {
        self.config.hide_header_at_root = hide;
        self.refresh_header();
    }

    /// Force the header visible everywhere.
    pub fn set_always_show_header(&mut self, always: bool) {
        self.config.always_show_header = always;
        self.refresh_header();
    }

    /// Toggle the back-button label text.
    pub fn set_back_button_shows_text(&mut self, shows: bool) {
        self.config.back_button_shows_text = shows;
        self.refresh_header();
    }

    /// Dismiss the menu after leaf activation.
    pub fn set_close_on_activate(&mut self, close: bool) {
        self.config.close_on_activate = close;
    }

    // -- input -------------------------------------------------------------

    /// Route a pointer event (list-area coordinates) and run any
    /// navigation or activation it resolved to.
    pub fn handle_pointer(&mut self, ev: PointerEvent) -> EventOutcome {
        let outcome = self.list.handle_pointer(ev);
        self.process_pending();
        outcome
    }

    /// Route a key event and run any navigation or activation it resolved
    /// to.
    pub fn handle_key(&mut self, ev: KeyEvent) -> EventOutcome {
        let outcome = self.list.handle_key(ev);
        self.process_pending();
        outcome
    }

    /// The backing list, for scroll state and paint bindings.
    #[must_use]
    pub fn list(&self) -> &ListView<MenuModel> {
        &self.list
    }

    /// Mutable access to the backing list (viewport sizing, scrolling).
    pub fn list_mut(&mut self) -> &mut ListView<MenuModel> {
        &mut self.list
    }

    /// Header contents the host paints.
    #[must_use]
    pub fn header(&self) -> &HeaderState {
        &self.header
    }

    fn process_pending(&mut self) {
        let command = self.model.borrow_mut().pending.take();
        match command {
            Some(RowCommand::Activate { row, secondary }) => self.activate_row(row, secondary),
            Some(RowCommand::NavigateBack) => {
                self.back_to_parent();
            }
            None => {}
        }
    }

    fn activate_row(&mut self, row: usize, secondary: bool) {
        struct Resolved {
            node: NodeId,
            submenu: bool,
            inert: bool,
            item_id: i32,
            action: Option<Action>,
        }
        let resolved = {
            let model = self.model.borrow();
            let (Some(tree), Some(current)) = (&model.tree, model.current) else {
                return;
            };
            let Some(node) = tree.child(current, row) else {
                // Out-of-range activation is a caller bug; stay inert.
                return;
            };
            let n = tree.node(node);
            Resolved {
                node,
                submenu: n.is_submenu(),
                inert: n.is_separator() || n.is_section_header() || !n.is_enabled(),
                item_id: n.id(),
                action: n.action().cloned(),
            }
        };

        if resolved.submenu {
            // Entering a submenu runs its action as a navigation side
            // effect, still deferred.
            if let Some(action) = resolved.action {
                self.queue.post(move || action());
            }
            self.set_current_root(resolved.node, SlideDirection::FromRight, true);
            return;
        }

        if resolved.inert {
            // Put the selection back where it was.
            match self.last_activated_row {
                Some(prev) => self.list.select_row(prev),
                None => self.list.deselect_all(),
            }
            return;
        }

        self.last_activated_row = Some(row);

        if secondary && self.on_secondary_click.is_some() {
            if let Some(mut handler) = self.on_secondary_click.take() {
                if let Some(tree) = self.model.borrow_mut().tree.as_mut() {
                    handler(tree, resolved.node);
                }
                self.on_secondary_click = Some(handler);
                self.list.update_content();
            }
            return;
        }

        if let Some(handler) = self.on_item_triggered.as_mut() {
            handler(resolved.item_id);
        }
        if let Some(action) = resolved.action {
            self.queue.post(move || action());
        }
        if self.config.close_on_activate {
            self.request_close();
        }
    }
}

impl std::fmt::Debug for MenuView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuView")
            .field("current_root", &self.current_root())
            .field("rows", &self.row_count())
            .field("header", &self.header)
            .field("closing", &self.closing)
            .finish()
    }
}
