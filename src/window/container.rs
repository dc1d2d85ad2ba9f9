use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::surface::SurfaceHandle;

/// Identifier of a child node within its container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

/// A child of a [`Container`]: a drawing surface plus the class it was tagged with.
#[derive(Clone)]
pub struct Node {
    pub id: NodeId,
    pub class: &'static str,
    pub surface: SurfaceHandle,
}

struct ContainerState {
    name: String,
    next_id: u64,
    children: Vec<Node>,
}

/// Display container that artworks attach their surfaces to.
///
/// Surfaces hold a [`WeakContainer`] back-reference so that removing themselves never keeps the
/// container alive.
#[derive(Clone)]
pub struct Container {
    state: Rc<RefCell<ContainerState>>,
}

#[derive(Clone)]
pub struct WeakContainer {
    state: Weak<RefCell<ContainerState>>,
}

impl WeakContainer {
    pub fn upgrade(&self) -> Option<Container> {
        self.state.upgrade().map(|state| Container { state })
    }
}

impl Container {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            state: Rc::new(RefCell::new(ContainerState {
                name: name.into(),
                next_id: 0,
                children: Vec::new(),
            })),
        }
    }

    pub fn name(&self) -> String {
        self.state.borrow().name.clone()
    }

    pub fn downgrade(&self) -> WeakContainer {
        WeakContainer {
            state: Rc::downgrade(&self.state),
        }
    }

    pub fn child_count(&self) -> usize {
        self.state.borrow().children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.child_count() == 0
    }

    /// Children in insertion order.
    pub fn children(&self) -> Vec<Node> {
        self.state.borrow().children.clone()
    }

    /// Most recently attached surface, if any.
    pub fn last_surface(&self) -> Option<SurfaceHandle> {
        self.state
            .borrow()
            .children
            .last()
            .map(|n| n.surface.clone())
    }

    pub(crate) fn append(&self, class: &'static str, surface: SurfaceHandle) -> NodeId {
        let mut st = self.state.borrow_mut();
        st.next_id += 1;
        let id = NodeId(st.next_id);
        st.children.push(Node { id, class, surface });
        id
    }

    /// Remove a child by id. Returns `false` when no such child is attached.
    pub fn remove(&self, id: NodeId) -> bool {
        // The removed node is dropped after the borrow ends.
        let removed = {
            let mut st = self.state.borrow_mut();
            st.children
                .iter()
                .position(|n| n.id == id)
                .map(|pos| st.children.remove(pos))
        };
        removed.is_some()
    }

    /// Drop every child. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let removed = std::mem::take(&mut self.state.borrow_mut().children);
        removed.len()
    }
}
