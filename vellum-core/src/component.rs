use std::{cell::Cell, rc::Rc};

use crate::node::Node;

/// Something that can describe its UI as a [`Node`] tree.
///
/// A host may call [`view`](Self::view) any number of times; each call builds a
/// new tree.
pub trait Component {
    fn view(&self) -> Node;
}

impl<F> Component for F
where
    F: Fn() -> Node,
{
    fn view(&self) -> Node {
        self()
    }
}

/// Receives a notification every time a component renders.
pub trait RenderObserver {
    fn rendered(&self);
}

impl<F> RenderObserver for F
where
    F: Fn(),
{
    fn rendered(&self) {
        self()
    }
}

/// A shared flag that flips to `true` on the first render and stays there.
///
/// Clones observe the same flag.
#[derive(Clone, Default, Debug)]
pub struct RenderFlag(Rc<Cell<bool>>);

impl RenderFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> bool {
        self.0.get()
    }
}

impl RenderObserver for RenderFlag {
    fn rendered(&self) {
        self.0.set(true);
    }
}
