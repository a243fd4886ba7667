use vellum::{html::*, Component, Node, RenderFlag, RenderObserver};

/// A static greeting: heading, paragraph and button inside `<main>`.
pub struct HelloView<O = RenderFlag> {
    observer: O,
}

impl HelloView {
    pub fn new() -> Self {
        Self::with_observer(RenderFlag::new())
    }

    /// Handle to the flag set by [`Component::view`].
    pub fn flag(&self) -> RenderFlag {
        self.observer.clone()
    }
}

impl Default for HelloView {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: RenderObserver> HelloView<O> {
    pub fn with_observer(observer: O) -> Self {
        Self { observer }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }
}

impl<O: RenderObserver> Component for HelloView<O> {
    fn view(&self) -> Node {
        self.observer.rendered();

        main()
            .child(h1().attr("class", "title").child("Hello World"))
            .child(p().child("this is rendered by Mithril"))
            .child(button().child("button"))
            .into()
    }
}
