use hello_page::HelloView;
use vellum::WindowFlag;

fn main() {
    #[cfg(target_family = "wasm")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    }

    let view = HelloView::with_observer(WindowFlag::new("rendered"));
    if let Err(err) = vellum::mount("#root", view) {
        tracing::error!(%err, "failed to mount");
        panic!("failed to mount: {err}");
    }
}
