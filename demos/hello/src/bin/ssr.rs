#[cfg(not(target_family = "wasm"))]
fn main() -> std::process::ExitCode {
    use hello_page::HelloView;
    use vellum_cli::Registry;

    vellum_cli::launch(Registry::new().page("hello", HelloView::new()))
}

#[cfg(target_family = "wasm")]
fn main() {}
