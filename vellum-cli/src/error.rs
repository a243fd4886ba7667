use thiserror::Error;

#[derive(Clone, PartialEq, Eq, Error, Debug)]
pub enum LookupError {
    #[error("no route named `{0}` in the configuration")]
    UnknownRoute(String),
    #[error("route `{0}` has no registered page")]
    UnknownPage(String),
}
