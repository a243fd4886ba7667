use std::borrow::Cow;

/// Values accepted by [`Element::attr`](crate::Element::attr).
///
/// `None` means the attribute is absent.
pub trait IntoAttr<'a>: Sized {
    fn into_attr(self) -> Option<Cow<'a, str>>;
}

impl<'a> IntoAttr<'a> for &'a str {
    fn into_attr(self) -> Option<Cow<'a, str>> {
        Some(Cow::Borrowed(self))
    }
}

impl<'a> IntoAttr<'a> for Cow<'a, str> {
    fn into_attr(self) -> Option<Cow<'a, str>> {
        Some(self)
    }
}

impl<'a> IntoAttr<'a> for String {
    fn into_attr(self) -> Option<Cow<'a, str>> {
        Some(Cow::Owned(self))
    }
}

impl<'a> IntoAttr<'a> for &'a String {
    fn into_attr(self) -> Option<Cow<'a, str>> {
        Some(Cow::Borrowed(self))
    }
}

impl<'a> IntoAttr<'a> for bool {
    fn into_attr(self) -> Option<Cow<'a, str>> {
        self.then_some(Cow::Borrowed(""))
    }
}

impl<'a, T> IntoAttr<'a> for Option<T>
where
    T: IntoAttr<'a>,
{
    fn into_attr(self) -> Option<Cow<'a, str>> {
        self.and_then(IntoAttr::into_attr)
    }
}
