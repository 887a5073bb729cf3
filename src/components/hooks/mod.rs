pub(crate) mod use_random;
pub(crate) mod use_scroll_end;
