pub(crate) mod view;

use crate::config::TABLE_DIM_LIMIT;
use crate::i18n::Locale;

pub(crate) use view::HtmlEditor;

/// Tags offered on the toolbar, in display order.
pub(crate) const TOOLBAR_TAGS: &[&str] = &[
    "b", "i", "u", "h1", "h2", "h3", "p", "ul", "ol", "li", "blockquote", "code",
];

/// Selection in byte offsets into the buffer. `start <= end` always holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn cursor(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    #[cfg(test)]
    pub fn is_cursor(self) -> bool {
        self.start == self.end
    }

    /// Clamp into `text` and snap both ends down to char boundaries.
    pub fn clamp_to(self, text: &str) -> Self {
        Self::new(floor_char_boundary(text, self.start), floor_char_boundary(text, self.end))
    }

    /// Build from the UTF-16 offsets a `<textarea>` reports.
    pub fn from_utf16(text: &str, start: u32, end: u32) -> Self {
        Self::new(utf16_to_byte_idx(text, start), utf16_to_byte_idx(text, end))
    }

    pub fn to_utf16(self, text: &str) -> (u32, u32) {
        (byte_idx_to_utf16(text, self.start), byte_idx_to_utf16(text, self.end))
    }
}

fn floor_char_boundary(s: &str, idx: usize) -> usize {
    let mut i = idx.min(s.len());
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

pub(crate) fn utf16_to_byte_idx(s: &str, pos_utf16: u32) -> usize {
    if pos_utf16 == 0 {
        return 0;
    }
    let mut acc: u32 = 0;
    for (i, ch) in s.char_indices() {
        let w = ch.len_utf16() as u32;
        if acc + w > pos_utf16 {
            return i;
        }
        acc += w;
        if acc == pos_utf16 {
            return i + ch.len_utf8();
        }
    }
    s.len()
}

pub(crate) fn byte_idx_to_utf16(s: &str, byte_idx: usize) -> u32 {
    s[..floor_char_boundary(s, byte_idx)].encode_utf16().count() as u32
}

/// The editor's HTML source plus the active selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct EditorBuffer {
    pub text: String,
    pub selection: Selection,
}

impl EditorBuffer {
    pub fn new(text: impl Into<String>, selection: Selection) -> Self {
        let text = text.into();
        let selection = selection.clamp_to(&text);
        Self { text, selection }
    }

    fn splice(&mut self, insert: &str) -> usize {
        let Selection { start, end } = self.selection;
        self.text.replace_range(start..end, insert);
        start
    }

    /// Replace the selection with `<tag>selection</tag>`.
    ///
    /// The wrapped content stays selected; an empty selection leaves the
    /// cursor between the opening and closing tags. The tag name is not validated.
    pub fn wrap_tag(&mut self, tag: &str) {
        let Selection { start, end } = self.selection;
        let selected = self.text[start..end].to_string();
        self.splice(&format!("<{tag}>{selected}</{tag}>"));

        let shift = tag.len() + 2;
        self.selection = Selection::new(start + shift, end + shift);
    }

    /// Replace the selection with `snippet` and put the cursor after it.
    pub fn insert(&mut self, snippet: &str) {
        let start = self.splice(snippet);
        self.selection = Selection::cursor(start + snippet.len());
    }

    pub fn insert_table(&mut self, size: TableSize, locale: Locale) {
        let html = build_table_html(size.rows, size.cols, |r, c| locale.table_cell(r, c));
        self.insert(&html);
    }
}

/// Table dimensions read from the two number inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TableSize {
    pub rows: u32,
    pub cols: u32,
}

impl TableSize {
    /// Parse raw input values. Junk or non-positive input yields 0; values above the
    /// limits are clamped, and the limits themselves never exceed `TABLE_DIM_LIMIT`.
    /// Fractions round up (a count of `2.5` produces 3 rows).
    pub fn parse(rows: &str, cols: &str, max_rows: u32, max_cols: u32) -> Self {
        Self {
            rows: parse_dim(rows).min(max_rows.min(TABLE_DIM_LIMIT)),
            cols: parse_dim(cols).min(max_cols.min(TABLE_DIM_LIMIT)),
        }
    }
}

fn parse_dim(raw: &str) -> u32 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v.ceil().min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

pub(crate) fn build_table_html(rows: u32, cols: u32, label: impl Fn(u32, u32) -> String) -> String {
    let mut out = String::from("<table border=\"1\" cellpadding=\"5\" cellspacing=\"0\">\n");
    for r in 1..=rows {
        out.push_str("  <tr>\n");
        for c in 1..=cols {
            out.push_str("    <td>");
            out.push_str(&label(r, c));
            out.push_str("</td>\n");
        }
        out.push_str("  </tr>\n");
    }
    out.push_str("</table>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_normalizes_reversed_bounds() {
        assert_eq!(Selection::new(5, 2), Selection { start: 2, end: 5 });
        assert!(Selection::cursor(3).is_cursor());
    }

    #[test]
    fn test_selection_clamps_to_char_boundaries() {
        let text = "aж"; // 'ж' is two bytes
        assert_eq!(Selection::new(2, 10).clamp_to(text), Selection { start: 1, end: 3 });
    }

    #[test]
    fn test_utf16_roundtrip_with_astral_chars() {
        let text = "a😀b";
        assert_eq!(utf16_to_byte_idx(text, 1), 1);
        assert_eq!(utf16_to_byte_idx(text, 3), 5);
        assert_eq!(utf16_to_byte_idx(text, 99), text.len());
        assert_eq!(byte_idx_to_utf16(text, 5), 3);
        let sel = Selection::from_utf16(text, 3, 4);
        assert_eq!(&text[sel.start..sel.end], "b");
        assert_eq!(sel.to_utf16(text), (3, 4));
    }

    #[test]
    fn test_wrap_tag_wraps_selection_and_keeps_it_selected() {
        let mut buf = EditorBuffer::new("say hello now", Selection::new(4, 9));
        buf.wrap_tag("b");
        assert_eq!(buf.text, "say <b>hello</b> now");
        assert_eq!(&buf.text[buf.selection.start..buf.selection.end], "hello");
    }

    #[test]
    fn test_wrap_tag_on_empty_selection() {
        let mut buf = EditorBuffer::new("ab", Selection::cursor(1));
        buf.wrap_tag("em");
        assert_eq!(buf.text, "a<em></em>b");
        assert_eq!(buf.selection, Selection::cursor(5));
    }

    #[test]
    fn test_wrap_tag_does_not_escape_or_validate() {
        let mut buf = EditorBuffer::new("<i>x</i>", Selection::new(0, 8));
        buf.wrap_tag("not a tag");
        assert_eq!(buf.text, "<not a tag><i>x</i></not a tag>");
    }

    #[test]
    fn test_insert_replaces_selection_and_moves_cursor() {
        let mut buf = EditorBuffer::new("one two three", Selection::new(4, 7));
        buf.insert("2");
        assert_eq!(buf.text, "one 2 three");
        assert_eq!(buf.selection, Selection::cursor(5));
    }

    #[test]
    fn test_build_table_two_by_two() {
        let html = build_table_html(2, 2, |r, c| Locale::En.table_cell(r, c));
        assert_eq!(html.matches("<tr>").count(), 2);
        assert_eq!(html.matches("<td>").count(), 4);
        assert_eq!(
            html,
            "<table border=\"1\" cellpadding=\"5\" cellspacing=\"0\">\n\
             \x20 <tr>\n\
             \x20   <td>Cell 1, 1</td>\n\
             \x20   <td>Cell 1, 2</td>\n\
             \x20 </tr>\n\
             \x20 <tr>\n\
             \x20   <td>Cell 2, 1</td>\n\
             \x20   <td>Cell 2, 2</td>\n\
             \x20 </tr>\n\
             </table>\n"
        );
    }

    #[test]
    fn test_build_table_zero_rows_is_empty_shell() {
        let html = build_table_html(0, 3, |r, c| format!("{r}{c}"));
        assert_eq!(html, "<table border=\"1\" cellpadding=\"5\" cellspacing=\"0\">\n</table>\n");
    }

    #[test]
    fn test_insert_table_at_cursor() {
        let mut buf = EditorBuffer::new("<p>a</p>", Selection::cursor(8));
        buf.insert_table(TableSize { rows: 1, cols: 1 }, Locale::Ru);
        assert!(buf.text.starts_with("<p>a</p><table"));
        assert!(buf.text.contains("<td>Ячейка 1, 1</td>"));
        assert_eq!(buf.selection, Selection::cursor(buf.text.len()));
    }

    #[test]
    fn test_table_size_parse_and_bounds() {
        assert_eq!(TableSize::parse("2", "3", 50, 50), TableSize { rows: 2, cols: 3 });
        assert_eq!(TableSize::parse("", "abc", 50, 50), TableSize { rows: 0, cols: 0 });
        assert_eq!(TableSize::parse("-4", "0", 50, 50), TableSize { rows: 0, cols: 0 });
        assert_eq!(TableSize::parse("2.5", " 4 ", 50, 50), TableSize { rows: 3, cols: 4 });
        assert_eq!(TableSize::parse("1e9", "70", 50, 10), TableSize { rows: 50, cols: 10 });
    }

    #[test]
    fn test_table_size_never_exceeds_hard_limit() {
        let size = TableSize::parse("1e12", "1e12", u32::MAX, u32::MAX);
        assert_eq!(size, TableSize { rows: TABLE_DIM_LIMIT, cols: TABLE_DIM_LIMIT });
    }
}
