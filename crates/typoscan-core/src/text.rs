// Text helpers: grapheme-safe trimming, tab expansion, char offsets

use unicode_segmentation::UnicodeSegmentation;

/// Marker that replaces the trimmed end of a string.
pub const ELLIPSIS: &str = "\u{2026}";

/// Default tab stop width used by [`expand_tabs`].
pub const TAB_SIZE: usize = 8;

/// Number of extended grapheme clusters in `s`.
pub fn grapheme_len(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Shrink `s` to at most `n` grapheme clusters by cutting its beginning.
///
/// The last `n - 1` clusters are kept behind an ellipsis. A string that
/// already fits is returned unchanged; with `n == 0` a non-empty string
/// collapses to the ellipsis alone.
pub fn ltrim(s: &str, n: usize) -> String {
    ltrim_with(s, n, ELLIPSIS)
}

/// Shrink `s` to at most `n` grapheme clusters by cutting its end.
///
/// Mirror image of [`ltrim`]: the first `n - 1` clusters are kept,
/// followed by an ellipsis.
pub fn rtrim(s: &str, n: usize) -> String {
    rtrim_with(s, n, ELLIPSIS)
}

/// [`ltrim`] with a caller-chosen marker (a single cluster, e.g. `" "`
/// when trimming an underline in step with its line).
pub fn ltrim_with(s: &str, n: usize, marker: &str) -> String {
    if n == 0 {
        return collapse(s, marker);
    }
    let clusters: Vec<&str> = s.graphemes(true).collect();
    if clusters.len() <= n {
        return s.to_string();
    }
    let mut out = String::from(marker);
    for cluster in &clusters[clusters.len() - (n - 1)..] {
        out.push_str(cluster);
    }
    out
}

/// [`rtrim`] with a caller-chosen marker.
pub fn rtrim_with(s: &str, n: usize, marker: &str) -> String {
    if n == 0 {
        return collapse(s, marker);
    }
    // Only n + 1 clusters are needed to know whether the string fits.
    let clusters: Vec<&str> = s.graphemes(true).take(n + 1).collect();
    if clusters.len() <= n {
        return s.to_string();
    }
    let mut out: String = clusters[..n - 1].concat();
    out.push_str(marker);
    out
}

fn collapse(s: &str, marker: &str) -> String {
    if s.is_empty() {
        String::new()
    } else {
        marker.to_string()
    }
}

/// Replace tabs with spaces up to the next multiple of `tab_size` columns.
///
/// Columns are counted in characters and restart after `\n` or `\r`.
pub fn expand_tabs(line: &str, tab_size: usize) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + tab_size);
    let mut column = 0;
    for c in line.chars() {
        match c {
            '\t' => {
                if tab_size > 0 {
                    let pad = tab_size - column % tab_size;
                    out.extend(std::iter::repeat_n(' ', pad));
                    column += pad;
                }
            }
            '\n' | '\r' => {
                out.push(c);
                column = 0;
            }
            _ => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

/// Byte index of the `char_idx`-th character of `s`, or `s.len()` past the end.
pub fn char_to_byte(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map_or(s.len(), |(byte_idx, _)| byte_idx)
}
