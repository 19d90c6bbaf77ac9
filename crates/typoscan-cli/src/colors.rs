// Terminal styling of report text

use owo_colors::{OwoColorize, Style};

fn highlighted() -> Style {
    Style::new().black().on_yellow()
}

fn dimmed() -> Style {
    Style::new().bold().black()
}

/// Visible stand-in for a control character: `^A` for C0 codes,
/// `<U+0085>` style for the rest.
pub fn control_picture(c: char) -> Option<String> {
    if !c.is_control() {
        return None;
    }
    let code = u32::from(c);
    match u8::try_from(code) {
        Ok(byte) if byte < 0x20 => Some(format!("^{}", char::from(b'@' + byte))),
        _ => Some(format!("<U+{code:04X}>")),
    }
}

/// `s` with control characters shown as reversed pictures.
pub fn escape(s: &str) -> String {
    highlight_mask(s, std::iter::empty())
}

/// `s` highlighted as a whole.
pub fn highlight(s: &str) -> String {
    highlight_mask(s, std::iter::repeat(true))
}

/// `s` with the characters whose `mask` entry is true highlighted.
///
/// Characters past the end of `mask` are not highlighted.
pub fn highlight_mask<I: IntoIterator<Item = bool>>(s: &str, mask: I) -> String {
    let mut out = String::with_capacity(s.len());
    let mut run = String::new();
    let mut run_kind = (false, false);
    let mask = mask.into_iter().chain(std::iter::repeat(false));
    for (c, on) in s.chars().zip(mask) {
        let picture = control_picture(c);
        let kind = (on, picture.is_some());
        if kind != run_kind {
            flush(&mut out, &run, run_kind);
            run.clear();
            run_kind = kind;
        }
        match picture {
            Some(picture) => run.push_str(&picture),
            None => run.push(c),
        }
    }
    flush(&mut out, &run, run_kind);
    out
}

fn flush(out: &mut String, run: &str, (on, control): (bool, bool)) {
    if run.is_empty() {
        return;
    }
    let style = match (on, control) {
        (false, false) => {
            out.push_str(run);
            return;
        }
        (true, false) => highlighted(),
        (false, true) => Style::new().reversed(),
        (true, true) => highlighted().reversed(),
    };
    out.push_str(&run.style(style).to_string());
}

/// Dimmed text, used for the gutter.
pub fn dim(s: &str) -> String {
    let visible: String = s
        .chars()
        .map(|c| control_picture(c).unwrap_or_else(|| c.to_string()))
        .collect();
    visible.style(dimmed()).to_string()
}

#[cfg(test)]
pub(crate) fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}
