// src/format/interpolate.rs

use super::arg::Arg;
use super::formatters::Formatters;

/// Expands `%<letter>` directives of the template (the first argument)
/// against the positional arguments that follow it.
///
/// Returns the effective argument list: the expanded template first, then
/// every argument that no formatter consumed, in order.
///
/// * `%%` becomes `%` and does not take a positional slot.
/// * A directive with a registered formatter consumes its slot and is
///   replaced by the formatter's output.
/// * A directive without a formatter is kept verbatim. It still occupies its
///   slot so later directives line up with their arguments; that argument
///   stays in the list for the output sink to interpret.
///
/// A non-string first argument is treated as the template `%O` followed by
/// that value.
pub fn interpolate(mut args: Vec<Arg>, formatters: &Formatters) -> Vec<Arg> {
    let template = match args.first() {
        None => String::new(),
        Some(first) if first.is_str() => args.remove(0).coerce(),
        Some(_) => "%O".to_owned(),
    };

    let mut slots: Vec<Option<Arg>> = args.into_iter().map(Some).collect();
    let mut out = String::with_capacity(template.len());
    let mut cursor = 0;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some(letter) if letter.is_ascii_alphabetic() => {
                chars.next();
                let rendered = match (formatters.get(letter), slots.get_mut(cursor)) {
                    (Some(handler), Some(slot)) => slot.take().map(|arg| handler(&arg)),
                    _ => None,
                };
                cursor += 1;
                match rendered {
                    Some(text) => out.push_str(&text),
                    None => {
                        out.push('%');
                        out.push(letter);
                    }
                }
            }
            _ => out.push('%'),
        }
    }

    let mut result = Vec::with_capacity(slots.len() + 1);
    result.push(Arg::Str(out));
    result.extend(slots.into_iter().flatten());
    result
}
