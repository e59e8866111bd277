// src/format/host.rs

//! The terminal sink's own formatting step.
//!
//! After interpolation the template may still hold directives that no
//! registered formatter handled (`%s`, `%d`, ...). A plain-text sink resolves
//! them here, the way a host `printf`-style logger would, and appends any
//! arguments left over.

use super::arg::Arg;
use super::formatters;

/// Renders an argument list into a single line of text.
pub fn render(args: &[Arg]) -> String {
    let Some((first, _)) = args.split_first() else {
        return String::new();
    };

    let mut next = 1;
    let mut out = match first {
        Arg::Str(template) => expand(template, args, &mut next),
        other => other.inspect(false),
    };

    for arg in &args[next..] {
        out.push(' ');
        match arg {
            Arg::Str(s) => out.push_str(s),
            other => out.push_str(&other.inspect(false)),
        }
    }
    out
}

fn expand(template: &str, args: &[Arg], next: &mut usize) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let Some(&directive) = chars.peek() else {
            out.push('%');
            break;
        };
        if directive == '%' {
            chars.next();
            out.push('%');
            continue;
        }
        if !matches!(directive, 's' | 'd' | 'i' | 'f' | 'j' | 'o' | 'O' | 'c') {
            out.push('%');
            continue;
        }
        chars.next();
        let Some(arg) = args.get(*next) else {
            out.push('%');
            out.push(directive);
            continue;
        };
        *next += 1;
        match directive {
            's' => out.push_str(&as_string(arg)),
            'd' => out.push_str(&as_number(arg)),
            'i' => out.push_str(&as_integer(arg)),
            'f' => out.push_str(&as_float(arg)),
            'j' => out.push_str(&formatters::json(arg)),
            'o' => out.push_str(&arg.inspect(false)),
            'O' => out.push_str(&arg.inspect(true)),
            // `%c` carries styling that plain text cannot show.
            _ => {}
        }
    }
    out
}

fn as_string(arg: &Arg) -> String {
    match arg {
        Arg::Json(_) | Arg::Debug { .. } => arg.inspect(false),
        other => other.coerce(),
    }
}

fn as_number(arg: &Arg) -> String {
    match arg {
        Arg::Int(i) => i.to_string(),
        Arg::Float(f) => f.to_string(),
        Arg::Bool(b) => u8::from(*b).to_string(),
        Arg::Null => "0".to_owned(),
        Arg::Str(s) => match s.trim() {
            "" => "0".to_owned(),
            t => t.parse::<f64>().map_or_else(|_| "NaN".to_owned(), |f| f.to_string()),
        },
        _ => "NaN".to_owned(),
    }
}

fn as_integer(arg: &Arg) -> String {
    match arg {
        Arg::Int(i) => i.to_string(),
        Arg::Float(f) if f.is_finite() => (f.trunc() as i64).to_string(),
        Arg::Str(s) => leading_number(s, false)
            .and_then(|n| n.parse::<i64>().ok())
            .map_or_else(|| "NaN".to_owned(), |i| i.to_string()),
        _ => "NaN".to_owned(),
    }
}

fn as_float(arg: &Arg) -> String {
    match arg {
        Arg::Int(i) => i.to_string(),
        Arg::Float(f) => f.to_string(),
        Arg::Str(s) => leading_number(s, true)
            .and_then(|n| n.parse::<f64>().ok())
            .map_or_else(|| "NaN".to_owned(), |f| f.to_string()),
        _ => "NaN".to_owned(),
    }
}

/// The longest numeric prefix of `s` after leading whitespace.
fn leading_number(s: &str, allow_fraction: bool) -> Option<&str> {
    let s = s.trim_start();
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        let ok = c.is_ascii_digit()
            || (i == 0 && (c == '-' || c == '+'))
            || (allow_fraction && c == '.' && !seen_dot);
        if !ok {
            break;
        }
        seen_dot |= c == '.';
        end = i + c.len_utf8();
    }
    let number = &s[..end];
    number.chars().any(|c| c.is_ascii_digit()).then_some(number)
}
