use crate::command::{Command, OptionId};
use crate::value::ValueKind;

/// Renders the help text for `command`.
///
/// Layout: a `Usage:` line built from the header and what the command
/// accepts, the footer if any, then aligned `Options:` and `Commands:`
/// tables. Flags with a default show it as `[default: X]` after the first
/// help line.
pub fn usage<O: OptionId>(command: &Command<O>) -> String {
    let mut out = String::new();

    out.push_str(&format!("Usage: {}", command.header()));
    if !command.flags().is_empty() {
        out.push_str(" [OPTION...]");
    }
    if !command.subcommands().is_empty() {
        out.push_str(" COMMAND [ARG...]");
    }
    for arg in command.arguments() {
        match arg.kind() {
            ValueKind::Scalar => out.push_str(&format!(" {}", arg.placeholder())),
            ValueKind::Optional => out.push_str(&format!(" [{}]", arg.placeholder())),
            ValueKind::Multi => out.push_str(&format!(" [{}...]", arg.placeholder())),
            ValueKind::Switch => unreachable!("positionals always carry a value"),
        }
    }
    out.push('\n');

    for line in lines(command.footer_text()) {
        out.push_str(&format!("  {line}\n"));
    }

    if !command.flags().is_empty() {
        out.push_str("\nOptions:\n");
        let mut rows: Vec<(String, String, Vec<String>)> = Vec::new();
        for flag in command.flags() {
            let shorts: Vec<String> = flag
                .short_names()
                .iter()
                .map(|&c| decorate_short(c, flag.kind(), flag.placeholder()))
                .collect();
            let longs: Vec<String> = flag
                .long_names()
                .iter()
                .map(|l| decorate_long(l, flag.kind(), flag.placeholder()))
                .collect();
            let mut help = lines(flag.help());
            if let Some(default) = flag.default_text() {
                let suffix = format!(" [default: {default}]");
                match help.first_mut() {
                    Some(first) => first.push_str(&suffix),
                    None => help.push(suffix.trim_start().to_string()),
                }
            }
            rows.push((shorts.join(", "), longs.join(", "), help));
        }
        render_table(&mut out, &rows);
    }

    if !command.subcommands().is_empty() {
        out.push_str("\nCommands:\n");
        let rows: Vec<(String, Vec<String>)> = command
            .subcommands()
            .iter()
            .map(|sub| (sub.name().to_string(), lines(sub.help())))
            .collect();
        render_commands(&mut out, &rows);
    }

    out
}

fn decorate_short(name: char, kind: ValueKind, placeholder: &str) -> String {
    match kind {
        ValueKind::Switch => format!("-{name}"),
        ValueKind::Optional => format!("-{name}[{placeholder}]"),
        ValueKind::Scalar | ValueKind::Multi => format!("-{name} {placeholder}"),
    }
}

fn decorate_long(name: &str, kind: ValueKind, placeholder: &str) -> String {
    match kind {
        ValueKind::Switch => format!("--{name}"),
        ValueKind::Optional => format!("--{name}[={placeholder}]"),
        ValueKind::Scalar | ValueKind::Multi => format!("--{name}={placeholder}"),
    }
}

fn render_table(out: &mut String, rows: &[(String, String, Vec<String>)]) {
    let c0 = rows.iter().map(|(s, _, _)| s.len()).max().unwrap_or(0);
    let c1 = rows.iter().map(|(_, l, _)| l.len()).max().unwrap_or(0);
    for (short, long, help) in rows {
        let mut help = help.iter();
        let first = help.next().map(String::as_str).unwrap_or("");
        push_row(out, c0, c1, short, long, first);
        for line in help {
            push_row(out, c0, c1, "", "", line);
        }
    }
}

fn push_row(out: &mut String, c0: usize, c1: usize, short: &str, long: &str, help: &str) {
    out.push_str(&format!("  {short:<c0$}  {long:<c1$}  {help}\n"));
}

fn render_commands(out: &mut String, rows: &[(String, Vec<String>)]) {
    let c0 = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, help) in rows {
        let mut help = help.iter();
        let first = help.next().map(String::as_str).unwrap_or("");
        out.push_str(&format!("  {name:<c0$}  {first}\n"));
        for line in help {
            out.push_str(&format!("  {:<c0$}  {line}\n", ""));
        }
    }
}

fn lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.lines().map(str::to_string).collect()
}
