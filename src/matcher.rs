use tracing::debug;

use crate::command::{Command, FlagDef, OptionId};
use crate::error::{Error, Result};
use crate::map::OptionMap;
use crate::value::ValueKind;

/// Policy for tokens that are neither flags nor a subcommand name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArgumentOrder {
    /// The first positional token ends flag recognition; everything after it
    /// is positional, dashes included.
    #[default]
    Strict,
    /// Positional tokens and flags may interleave; only `--` ends flag
    /// recognition.
    Flexible,
}

pub(crate) fn run<O: OptionId>(
    cmd: &Command<O>,
    args: &[String],
    order: ArgumentOrder,
) -> Result<OptionMap<O>> {
    debug!(header = %cmd.header, args = args.len(), ?order, "matching arguments");

    let mut map = OptionMap::new();
    for flag in cmd.flags() {
        if let Some(slot) = flag.binding().default_slot() {
            map.insert_slot(flag.id(), slot);
        }
    }

    let mut pool: Vec<String> = Vec::new();
    let mut command_name: Option<String> = None;
    let mut exclusive = false;

    let mut i = 0;
    while i < args.len() {
        let token = &args[i];
        if token == "--" {
            pool.extend(args[i + 1..].iter().cloned());
            break;
        }
        if let Some((name, attached)) = split_long(token) {
            let flag = resolve_long(cmd, name)?;
            apply_long(cmd, flag, &mut map, token, name, attached, args, &mut i)?;
            exclusive |= flag.is_exclusive();
        } else if let Some(bundle) = split_short(token) {
            exclusive |= apply_bundle(cmd, &bundle, &mut map, args, &mut i)?;
        } else if !cmd.subcommands().is_empty() {
            command_name = Some(token.clone());
            pool.extend(args[i + 1..].iter().cloned());
            break;
        } else if order == ArgumentOrder::Flexible {
            pool.push(token.clone());
        } else {
            pool.extend(args[i..].iter().cloned());
            break;
        }
        i += 1;
    }

    if exclusive {
        debug!(header = %cmd.header, "exclusive flag seen, skipping remaining checks");
        return Ok(map);
    }

    if !cmd.subcommands().is_empty() {
        dispatch_command(cmd, command_name, &pool, order, &mut map)?;
    } else {
        consume_arguments(cmd, &pool, &mut map)?;
    }

    Ok(map)
}

fn dispatch_command<O: OptionId>(
    cmd: &Command<O>,
    command_name: Option<String>,
    pool: &[String],
    order: ArgumentOrder,
    map: &mut OptionMap<O>,
) -> Result<()> {
    let name = command_name.ok_or_else(|| fail(cmd, "command required"))?;
    let matches: Vec<_> = cmd
        .subcommands()
        .iter()
        .filter(|sub| sub.name() == name)
        .collect();
    match matches.as_slice() {
        [] => Err(fail(cmd, format!("unrecognized command: {name}"))),
        [sub] => {
            debug!(header = %cmd.header, command = %name, "entering subcommand");
            let slot = sub.run(pool, order)?;
            map.insert_slot(sub.id(), slot);
            Ok(())
        }
        _ => Err(fail(cmd, format!("ambiguous command: {name}"))),
    }
}

fn consume_arguments<O: OptionId>(
    cmd: &Command<O>,
    pool: &[String],
    map: &mut OptionMap<O>,
) -> Result<()> {
    let mut next = 0;
    for arg in cmd.arguments() {
        let mut slot = map.take_slot(arg.id());
        match arg.kind() {
            ValueKind::Scalar => {
                let token = pool.get(next).ok_or_else(|| {
                    fail(cmd, format!("argument required: {}", arg.placeholder()))
                })?;
                if !arg.binding().store_text(&mut slot, token) {
                    return Err(fail(
                        cmd,
                        format!("invalid argument: {}={token}", arg.placeholder()),
                    ));
                }
                next += 1;
            }
            ValueKind::Optional => match pool.get(next) {
                Some(token) => {
                    if !arg.binding().store_text(&mut slot, token) {
                        return Err(fail(
                            cmd,
                            format!("invalid argument: {}={token}", arg.placeholder()),
                        ));
                    }
                    next += 1;
                }
                None => arg.binding().store_empty(&mut slot),
            },
            ValueKind::Multi => {
                arg.binding().store_empty(&mut slot);
                while let Some(token) = pool.get(next) {
                    if !arg.binding().store_text(&mut slot, token) {
                        return Err(fail(
                            cmd,
                            format!("invalid argument: {}={token}", arg.placeholder()),
                        ));
                    }
                    next += 1;
                }
            }
            ValueKind::Switch => unreachable!("positionals always carry a value"),
        }
        if let Some(slot) = slot {
            map.insert_slot(arg.id(), slot);
        }
    }
    if let Some(token) = pool.get(next) {
        return Err(fail(cmd, format!("unrecognized argument: {token}")));
    }
    Ok(())
}

fn fail<O: OptionId>(cmd: &Command<O>, msg: impl AsRef<str>) -> Error {
    Error::new(format!("{}: {}", cmd.header, msg.as_ref()))
}

/// Splits `--name` or `--name=value`; `None` when the token is not a long
/// flag (including the bare `--` separator).
fn split_long(token: &str) -> Option<(&str, Option<&str>)> {
    let body = token.strip_prefix("--")?;
    if body.is_empty() {
        return None;
    }
    match body.split_once('=') {
        Some((name, _)) if name.is_empty() => None,
        Some((name, value)) => Some((name, Some(value))),
        None => Some((body, None)),
    }
}

/// Splits `-abc` into its characters; `None` for the bare `-` token, which
/// stays positional by convention.
fn split_short(token: &str) -> Option<Vec<char>> {
    let body = token.strip_prefix('-')?;
    if body.is_empty() || body.starts_with('-') {
        return None;
    }
    Some(body.chars().collect())
}

fn resolve_long<'a, O: OptionId>(cmd: &'a Command<O>, name: &str) -> Result<&'a FlagDef<O>> {
    if let Some(flag) = cmd
        .flags()
        .iter()
        .find(|f| f.long_names().iter().any(|l| l == name))
    {
        return Ok(flag);
    }
    let candidates: Vec<_> = cmd
        .flags()
        .iter()
        .filter(|f| f.long_names().iter().any(|l| l.starts_with(name)))
        .collect();
    match candidates.as_slice() {
        [] => Err(fail(cmd, format!("unrecognized option: --{name}"))),
        [flag] => Ok(*flag),
        _ => {
            let names: Vec<String> = candidates
                .iter()
                .flat_map(|f| f.long_names())
                .filter(|l| l.starts_with(name))
                .map(|l| format!("--{l}"))
                .collect();
            Err(fail(
                cmd,
                format!("ambiguous option: --{name} [{}]", names.join(", ")),
            ))
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn apply_long<O: OptionId>(
    cmd: &Command<O>,
    flag: &FlagDef<O>,
    map: &mut OptionMap<O>,
    token: &str,
    name: &str,
    attached: Option<&str>,
    args: &[String],
    i: &mut usize,
) -> Result<()> {
    let mut slot = map.take_slot(flag.id());
    match flag.kind() {
        ValueKind::Switch => {
            if attached.is_some() {
                return Err(fail(cmd, format!("argument not allowed: {token}")));
            }
            flag.binding().store_empty(&mut slot);
        }
        ValueKind::Scalar | ValueKind::Multi => {
            let text = match attached {
                Some(text) => text,
                None => {
                    *i += 1;
                    args.get(*i)
                        .ok_or_else(|| fail(cmd, format!("argument required: {token}")))?
                        .as_str()
                }
            };
            if !flag.binding().store_text(&mut slot, text) {
                return Err(fail(cmd, format!("invalid argument: --{name}={text}")));
            }
        }
        ValueKind::Optional => match attached {
            None => flag.binding().store_empty(&mut slot),
            Some(text) => {
                if !flag.binding().store_text(&mut slot, text) {
                    return Err(fail(cmd, format!("invalid argument: {token}")));
                }
            }
        },
    }
    if let Some(slot) = slot {
        map.insert_slot(flag.id(), slot);
    }
    Ok(())
}

fn apply_bundle<O: OptionId>(
    cmd: &Command<O>,
    bundle: &[char],
    map: &mut OptionMap<O>,
    args: &[String],
    i: &mut usize,
) -> Result<bool> {
    let mut exclusive = false;
    let mut k = 0;
    while k < bundle.len() {
        let name = bundle[k];
        let flag = cmd
            .flags()
            .iter()
            .find(|f| f.short_names().contains(&name))
            .ok_or_else(|| fail(cmd, format!("unrecognized option: -{name}")))?;
        exclusive |= flag.is_exclusive();
        let mut slot = map.take_slot(flag.id());
        match flag.kind() {
            ValueKind::Switch => {
                flag.binding().store_empty(&mut slot);
                k += 1;
            }
            ValueKind::Scalar | ValueKind::Multi => {
                let rest: String = bundle[k + 1..].iter().collect();
                let text = if rest.is_empty() {
                    *i += 1;
                    args.get(*i)
                        .ok_or_else(|| fail(cmd, format!("argument required: -{name}")))?
                        .clone()
                } else {
                    rest
                };
                if !flag.binding().store_text(&mut slot, &text) {
                    return Err(fail(cmd, format!("invalid argument: -{name} {text}")));
                }
                k = bundle.len();
            }
            ValueKind::Optional => {
                let rest: String = bundle[k + 1..].iter().collect();
                if rest.is_empty() {
                    flag.binding().store_empty(&mut slot);
                } else if !flag.binding().store_text(&mut slot, &rest) {
                    return Err(fail(cmd, format!("invalid argument: -{name} {rest}")));
                }
                k = bundle.len();
            }
        }
        if let Some(slot) = slot {
            map.insert_slot(flag.id(), slot);
        }
    }
    Ok(exclusive)
}
