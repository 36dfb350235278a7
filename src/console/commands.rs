//! Command handlers

use core::fmt::Write;

use super::parser::ParsedCommand;
use super::ConsoleError;
use crate::config::{schema, SysConfig};
use crate::json::push_json_str;
use crate::logging;
use crate::schema::ConfType;
use crate::value::Field;

const DEBUG_LEVEL_KEY: &str = "debug.level";

/// Command handler: parsed line, live configuration, output sink.
pub type Handler = fn(&ParsedCommand<'_>, &SysConfig, &mut dyn Write) -> Result<(), ConsoleError>;

/// Command descriptor
pub struct CommandDescriptor {
    pub name: &'static str,
    pub brief: &'static str,
    pub handler: Handler,
}

/// All available commands
pub static COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor { name: "help", brief: "List commands", handler: cmd_help },
    CommandDescriptor { name: "get", brief: "Print one value", handler: cmd_get },
    CommandDescriptor { name: "set", brief: "Set value (text after key)", handler: cmd_set },
    CommandDescriptor { name: "show", brief: "Show values [prefix*]", handler: cmd_show },
    CommandDescriptor { name: "dump", brief: "Print JSON [diff]", handler: cmd_dump },
    CommandDescriptor { name: "save", brief: "Persist user level", handler: cmd_save },
    CommandDescriptor { name: "reset", brief: "Drop user level and reload", handler: cmd_reset },
    CommandDescriptor { name: "debug", brief: "Show or set log level", handler: cmd_debug },
];

/// Execute a parsed command
pub fn execute(cmd: &ParsedCommand<'_>, cfg: &SysConfig, out: &mut dyn Write) -> Result<(), ConsoleError> {
    if cmd.command.is_empty() {
        return Ok(()); // Empty line, do nothing
    }

    let handler = COMMANDS
        .iter()
        .find(|c| c.name == cmd.command)
        .ok_or(ConsoleError::UnknownCommand)?;

    (handler.handler)(cmd, cfg, out)
}

/// Get all command names
pub fn command_names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|c| c.name)
}

// --- Command Implementations ---

fn cmd_help(cmd: &ParsedCommand<'_>, _cfg: &SysConfig, out: &mut dyn Write) -> Result<(), ConsoleError> {
    if let Some(name) = cmd.arg(0) {
        let c = COMMANDS
            .iter()
            .find(|c| c.name == name)
            .ok_or(ConsoleError::UnknownCommand)?;
        let _ = writeln!(out, "{}: {}", c.name, c.brief);
    } else {
        for c in COMMANDS {
            let _ = writeln!(out, "  {:<8} {}", c.name, c.brief);
        }
    }
    Ok(())
}

fn cmd_get(cmd: &ParsedCommand<'_>, cfg: &SysConfig, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let key = cmd.arg(0).ok_or(ConsoleError::MissingArg)?;
    let value = cfg.get(key).ok_or(ConsoleError::UnknownKey)?;
    let _ = writeln!(out, "{}", value);
    Ok(())
}

fn cmd_set(cmd: &ParsedCommand<'_>, cfg: &SysConfig, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let key = cmd.arg(0).ok_or(ConsoleError::MissingArg)?;
    let value = cmd.rest(1).ok_or(ConsoleError::MissingArg)?;

    cfg.set(key, value)?;
    if key == DEBUG_LEVEL_KEY {
        apply_debug_level(cfg);
    }
    show_one(cfg, key, out);
    Ok(())
}

fn cmd_show(cmd: &ParsedCommand<'_>, cfg: &SysConfig, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let keys = schema().key_paths();
    match cmd.arg(0) {
        Some(pattern) if pattern.ends_with('*') => {
            let prefix = &pattern[..pattern.len() - 1];
            for key in keys.iter().filter(|k| k.starts_with(prefix)) {
                show_one(cfg, key, out);
            }
        }
        Some(key) => {
            if !keys.iter().any(|k| k == key) {
                return Err(ConsoleError::UnknownKey);
            }
            show_one(cfg, key, out);
        }
        None => {
            for key in &keys {
                show_one(cfg, key, out);
            }
        }
    }
    Ok(())
}

/// `key=value`, one line per key: strings are JSON-quoted so embedded
/// newlines stay escaped.
fn show_one(cfg: &SysConfig, key: &str, out: &mut dyn Write) {
    let value = cfg.get(key).unwrap_or_default();
    let mut line = String::new();
    match Field::resolve(schema(), key).map(|f| f.value_type()) {
        Some(ConfType::String) => push_json_str(&mut line, &value),
        _ => line.push_str(&value),
    }
    let _ = writeln!(out, "{}={}", key, line);
}

fn cmd_dump(cmd: &ParsedCommand<'_>, cfg: &SysConfig, out: &mut dyn Write) -> Result<(), ConsoleError> {
    let diff = match cmd.arg(0) {
        None => false,
        Some("diff") => true,
        Some(_) => return Err(ConsoleError::InvalidValue),
    };
    let text = cfg.dump(true, diff)?;
    let _ = writeln!(out, "{}", text);
    Ok(())
}

fn cmd_save(_cmd: &ParsedCommand<'_>, cfg: &SysConfig, out: &mut dyn Write) -> Result<(), ConsoleError> {
    cfg.save()?;
    let _ = writeln!(out, "saved");
    Ok(())
}

fn cmd_reset(cmd: &ParsedCommand<'_>, cfg: &SysConfig, out: &mut dyn Write) -> Result<(), ConsoleError> {
    if cmd.arg(0) != Some("confirm") {
        return Err(ConsoleError::RequiresConfirm);
    }
    cfg.reset()?;
    apply_debug_level(cfg);
    let _ = writeln!(out, "reset");
    Ok(())
}

fn cmd_debug(cmd: &ParsedCommand<'_>, cfg: &SysConfig, out: &mut dyn Write) -> Result<(), ConsoleError> {
    if let Some(level) = cmd.arg(0) {
        cfg.set(DEBUG_LEVEL_KEY, level)?;
        apply_debug_level(cfg);
    }
    let _ = writeln!(
        out,
        "{}={} ({})",
        DEBUG_LEVEL_KEY,
        cfg.get(DEBUG_LEVEL_KEY).unwrap_or_default(),
        log::max_level()
    );
    Ok(())
}

fn apply_debug_level(cfg: &SysConfig) {
    let level = cfg.lock().debug.level;
    logging::apply_debug_level(level);
}
