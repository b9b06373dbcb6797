//! Command: the text grammar that drives the relay controller.
//!
//! Input is a single line that has already been lowercased and stripped of
//! its command prefix. [`Command::parse`] walks [`GRAMMAR`] top to bottom and
//! the first rule that matches wins. The generic `<name>on` / `<name>off`
//! rule is last so it can never shadow a keyword.

use crate::device::PowerState;

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the help text.
    Start,
    /// List every configured device name.
    ListAllDevices,
    /// State and usage of every device.
    StatusAll,
    /// State and usage of one device.
    Status { device: String },
    /// Zero all usage counters.
    Reset,
    /// Turn a device on and schedule it to switch off.
    AutoOff {
        device: String,
        /// `None` when the argument is missing or has no leading integer.
        minutes: Option<i64>,
    },
    /// Usage of one device in the current period.
    Usage { device: String },
    /// `<name>on` / `<name>off`.
    Switch { device: String, state: PowerState },
}

/// One entry of the ordered grammar table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Stable rule name, used in logs.
    pub name: &'static str,
    /// Returns `Some` when the line matches this rule.
    pub matcher: fn(&str) -> Option<Command>,
}

/// The grammar, highest precedence first.
pub const GRAMMAR: &[Rule] = &[
    Rule {
        name: "start",
        matcher: match_start,
    },
    Rule {
        name: "list_all_devices",
        matcher: match_list_all_devices,
    },
    Rule {
        name: "status",
        matcher: match_status_all,
    },
    Rule {
        name: "status_device",
        matcher: match_status_device,
    },
    Rule {
        name: "reset",
        matcher: match_reset,
    },
    Rule {
        name: "autooff",
        matcher: match_auto_off,
    },
    Rule {
        name: "usage",
        matcher: match_usage,
    },
    Rule {
        name: "switch",
        matcher: match_switch,
    },
];

/// Command forms listed by the help text, without the prefix.
pub const HELP_FORMS: &[&str] = &[
    "<device>on",
    "<device>off",
    "autooff <device> <mins>",
    "usage <device>",
    "status",
    "status <device>",
    "list_all_devices",
    "reset",
];

impl Command {
    /// Parse a prefix-stripped, lowercased line.
    ///
    /// Returns `None` when no rule matches; such lines are ignored.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        Self::parse_with_rule(text).map(|(_, command)| command)
    }

    /// Like [`parse`](Self::parse) but also reports which rule matched.
    #[must_use]
    pub fn parse_with_rule(text: &str) -> Option<(&'static str, Self)> {
        GRAMMAR
            .iter()
            .find_map(|rule| (rule.matcher)(text).map(|command| (rule.name, command)))
    }

    /// Name of the device this command targets, if any.
    #[must_use]
    pub fn device(&self) -> Option<&str> {
        match self {
            Self::Status { device }
            | Self::AutoOff { device, .. }
            | Self::Usage { device }
            | Self::Switch { device, .. } => Some(device),
            Self::Start | Self::ListAllDevices | Self::StatusAll | Self::Reset => None,
        }
    }
}

fn match_start(text: &str) -> Option<Command> {
    (text == "start").then_some(Command::Start)
}

fn match_list_all_devices(text: &str) -> Option<Command> {
    (text == "list_all_devices").then_some(Command::ListAllDevices)
}

fn match_status_all(text: &str) -> Option<Command> {
    (text == "status").then_some(Command::StatusAll)
}

fn match_status_device(text: &str) -> Option<Command> {
    text.strip_prefix("status ").map(|device| Command::Status {
        device: device.to_string(),
    })
}

fn match_reset(text: &str) -> Option<Command> {
    (text == "reset").then_some(Command::Reset)
}

/// `autooff <name> <mins>`: the name is everything between the first and
/// second space, the minutes are the leading integer after the second space.
fn match_auto_off(text: &str) -> Option<Command> {
    let args = text.strip_prefix("autooff ")?;
    let (device, minutes) = match args.split_once(' ') {
        Some((device, minutes)) => (device, leading_integer(minutes)),
        None => (args, None),
    };
    Some(Command::AutoOff {
        device: device.to_string(),
        minutes,
    })
}

/// Optional whitespace, an optional sign, then ASCII digits. Anything after
/// the digits is ignored, so `5min` and `5.5` both read as 5.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let value: i64 = rest[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

fn match_usage(text: &str) -> Option<Command> {
    text.strip_prefix("usage ").map(|device| Command::Usage {
        device: device.to_string(),
    })
}

/// The `on` suffix is checked before `off`. A bare suffix with nothing in
/// front of it does not match.
fn match_switch(text: &str) -> Option<Command> {
    let (device, state) = if let Some(device) = text.strip_suffix("on") {
        (device, PowerState::On)
    } else {
        (text.strip_suffix("off")?, PowerState::Off)
    };
    if device.is_empty() {
        return None;
    }
    Some(Command::Switch {
        device: device.to_string(),
        state,
    })
}
