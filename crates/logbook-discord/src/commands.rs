//! Text-command parsing.
//!
//! One text line per invocation, `<prefix><command> [args...]`. Anything that
//! does not parse is ignored without a reply, the same way failed channel and
//! role gates are.

/// A recognized command, arguments already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Id,
    SetNickname(String),
    Status,
    ClockIn,
    ClockOut,
    /// `override` with a missing or malformed subcommand; replies with usage
    /// (still gated on the override roles).
    OverrideUsage,
    OverrideClockIn(u64),
    OverrideClockOut(u64),
    Report,
    SingleReport(u64),
    Void { user_id: u64, duty_id: String },
    Admin,
    AddAdmin(u64),
    RemoveAdmin(u64),
    EmployeeDelete(u64),
}

/// Parse one message into a command. `None` means "not for us": wrong prefix,
/// unknown command, or arguments that don't parse.
pub fn parse(prefix: &str, content: &str) -> Option<Command> {
    let line = content.trim().strip_prefix(prefix)?;
    let mut words = line.split_whitespace();
    let head = words.next()?;

    match head {
        "help" => end(words, Command::Help),
        "id" => end(words, Command::Id),
        "setnickname" => {
            // Free text: everything after the command word.
            let name = line
                .trim_start()
                .strip_prefix("setnickname")
                .unwrap_or_default()
                .trim();
            if name.is_empty() {
                None
            } else {
                Some(Command::SetNickname(name.to_string()))
            }
        }
        "status" => end(words, Command::Status),
        "clockin" => end(words, Command::ClockIn),
        "clockout" => end(words, Command::ClockOut),
        "override" => match (words.next(), words.next()) {
            (Some("clockin"), Some(id)) => {
                id.parse().ok().map(Command::OverrideClockIn)
            }
            (Some("clockout"), Some(id)) => {
                id.parse().ok().map(Command::OverrideClockOut)
            }
            _ => Some(Command::OverrideUsage),
        },
        "report" => end(words, Command::Report),
        "singlereport" => one_id(words, Command::SingleReport),
        "void" => {
            let user_id: u64 = words.next()?.parse().ok()?;
            let duty_id = words.next()?.to_string();
            end(words, Command::Void { user_id, duty_id })
        }
        "admin" => end(words, Command::Admin),
        "addadmin" => one_id(words, Command::AddAdmin),
        "removeadmin" => one_id(words, Command::RemoveAdmin),
        "employee" => match (words.next(), words.next()) {
            (Some("delete"), Some(id)) => id.parse().ok().map(Command::EmployeeDelete),
            _ => None,
        },
        _ => None,
    }
}

/// The command takes no further arguments; trailing junk is rejected.
fn end<'a>(mut words: impl Iterator<Item = &'a str>, cmd: Command) -> Option<Command> {
    if words.next().is_some() {
        None
    } else {
        Some(cmd)
    }
}

fn one_id<'a>(
    mut words: impl Iterator<Item = &'a str>,
    make: impl FnOnce(u64) -> Command,
) -> Option<Command> {
    let id: u64 = words.next()?.parse().ok()?;
    end(words, make(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(content: &str) -> Option<Command> {
        parse("!", content)
    }

    #[test]
    fn bare_commands() {
        assert_eq!(p("!help"), Some(Command::Help));
        assert_eq!(p("!id"), Some(Command::Id));
        assert_eq!(p("!status"), Some(Command::Status));
        assert_eq!(p("!clockin"), Some(Command::ClockIn));
        assert_eq!(p("!clockout"), Some(Command::ClockOut));
        assert_eq!(p("!report"), Some(Command::Report));
        assert_eq!(p("!admin"), Some(Command::Admin));
    }

    #[test]
    fn prefix_must_match() {
        assert_eq!(p("clockin"), None);
        assert_eq!(p("?clockin"), None);
        assert_eq!(parse("?", "?clockin"), Some(Command::ClockIn));
    }

    #[test]
    fn unknown_commands_are_ignored() {
        assert_eq!(p("!clockinn"), None);
        assert_eq!(p("!"), None);
        assert_eq!(p("hello there"), None);
    }

    #[test]
    fn override_subcommands() {
        assert_eq!(p("!override clockin 42"), Some(Command::OverrideClockIn(42)));
        assert_eq!(
            p("!override clockout 42"),
            Some(Command::OverrideClockOut(42))
        );
        assert_eq!(p("!override"), Some(Command::OverrideUsage));
        assert_eq!(p("!override frobnicate 42"), Some(Command::OverrideUsage));
    }

    #[test]
    fn id_arguments_must_be_numeric() {
        assert_eq!(p("!singlereport 99"), Some(Command::SingleReport(99)));
        assert_eq!(p("!singlereport bob"), None);
        assert_eq!(p("!addadmin 7"), Some(Command::AddAdmin(7)));
        assert_eq!(p("!removeadmin x"), None);
        assert_eq!(p("!override clockin bob"), None);
    }

    #[test]
    fn void_takes_user_then_duty_id() {
        assert_eq!(
            p("!void 42 1234"),
            Some(Command::Void {
                user_id: 42,
                duty_id: "1234".to_string()
            })
        );
        assert_eq!(p("!void 42"), None);
        assert_eq!(p("!void abc 1234"), None);
    }

    #[test]
    fn employee_requires_delete_action() {
        assert_eq!(p("!employee delete 42"), Some(Command::EmployeeDelete(42)));
        assert_eq!(p("!employee add 42"), None);
        assert_eq!(p("!employee"), None);
    }

    #[test]
    fn setnickname_keeps_free_text() {
        assert_eq!(
            p("!setnickname Night Shift Lead"),
            Some(Command::SetNickname("Night Shift Lead".to_string()))
        );
        assert_eq!(p("!setnickname"), None);
    }

    #[test]
    fn trailing_junk_is_rejected() {
        assert_eq!(p("!clockin now"), None);
        assert_eq!(p("!void 42 1234 extra"), None);
    }
}
