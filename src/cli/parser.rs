//! Command-line argument parsing

/// A user-service subcommand selected on the command line
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    CreateUser,
    DeleteUser,
    ListUsers,
    UpdateUser,
    Authenticate,
    LoginPage(Option<String>),
    Usage,
}

impl CliCommand {
    /// Whether the command works on user records and so needs a bound store.
    pub fn needs_store(&self) -> bool {
        !matches!(self, CliCommand::LoginPage(_) | CliCommand::Usage)
    }
}

/// Picks the subcommand from the process arguments (program name excluded).
///
/// Flags are checked in a fixed order and the first one present wins, wherever
/// it appears. Anything else yields [`CliCommand::Usage`].
pub fn parse_args(args: &[String]) -> CliCommand {
    let has = |flag: &str| args.iter().any(|a| a == flag);

    if has("--createuser") {
        CliCommand::CreateUser
    } else if has("--deleteuser") {
        CliCommand::DeleteUser
    } else if has("--listusers") {
        CliCommand::ListUsers
    } else if has("--updateuser") {
        CliCommand::UpdateUser
    } else if has("--authenticate") {
        CliCommand::Authenticate
    } else if let Some(pos) = args.iter().position(|a| a == "--loginpage") {
        let path = args
            .get(pos + 1)
            .filter(|a| !a.starts_with("--"))
            .cloned();
        CliCommand::LoginPage(path)
    } else {
        CliCommand::Usage
    }
}

/// Help text listing the supported subcommands.
pub fn usage() -> &'static str {
    "user services:\n  \
     --createuser\n  \
     --deleteuser\n  \
     --listusers\n  \
     --updateuser\n  \
     --authenticate\n  \
     --loginpage [path]\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(parse_args(&args(&["--createuser"])), CliCommand::CreateUser);
        assert_eq!(parse_args(&args(&["--deleteuser"])), CliCommand::DeleteUser);
        assert_eq!(parse_args(&args(&["--listusers"])), CliCommand::ListUsers);
        assert_eq!(parse_args(&args(&["--updateuser"])), CliCommand::UpdateUser);
        assert_eq!(
            parse_args(&args(&["--authenticate"])),
            CliCommand::Authenticate
        );
    }

    #[test]
    fn test_parse_login_page() {
        assert_eq!(
            parse_args(&args(&["--loginpage"])),
            CliCommand::LoginPage(None)
        );
        assert_eq!(
            parse_args(&args(&["--loginpage", "site/login.html"])),
            CliCommand::LoginPage(Some("site/login.html".to_string()))
        );
        assert_eq!(
            parse_args(&args(&["--loginpage", "--verbose"])),
            CliCommand::LoginPage(None)
        );
    }

    #[test]
    fn test_flag_priority() {
        assert_eq!(
            parse_args(&args(&["--listusers", "--createuser"])),
            CliCommand::CreateUser
        );
        assert_eq!(
            parse_args(&args(&["extra", "--updateuser", "--deleteuser"])),
            CliCommand::DeleteUser
        );
    }

    #[test]
    fn test_unknown_or_missing_flags() {
        assert_eq!(parse_args(&[]), CliCommand::Usage);
        assert_eq!(parse_args(&args(&["--nope"])), CliCommand::Usage);
        assert_eq!(parse_args(&args(&["createuser"])), CliCommand::Usage);
    }

    #[test]
    fn test_needs_store() {
        assert!(CliCommand::ListUsers.needs_store());
        assert!(CliCommand::Authenticate.needs_store());
        assert!(!CliCommand::Usage.needs_store());
        assert!(!CliCommand::LoginPage(None).needs_store());
    }

    #[test]
    fn test_usage_lists_every_flag() {
        for flag in [
            "--createuser",
            "--deleteuser",
            "--listusers",
            "--updateuser",
            "--authenticate",
            "--loginpage",
        ] {
            assert!(usage().contains(flag));
        }
    }
}
