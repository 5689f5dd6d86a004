//! Indicator predicates and the pattern lists they match against.
//!
//! Every predicate is a pure function over record fields; weights live in
//! the parent module so the two tables can be audited separately.

/// Package-manager style runners that fetch and launch a managed package.
pub const MANAGED_LAUNCHERS: &[&str] = &[
    "npx", "pnpx", "bunx", "uvx", "uv", "pipx", "pnpm", "yarn", "docker", "podman",
];

/// Substrings that mark an env var name as holding a secret (matched case-insensitively).
pub const SENSITIVE_NAME_PATTERNS: &[&str] = &["TOKEN", "KEY", "SECRET", "PASSWORD"];

/// Package or binary name fragments of filesystem servers.
pub const FILESYSTEM_PATTERNS: &[&str] = &["filesystem", "file-system"];

/// Database system names looked for in command, args and URL.
pub const DATABASE_PATTERNS: &[&str] = &["postgres", "mysql", "mariadb", "redis", "mongo", "sqlite"];

/// Script interpreters; `python` also matches versioned names like `python3.12`.
pub const SCRIPT_INTERPRETERS: &[&str] = &["python", "node", "deno", "bun", "ruby", "perl", "php"];

const WINDOWS_EXEC_SUFFIXES: &[&str] = &[".exe", ".cmd", ".bat", ".ps1"];

/// The executable part of a command line: a leading quoted path, or the
/// first whitespace-separated token.
pub fn command_token(command: &str) -> &str {
    let cmd = command.trim();
    for quote in ['"', '\''] {
        if let Some(rest) = cmd.strip_prefix(quote) {
            return rest.split(quote).next().unwrap_or(rest).trim();
        }
    }
    cmd.split_whitespace().next().unwrap_or("")
}

/// Lowercased program name of a command: last path component of its
/// executable token, without a Windows launcher suffix.
pub fn program_name(command: &str) -> String {
    let token = command_token(command);
    let base = token.rsplit(['/', '\\']).next().unwrap_or(token);
    let mut name = base.to_ascii_lowercase();
    for suffix in WINDOWS_EXEC_SUFFIXES {
        if let Some(stripped) = name.strip_suffix(suffix) {
            name = stripped.to_string();
            break;
        }
    }
    name
}

pub fn is_managed_launcher(command: &str) -> bool {
    let name = program_name(command);
    MANAGED_LAUNCHERS.iter().any(|l| *l == name)
}

/// True when the command's executable is given by path instead of going through a launcher.
pub fn is_direct_executable_path(command: &str) -> bool {
    let token = command_token(command);
    !token.is_empty() && token.contains(['/', '\\']) && !is_managed_launcher(command)
}

pub fn is_sensitive_env_name(key: &str) -> bool {
    let upper = key.to_ascii_uppercase();
    SENSITIVE_NAME_PATTERNS.iter().any(|p| upper.contains(p))
}

pub fn invokes_script_interpreter(command: &str) -> bool {
    let name = program_name(command);
    if name.is_empty() {
        return false;
    }
    SCRIPT_INTERPRETERS.iter().any(|interp| {
        name == *interp
            || (*interp == "python"
                && name
                    .strip_prefix("python")
                    .is_some_and(|v| v.chars().all(|c| c.is_ascii_digit() || c == '.')))
    })
}

/// Filesystem capability: a filesystem server package, or a directory path handed over as an argument.
pub fn grants_filesystem_access(command: &str, args: &[String]) -> bool {
    let mentions = |s: &str| {
        let lower = s.to_ascii_lowercase();
        FILESYSTEM_PATTERNS.iter().any(|p| lower.contains(p))
    };
    mentions(command) || args.iter().any(|a| mentions(a) || is_directory_argument(a))
}

/// Absolute, home-relative or dot-relative path whose last component has no file extension.
///
/// `--root=/srv/data` style flags are judged on their value.
pub fn is_directory_argument(arg: &str) -> bool {
    let value = arg.split_once('=').map_or(arg, |(_, v)| v).trim();
    if value == "~" {
        return true;
    }
    let bytes = value.as_bytes();
    let drive = bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && matches!(bytes[2], b'\\' | b'/');
    let path_like = drive
        || value.starts_with('/')
        || ["~/", "~\\", "./", ".\\", "../", "..\\"]
            .iter()
            .any(|p| value.starts_with(p));
    if !path_like {
        return false;
    }
    let last = value
        .trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("");
    !last.trim_start_matches('.').contains('.')
}

pub fn references_database(command: &str, args: &[String], url: Option<&str>) -> bool {
    std::iter::once(command)
        .chain(args.iter().map(String::as_str))
        .chain(url)
        .any(|s| {
            let lower = s.to_ascii_lowercase();
            DATABASE_PATTERNS.iter().any(|db| lower.contains(db))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn program_name_strips_dirs_and_windows_suffixes() {
        assert_eq!(program_name("/usr/local/bin/npx"), "npx");
        assert_eq!(program_name(r#""C:\Program Files\nodejs\NPX.CMD" -y pkg"#), "npx");
        assert_eq!(program_name(r"C:\tools\uvx.exe run"), "uvx");
        assert_eq!(program_name("python3.exe"), "python3");
        assert_eq!(program_name(""), "");
    }

    #[test]
    fn launchers_are_not_direct_paths() {
        assert!(is_managed_launcher("npx"));
        assert!(is_managed_launcher("/opt/homebrew/bin/uvx"));
        assert!(!is_direct_executable_path("/opt/homebrew/bin/uvx"));
        assert!(is_direct_executable_path("/usr/local/bin/github-mcp"));
        assert!(is_direct_executable_path(r"C:\tools\server.exe"));
        assert!(!is_direct_executable_path("github-mcp"));
        assert!(!is_direct_executable_path("  "));
    }

    #[test]
    fn inline_arguments_do_not_hide_the_launcher() {
        assert_eq!(command_token("  npx -y pkg "), "npx");
        assert!(is_managed_launcher("npx -y @modelcontextprotocol/server-postgres"));
        assert!(!is_direct_executable_path("npx -y @modelcontextprotocol/server-postgres"));
        assert!(!is_direct_executable_path("uv run /opt/srv/main.py"));
        assert!(is_direct_executable_path("/opt/bin/github-mcp --stdio"));
        assert!(!is_direct_executable_path("github-mcp --config /etc/gh.toml"));
        assert!(is_direct_executable_path(r#"'/opt/My Tools/srv' --port 1"#));
    }

    #[test]
    fn interpreter_with_inline_script() {
        assert!(invokes_script_interpreter("python server.py"));
        assert!(invokes_script_interpreter("node /srv/index.js --stdio"));
        assert!(!invokes_script_interpreter("npx -y node-mcp"));
    }

    #[test]
    fn sensitive_names_match_case_insensitively() {
        for k in ["GITHUB_TOKEN", "api_key", "ClientSecret", "DB_PASSWORD", "KEYRING"] {
            assert!(is_sensitive_env_name(k), "{k}");
        }
        for k in ["PATH", "RUST_LOG", "HOME"] {
            assert!(!is_sensitive_env_name(k), "{k}");
        }
    }

    #[test]
    fn interpreters_include_versioned_python() {
        assert!(invokes_script_interpreter("python"));
        assert!(invokes_script_interpreter("/usr/bin/python3.12"));
        assert!(invokes_script_interpreter("node.exe"));
        assert!(!invokes_script_interpreter("pythonista"));
        assert!(!invokes_script_interpreter("npx"));
        assert!(!invokes_script_interpreter(""));
    }

    #[test]
    fn filesystem_detection() {
        assert!(grants_filesystem_access(
            "npx",
            &args(&["-y", "@modelcontextprotocol/server-filesystem"])
        ));
        assert!(grants_filesystem_access("npx", &args(&["server", "/Users/me/Desktop"])));
        assert!(grants_filesystem_access("srv", &args(&["--root=~/projects/"])));
        assert!(grants_filesystem_access("srv", &args(&[r"D:\data"])));
        assert!(!grants_filesystem_access("node", &args(&["/opt/mcp/server.js"])));
        assert!(!grants_filesystem_access(
            "npx",
            &args(&["-y", "@modelcontextprotocol/server-postgres"])
        ));
        assert!(!grants_filesystem_access("uvx", &args(&["postgresql://localhost/db"])));
    }

    #[test]
    fn database_detection_covers_url() {
        assert!(references_database("npx", &args(&["@x/server-postgres"]), None));
        assert!(references_database("", &[], Some("https://redis.example.com/mcp")));
        assert!(references_database("/opt/MongoDB-mcp", &[], None));
        assert!(!references_database("npx", &args(&["@x/server-github"]), None));
    }
}
