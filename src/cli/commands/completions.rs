//! Shell completions generation.

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::Cli;
use crate::error::TimetrackError;

/// Generate the completion script for `shell`.
///
/// # Errors
///
/// Returns `InvalidInput` if the generated script is not valid UTF-8.
pub fn completions(shell: Shell) -> Result<String, TimetrackError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, "timetrack", &mut buf);
    String::from_utf8(buf).map_err(|e| TimetrackError::InvalidInput(format!("UTF-8 error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_bash_completions() {
        let script = completions(Shell::Bash).unwrap();
        assert!(script.contains("timetrack"));
        assert!(script.contains("complete"));
    }

    #[test]
    fn test_generate_zsh_completions() {
        let script = completions(Shell::Zsh).unwrap();
        assert!(script.contains("timetrack"));
    }

    #[test]
    fn test_generate_fish_completions() {
        let script = completions(Shell::Fish).unwrap();
        assert!(script.contains("complete -c timetrack"));
    }
}
