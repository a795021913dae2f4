//! Interactive deletion confirmation.

use std::io::{self, BufRead, Write};

use danglr_core::Confirmer;

/// Asks on stderr and reads one line from stdin.
pub struct StdinConfirmer;

impl Confirmer for StdinConfirmer {
    fn confirm(&self, total: usize) -> bool {
        let mut stderr = io::stderr();
        if write!(stderr, "Delete {} broken symlinks? [y/N] ", total)
            .and_then(|_| stderr.flush())
            .is_err()
        {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_yes(&answer),
        }
    }
}

/// Accepts y/yes and the French o/oui, case-insensitive.
pub fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "o" | "oui"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_answers() {
        for answer in ["y", "Y\n", "yes", " YES ", "o", "oui", "Oui\r\n"] {
            assert!(is_yes(answer), "{:?} should be accepted", answer);
        }
    }

    #[test]
    fn test_everything_else_declines() {
        for answer in ["", "\n", "n", "no", "non", "yep", "1"] {
            assert!(!is_yes(answer), "{:?} should decline", answer);
        }
    }
}
