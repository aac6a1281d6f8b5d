//! Password strength policy

/// Minimum requirements a new password must meet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_symbol: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_symbol: false,
        }
    }
}

impl PasswordPolicy {
    /// Check `password`, returning the message of the first violated rule.
    pub fn check(&self, password: &str) -> Result<(), String> {
        if password.chars().count() < self.min_length {
            return Err(format!(
                "Password must be at least {} characters long",
                self.min_length
            ));
        }
        if self.require_uppercase && !password.chars().any(char::is_uppercase) {
            return Err("Password must contain at least one uppercase letter".into());
        }
        if self.require_lowercase && !password.chars().any(char::is_lowercase) {
            return Err("Password must contain at least one lowercase letter".into());
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err("Password must contain at least one number".into());
        }
        if self.require_symbol && !password.chars().any(|c| !c.is_alphanumeric()) {
            return Err("Password must contain at least one special character".into());
        }
        Ok(())
    }

    /// Human-readable summary of every active requirement
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("at least {} characters", self.min_length)];
        if self.require_uppercase {
            parts.push("an uppercase letter".into());
        }
        if self.require_lowercase {
            parts.push("a lowercase letter".into());
        }
        if self.require_digit {
            parts.push("a number".into());
        }
        if self.require_symbol {
            parts.push("a special character".into());
        }
        format!("Password must contain {}", parts.join(", "))
    }
}
