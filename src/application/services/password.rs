//! Password strength scoring for the sign-up form

/// Score out of 5 plus advice for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordStrength {
    pub score: u8,
    pub feedback: Vec<String>,
}

pub fn check_password_strength(password: &str) -> PasswordStrength {
    let mut score = 0;
    let mut feedback = Vec::new();

    if password.chars().count() < 8 {
        feedback.push("Password should be at least 8 characters long".to_string());
    } else {
        score += 1;
    }

    if password.chars().any(|c| c.is_ascii_lowercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        score += 1;
    }

    if score < 3 {
        feedback.push("Consider adding uppercase letters, numbers, or special characters".to_string());
    }

    PasswordStrength { score, feedback }
}

impl PasswordStrength {
    pub fn render(&self) -> String {
        let mut out = format!("Strength: {}/5", self.score);
        for line in &self.feedback {
            out.push_str("\n- ");
            out.push_str(line);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weak_password() {
        let result = check_password_strength("abc");
        assert_eq!(result.score, 1);
        assert_eq!(result.feedback.len(), 2);
    }

    #[test]
    fn test_strong_password() {
        let result = check_password_strength("Correct-Horse-9");
        assert_eq!(result.score, 5);
        assert!(result.feedback.is_empty());
        assert_eq!(result.render(), "Strength: 5/5");
    }

    #[test]
    fn test_long_lowercase_password() {
        let result = check_password_strength("aaaaaaaaaa");
        assert_eq!(result.score, 2);
        assert_eq!(
            result.feedback,
            vec!["Consider adding uppercase letters, numbers, or special characters".to_string()]
        );
    }
}
