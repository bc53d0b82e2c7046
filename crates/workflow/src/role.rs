use std::fmt;

/// Approval role token. Stage templates and employees store the raw string;
/// the engine compares parsed values so an unknown token stays
/// distinguishable from a misconfigured stage.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Role {
    /// Financially responsible person.
    Frp,
    /// Head of the financially responsible persons.
    HeaderFrp,
    Director,
    Accountant,
    Admin,
    Unknown(String),
}

impl Role {
    pub fn parse(token: &str) -> Role {
        match token {
            "frp" => Role::Frp,
            "header_frp" => Role::HeaderFrp,
            "director" => Role::Director,
            "accountant" => Role::Accountant,
            "admin" => Role::Admin,
            other => Role::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Frp => "frp",
            Role::HeaderFrp => "header_frp",
            Role::Director => "director",
            Role::Accountant => "accountant",
            Role::Admin => "admin",
            Role::Unknown(token) => token,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Role::Unknown(_))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::Role;

    #[test]
    fn parse_round_trips_known_and_unknown_tokens() {
        for token in ["frp", "header_frp", "director", "accountant", "admin"] {
            let role = Role::parse(token);
            assert!(role.is_known(), "{token} should be a known role");
            assert_eq!(role.as_str(), token);
        }
        let stray = Role::parse("janitor");
        assert!(!stray.is_known());
        assert_eq!(stray.as_str(), "janitor");
    }
}
