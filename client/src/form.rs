//! The add/edit form and its local checks.
//!
//! These rules run before anything is sent and are kept separate from the
//! server's own validation; either side may reject a submission.

use std::{collections::BTreeMap, fmt};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use shared::{Member, MembershipType};

// `\w` is ASCII-only here, as in a browser form pattern
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u)^\w+([\.-]?\w+)*@\w+([\.-]?\w+)*(\.\w{2,3})+$").expect("valid email regex")
});

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub membership_type: String,
    pub active: bool,
}

impl Default for MemberForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            membership_type: MembershipType::default().to_string(),
            active: true,
        }
    }
}

impl From<&Member> for MemberForm {
    fn from(member: &Member) -> Self {
        Self {
            name: member.name.clone(),
            email: member.email.clone(),
            phone: member.phone.clone(),
            membership_type: member.membership_type.to_string(),
            active: member.active,
        }
    }
}

/// Field name to message, for every field that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(pub BTreeMap<&'static str, &'static str>);

impl FormErrors {
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl MemberForm {
    /// Checks every field and reports all failures at once.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = BTreeMap::new();

        if self.name.trim().is_empty() {
            errors.insert("name", "Name is required");
        }

        if self.email.trim().is_empty() {
            errors.insert("email", "Email is required");
        } else if !EMAIL_RE.is_match(&self.email) {
            errors.insert("email", "Please enter a valid email address");
        }

        if self.phone.trim().is_empty() {
            errors.insert("phone", "Phone number is required");
        }

        if self.membership_type.parse::<MembershipType>().is_err() {
            errors.insert("membershipType", "Choose Basic, Standard, or Premium");
        }

        match errors.is_empty() {
            true => Ok(()),
            false => Err(FormErrors(errors)),
        }
    }
}
