use chrono::{DateTime, Utc};
use shared::{Member, MembershipType};
use validator::ValidateEmail;

use super::MemberFields;

/// Failures the repository reports to its callers.
#[derive(Debug, thiserror::Error)]
pub enum MemberError {
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },
    #[error("A member with email {0} already exists")]
    DuplicateEmail(String),
    #[error("Member with id {0} not found")]
    NotFound(i64),
    #[error("Storage unavailable")]
    Storage(#[from] sqlx::Error),
}

impl MemberError {
    fn invalid(field: &'static str, message: &'static str) -> Self {
        Self::Validation { field, message }
    }
}

/// A complete member record that passed every field rule and may be written.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidMember {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub membership_type: MembershipType,
    pub joining_date: DateTime<Utc>,
    pub active: bool,
}

impl MemberFields {
    /// Fills in the creation defaults and checks the result.
    pub fn validate_new(self, now: DateTime<Utc>) -> Result<ValidMember, MemberError> {
        validate(
            self.name.unwrap_or_default(),
            self.email.unwrap_or_default(),
            self.phone.unwrap_or_default(),
            self.membership_type.as_deref(),
            self.joining_date.unwrap_or(now),
            self.active.unwrap_or(true),
        )
    }

    /// Overlays the supplied fields on `current` and checks the merged record.
    pub fn validate_update(self, current: &Member) -> Result<ValidMember, MemberError> {
        validate(
            self.name.unwrap_or_else(|| current.name.clone()),
            self.email.unwrap_or_else(|| current.email.clone()),
            self.phone.unwrap_or_else(|| current.phone.clone()),
            Some(
                self.membership_type
                    .as_deref()
                    .unwrap_or(current.membership_type.as_str()),
            ),
            self.joining_date.unwrap_or(current.joining_date),
            self.active.unwrap_or(current.active),
        )
    }
}

fn validate(
    name: String,
    email: String,
    phone: String,
    membership_type: Option<&str>,
    joining_date: DateTime<Utc>,
    active: bool,
) -> Result<ValidMember, MemberError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(MemberError::invalid("name", "Name is required"));
    }

    let email = email.trim();
    if email.is_empty() {
        return Err(MemberError::invalid("email", "Email is required"));
    }
    if !email.validate_email() {
        return Err(MemberError::invalid("email", "Please provide a valid email"));
    }

    let phone = phone.trim();
    if phone.is_empty() {
        return Err(MemberError::invalid("phone", "Phone number is required"));
    }

    let membership_type = match membership_type {
        None => MembershipType::default(),
        Some(value) => value.parse().map_err(|_| {
            MemberError::invalid(
                "membershipType",
                "Membership type must be Basic, Standard, or Premium",
            )
        })?,
    };

    Ok(ValidMember {
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        membership_type,
        joining_date,
        active,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fields(name: &str, email: &str, phone: &str) -> MemberFields {
        MemberFields {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            phone: Some(phone.to_string()),
            ..Default::default()
        }
    }

    fn invalid_field(result: Result<ValidMember, MemberError>) -> &'static str {
        match result {
            Err(MemberError::Validation { field, .. }) => field,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn new_member_gets_defaults() {
        let now = Utc::now();
        let member = fields("Jane Doe", "jane@example.com", "555-1234")
            .validate_new(now)
            .unwrap();

        assert_eq!(member.membership_type, MembershipType::Basic);
        assert!(member.active);
        assert_eq!(member.joining_date, now);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let member = fields("  Jane Doe ", " jane@example.com", "555-1234 ")
            .validate_new(Utc::now())
            .unwrap();

        assert_eq!(member.name, "Jane Doe");
        assert_eq!(member.email, "jane@example.com");
        assert_eq!(member.phone, "555-1234");
    }

    #[test]
    fn missing_or_blank_fields_are_rejected() {
        let now = Utc::now();

        assert_eq!(invalid_field(MemberFields::default().validate_new(now)), "name");
        assert_eq!(
            invalid_field(fields("   ", "jane@example.com", "555").validate_new(now)),
            "name"
        );
        assert_eq!(
            invalid_field(fields("Jane", "", "555").validate_new(now)),
            "email"
        );
        assert_eq!(
            invalid_field(fields("Jane", "jane@example.com", "").validate_new(now)),
            "phone"
        );
    }

    #[test]
    fn malformed_email_is_rejected() {
        let now = Utc::now();
        for email in ["jane", "jane@", "@example.com", "jane doe@example.com"] {
            let result = fields("Jane", email, "555").validate_new(now);
            match result {
                Err(MemberError::Validation { field, message }) => {
                    assert_eq!(field, "email");
                    assert_eq!(message, "Please provide a valid email");
                }
                other => panic!("{email} should be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn unknown_membership_type_is_rejected() {
        let mut params = fields("Jane", "jane@example.com", "555");
        params.membership_type = Some("Gold".to_string());

        assert_eq!(
            invalid_field(params.validate_new(Utc::now())),
            "membershipType"
        );
    }

    #[test]
    fn update_keeps_unsupplied_fields() {
        let now = Utc::now();
        let current = Member {
            id: 7,
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "555-1234".to_string(),
            membership_type: MembershipType::Standard,
            joining_date: now,
            active: false,
            created_at: now,
            updated_at: now,
        };

        let merged = MemberFields {
            membership_type: Some("Premium".to_string()),
            ..Default::default()
        }
        .validate_update(&current)
        .unwrap();

        assert_eq!(merged.membership_type, MembershipType::Premium);
        assert_eq!(merged.name, current.name);
        assert_eq!(merged.email, current.email);
        assert!(!merged.active);

        let blanked = MemberFields {
            phone: Some(String::new()),
            ..Default::default()
        }
        .validate_update(&current);
        assert_eq!(invalid_field(blanked), "phone");
    }
}
