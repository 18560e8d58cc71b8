use crate::domain::model::{LeadSubmission, NewLead};
use crate::utils::error::ValidationFailure;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

static PHONE_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\s+\-()]+$").expect("phone pattern is a valid regex"));

const MIN_PHONE_DIGITS: usize = 10;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    PHONE_CHARSET.is_match(phone) && digits >= MIN_PHONE_DIGITS
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// Validates a submission and hands back the row to insert.
/// Order matters: missing fields, then email, then phone.
pub fn validate_submission(
    submission: &LeadSubmission,
) -> std::result::Result<NewLead, ValidationFailure> {
    let (
        Some(email),
        Some(full_name),
        Some(company_name),
        Some(job_title),
        Some(phone_number),
        Some(business_sector),
    ) = (
        present(&submission.email),
        present(&submission.full_name),
        present(&submission.company_name),
        present(&submission.job_title),
        present(&submission.phone_number),
        present(&submission.business_sector),
    )
    else {
        return Err(ValidationFailure::MissingFields);
    };

    if !is_valid_email(email) {
        return Err(ValidationFailure::InvalidEmail);
    }

    if !is_valid_phone(phone_number) {
        return Err(ValidationFailure::InvalidPhone);
    }

    Ok(NewLead {
        email: email.to_string(),
        full_name: full_name.to_string(),
        company_name: company_name.to_string(),
        job_title: job_title.to_string(),
        phone_number: phone_number.to_string(),
        business_sector: business_sector.to_string(),
    })
}

/// Verdict-only form of [`validate_submission`].
pub fn check_submission(submission: &LeadSubmission) -> std::result::Result<(), ValidationFailure> {
    validate_submission(submission).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> LeadSubmission {
        LeadSubmission {
            email: Some("ada@example.com".to_string()),
            full_name: Some("Ada Lovelace".to_string()),
            company_name: Some("Analytical Engines Ltd".to_string()),
            job_title: Some("CTO".to_string()),
            phone_number: Some("(555) 123-4567".to_string()),
            business_sector: Some("Computing".to_string()),
        }
    }

    #[test]
    fn accepts_complete_submission() {
        let lead = validate_submission(&complete()).unwrap();
        assert_eq!(lead.email, "ada@example.com");
        assert_eq!(lead.phone_number, "(555) 123-4567");
    }

    #[test]
    fn any_missing_or_empty_field_is_missing_fields() {
        let blankers: [fn(&mut LeadSubmission); 6] = [
            |s| s.email = None,
            |s| s.full_name = Some(String::new()),
            |s| s.company_name = None,
            |s| s.job_title = Some(String::new()),
            |s| s.phone_number = None,
            |s| s.business_sector = Some(String::new()),
        ];

        for blank in blankers {
            let mut submission = complete();
            blank(&mut submission);
            assert_eq!(
                check_submission(&submission),
                Err(ValidationFailure::MissingFields)
            );
        }
    }

    #[test]
    fn missing_fields_wins_over_bad_email() {
        let mut submission = complete();
        submission.email = Some("not-an-email".to_string());
        submission.job_title = None;
        assert_eq!(
            check_submission(&submission),
            Err(ValidationFailure::MissingFields)
        );
    }

    #[test]
    fn email_shape() {
        assert!(!is_valid_email("not-an-email"));
        assert!(is_valid_email("a@b.c"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.c"));
        assert!(!is_valid_email("a@.c"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("a@b@c.d"));

        let mut submission = complete();
        submission.email = Some("not-an-email".to_string());
        assert_eq!(
            check_submission(&submission),
            Err(ValidationFailure::InvalidEmail)
        );
    }

    #[test]
    fn phone_digits_and_charset() {
        assert!(!is_valid_phone("123"));
        assert!(is_valid_phone("(555) 123-4567"));
        assert!(is_valid_phone("+44 20 7946 0958"));
        assert!(!is_valid_phone("555.123.4567"));
        assert!(!is_valid_phone("555-123-456x"));

        let mut submission = complete();
        submission.phone_number = Some("123".to_string());
        assert_eq!(
            check_submission(&submission),
            Err(ValidationFailure::InvalidPhone)
        );
    }
}
