use crate::models::{ContactRequest, ContactSubmission, FieldErrors};

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 100;
const EMAIL_MAX: usize = 255;
const MESSAGE_MIN: usize = 10;
const MESSAGE_MAX: usize = 5000;

fn push(errors: &mut FieldErrors, field: &str, msg: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(msg.to_string());
}

// Local part, '@', dotted domain, no whitespace
fn looks_like_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|l| !l.is_empty() && !l.starts_with('-') && !l.ends_with('-'))
        && labels.last().is_some_and(|tld| tld.chars().count() >= 2)
}

fn length_check(
    errors: &mut FieldErrors,
    field: &str,
    value: &str,
    min: Option<(usize, &str)>,
    max: (usize, &str),
) {
    let len = value.chars().count();
    if let Some((min, msg)) = min {
        if len < min {
            push(errors, field, msg);
        }
    }
    if len > max.0 {
        push(errors, field, max.1);
    }
}

/// Validate and normalise a contact form body.
///
/// Values are trimmed before length checks and the email is lowercased.
/// Every failing rule is reported, grouped by field name.
pub fn validate(req: &ContactRequest) -> Result<ContactSubmission, FieldErrors> {
    let mut errors = FieldErrors::new();

    // trim before measuring: padding like "  a  " must not satisfy a minimum
    let name = req.name.as_deref().map(str::trim);
    match name {
        Some(name) => length_check(
            &mut errors,
            "name",
            name,
            Some((NAME_MIN, "Name must be at least 2 characters")),
            (NAME_MAX, "Name must be less than 100 characters"),
        ),
        None => push(&mut errors, "name", "Required"),
    }

    let email = req.email.as_deref().map(|e| e.trim().to_lowercase());
    match &email {
        Some(email) => {
            if !looks_like_email(email) {
                push(&mut errors, "email", "Invalid email address");
            }
            length_check(
                &mut errors,
                "email",
                email,
                None,
                (EMAIL_MAX, "Email must be less than 255 characters"),
            );
        }
        None => push(&mut errors, "email", "Required"),
    }

    let message = req.message.as_deref().map(str::trim);
    match message {
        Some(message) => length_check(
            &mut errors,
            "message",
            message,
            Some((MESSAGE_MIN, "Message must be at least 10 characters")),
            (MESSAGE_MAX, "Message must be less than 5000 characters"),
        ),
        None => push(&mut errors, "message", "Required"),
    }

    if req.honeypot.as_deref().is_some_and(|h| !h.is_empty()) {
        push(&mut errors, "honeypot", "Invalid submission");
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ContactSubmission {
        name: name.unwrap_or_default().to_string(),
        email: email.unwrap_or_default(),
        message: message.unwrap_or_default().to_string(),
    })
}
