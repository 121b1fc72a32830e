use serde::Deserialize;

use super::{is_valid_email, is_valid_phone, optional_text, required_text, ValidationErrors};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub position: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactInput {
    pub name: String,
    pub position: Option<String>,
    pub email: String,
    pub phone: Option<String>,
}

impl ContactForm {
    pub fn validate(self) -> Result<ContactInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = required_text(&mut errors, "name", "Name", self.name, 200);
        let position = optional_text(&mut errors, "position", "Position", self.position, 100);

        let email = required_text(&mut errors, "email", "Email", self.email, 254);
        if !email.is_empty() && !is_valid_email(&email) {
            errors.add("email", "Invalid email address");
        }

        let phone = optional_text(&mut errors, "phone", "Phone", self.phone, 50);
        if let Some(number) = &phone {
            if !is_valid_phone(number) {
                errors.add("phone", "Phone may only contain digits, spaces and + - / ( )");
            }
        }

        errors.finish(ContactInput { name, position, email, phone })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_contact() {
        let input = ContactForm {
            name: Some("Anna Berg".into()),
            position: Some("Marketing Lead".into()),
            email: Some(" anna@acme.example ".into()),
            phone: Some("+49 30 1234567".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(input.email, "anna@acme.example");
        assert_eq!(input.phone.as_deref(), Some("+49 30 1234567"));
    }

    #[test]
    fn email_is_required() {
        let errors = ContactForm { name: Some("Anna".into()), ..Default::default() }
            .validate()
            .unwrap_err();
        assert_eq!(errors.get("email"), ["Email is required"]);
    }

    #[test]
    fn rejects_bad_email_and_phone() {
        let errors = ContactForm {
            name: Some("Anna".into()),
            position: None,
            email: Some("anna(at)acme".into()),
            phone: Some("ext. 12".into()),
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.get("email"), ["Invalid email address"]);
        assert!(errors.has("phone"));
        assert!(!errors.has("name"));
    }
}
